//! TextBlock Widget
//!
//! A borderless, wrapped text region for the writing area. The view follows
//! the end of the text unless scrolled back.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Lines scrolled back from the end (0 = follow the end)
    pub scroll_back: usize,
    /// Total wrapped lines at the last render
    pub total_lines: usize,
    /// Where the cursor belongs after the last render, if visible
    pub cursor: Option<(u16, u16)>,
}

impl TextBlockState {
    /// Scroll by delta (positive = towards the end)
    pub fn scroll(&mut self, delta: isize) {
        self.scroll_back = self.scroll_back.saturating_add_signed(-delta);
    }

    /// Follow the end of the text again
    pub fn scroll_to_end(&mut self) {
        self.scroll_back = 0;
    }
}

/// A borderless, wrapped text block
pub struct TextBlock<'a> {
    content: &'a str,
    placeholder: Option<&'a str>,
    style: Style,
    placeholder_style: Style,
}

impl<'a> TextBlock<'a> {
    /// Block showing `content`
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            placeholder: None,
            style: Style::default(),
            placeholder_style: Style::default(),
        }
    }

    /// Text style
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Text shown while `content` is empty
    #[must_use]
    pub fn placeholder(mut self, text: &'a str, style: Style) -> Self {
        self.placeholder = Some(text);
        self.placeholder_style = style;
        self
    }
}

/// Wrap `content` to `width` columns, keeping empty lines
pub fn wrap_lines(content: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = content
        .split('\n')
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.to_string())
                    .collect()
            }
        })
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            state.cursor = None;
            return;
        }

        if self.content.is_empty() {
            if let Some(placeholder) = self.placeholder {
                for (i, line) in wrap_lines(placeholder, area.width as usize)
                    .iter()
                    .take(area.height as usize)
                    .enumerate()
                {
                    buf.set_string(area.x, area.y + i as u16, line, self.placeholder_style);
                }
            }
            state.total_lines = 1;
            state.cursor = Some((area.x, area.y));
            return;
        }

        let wrapped = wrap_lines(self.content, area.width as usize);
        state.total_lines = wrapped.len();

        // Clamp scroll
        let height = area.height as usize;
        let max_back = state.total_lines.saturating_sub(height);
        state.scroll_back = state.scroll_back.min(max_back);
        let start = max_back - state.scroll_back;

        for (i, line) in wrapped.iter().skip(start).take(height).enumerate() {
            buf.set_string(area.x, area.y + i as u16, line, self.style);
        }

        state.cursor = if state.scroll_back == 0 {
            let last = wrapped.last().map_or("", String::as_str);
            let row = (state.total_lines - 1 - start) as u16;
            let col = (last.width() as u16).min(area.width.saturating_sub(1));
            Some((area.x + col, area.y + row))
        } else {
            None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrap_keeps_blank_lines() {
        assert_eq!(wrap_lines("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_lines("", 10), vec![""]);
    }

    #[test]
    fn test_follows_end_of_text() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        let mut state = TextBlockState::default();

        TextBlock::new("one\ntwo\nthree").render(area, &mut buf, &mut state);

        assert_eq!(state.total_lines, 3);
        assert_eq!(buf[(0, 0)].symbol(), "t");
        assert_eq!(buf[(0, 1)].symbol(), "t");
        assert_eq!(buf[(1, 1)].symbol(), "h");
        assert_eq!(state.cursor, Some((5, 1)));
    }

    #[test]
    fn test_scroll_back_hides_cursor() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        let mut state = TextBlockState::default();
        state.scroll(-5);

        TextBlock::new("one\ntwo\nthree").render(area, &mut buf, &mut state);

        assert_eq!(state.scroll_back, 1);
        assert_eq!(buf[(0, 0)].symbol(), "o");
        assert_eq!(state.cursor, None);

        state.scroll_to_end();
        assert_eq!(state.scroll_back, 0);
    }

    #[test]
    fn test_placeholder_when_empty() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        let mut state = TextBlockState::default();

        TextBlock::new("")
            .placeholder("Write here", Style::default())
            .render(area, &mut buf, &mut state);

        assert_eq!(buf[(0, 0)].symbol(), "W");
        assert_eq!(state.cursor, Some((0, 0)));
    }
}
