//! Flower Progress
//!
//! The garden grows one flower per saved entry. Only the first twenty are
//! drawn; the rest are summarised as a count.

/// Flower glyphs, cycled in order
pub const FLOWERS: [&str; 5] = ["🌸", "🌺", "🌻", "🌷", "🌹"];

/// Flowers drawn before the rest are summarised
pub const MAX_DRAWN: u64 = 20;

/// Shown while the garden is still empty
pub const EMPTY_GARDEN: &str = "Plant your first thought to grow a flower!";

/// Render the progress line for a flower count
#[must_use]
pub fn render(flower_count: u64) -> String {
    if flower_count == 0 {
        return EMPTY_GARDEN.to_string();
    }

    let drawn = flower_count.min(MAX_DRAWN) as usize;
    let mut line: String = FLOWERS.iter().cycle().take(drawn).copied().collect();
    if flower_count > MAX_DRAWN {
        line.push_str(&format!(" (+{} more!)", flower_count - MAX_DRAWN));
    }
    line
}
