//! Architectural Enforcement
//!
//! Source scanners shared by the enforcement tests:
//! - The core crate never draws to a terminal
//! - No sleep() calls in production code outside the frame tick
//! - No unwrap()/expect() in production code of the core crate
//!
//! Paths are resolved from the workspace root, so the tests behave the same
//! no matter which directory `cargo test` runs from.

use std::fs;
use std::path::{Path, PathBuf};

/// A line of production code that breaks a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the line
    pub path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    /// The offending line, trimmed
    pub line: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} - {}",
            self.path.display(),
            self.line_number,
            self.line
        )
    }
}

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// Production lines of every `.rs` file under `dir`
///
/// Comment text and everything from the first `#[cfg(test)]` onwards are
/// dropped. Each item is `(path, line_number, code)`.
pub fn production_lines(dir: &Path) -> Vec<(PathBuf, usize, String)> {
    let mut lines = Vec::new();
    if !dir.exists() {
        return lines;
    }

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };

        for (idx, line) in content.lines().enumerate() {
            if line.trim_start().starts_with("#[cfg(test)]") {
                break;
            }
            let code = line.split("//").next().unwrap_or(line);
            if !code.trim().is_empty() {
                lines.push((path.to_path_buf(), idx + 1, code.to_string()));
            }
        }
    }
    lines
}

/// Production lines under `dir` for which `matches` holds
pub fn find_violations<F>(dir: &Path, matches: F) -> Vec<Violation>
where
    F: Fn(&Path, &str) -> bool,
{
    production_lines(dir)
        .into_iter()
        .filter(|(path, _, code)| matches(path, code))
        .map(|(path, line_number, code)| Violation {
            path,
            line_number,
            line: code.trim().to_string(),
        })
        .collect()
}

/// Print violations and fail with `rule` if there are any
pub fn assert_clean(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ {rule}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!(
        "\nFound {} violation(s) of: {rule}\nFix these before merging!",
        violations.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_skip_comments_and_tests() {
        let dir = std::env::temp_dir().join(format!("arch-scan-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("sample.rs"),
            "// header\nfn a() {} // trailing\n#[cfg(test)]\nfn b() {}\n",
        )
        .unwrap();

        let lines = production_lines(&dir);
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].1, 2);
        assert_eq!(lines[0].2.trim(), "fn a() {}");
    }
}
