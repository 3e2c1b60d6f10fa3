use colored::{ColoredString, Colorize};

/// Width of the rule printed around banners and summaries.
pub const RULE_WIDTH: usize = 70;

/// Named styles used across fluxmig output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Green,
    Yellow,
    Red,
    Blue,
    Cyan,
    Dim,
}

/// Apply a [`Style`] to anything string-like.
pub trait StyledText {
    fn with_style(&self, style: Style) -> ColoredString;
}

impl<T: AsRef<str> + ?Sized> StyledText for T {
    fn with_style(&self, style: Style) -> ColoredString {
        let s = self.as_ref();
        match style {
            Style::Green => s.green(),
            Style::Yellow => s.yellow(),
            Style::Red => s.red(),
            Style::Blue => s.blue(),
            Style::Cyan => s.cyan(),
            Style::Dim => s.dimmed(),
        }
    }
}

/// A horizontal rule of `=` characters.
pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Status icons
pub mod icons {
    use colored::{ColoredString, Colorize};

    pub fn success() -> ColoredString {
        "✓".green()
    }

    pub fn warning() -> ColoredString {
        "!".yellow()
    }

    pub fn error() -> ColoredString {
        "✗".red()
    }

    pub fn info() -> ColoredString {
        "·".blue()
    }

    pub fn package() -> ColoredString {
        "▸".cyan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styled_text_keeps_content() {
        colored::control::set_override(false);
        assert_eq!(
            "sonarr".with_style(Style::Green).bold().to_string(),
            "sonarr"
        );
        assert_eq!(icons::error().to_string(), "✗");
    }

    #[test]
    fn rule_has_fixed_width() {
        assert_eq!(rule().len(), RULE_WIDTH);
        assert!(rule().chars().all(|c| c == '='));
    }
}
