//! Terminal colors.
//!
//! Each lane has its own color; emphasis is bold on top of it. Color is
//! switched off entirely when output is not a terminal.

use timeledger_core::Category;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Whether escape codes are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// A palette that emits escape codes only when `enabled`.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Plain text, no escape codes.
    #[must_use]
    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    const fn lane_color(category: Category) -> &'static str {
        match category {
            Category::Sent => "\x1b[36m",    // cyan
            Category::Images => "\x1b[35m",  // magenta
            Category::History => "\x1b[33m", // yellow
            Category::Inbox => "\x1b[32m",   // green
        }
    }

    /// Colors text in its lane color, bold when boosted.
    #[must_use]
    pub fn lane(self, category: Category, boosted: bool, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let weight = if boosted { BOLD } else { "" };
        format!("{weight}{}{text}{RESET}", Self::lane_color(category))
    }

    /// De-emphasized text (axis, labels, previews).
    #[must_use]
    pub fn dim(self, text: &str) -> String {
        if self.enabled {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}
