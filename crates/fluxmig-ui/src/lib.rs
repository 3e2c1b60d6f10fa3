//! # fluxmig-ui
//!
//! Terminal styling shared by the fluxmig binary: colored text, status icons
//! and section rules.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fluxmig_ui::prelude::*;
//!
//! println!("{} {}", fluxmig_ui::icons::success(), "done".with_style(Style::Green));
//! ```

mod style;

pub use style::{Style, StyledText, icons, rule};

// Re-export commonly used items from dependencies
pub use colored::Colorize;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Colorize,
        style::{Style, StyledText},
    };
}
