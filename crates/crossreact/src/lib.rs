//! Cross-reactivity rules between allergen categories.
//!
//! A [`CrossReactivityChecker`] answers "if a consumer reacts to X, what else
//! should they watch for?" from a static rule table, indexed both by source
//! and by target allergen. Rules carry a [`Confidence`] so callers can filter
//! speculative links out of user-facing warnings.
//!
//! ```
//! use crossreact::{Confidence, CrossReactivityChecker};
//!
//! let checker = CrossReactivityChecker::builtin().unwrap();
//! let warnings = checker.format_warnings("peanuts", Confidence::Medium);
//! assert!(!warnings.is_empty());
//! ```

mod checker;
mod error;
mod rule;

pub use crate::checker::CrossReactivityChecker;
pub use crate::error::CrossReactError;
pub use crate::rule::{Confidence, CrossReactivityRule};
