//! Allergen synonym vocabulary.
//!
//! A [`SynonymIndex`] holds the category -> synonym lists used to screen
//! ingredient labels, in the order they were loaded, together with a reverse
//! index from lower-cased synonym to category name.
//!
//! ## Loading
//!
//! - [`SynonymIndex::from_path`] / [`SynonymIndex::from_yaml_str`] read the
//!   YAML format documented in [`source`].
//! - [`SynonymIndex::from_categories`] builds from in-memory pairs.
//! - [`SynonymIndex::builtin`] returns the vocabulary shipped with the crate.
//!
//! Construction validates everything once and is all-or-nothing; lookups
//! never fail; unknown names simply yield `None` or an empty slice.
//!
//! ```
//! use synonyms::SynonymIndex;
//!
//! let index = SynonymIndex::from_yaml_str("dairy:\n  - milk\n  - whey\n").unwrap();
//! assert_eq!(index.category_of("WHEY"), Some("dairy"));
//! assert_eq!(index.category_of("tofu"), None);
//! ```

mod category;
mod error;
mod index;
pub mod source;

pub use crate::category::AllergenCategory;
pub use crate::error::SynonymError;
pub use crate::index::SynonymIndex;
