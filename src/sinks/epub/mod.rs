//! EPUB generation for the periodic table book.
//!
//! This module converts the element dataset into an EPUB ebook with:
//! - Cover page showing the generated (or configured) cover image
//! - Quick table laid out with the same placement rules as the cover
//! - Alphabetical index and block reference
//! - Element profiles, when summaries have been fetched
//! - Legend and attribution pages
//!
//! All user-facing text comes from the localized [`Strings`](crate::localization::Strings).

mod config;
mod rendering;
mod styles;

pub use config::{MetadataConfig, EPUB};
pub use rendering::Book;
