// ABOUTME: Main library entry point for the site-adapter extraction subsystem.
// ABOUTME: Re-exports the public API: Extractor, AdapterRegistry, SiteAdapter, ExtractionContext, errors.

//! Site adapters for web-page content extraction.
//!
//! A generic extractor does well on ordinary articles but fails on sites
//! that hide their text behind CSS or have no article body at all. Site
//! adapters fix those cases: each one decides whether it applies to a page,
//! may adjust the fetch configuration before the page is retrieved, and may
//! rework the extracted metadata and content afterwards.
//!
//! # Example
//!
//! ```no_run
//! use digests_adapters::{ExtractError, Extractor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ExtractError> {
//!     let extractor = Extractor::builder().build();
//!     let result = extractor.extract("https://www.youtube.com/watch?v=zR3Igc3Rhfg").await?;
//!     println!("{} ({:?}s)", result.title, result.duration);
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod context;
pub mod error;
pub mod extractor;
pub mod formats;
pub mod meta;
pub mod options;
pub mod readable;
pub mod registry;
pub mod resource;
pub mod result;
pub mod sites;

pub use crate::adapter::SiteAdapter;
pub use crate::context::{ExtractionContext, Meta};
pub use crate::error::{ErrorCode, ExtractError};
pub use crate::extractor::Extractor;
pub use crate::options::{ContentType, ExtractorBuilder, Options};
pub use crate::registry::AdapterRegistry;
pub use crate::result::{DocumentType, ExtractionResult};
pub use crate::sites::youtube::{CaptionTrack, LanguageCode, TrackSelection};
pub use crate::sites::{builtin_registry, WeixinAdapter, YoutubeAdapter};
