//! fontload-core: font name resolution and loading with two-level memoization
//!
//! A font name such as `"sans"`, `"serif"` or `"DejaVu Sans:bold"` is resolved
//! to a file path by fontconfig's `fc-match`, and the file at that path is
//! parsed with `read-fonts`. Names that start with `/` are taken as paths and
//! never reach fc-match.
//!
//! [`FontCache`] remembers both steps: name to path, and path to parsed font.
//! Repeated loads of one name hand back the same [`Arc`], and different names
//! that end up at the same file share one parsed [`Font`]. Nothing is ever
//! evicted. [`load`] does the same work without remembering anything.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fontload_core::FontCache;
//!
//! let mut cache = FontCache::new();
//! let sans = cache.load("sans")?;
//! let again = cache.load("sans")?;
//! assert!(Arc::ptr_eq(&sans, &again));
//!
//! println!("{} faces, {:?}", sans.faces().len(), sans.primary().names);
//! # Ok::<(), fontload_core::Error>(())
//! ```
//!
//! Both collaborators sit behind traits ([`FontMatcher`], [`FontParser`]) so
//! either can be swapped via [`FontCache::with_backends`].
//!
//! Crafted with care at FontLab https://www.fontlab.com/

use std::sync::Arc;

pub mod cache;
pub mod error;
pub mod font;
pub mod output;
pub mod resolve;
mod tags;

pub use cache::{CacheStats, FontCache, FontLoader, OneShot};
pub use error::{Error, LoadError, Lookup, ResolutionError};
pub use font::{FaceInfo, Font, FontParser, ReadFontsParser};
pub use resolve::{FcMatch, FontMatcher};

/// Resolve and parse `name` with fc-match and `read-fonts`, caching nothing.
pub fn load(name: &str) -> Result<Arc<Font>, Error> {
    OneShot::<FcMatch, ReadFontsParser>::default().load(name)
}

/// Resolve and parse `name` with the given collaborators, caching nothing.
pub fn load_with<M, P>(name: &str, matcher: M, parser: P) -> Result<Arc<P::Font>, Error>
where
    M: FontMatcher,
    P: FontParser,
{
    OneShot::new(matcher, parser).load(name)
}
