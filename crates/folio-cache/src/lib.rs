//! Payload cache abstraction for folio.
//!
//! This crate decouples cache consumers from the storage mechanism. A
//! [`CacheBucket`] is a flat key-value store of rendered payloads:
//!
//! - [`FileCache`]: one file per entry in a directory on disk, named
//!   `<key>.<extension>`
//! - [`NullCache`]: no-op implementation (always misses)
//!
//! Entries are never invalidated. A key is expected to be a content hash, so
//! a stored payload is valid for as long as the same key is asked for.
//!
//! # Example
//!
//! ```
//! use folio_cache::{CacheBucket, NullCache};
//!
//! let cache = NullCache;
//! cache.set("abc123", b"<svg/>").unwrap();
//! assert_eq!(cache.get("abc123"), None); // NullCache always misses
//! ```

mod ext;
mod file;

pub use ext::CacheBucketExt;
pub use file::FileCache;

use std::io;

/// A flat store of cached payloads.
///
/// Reads are infallible from the caller's point of view: any problem reading
/// an entry is reported as a miss. Writes surface I/O errors, because a
/// cache directory that cannot be written is a resource problem the caller
/// must hear about.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value, or `None` on miss.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store a value, overwriting any existing entry for `key`.
    ///
    /// Last writer wins; there is no locking between processes.
    fn set(&self, key: &str, value: &[u8]) -> io::Result<()>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
///
/// Use when caching is disabled.
pub struct NullCache;

impl CacheBucket for NullCache {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _value: &[u8]) -> io::Result<()> {
        Ok(())
    }
}

impl<B: CacheBucket + ?Sized> CacheBucket for Box<B> {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> io::Result<()> {
        (**self).set(key, value)
    }
}
