//! Extension trait for [`CacheBucket`] with string convenience methods.

use std::io;

use crate::CacheBucket;

/// UTF-8 convenience methods for [`CacheBucket`].
///
/// Implemented for every bucket via a blanket impl so implementors only
/// deal with raw bytes.
///
/// # Example
///
/// ```
/// use folio_cache::{CacheBucketExt, NullCache};
///
/// let cache = NullCache;
/// cache.set_string("diagram", "<svg/>").unwrap();
/// assert_eq!(cache.get_string("diagram"), None);
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve a cached UTF-8 string.
    ///
    /// Returns `None` on cache miss or invalid UTF-8.
    fn get_string(&self, key: &str) -> Option<String> {
        let bytes = self.get(key)?;
        String::from_utf8(bytes).ok()
    }

    /// Store a string value in the cache.
    fn set_string(&self, key: &str, value: &str) -> io::Result<()> {
        self.set(key, value.as_bytes())
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}
