//! The process-wide schema cache.
//!
//! [`record_info`] derives a type's [`RecordInfo`] on first use and caches
//! the result — success or failure — for the lifetime of the process, keyed
//! by `TypeId`. Lookups from multiple threads are safe: the cache is guarded
//! by a reader/writer lock, the first finished builder wins, and a published
//! `&'static RecordInfo` is immutable.
//!
//! ## auto_register
//!
//! With the `auto_register` feature (default), types annotated with
//! `#[record(auto_register)]` are collected through the [`inventory`] crate
//! and can be described eagerly with [`preload`], surfacing schema errors at
//! startup instead of on first use.

use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use crate::Record;
use crate::info::{RecordInfo, SchemaError};

mod typeid_map;

pub use typeid_map::{NoOpHashState, NoOpHasher, TypeIdMap};

// -----------------------------------------------------------------------------
// Global cache

type CacheEntry = Result<&'static RecordInfo, SchemaError>;

static RECORDS: RwLock<TypeIdMap<CacheEntry>> = RwLock::new(TypeIdMap::new());

/// Returns the cached column schema of `T`, building it on first use.
///
/// Building happens outside the lock, so a `flatten` field may re-enter the
/// cache for its inner type without deadlocking. If two threads race on the
/// same type, the first one to publish wins and the other build is dropped.
///
/// # Examples
///
/// ```
/// use dsv_schema::{Record, registry};
///
/// #[derive(Record, Default)]
/// struct Pair {
///     #[record(name = "a")]
///     a: i64,
///     #[record(name = "b")]
///     b: i64,
/// }
///
/// let first = registry::record_info::<Pair>().unwrap();
/// let again = registry::record_info::<Pair>().unwrap();
/// assert!(core::ptr::eq(first, again));
/// ```
pub fn record_info<T: Record>() -> Result<&'static RecordInfo, SchemaError> {
    let id = TypeId::of::<T>();
    {
        let cache = RECORDS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = cache.get(&id) {
            return entry.clone();
        }
    }

    let built = T::build_record_info();
    let mut cache = RECORDS.write().unwrap_or_else(PoisonError::into_inner);
    cache
        .get_or_insert(id, move || built.map(|info| &*Box::leak(Box::new(info))))
        .clone()
}

/// Returns `true` if `T`'s schema (or its cached failure) is already present.
pub fn is_cached<T: 'static>() -> bool {
    RECORDS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(&TypeId::of::<T>())
}

// -----------------------------------------------------------------------------
// auto_register

/// A registration entry submitted by `#[record(auto_register)]`.
#[cfg(feature = "auto_register")]
pub struct AutoRecord(pub fn() -> Result<&'static RecordInfo, SchemaError>);

#[cfg(feature = "auto_register")]
inventory::collect!(AutoRecord);

/// Describes every collected `#[record(auto_register)]` type, returning the
/// number of types described or the first schema error encountered.
#[cfg(feature = "auto_register")]
pub fn preload() -> Result<usize, SchemaError> {
    let mut count = 0;
    for entry in inventory::iter::<AutoRecord> {
        (entry.0)()?;
        count += 1;
    }
    Ok(count)
}

// -----------------------------------------------------------------------------
// Tests
