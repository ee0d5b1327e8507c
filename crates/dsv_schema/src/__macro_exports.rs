//! Items re-exported for the code generated by `#[derive(Record)]`.
//!
//! Nothing here is part of the public API.

#[cfg(feature = "auto_register")]
pub use inventory;
