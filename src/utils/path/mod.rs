//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_path`, `join_segments`)
//! - [`slug`]: URL slugification (`slugify`, `strip_date_prefix`)

pub mod fs;
pub mod slug;

pub use fs::{join_segments, normalize_path, resolve_path};
pub use slug::{slugify, strip_date_prefix};
