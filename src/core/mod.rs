//! Core types - pure abstractions shared across the codebase.

mod category;
mod driver;

pub use category::FileKind;
pub use driver::BuildMode;
