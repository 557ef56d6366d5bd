//! Utility modules shared across the build pipeline.
//!
//! | Module   | Purpose                                          |
//! |----------|--------------------------------------------------|
//! | `date`   | Content dates (front matter, filename prefixes)  |
//! | `exec`   | External command execution for command plugins  |
//! | `html`   | Escaping for the built-in renderer               |
//! | `path`   | Path normalization and slugification             |
//! | `plural` | Pluralized counts for log messages               |

pub mod date;
pub mod exec;
pub mod html;
pub mod path;
pub mod plural;
