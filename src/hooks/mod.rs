//! Lifecycle hooks.
//!
//! | Module       | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `point`      | The fixed set of hook names and their kinds      |
//! | `value`      | Fire targets, fold values and fold context       |
//! | `registry`   | Ordered handlers per hook                        |
//! | `dispatcher` | `fire` / `fold` with strict-mode escalation      |
//! | `api`        | `PluginApi` passed to every handler              |

mod api;
mod dispatcher;
mod point;
mod registry;
mod value;

pub use api::PluginApi;
pub use dispatcher::{HookDispatcher, HookError, HookFailure};
pub use point::{Hook, HookKind};
pub use registry::{FireFn, FoldFn, Handler, HookEntry, HookRegistry};
pub use value::{FoldContext, FoldValue, HookTarget};
