//! Request shaper: the entry point that turns a caller payload into one
//! outbound chat-completions call.
//!
//! Implementation details are split into submodules under `src/client/`:
//! header assembly, the single-attempt executor, and the builder.

pub mod builder;
pub mod core;
mod execution;
pub mod headers;

pub use builder::RequestShaperBuilder;
pub use core::{ChatCompletion, PreparedRequest, RequestShaper};
pub use headers::RequestPlan;
