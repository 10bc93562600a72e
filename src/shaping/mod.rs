//! Pure request transformations applied before dispatch.
//!
//! Nothing in here performs I/O or touches shared state; each function maps
//! payload data to a header value or to a repaired copy of that data.
//!
//! | Function | Produces |
//! |----------|----------|
//! | [`initiator::classify`] | `X-Initiator` header value |
//! | [`schema::normalize_tools`] | tool declarations accepted by strict-schema validation |
//! | [`vision::requires_vision`] | whether `copilot-vision-request` is sent |

pub mod initiator;
pub mod schema;
pub mod vision;

pub use initiator::{classify, Initiator};
pub use schema::{normalize_parameters, normalize_tools, normalized_tools};
pub use vision::requires_vision;
