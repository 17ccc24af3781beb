mod completion_handler_types;
mod completion_handler_types_support;
mod endpoint_types;
mod raw_types;

pub use completion_handler_types::*;
pub use completion_handler_types_support::*;
pub use endpoint_types::*;
pub use raw_types::{from_object, json_kind, property_value, RawMessage};
