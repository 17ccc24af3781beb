mod integration_types;

pub use integration_types::*;
