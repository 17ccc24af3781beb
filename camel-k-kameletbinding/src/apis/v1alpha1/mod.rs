mod kameletbinding_types;

pub use kameletbinding_types::*;
