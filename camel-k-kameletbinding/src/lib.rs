//! The `KameletBinding` resource and the reconciliation of its completion handler.
pub mod apis;
pub mod controller;

pub use apis::v1alpha1::{KameletBinding, KameletBindingSpec};
