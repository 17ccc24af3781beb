pub mod apis;
pub mod bindings;
pub mod catalog;
pub mod error;
pub mod traits;

#[doc = include_str!("../../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
