//! Traits shape an [`Integration`] while it moves through its phases.
mod completion_handler;

pub use completion_handler::{CompletionHandlerTrait, COMPLETION_HANDLER_SOURCE_NAME};

use crate::apis::v1::Integration;
use crate::catalog::CamelCatalog;
use crate::error::Error;

/// What a trait works on during a reconciliation.
pub struct Environment<'a> {
    pub integration: &'a mut Integration,
    pub catalog: &'a dyn CamelCatalog,
}

pub trait Trait {
    fn id(&self) -> &'static str;

    /// Traits are applied in ascending order.
    fn order(&self) -> u32;

    /// Platform traits are always present and cannot be removed by users.
    fn is_platform_trait(&self) -> bool {
        false
    }

    /// Reads the trait configuration and returns whether the trait should be applied.
    fn configure(&mut self, env: &Environment) -> Result<bool, Error>;

    fn apply(&mut self, env: &mut Environment) -> Result<(), Error>;
}

/// Configures and applies every trait, in order.
pub fn apply_traits(traits: &mut [Box<dyn Trait>], env: &mut Environment) -> Result<(), Error> {
    traits.sort_by_key(|t| t.order());
    for t in traits.iter_mut() {
        if t.configure(env)? {
            tracing::debug!(trait_id = t.id(), "applying trait");
            t.apply(env)?;
        }
    }
    Ok(())
}
