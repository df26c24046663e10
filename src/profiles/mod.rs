//! Settings profiles, one per configurable subsystem
//!
//! A profile declares the controls it needs and binds them to its section(s).
//! `Session` binds every profile against one store and owns the subscriptions
//! for as long as the front-end lives.

pub mod aida64;
pub mod automatic;
pub mod general;
pub mod linpack;
pub mod prime95;
pub mod ycruncher;

use tracing::info;

use crate::field::{FieldRegistry, Subscription};
use crate::sync::SyncContext;

pub use aida64::Aida64;
pub use automatic::AutomaticTestMode;
pub use general::General;
pub use linpack::Linpack;
pub use prime95::Prime95;
pub use ycruncher::YCruncher;

/// A configurable subsystem
pub trait Profile {
    const NAME: &'static str;

    /// Register every control this profile binds, with neutral initial values
    fn declare_fields(registry: &mut FieldRegistry);

    /// Load the profile's fields from the store and subscribe to them
    fn bind(ctx: &SyncContext, registry: &FieldRegistry) -> Vec<Subscription>;
}

/// Registry holding every known control, for deployments without a UI
pub fn headless_registry() -> FieldRegistry {
    let mut registry = FieldRegistry::new();
    General::declare_fields(&mut registry);
    AutomaticTestMode::declare_fields(&mut registry);
    Prime95::declare_fields(&mut registry);
    Linpack::declare_fields(&mut registry);
    YCruncher::declare_fields(&mut registry);
    Aida64::declare_fields(&mut registry);
    registry
}

/// All profiles bound to one store
pub struct Session {
    bindings: Vec<(&'static str, Vec<Subscription>)>,
}

impl Session {
    /// Bind every profile. General comes first: its program selector gates the
    /// y-cruncher test sets.
    pub fn attach(ctx: &SyncContext, registry: &FieldRegistry) -> Self {
        let mut session = Self {
            bindings: Vec::with_capacity(6),
        };
        session.bind::<General>(ctx, registry);
        session.bind::<AutomaticTestMode>(ctx, registry);
        session.bind::<Prime95>(ctx, registry);
        session.bind::<Linpack>(ctx, registry);
        session.bind::<YCruncher>(ctx, registry);
        session.bind::<Aida64>(ctx, registry);
        session
    }

    fn bind<P: Profile>(&mut self, ctx: &SyncContext, registry: &FieldRegistry) {
        let subscriptions = P::bind(ctx, registry);
        info!(profile = P::NAME, subscriptions = subscriptions.len(), "Profile bound");
        self.bindings.push((P::NAME, subscriptions));
    }

    /// Number of live subscriptions per profile
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        self.bindings
            .iter()
            .map(|(name, subs)| (*name, subs.len()))
            .collect()
    }
}
