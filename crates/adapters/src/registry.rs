// ABOUTME: AdapterRegistry holding known site adapters and dispatching their hooks.
// ABOUTME: Selects active adapters by priority and runs the config and metadata phases in order.

//! Adapter registry.
//!
//! The registry is built once at startup and then only read, so a single
//! instance can serve any number of concurrent extractions. Each phase
//! recomputes the active set from the context and walks it in order:
//! descending priority, registration order among equals.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::adapter::SiteAdapter;
use crate::context::ExtractionContext;
use crate::error::ExtractError;

/// The set of registered site adapters.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn SiteAdapter>>,
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.adapters.iter().map(|a| (a.name(), a.priority())))
            .finish()
    }
}

impl AdapterRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter after every adapter already present.
    pub fn register(&mut self, adapter: impl SiteAdapter + 'static) {
        self.adapters.push(Arc::new(adapter));
    }

    /// Returns the number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns true if no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Adapters active for `ctx`, highest priority first.
    pub fn active_adapters<'a>(&'a self, ctx: &ExtractionContext) -> Vec<&'a dyn SiteAdapter> {
        let mut active: Vec<&dyn SiteAdapter> = self
            .adapters
            .iter()
            .map(|a| &**a)
            .filter(|a| a.is_active(ctx))
            .collect();
        // sort_by_key is stable: equal priorities stay in registration order
        active.sort_by_key(|a| Reverse(a.priority()));
        active
    }

    /// Runs every active adapter's config hook. Changes accumulate.
    pub fn run_config_phase(&self, ctx: &mut ExtractionContext) {
        for adapter in self.active_adapters(ctx) {
            debug!(adapter = adapter.name(), host = %ctx.host, "set_config");
            adapter.set_config(ctx);
        }
    }

    /// Runs every active adapter's metadata hook.
    ///
    /// The first error stops the phase and is returned as is; later
    /// adapters do not run and earlier mutations are kept.
    pub async fn run_meta_phase(&self, ctx: &mut ExtractionContext) -> Result<(), ExtractError> {
        for adapter in self.active_adapters(ctx) {
            debug!(adapter = adapter.name(), host = %ctx.host, "process_meta");
            adapter.process_meta(ctx).await?;
        }
        Ok(())
    }
}
