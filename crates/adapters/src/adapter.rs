// ABOUTME: The SiteAdapter trait implemented by every per-site override.
// ABOUTME: One required activation predicate plus optional config and metadata hooks.

use async_trait::async_trait;

use crate::context::ExtractionContext;
use crate::error::ExtractError;

/// A site-specific override taking part in page extraction.
///
/// Adapters are stateless once registered and shared by every concurrent
/// extraction, hence `Send + Sync`. Only [`is_active`](Self::is_active) is
/// required; the hooks default to doing nothing.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Higher runs first. Equal priorities keep registration order.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether this adapter participates for `ctx`.
    ///
    /// Must be pure: the registry may call it several times per extraction.
    fn is_active(&self, ctx: &ExtractionContext) -> bool;

    /// Config phase: adjust fetch settings before the page is retrieved.
    fn set_config(&self, _ctx: &mut ExtractionContext) {}

    /// Meta phase: rework metadata or content after the page is parsed.
    ///
    /// Errors propagate to the caller untouched; mutations made before the
    /// error stay in the context.
    async fn process_meta(&self, _ctx: &mut ExtractionContext) -> Result<(), ExtractError> {
        Ok(())
    }
}
