// ABOUTME: Built-in site adapters and the default registry that bundles them.
// ABOUTME: Registers the WeChat visibility fix and the YouTube transcript adapter.

//! Built-in site adapters.
//!
//! - `weixin`: reveals CSS-hidden WeChat article bodies (config phase only).
//! - `youtube`: replaces video pages with their transcript (both phases).

pub mod weixin;
pub mod youtube;

use crate::registry::AdapterRegistry;

pub use weixin::WeixinAdapter;
pub use youtube::YoutubeAdapter;

/// Build the registry of built-in adapters sharing `http` for their own requests.
pub fn builtin_registry(http: reqwest::Client) -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    registry.register(WeixinAdapter);
    registry.register(YoutubeAdapter::new(http));
    registry
}
