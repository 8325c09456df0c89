// ABOUTME: Site fix for WeChat public-account articles whose body is hidden by inline CSS.
// ABOUTME: Config-phase only: rewrites the visibility declaration before the page is parsed.

use crate::adapter::SiteAdapter;
use crate::context::ExtractionContext;

const HOST: &str = "mp.weixin.qq.com";

/// Reveals article content WeChat ships with `visibility: hidden`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeixinAdapter;

impl SiteAdapter for WeixinAdapter {
    fn name(&self) -> &str {
        "weixin"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn is_active(&self, ctx: &ExtractionContext) -> bool {
        ctx.host == HOST
    }

    fn set_config(&self, ctx: &mut ExtractionContext) {
        ctx.replace_strings.push((
            "visibility: hidden".to_string(),
            "visibility: visible".to_string(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn active_only_on_exact_host() {
        let adapter = WeixinAdapter;
        let ctx = ExtractionContext::new("https://mp.weixin.qq.com/s/abc").unwrap();
        assert!(adapter.is_active(&ctx));

        let other = ExtractionContext::new("https://weixin.qq.com/s/abc").unwrap();
        assert!(!adapter.is_active(&other));
    }

    #[test]
    fn set_config_reveals_hidden_content() {
        let mut ctx = ExtractionContext::new("https://mp.weixin.qq.com/s/abc").unwrap();
        WeixinAdapter.set_config(&mut ctx);

        let html = r#"<div id="js_content" style="visibility: hidden;">Text</div>"#;
        assert_eq!(
            ctx.apply_replace_strings(html),
            r#"<div id="js_content" style="visibility: visible;">Text</div>"#
        );
    }
}
