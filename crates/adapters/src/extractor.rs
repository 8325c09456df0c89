// ABOUTME: The Extractor driving one page through the config phase, fetch, meta phase and readability.
// ABOUTME: Provides async extract() and extract_html() for URLs or already fetched HTML.

use scraper::Html;
use tracing::{debug, warn};

use crate::context::ExtractionContext;
use crate::error::ExtractError;
use crate::formats::{html_to_markdown, html_to_text, sanitize_html, word_count};
use crate::meta::extract_meta;
use crate::options::{ContentType, ExtractorBuilder, Options};
use crate::readable::readable_content;
use crate::registry::AdapterRegistry;
use crate::resource;
use crate::result::{DocumentType, ExtractionResult};
use crate::sites::builtin_registry;
use crate::sites::youtube::DURATION_KEY;

/// Drives extractions with a shared HTTP client and adapter registry.
pub struct Extractor {
    opts: Options,
    http_client: reqwest::Client,
    registry: AdapterRegistry,
}

impl Extractor {
    /// Create a new ExtractorBuilder for configuring the extractor.
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    /// Create a new Extractor with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .unwrap_or_default()
        });

        let registry = opts
            .registry
            .clone()
            .unwrap_or_else(|| builtin_registry(http_client.clone()));

        Self {
            opts,
            http_client,
            registry,
        }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Fetch and extract the page at `url`.
    pub async fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractError> {
        let mut ctx = self.new_context(url)?;
        self.registry.run_config_phase(&mut ctx);

        let rsp = resource::get(&self.http_client, url, &ctx.http_headers, "Extract")
            .await?
            .raise_for_status("Extract")?;
        let raw_html = rsp.text();

        self.finish(ctx, &raw_html).await
    }

    /// Extract already fetched HTML, using `url` for context.
    pub async fn extract_html(&self, html: &str, url: &str) -> Result<ExtractionResult, ExtractError> {
        if html.is_empty() {
            return Err(ExtractError::invalid_url(
                url,
                "ExtractHTML",
                Some(anyhow::anyhow!("empty HTML")),
            ));
        }

        let mut ctx = self.new_context(url)?;
        self.registry.run_config_phase(&mut ctx);
        self.finish(ctx, html).await
    }

    fn new_context(&self, url: &str) -> Result<ExtractionContext, ExtractError> {
        Ok(ExtractionContext::new(url)?.with_headers(self.opts.headers.clone()))
    }

    async fn finish(
        &self,
        mut ctx: ExtractionContext,
        raw_html: &str,
    ) -> Result<ExtractionResult, ExtractError> {
        ctx.html = ctx.apply_replace_strings(raw_html);
        ctx.meta = extract_meta(&Html::parse_document(&ctx.html));

        let document_type = DocumentType::from_graph_type(ctx.meta.first("graph.type"));
        ctx.readability = document_type.wants_readability();

        if let Err(err) = self.registry.run_meta_phase(&mut ctx).await {
            if self.opts.fail_on_adapter_error {
                return Err(ExtractError::adapter(ctx.url.as_str(), err));
            }
            warn!(url = %ctx.url, error = %err, "adapter failed, keeping generic result");
        }

        let content = if ctx.readability {
            debug!(url = %ctx.url, "running readability");
            let sanitized = readable_content(&ctx.html)
                .map(|html| sanitize_html(&html))
                .unwrap_or_default();
            match self.opts.content_type {
                ContentType::Html => sanitized,
                ContentType::Markdown => html_to_markdown(&sanitized),
                ContentType::Text => html_to_text(&sanitized),
            }
        } else {
            String::new()
        };

        let wc = word_count(&html_to_text(&content));
        Ok(build_result(ctx, document_type, content, wc))
    }
}

fn first_of(ctx: &ExtractionContext, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| ctx.meta.first(k))
        .map(str::to_string)
}

fn build_result(
    ctx: ExtractionContext,
    document_type: DocumentType,
    content: String,
    word_count: usize,
) -> ExtractionResult {
    let title = first_of(&ctx, &["graph.title", "twitter.title", "html.title"]).unwrap_or_default();
    let description = first_of(
        &ctx,
        &["graph.description", "twitter.description", "html.description"],
    );
    let site_name = first_of(&ctx, &["graph.site_name"]);
    let language = first_of(&ctx, &["html.lang", "graph.locale"]);
    let duration = ctx
        .meta
        .first(DURATION_KEY)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| *d >= 0.0)
        .map(|d| d.round() as u64);

    ExtractionResult {
        url: ctx.url.to_string(),
        domain: ctx.domain,
        title,
        description,
        site_name,
        language,
        document_type,
        duration,
        content,
        word_count,
        readability: ctx.readability,
        meta: ctx.meta,
    }
}
