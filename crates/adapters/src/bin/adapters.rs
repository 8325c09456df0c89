// ABOUTME: CLI binary running pages through the site adapters and the extraction pipeline.
// ABOUTME: Extracts URLs or HTML files and outputs content or the full JSON result.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use digests_adapters::{ContentType, ExtractionResult, Extractor};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "adapters")]
#[command(about = "Extract web content with site-specific adapters")]
struct Args {
    /// Output format: html (default), markdown/md, text/txt
    #[arg(short = 'f', long = "format", default_value = "html")]
    format: String,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Output the full JSON result instead of the content only
    #[arg(long = "json")]
    json_output: bool,

    /// HTML file to extract (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// URL context for HTML file extraction (required with --html)
    #[arg(long = "url")]
    url: Option<String>,

    /// Fail when a site adapter fails instead of keeping the generic result
    #[arg(long = "fail-on-adapter-error")]
    fail_on_adapter_error: bool,

    /// Log adapter dispatch and outbound requests to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// URLs to extract (fetch mode)
    #[arg()]
    urls: Vec<String>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "digests_adapters=debug"
    } else {
        "digests_adapters=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn format_output(results: &[ExtractionResult], json_output: bool) -> Result<String, serde_json::Error> {
    if json_output {
        if results.len() == 1 {
            serde_json::to_string_pretty(&results[0])
        } else {
            serde_json::to_string_pretty(results)
        }
    } else {
        Ok(results
            .iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.html.is_some() && args.url.is_none() {
        eprintln!("error: --url is required when using --html");
        return ExitCode::from(1);
    }

    if args.html.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --html with --url");
        return ExitCode::from(1);
    }

    if args.html.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --html and positional URLs");
        return ExitCode::from(1);
    }

    let extractor = Extractor::builder()
        .content_type(ContentType::from(args.format.as_str()))
        .fail_on_adapter_error(args.fail_on_adapter_error)
        .build();

    let mut results: Vec<ExtractionResult> = Vec::new();
    let mut had_error = false;

    if let (Some(html_path), Some(url)) = (&args.html, &args.url) {
        match fs::read_to_string(html_path) {
            Ok(html_content) => match extractor.extract_html(&html_content, url).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    eprintln!("error extracting HTML: {}", e);
                    had_error = true;
                }
            },
            Err(e) => {
                eprintln!("error reading file {:?}: {}", html_path, e);
                had_error = true;
            }
        }
    } else {
        for url in &args.urls {
            match extractor.extract(url).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    eprintln!("error extracting {}: {}", url, e);
                    had_error = true;
                }
            }
        }
    }

    if !results.is_empty() {
        let output_str = match format_output(&results, args.json_output) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error serializing output: {}", e);
                return ExitCode::from(1);
            }
        };

        if let Some(output_path) = &args.output {
            if let Err(e) = fs::write(output_path, &output_str) {
                eprintln!("error writing to {:?}: {}", output_path, e);
                had_error = true;
            }
        } else {
            println!("{}", output_str);
        }
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
