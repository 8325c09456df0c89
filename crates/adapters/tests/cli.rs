// ABOUTME: Integration tests for the adapters CLI binary.
// ABOUTME: Tests HTML file extraction, site fixes applied offline, and argument validation.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn adapters_cmd() -> Command {
    Command::cargo_bin("adapters").unwrap()
}

#[test]
fn extract_html_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("test.html");

    fs::write(
        &html_path,
        r#"<!DOCTYPE html>
<html>
<head><title>Test Page</title></head>
<body>
<article><p>Hi there</p></article>
</body>
</html>"#,
    )
    .unwrap();

    adapters_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com")
        .arg("--format")
        .arg("text")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hi there"));
}

#[test]
fn weixin_hidden_content_is_revealed() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("weixin.html");

    fs::write(
        &html_path,
        r#"<html><head><title>WeChat</title></head><body>
<div id="js_content" style="visibility: hidden;"><p>Hidden article body with several words</p></div>
<div class="footer"><p>Footer</p></div>
</body></html>"#,
    )
    .unwrap();

    let output = adapters_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://mp.weixin.qq.com/s/abc")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["domain"], "qq.com");
    assert_eq!(value["title"], "WeChat");
    assert!(value["content"]
        .as_str()
        .unwrap()
        .contains("Hidden article body"));
    assert!(!value["content"].as_str().unwrap().contains("Footer"));
}

#[test]
fn fetches_urls_and_outputs_json() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/page");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body("<html><head><title>Page One</title></head><body><p>One</p></body></html>");
    });

    adapters_cmd()
        .arg("--json")
        .arg(server.url("/page"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Page One\""));
    mock.assert();
}

#[test]
fn html_without_url_fails() {
    adapters_cmd()
        .arg("--html")
        .arg("whatever.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--url is required"));
}

#[test]
fn no_input_fails() {
    adapters_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one URL is required"));
}
