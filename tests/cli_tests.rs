//! End-to-end tests for the `publish` binary.
//!
//! Each test runs the binary in a temporary working directory with a cleared
//! environment, pointing GITHUB_API_URL at a local mock server.

use assert_cmd::Command;
use assert_cmd::assert::{Assert, OutputAssertExt};
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TARGET: &str = "x86_64-unknown-linux-gnu";
const NAME: &str = "mytool";
const DOWNLOAD_URL: &str =
    "https://github.com/octo/mytool/releases/download/v1.2.0/mytool-x86_64-unknown-linux-gnu";

fn publish_cmd(workdir: &Path, api_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("publish").unwrap();
    cmd.env_clear()
        .current_dir(workdir)
        .env("CIRCLE_PROJECT_USERNAME", "octo")
        .env("GITHUB_API_PASSWORD", "s3cret")
        .env("CIRCLE_PROJECT_REPONAME", "mytool")
        .env("CIRCLE_TAG", "v1.2.0")
        .env("GITHUB_API_URL", api_url)
        .args([TARGET, NAME]);
    cmd
}

fn write_artifact(workdir: &Path) {
    let dir = workdir.join("target").join(TARGET).join("release");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(NAME), b"\x7fELF").unwrap();
}

async fn mount_release(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/repos/octo/mytool/releases/tags/v1.2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "tag_name": "v1.2.0",
            "url": format!("{}/repos/octo/mytool/releases/7", server.uri()),
            "upload_url": format!("{}/uploads/releases/7/assets{{?name,label}}", server.uri()),
        })))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_upload(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/uploads/releases/7/assets"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 99,
            "name": "mytool-x86_64-unknown-linux-gnu",
            "url": "https://api.github.com/repos/octo/mytool/releases/assets/99",
            "browser_download_url": DOWNLOAD_URL,
            "size": 4
        })))
        .expect(expected)
        .mount(server)
        .await;
}

/// Run `cmd` off the async runtime so the mock server keeps serving
async fn run(mut cmd: Command) -> Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output.assert()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_success_prints_only_the_asset_url() {
    let server = MockServer::start().await;
    mount_release(&server, 1).await;
    mount_upload(&server, 1).await;

    let workdir = tempfile::tempdir().unwrap();
    write_artifact(workdir.path());

    run(publish_cmd(workdir.path(), &server.uri()))
        .await
        .success()
        .stdout(format!("{DOWNLOAD_URL}\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_each_missing_variable_fails_without_network() {
    for missing in [
        "CIRCLE_PROJECT_USERNAME",
        "GITHUB_API_PASSWORD",
        "CIRCLE_PROJECT_REPONAME",
        "CIRCLE_TAG",
    ] {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let workdir = tempfile::tempdir().unwrap();
        write_artifact(workdir.path());

        let mut cmd = publish_cmd(workdir.path(), &server.uri());
        cmd.env_remove(missing);

        run(cmd)
            .await
            .failure()
            .stdout("")
            .stderr(predicate::str::contains(missing));

        server.verify().await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_artifact_stops_before_upload() {
    let server = MockServer::start().await;
    mount_release(&server, 1).await;
    mount_upload(&server, 0).await;

    let workdir = tempfile::tempdir().unwrap();

    run(publish_cmd(workdir.path(), &server.uri()))
        .await
        .failure()
        .stdout("")
        .stderr(predicate::str::contains(
            "artifact read failed: Cannot read artifact target/x86_64-unknown-linux-gnu/release/mytool",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_tag_never_uploads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_upload(&server, 0).await;

    let workdir = tempfile::tempdir().unwrap();
    write_artifact(workdir.path());

    run(publish_cmd(workdir.path(), &server.uri()))
        .await
        .failure()
        .stderr(predicate::str::contains("No release found for tag 'v1.2.0' in octo/mytool"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_duplicate_asset_fails() {
    let server = MockServer::start().await;
    mount_release(&server, 1).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [{"resource": "ReleaseAsset", "code": "already_exists", "field": "name"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    write_artifact(workdir.path());

    run(publish_cmd(workdir.path(), &server.uri()))
        .await
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("already exists"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let workdir = tempfile::tempdir().unwrap();
    write_artifact(workdir.path());

    let mut cmd = publish_cmd(workdir.path(), &server.uri());
    cmd.arg("--dry-run");

    run(cmd)
        .await
        .success()
        .stdout("")
        .stderr(predicate::str::contains("mytool-x86_64-unknown-linux-gnu"));
}

#[test]
fn test_missing_positionals_is_usage_error() {
    Command::cargo_bin("publish")
        .unwrap()
        .env_clear()
        .arg(TARGET)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<NAME>"));
}
