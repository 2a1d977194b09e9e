//! Integration tests for the `meon` CLI binary.
//!
//! Argument parsing, help output and completions run without a gateway;
//! action tests point the binary at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QR: &str = "data:image/png;base64,iVBORw0KGgo=";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `meon` binary with env isolation.
///
/// Clears all `MEON_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn meon_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("meon");
    cmd.env("HOME", "/tmp/meon-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/meon-cli-test-nonexistent")
        .env_remove("MEON_PROFILE")
        .env_remove("MEON_DEFAULT_PROFILE")
        .env_remove("MEON_API_URL")
        .env_remove("MEON_USERNAME")
        .env_remove("MEON_PASSWORD")
        .env_remove("MEON_INSTANCE")
        .env_remove("MEON_OUTPUT")
        .env_remove("MEON_INSECURE")
        .env_remove("MEON_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `meon` with credentials and instance set, aimed at `url`.
fn gateway_cmd(url: &str) -> assert_cmd::Command {
    let mut cmd = meon_cmd();
    cmd.args([
        "--api-url",
        url,
        "--username",
        "admin",
        "--password",
        "secret",
        "--instance",
        "loja1",
    ]);
    cmd
}

/// Run a blocking command off the async runtime.
async fn output_of(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = meon_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    meon_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("status")
            .and(predicate::str::contains("connect"))
            .and(predicate::str::contains("disconnect"))
            .and(predicate::str::contains("qr"))
            .and(predicate::str::contains("run"))
            .and(predicate::str::contains("panel")),
    );
}

#[test]
fn test_version_flag() {
    meon_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("meon"));
}

#[test]
fn test_config_subcommands_exist() {
    meon_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("set-password")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    meon_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    meon_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = meon_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = meon_cmd()
        .args(["--output", "yaml", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

#[test]
fn test_run_rejects_unknown_action() {
    meon_cmd()
        .args(["run", "reboot"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("reboot").and(predicate::str::contains("QRCode")));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    meon_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_unknown_profile_is_a_usage_error() {
    meon_cmd()
        .args(["--profile", "nope", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope"));
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn test_empty_api_url_is_a_validation_error() {
    let output = gateway_cmd("")
        .args(["--output", "plain", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("ERRO: Endereço da API é obrigatório."));
}

#[test]
fn test_missing_instance_blocks_connect() {
    let output = meon_cmd()
        .args([
            "--api-url",
            "http://127.0.0.1:1",
            "-u",
            "admin",
            "--password",
            "secret",
            "-o",
            "plain",
            "connect",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("ERRO: Nome da instância é obrigatório."));
}

// ── Gateway actions ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_prints_connected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .and(query_param("id", "loja1"))
        .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "connected": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = gateway_cmd(&server.uri());
    cmd.args(["-o", "plain", "status"]);
    let output = output_of(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let text = stdout(&output);
    assert!(text.contains("Status da instância: Instância está CONECTADO."));
    assert!(text.contains("SUCESSO [Status]: Instância está CONECTADO."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_output_reports_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .and(body_json(json!({ "id": "loja1" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut cmd = gateway_cmd(&server.uri());
    cmd.args(["-o", "json", "disconnect"]);
    let output = output_of(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["action"], "Desconectar");
    assert_eq!(value["success"], true);
    assert_eq!(value["status_text"], "DESCONECTADO");
    assert_eq!(value["history"].as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_resolves_operator_names() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .and(body_json(json!({ "id": "loja1" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = gateway_cmd(&server.uri());
    cmd.args(["-o", "plain", "run", "desconectar"]);
    let output = output_of(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(stdout(&output).contains("SUCESSO [Desconectar]: Sessão encerrada com sucesso."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_auth_failure_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "invalid credentials" })),
        )
        .mount(&server)
        .await;

    let mut cmd = gateway_cmd(&server.uri());
    cmd.args(["-o", "plain", "connect"]);
    let output = output_of(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).contains("ERRO [Conectar]: invalid credentials"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_gateway_exits_with_connection_code() {
    let server = MockServer::start().await;
    let url = server.uri();
    drop(server);

    let mut cmd = gateway_cmd(&url);
    cmd.args(["-o", "plain", "status"]);
    let output = output_of(cmd).await;

    assert_eq!(output.status.code(), Some(7));
    assert!(stdout(&output).contains("ERRO [Status]"));
}

#[test]
fn test_refused_connection_reports_cause() {
    let output = gateway_cmd("http://127.0.0.1:1")
        .args(["-o", "plain", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    let text = stdout(&output).to_lowercase();
    assert!(text.contains("connection refused"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_qr_save_writes_decoded_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "qr": QR })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("qr.png");

    let mut cmd = gateway_cmd(&server.uri());
    cmd.args(["-o", "plain", "qr", "--save"]).arg(&target);
    let output = output_of(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(stdout(&output).contains("AGUARDANDO LEITURA DO QR CODE"));
    let bytes = std::fs::read(&target).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}
