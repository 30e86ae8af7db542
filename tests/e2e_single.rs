mod support_single;

use std::fs;

use tempfile::tempdir;

use support_single::{run_ratestorm, spawn_http_server_or_skip};

/// Five requests every 100ms for 300ms.
const SHORT_RUN: [&str; 6] = ["-r", "5", "--per", "100ms", "-t", "300ms"];

fn output_text(output: &std::process::Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn e2e_text_report_has_every_section() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };

    let mut args = vec!["-u".to_owned(), url, "-l".to_owned(), "health".to_owned()];
    args.extend(SHORT_RUN.iter().map(|arg| (*arg).to_owned()));
    let output = run_ratestorm(args)?;
    if !output.status.success() {
        return Err(output_text(&output));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for heading in [
        "Summaries:",
        "Status Codes:",
        "Latencies:",
        "Latencies (Success Only):",
    ] {
        if !stdout.contains(heading) {
            return Err(format!("Missing '{}' in\n{}", heading, stdout));
        }
    }
    if !stdout.contains("| health") || !stdout.contains("100.00%") {
        return Err(format!("Unexpected summary in\n{}", stdout));
    }
    Ok(())
}

#[test]
fn e2e_json_report_counts_requests() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };

    let mut args = vec![
        "-u".to_owned(),
        format!("{}/fail", url),
        "-o".to_owned(),
        "json".to_owned(),
    ];
    args.extend(SHORT_RUN.iter().map(|arg| (*arg).to_owned()));
    let output = run_ratestorm(args)?;
    if !output.status.success() {
        return Err(output_text(&output));
    }

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)
        .map_err(|err| format!("invalid JSON report: {}\n{}", err, output_text(&output)))?;
    let metrics = value
        .get("request")
        .ok_or_else(|| format!("Missing default label in {}", value))?;
    let requests = metrics
        .get("requests")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);
    if requests == 0 {
        return Err(format!("Expected requests in {}", metrics));
    }
    let failures = metrics
        .get("status_codes")
        .and_then(|codes| codes.get("503"))
        .and_then(serde_json::Value::as_u64);
    if failures != Some(requests) {
        return Err(format!("Expected every request to be a 503 in {}", metrics));
    }
    if metrics.get("success") != Some(&serde_json::json!(0.0)) {
        return Err(format!("Expected zero success ratio in {}", metrics));
    }
    Ok(())
}

#[test]
fn e2e_config_file_supplies_the_target() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = dir.path().join("run.toml");
    let content = format!(
        "url = \"{}\"\nlabel = \"from-config\"\nrate = 2\nper = \"100ms\"\nduration = \"200ms\"\noutput = \"json\"\n",
        url
    );
    fs::write(&config, content).map_err(|err| format!("write config failed: {}", err))?;

    let output = run_ratestorm(["-c".to_owned(), config.to_string_lossy().into_owned()])?;
    if !output.status.success() {
        return Err(output_text(&output));
    }
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)
        .map_err(|err| format!("invalid JSON report: {}\n{}", err, output_text(&output)))?;
    if value.get("from-config").is_none() {
        return Err(format!("Expected config label in {}", value));
    }
    Ok(())
}

#[test]
fn e2e_zero_rate_is_rejected() -> Result<(), String> {
    let output = run_ratestorm(["-u", "http://127.0.0.1:9", "-r", "0"])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", output_text(&output)));
    }
    Ok(())
}

#[test]
fn e2e_missing_url_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = dir.path().join("run.json");
    fs::write(&config, "{\"rate\": 1}").map_err(|err| format!("write config failed: {}", err))?;

    let output = run_ratestorm(["-c".to_owned(), config.to_string_lossy().into_owned()])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", output_text(&output)));
    }
    Ok(())
}
