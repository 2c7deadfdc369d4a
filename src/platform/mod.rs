use std::io::Read;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use wait_timeout::ChildExt;

use crate::core::OsInfo;

pub mod rpm;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn run_command(cmd: &str, args: &[&str], timeout: Duration) -> Result<CommandOutput> {
    tracing::debug!(cmd, ?args, "running command");

    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start process: {cmd}"))?;

    let status = match child
        .wait_timeout(timeout)
        .with_context(|| format!("failed to wait for process: {cmd}"))?
    {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(anyhow!("timed out after {timeout:?}: {cmd}"));
        }
    };

    let mut stdout = String::new();
    if let Some(mut out) = child.stdout.take() {
        let _ = out.read_to_string(&mut stdout);
    }
    let mut stderr = String::new();
    if let Some(mut err) = child.stderr.take() {
        let _ = err.read_to_string(&mut stderr);
    }

    let exit_code = status.code().unwrap_or(-1);
    tracing::debug!(cmd, exit_code, "command finished");

    Ok(CommandOutput {
        exit_code,
        stdout,
        stderr,
    })
}

pub fn os_info() -> OsInfo {
    match std::fs::read_to_string("/etc/os-release") {
        Ok(s) => parse_os_release(&s),
        Err(err) => {
            tracing::debug!("cannot read /etc/os-release: {err}");
            OsInfo {
                name: "unknown".to_string(),
                version: "unknown".to_string(),
            }
        }
    }
}

fn parse_os_release(s: &str) -> OsInfo {
    let mut name = None;
    let mut version = None;
    for line in s.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'').to_string();
        match key.trim() {
            "NAME" => name = Some(value),
            "VERSION_ID" => version = Some(value),
            _ => {}
        }
    }
    OsInfo {
        name: name.unwrap_or_else(|| "unknown".to_string()),
        version: version.unwrap_or_else(|| "unknown".to_string()),
    }
}
