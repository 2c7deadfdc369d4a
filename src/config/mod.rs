use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::rules::DEFAULT_VENDOR_PREFIX;

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub ui: UiConfig,
    pub scan: ScanConfig,
    pub packages: PackagesConfig,
    pub classify: ClassifyConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
    pub wrap_width: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanConfig {
    pub directory: PathBuf,
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackagesConfig {
    pub rpm_command: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyConfig {
    pub vendor_prefix: String,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            ui: UiConfig {
                color: true,
                wrap_width: 80,
            },
            scan: ScanConfig {
                directory: PathBuf::from("/etc/init.d"),
                exclude: vec![],
            },
            packages: PackagesConfig {
                rpm_command: "rpm".to_string(),
            },
            classify: ClassifyConfig {
                vendor_prefix: DEFAULT_VENDOR_PREFIX.to_string(),
            },
        }
    }
}

pub fn load() -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();
    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("INITCHECK_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "INITCHECK_UI_COLOR")?;
    }
    if let Ok(v) = std::env::var("INITCHECK_UI_WRAP_WIDTH") {
        cfg.ui.wrap_width = v
            .trim()
            .parse::<usize>()
            .with_context(|| "INITCHECK_UI_WRAP_WIDTH")?;
    }
    if let Ok(v) = std::env::var("INITCHECK_SCAN_DIRECTORY") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.scan.directory = PathBuf::from(v);
        }
    }
    if let Ok(v) = std::env::var("INITCHECK_SCAN_EXCLUDE") {
        let parts: Vec<String> = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        if !parts.is_empty() {
            cfg.scan.exclude = parts;
        }
    }
    if let Ok(v) = std::env::var("INITCHECK_PACKAGES_RPM_COMMAND") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.packages.rpm_command = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("INITCHECK_CLASSIFY_VENDOR_PREFIX") {
        if !v.trim().is_empty() {
            cfg.classify.vendor_prefix = v;
        }
    }

    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}
