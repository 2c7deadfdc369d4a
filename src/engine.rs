use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::{OsInfo, Report, ReportSummary, Script, ScriptFinding};
use crate::packages::PackageDatabase;
use crate::platform;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub directory: PathBuf,
    pub exclude: Vec<String>,
    pub vendor_prefix: String,
    pub show_progress: bool,
}

pub struct Engine<'a> {
    opts: EngineOptions,
    db: &'a dyn PackageDatabase,
}

impl<'a> Engine<'a> {
    pub fn new(opts: EngineOptions, db: &'a dyn PackageDatabase) -> Self {
        Self { opts, db }
    }

    pub fn check(&self) -> Result<Report> {
        use std::io::IsTerminal;
        let progress_enabled = self.opts.show_progress && std::io::stderr().is_terminal();
        let pb = if progress_enabled {
            let pb = indicatif::ProgressBar::new_spinner();
            pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
            pb.set_message(format!("scanning {}", self.opts.directory.display()));
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };

        let result = self.collect_and_classify();

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let findings = result?;
        Ok(self.report_from_findings(findings))
    }

    fn collect_and_classify(&self) -> Result<Vec<ScriptFinding>> {
        let dir = &self.opts.directory;
        let scripts: Vec<Script> = crate::scan::collect(dir, &self.opts.exclude, self.db)
            .with_context(|| format!("collecting init scripts in {}", dir.display()))?;
        tracing::debug!(count = scripts.len(), "collected init scripts");

        let packages =
            crate::packages::resolve(&scripts, self.db).context("resolving package metadata")?;
        tracing::debug!(count = packages.len(), "resolved packages");

        let mut findings = Vec::with_capacity(scripts.len());
        for script in &scripts {
            let finding = crate::rules::classify(script, &packages, &self.opts.vendor_prefix)?;
            findings.push(finding);
        }
        Ok(findings)
    }

    fn report_from_findings(&self, scripts: Vec<ScriptFinding>) -> Report {
        let action_needed_count = scripts
            .iter()
            .filter(|s| s.remediation.action_needed)
            .count();

        let directory = std::path::absolute(&self.opts.directory)
            .unwrap_or_else(|_| self.opts.directory.clone());

        let mut notes = Vec::new();
        if !directory.exists() {
            notes.push(format!("directory does not exist: {}", directory.display()));
        }

        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        let os: OsInfo = platform::os_info();

        Report {
            schema_version: "1.0".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            os,
            generated_at,
            directory: directory.display().to_string(),
            summary: ReportSummary {
                script_count: scripts.len(),
                action_needed_count,
                notes,
            },
            scripts,
        }
    }
}
