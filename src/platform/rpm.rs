use std::path::Path;
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::core::Package;
use crate::packages::PackageDatabase;
use crate::platform::{CommandOutput, run_command};

const METADATA_QUERY_FORMAT: &str = "name:%{NAME}\\nvendor:%{VENDOR}\\n";

#[derive(Debug, Clone)]
pub struct Rpm {
    program: String,
    base_args: Vec<String>,
    timeout: Duration,
}

impl Rpm {
    pub fn from_command_line(command_line: &str, timeout: Duration) -> Result<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| anyhow!("rpm command is empty"))?;
        Ok(Self {
            program,
            base_args: words.collect(),
            timeout,
        })
    }

    fn query(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut full: Vec<&str> = self.base_args.iter().map(String::as_str).collect();
        full.extend_from_slice(args);
        run_command(&self.program, &full, self.timeout)
    }
}

impl PackageDatabase for Rpm {
    fn owner_of(&self, path: &Path) -> Result<Option<String>> {
        let path_s = path.display().to_string();
        let out = self.query(&["-qf", path_s.as_str()])?;
        if out.exit_code != 0 {
            tracing::debug!(
                path = %path.display(),
                exit_code = out.exit_code,
                "file is not owned by any package"
            );
            return Ok(None);
        }
        Ok(parse_owner(&out.stdout))
    }

    fn metadata_of(&self, package: &str) -> Result<Option<Package>> {
        let out = self.query(&["-q", "--queryformat", METADATA_QUERY_FORMAT, package])?;
        if out.exit_code != 0 {
            tracing::debug!(
                package,
                exit_code = out.exit_code,
                stderr = out.stderr.trim(),
                "package metadata query failed"
            );
            return Ok(None);
        }
        Ok(parse_metadata(package, &out.stdout))
    }
}

fn parse_owner(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

fn parse_metadata(fullname: &str, stdout: &str) -> Option<Package> {
    let mut name = None;
    let mut vendor = None;
    for line in stdout.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match key.trim() {
            "name" if name.is_none() => name = Some(value),
            "vendor" if vendor.is_none() => vendor = Some(value),
            _ => {}
        }
    }

    let name = name.filter(|n| !n.is_empty())?;
    Some(Package {
        fullname: fullname.to_string(),
        name,
        vendor: vendor?,
    })
}
