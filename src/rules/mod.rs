use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::{Package, Remediation, Script, ScriptFinding};

pub const DEFAULT_VENDOR_PREFIX: &str = "SUSE LLC";

pub const UNKNOWN_ORIGIN: &str = "(unknown)";

const ORIGIN_CATALOG: &[(&str, &str)] = &[("sapinit", "SAP")];

struct CatalogRemediation {
    name: &'static str,
    text: &'static str,
    action_needed: bool,
}

const REMEDIATION_CATALOG: &[CatalogRemediation] = &[CatalogRemediation {
    name: "sapinit",
    text: "The SAP start service integration still relies on the sapinit init script. \
Switch the SAP instances to the native systemd integration of sapstartsrv \
(see SAP Note 3139184) and remove sapinit from the boot sequence.",
    action_needed: true,
}];

const LOCAL_HOOKS: &[&str] = &["boot.local", "halt.local", "after.local"];

const HOOK_EMPTY_TEXT: &str = "This local customization hook only contains comments. \
It is not used and will be ignored once SysV init support is removed.";

const HOOK_IN_USE_TEXT: &str = "This local customization hook contains commands. \
They will no longer run once SysV init support is removed. \
Move them into a dedicated systemd service unit.";

const VENDOR_TEXT: &str = "This script is shipped by the operating system vendor \
and will be migrated automatically. No action needed.";

const DEFAULT_TEXT: &str = "This script is not shipped by the operating system vendor. \
Contact its author or vendor to get a native systemd service unit, \
and report the issue upstream if none exists.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("script {script} is owned by package {package}, but its metadata could not be resolved")]
    UnresolvedPackage { script: String, package: String },
}

pub fn origin_of(
    script: &Script,
    packages: &BTreeMap<String, Package>,
) -> Result<String, ClassifyError> {
    if let Some((_, origin)) = ORIGIN_CATALOG.iter().find(|(name, _)| *name == script.name) {
        return Ok((*origin).to_string());
    }

    let Some(id) = script.package.as_deref() else {
        return Ok(UNKNOWN_ORIGIN.to_string());
    };

    packages
        .get(id)
        .map(|p| p.vendor.clone())
        .ok_or_else(|| ClassifyError::UnresolvedPackage {
            script: script.name.clone(),
            package: id.to_string(),
        })
}

pub fn remediation_of(
    script: &Script,
    packages: &BTreeMap<String, Package>,
    vendor_prefix: &str,
) -> Remediation {
    if let Some(entry) = REMEDIATION_CATALOG.iter().find(|e| e.name == script.name) {
        return Remediation::new(entry.text, entry.action_needed);
    }

    if LOCAL_HOOKS.contains(&script.name.as_str()) {
        return if script.is_empty {
            Remediation::new(HOOK_EMPTY_TEXT, false)
        } else {
            Remediation::new(HOOK_IN_USE_TEXT, true)
        };
    }

    let vendor_owned = script
        .package
        .as_deref()
        .and_then(|id| packages.get(id))
        .is_some_and(|p| p.vendor.starts_with(vendor_prefix));
    if vendor_owned {
        return Remediation::new(VENDOR_TEXT, false);
    }

    Remediation::new(DEFAULT_TEXT, true)
}

pub fn classify(
    script: &Script,
    packages: &BTreeMap<String, Package>,
    vendor_prefix: &str,
) -> Result<ScriptFinding, ClassifyError> {
    Ok(ScriptFinding {
        name: script.name.clone(),
        path: script.path.display().to_string(),
        package: script.package.clone(),
        origin: origin_of(script, packages)?,
        remediation: remediation_of(script, packages, vendor_prefix),
    })
}
