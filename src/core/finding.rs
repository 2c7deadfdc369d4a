use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remediation {
    pub text: String,
    pub action_needed: bool,
}

impl Remediation {
    pub fn new(text: impl Into<String>, action_needed: bool) -> Self {
        Self {
            text: text.into(),
            action_needed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFinding {
    pub name: String,
    pub path: String,
    pub package: Option<String>,
    pub origin: String,
    pub remediation: Remediation,
}
