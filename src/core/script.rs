use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub package: Option<String>,
    pub is_empty: bool,
}

impl Script {
    pub fn new(path: impl Into<PathBuf>, package: Option<String>, is_empty: bool) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            name,
            path,
            package,
            is_empty,
        }
    }
}
