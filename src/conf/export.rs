use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default = "ExportConfig::default_dir")]
    pub dir: PathBuf,
}

impl ExportConfig {
    fn default_dir() -> PathBuf {
        PathBuf::from(".")
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
        }
    }
}
