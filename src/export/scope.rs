use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::DashError;

/// Which dashboard the export is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    Admin,
    Provider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
    Excel,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportScope::Admin => f.write_str("admin"),
            ExportScope::Provider => f.write_str("provider"),
        }
    }
}

impl ExportScope {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ExportScope::Admin => "/api/admin/export",
            ExportScope::Provider => "/api/provider/export",
        }
    }

    pub fn formats(&self) -> &'static [ExportFormat] {
        match self {
            ExportScope::Admin => &[ExportFormat::Csv, ExportFormat::Pdf, ExportFormat::Excel],
            ExportScope::Provider => &[ExportFormat::Csv, ExportFormat::Excel],
        }
    }

    pub fn supports(&self, format: ExportFormat) -> Result<(), DashError> {
        if self.formats().contains(&format) {
            Ok(())
        } else {
            Err(DashError::InvalidRequest(format!(
                "{} export does not support {}",
                self, format
            )))
        }
    }

    /// The format name doubles as extension, so Excel exports end in `.excel`.
    pub fn filename(&self, format: ExportFormat, date: NaiveDate) -> String {
        let prefix = match self {
            ExportScope::Admin => "dashboard",
            ExportScope::Provider => "provider-data",
        };
        format!("{}-{}-{}.{}", prefix, format, date.format("%Y-%m-%d"), format)
    }
}
