use clap::{Args, Parser, Subcommand, ValueEnum};
use log::kv::{ToValue, Value};

use crate::export::{ExportFormat, ExportScope};

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Poll a resource and log every state change until Ctrl-C.
    Watch {
        #[command(subcommand)]
        target: WatchTarget,
    },
    /// Download an export file into the configured directory.
    Export(ExportArgs),
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum WatchTarget {
    Statistics,
    ProviderStatistics,
    Booking {
        id: String,
    },
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Args, Debug, PartialEq)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub scope: ScopeArg,
    #[arg(value_enum)]
    pub format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum ScopeArg {
    Admin,
    Provider,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum FormatArg {
    Csv,
    Pdf,
    Excel,
}

impl From<ScopeArg> for ExportScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Admin => ExportScope::Admin,
            ScopeArg::Provider => ExportScope::Provider,
        }
    }
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Excel => ExportFormat::Excel,
        }
    }
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
