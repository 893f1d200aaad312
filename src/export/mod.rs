mod scope;
mod sink;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::info;

use crate::client::{Transport, check_status};
use crate::core::DashError;
use crate::resource::{ResourceRequest, TenantContext};

pub use scope::{ExportFormat, ExportScope};
pub use sink::{BlobSink, DirectorySink, ExportBlob};

/// Downloads dashboard exports and hands them to a sink.
pub struct Exporter {
    transport: Arc<dyn Transport>,
    tenant: TenantContext,
    sink: Arc<dyn BlobSink>,
}

impl Exporter {
    pub fn new(
        transport: Arc<dyn Transport>,
        tenant: TenantContext,
        sink: Arc<dyn BlobSink>,
    ) -> Self {
        Self {
            transport,
            tenant,
            sink,
        }
    }

    /// Exports with today's (UTC) date in the filename.
    pub async fn export(
        &self,
        scope: ExportScope,
        format: ExportFormat,
    ) -> Result<String, DashError> {
        self.export_on(scope, format, Utc::now().date_naive()).await
    }

    pub async fn export_on(
        &self,
        scope: ExportScope,
        format: ExportFormat,
        date: NaiveDate,
    ) -> Result<String, DashError> {
        scope.supports(format)?;

        let request = ResourceRequest::get(scope.endpoint())
            .with_tenant(&self.tenant)
            .with_query("format", format.to_string());
        let raw = self.transport.execute(&request).await?;
        check_status(&raw)?;

        let blob = ExportBlob {
            filename: scope.filename(format, date),
            content_type: raw.content_type,
            bytes: raw.body,
        };
        info!("Exported {} {} as '{}'", scope, format, blob.filename);
        self.sink.save(blob).await
    }
}
