use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use tokio_stream::StreamExt;

use dashpoll::client::{HttpTransport, Transport};
use dashpoll::conf::Config;
use dashpoll::core::{CliArgs, Command, WatchTarget, setup_logging};
use dashpoll::export::{DirectorySink, Exporter};
use dashpoll::poller::{PollController, ResourceHandle};
use dashpoll::resource::catalog;
use dashpoll::resource::{
    AdminStatistics, BookingDetails, PageCursor, ProviderStatistics, Resource, Snapshot, User,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "Dashpoll started.");

    let config = match &args.config {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::from_env()?,
    };
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(&config.backend).context("creating HTTP transport")?);
    let tenant = config.backend.tenant_context();

    match args.command {
        Command::Watch { target } => {
            let controller = PollController::with_transport(transport);
            let schedule = config.poll.schedule();
            match target {
                WatchTarget::Statistics => {
                    let handle = controller
                        .start::<AdminStatistics>(catalog::admin_statistics(&tenant), schedule)?;
                    watch(handle, |s| {
                        format!(
                            "users={} bookings={} revenue={}",
                            s.users, s.bookings, s.revenue.total
                        )
                    })
                    .await;
                }
                WatchTarget::ProviderStatistics => {
                    let handle = controller.start::<ProviderStatistics>(
                        catalog::provider_statistics(&tenant),
                        schedule,
                    )?;
                    watch(handle, |s| {
                        format!(
                            "bookings={} earnings={} rating={}",
                            s.bookings, s.earnings, s.rating.average
                        )
                    })
                    .await;
                }
                WatchTarget::Booking { id } => {
                    let request = catalog::booking_status(&id)?;
                    let handle = controller.start::<BookingDetails>(request, schedule)?;
                    watch(handle, |b| {
                        format!("{} status={} payment={}", b.id, b.status, b.payment_status)
                    })
                    .await;
                }
                WatchTarget::Users { page, search } => {
                    let cursor = PageCursor::new(page, config.poll.page_limit)?;
                    let request = catalog::admin_users(&tenant, cursor, search.as_deref());
                    let handle = controller.start::<Vec<User>>(request, schedule)?;
                    watch(handle, |users| {
                        let names: Vec<String> = users.iter().map(User::display_name).collect();
                        names.join(", ")
                    })
                    .await;
                }
            }
        }
        Command::Export(export) => {
            let sink = Arc::new(DirectorySink::from_config(&config.export));
            let exporter = Exporter::new(transport, tenant, sink);
            let location = exporter.export(export.scope.into(), export.format.into()).await?;
            info!("Export saved to {}", location);
        }
    }
    Ok(())
}

/// Logs every snapshot until Ctrl-C, then stops the handle.
async fn watch<P, F>(handle: ResourceHandle<P>, summary: F)
where
    P: Resource,
    F: Fn(&P) -> String,
{
    let mut stream = handle.stream();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            next = stream.next() => match next {
                Some(snapshot) => log_snapshot(handle.key(), &snapshot, &summary),
                None => break,
            },
        }
    }
    handle.stop();
    info!("Dashpoll stopped.");
}

fn log_snapshot<P>(key: &str, snapshot: &Snapshot<P>, summary: &impl Fn(&P) -> String) {
    let body = snapshot.data.as_ref().map(summary).unwrap_or_default();
    match &snapshot.error {
        Some(err) => warn!(
            "[{}] {}: {} (showing last data: {})",
            key,
            snapshot.status,
            err.user_message(),
            body
        ),
        None => info!(
            "[{}] {} {} {}",
            key,
            snapshot.status,
            snapshot.request_key.as_deref().unwrap_or("-"),
            body
        ),
    }
}
