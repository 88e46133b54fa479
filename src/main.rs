mod activity;
mod api;
mod commands;
mod config;
mod error;
mod notify;
mod session;
mod types;
mod view;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Result;

use crate::config::{Config, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config);

    tracing::info!(
        url = %config.dashboard_url,
        poll_interval_ms = config.poll_interval_ms,
        notification_ttl_ms = config.notification_ttl_ms,
        "card-dashboard starting"
    );

    let api = Arc::new(api::HttpApi::new(config.dashboard_url.clone()));
    let view = Arc::new(
        view::TerminalView::new(std::io::stdout(), true).with_footer(commands::HELP),
    );
    let session = session::DashboardSession::new(
        api,
        view,
        config.poll_interval(),
        config.notification_ttl(),
    );

    session.start();

    tokio::select! {
        _ = commands::run_stdin(session.clone()) => {}
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            } else {
                tracing::info!("ctrl-c received");
            }
        }
    }

    session.stop();
    tracing::info!("card-dashboard stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_level.parse().unwrap_or_default());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
