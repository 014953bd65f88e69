use std::sync::Arc;

use tokio::net::TcpListener;

pub mod config;
use config::{RunMode, load_config};
pub mod http_probe;
use http_probe::prelude::*;
pub mod logging;
pub mod presenter;
use presenter::{Console, DEFAULT_TEMPLATE, Dashboard, TextPresenter};

#[cfg(test)]
mod test_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine, the real environment still applies.
    let _ = dotenvy::dotenv();

    let app_config = load_config()?;
    logging::setup(app_config.log_level);

    let prober = Prober::new(&app_config.probe)?;

    let mode = app_config.mode;
    log::debug!("Selected run mode: {mode:?}");

    match &mode {
        RunMode::Single { url } => {
            TextPresenter::new(Console).run_single(&prober, url).await?;
        }
        RunMode::Text { .. } => {
            TextPresenter::new(Console)
                .run_defaults(&prober, &mode.urls())
                .await?;
        }
        RunMode::Dashboard { listen_addr, urls } => {
            let listener = TcpListener::bind(*listen_addr).await?;
            let dashboard = Arc::new(Dashboard::new(prober, urls.clone(), DEFAULT_TEMPLATE));
            presenter::serve(listener, dashboard).await?;
        }
    }

    Ok(())
}
