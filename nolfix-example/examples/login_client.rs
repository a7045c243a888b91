//! Blocking Login/Status/Logout Example
//!
//! Run `mock_venue` first, or point `NOL_HOST`/`NOL_SYNC_PORT` at a real gateway.

use anyhow::Context;
use nolfix::prelude::*;
use tracing::{info, warn};

mod common;
use common::{ExampleConfig, init_logging};

fn main() -> anyhow::Result<()> {
    init_logging();
    let cfg = ExampleConfig::from_env();
    info!("Connecting to {}", cfg.sync_addr());

    let mut session = Session::connect(cfg.session_config())
        .with_context(|| format!("connecting to {}", cfg.sync_addr()))?;

    match session.login(&cfg.username, &cfg.password) {
        Ok(()) => info!("Login OK"),
        Err(err) if err.is_business() => {
            warn!("Login refused: {err}");
            session.close()?;
            return Ok(());
        }
        Err(err) => return Err(err).context("login"),
    }

    let status = session.status(&cfg.username, &cfg.password)?;
    info!(
        "Status: {} (market depth {})",
        status.status, status.market_depth
    );

    session.logout(&cfg.username, &cfg.password).context("logout")?;
    session.close()?;
    info!("Done");
    Ok(())
}
