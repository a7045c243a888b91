//! Async Login/Logout Example

use anyhow::Context;
use nolfix::prelude::*;
use tracing::info;

mod common;
use common::{ExampleConfig, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cfg = ExampleConfig::from_env();
    info!("Connecting to {}", cfg.sync_addr());

    let mut session = AsyncSession::connect(cfg.session_config())
        .await
        .with_context(|| format!("connecting to {}", cfg.sync_addr()))?;

    session
        .login(&cfg.username, &cfg.password)
        .await
        .context("login")?;
    info!("Login OK, state {}", session.state());

    session
        .logout(&cfg.username, &cfg.password)
        .await
        .context("logout")?;
    session.close().await?;
    info!("Done");
    Ok(())
}
