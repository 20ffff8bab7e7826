use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use honkytonk_api::setup;
use honkytonk_core::Config;
use honkytonk_sync::{SyncIntervals, SyncScheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let (state, app) = setup::initialize_app(config.clone()).await?;

    let intervals = SyncIntervals::from_config(config.sync());
    let scheduled = SyncScheduler::start(state.runner.clone(), intervals);
    tracing::info!(jobs = scheduled.len(), "Sync scheduler started");

    setup::server::start_server(&config, app).await?;

    for handle in scheduled {
        handle.abort();
    }

    Ok(())
}
