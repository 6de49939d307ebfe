//! Drill Server
//!
//! Serves one learner's drill session over HTTP. Each `POST /next` loads the
//! item table, applies the previous answer, saves the table and draws the
//! next question.

use std::io;
use std::net::IpAddr;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use drill_core::{DrillEngine, Scheduler, open_storage};
use drill_server::options::{DataArgs, SchedulerArgs};
use drill_server::server;

/// Adaptive drill scheduler HTTP server
#[derive(Parser)]
#[command(name = "drill-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve an adaptive drill session over HTTP")]
struct Args {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    scheduler: SchedulerArgs,

    /// Address to bind
    #[arg(long, env = "DRILL_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to bind
    #[arg(long, env = "DRILL_PORT", default_value_t = 8000)]
    port: u16,

    /// Seed the draw sequence (reproducible sessions)
    #[arg(long, env = "DRILL_SEED")]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse before logging init so --help/--version print cleanly
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    info!("Drill Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let scheduler = match Scheduler::new(args.scheduler.to_config()) {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid scheduler configuration: {}", e);
            std::process::exit(2);
        }
    };

    let table = args.data.table_path()?;
    let storage = open_storage(&table)?;

    // Any null or malformed value aborts startup
    let store = match storage.load() {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to load item table {}: {}", table.display(), e);
            error!("Hint: create one with `drill import <bank.json>`");
            std::process::exit(1);
        }
    };
    let stats = store.stats(scheduler.config().required_streak);
    info!(
        total = stats.total,
        active = stats.active,
        mastered = stats.mastered_active,
        "Item table loaded from {}",
        storage.describe()
    );

    let session = match args.seed {
        Some(seed) => scheduler.seeded_session(seed),
        None => scheduler.new_session(),
    };
    let engine = DrillEngine::with_parts(storage, scheduler, session);

    server::serve(engine, args.host, args.port).await
}
