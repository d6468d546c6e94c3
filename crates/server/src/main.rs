mod config;
mod session;

use anyhow::Result;
use clap::Parser;

use config::HostConfig;
use session::HostedSession;

#[derive(Parser)]
#[command(name = "skirmish-server")]
#[command(about = "Skirmish authoritative session host")]
struct Args {
    #[arg(short, long, default_value_t = skirmish::DEFAULT_TICK_RATE)]
    tick_rate: u32,

    #[arg(short, long, default_value_t = 2, help = "Number of client replicas")]
    clients: u16,

    #[arg(long, default_value_t = 600, help = "Ticks to run before exiting")]
    ticks: u64,

    #[arg(long, default_value_t = 3, help = "Send movement every Nth tick")]
    sync_interval: u32,

    #[arg(long, default_value_t = 0.0, help = "Packet loss percentage (0-100)")]
    loss_percent: f32,

    #[arg(long, help = "Pace ticks to wall-clock time")]
    realtime: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = HostConfig {
        tick_rate: args.tick_rate,
        client_peers: args.clients,
        run_ticks: args.ticks,
        sync_interval: args.sync_interval,
        loss_percent: args.loss_percent,
        realtime: args.realtime,
    };

    log::info!(
        "Hosting session: {} clients at {} ticks/s",
        config.client_peers,
        config.tick_rate
    );

    let mut session = HostedSession::new(config);
    session.run();

    let stats = session.net_stats();
    log::info!(
        "Session finished after {} ticks: {} packets delivered ({} bytes), {} dropped",
        session.tick(),
        stats.packets_sent,
        stats.bytes_sent,
        stats.packets_dropped
    );

    Ok(())
}
