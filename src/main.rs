use anyhow::{Context, Result};
use autoscript::{AutoManager, CommandRegistry, logging, register_builtins};
use clap::Parser;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Parser, Debug)]
#[command(
    name = "autoscript",
    about = "Run an autonomous script against the built-in commands",
    version
)]
struct Args {
    /// Path to the script file
    #[arg(short, long)]
    script: String,

    /// Control loop period in milliseconds
    #[arg(long, default_value_t = 20)]
    tick_ms: u64,

    /// Pause before the first entry, in milliseconds
    #[arg(long, default_value_t = 0)]
    start_delay_ms: u64,

    /// Length of the autonomous period; anything still running is killed after it
    #[arg(long, default_value_t = 15_000)]
    period_ms: u64,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.json)?;

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);

    let mut manager = AutoManager::new(registry);
    manager
        .load_script(&args.script)
        .with_context(|| format!("Failed to load script file: {}", args.script))?;
    manager.add_start_delay(args.start_delay_ms);

    run(&mut manager, &args).await;
    Ok(())
}

/// Drive the manager at a fixed cadence until the script finishes, the period
/// runs out, or Ctrl-C is pressed.
async fn run(manager: &mut AutoManager, args: &Args) {
    let mut ticker = tokio::time::interval(Duration::from_millis(args.tick_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let period_end = Instant::now() + Duration::from_millis(args.period_ms);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut killed = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !killed && Instant::now() >= period_end {
                    tracing::warn!("autonomous period elapsed");
                    manager.kill_auto();
                    killed = true;
                }
                if manager.process() {
                    break;
                }
            }
            _ = &mut ctrl_c, if !killed => {
                tracing::warn!("interrupted");
                manager.kill_auto();
                killed = true;
            }
        }
    }

    tracing::info!("autonomous script finished");
}
