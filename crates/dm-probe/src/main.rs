use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use dm_core::{
    select_target, DisplayBridge, PlatformDisplaySource, PlatformInjector, SourceId,
};

mod config;
mod watch;

use config::Config;

type Bridge = DisplayBridge<PlatformDisplaySource, PlatformInjector>;

#[derive(Parser, Debug)]
#[command(name = "deskmap-probe")]
#[command(about = "Inspect display sources and drive the pointer on the virtual desktop", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "deskmap.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List display devices in enumeration order
    List {
        /// Include inactive devices
        #[arg(short, long)]
        all: bool,
    },

    /// Resolve a capture source id ("screen:1:0", "1:0" or "1")
    Resolve { source_id: String },

    /// Move the pointer to a virtual desktop position
    Move {
        #[arg(allow_hyphen_values = true)]
        x: i32,
        #[arg(allow_hyphen_values = true)]
        y: i32,
    },

    /// Move the pointer to a fractional position on the display behind a source id
    Remote {
        source_id: String,
        nx: f64,
        ny: f64,

        /// Print the target position without moving the pointer
        #[arg(long)]
        dry_run: bool,
    },

    /// Log display layout changes until Ctrl+C
    Watch {
        /// Poll interval in milliseconds (overrides config)
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config_found = args.config.exists();
    let mut config = if config_found {
        Config::from_file(&args.config)?
    } else {
        Config::default()
    };

    // Apply CLI overrides
    if args.verbose {
        config.logging.level = "debug".into();
    }
    if let Command::Watch { interval_ms: Some(ms) } = &args.command {
        config.watch.interval_ms = *ms;
    }

    // Validate configuration
    config.validate()?;

    init_logging(&config);

    if config_found {
        info!("Loaded configuration from: {}", args.config.display());
    } else {
        warn!("Config file {} not found, using defaults", args.config.display());
    }

    let bridge = Bridge::new(
        PlatformDisplaySource::new(),
        PlatformInjector::new(),
        config.bridge(),
    );

    match args.command {
        Command::List { all } => {
            let devices = if all {
                bridge.displays()?
            } else {
                bridge.active_displays()?
            };
            if args.json {
                print_json(&devices)?;
            } else {
                for d in &devices {
                    match d.mode {
                        Some(m) => println!(
                            "{:>2}. {} {}x{} at ({}, {}) {} Hz{}  [{}]",
                            d.index, d.name, m.width, m.height, m.x, m.y, m.refresh_rate,
                            if d.primary { " primary" } else { "" }, d.description
                        ),
                        None => println!("{:>2}. {} inactive  [{}]", d.index, d.name, d.description),
                    }
                }
            }
        }

        Command::Resolve { source_id } => {
            let id = SourceId::parse(&source_id)?;
            let coords = bridge.try_resolve(id)?;
            if args.json {
                print_json(&coords)?;
            } else {
                let vs = coords.virtual_screen;
                println!("Source {}: {}x{} at ({}, {})", id, coords.width, coords.height, coords.x, coords.y);
                println!("Virtual screen: {}x{} from ({}, {})", vs.width, vs.height, vs.min_x, vs.min_y);
            }
        }

        Command::Move { x, y } => {
            let injected = bridge.try_move_mouse(x, y)?;
            println!("Injected {} event(s)", injected);
        }

        Command::Remote { source_id, nx, ny, dry_run } => {
            let Some(target) = select_target(&bridge, &source_id) else {
                anyhow::bail!("No display for source {:?}", source_id);
            };
            let (x, y) = target.map_normalized(nx, ny);
            println!("Target ({}, {}) on {:?}", x, y, target.bounds);
            if !dry_run {
                let injected = bridge.try_move_mouse(x, y)?;
                println!("Injected {} event(s)", injected);
            }
        }

        Command::Watch { .. } => {
            let every = Duration::from_millis(config.watch.interval_ms);
            let summary = watch::run(&bridge, every, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    std::future::pending::<()>().await;
                }
                info!("Received Ctrl+C, stopping...");
            })
            .await;
            info!("Watched {} ticks, {} layout changes", summary.ticks, summary.changes);
        }
    }

    let stats = bridge.get_stats();
    tracing::debug!("Bridge stats: {:?}", stats);
    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
