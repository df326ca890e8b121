//! Binary entrypoint for the tinyquest CLI.
//!
//! Commands:
//! - `start [--bind <addr>]` - validate the world and serve the HTTP API until Ctrl-C
//! - `init [--world <path>]` - create a starter `config.toml`, optionally exporting the built-in world
//! - `status` - print the configuration and a summary of the world
//!
//! See the library crate docs for module-level details: `tinyquest::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use tinyquest::adventure::{canonical_world_seed, load_world_seed, WorldSeed};
use tinyquest::config::Config;
use tinyquest::web::GameServer;

#[derive(Parser)]
#[command(name = "tinyquest")]
#[command(about = "A four-room text adventure served over HTTP")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Start {
        /// Listen address, overrides server.bind (e.g., 0.0.0.0:5000)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Write a default configuration file
    Init {
        /// Also export the built-in world as JSON to this path
        #[arg(short, long)]
        world: Option<String>,
    },
    /// Show configuration and world summary
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start { bind } => {
            let mut config = Config::load(&cli.config).await?;
            if let Some(bind) = bind {
                config.server.bind = bind;
                config.validate()?;
            }
            init_logging(Some(&config), cli.verbose);
            info!("Starting tinyquest v{}", env!("CARGO_PKG_VERSION"));

            let seed = load_seed(&config)?;
            let server = GameServer::bind(&config, seed).await?;
            server
                .run_until(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!("Failed to listen for Ctrl-C: {}", e);
                    }
                })
                .await?;
            info!("tinyquest stopped");
        }
        Commands::Init { world } => {
            init_logging(None, cli.verbose);
            info!("Initializing new tinyquest configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);

            if let Some(path) = world {
                let rooms = canonical_world_seed();
                let serialized = serde_json::to_string_pretty(&rooms)?;
                tokio::fs::write(&path, serialized)
                    .await
                    .map_err(|e| anyhow!("Failed to write world file {}: {}", path, e))?;
                info!(
                    "Built-in world exported to {} (set game.world_file to use it)",
                    path
                );
            }
        }
        Commands::Status => {
            let config = Config::load(&cli.config).await?;
            init_logging(Some(&config), cli.verbose);
            let seed = load_seed(&config)?;
            print_status(&config, &seed);
        }
    }

    Ok(())
}

fn load_seed(config: &Config) -> Result<WorldSeed> {
    load_world_seed(config.game.world_file.as_deref()).map_err(|e| {
        error!("World validation failed: {}", e);
        anyhow!("Invalid world: {}", e)
    })
}

fn print_status(config: &Config, seed: &WorldSeed) {
    println!("tinyquest v{}", env!("CARGO_PKG_VERSION"));
    println!("  bind:           {}", config.server.bind);
    println!("  allow origin:   {}", config.server.allow_origin);
    println!(
        "  sessions:       {} named, {} min idle timeout",
        config.server.max_sessions, config.server.session_timeout
    );
    println!(
        "  world:          {}",
        config.game.world_file.as_deref().unwrap_or("built-in")
    );
    match config.game.combat_seed {
        Some(s) => println!("  combat seed:    {}", s),
        None => println!("  combat seed:    random per session"),
    }
    println!("Rooms ({}):", seed.rooms().len());
    for room in seed.rooms() {
        let exits: Vec<String> = room
            .exits
            .iter()
            .map(|(dir, target)| match room.locked.get(dir) {
                Some(item) => format!("{} -> {} [needs {}]", dir, target, item),
                None => format!("{} -> {}", dir, target),
            })
            .collect();
        println!("  {}: {}", room.id, exits.join(", "));
        if !room.items.is_empty() {
            println!("    items: {}", room.items.join(", "));
        }
        if let Some(enemy) = &room.enemy {
            println!(
                "    enemy: {} ({} health, {} attack)",
                enemy.name, enemy.health, enemy.attack
            );
        }
    }
}

fn init_logging(config: Option<&Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity raises the configured level
    let configured = config
        .map(|c| c.logging.level_filter())
        .unwrap_or(log::LevelFilter::Info);
    let base_level = match verbosity {
        0 => configured,
        1 => configured.max(log::LevelFilter::Debug),
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Mirror to the console only when running in the foreground
        let is_tty = atty::is(atty::Stream::Stdout);

        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());

            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }

            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
