//! emberkv server entry point.
//!
//! Parses command-line arguments, sets up logging, builds the shared
//! store and command table, and accepts connections until Ctrl+C.

use emberkv::commands::CommandTable;
use emberkv::config::ServerConfig;
use emberkv::session::{handle_connection, SessionStats};
use emberkv::storage::KvStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn print_help() {
    println!(
        r#"
emberkv - An In-Memory Key-Value Server

USAGE:
    emberkv [OPTIONS]

OPTIONS:
        --host <HOST>          Host to bind to (default: 127.0.0.1)
        --port <PORT>          Port to listen on (default: 6379)
        --dir <PATH>           Snapshot directory reported by CONFIG GET (default: /tmp)
        --dbfilename <NAME>    Snapshot file name reported by CONFIG GET (default: dump.rdb)
    -v, --version              Print version information
        --help                 Print this help message

EXAMPLES:
    emberkv                          # Start on 127.0.0.1:6379
    emberkv --port 6380              # Start on port 6380
    emberkv --dir /var/lib/emberkv   # Report a custom snapshot directory

CONNECTING:
    Use redis-cli or any Redis client to connect:
    $ redis-cli -p 6379
    127.0.0.1:6379> PING
    PONG
    127.0.0.1:6379> SET name ember PX 5000
    OK
"#
    );
}

fn parse_config() -> ServerConfig {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help") {
        print_help();
        std::process::exit(0);
    }
    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("emberkv version {}", emberkv::VERSION);
        std::process::exit(0);
    }

    ServerConfig::from_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_help();
        std::process::exit(1);
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = parse_config();

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    // Shared state: one store, one dispatch table, one stats block
    let store = Arc::new(KvStore::new());
    let commands = Arc::new(CommandTable::new(
        Arc::clone(&store),
        Arc::new(config.clone()),
    ));
    let stats = Arc::new(SessionStats::new());
    info!("Store and command table initialized");

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", config.bind_address());

    let shutdown = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Shutdown signal received, stopping server...");
    };

    tokio::select! {
        _ = accept_loop(listener, commands, stats) => {}
        _ = shutdown => {}
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Main loop that accepts incoming connections
async fn accept_loop(
    listener: TcpListener,
    commands: Arc<CommandTable>,
    stats: Arc<SessionStats>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let commands = Arc::clone(&commands);
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    handle_connection(stream, addr, commands, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
