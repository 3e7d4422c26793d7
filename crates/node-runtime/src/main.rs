//! # Witness-Net Node
//!
//! ```text
//! node-runtime [config.toml]          run a node (path may also come from WN_CONFIG)
//! node-runtime keygen <name> <dir>    write <dir>/<name>.key and <dir>/<name>.json
//! ```
//!
//! Logging is controlled by `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use node_runtime::{keygen, NodeRuntime, NodeSettings};

const USAGE: &str = "usage: node-runtime [config.toml] | node-runtime keygen <name> <dir>";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [command, name, dir] if command == "keygen" => {
            let generated = keygen(name, &PathBuf::from(dir))?;
            println!("{}", generated.key_path.display());
            println!("{}", generated.certificate_path.display());
            Ok(())
        }
        [command, ..] if command == "keygen" => bail!(USAGE),
        [path] => run(PathBuf::from(path)).await,
        [] => match std::env::var("WN_CONFIG") {
            Ok(path) => run(PathBuf::from(path)).await,
            Err(_) => bail!("no config file given and WN_CONFIG is not set\n{USAGE}"),
        },
        _ => bail!(USAGE),
    }
}

async fn run(config_path: PathBuf) -> Result<()> {
    let listen_override = std::env::var("WN_LISTEN").ok();
    let settings = NodeSettings::load(&config_path, listen_override.as_deref())
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let runtime = NodeRuntime::start(settings).await?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
