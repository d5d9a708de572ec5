//! mcpi: send one command to a running game
//!
//! Replies are printed to stdout; logs go to stderr (`RUST_LOG` controls the
//! level, default `info`).
//!
//! ```text
//! mcpi chat.post "Hello from Rust"
//! mcpi world.getBlock 0 0 0
//! mcpi --json '[[1, 2, 3], "stone"]' world.setBlock
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use mcpi_connection::{ConnectionConfig, LineConnection, Value};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mcpi", version, about = "Send a command to a Minecraft Pi API endpoint")]
struct Cli {
    /// Host of the game's scripting endpoint
    #[arg(long, default_value = mcpi_connection::config::DEFAULT_HOST)]
    host: String,

    /// Port of the game's scripting endpoint
    #[arg(long, default_value_t = mcpi_connection::config::DEFAULT_PORT)]
    port: u16,

    /// Give up connecting after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Send without waiting for a reply
    #[arg(long)]
    no_reply: bool,

    /// Arguments as a JSON array, instead of positional arguments
    #[arg(long, conflicts_with = "args")]
    json: Option<String>,

    /// Command name, e.g. `world.getBlock`
    command: String,

    /// Command arguments; numbers are sent as numbers, anything else as text
    #[arg(allow_negative_numbers = true)]
    args: Vec<String>,
}

impl Cli {
    fn config(&self) -> ConnectionConfig {
        ConnectionConfig {
            connect_timeout_ms: self.timeout_ms,
            ..ConnectionConfig::new(self.host.clone(), self.port)
        }
    }

    fn values(&self) -> Result<Vec<Value>> {
        match &self.json {
            Some(json) => serde_json::from_str(json).context("--json must be a JSON array"),
            None => Ok(self.args.iter().map(|a| Value::infer(a)).collect()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let args = cli.values()?;
    let conn = LineConnection::new(cli.config());

    conn.open().await?;
    debug!("Connection state: {:?}", conn.state());

    let outcome = if cli.no_reply {
        conn.send(&cli.command, &args).await.map(|()| None)
    } else {
        conn.send_and_receive(&cli.command, &args).await
    };
    conn.close().await;

    match outcome? {
        Some(reply) => println!("{}", reply),
        None if !cli.no_reply => info!("Game closed the connection without replying"),
        None => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_args_are_inferred() {
        let cli = Cli::parse_from(["mcpi", "world.setBlock", "1", "-2", "0.5", "stone"]);
        assert_eq!(
            cli.values().unwrap(),
            vec![
                Value::Int(1),
                Value::Int(-2),
                Value::Float(0.5),
                Value::Str("stone".into()),
            ]
        );
        assert_eq!(cli.config().address(), "localhost:4711");
    }

    #[test]
    fn test_negative_coordinates_after_flags() {
        let cli = Cli::parse_from(["mcpi", "--no-reply", "player.setTile", "-12", "64", "-0.5"]);
        assert!(cli.no_reply);
        assert_eq!(
            cli.values().unwrap(),
            vec![Value::Int(-12), Value::Int(64), Value::Float(-0.5)]
        );
    }

    #[test]
    fn test_json_args_and_overrides() {
        let cli = Cli::parse_from([
            "mcpi",
            "--host",
            "10.0.0.5",
            "--port",
            "4712",
            "--timeout-ms",
            "250",
            "--json",
            "[[1, 2, 3], \"stone\"]",
            "world.setBlock",
        ]);
        let config = cli.config();
        assert_eq!(config.address(), "10.0.0.5:4712");
        assert_eq!(config.connect_timeout_ms, Some(250));
        assert_eq!(
            cli.values().unwrap(),
            vec![
                Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
                Value::Str("stone".into()),
            ]
        );
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let cli = Cli::parse_from(["mcpi", "--json", "{\"x\": 1}", "world.setBlock"]);
        assert!(cli.values().is_err());
    }
}
