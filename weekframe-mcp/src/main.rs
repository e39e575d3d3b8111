//! Weekframe MCP Server
//!
//! Newline-delimited JSON-RPC 2.0 over stdio. Tools are generated from the
//! standard function registry; see `server` for the protocol surface.
//!
//! Environment:
//! - `WEEKFRAME_LOG_LEVEL`: tracing filter when `RUST_LOG` is unset (default `info`)
//! - `WEEKFRAME_LOG_FORMAT`: `pretty` or `json`
//! - `WEEKFRAME_SCHEME`: default column scheme, `ikea` or `iso`
//! - `WEEKFRAME_TIMEFRAMES`: accepted timeframes, e.g. `week,month`

mod config;
mod server;

use config::ServerConfig;
use server::{Server, PROTOCOL_VERSION, SERVER_VERSION};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    config.logging.init();

    let server = Server::new(weekframe_std::standard_registry(), config.call_context());
    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        scheme = %config.scheme,
        timeframes = %config.valid_timeframes,
        "weekframe MCP server ready"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("client disconnected (EOF)");
                break;
            }
            Err(e) => {
                error!(error = %e, "failed to read stdin");
                return Err(e.into());
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(response) = server.handle_line(line) {
            stdout.write_all(response.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    info!("server shutting down");
    Ok(())
}
