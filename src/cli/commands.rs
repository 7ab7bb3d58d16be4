//! CLI command implementations
//!
//! `serve` boots in a fixed order: resolve config, install logging, build
//! the runtime, then hand off to the HTTP server.

use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{init_logging, log_event, Event};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config, host, port } => {
            let config = resolve_config(config.as_deref(), host, port)?;
            serve(config)
        }
        Command::CheckConfig { config } => {
            let config = resolve_config(config.as_deref(), None, None)?;
            check_config(&config, &mut io::stdout())
        }
    }
}

/// Load the config file (or defaults) and apply command-line overrides
pub fn resolve_config(
    path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<HttpServerConfig> {
    let mut config = match path {
        Some(path) => HttpServerConfig::load(path).map_err(CliError::config_error)?,
        None => HttpServerConfig::default(),
    };

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    config.validate().map_err(CliError::config_error)?;
    Ok(config)
}

/// Start the server and block until shutdown
pub fn serve(config: HttpServerConfig) -> CliResult<()> {
    init_logging(config.log_format, &config.log_filter)
        .map_err(|e| CliError::logging_error(e.message()))?;

    log_event(Event::BootStart);
    info!(
        event = %Event::ConfigLoaded,
        addr = %config.socket_addr(),
        route_prefix = %config.route_prefix,
        keep_alive_secs = config.keep_alive_secs,
        "configuration loaded"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(HttpServer::with_config(config).start())
        .map_err(|e| CliError::serve_failed(e.to_string()))
}

/// Print the resolved configuration as JSON
pub fn check_config<W: Write>(config: &HttpServerConfig, out: &mut W) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, config)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
