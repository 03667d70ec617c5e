use colored::Colorize;
use tracing::info;

use clientline_server::{build_schema, ClientlineServer, ServerConfig};
use clientline_service::{ClientService, HubConfig};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Schema => cmd_schema(),
        Command::Config(args) => cmd_config(args),
    }
}

/// Defaults, then the config file, then the environment, then flags.
fn resolve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    println!(
        "{} Clientline on {}{}",
        "▶".green().bold(),
        config.socket_addr().to_string().bold(),
        config.graphql_path.cyan(),
    );
    info!(
        addr = %config.socket_addr(),
        capacity = config.events.channel_capacity,
        overflow = ?config.events.overflow,
        "starting server"
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(ClientlineServer::from_config(config).serve())?;
    info!("server stopped");
    println!("{} Server stopped.", "✓".green());
    Ok(())
}

fn cmd_schema() -> anyhow::Result<()> {
    let schema = build_schema(ClientService::in_memory(HubConfig::default()));
    print!("{}", schema.sdl());
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = ServerConfig::load(args.config.as_deref())?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn flags_override_config() {
        let args = ServeArgs {
            host: Some("127.0.0.1".parse().unwrap()),
            port: Some(9000),
            config: None,
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn missing_config_file_fails() {
        let args = ServeArgs {
            host: None,
            port: None,
            config: Some(PathBuf::from("/nonexistent/clientline.toml")),
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn schema_command_runs() {
        cmd_schema().unwrap();
    }
}
