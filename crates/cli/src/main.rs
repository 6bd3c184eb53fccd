mod config_commands;
mod export_commands;
mod plugin_commands;
mod system_commands;
mod team_commands;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod test_support;
mod user_commands;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    mmctl_client::{ApiClient, Client},
    mmctl_config::{MmctlConfig, Severity},
    secrecy::Secret,
    serde::Serialize,
    tracing::{debug, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "mmctl", version, about = "Remote administration for a Mattermost server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Print command results as JSON.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Config file to use instead of the discovered one.
    #[arg(long, global = true, env = "MMCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Server URL (overrides config and MMCTL_URL).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Access token (overrides config and MMCTL_TOKEN).
    #[arg(long, global = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Local config file management and server configuration.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
    /// Health checks and server busy state.
    System {
        #[command(subcommand)]
        action: system_commands::SystemAction,
    },
    /// Team management.
    Team {
        #[command(subcommand)]
        action: team_commands::TeamAction,
    },
    /// User management.
    User {
        #[command(subcommand)]
        action: user_commands::UserAction,
    },
    /// Plugin management.
    Plugin {
        #[command(subcommand)]
        action: plugin_commands::PluginAction,
    },
    /// Bulk export files.
    Export {
        #[command(subcommand)]
        action: export_commands::ExportAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// File config, then environment, then command-line flags.
fn load_settings(cli: &Cli) -> anyhow::Result<MmctlConfig> {
    let config = match &cli.config {
        Some(path) => mmctl_config::load_config(path)?,
        None => mmctl_config::discover_and_load(),
    };
    let mut config = mmctl_config::apply_env_overrides(config);
    if let Some(url) = &cli.url {
        config.server.url = url.clone();
    }
    if let Some(token) = &cli.token {
        config.server.token = Some(Secret::new(token.clone()));
    }
    Ok(config)
}

fn connect(config: &MmctlConfig) -> anyhow::Result<Arc<dyn Client>> {
    let validation = mmctl_config::validate_config(config);
    if let Some(first) = validation
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Error)
    {
        anyhow::bail!("{}: {}", first.path, first.message);
    }
    for d in validation
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
    {
        warn!(path = %d.path, "{}", d.message);
    }

    let client = ApiClient::from_config(&config.server)
        .with_context(|| format!("cannot connect to {}", config.server.url))?;
    debug!(url = %config.server.url, "client ready");
    Ok(Arc::new(client))
}

/// Print `value` as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);
    info!(version = env!("CARGO_PKG_VERSION"), "mmctl starting");

    let config = load_settings(&cli)?;

    match cli.command {
        Commands::Config { action } => {
            config_commands::handle_config(action, &config, cli.config.as_deref(), cli.json).await
        },
        Commands::System { action } => {
            system_commands::handle_system(action, connect(&config)?.as_ref(), cli.json).await
        },
        Commands::Team { action } => {
            team_commands::handle_team(action, connect(&config)?.as_ref(), cli.json).await
        },
        Commands::User { action } => {
            user_commands::handle_user(action, connect(&config)?.as_ref(), cli.json).await
        },
        Commands::Plugin { action } => {
            plugin_commands::handle_plugin(action, connect(&config)?.as_ref(), cli.json).await
        },
        Commands::Export { action } => {
            export_commands::handle_export(action, connect(&config)?.as_ref(), cli.json).await
        },
    }
}
