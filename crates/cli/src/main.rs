use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::commands::{self, ModelsCommand};
use cli::progress::Spinner;
use cli::ChatHandler;
use common::{
    init_structured_logging, EnvConfig, LoggingConfig, QbraidRcConfig, SessionState, SessionStore,
    StaticConfig, UserConfigProvider,
};
use console::style;
use router::{AgentRouter, DispatcherConfig};
use services::{QbraidClient, ServiceClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{stdin, stdout, BufReader};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "qbraid-chat")]
#[command(about = "Chat with qBraid models and query your quantum devices and jobs")]
#[command(version)]
struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: Level,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Per-call timeout for remote requests
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Concurrent calls when querying services
    #[arg(long, global = true, default_value_t = 3)]
    max_concurrency: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the reply
    Ask {
        message: String,
    },
    /// Serve the chat panel protocol as JSON lines on stdin/stdout
    Chat,
    /// List chat models or select one
    Models(ModelsCommand),
    /// Toggle routing of questions to the qBraid services
    AgentBehavior,
    /// Save an API key to the qbraidrc file
    SetApiKey {
        key: String,
    },
    /// Use a different qbraidrc file
    SetRcPath {
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_structured_logging(
        LoggingConfig::default()
            .with_level(cli.log_level)
            .json(cli.json_logs),
    )?;

    let store = SessionStore::default_location()?;
    debug!(session = %store.path().display(), "Session store");
    let remote = RemoteOptions {
        timeout: cli.timeout_secs.map(Duration::from_secs),
        max_concurrency: cli.max_concurrency,
    };

    match cli.command {
        Commands::Ask { message } => {
            let router = build_router(&remote, &store.load()?)?;
            let model = commands::resolve_model(router.api(), &store).await?;
            let context = store.load()?.context();

            let spinner = Spinner::start(&format!("Asking {}...", model.model));
            match router.process_user_request(context, &model, &message).await {
                Ok(reply) => {
                    spinner.finish_and_clear();
                    println!("{reply}");
                }
                Err(e) => {
                    spinner.finish_error("Request failed");
                    return Err(e.into());
                }
            }
        }
        Commands::Chat => {
            let router = build_router(&remote, &store.load()?)?;
            let model = commands::resolve_model(router.api(), &store).await?;
            let mut handler = ChatHandler::new(router, store, model);
            let mut out = stdout();
            handler.run(BufReader::new(stdin()), &mut out).await?;
        }
        Commands::Models(command) => {
            let api = build_client(&remote, &store.load()?)?;
            command.execute(&api, &store).await?;
        }
        Commands::AgentBehavior => {
            let status = commands::switch_agent_behavior(&store)?;
            println!("{}", style(status).bold());
        }
        Commands::SetApiKey { key } => {
            commands::set_api_key(&store, &key).context("Failed to save API key")?;
            println!("{}", style("API key saved").green());
        }
        Commands::SetRcPath { path } => {
            commands::set_rc_path(&store, &path)?;
            println!("qbraidrc path set to {}", style(&path).cyan());
        }
    }

    Ok(())
}

struct RemoteOptions {
    timeout: Option<Duration>,
    max_concurrency: usize,
}

/// Environment credentials win over the qbraidrc file.
fn config_provider(state: &SessionState) -> Arc<dyn UserConfigProvider> {
    match EnvConfig::load() {
        Some(config) => {
            debug!("Using credentials from environment");
            Arc::new(StaticConfig(config))
        }
        None => Arc::new(QbraidRcConfig::new(state.qbraidrc_path())),
    }
}

fn build_client(remote: &RemoteOptions, state: &SessionState) -> Result<QbraidClient> {
    let http = match remote.timeout {
        Some(timeout) => ServiceClient::with_timeout(timeout)?,
        None => ServiceClient::new(),
    };
    Ok(QbraidClient::with_service_client(config_provider(state), http))
}

fn build_router(remote: &RemoteOptions, state: &SessionState) -> Result<AgentRouter<QbraidClient>> {
    let config = DispatcherConfig {
        max_concurrency: remote.max_concurrency,
        call_timeout: remote.timeout,
    };
    Ok(AgentRouter::with_config(build_client(remote, state)?, config))
}
