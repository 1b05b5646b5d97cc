//! SonoVision HTTP server — entry point.

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use sono_vision::FailurePolicy;
use sono_vision_server::config::{ConfigOverrides, ServerConfig};
use sono_vision_server::handlers::EndpointRegistry;
use sono_vision_server::{AppState, HttpTransport};

#[derive(Parser)]
#[command(
    name = "sono-vision-server",
    about = "HTTP server for SonoVision — organ identification, diagnosis and probe navigation",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default).
    Serve(ServeArgs),

    /// Print the endpoint listing as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   sono-vision-server completions bash > ~/.local/share/bash-completion/completions/sono-vision-server
    ///   sono-vision-server completions zsh > ~/.zfunc/_sono-vision-server
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Listen address (host:port).
    #[arg(long)]
    addr: Option<String>,

    /// API key for the vision provider.
    /// Also reads SONO_API_KEY, then CLAUDE_API_KEY.
    #[arg(long)]
    api_key: Option<String>,

    /// Provider base URL; `/chat/completions` is appended.
    /// Also reads SONO_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Model identifier. Also reads SONO_MODEL.
    #[arg(long)]
    model: Option<String>,

    /// Timeout for each provider call, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// What to do when the provider fails: degrade or propagate.
    #[arg(long)]
    failure_policy: Option<FailurePolicy>,

    /// Maximum request body size, in MiB.
    #[arg(long)]
    max_upload_mb: Option<usize>,
}

impl From<ServeArgs> for ConfigOverrides {
    fn from(args: ServeArgs) -> Self {
        ConfigOverrides {
            addr: args.addr,
            api_key: args.api_key,
            base_url: args.base_url,
            model: args.model,
            timeout_secs: args.timeout_secs,
            failure_policy: args.failure_policy,
            max_upload_mb: args.max_upload_mb,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            let config = ServerConfig::resolve(args.into());
            tracing::info!("SonoVision server");
            tracing::info!("Provider: {} ({})", config.provider.base_url, config.provider.model);

            let state = AppState::from_config(&config)?;
            let transport = HttpTransport::new(state, config.max_upload_bytes);
            transport.run(&config.addr).await?;
        }

        Commands::Info => {
            let info = EndpointRegistry::api_info();
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "sono-vision-server", &mut std::io::stdout());
        }
    }

    Ok(())
}
