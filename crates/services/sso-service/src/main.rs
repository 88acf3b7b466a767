//! SSO Service - gRPC server and provisioning commands.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sso_service_lib::config::SsoServiceConfig;

#[derive(Parser)]
#[command(name = "sso")]
#[command(about = "Single-sign-on credential service")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gRPC server
    #[cfg(feature = "grpc")]
    Serve {
        /// Overrides GRPC_HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides GRPC_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Manage registered applications
    Apps {
        #[command(subcommand)]
        action: AppCommands,
    },
    /// Manage admin grants
    Admins {
        #[command(subcommand)]
        action: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AppCommands {
    /// Register a new application
    Create {
        #[arg(long)]
        name: String,
        /// Token signing secret
        #[arg(long, env = "APP_SECRET", hide_env_values = true)]
        secret: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Grant admin rights to a user
    Grant {
        #[arg(long)]
        user_id: i64,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = SsoServiceConfig::from_env();
    tracing::debug!("Configuration loaded");

    let result = match cli.command {
        #[cfg(feature = "grpc")]
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.grpc.host = host;
            }
            if let Some(port) = port {
                config.grpc.port = port;
            }
            sso_service_lib::run_server(config).await
        }
        Commands::Apps {
            action: AppCommands::Create { name, secret },
        } => sso_service_lib::create_app(&config, &name, &secret)
            .await
            .map(|app_id| println!("{}", app_id)),
        Commands::Admins {
            action: AdminCommands::Grant { user_id },
        } => sso_service_lib::grant_admin(&config, user_id).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
