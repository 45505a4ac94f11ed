mod cli;

use clap::{Parser, Subcommand};
use cli::handlers;
use tridentctl_core::process::EXIT_CODE_FAILURE;
use tridentctl_core::services::logging::init_logging;
use tridentctl_core::{OutputFormat, Resolver, SessionConfig};

#[derive(Parser)]
#[command(name = "tridentctl")]
#[command(version)]
#[command(about = "A CLI tool for NetApp Trident")]
#[command(
    long_about = "A CLI tool for managing the NetApp Trident external storage provisioner for Kubernetes"
)]
struct Cli {
    /// Debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Address/port of Trident REST interface (also read from TRIDENT_SERVER)
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Output format. One of json|yaml|name|wide
    #[arg(short, long, global = true)]
    output: Option<OutputFormat>,

    /// Namespace of Trident deployment
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get one or more resources from Trident
    ///
    /// Examples:
    ///   tridentctl get backend
    ///   tridentctl get volume pvc-1234 -o yaml
    Get {
        /// Resource type (backend, volume, storageclass, node, ...)
        resource: String,

        /// Resource names; all resources are listed when omitted
        names: Vec<String>,
    },

    /// Print the version of Trident
    Version,

    /// Print the logs from Trident
    Logs {
        /// Show logs of the previous container instance
        #[arg(short, long)]
        previous: bool,
    },
}

impl Commands {
    /// Name used by mode resolution
    fn name(&self) -> &'static str {
        match self {
            Commands::Get { .. } => "get",
            Commands::Version => "version",
            Commands::Logs { .. } => "logs",
        }
    }
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            server: self.server.clone(),
            namespace: self.namespace.clone(),
            debug: self.debug,
            output: self.output,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = cli.session_config();

    if let Err(e) = init_logging(config.log_level()) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    std::process::exit(run(&cli, &config));
}

fn run(cli: &Cli, config: &SessionConfig) -> i32 {
    let session = match Resolver::new().resolve(config, cli.command.name()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            return e.exit_code();
        }
    };

    let result = match &cli.command {
        Commands::Get { resource, names } => handlers::handle_get(&session, resource, names),
        Commands::Version => handlers::handle_version(&session),
        Commands::Logs { previous } => handlers::handle_logs(&session, *previous),
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        EXIT_CODE_FAILURE
    })
}
