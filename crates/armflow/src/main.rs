mod acct;
mod args;
mod commands;
mod output;

use args::{CredentialArgs, EndpointArgs};
use armflow_cloud::Context;
use armflow_cloud_azure::{AzureClientFactory, ClientOptions};
use clap::{Parser, Subcommand};
use output::OutputFormat;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "armflow")]
#[command(about = "Declare it once. Azure Resource Manager converges.", long_about = None)]
struct Cli {
    /// Dry-run: report what would change without changing anything
    #[arg(long, global = true)]
    test: bool,

    /// Profile under `azurerm:` in the acct file
    #[arg(
        long,
        global = true,
        env = "ARMFLOW_PROFILE",
        default_value = armflow_config::DEFAULT_PROFILE
    )]
    profile: String,

    /// acct file to read instead of searching for one
    #[arg(long, global = true)]
    acct_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    output: OutputFormat,

    /// Log at info level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    credentials: CredentialArgs,

    #[command(flatten)]
    endpoints: EndpointArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a resource to a declared state
    #[command(subcommand)]
    State(commands::state::StateCommands),
    /// Call a single management operation
    #[command(subcommand)]
    Exec(commands::exec::ExecCommands),
    /// List the profiles in the acct file
    Profiles,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let ok = match &cli.command {
        Commands::Version => {
            println!("armflow {}", env!("CARGO_PKG_VERSION"));
            true
        }
        Commands::Profiles => commands::profiles::handle(cli.acct_file.as_deref(), cli.output)?,
        Commands::State(command) => {
            let ctx = context(&cli)?;
            let connection_auth = cli.credentials.connection_auth();
            let result = commands::state::handle(&ctx, command, connection_auth.as_ref()).await;
            output::print_state(&result, cli.output)?;
            !result.is_failure()
        }
        Commands::Exec(command) => {
            let ctx = context(&cli)?;
            let connection_auth = cli.credentials.connection_auth();
            let rendered = match ctx.connect(connection_auth.as_ref()) {
                Ok(client) => commands::exec::handle(client.as_ref(), command).await,
                Err(failure) => output::Rendered::failure(&failure),
            };
            output::print_value(&rendered, cli.output)?;
            rendered.ok
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn context(cli: &Cli) -> anyhow::Result<Context> {
    let acct = acct::load(cli.acct_file.as_deref(), &cli.profile)?;
    let factory = AzureClientFactory::with_options(ClientOptions {
        management_endpoint: cli.endpoints.management_endpoint.clone(),
        authority_endpoint: cli.endpoints.authority_endpoint.clone(),
        ..ClientOptions::default()
    });
    Ok(Context::new(Arc::new(factory))
        .with_test(cli.test)
        .with_acct(acct))
}
