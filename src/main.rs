//! OCI CLI entrypoint.
//!
//! This is the main entrypoint for the oci-cli command-line tool.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use oci_cli::cli::{
    Cli, Commands, CompartmentCommands, CreateArgs, InstanceCommands, OutputFormatter,
};
use oci_cli::compartments::CompartmentWalker;
use oci_cli::config::{ConfigParser, Profile, default_config_path};
use oci_cli::error::Result;
use oci_cli::instances::{
    InstanceLauncher, InstanceObserver, InstanceQuery, LaunchRequest, compartment_input,
};
use oci_cli::oci::OciClient;
use oci_cli::resolver::Resolver;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    // .env must be loaded before clap reads env-backed flags
    let dotenv = ConfigParser::new().load_dotenv(Path::new("."));
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match dotenv {
        Ok(Some(path)) => info!("Loaded environment from: {}", path.display()),
        Ok(None) => debug!("No .env file in the working directory"),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    // Requests are strictly sequential
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
///
/// Logs go to stderr; stdout carries command output only.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);
    let profile = load_profile(&cli)?;
    let client = OciClient::new(&profile)?;
    let resolver = Resolver::new(&client, &client, profile.tenancy.as_str());

    let output = match cli.command {
        Commands::Instances { command } => match command {
            InstanceCommands::List {
                compartment_id,
                tenancy,
            } => {
                let compartment = compartment_input(tenancy, compartment_id.as_deref());
                cmd_list(resolver, compartment, &formatter).await?
            }
            InstanceCommands::Create(args) => cmd_create(resolver, args, &formatter).await?,
            InstanceCommands::Info {
                id,
                name,
                compartment_id,
            } => {
                cmd_info(
                    resolver,
                    id.as_deref(),
                    name.as_deref(),
                    compartment_id.as_deref(),
                    &formatter,
                )
                .await?
            }
            InstanceCommands::ListImages {
                compartment_id,
                platform,
                os,
                limit,
            } => {
                let observer = InstanceObserver::new(resolver);
                let images = observer
                    .list_images(compartment_id.as_deref(), platform, os.as_deref(), limit)
                    .await?;
                formatter.format_images(&images)
            }
            InstanceCommands::ListShapes {
                compartment_id,
                image_id,
                limit,
            } => {
                let observer = InstanceObserver::new(resolver);
                let shapes = observer
                    .list_shapes(compartment_id.as_deref(), image_id.as_deref(), limit)
                    .await?;
                formatter.format_shapes(&shapes)
            }
        },
        Commands::Compartments {
            command: CompartmentCommands::List,
        } => cmd_compartments(&client, &profile, &formatter).await?,
    };

    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{output}")?;
    stdout.flush()?;
    Ok(())
}

/// Loads the selected profile, applying the region override.
fn load_profile(cli: &Cli) -> Result<Profile> {
    let path = match &cli.config_file {
        Some(path) => path.clone(),
        None => default_config_path(),
    };
    debug!("Using config file {} (profile {})", path.display(), cli.profile);

    let profile = ConfigParser::new().load_profile(&path, &cli.profile)?;
    Ok(match cli.region.as_deref().filter(|r| !r.is_empty()) {
        Some(region) => profile.with_region(region),
        None => profile,
    })
}

/// List instances.
async fn cmd_list(
    resolver: Resolver<'_, OciClient, OciClient>,
    compartment: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<String> {
    let observer = InstanceObserver::new(resolver);
    let instances = observer.list_instances(compartment).await?;
    Ok(formatter.format_instances(&instances))
}

/// Launch an instance.
async fn cmd_create(
    resolver: Resolver<'_, OciClient, OciClient>,
    args: CreateArgs,
    formatter: &OutputFormatter,
) -> Result<String> {
    let request = LaunchRequest::from(args);
    let outcome = InstanceLauncher::new(resolver).launch(&request).await?;
    info!("Instance {} is {}", outcome.instance_id, outcome.lifecycle_state);
    Ok(formatter.format_launch(&outcome))
}

/// Show one instance.
async fn cmd_info(
    resolver: Resolver<'_, OciClient, OciClient>,
    id: Option<&str>,
    name: Option<&str>,
    compartment: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<String> {
    let query = InstanceQuery::from_flags(id, name)?;
    let observer = InstanceObserver::new(resolver);
    let instance = observer.get_instance(&query, compartment).await?;
    Ok(formatter.format_instance(&instance))
}

/// List the compartment tree under the tenancy root.
async fn cmd_compartments(
    client: &OciClient,
    profile: &Profile,
    formatter: &OutputFormatter,
) -> Result<String> {
    info!("Listing compartments under tenancy {}", profile.tenancy);
    let nodes = CompartmentWalker::new(client)
        .collect(&profile.tenancy)
        .await?;
    Ok(formatter.format_compartments(&nodes))
}
