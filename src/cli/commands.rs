//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_PROFILE;
use crate::instances::{DEFAULT_IMAGE_LIMIT, DEFAULT_SHAPE_LIMIT, LaunchRequest};

/// oci-cli - Oracle Cloud Infrastructure compute client.
#[derive(Parser, Debug)]
#[command(name = "oci-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file profile to use.
    #[arg(long, global = true, env = "OCI_CLI_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Path to the OCI config file (defaults to ~/.oci/config).
    #[arg(long, global = true, env = "OCI_CLI_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Region overriding the profile's region.
    #[arg(long, global = true, env = "OCI_CLI_REGION")]
    pub region: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage compute instances.
    Instances {
        /// Instance subcommand.
        #[command(subcommand)]
        command: InstanceCommands,
    },

    /// Explore compartments.
    Compartments {
        /// Compartment subcommand.
        #[command(subcommand)]
        command: CompartmentCommands,
    },
}

/// Instance subcommands.
#[derive(Subcommand, Debug)]
pub enum InstanceCommands {
    /// List instances in a compartment or the tenancy.
    List {
        /// OCID or name of the compartment.
        #[arg(long)]
        compartment_id: Option<String>,

        /// List the tenancy root (ignores --compartment-id).
        #[arg(long)]
        tenancy: bool,
    },

    /// Launch a new instance.
    Create(CreateArgs),

    /// Show details of one instance.
    Info {
        /// OCID of the instance.
        #[arg(long)]
        id: Option<String>,

        /// Display name of the instance.
        #[arg(long)]
        name: Option<String>,

        /// OCID or name of the compartment to search by name.
        #[arg(long)]
        compartment_id: Option<String>,
    },

    /// List compute images, newest first.
    ListImages {
        /// OCID or name of the compartment holding custom images.
        #[arg(long)]
        compartment_id: Option<String>,

        /// List platform images (ignores --compartment-id).
        #[arg(long)]
        platform: bool,

        /// Filter by operating system (e.g. "Oracle Linux").
        #[arg(long)]
        os: Option<String>,

        /// Maximum number of images to return.
        #[arg(long, default_value_t = DEFAULT_IMAGE_LIMIT)]
        limit: u32,
    },

    /// List compute shapes.
    ListShapes {
        /// OCID or name of the compartment.
        #[arg(long)]
        compartment_id: Option<String>,

        /// Only shapes compatible with this image OCID.
        #[arg(long)]
        image_id: Option<String>,

        /// Maximum number of shapes to return.
        #[arg(long, default_value_t = DEFAULT_SHAPE_LIMIT)]
        limit: u32,
    },
}

/// Arguments of `instances create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Display name (generated when omitted).
    #[arg(long)]
    pub name: Option<String>,

    /// OCID or name of the compartment (defaults to the tenancy root).
    #[arg(long)]
    pub compartment_id: Option<String>,

    /// Shape name, e.g. VM.Standard.A1.Flex.
    #[arg(long)]
    pub shape_name: String,

    /// Display name or OCID of the image.
    #[arg(long)]
    pub image_name: String,

    /// OCID of the subnet for the primary VNIC.
    #[arg(long)]
    pub subnet_id: String,

    /// Availability domain, e.g. Uocm:US-ASHBURN-AD-1.
    #[arg(long)]
    pub availability_domain: String,

    /// Comma-separated public SSH keys.
    #[arg(long)]
    pub public_keys: String,

    /// OCPUs for flexible shapes.
    #[arg(long, default_value_t = 0.0)]
    pub ocpus: f32,

    /// Memory in GB for flexible shapes.
    #[arg(long, default_value_t = 0.0)]
    pub memory_in_gbs: f32,
}

impl From<CreateArgs> for LaunchRequest {
    fn from(args: CreateArgs) -> Self {
        Self {
            display_name: args.name,
            compartment: args.compartment_id,
            shape: args.shape_name,
            image: args.image_name,
            subnet_id: args.subnet_id,
            availability_domain: args.availability_domain,
            public_keys: args.public_keys,
            ocpus: args.ocpus,
            memory_in_gbs: args.memory_in_gbs,
        }
    }
}

/// Compartment subcommands.
#[derive(Subcommand, Debug)]
pub enum CompartmentCommands {
    /// List every compartment below the tenancy root as a tree.
    List,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "oci-cli",
            "instances",
            "create",
            "--shape-name",
            "VM.Standard.A1.Flex",
            "--image-name",
            "Canonical-Ubuntu-24.04",
            "--subnet-id",
            "ocid1.subnet.oc1..s",
            "--availability-domain",
            "AD-1",
            "--public-keys",
            "ssh-ed25519 AAA",
            "--ocpus",
            "2",
        ])
        .unwrap();

        let Commands::Instances {
            command: InstanceCommands::Create(args),
        } = cli.command
        else {
            panic!("expected instances create");
        };
        let request = LaunchRequest::from(args);
        assert_eq!(request.shape, "VM.Standard.A1.Flex");
        assert!((request.ocpus - 2.0).abs() < f32::EPSILON);
        assert!(request.memory_in_gbs.abs() < f32::EPSILON);
        assert!(request.display_name.is_none());
    }

    #[test]
    fn test_create_requires_keys() {
        let result = Cli::try_parse_from([
            "oci-cli",
            "instances",
            "create",
            "--shape-name",
            "s",
            "--image-name",
            "i",
            "--subnet-id",
            "n",
            "--availability-domain",
            "ad",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_images_defaults() {
        let cli = Cli::try_parse_from(["oci-cli", "--output", "json", "instances", "list-images", "--platform"])
            .unwrap();
        match cli.command {
            Commands::Instances {
                command: InstanceCommands::ListImages { platform, limit, .. },
            } => {
                assert!(platform);
                assert_eq!(limit, DEFAULT_IMAGE_LIMIT);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
