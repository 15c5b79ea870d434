//! Output formatting for CLI commands.
//!
//! This module renders API models as tables (text) or pretty JSON.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::compartments::CompartmentNode;
use crate::instances::LaunchOutcome;
use crate::oci::{Image, Instance, Shape};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Instance row for table display.
#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Shape")]
    shape: String,
    #[tabled(rename = "Availability Domain")]
    availability_domain: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Image row for table display.
#[derive(Tabled)]
struct ImageRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "OS")]
    os: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Base Image")]
    base_image: String,
}

/// Shape row for table display.
#[derive(Tabled)]
struct ShapeRow {
    #[tabled(rename = "Shape")]
    shape: String,
    #[tabled(rename = "OCPUs")]
    ocpus: String,
    #[tabled(rename = "Memory (GB)")]
    memory: String,
    #[tabled(rename = "GB/OCPU")]
    memory_per_ocpu: String,
    #[tabled(rename = "Network (Gbps)")]
    network: String,
    #[tabled(rename = "Flex")]
    flexible: String,
    #[tabled(rename = "Processor")]
    processor: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats an instance listing.
    #[must_use]
    pub fn format_instances(&self, instances: &[Instance]) -> String {
        match self.format {
            OutputFormat::Json => Self::json(instances),
            OutputFormat::Text => {
                if instances.is_empty() {
                    return "No instances found.\n".to_string();
                }
                let rows: Vec<InstanceRow> = instances
                    .iter()
                    .map(|i| InstanceRow {
                        name: i.display_name.clone(),
                        state: Self::format_state(&i.lifecycle_state),
                        shape: i.shape.clone(),
                        availability_domain: i.availability_domain.clone(),
                        id: i.id.clone(),
                    })
                    .collect();
                let mut output = Table::new(rows).to_string();
                let _ = write!(output, "\n\n{} instance(s)\n", instances.len());
                output
            }
        }
    }

    /// Formats the details of one instance.
    #[must_use]
    pub fn format_instance(&self, instance: &Instance) -> String {
        match self.format {
            OutputFormat::Json => Self::json(instance),
            OutputFormat::Text => {
                let mut output = String::new();
                let _ = writeln!(output, "\n{}", instance.display_name.bold());
                let _ = writeln!(output, "   ID: {}", instance.id);
                let _ = writeln!(
                    output,
                    "   State: {}",
                    Self::format_state(&instance.lifecycle_state)
                );
                let _ = writeln!(output, "   Shape: {}", instance.shape);
                if let Some(config) = &instance.shape_config {
                    if let Some(ocpus) = config.ocpus {
                        let _ = writeln!(output, "   OCPUs: {ocpus}");
                    }
                    if let Some(memory) = config.memory_in_gbs {
                        let _ = writeln!(output, "   Memory: {memory} GB");
                    }
                }
                let _ = writeln!(output, "   Availability domain: {}", instance.availability_domain);
                if let Some(fault_domain) = &instance.fault_domain {
                    let _ = writeln!(output, "   Fault domain: {fault_domain}");
                }
                if let Some(region) = &instance.region {
                    let _ = writeln!(output, "   Region: {region}");
                }
                let _ = writeln!(output, "   Compartment: {}", instance.compartment_id);
                if let Some(image_id) = &instance.image_id {
                    let _ = writeln!(output, "   Image: {image_id}");
                }
                if let Some(created) = &instance.time_created {
                    let _ = writeln!(output, "   Created: {created}");
                }
                output
            }
        }
    }

    /// Formats an image listing.
    #[must_use]
    pub fn format_images(&self, images: &[Image]) -> String {
        match self.format {
            OutputFormat::Json => Self::json(images),
            OutputFormat::Text => {
                if images.is_empty() {
                    return "No images found.\n".to_string();
                }
                let rows: Vec<ImageRow> = images
                    .iter()
                    .map(|i| ImageRow {
                        name: i.display_name.clone(),
                        os: match &i.operating_system_version {
                            Some(version) => format!("{} {version}", i.operating_system),
                            None => i.operating_system.clone(),
                        },
                        state: Self::format_state(&i.lifecycle_state),
                        created: i.time_created.clone().unwrap_or_default(),
                        id: i.id.clone(),
                        base_image: i.base_image_id.clone().unwrap_or_default(),
                    })
                    .collect();
                let mut output = Table::new(rows).to_string();
                output.push('\n');
                output
            }
        }
    }

    /// Formats a shape listing.
    #[must_use]
    pub fn format_shapes(&self, shapes: &[Shape]) -> String {
        match self.format {
            OutputFormat::Json => Self::json(shapes),
            OutputFormat::Text => {
                if shapes.is_empty() {
                    return "No shapes found.\n".to_string();
                }
                let rows: Vec<ShapeRow> = shapes.iter().map(Self::shape_row).collect();
                let mut output = Table::new(rows).to_string();
                output.push('\n');
                output
            }
        }
    }

    fn shape_row(shape: &Shape) -> ShapeRow {
        // flexible shapes report a range rather than a fixed size
        let ocpus = match &shape.ocpu_options {
            Some(options) if shape.is_flexible == Some(true) => {
                Self::range(options.min, options.max)
            }
            _ => Self::number(shape.ocpus),
        };
        let memory = match &shape.memory_options {
            Some(options) if shape.is_flexible == Some(true) => {
                Self::range(options.min_in_gbs, options.max_in_gbs)
            }
            _ => Self::number(shape.memory_in_gbs),
        };

        let memory_per_ocpu = Self::number(
            shape
                .memory_options
                .as_ref()
                .and_then(|o| o.default_per_ocpu_in_gbs),
        );
        let network = shape
            .networking_bandwidth_options
            .as_ref()
            .map(|o| Self::range(o.min_in_gbps, o.max_in_gbps))
            .unwrap_or_default();

        ShapeRow {
            shape: shape.shape.clone(),
            ocpus,
            memory,
            memory_per_ocpu,
            network,
            flexible: if shape.is_flexible == Some(true) { "yes" } else { "no" }.to_string(),
            processor: shape.processor_description.clone().unwrap_or_default(),
        }
    }

    /// Formats a compartment walk as an indented tree.
    #[must_use]
    pub fn format_compartments(&self, nodes: &[CompartmentNode]) -> String {
        match self.format {
            OutputFormat::Json => Self::json(nodes),
            OutputFormat::Text => {
                if nodes.is_empty() {
                    return "No compartments found.\n".to_string();
                }
                let mut output = String::new();
                for node in nodes {
                    let _ = write!(
                        output,
                        "{}- {} ({})",
                        "  ".repeat(node.depth),
                        node.compartment.name.bold(),
                        node.compartment.id.dimmed()
                    );
                    let description = node.compartment.description.trim();
                    if description.is_empty() {
                        output.push('\n');
                    } else {
                        let _ = writeln!(output, ": {description}");
                    }
                }
                let _ = write!(output, "\n{} compartment(s)\n", nodes.len());
                output
            }
        }
    }

    /// Formats the result of a launch.
    #[must_use]
    pub fn format_launch(&self, outcome: &LaunchOutcome) -> String {
        match self.format {
            OutputFormat::Json => Self::json(outcome),
            OutputFormat::Text => {
                let mut output = format!(
                    "{} Launched instance '{}'\n\n",
                    "✓".green(),
                    outcome.display_name
                );
                let _ = writeln!(output, "   ID: {}", outcome.instance_id);
                let _ = writeln!(
                    output,
                    "   State: {}",
                    Self::format_state(&outcome.lifecycle_state)
                );
                let _ = writeln!(output, "   Shape: {}", outcome.shape);
                let _ = writeln!(output, "   Image: {}", outcome.image_id);
                let _ = writeln!(output, "   Compartment: {}", outcome.compartment_id);
                output
            }
        }
    }

    /// Colors a lifecycle state.
    fn format_state(state: &str) -> String {
        match state {
            "RUNNING" | "AVAILABLE" | "ACTIVE" => state.green().to_string(),
            "PROVISIONING" | "STARTING" | "STOPPING" | "CREATING" | "IMPORTING" => {
                state.yellow().to_string()
            }
            "STOPPED" | "TERMINATING" | "TERMINATED" | "DELETED" | "FAILED" => {
                state.red().to_string()
            }
            _ => state.dimmed().to_string(),
        }
    }

    fn number(value: Option<f32>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    fn range(min: Option<f32>, max: Option<f32>) -> String {
        match (min, max) {
            (Some(min), Some(max)) => format!("{min}-{max}"),
            (min, max) => Self::number(min.or(max)),
        }
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_default()
    }
}
