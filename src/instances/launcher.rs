//! Instance launch orchestration.
//!
//! A launch is validated and resolved step by step: SSH keys first (no
//! network), then compartment, image and shape, and finally a single launch
//! call. The launcher does not wait for the instance to leave
//! `PROVISIONING`.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

use crate::error::{OciCliError, Result};
use crate::oci::{
    ComputeApi, CreateVnicDetails, IdentityApi, InstanceSourceDetails, LaunchInstanceDetails,
    LaunchInstanceShapeConfigDetails, SSH_AUTHORIZED_KEYS,
};
use crate::resolver::Resolver;

/// Flags of `instances create`.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    /// Display name; generated when absent.
    pub display_name: Option<String>,
    /// Compartment name or OCID; tenancy root when absent.
    pub compartment: Option<String>,
    /// Shape name.
    pub shape: String,
    /// Image display name or OCID.
    pub image: String,
    /// Subnet OCID for the primary VNIC.
    pub subnet_id: String,
    /// Availability domain, passed through verbatim.
    pub availability_domain: String,
    /// Comma-separated public keys.
    pub public_keys: String,
    /// OCPUs for flexible shapes; zero means unset.
    pub ocpus: f32,
    /// Memory in GB for flexible shapes; zero means unset.
    pub memory_in_gbs: f32,
}

/// What a launch produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOutcome {
    /// OCID of the new instance.
    pub instance_id: String,
    /// Display name sent to the API.
    pub display_name: String,
    /// Lifecycle state reported by the launch response.
    pub lifecycle_state: String,
    /// Compartment the instance was launched into.
    pub compartment_id: String,
    /// Image the instance boots from.
    pub image_id: String,
    /// Shape name.
    pub shape: String,
}

/// Joins comma-separated public keys into the metadata format.
///
/// # Errors
///
/// Returns `InvalidInput` if no non-empty key remains.
pub fn pack_ssh_keys(raw: &str) -> Result<String> {
    let keys: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect();
    if keys.is_empty() {
        return Err(OciCliError::invalid_input(
            "at least one public SSH key is required (--public-keys)",
        ));
    }
    Ok(keys.join("\n"))
}

/// Generated display name, `instance-YYYYMMDD-HHMM`.
#[must_use]
pub fn default_display_name(now: DateTime<Local>) -> String {
    format!("instance-{}", now.format("%Y%m%d-%H%M"))
}

/// Rejects sizing values the API cannot accept.
///
/// # Errors
///
/// Returns `InvalidInput` for a negative, NaN or infinite value.
pub fn validate_sizing(ocpus: f32, memory_in_gbs: f32) -> Result<()> {
    for (flag, value) in [("--ocpus", ocpus), ("--memory-in-gbs", memory_in_gbs)] {
        if !value.is_finite() || value < 0.0 {
            return Err(OciCliError::invalid_input(format!(
                "{flag} must be a non-negative number, got {value}"
            )));
        }
    }
    Ok(())
}

/// Shape configuration for flexible shapes.
///
/// Zero values are treated as unset; `None` when both are unset. Any
/// non-zero value is kept, so out-of-range input must be rejected with
/// [`validate_sizing`] first.
#[must_use]
pub fn shape_config(ocpus: f32, memory_in_gbs: f32) -> Option<LaunchInstanceShapeConfigDetails> {
    let ocpus = (ocpus != 0.0).then_some(ocpus);
    let memory_in_gbs = (memory_in_gbs != 0.0).then_some(memory_in_gbs);
    if ocpus.is_none() && memory_in_gbs.is_none() {
        return None;
    }
    Some(LaunchInstanceShapeConfigDetails {
        ocpus,
        memory_in_gbs,
    })
}

/// Launches instances.
#[derive(Debug)]
pub struct InstanceLauncher<'a, I: ?Sized, C: ?Sized> {
    resolver: Resolver<'a, I, C>,
}

impl<'a, I, C> InstanceLauncher<'a, I, C>
where
    I: IdentityApi + ?Sized,
    C: ComputeApi + ?Sized,
{
    /// Creates a launcher that resolves names through `resolver`.
    #[must_use]
    pub const fn new(resolver: Resolver<'a, I, C>) -> Self {
        Self { resolver }
    }

    /// Validates, resolves and submits a launch.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for missing keys, bad sizing or required flags, `NotFound`
    /// when a name cannot be resolved, or the launch call's error.
    pub async fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutcome> {
        let ssh_keys = pack_ssh_keys(&request.public_keys)?;
        validate_sizing(request.ocpus, request.memory_in_gbs)?;
        for (flag, value) in [
            ("--shape-name", &request.shape),
            ("--image-name", &request.image),
            ("--subnet-id", &request.subnet_id),
            ("--availability-domain", &request.availability_domain),
        ] {
            if value.trim().is_empty() {
                return Err(OciCliError::invalid_input(format!("{flag} is required")));
            }
        }

        let compartment_id = self
            .resolver
            .compartment_or_root(request.compartment.as_deref())
            .await?;
        let image_id = self
            .resolver
            .resolve_image(&request.image, &compartment_id)
            .await?;
        let shape = self
            .resolver
            .validate_shape(&request.shape, &compartment_id, &image_id)
            .await?;

        let display_name = request
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| default_display_name(Local::now()), String::from);

        let details = LaunchInstanceDetails {
            availability_domain: request.availability_domain.clone(),
            compartment_id: compartment_id.clone(),
            display_name: display_name.clone(),
            shape: shape.clone(),
            shape_config: shape_config(request.ocpus, request.memory_in_gbs),
            create_vnic_details: CreateVnicDetails {
                subnet_id: request.subnet_id.clone(),
            },
            source_details: InstanceSourceDetails::Image {
                image_id: image_id.clone(),
            },
            metadata: HashMap::from([(SSH_AUTHORIZED_KEYS.to_string(), ssh_keys)]),
        };

        info!("Launching instance '{display_name}' ({shape}) in {compartment_id}");
        let instance = self.resolver.compute().launch_instance(&details).await?;
        info!(
            "Launch accepted: {} ({})",
            instance.id, instance.lifecycle_state
        );

        Ok(LaunchOutcome {
            instance_id: instance.id,
            display_name,
            lifecycle_state: instance.lifecycle_state,
            compartment_id,
            image_id,
            shape,
        })
    }
}
