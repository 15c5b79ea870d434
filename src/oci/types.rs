//! OCI API types and data structures.
//!
//! Response models mirror the JSON the compute and identity services return.
//! Everything is a read-only snapshot; nothing here is cached.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key carrying newline-delimited SSH public keys.
pub const SSH_AUTHORIZED_KEYS: &str = "ssh_authorized_keys";

/// One page of a listing call.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Continuation token (`opc-next-page`), absent on the last page.
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    /// Creates a final page holding `items`.
    #[must_use]
    pub const fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }

    /// Creates a page followed by `token`.
    #[must_use]
    pub fn with_next(items: Vec<T>, token: impl Into<String>) -> Self {
        Self {
            items,
            next_page: Some(token.into()),
        }
    }
}

/// An identity compartment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compartment {
    /// Compartment OCID.
    pub id: String,
    /// Parent compartment OCID.
    #[serde(default)]
    pub compartment_id: Option<String>,
    /// Compartment name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Lifecycle state.
    #[serde(default)]
    pub lifecycle_state: Option<String>,
}

/// Flexible shape sizing attached to an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceShapeConfig {
    /// Number of OCPUs.
    #[serde(default)]
    pub ocpus: Option<f32>,
    /// Memory in gigabytes.
    #[serde(default, rename = "memoryInGBs")]
    pub memory_in_gbs: Option<f32>,
}

/// A compute instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Instance OCID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Lifecycle state, kept opaque.
    #[serde(default)]
    pub lifecycle_state: String,
    /// Shape name.
    #[serde(default)]
    pub shape: String,
    /// Source image OCID.
    #[serde(default)]
    pub image_id: Option<String>,
    /// Owning compartment OCID.
    #[serde(default)]
    pub compartment_id: String,
    /// Availability domain.
    #[serde(default)]
    pub availability_domain: String,
    /// Fault domain.
    #[serde(default)]
    pub fault_domain: Option<String>,
    /// Region.
    #[serde(default)]
    pub region: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub time_created: Option<String>,
    /// Flexible shape sizing, if any.
    #[serde(default)]
    pub shape_config: Option<InstanceShapeConfig>,
}

/// A compute image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image OCID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Operating system.
    #[serde(default)]
    pub operating_system: String,
    /// Operating system version.
    #[serde(default)]
    pub operating_system_version: Option<String>,
    /// Lifecycle state.
    #[serde(default)]
    pub lifecycle_state: String,
    /// Image this one was derived from.
    #[serde(default)]
    pub base_image_id: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub time_created: Option<String>,
}

/// OCPU range of a flexible shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeOcpuOptions {
    /// Minimum OCPUs.
    #[serde(default)]
    pub min: Option<f32>,
    /// Maximum OCPUs.
    #[serde(default)]
    pub max: Option<f32>,
}

/// Memory range of a flexible shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeMemoryOptions {
    /// Minimum memory in GB.
    #[serde(default, rename = "minInGBs")]
    pub min_in_gbs: Option<f32>,
    /// Maximum memory in GB.
    #[serde(default, rename = "maxInGBs")]
    pub max_in_gbs: Option<f32>,
    /// Default memory per OCPU in GB.
    #[serde(default, rename = "defaultPerOcpuInGBs")]
    pub default_per_ocpu_in_gbs: Option<f32>,
}

/// Network bandwidth range of a flexible shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeNetworkingBandwidthOptions {
    /// Minimum bandwidth in Gbps.
    #[serde(default)]
    pub min_in_gbps: Option<f32>,
    /// Maximum bandwidth in Gbps.
    #[serde(default)]
    pub max_in_gbps: Option<f32>,
    /// Default bandwidth per OCPU in Gbps.
    #[serde(default)]
    pub default_per_ocpu_in_gbps: Option<f32>,
}

/// A compute shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Shape name, e.g. `VM.Standard.A1.Flex`.
    pub shape: String,
    /// Processor description.
    #[serde(default)]
    pub processor_description: Option<String>,
    /// Default OCPU count.
    #[serde(default)]
    pub ocpus: Option<f32>,
    /// Default memory in GB.
    #[serde(default, rename = "memoryInGBs")]
    pub memory_in_gbs: Option<f32>,
    /// OCPU range, present for flexible shapes.
    #[serde(default)]
    pub ocpu_options: Option<ShapeOcpuOptions>,
    /// Memory range, present for flexible shapes.
    #[serde(default)]
    pub memory_options: Option<ShapeMemoryOptions>,
    /// Bandwidth range, present for flexible shapes.
    #[serde(default)]
    pub networking_bandwidth_options: Option<ShapeNetworkingBandwidthOptions>,
    /// Whether the shape is flexible.
    #[serde(default)]
    pub is_flexible: Option<bool>,
}

/// Query for `ListImages`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListImagesRequest {
    /// Compartment to list.
    pub compartment_id: String,
    /// Exact display name filter.
    pub display_name: Option<String>,
    /// Operating system filter.
    pub operating_system: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
    /// Newest first when set.
    pub sort_newest_first: bool,
    /// Continuation token.
    pub page: Option<String>,
}

impl ListImagesRequest {
    /// Creates a query for images in `compartment_id`.
    #[must_use]
    pub fn new(compartment_id: impl Into<String>) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            ..Self::default()
        }
    }

    /// Filters by exact display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Filters by operating system.
    #[must_use]
    pub fn with_operating_system(mut self, os: impl Into<String>) -> Self {
        self.operating_system = Some(os.into());
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sorts by creation time, newest first.
    #[must_use]
    pub const fn newest_first(mut self) -> Self {
        self.sort_newest_first = true;
        self
    }

    /// Returns a copy targeting another compartment.
    #[must_use]
    pub fn in_compartment(&self, compartment_id: impl Into<String>) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            page: None,
            ..self.clone()
        }
    }

    /// Returns a copy asking for `page`.
    #[must_use]
    pub fn at_page(&self, page: Option<String>) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Encodes the query parameters.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("compartmentId", self.compartment_id.clone())];
        if let Some(name) = &self.display_name {
            query.push(("displayName", name.clone()));
        }
        if let Some(os) = &self.operating_system {
            query.push(("operatingSystem", os.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if self.sort_newest_first {
            query.push(("sortBy", "TIMECREATED".to_string()));
            query.push(("sortOrder", "DESC".to_string()));
        }
        if let Some(page) = &self.page {
            query.push(("page", page.clone()));
        }
        query
    }
}

/// Query for `ListShapes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListShapesRequest {
    /// Compartment to list.
    pub compartment_id: String,
    /// Only shapes compatible with this image.
    pub image_id: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
    /// Continuation token.
    pub page: Option<String>,
}

impl ListShapesRequest {
    /// Creates a query for shapes in `compartment_id`.
    #[must_use]
    pub fn new(compartment_id: impl Into<String>) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            ..Self::default()
        }
    }

    /// Restricts to shapes compatible with `image_id`.
    #[must_use]
    pub fn with_image(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns a copy asking for `page`.
    #[must_use]
    pub fn at_page(&self, page: Option<String>) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Encodes the query parameters.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("compartmentId", self.compartment_id.clone())];
        if let Some(image_id) = &self.image_id {
            query.push(("imageId", image_id.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(page) = &self.page {
            query.push(("page", page.clone()));
        }
        query
    }
}

/// VNIC settings for a launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVnicDetails {
    /// Subnet OCID.
    pub subnet_id: String,
}

/// Boot source of a launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "sourceType")]
pub enum InstanceSourceDetails {
    /// Boot from an image.
    #[serde(rename = "image", rename_all = "camelCase")]
    Image {
        /// Image OCID.
        image_id: String,
    },
}

/// Flexible shape sizing requested at launch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceShapeConfigDetails {
    /// Number of OCPUs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocpus: Option<f32>,
    /// Memory in GB.
    #[serde(rename = "memoryInGBs", skip_serializing_if = "Option::is_none")]
    pub memory_in_gbs: Option<f32>,
}

/// Body of `LaunchInstance`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceDetails {
    /// Availability domain, passed through verbatim.
    pub availability_domain: String,
    /// Target compartment OCID.
    pub compartment_id: String,
    /// Display name.
    pub display_name: String,
    /// Shape name.
    pub shape: String,
    /// Flexible shape sizing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_config: Option<LaunchInstanceShapeConfigDetails>,
    /// Primary VNIC.
    pub create_vnic_details: CreateVnicDetails,
    /// Boot source.
    pub source_details: InstanceSourceDetails,
    /// Instance metadata.
    pub metadata: HashMap<String, String>,
}

impl LaunchInstanceDetails {
    /// Returns the source image OCID.
    #[must_use]
    pub fn image_id(&self) -> &str {
        match &self.source_details {
            InstanceSourceDetails::Image { image_id } => image_id,
        }
    }

    /// Returns the packed SSH keys metadata value.
    #[must_use]
    pub fn ssh_authorized_keys(&self) -> Option<&str> {
        self.metadata.get(SSH_AUTHORIZED_KEYS).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_deserializes_camel_case() {
        let json = serde_json::json!({
            "id": "ocid1.instance.oc1..i1",
            "displayName": "web-1",
            "lifecycleState": "RUNNING",
            "shape": "VM.Standard.E4.Flex",
            "imageId": "ocid1.image.oc1..img",
            "compartmentId": "ocid1.compartment.oc1..c1",
            "availabilityDomain": "Uocm:US-ASHBURN-AD-1",
            "faultDomain": "FAULT-DOMAIN-2",
            "shapeConfig": { "ocpus": 2.0, "memoryInGBs": 16.0 }
        });
        let instance: Instance = serde_json::from_value(json).unwrap();
        assert_eq!(instance.display_name, "web-1");
        assert_eq!(instance.fault_domain.as_deref(), Some("FAULT-DOMAIN-2"));
        assert_eq!(
            instance.shape_config.and_then(|c| c.memory_in_gbs),
            Some(16.0)
        );
    }

    #[test]
    fn test_shape_without_flex_options() {
        let shape: Shape = serde_json::from_value(serde_json::json!({
            "shape": "VM.Standard2.1",
            "processorDescription": "2.0 GHz Intel Xeon Platinum 8167M",
            "ocpus": 1.0,
            "memoryInGBs": 15.0
        }))
        .unwrap();
        assert!(shape.ocpu_options.is_none());
        assert!(shape.memory_options.is_none());
        assert_eq!(shape.memory_in_gbs, Some(15.0));
    }

    #[test]
    fn test_launch_details_wire_format() {
        let details = LaunchInstanceDetails {
            availability_domain: "Uocm:US-ASHBURN-AD-1".to_string(),
            compartment_id: "ocid1.compartment.oc1..c1".to_string(),
            display_name: "box".to_string(),
            shape: "VM.Standard.A1.Flex".to_string(),
            shape_config: None,
            create_vnic_details: CreateVnicDetails {
                subnet_id: "ocid1.subnet.oc1..s1".to_string(),
            },
            source_details: InstanceSourceDetails::Image {
                image_id: "ocid1.image.oc1..img".to_string(),
            },
            metadata: HashMap::from([(SSH_AUTHORIZED_KEYS.to_string(), "ssh-ed25519 AAA".to_string())]),
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["sourceDetails"]["sourceType"], "image");
        assert_eq!(json["sourceDetails"]["imageId"], "ocid1.image.oc1..img");
        assert_eq!(json["createVnicDetails"]["subnetId"], "ocid1.subnet.oc1..s1");
        assert!(json.get("shapeConfig").is_none());
        assert_eq!(details.image_id(), "ocid1.image.oc1..img");
    }

    #[test]
    fn test_list_images_query() {
        let request = ListImagesRequest::new("ocid1.tenancy.oc1..t")
            .with_display_name("Oracle Linux 9")
            .with_limit(50)
            .newest_first();
        let query = request.query();
        assert!(query.contains(&("displayName", "Oracle Linux 9".to_string())));
        assert!(query.contains(&("sortBy", "TIMECREATED".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "page"));

        let moved = request.at_page(Some("tok".to_string())).in_compartment("ocid1.compartment.oc1..c");
        assert_eq!(moved.compartment_id, "ocid1.compartment.oc1..c");
        assert_eq!(moved.page, None);
        assert_eq!(moved.display_name.as_deref(), Some("Oracle Linux 9"));
    }
}
