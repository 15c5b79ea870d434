//! OCI API integration module.
//!
//! This module provides everything that talks to the OCI control plane:
//! typed models, the request signer, the HTTP client and the service traits
//! the rest of the crate is written against.

mod api;
mod client;
mod signer;
mod types;

#[cfg(test)]
pub use api::{MockComputeApi, MockIdentityApi};
pub use api::{ComputeApi, IdentityApi, collect_pages};
pub use client::{Endpoints, OciClient};
pub use signer::{RequestSigner, http_date_now};
pub use types::{
    Compartment, CreateVnicDetails, Image, Instance, InstanceShapeConfig, InstanceSourceDetails,
    LaunchInstanceDetails, LaunchInstanceShapeConfigDetails, ListImagesRequest, ListShapesRequest,
    Page, SSH_AUTHORIZED_KEYS, Shape, ShapeMemoryOptions, ShapeNetworkingBandwidthOptions,
    ShapeOcpuOptions,
};
