//! Service traits implemented by [`OciClient`](super::OciClient).
//!
//! Resolution, traversal and launch logic depend on these traits rather than
//! on the HTTP client, so they can be driven by in-memory fakes.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::future::Future;

use crate::error::Result;

use super::types::{
    Compartment, Image, Instance, LaunchInstanceDetails, ListImagesRequest, ListShapesRequest,
    Page, Shape,
};

/// Identity service operations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Lists one page of the direct children of `parent_id`.
    async fn list_compartments(
        &self,
        parent_id: &str,
        page: Option<String>,
    ) -> Result<Page<Compartment>>;
}

/// Compute service operations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Lists one page of instances in a compartment.
    async fn list_instances(
        &self,
        compartment_id: &str,
        page: Option<String>,
    ) -> Result<Page<Instance>>;

    /// Fetches one instance.
    async fn get_instance(&self, instance_id: &str) -> Result<Instance>;

    /// Lists one page of images.
    async fn list_images(&self, request: &ListImagesRequest) -> Result<Page<Image>>;

    /// Lists one page of shapes.
    async fn list_shapes(&self, request: &ListShapesRequest) -> Result<Page<Shape>>;

    /// Submits a launch. The returned instance is typically `PROVISIONING`.
    async fn launch_instance(&self, details: &LaunchInstanceDetails) -> Result<Instance>;
}

/// Drains a paginated listing, concatenating pages in server order.
///
/// `fetch` receives the continuation token of the previous page (`None` for
/// the first request). The listing ends at the first page without a token.
///
/// # Errors
///
/// Returns the first page error; no partial result is returned.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut token = None;

    loop {
        let page = fetch(token.take()).await?;
        items.extend(page.items);

        match page.next_page {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(items)
}
