//! Instance, image and shape queries.

use tracing::{debug, info};

use crate::error::{OciCliError, Result};
use crate::oci::{
    ComputeApi, IdentityApi, Image, Instance, ListImagesRequest, ListShapesRequest, Shape,
    collect_pages,
};
use crate::resolver::Resolver;

/// Default page size for image listings.
pub const DEFAULT_IMAGE_LIMIT: u32 = 50;

/// Default page size for shape listings.
pub const DEFAULT_SHAPE_LIMIT: u32 = 100;

/// How `instances info` identifies its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceQuery {
    /// Instance OCID.
    ById(String),
    /// Display name, resolved within a compartment.
    ByName(String),
}

impl InstanceQuery {
    /// Builds a query from the `--id` and `--name` flags.
    ///
    /// # Errors
    ///
    /// Exactly one flag must be given; both or neither is `InvalidInput`.
    pub fn from_flags(id: Option<&str>, name: Option<&str>) -> Result<Self> {
        let id = id.map(str::trim).filter(|s| !s.is_empty());
        let name = name.map(str::trim).filter(|s| !s.is_empty());
        match (id, name) {
            (Some(id), None) => Ok(Self::ById(id.to_string())),
            (None, Some(name)) => Ok(Self::ByName(name.to_string())),
            (Some(_), Some(_)) => Err(OciCliError::invalid_input(
                "--id and --name are mutually exclusive",
            )),
            (None, None) => Err(OciCliError::invalid_input(
                "one of --id or --name is required",
            )),
        }
    }
}

/// Read-only compute queries.
#[derive(Debug)]
pub struct InstanceObserver<'a, I: ?Sized, C: ?Sized> {
    resolver: Resolver<'a, I, C>,
}

impl<'a, I, C> InstanceObserver<'a, I, C>
where
    I: IdentityApi + ?Sized,
    C: ComputeApi + ?Sized,
{
    /// Creates an observer that resolves names through `resolver`.
    #[must_use]
    pub const fn new(resolver: Resolver<'a, I, C>) -> Self {
        Self { resolver }
    }

    /// Lists every instance in a compartment (name, OCID or tenancy root).
    ///
    /// # Errors
    ///
    /// Returns an error if the compartment cannot be resolved or a listing
    /// fails.
    pub async fn list_instances(&self, compartment: Option<&str>) -> Result<Vec<Instance>> {
        let compartment_id = self.resolver.compartment_or_root(compartment).await?;
        info!("Listing instances in {compartment_id}");

        let compute = self.resolver.compute();
        let compartment_id = compartment_id.as_str();
        let instances =
            collect_pages(move |page| compute.list_instances(compartment_id, page)).await?;

        debug!("Found {} instances", instances.len());
        Ok(instances)
    }

    /// Fetches one instance by OCID, or by display name within a compartment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown name, or a remote error.
    pub async fn get_instance(
        &self,
        query: &InstanceQuery,
        compartment: Option<&str>,
    ) -> Result<Instance> {
        let instance_id = match query {
            InstanceQuery::ById(id) => id.clone(),
            InstanceQuery::ByName(name) => {
                let compartment_id = self.resolver.compartment_or_root(compartment).await?;
                self.resolver.resolve_instance(name, &compartment_id).await?
            }
        };

        self.resolver.compute().get_instance(&instance_id).await
    }

    /// Lists one page of images, newest first.
    ///
    /// `platform` queries the tenancy root and ignores `compartment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the compartment cannot be resolved or the listing
    /// fails.
    pub async fn list_images(
        &self,
        compartment: Option<&str>,
        platform: bool,
        operating_system: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Image>> {
        let compartment_id = if platform {
            info!("Listing platform images");
            self.resolver.tenancy_id().to_string()
        } else {
            self.resolver.compartment_or_root(compartment).await?
        };

        let mut request = ListImagesRequest::new(compartment_id)
            .with_limit(limit)
            .newest_first();
        if let Some(os) = operating_system.filter(|s| !s.is_empty()) {
            request = request.with_operating_system(os);
        }

        let page = self.resolver.compute().list_images(&request).await?;
        if page.next_page.is_some() {
            debug!("More images available beyond the first {limit}");
        }
        Ok(page.items)
    }

    /// Lists one page of shapes, optionally only those compatible with an image.
    ///
    /// # Errors
    ///
    /// Returns an error if the compartment cannot be resolved or the listing
    /// fails.
    pub async fn list_shapes(
        &self,
        compartment: Option<&str>,
        image_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Shape>> {
        let compartment_id = self.resolver.compartment_or_root(compartment).await?;

        let mut request = ListShapesRequest::new(compartment_id).with_limit(limit);
        if let Some(image_id) = image_id.filter(|s| !s.is_empty()) {
            request = request.with_image(image_id);
        }

        let page = self.resolver.compute().list_shapes(&request).await?;
        Ok(page.items)
    }
}
