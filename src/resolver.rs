//! Name to identifier resolution.
//!
//! Users may pass either an OCID or a display name for compartments, images
//! and instances. Literal OCIDs pass through untouched; names are matched
//! exactly (case-sensitive) against a full listing of the relevant scope.
//! When several items share a name the first one in API response order wins.

use tracing::{debug, info, warn};

use crate::error::{OciCliError, ResourceKind, Result};
use crate::oci::{ComputeApi, IdentityApi, ListImagesRequest, ListShapesRequest, collect_pages};

/// OCID prefixes accepted verbatim for compartments.
const COMPARTMENT_PREFIXES: &[&str] = &["ocid1.compartment.oc1.", "ocid1.tenancy.oc1."];

/// OCID prefixes accepted verbatim for images.
const IMAGE_PREFIXES: &[&str] = &["ocid1.image."];

/// OCID prefixes accepted verbatim for instances.
const INSTANCE_PREFIXES: &[&str] = &["ocid1.instance."];

/// Returns true if `input` is already an OCID of `kind`.
///
/// Shapes have no OCID form; they are always addressed by name.
#[must_use]
pub fn is_literal(input: &str, kind: ResourceKind) -> bool {
    let prefixes: &[&str] = match kind {
        ResourceKind::Compartment => COMPARTMENT_PREFIXES,
        ResourceKind::Image => IMAGE_PREFIXES,
        ResourceKind::Instance => INSTANCE_PREFIXES,
        ResourceKind::Shape => &[],
    };
    prefixes.iter().any(|prefix| input.starts_with(prefix))
}

/// Picks the first item whose name equals `name`, warning on duplicates.
fn first_match<'t, T>(
    items: &'t [T],
    name: &str,
    name_of: impl Fn(&T) -> &str,
    kind: ResourceKind,
    scope: &str,
) -> Option<&'t T> {
    let mut matches = items.iter().filter(|item| name_of(item) == name);
    let first = matches.next()?;
    let others = matches.count();
    if others > 0 {
        warn!(
            "Found {} {kind}s named '{name}' in {scope}; using the first one",
            others + 1
        );
    }
    Some(first)
}

/// Resolves user input to OCIDs.
///
/// The tenancy OCID comes from the active profile and is passed in
/// explicitly; it is the root scope for compartments and the fallback scope
/// for platform images.
#[derive(Debug)]
pub struct Resolver<'a, I: ?Sized, C: ?Sized> {
    identity: &'a I,
    compute: &'a C,
    tenancy_id: String,
}

impl<'a, I, C> Resolver<'a, I, C>
where
    I: IdentityApi + ?Sized,
    C: ComputeApi + ?Sized,
{
    /// Creates a resolver scoped to `tenancy_id`.
    #[must_use]
    pub fn new(identity: &'a I, compute: &'a C, tenancy_id: impl Into<String>) -> Self {
        Self {
            identity,
            compute,
            tenancy_id: tenancy_id.into(),
        }
    }

    /// The tenancy (root compartment) OCID.
    #[must_use]
    pub fn tenancy_id(&self) -> &str {
        &self.tenancy_id
    }

    /// The compute API this resolver queries.
    #[must_use]
    pub const fn compute(&self) -> &'a C {
        self.compute
    }

    /// Resolves `input` of any `kind` within the compartment `scope`.
    ///
    /// Compartment names are always looked up under the tenancy root, so
    /// `scope` is ignored for them. Shapes are checked against every shape
    /// offered in `scope` regardless of image.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing matches, or a remote error if a listing
    /// fails.
    pub async fn resolve(&self, input: &str, kind: ResourceKind, scope: &str) -> Result<String> {
        match kind {
            ResourceKind::Compartment => self.resolve_compartment(input).await,
            ResourceKind::Image => self.resolve_image(input, scope).await,
            ResourceKind::Instance => self.resolve_instance(input, scope).await,
            ResourceKind::Shape => {
                let compute = self.compute;
                let request = ListShapesRequest::new(scope);
                let request = &request;
                let shapes = collect_pages(move |page| {
                    let request = request.at_page(page);
                    async move { compute.list_shapes(&request).await }
                })
                .await?;
                first_match(&shapes, input, |s| s.shape.as_str(), kind, scope)
                    .map(|s| s.shape.clone())
                    .ok_or_else(|| {
                        OciCliError::not_found(kind, input, format!("compartment {scope}"))
                    })
            }
        }
    }

    /// Resolves an optional compartment input, defaulting to the tenancy root.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if a name does not match any compartment, or a
    /// remote error if the listing fails.
    pub async fn compartment_or_root(&self, input: Option<&str>) -> Result<String> {
        match input.map(str::trim).filter(|s| !s.is_empty()) {
            Some(input) => self.resolve_compartment(input).await,
            None => Ok(self.tenancy_id.clone()),
        }
    }

    /// Resolves a compartment name or OCID.
    ///
    /// Names are matched against the direct children of the tenancy root.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no compartment has that name, or a remote error
    /// if the listing fails.
    pub async fn resolve_compartment(&self, input: &str) -> Result<String> {
        if is_literal(input, ResourceKind::Compartment) {
            debug!("Compartment input is an OCID: {input}");
            return Ok(input.to_string());
        }

        let identity = self.identity;
        let root = self.tenancy_id.as_str();
        let compartments =
            collect_pages(move |page| identity.list_compartments(root, page)).await?;

        let scope = format!("tenancy root {root}");
        first_match(
            &compartments,
            input,
            |c| c.name.as_str(),
            ResourceKind::Compartment,
            &scope,
        )
        .map(|c| c.id.clone())
        .ok_or_else(|| OciCliError::not_found(ResourceKind::Compartment, input, scope))
    }

    /// Resolves an image display name or OCID.
    ///
    /// Searches `compartment_id` first, then the tenancy root where platform
    /// images live.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if neither scope has an image with that name, or a
    /// remote error if a listing fails.
    pub async fn resolve_image(&self, input: &str, compartment_id: &str) -> Result<String> {
        if is_literal(input, ResourceKind::Image) {
            debug!("Image input is an OCID: {input}");
            return Ok(input.to_string());
        }

        let request = ListImagesRequest::new(compartment_id).with_display_name(input);
        let scope = format!("compartment {compartment_id}");
        if let Some(id) = self.find_image(&request, input, &scope).await? {
            return Ok(id);
        }

        info!("Image '{input}' not found in compartment {compartment_id}, checking platform images");
        let fallback = request.in_compartment(self.tenancy_id.as_str());
        let fallback_scope = format!("platform images (tenancy {})", self.tenancy_id);
        if let Some(id) = self.find_image(&fallback, input, &fallback_scope).await? {
            return Ok(id);
        }

        Err(OciCliError::not_found(
            ResourceKind::Image,
            input,
            format!("{scope} or {fallback_scope}"),
        ))
    }

    async fn find_image(
        &self,
        request: &ListImagesRequest,
        name: &str,
        scope: &str,
    ) -> Result<Option<String>> {
        let compute = self.compute;
        let images =
            collect_pages(move |page| {
                let request = request.at_page(page);
                async move { compute.list_images(&request).await }
            })
            .await?;

        Ok(first_match(&images, name, |i| i.display_name.as_str(), ResourceKind::Image, scope)
            .map(|i| i.id.clone()))
    }

    /// Confirms `shape` is offered for `image_id` in `compartment_id`.
    ///
    /// The API addresses shapes by name, so the name is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the shape is not in the compatible list, or a
    /// remote error if the listing fails.
    pub async fn validate_shape(
        &self,
        shape: &str,
        compartment_id: &str,
        image_id: &str,
    ) -> Result<String> {
        let compute = self.compute;
        let request = ListShapesRequest::new(compartment_id).with_image(image_id);
        let request = &request;
        let shapes = collect_pages(move |page| {
            let request = request.at_page(page);
            async move { compute.list_shapes(&request).await }
        })
        .await?;

        if shapes.iter().any(|s| s.shape == shape) {
            debug!("Shape {shape} is compatible with image {image_id}");
            Ok(shape.to_string())
        } else {
            Err(OciCliError::not_found(
                ResourceKind::Shape,
                shape,
                format!("shapes compatible with image {image_id} in compartment {compartment_id}"),
            ))
        }
    }

    /// Resolves an instance display name or OCID within `compartment_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no instance has that name, or a remote error if
    /// the listing fails.
    pub async fn resolve_instance(&self, input: &str, compartment_id: &str) -> Result<String> {
        if is_literal(input, ResourceKind::Instance) {
            return Ok(input.to_string());
        }

        let compute = self.compute;
        let instances =
            collect_pages(move |page| compute.list_instances(compartment_id, page)).await?;

        let scope = format!("compartment {compartment_id}");
        first_match(
            &instances,
            input,
            |i| i.display_name.as_str(),
            ResourceKind::Instance,
            &scope,
        )
        .map(|i| i.id.clone())
        .ok_or_else(|| OciCliError::not_found(ResourceKind::Instance, input, scope))
    }
}
