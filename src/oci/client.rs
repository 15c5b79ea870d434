//! OCI REST API client implementation.
//!
//! This module provides the signed HTTP client for the compute (`iaas`) and
//! identity endpoints. It owns every wire concern: URLs, query encoding,
//! signing, pagination headers and error bodies.

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use crate::config::Profile;
use crate::error::{OciCliError, RemoteError, Result};

use super::api::{ComputeApi, IdentityApi};
use super::signer::{RequestSigner, http_date_now};
use super::types::{
    Compartment, Image, Instance, LaunchInstanceDetails, ListImagesRequest, ListShapesRequest,
    Page, Shape,
};

/// API version path prefix shared by compute and identity.
const API_VERSION: &str = "/20160918";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Response header carrying the continuation token.
const NEXT_PAGE_HEADER: &str = "opc-next-page";

/// Request/response correlation header.
const REQUEST_ID_HEADER: &str = "opc-request-id";

/// Service base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Compute (`iaas`) base URL.
    pub compute: String,
    /// Identity base URL.
    pub identity: String,
}

impl Endpoints {
    /// Public endpoints of `region`.
    #[must_use]
    pub fn for_region(region: &str) -> Self {
        Self {
            compute: format!("https://iaas.{region}.oraclecloud.com"),
            identity: format!("https://identity.{region}.oraclecloud.com"),
        }
    }

    /// Sends both services to one base URL.
    #[must_use]
    pub fn single(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            compute: base.clone(),
            identity: base,
        }
    }
}

/// Which service a request goes to.
#[derive(Debug, Clone, Copy)]
enum Service {
    Compute,
    Identity,
}

/// Error body returned by OCI services.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// OCI API client.
#[derive(Debug)]
pub struct OciClient {
    /// HTTP client.
    http: Client,
    /// Request signer for the profile's key.
    signer: RequestSigner,
    /// Service base URLs.
    endpoints: Endpoints,
}

impl OciClient {
    /// Creates a client for `profile`, targeting the profile's region.
    ///
    /// # Errors
    ///
    /// Returns an error if the key file cannot be loaded or the HTTP client
    /// cannot be created.
    pub fn new(profile: &Profile) -> Result<Self> {
        let signer = RequestSigner::from_profile(profile)?;
        Self::with_signer(signer, Endpoints::for_region(&profile.region))
    }

    /// Creates a client from an explicit signer and endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_signer(signer: RequestSigner, endpoints: Endpoints) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("oci-cli-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            signer,
            endpoints,
        })
    }

    /// GETs a JSON array and the continuation token.
    async fn get_page<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>> {
        let response = self.send(Method::GET, service, path, query, None).await?;
        let next_page = response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from);
        let items = Self::decode(response).await?;
        Ok(Page { items, next_page })
    }

    /// Sends a signed request and maps non-success statuses to errors.
    async fn send(
        &self,
        method: Method,
        service: Service,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<Response> {
        let url = self.build_url(service, path, query)?;
        let host = match url.port() {
            Some(port) => format!("{}:{port}", url.host_str().unwrap_or_default()),
            None => url.host_str().unwrap_or_default().to_string(),
        };
        let path_and_query = match url.query() {
            Some(q) => format!("{}?{q}", url.path()),
            None => url.path().to_string(),
        };

        let headers = self.signer.signed_headers(
            &method,
            &host,
            &path_and_query,
            body.as_deref(),
            &http_date_now(),
        )?;

        let request_id = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        debug!("{method} {url} ({REQUEST_ID_HEADER}: {request_id})");

        let mut request = self
            .http
            .request(method, url)
            .headers(headers)
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(bytes) = body {
            request = request.body(bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        trace!("Response status: {status}");
        if status.is_success() {
            return Ok(response);
        }

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map_or(request_id, String::from);
        let text = response.text().await.unwrap_or_default();
        let (code, message) = serde_json::from_str::<ServiceErrorBody>(&text)
            .map_or_else(|_| (String::from("Unknown"), text), |b| (b.code, b.message));

        Err(RemoteError::Service {
            status: status.as_u16(),
            code,
            message,
            request_id,
        }
        .into())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteError::network(format!("Failed to read response: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RemoteError::invalid_response(format!("Failed to parse response: {e}")).into())
    }

    fn build_url(&self, service: Service, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let base = match service {
            Service::Compute => &self.endpoints.compute,
            Service::Identity => &self.endpoints.identity,
        };
        let mut url = Url::parse(&format!("{}{API_VERSION}{path}", base.trim_end_matches('/')))
            .map_err(|e| RemoteError::invalid_response(format!("Invalid endpoint URL: {e}")))?;

        if !query.is_empty() {
            url.set_query(Some(&encode_query(query)));
        }
        Ok(url)
    }
}

/// Percent-encodes query pairs, with spaces as `%20`.
fn encode_query(query: &[(&str, String)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        serializer.append_pair(key, value);
    }
    // form encoding writes spaces as '+'; literal '+' is already %2B
    serializer.finish().replace('+', "%20")
}

#[async_trait]
impl IdentityApi for OciClient {
    async fn list_compartments(
        &self,
        parent_id: &str,
        page: Option<String>,
    ) -> Result<Page<Compartment>> {
        let mut query = vec![("compartmentId", parent_id.to_string())];
        if let Some(page) = page {
            query.push(("page", page));
        }
        self.get_page(Service::Identity, "/compartments", &query).await
    }
}

#[async_trait]
impl ComputeApi for OciClient {
    async fn list_instances(
        &self,
        compartment_id: &str,
        page: Option<String>,
    ) -> Result<Page<Instance>> {
        let mut query = vec![("compartmentId", compartment_id.to_string())];
        if let Some(page) = page {
            query.push(("page", page));
        }
        self.get_page(Service::Compute, "/instances", &query).await
    }

    async fn get_instance(&self, instance_id: &str) -> Result<Instance> {
        let path = format!("/instances/{instance_id}");
        let response = self
            .send(Method::GET, Service::Compute, &path, &[], None)
            .await?;
        Self::decode(response).await
    }

    async fn list_images(&self, request: &ListImagesRequest) -> Result<Page<Image>> {
        self.get_page(Service::Compute, "/images", &request.query())
            .await
    }

    async fn list_shapes(&self, request: &ListShapesRequest) -> Result<Page<Shape>> {
        self.get_page(Service::Compute, "/shapes", &request.query())
            .await
    }

    async fn launch_instance(&self, details: &LaunchInstanceDetails) -> Result<Instance> {
        let body = serde_json::to_vec(details)
            .map_err(|e| OciCliError::internal(format!("Failed to encode request: {e}")))?;
        let response = self
            .send(Method::POST, Service::Compute, "/instances", &[], Some(body))
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_for_region() {
        let endpoints = Endpoints::for_region("eu-frankfurt-1");
        assert_eq!(endpoints.compute, "https://iaas.eu-frankfurt-1.oraclecloud.com");
        assert_eq!(endpoints.identity, "https://identity.eu-frankfurt-1.oraclecloud.com");
    }

    #[test]
    fn test_encode_query_uses_percent_twenty() {
        let query = vec![
            ("compartmentId", "ocid1.tenancy.oc1..aaa".to_string()),
            ("displayName", "Canonical Ubuntu 24.04 a+b".to_string()),
        ];
        assert_eq!(
            encode_query(&query),
            "compartmentId=ocid1.tenancy.oc1..aaa&displayName=Canonical%20Ubuntu%2024.04%20a%2Bb"
        );
    }
}
