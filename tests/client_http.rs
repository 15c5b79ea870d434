//! Integration tests for the OCI HTTP client using wiremock
//!
//! These tests drive `OciClient` against a local mock server, checking
//! request signing, pagination headers and error mapping.

use oci_cli::compartments::CompartmentWalker;
use oci_cli::error::{OciCliError, RemoteError};
use oci_cli::oci::{
    ComputeApi, CreateVnicDetails, Endpoints, IdentityApi, InstanceSourceDetails,
    LaunchInstanceDetails, ListImagesRequest, OciClient, RequestSigner, SSH_AUTHORIZED_KEYS,
};
use oci_cli::resolver::Resolver;
use rsa::RsaPrivateKey;
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TENANCY: &str = "ocid1.tenancy.oc1..root";

fn client(server: &MockServer) -> OciClient {
    let key = RsaPrivateKey::new(&mut rand::rngs::OsRng, 1024).expect("key generation");
    let signer = RequestSigner::new(format!("{TENANCY}/ocid1.user.oc1..u/aa:bb"), key);
    OciClient::with_signer(signer, Endpoints::single(server.uri())).expect("client")
}

fn compartment(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "compartmentId": TENANCY,
        "name": name,
        "description": "",
        "lifecycleState": "ACTIVE"
    })
}

fn instance(id: &str, name: &str, state: &str) -> serde_json::Value {
    json!({
        "id": id,
        "displayName": name,
        "lifecycleState": state,
        "shape": "VM.Standard.A1.Flex",
        "imageId": "ocid1.image.oc1..img",
        "compartmentId": TENANCY,
        "availabilityDomain": "Uocm:US-ASHBURN-AD-1",
        "faultDomain": "FAULT-DOMAIN-1",
        "region": "us-ashburn-1",
        "timeCreated": "2024-10-01T12:00:00.000Z",
        "shapeConfig": {"ocpus": 2.0, "memoryInGBs": 12.0}
    })
}

/// Test GET requests carry a signature over the standard headers
#[tokio::test]
async fn test_get_is_signed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/instances/ocid1.instance.oc1..a"))
        .and(header_exists("authorization"))
        .and(header_exists("date"))
        .and(header_exists("opc-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(instance(
            "ocid1.instance.oc1..a",
            "web",
            "RUNNING",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server)
        .get_instance("ocid1.instance.oc1..a")
        .await
        .unwrap();
    assert_eq!(found.display_name, "web");
    assert_eq!(found.shape_config.unwrap().memory_in_gbs, Some(12.0));

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(authorization.starts_with("Signature version=\"1\",keyId=\"ocid1.tenancy.oc1..root/"));
    assert!(authorization.contains("headers=\"date (request-target) host\""));
}

/// Test the continuation header is surfaced as the next page token
#[tokio::test]
async fn test_next_page_header_is_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/compartments"))
        .and(query_param("compartmentId", TENANCY))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("opc-next-page", "p2")
                .set_body_json(json!([compartment("ocid1.compartment.oc1..a", "a")])),
        )
        .mount(&server)
        .await;

    let page = client(&server)
        .list_compartments(TENANCY, None)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.next_page.as_deref(), Some("p2"));
}

/// Test name resolution follows pagination over HTTP
#[tokio::test]
async fn test_resolve_compartment_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/compartments"))
        .and(query_param("page", "p2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([compartment("ocid1.compartment.oc1..dev", "dev")])),
        )
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/20160918/compartments"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("opc-next-page", "p2")
                .set_body_json(json!([compartment("ocid1.compartment.oc1..prod", "prod")])),
        )
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let resolver = Resolver::new(&client, &client, TENANCY);
    let id = resolver.resolve_compartment("dev").await.unwrap();
    assert_eq!(id, "ocid1.compartment.oc1..dev");
}

/// Test the tree walk descends into child scopes
#[tokio::test]
async fn test_walk_descends_into_children() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/compartments"))
        .and(query_param("compartmentId", TENANCY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([compartment("ocid1.compartment.oc1..apps", "apps")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/20160918/compartments"))
        .and(query_param("compartmentId", "ocid1.compartment.oc1..apps"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([compartment("ocid1.compartment.oc1..web", "web")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/20160918/compartments"))
        .and(query_param("compartmentId", "ocid1.compartment.oc1..web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client(&server);
    let nodes = CompartmentWalker::new(&client).collect(TENANCY).await.unwrap();
    let names: Vec<(&str, usize)> = nodes
        .iter()
        .map(|n| (n.compartment.name.as_str(), n.depth))
        .collect();
    assert_eq!(names, vec![("apps", 0), ("web", 1)]);
}

/// Test image queries send filters and sort order
#[tokio::test]
async fn test_list_images_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/images"))
        .and(query_param("compartmentId", TENANCY))
        .and(query_param("operatingSystem", "Oracle Linux"))
        .and(query_param("limit", "5"))
        .and(query_param("sortBy", "TIMECREATED"))
        .and(query_param("sortOrder", "DESC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "ocid1.image.oc1..ol9",
            "displayName": "Oracle-Linux-9.4-2024.09.30-0",
            "operatingSystem": "Oracle Linux",
            "operatingSystemVersion": "9",
            "lifecycleState": "AVAILABLE",
            "timeCreated": "2024-09-30T00:00:00.000Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let request = ListImagesRequest::new(TENANCY)
        .with_operating_system("Oracle Linux")
        .with_limit(5)
        .newest_first();
    let page = client(&server).list_images(&request).await.unwrap();
    assert_eq!(page.items[0].operating_system_version.as_deref(), Some("9"));
    assert!(page.next_page.is_none());
}

/// Test service errors keep status, code and request id
#[tokio::test]
async fn test_service_error_is_mapped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/instances/ocid1.instance.oc1..gone"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("opc-request-id", "REQ-123")
                .set_body_json(json!({
                    "code": "NotAuthorizedOrNotFound",
                    "message": "Authorization failed or requested resource not found."
                })),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .get_instance("ocid1.instance.oc1..gone")
        .await
        .unwrap_err();
    match err {
        OciCliError::Remote(RemoteError::Service {
            status,
            code,
            request_id,
            ..
        }) => {
            assert_eq!(status, 404);
            assert_eq!(code, "NotAuthorizedOrNotFound");
            assert_eq!(request_id, "REQ-123");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Test non-JSON error bodies are kept verbatim
#[tokio::test]
async fn test_plain_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/20160918/instances"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_instances(TENANCY, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OciCliError::Remote(RemoteError::Service { status: 502, ref code, ref message, .. })
            if code == "Unknown" && message == "Bad Gateway"
    ));
}

/// Test launch posts the details with body signing headers
#[tokio::test]
async fn test_launch_posts_signed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/20160918/instances"))
        .and(header("content-type", "application/json"))
        .and(header_exists("x-content-sha256"))
        .and(body_partial_json(json!({
            "compartmentId": TENANCY,
            "shape": "VM.Standard.A1.Flex",
            "sourceDetails": {"sourceType": "image", "imageId": "ocid1.image.oc1..img"},
            "createVnicDetails": {"subnetId": "ocid1.subnet.oc1..s"},
            "metadata": {"ssh_authorized_keys": "ssh-ed25519 AAA"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(instance(
            "ocid1.instance.oc1..new",
            "web-1",
            "PROVISIONING",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let details = LaunchInstanceDetails {
        availability_domain: "Uocm:US-ASHBURN-AD-1".to_string(),
        compartment_id: TENANCY.to_string(),
        display_name: "web-1".to_string(),
        shape: "VM.Standard.A1.Flex".to_string(),
        shape_config: None,
        create_vnic_details: CreateVnicDetails {
            subnet_id: "ocid1.subnet.oc1..s".to_string(),
        },
        source_details: InstanceSourceDetails::Image {
            image_id: "ocid1.image.oc1..img".to_string(),
        },
        metadata: HashMap::from([(SSH_AUTHORIZED_KEYS.to_string(), "ssh-ed25519 AAA".to_string())]),
    };

    let launched = client(&server).launch_instance(&details).await.unwrap();
    assert_eq!(launched.id, "ocid1.instance.oc1..new");
    assert_eq!(launched.lifecycle_state, "PROVISIONING");
}
