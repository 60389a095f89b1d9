//! Token-refresh retry behavior against a live mock server.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use distribution_api::auth::{AuthError, ClientDetails, DistributionAuth};
use distribution_api::services::DistributionClient;
use distribution_api::DistributionError;

/// Auth context with a refreshable token, the way a real caller with an
/// expirable credential would implement it.
struct RefreshingAuth {
    url: String,
    token: Mutex<String>,
    refreshes: AtomicU32,
}

impl RefreshingAuth {
    fn new(url: &str) -> Self {
        Self {
            url: format!("{url}/"),
            token: Mutex::new("stale".to_string()),
            refreshes: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl DistributionAuth for RefreshingAuth {
    fn url(&self) -> &str {
        &self.url
    }

    fn create_client_details(&self) -> ClientDetails {
        let token = self.token.lock().unwrap().clone();
        let mut details = ClientDetails::default();
        details
            .headers
            .insert("Authorization".to_string(), format!("Bearer {token}"));
        details
    }

    async fn handle_token_expiry(
        &self,
        status: u16,
        details: &mut ClientDetails,
    ) -> Result<bool, AuthError> {
        if status != 401 {
            return Ok(false);
        }
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().unwrap() = "fresh".to_string();
        details
            .headers
            .insert("Authorization".to_string(), "Bearer fresh".to_string());
        Ok(true)
    }
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_request_retried_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/system/info"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/info"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": "2.19.0"
        })))
        .mount(&server)
        .await;

    let auth = Arc::new(RefreshingAuth::new(&server.uri()));
    let client = DistributionClient::builder()
        .auth(auth.clone())
        .build()
        .unwrap();

    let version = client.get_distribution_version().await.unwrap();

    assert_eq!(version, "2.19.0");
    assert_eq!(auth.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_still_expired_after_refresh_fails_without_a_third_request() {
    let server = MockServer::start().await;

    // The server rejects every token, fresh or not.
    Mock::given(method("GET"))
        .and(path("/api/v1/system/info"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let auth = Arc::new(RefreshingAuth::new(&server.uri()));
    let client = DistributionClient::builder().auth(auth).build().unwrap();

    let err = client.get_distribution_version().await.unwrap_err();

    assert!(err
        .to_string()
        .contains("failed to obtain a new authentication token after one has expired"));
    assert!(matches!(err, DistributionError::Http(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_static_token_never_triggers_a_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/system/info"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let auth =
        distribution_api::auth::AccessTokenAuth::new(server.uri(), "static-token").unwrap();
    let client = DistributionClient::builder()
        .auth(Arc::new(auth))
        .build()
        .unwrap();

    // Static credentials report no expiry, so the 401 surfaces as an
    // unexpected status after a single request.
    let err = client.get_distribution_version().await.unwrap_err();
    assert!(err.to_string().contains("401"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
