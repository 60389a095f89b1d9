//! Distribution status queries.
//!
//! Status can be queried for all bundles, one bundle, one version, or one
//! specific distribution (by tracker id). Parameters are validated before
//! any network call: a version requires a name, a tracker id requires both.

use serde::{Deserialize, Serialize};

use crate::clients::DistributionHttpClient;
use crate::services::errors::DistributionError;
use crate::utils::indent_json;

/// Status of a distribution as reported by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionStatus {
    /// Distribution has not started.
    #[serde(rename = "Not distributed")]
    NotDistributed,
    /// Distribution is running.
    #[serde(rename = "In progress")]
    InProgress,
    /// Distribution is queued.
    #[serde(rename = "In queue")]
    InQueue,
    /// Terminal success.
    Completed,
    /// Terminal failure.
    Failed,
}

/// Kind of tracked operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionType {
    /// A distribute operation.
    #[serde(rename = "distribute")]
    Distribute,
    /// A release-bundle version deletion.
    #[serde(rename = "delete_release_bundle_version")]
    DeleteReleaseBundleVersion,
}

/// Per-site progress of a distribution.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DistributionSiteStatus {
    /// Site-level status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DistributionStatus>,
    /// Site-level error message, if any.
    #[serde(rename = "general_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The target Artifactory instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_artifactory: Option<TargetArtifactory>,
    /// Total files to distribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_files: Option<serde_json::Number>,
    /// Total bytes to distribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<serde_json::Number>,
    /// Bytes distributed so far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributed_bytes: Option<serde_json::Number>,
    /// Files distributed so far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributed_files: Option<serde_json::Number>,
    /// Per-file errors.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub file_errors: Vec<String>,
    /// Files currently in flight.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub files_in_progress: Vec<String>,
}

/// The Artifactory edge a site distributes to.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TargetArtifactory {
    /// Service id of the edge.
    pub service_id: String,
    /// Display name of the edge.
    pub name: String,
    /// Edge type.
    #[serde(rename = "type")]
    pub kind: String,
}

/// One status record returned by the status endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DistributionStatusResponse {
    /// Tracker id of the distribution.
    #[serde(rename = "distribution_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Number>,
    /// Human-friendly tracker id.
    #[serde(
        rename = "distribution_friendly_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub friendly_id: Option<serde_json::Number>,
    /// Kind of tracked operation.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<DistributionType>,
    /// Bundle name.
    #[serde(rename = "release_bundle_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Bundle version.
    #[serde(
        rename = "release_bundle_version",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    /// Overall status. Derived fresh on each poll.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DistributionStatus>,
    /// The rules this distribution was submitted with.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub distribution_rules: Vec<crate::services::types::DistributionRule>,
    /// Per-site progress.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sites: Vec<DistributionSiteStatus>,
}

/// Parameters of a status query. All fields optional, but a version
/// requires a name and a tracker id requires both.
#[derive(Clone, Debug, Default)]
pub struct DistributionStatusParams {
    /// Bundle name.
    pub name: String,
    /// Bundle version.
    pub version: String,
    /// Tracker id of one specific distribution.
    pub tracker_id: String,
}

impl DistributionStatusParams {
    /// Creates empty parameters (status of all release bundles).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builds the status resource URL for the given coordinates.
///
/// Omitted trailing coordinates shorten the path:
/// `api/v1/release_bundle[/{name}[/{version}]]/distribution[/{tracker}]`.
#[must_use]
pub fn build_status_url(base: &str, name: &str, version: &str, tracker_id: &str) -> String {
    let mut url = format!("{base}api/v1/release_bundle");
    if name.is_empty() {
        url.push_str("/distribution");
        return url;
    }
    url.push('/');
    url.push_str(name);
    if version.is_empty() {
        url.push_str("/distribution");
        return url;
    }
    url.push('/');
    url.push_str(version);
    url.push_str("/distribution");
    if !tracker_id.is_empty() {
        url.push('/');
        url.push_str(tracker_id);
    }
    url
}

/// Service querying distribution status.
#[derive(Debug)]
pub struct DistributionStatusService<'a> {
    client: &'a DistributionHttpClient,
}

impl<'a> DistributionStatusService<'a> {
    /// Creates a status service on the given client.
    #[must_use]
    pub const fn new(client: &'a DistributionHttpClient) -> Self {
        Self { client }
    }

    /// Queries distribution status for the given coordinates.
    ///
    /// A single-object response body is auto-wrapped into a one-element
    /// list, so callers always receive a list of status records.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError::InvalidParameter`] before any network
    /// call when the coordinates are inconsistent, or an HTTP/parse error
    /// from the query.
    pub async fn get_status(
        &self,
        params: &DistributionStatusParams,
    ) -> Result<Vec<DistributionStatusResponse>, DistributionError> {
        Self::check_parameters(params)?;
        self.exec_get_status(&params.name, &params.version, &params.tracker_id)
            .await
    }

    fn check_parameters(params: &DistributionStatusParams) -> Result<(), DistributionError> {
        if params.name.is_empty() && (!params.version.is_empty() || !params.tracker_id.is_empty()) {
            return Err(DistributionError::InvalidParameter {
                reason: "missing distribution name parameter".to_string(),
            });
        }
        if params.version.is_empty() && !params.tracker_id.is_empty() {
            return Err(DistributionError::InvalidParameter {
                reason: "missing distribution version parameter".to_string(),
            });
        }
        Ok(())
    }

    async fn exec_get_status(
        &self,
        name: &str,
        version: &str,
        tracker_id: &str,
    ) -> Result<Vec<DistributionStatusResponse>, DistributionError> {
        let auth = self.client.auth();
        let mut details = auth.create_client_details();
        let url = build_status_url(auth.url(), name, version, tracker_id);

        let outcome = self.client.get(&url, &mut details).await?;
        outcome.verify_status(&[200])?;
        tracing::debug!("Distribution response: {}", outcome.status_line);
        tracing::debug!("{}", indent_json(&outcome.body));

        let mut body = outcome.body_text();
        if !body.trim_start().starts_with('[') {
            body = format!("[{body}]");
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_status_url_all_release_bundles() {
        assert_eq!(
            build_status_url("https://dummy-url/distribution/", "", "", ""),
            "https://dummy-url/distribution/api/v1/release_bundle/distribution"
        );
    }

    #[test]
    fn test_build_status_url_by_name() {
        assert_eq!(
            build_status_url("https://dummy-url/distribution/", "bundleName", "", ""),
            "https://dummy-url/distribution/api/v1/release_bundle/bundleName/distribution"
        );
    }

    #[test]
    fn test_build_status_url_by_name_and_version() {
        assert_eq!(
            build_status_url("https://dummy-url/distribution/", "bundleName", "22", ""),
            "https://dummy-url/distribution/api/v1/release_bundle/bundleName/22/distribution"
        );
    }

    #[test]
    fn test_build_status_url_by_tracker_id() {
        assert_eq!(
            build_status_url(
                "https://dummy-url/distribution/",
                "bundleName",
                "22",
                "123234"
            ),
            "https://dummy-url/distribution/api/v1/release_bundle/bundleName/22/distribution/123234"
        );
    }

    #[test]
    fn test_check_parameters_rejects_version_without_name() {
        let params = DistributionStatusParams {
            name: String::new(),
            version: "22".to_string(),
            tracker_id: String::new(),
        };
        let err = DistributionStatusService::check_parameters(&params).unwrap_err();
        assert!(err.to_string().contains("missing distribution name"));
    }

    #[test]
    fn test_check_parameters_rejects_tracker_without_version() {
        let params = DistributionStatusParams {
            name: "bundle".to_string(),
            version: String::new(),
            tracker_id: "123".to_string(),
        };
        let err = DistributionStatusService::check_parameters(&params).unwrap_err();
        assert!(err.to_string().contains("missing distribution version"));
    }

    #[test]
    fn test_check_parameters_accepts_empty_query() {
        assert!(DistributionStatusService::check_parameters(&DistributionStatusParams::new())
            .is_ok());
    }

    #[test]
    fn test_status_enum_wire_values() {
        let status: DistributionStatus = serde_json::from_str(r#""Not distributed""#).unwrap();
        assert_eq!(status, DistributionStatus::NotDistributed);
        let status: DistributionStatus = serde_json::from_str(r#""In progress""#).unwrap();
        assert_eq!(status, DistributionStatus::InProgress);
        let status: DistributionStatus = serde_json::from_str(r#""Completed""#).unwrap();
        assert_eq!(status, DistributionStatus::Completed);
    }

    #[test]
    fn test_status_response_parses_full_record() {
        let body = r#"{
            "distribution_id": 70,
            "type": "distribute",
            "release_bundle_name": "my-bundle",
            "release_bundle_version": "1.0.0",
            "status": "In progress",
            "sites": [{
                "status": "In progress",
                "target_artifactory": {
                    "service_id": "jfrt@edge",
                    "name": "edge-1",
                    "type": "edge"
                },
                "total_files": 100,
                "distributed_files": 42
            }]
        }"#;

        let record: DistributionStatusResponse = serde_json::from_str(body).unwrap();
        assert_eq!(record.status, Some(DistributionStatus::InProgress));
        assert_eq!(record.kind, Some(DistributionType::Distribute));
        assert_eq!(record.name.as_deref(), Some("my-bundle"));
        assert_eq!(record.sites.len(), 1);
        assert_eq!(
            record.sites[0].target_artifactory.as_ref().unwrap().name,
            "edge-1"
        );
    }
}
