//! Distributing a release bundle to edge nodes.
//!
//! A distribute submit returns a tracker id while the server works in the
//! background. With `sync` enabled the service feeds that tracker to the
//! poll loop and blocks until the distribution completes, fails, or the
//! wait deadline elapses.

use async_trait::async_trait;
use serde::Deserialize;

use crate::clients::DistributionHttpClient;
use crate::services::errors::DistributionError;
use crate::services::status::{
    DistributionStatus, DistributionStatusParams, DistributionStatusService,
};
use crate::services::types::{DistributionBody, DistributionRule};
use crate::sync::{poll_until_complete, PollConfig, ProbeOutcome, StatusProbe};
use crate::utils::indent_json;

/// Parameters of a distribute submit.
#[derive(Clone, Debug, Default)]
pub struct DistributionParams {
    /// Bundle name.
    pub name: String,
    /// Bundle version.
    pub version: String,
    /// Target site selection.
    pub distribution_rules: Vec<DistributionRule>,
}

impl DistributionParams {
    /// Creates parameters for the given bundle name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            distribution_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DistributionResponseBody {
    id: serde_json::Number,
}

/// Service distributing release bundles.
#[derive(Debug)]
pub struct DistributeReleaseBundleService<'a> {
    client: &'a DistributionHttpClient,
    /// Validate without distributing.
    pub dry_run: bool,
    /// Block until the distribution reaches a terminal state.
    pub sync: bool,
    /// Max minutes to wait when `sync` is set; 0 means the default.
    pub max_wait_minutes: u64,
    /// Create missing repositories on the edges.
    pub auto_create_repo: bool,
}

impl<'a> DistributeReleaseBundleService<'a> {
    /// Creates a distribute service on the given client.
    #[must_use]
    pub const fn new(client: &'a DistributionHttpClient) -> Self {
        Self {
            client,
            dry_run: false,
            sync: false,
            max_wait_minutes: 0,
            auto_create_repo: false,
        }
    }

    /// Submits the distribution and returns its tracker id.
    ///
    /// With `sync` set, blocks until the distribution completes. A submit
    /// that succeeded but whose wait failed still reports the wait error,
    /// so the caller can re-query status with the tracker id manually.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] on submit failure, server-reported
    /// distribution failure, or wait timeout.
    pub async fn distribute(&self, params: &DistributionParams) -> Result<String, DistributionError> {
        let body = DistributionBody {
            dry_run: self.dry_run,
            distribution_rules: params.distribution_rules.clone(),
            auto_create_repo: self.auto_create_repo,
        };

        let tracker_id = self
            .exec_distribute(&params.name, &params.version, &body)
            .await?;
        if !self.sync {
            return Ok(tracker_id);
        }

        self.wait_for_distribution(params, &tracker_id).await?;
        Ok(tracker_id)
    }

    async fn exec_distribute(
        &self,
        name: &str,
        version: &str,
        body: &DistributionBody,
    ) -> Result<String, DistributionError> {
        let auth = self.client.auth();
        let mut details = auth.create_client_details();
        details.set_content_type("application/json");

        let dry_run_prefix = if self.dry_run { "[Dry run] " } else { "" };
        tracing::info!("{dry_run_prefix}Distributing: {name}/{version}");

        let content = serde_json::to_vec(body)?;
        let url = format!("{}api/v1/distribution/{name}/{version}", auth.url());
        let outcome = self.client.post(&url, content, &mut details).await?;
        outcome.verify_status(&[200, 202])?;
        tracing::debug!("Distribution response: {}", outcome.status_line);
        tracing::debug!("{}", indent_json(&outcome.body));

        let response: DistributionResponseBody = serde_json::from_slice(&outcome.body)?;
        Ok(response.id.to_string())
    }

    async fn wait_for_distribution(
        &self,
        params: &DistributionParams,
        tracker_id: &str,
    ) -> Result<(), DistributionError> {
        let probe = DistributionStatusProbe {
            service: DistributionStatusService::new(self.client),
            params: DistributionStatusParams {
                name: params.name.clone(),
                version: params.version.clone(),
                tracker_id: tracker_id.to_string(),
            },
        };
        let config = PollConfig::with_max_wait_minutes(self.max_wait_minutes);
        let progress = format!("Distributing {}/{}...", params.name, params.version);
        poll_until_complete(&probe, config, "distribution", &progress).await
    }
}

/// Probe interpreting distribution status records.
struct DistributionStatusProbe<'a> {
    service: DistributionStatusService<'a>,
    params: DistributionStatusParams,
}

#[async_trait]
impl StatusProbe for DistributionStatusProbe<'_> {
    async fn probe(&self) -> Result<ProbeOutcome, DistributionError> {
        let response = self.service.get_status(&self.params).await?;
        let Some(record) = response.first() else {
            return Ok(ProbeOutcome::Pending);
        };
        match record.status {
            Some(DistributionStatus::Failed) => {
                let payload = serde_json::to_vec(&response)?;
                Ok(ProbeOutcome::Failed(indent_json(&payload)))
            }
            Some(DistributionStatus::Completed) => Ok(ProbeOutcome::Completed),
            _ => Ok(ProbeOutcome::Pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_params_start_without_rules() {
        let params = DistributionParams::new("my-bundle", "1.0.0");
        assert_eq!(params.name, "my-bundle");
        assert_eq!(params.version, "1.0.0");
        assert!(params.distribution_rules.is_empty());
    }

    #[test]
    fn test_tracker_id_parses_from_numeric_response() {
        let response: DistributionResponseBody =
            serde_json::from_str(r#"{"id": 70}"#).unwrap();
        assert_eq!(response.id.to_string(), "70");
    }
}
