//! Deleting release bundles from edge nodes and the distribution service.
//!
//! Remote deletion is itself a distribution-style background job, but the
//! server issues no tracker id for it. Completion is detected through the
//! bundle's own distribution-status resource: once it answers 404, the
//! bundle is gone.

use async_trait::async_trait;

use crate::clients::{DistributionHttpClient, UnexpectedStatusError};
use crate::services::errors::DistributionError;
use crate::services::status::build_status_url;
use crate::services::types::{DeleteDistributionBody, DistributionBody, DistributionRule, OnSuccess};
use crate::sync::{poll_until_complete, PollConfig, ProbeOutcome, StatusProbe};
use crate::utils::indent_json;

/// Parameters of a remote-delete submit.
#[derive(Clone, Debug, Default)]
pub struct DeleteDistributionParams {
    /// Bundle name.
    pub name: String,
    /// Bundle version.
    pub version: String,
    /// Edge selection for the deletion.
    pub distribution_rules: Vec<DistributionRule>,
    /// Also delete the bundle from the distribution service on success.
    pub delete_from_distribution: bool,
}

impl DeleteDistributionParams {
    /// Creates parameters for the given bundle name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            distribution_rules: Vec::new(),
            delete_from_distribution: false,
        }
    }
}

/// Service deleting release bundles from edge nodes.
///
/// On success the bundle is kept on or deleted from the distribution
/// service itself, per
/// [`delete_from_distribution`](DeleteDistributionParams::delete_from_distribution).
#[derive(Debug)]
pub struct DeleteReleaseBundleService<'a> {
    client: &'a DistributionHttpClient,
    /// Validate without deleting.
    pub dry_run: bool,
    /// Block until the deletion completes.
    pub sync: bool,
    /// Max minutes to wait when `sync` is set; 0 means the default.
    pub max_wait_minutes: u64,
}

impl<'a> DeleteReleaseBundleService<'a> {
    /// Creates a remote-delete service on the given client.
    #[must_use]
    pub const fn new(client: &'a DistributionHttpClient) -> Self {
        Self {
            client,
            dry_run: false,
            sync: false,
            max_wait_minutes: 0,
        }
    }

    /// Submits the deletion, optionally waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] on submit failure, an unexpected
    /// status while waiting, or wait timeout.
    pub async fn delete_distribution(
        &self,
        params: &DeleteDistributionParams,
    ) -> Result<(), DistributionError> {
        let body = DeleteDistributionBody {
            distribution: DistributionBody {
                dry_run: self.dry_run,
                distribution_rules: params.distribution_rules.clone(),
                auto_create_repo: false,
            },
            on_success: if params.delete_from_distribution {
                OnSuccess::Delete
            } else {
                OnSuccess::Keep
            },
        };

        self.exec_delete_distribute(&params.name, &params.version, &body)
            .await?;
        if !self.sync {
            return Ok(());
        }
        self.wait_for_deletion(&params.name, &params.version).await
    }

    async fn exec_delete_distribute(
        &self,
        name: &str,
        version: &str,
        body: &DeleteDistributionBody,
    ) -> Result<(), DistributionError> {
        let auth = self.client.auth();
        let mut details = auth.create_client_details();
        details.set_content_type("application/json");

        let dry_run_prefix = if self.dry_run { "[Dry run] " } else { "" };
        tracing::info!("{dry_run_prefix}Deleting: {name}/{version}");

        let content = serde_json::to_vec(body)?;
        let url = format!("{}api/v1/distribution/{name}/{version}/delete", auth.url());
        let outcome = self.client.post(&url, content, &mut details).await?;
        outcome.verify_status(&[200, 202])?;
        tracing::debug!("Distribution response: {}", outcome.status_line);
        tracing::debug!("{}", indent_json(&outcome.body));
        Ok(())
    }

    async fn wait_for_deletion(&self, name: &str, version: &str) -> Result<(), DistributionError> {
        let probe = DeletionStatusProbe {
            client: self.client,
            status_url: build_status_url(self.client.auth().url(), name, version, ""),
        };
        let config = PollConfig::with_max_wait_minutes(self.max_wait_minutes);
        let progress = format!("Deleting {name}/{version}...");
        poll_until_complete(&probe, config, "deletion", &progress).await
    }
}

/// Probe detecting deletion through the status resource disappearing.
///
/// 404 is terminal success, 200 keeps polling, and anything else is an
/// immediate hard failure.
struct DeletionStatusProbe<'a> {
    client: &'a DistributionHttpClient,
    status_url: String,
}

#[async_trait]
impl StatusProbe for DeletionStatusProbe<'_> {
    async fn probe(&self) -> Result<ProbeOutcome, DistributionError> {
        let mut details = self.client.auth().create_client_details();
        let outcome = self.client.get(&self.status_url, &mut details).await?;
        match outcome.status {
            404 => Ok(ProbeOutcome::Completed),
            200 => Ok(ProbeOutcome::Pending),
            _ => Err(UnexpectedStatusError {
                code: outcome.status,
                status: outcome.status_line.clone(),
                body: indent_json(&outcome.body),
            }
            .into()),
        }
    }
}

/// Parameters of a local deletion.
#[derive(Clone, Debug, Default)]
pub struct DeleteLocalDistributionParams {
    /// Bundle name.
    pub name: String,
    /// Bundle version.
    pub version: String,
}

impl DeleteLocalDistributionParams {
    /// Creates parameters for the given bundle name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Service deleting a distributable release bundle from the distribution
/// service only.
#[derive(Debug)]
pub struct DeleteLocalDistributionService<'a> {
    client: &'a DistributionHttpClient,
    /// Validate without deleting.
    pub dry_run: bool,
}

impl<'a> DeleteLocalDistributionService<'a> {
    /// Creates a local-delete service on the given client.
    #[must_use]
    pub const fn new(client: &'a DistributionHttpClient) -> Self {
        Self {
            client,
            dry_run: false,
        }
    }

    /// Deletes the bundle from the distribution service.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the server rejects the deletion.
    pub async fn delete_distribution(
        &self,
        params: &DeleteLocalDistributionParams,
    ) -> Result<(), DistributionError> {
        let auth = self.client.auth();
        let mut details = auth.create_client_details();
        details.set_content_type("application/json");

        let dry_run_prefix = if self.dry_run { "[Dry run] " } else { "" };
        tracing::info!(
            "{dry_run_prefix}Deleting locally: {}/{}",
            params.name,
            params.version
        );

        let url = format!(
            "{}api/v1/distribution/{}/{}",
            auth.url(),
            params.name,
            params.version
        );
        let outcome = self.client.delete(&url, None, &mut details).await?;
        outcome.verify_status(&[200, 202])?;
        tracing::debug!("Distribution response: {}", outcome.status_line);
        tracing::debug!("{}", indent_json(&outcome.body));
        Ok(())
    }
}
