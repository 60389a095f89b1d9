//! Updating an unsigned release bundle.

use crate::clients::DistributionHttpClient;
use crate::services::add_gpg_passphrase_header;
use crate::services::errors::DistributionError;
use crate::services::types::{create_bundle_body, ReleaseBundleParams};
use crate::utils::indent_json;

/// Service updating release bundles.
///
/// Only unsigned bundles can be updated; the server rejects updates to a
/// signed bundle.
#[derive(Debug)]
pub struct UpdateReleaseBundleService<'a> {
    client: &'a DistributionHttpClient,
    /// Validate without persisting.
    pub dry_run: bool,
}

impl<'a> UpdateReleaseBundleService<'a> {
    /// Creates an update service on the given client.
    #[must_use]
    pub const fn new(client: &'a DistributionHttpClient) -> Self {
        Self {
            client,
            dry_run: false,
        }
    }

    /// Updates the release bundle named by the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when encoding fails or the server
    /// rejects the update.
    pub async fn update_release_bundle(
        &self,
        params: &ReleaseBundleParams,
    ) -> Result<(), DistributionError> {
        let body = create_bundle_body(params, self.dry_run);

        let auth = self.client.auth();
        let mut details = auth.create_client_details();
        details.set_content_type("application/json");
        add_gpg_passphrase_header(params.gpg_passphrase.as_deref(), &mut details);

        let dry_run_prefix = if self.dry_run { "[Dry run] " } else { "" };
        tracing::info!("{dry_run_prefix}Updating: {}/{}", params.name, params.version);

        let content = serde_json::to_vec(&body)?;
        let url = format!(
            "{}api/v1/release_bundle/{}/{}",
            auth.url(),
            params.name,
            params.version
        );
        let outcome = self.client.put(&url, content, &mut details).await?;
        outcome.verify_status(&[200])?;
        tracing::debug!("Distribution response: {}", outcome.status_line);
        tracing::debug!("{}", indent_json(&outcome.body));
        Ok(())
    }
}
