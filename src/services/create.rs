//! Creating a release bundle.

use serde::Serialize;

use crate::clients::DistributionHttpClient;
use crate::services::errors::DistributionError;
use crate::services::types::{create_bundle_body, ReleaseBundleBody, ReleaseBundleParams};
use crate::services::add_gpg_passphrase_header;
use crate::utils::indent_json;

#[derive(Debug, Serialize)]
struct CreateReleaseBundleBody<'a> {
    name: &'a str,
    version: &'a str,
    #[serde(flatten)]
    bundle: ReleaseBundleBody,
}

/// Service creating release bundles.
#[derive(Debug)]
pub struct CreateReleaseBundleService<'a> {
    client: &'a DistributionHttpClient,
    /// Validate without persisting.
    pub dry_run: bool,
}

impl<'a> CreateReleaseBundleService<'a> {
    /// Creates a create service on the given client.
    #[must_use]
    pub const fn new(client: &'a DistributionHttpClient) -> Self {
        Self {
            client,
            dry_run: false,
        }
    }

    /// Creates a release bundle from the given parameters.
    ///
    /// The server answers 201 on creation; a dry run answers 200.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when encoding fails or the server
    /// rejects the bundle.
    pub async fn create_release_bundle(
        &self,
        params: &ReleaseBundleParams,
    ) -> Result<(), DistributionError> {
        let body = CreateReleaseBundleBody {
            name: &params.name,
            version: &params.version,
            bundle: create_bundle_body(params, self.dry_run),
        };

        let auth = self.client.auth();
        let mut details = auth.create_client_details();
        details.set_content_type("application/json");
        add_gpg_passphrase_header(params.gpg_passphrase.as_deref(), &mut details);

        let dry_run_prefix = if self.dry_run { "[Dry run] " } else { "" };
        tracing::info!("{dry_run_prefix}Creating: {}/{}", params.name, params.version);

        let content = serde_json::to_vec(&body)?;
        let url = format!("{}api/v1/release_bundle", auth.url());
        let outcome = self.client.post(&url, content, &mut details).await?;
        let accepted: &[u16] = if self.dry_run { &[200, 201] } else { &[201] };
        outcome.verify_status(accepted)?;
        tracing::debug!("Distribution response: {}", outcome.status_line);
        tracing::debug!("{}", indent_json(&outcome.body));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_body_flattens_bundle_fields_next_to_coordinates() {
        let params = ReleaseBundleParams::new("my-bundle", "1.0.0");
        let body = CreateReleaseBundleBody {
            name: &params.name,
            version: &params.version,
            bundle: create_bundle_body(&params, false),
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["name"], json!("my-bundle"));
        assert_eq!(value["version"], json!("1.0.0"));
        assert_eq!(value["dry_run"], json!(false));
        assert_eq!(value["spec"]["queries"], json!([]));
    }
}
