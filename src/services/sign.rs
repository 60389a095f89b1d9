//! Signing a release bundle.

use serde::Serialize;

use crate::clients::DistributionHttpClient;
use crate::services::add_gpg_passphrase_header;
use crate::services::errors::DistributionError;
use crate::utils::{indent_json, Sha256Summary};

/// Parameters of a sign request.
#[derive(Clone, Debug, Default)]
pub struct SignBundleParams {
    /// Bundle name.
    pub name: String,
    /// Bundle version.
    pub version: String,
    /// Repository storing the bundle's artifacts.
    pub storing_repository: Option<String>,
    /// Passphrase for the signing key, sent as a header.
    pub gpg_passphrase: Option<String>,
}

impl SignBundleParams {
    /// Creates parameters for the given bundle name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            storing_repository: None,
            gpg_passphrase: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct SignBundleBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    storing_repository: Option<&'a str>,
}

/// Service signing release bundles.
#[derive(Debug)]
pub struct SignBundleService<'a> {
    client: &'a DistributionHttpClient,
}

impl<'a> SignBundleService<'a> {
    /// Creates a sign service on the given client.
    #[must_use]
    pub const fn new(client: &'a DistributionHttpClient) -> Self {
        Self { client }
    }

    /// Signs the release bundle named by the parameters.
    ///
    /// Returns the bundle's SHA-256 checksum as reported by the server's
    /// `X-Checksum-Sha256` response header, when present.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when encoding fails or the server
    /// rejects the signing.
    pub async fn sign_release_bundle(
        &self,
        params: &SignBundleParams,
    ) -> Result<Sha256Summary, DistributionError> {
        let auth = self.client.auth();
        let mut details = auth.create_client_details();
        details.set_content_type("application/json");
        add_gpg_passphrase_header(params.gpg_passphrase.as_deref(), &mut details);

        tracing::info!("Signing: {}/{}", params.name, params.version);

        let body = SignBundleBody {
            storing_repository: params.storing_repository.as_deref(),
        };
        let content = serde_json::to_vec(&body)?;
        let url = format!(
            "{}api/v1/release_bundle/{}/{}/sign",
            auth.url(),
            params.name,
            params.version
        );
        let outcome = self.client.post(&url, content, &mut details).await?;
        outcome.verify_status(&[200])?;
        tracing::debug!("Distribution response: {}", outcome.status_line);
        tracing::debug!("{}", indent_json(&outcome.body));

        let mut summary = Sha256Summary::new();
        summary.set_succeeded(true);
        if let Some(sha256) = outcome.header("X-Checksum-Sha256") {
            summary.set_sha256(sha256);
        }
        Ok(summary)
    }
}
