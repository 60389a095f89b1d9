//! Uploading the GPG signing key pair.

use serde::Serialize;

use crate::clients::DistributionHttpClient;
use crate::services::errors::DistributionError;
use crate::utils::indent_json;

/// Parameters of a signing-key upload.
#[derive(Clone, Debug, Default)]
pub struct SetSigningKeyParams {
    /// ASCII-armored public key.
    pub public_key: String,
    /// ASCII-armored private key.
    pub private_key: String,
}

impl SetSigningKeyParams {
    /// Creates parameters from the given key pair.
    #[must_use]
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SetSigningKeyBody<'a> {
    public_key: &'a str,
    private_key: &'a str,
}

/// Service uploading the GPG key pair the distribution service signs with.
#[derive(Debug)]
pub struct SetSigningKeyService<'a> {
    client: &'a DistributionHttpClient,
}

impl<'a> SetSigningKeyService<'a> {
    /// Creates a signing-key service on the given client.
    #[must_use]
    pub const fn new(client: &'a DistributionHttpClient) -> Self {
        Self { client }
    }

    /// Uploads the signing key pair.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when encoding fails or the server
    /// rejects the keys.
    pub async fn set_signing_key(
        &self,
        params: &SetSigningKeyParams,
    ) -> Result<(), DistributionError> {
        let auth = self.client.auth();
        let mut details = auth.create_client_details();
        details.set_content_type("application/json");

        tracing::info!("Uploading GPG signing keys...");

        let body = SetSigningKeyBody {
            public_key: &params.public_key,
            private_key: &params.private_key,
        };
        let content = serde_json::to_vec(&body)?;
        let url = format!("{}api/v1/keys/pgp", auth.url());
        let outcome = self.client.put(&url, content, &mut details).await?;
        outcome.verify_status(&[200])?;
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
    fn test_signing_key_body_shape() {
        let params = SetSigningKeyParams::new("PUBLIC", "PRIVATE");
        let body = SetSigningKeyBody {
            public_key: &params.public_key,
            private_key: &params.private_key,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"public_key": "PUBLIC", "private_key": "PRIVATE"})
        );
    }
}
