//! Distribution server version query.

use serde::Deserialize;

use crate::clients::DistributionHttpClient;
use crate::services::errors::DistributionError;

#[derive(Debug, Deserialize)]
struct SystemInfo {
    version: Option<String>,
}

/// Service reporting the distribution server's version.
#[derive(Debug)]
pub struct VersionService<'a> {
    client: &'a DistributionHttpClient,
}

impl<'a> VersionService<'a> {
    /// Creates a version service on the given client.
    #[must_use]
    pub const fn new(client: &'a DistributionHttpClient) -> Self {
        Self { client }
    }

    /// Queries the server version, trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when the query fails or the response
    /// cannot be parsed.
    pub async fn get_distribution_version(&self) -> Result<String, DistributionError> {
        let auth = self.client.auth();
        let mut details = auth.create_client_details();
        let url = format!("{}api/v1/system/info", auth.url());

        let outcome = self.client.get(&url, &mut details).await?;
        outcome.verify_status(&[200])?;

        let info: SystemInfo = serde_json::from_slice(&outcome.body)?;
        Ok(info.version.unwrap_or_default().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_info_tolerates_missing_version() {
        let info: SystemInfo = serde_json::from_str("{}").unwrap();
        assert!(info.version.is_none());
    }
}
