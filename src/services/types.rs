//! Wire types shared by the release-bundle services.
//!
//! These structs serialize to the exact JSON bodies the Distribution REST
//! API expects. Bundle queries accept ready-made AQL strings and path
//! mappings; query construction is the caller's concern.

use serde::{Deserialize, Serialize};

/// Syntax of the release notes attached to a bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseNotesSyntax {
    /// Markdown syntax.
    #[serde(rename = "markdown")]
    Markdown,
    /// AsciiDoc syntax.
    #[serde(rename = "asciidoc")]
    Asciidoc,
    /// Plain text.
    #[serde(rename = "plain_text")]
    PlainText,
}

/// Release notes body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNotes {
    /// The syntax of `content`.
    pub syntax: ReleaseNotesSyntax,
    /// The release notes text.
    pub content: String,
}

/// A path mapping applied to matched artifacts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMapping {
    /// Regular expression matching source paths.
    pub input: String,
    /// Target path template, `$1`-style capture references.
    pub output: String,
}

/// A property attached to matched artifacts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedProps {
    /// Property key.
    pub key: String,
    /// Property values.
    pub values: Vec<String>,
}

/// One artifact query of a bundle spec.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleQuery {
    /// Optional display name for the query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_name: Option<String>,
    /// The AQL query selecting artifacts.
    pub aql: String,
    /// Path mappings applied to matched artifacts.
    #[serde(rename = "mappings", skip_serializing_if = "Vec::is_empty", default)]
    pub path_mappings: Vec<PathMapping>,
    /// Properties added to matched artifacts.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub added_props: Vec<AddedProps>,
}

/// The artifact selection of a bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSpec {
    /// The queries making up the bundle.
    pub queries: Vec<BundleQuery>,
}

/// REST body shared by create and update of a release bundle.
#[derive(Clone, Debug, Serialize)]
pub struct ReleaseBundleBody {
    /// Validate without persisting.
    pub dry_run: bool,
    /// Sign the bundle as part of the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_immediately: Option<bool>,
    /// Repository storing the bundle's artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storing_repository: Option<String>,
    /// Free-form bundle description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional release notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<ReleaseNotes>,
    /// The artifact selection.
    #[serde(rename = "spec")]
    pub bundle_spec: BundleSpec,
}

/// Caller-facing parameters for creating or updating a release bundle.
#[derive(Clone, Debug, Default)]
pub struct ReleaseBundleParams {
    /// Bundle name.
    pub name: String,
    /// Bundle version.
    pub version: String,
    /// Sign the bundle as part of the operation.
    pub sign_immediately: Option<bool>,
    /// Repository storing the bundle's artifacts.
    pub storing_repository: Option<String>,
    /// Free-form bundle description.
    pub description: Option<String>,
    /// Release notes text; sent only when non-empty.
    pub release_notes: Option<String>,
    /// Syntax of the release notes (defaults to plain text when notes are
    /// set without a syntax).
    pub release_notes_syntax: Option<ReleaseNotesSyntax>,
    /// Passphrase for the signing key, sent as a header.
    pub gpg_passphrase: Option<String>,
    /// The bundle's artifact queries.
    pub queries: Vec<BundleQuery>,
}

impl ReleaseBundleParams {
    /// Creates parameters for the given bundle name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }
}

/// Builds the shared create/update REST body from caller parameters.
#[must_use]
pub fn create_bundle_body(params: &ReleaseBundleParams, dry_run: bool) -> ReleaseBundleBody {
    let release_notes = params.release_notes.as_ref().map(|content| ReleaseNotes {
        syntax: params
            .release_notes_syntax
            .unwrap_or(ReleaseNotesSyntax::PlainText),
        content: content.clone(),
    });

    ReleaseBundleBody {
        dry_run,
        sign_immediately: params.sign_immediately,
        storing_repository: params.storing_repository.clone(),
        description: params.description.clone(),
        release_notes,
        bundle_spec: BundleSpec {
            queries: params.queries.clone(),
        },
    }
}

/// A distribution rule selecting target sites.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRule {
    /// Site name pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    /// City name pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    /// ISO country codes.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub country_codes: Vec<String>,
}

/// REST body of a distribute submit.
#[derive(Clone, Debug, Serialize)]
pub struct DistributionBody {
    /// Validate without distributing.
    pub dry_run: bool,
    /// Target site selection.
    pub distribution_rules: Vec<DistributionRule>,
    /// Create missing repositories on the edges.
    #[serde(
        rename = "auto_create_missing_repositories",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub auto_create_repo: bool,
}

/// What to do with the bundle on the distribution service after the edges
/// deleted it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnSuccess {
    /// Keep the bundle on the distribution service.
    #[serde(rename = "keep")]
    Keep,
    /// Delete the bundle from the distribution service too.
    #[serde(rename = "delete")]
    Delete,
}

/// REST body of a remote-delete submit.
#[derive(Clone, Debug, Serialize)]
pub struct DeleteDistributionBody {
    /// The shared distribution body (dry run + rules).
    #[serde(flatten)]
    pub distribution: DistributionBody,
    /// Post-deletion disposition on the distribution service.
    pub on_success: OnSuccess,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_bundle_body_carries_all_fields() {
        let mut params = ReleaseBundleParams::new("my-bundle", "1.0.0");
        params.sign_immediately = Some(true);
        params.storing_repository = Some("storing-repo".to_string());
        params.description = Some("Release bundle description".to_string());
        params.release_notes = Some("Release notes".to_string());
        params.release_notes_syntax = Some(ReleaseNotesSyntax::Asciidoc);

        let body = create_bundle_body(&params, true);

        assert!(body.dry_run);
        assert_eq!(body.sign_immediately, Some(true));
        assert_eq!(body.storing_repository.as_deref(), Some("storing-repo"));
        assert_eq!(
            body.description.as_deref(),
            Some("Release bundle description")
        );
        let notes = body.release_notes.unwrap();
        assert_eq!(notes.content, "Release notes");
        assert_eq!(notes.syntax, ReleaseNotesSyntax::Asciidoc);
        assert!(body.bundle_spec.queries.is_empty());
    }

    #[test]
    fn test_create_bundle_body_defaults_notes_syntax_to_plain_text() {
        let mut params = ReleaseBundleParams::new("b", "1");
        params.release_notes = Some("notes".to_string());

        let body = create_bundle_body(&params, false);

        assert_eq!(
            body.release_notes.unwrap().syntax,
            ReleaseNotesSyntax::PlainText
        );
    }

    #[test]
    fn test_release_bundle_body_serialization_shape() {
        let mut params = ReleaseBundleParams::new("b", "1");
        params.queries = vec![BundleQuery {
            query_name: None,
            aql: r#"items.find({"repo":"dist-repo"})"#.to_string(),
            path_mappings: vec![PathMapping {
                input: "dist-repo/(.*)".to_string(),
                output: "target/$1".to_string(),
            }],
            added_props: Vec::new(),
        }];

        let value = serde_json::to_value(create_bundle_body(&params, false)).unwrap();

        assert_eq!(value["dry_run"], json!(false));
        assert!(value.get("sign_immediately").is_none());
        assert!(value.get("release_notes").is_none());
        assert_eq!(value["spec"]["queries"][0]["aql"],
            json!(r#"items.find({"repo":"dist-repo"})"#));
        assert_eq!(
            value["spec"]["queries"][0]["mappings"][0]["output"],
            json!("target/$1")
        );
        assert!(value["spec"]["queries"][0].get("added_props").is_none());
    }

    #[test]
    fn test_distribution_body_omits_auto_create_when_false() {
        let body = DistributionBody {
            dry_run: false,
            distribution_rules: vec![DistributionRule {
                site_name: Some("edge-*".to_string()),
                city_name: None,
                country_codes: vec!["US".to_string(), "CA".to_string()],
            }],
            auto_create_repo: false,
        };

        let value = serde_json::to_value(body).unwrap();
        assert!(value.get("auto_create_missing_repositories").is_none());
        assert_eq!(value["distribution_rules"][0]["site_name"], json!("edge-*"));
        assert!(value["distribution_rules"][0].get("city_name").is_none());
        assert_eq!(
            value["distribution_rules"][0]["country_codes"],
            json!(["US", "CA"])
        );
    }

    #[test]
    fn test_delete_body_flattens_distribution_fields() {
        let body = DeleteDistributionBody {
            distribution: DistributionBody {
                dry_run: true,
                distribution_rules: Vec::new(),
                auto_create_repo: false,
            },
            on_success: OnSuccess::Delete,
        };

        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value["dry_run"], json!(true));
        assert_eq!(value["on_success"], json!("delete"));
    }

    #[test]
    fn test_on_success_wire_values() {
        assert_eq!(serde_json::to_value(OnSuccess::Keep).unwrap(), json!("keep"));
        assert_eq!(
            serde_json::to_value(OnSuccess::Delete).unwrap(),
            json!("delete")
        );
    }
}
