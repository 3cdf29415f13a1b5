//! Manifest types shared across the update layer

use serde::Deserialize;

use crate::update::error::UpdateError;

/// One published version and the archive that installs it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateEntry {
    pub version: String,
    pub download_url: String,
}

impl UpdateEntry {
    pub fn new(version: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            download_url: download_url.into(),
        }
    }
}

/// Remote manifest listing every known version in release order
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    updates: Option<Vec<UpdateEntry>>,
}

impl Manifest {
    pub fn new(updates: Vec<UpdateEntry>) -> Self {
        Self {
            updates: Some(updates),
        }
    }

    /// Parses a manifest document.
    ///
    /// A missing or `null` `updates` field is an empty manifest, not an error.
    pub fn parse(body: &str) -> Result<Self, UpdateError> {
        serde_json::from_str(body).map_err(|e| UpdateError::MalformedManifest(e.to_string()))
    }

    /// Entries in document order
    pub fn updates(&self) -> &[UpdateEntry] {
        self.updates.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.updates().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parse_keeps_document_order_and_ignores_unknown_fields() {
        let manifest = Manifest::parse(
            r#"{
                "name": "freya",
                "updates": [
                    {"version": "1.1.0", "download_url": "https://example.com/1.1.0.zip", "notes": "x"},
                    {"version": "1.0.0", "download_url": "https://example.com/1.0.0.zip"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            manifest.updates(),
            &[
                UpdateEntry::new("1.1.0", "https://example.com/1.1.0.zip"),
                UpdateEntry::new("1.0.0", "https://example.com/1.0.0.zip"),
            ]
        );
    }

    #[rstest]
    #[case(r#"{"updates": []}"#)]
    #[case(r#"{"updates": null}"#)]
    #[case(r#"{}"#)]
    fn parse_treats_empty_or_absent_updates_as_empty(#[case] body: &str) {
        let manifest = Manifest::parse(body).unwrap();

        assert!(manifest.is_empty());
    }

    #[rstest]
    #[case("not json at all")]
    #[case(r#"[{"version": "1.0.0", "download_url": "u"}]"#)]
    #[case(r#"{"updates": "1.0.0"}"#)]
    #[case(r#"{"updates": [{"version": "1.0.0"}]}"#)]
    fn parse_rejects_malformed_documents(#[case] body: &str) {
        let result = Manifest::parse(body);

        assert!(matches!(result, Err(UpdateError::MalformedManifest(_))));
    }
}
