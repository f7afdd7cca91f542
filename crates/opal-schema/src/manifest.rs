//! The component descriptor (`component.json`).
//!
//! A manifest lists the files a component ships, grouped by category, plus
//! its dependency mappings. Remotes serve one manifest per
//! `name/version` pair, and the installer rewrites it locally after filling
//! in a default `repo`. Keys this schema does not know about are kept in a
//! pass-through bucket so the rewrite never drops information.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A parsed `component.json`.
///
/// Every field is optional on the wire. The six file categories are unioned,
/// in a fixed order, into the flat download list via [`Manifest::files`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Component name, without the owner namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Version string as published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Canonical repository location. Defaulted from the resolved remote
    /// when the published manifest omits it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    /// Runtime dependencies: component name to version string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, String>>,

    /// Development-only dependencies, installed on request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development: Option<BTreeMap<String, String>>,

    /// JavaScript files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Vec<String>>,

    /// Stylesheets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<Vec<String>>,

    /// Template files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<String>>,

    /// Uncategorized files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    /// Image assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,

    /// Font assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Vec<String>>,

    /// Unrecognized keys, preserved verbatim across a rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error when the text is not a JSON
    /// object conforming to the schema.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize the manifest as pretty-printed JSON, the form written to
    /// the local component directory.
    ///
    /// # Errors
    ///
    /// Returns the underlying encode error, which only occurs if a
    /// pass-through value cannot be represented.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The flat list of files to download, concatenating the categories in
    /// their fixed order: scripts, styles, templates, files, images, fonts.
    pub fn files(&self) -> Vec<&str> {
        [
            &self.scripts,
            &self.styles,
            &self.templates,
            &self.files,
            &self.images,
            &self.fonts,
        ]
        .into_iter()
        .filter_map(Option::as_ref)
        .flat_map(|list| list.iter().map(String::as_str))
        .collect()
    }

    /// Fill in `repo` with `default` when the published manifest omitted it.
    pub fn ensure_repo(&mut self, default: &str) {
        if self.repo.is_none() {
            self.repo = Some(default.to_string());
        }
    }
}
