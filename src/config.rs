use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::compile::CompileOptions;
use crate::template::Delimiters;
use crate::validate::ValidationOptions;

pub const DEFAULT_ARCHIVE_NAME: &str = "generated-app.zip";

/// Generator settings. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// Directory the template candidate paths are resolved against.
    pub template_root: PathBuf,
    /// File name suggested to the client for the downloaded archive.
    pub archive_file_name: String,
    /// Delimiters every template starts with. Plain Mustache `{{ }}` unless
    /// configured; a template can still switch with a `{{=<% %>=}}` tag.
    pub template_tags: Delimiters,
    /// Render files on the rayon pool. Output order is unaffected.
    pub parallel_render: bool,
    /// Complete feature flags with registry defaults before rendering.
    pub apply_feature_defaults: bool,
    /// Tolerate navigation references to unknown screens instead of
    /// rejecting the blueprint.
    pub allow_dangling_references: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            template_root: PathBuf::from("."),
            archive_file_name: DEFAULT_ARCHIVE_NAME.to_string(),
            template_tags: Delimiters::default(),
            parallel_render: true,
            apply_feature_defaults: false,
            allow_dangling_references: false,
        }
    }
}

impl GeneratorOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            apply_feature_defaults: self.apply_feature_defaults,
        }
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            allow_dangling_references: self.allow_dangling_references,
        }
    }
}
