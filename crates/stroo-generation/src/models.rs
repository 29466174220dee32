//! Invocation parameters and generation settings

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parameters of one generation request
///
/// Everything here is echoed into the generated header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationParams {
    /// Type the main template is rendered for
    pub root_type: String,
    /// Template path or label
    pub template_file: String,
    /// Destination path, if any
    pub output_file: Option<String>,
    /// Optional peer type name passed through to templates
    pub peer_name: Option<String>,
    /// Print instead of writing
    pub test_mode: bool,
    /// Additional key/value pairs for the header
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl InvocationParams {
    /// Parameters for rendering `root_type` with the given template
    pub fn new(root_type: impl Into<String>, template_file: impl Into<String>) -> Self {
        Self {
            root_type: root_type.into(),
            template_file: template_file.into(),
            ..Self::default()
        }
    }

    /// Header arguments as sorted `(key, value)` pairs
    pub fn header_arguments(&self) -> BTreeMap<String, String> {
        let mut arguments = self.extra.clone();
        arguments.insert("type".to_string(), self.root_type.clone());
        arguments.insert("template".to_string(), self.template_file.clone());
        if let Some(output) = &self.output_file {
            arguments.insert("output".to_string(), output.clone());
        }
        if let Some(peer) = &self.peer_name {
            arguments.insert("target".to_string(), peer.clone());
        }
        arguments.insert("test-mode".to_string(), self.test_mode.to_string());
        arguments
    }
}

/// Generation settings, loaded from the `generation` section of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Maximum nesting of `include` / `include_and_store`
    pub max_include_depth: usize,
    /// Replace existing output files
    pub overwrite_output: bool,
    /// Let a later type declaration replace an earlier one
    pub allow_redefinition: bool,
    /// Fail on missing template fields instead of rendering nothing
    pub strict_templates: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_include_depth: 64,
            overwrite_output: true,
            allow_redefinition: false,
            strict_templates: false,
        }
    }
}
