//! Value types shared with the host editor

use std::fmt;

/// URI schemes a lens provider is registered for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSelector {
    schemes: Vec<String>,
}

impl DocumentSelector {
    pub fn new<I, S>(schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DocumentSelector {
            schemes: schemes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    /// Whether a document URI is covered by this selector
    pub fn matches(&self, uri: &str) -> bool {
        uri.split_once(':')
            .map(|(scheme, _)| self.schemes.iter().any(|s| s == scheme))
            .unwrap_or(false)
    }
}

impl Default for DocumentSelector {
    /// Working-tree files and files at a git revision
    fn default() -> Self {
        DocumentSelector::new(["file", "git"])
    }
}

/// The editor a command was invoked from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorContext {
    pub uri: String,
    pub language_id: Option<String>,
}

impl EditorContext {
    pub fn new(uri: impl Into<String>) -> Self {
        EditorContext {
            uri: uri.into(),
            language_id: None,
        }
    }
}

/// Context flags published to the host's command system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandContextKey {
    /// Whether the toggle command is available
    CanToggleCodeLens,
}

impl CommandContextKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandContextKey::CanToggleCodeLens => "ricelens:canToggleCodeLens",
        }
    }
}

impl fmt::Display for CommandContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
