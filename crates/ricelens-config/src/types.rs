//! Settings document types
//!
//! Every field defaults when absent, so a missing switch reads as disabled.

use serde::{Deserialize, Serialize};

/// Root settings document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Lens (per-line git annotation) settings
    pub code_lens: LensConfig,
    /// Self-hosted or renamed remotes
    pub remotes: Vec<RemoteSettings>,
}

/// The `codeLens` settings section.
///
/// The lens controller keeps the last processed copy of this value and
/// compares new snapshots against it field by field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LensConfig {
    /// Master switch
    pub enabled: bool,
    /// "Recent change" lens
    pub recent_change: LensSection,
    /// "Authors" lens
    pub authors: LensSection,
    /// Where lenses are placed in a document
    pub locations: Vec<LensLocation>,
    /// Symbol kinds used with [`LensLocation::Custom`]
    pub custom_location_symbols: Vec<String>,
    /// Verbose logging for lens evaluation
    pub debug: bool,
}

impl LensConfig {
    /// Snapshot with only the three switches set
    pub fn new(enabled: bool, recent_change_enabled: bool, authors_enabled: bool) -> Self {
        LensConfig {
            enabled,
            recent_change: LensSection::enabled(recent_change_enabled),
            authors: LensSection::enabled(authors_enabled),
            ..Default::default()
        }
    }

    pub fn recent_change_enabled(&self) -> bool {
        self.recent_change.enabled
    }

    pub fn authors_enabled(&self) -> bool {
        self.authors.enabled
    }

    /// Whether any lens would be produced, ignoring the master switch.
    /// This is the value published as toggle availability.
    pub fn any_lens_enabled(&self) -> bool {
        self.recent_change.enabled || self.authors.enabled
    }

    /// Whether a lens provider should be registered
    pub fn should_activate(&self) -> bool {
        self.enabled && self.any_lens_enabled()
    }
}

/// One lens kind
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LensSection {
    pub enabled: bool,
    /// Command run when the lens is clicked
    pub command: Option<LensCommand>,
}

impl LensSection {
    pub fn enabled(enabled: bool) -> Self {
        LensSection {
            enabled,
            command: None,
        }
    }
}

/// Commands a lens can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LensCommand {
    DiffWithPrevious,
    ShowQuickCommitDetails,
    ShowQuickCommitFileDetails,
    ShowQuickFileHistory,
    ShowQuickCurrentBranchHistory,
    ToggleFileBlame,
}

/// Lens placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LensLocation {
    Document,
    Containers,
    Blocks,
    Custom,
}

/// A configured remote hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSettings {
    /// URL grammar to use for this domain
    #[serde(rename = "type")]
    pub kind: RemoteKind,
    /// Host name, without scheme
    pub domain: String,
    /// Display name overriding the generated one
    #[serde(default)]
    pub name: Option<String>,
}

/// Supported hosting-service URL grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteKind {
    #[serde(rename = "github")]
    GitHub,
    #[serde(rename = "gitlab")]
    GitLab,
    #[serde(rename = "bitbucket")]
    Bitbucket,
    #[serde(rename = "bitbucket-server")]
    BitbucketServer,
    #[serde(rename = "azure-devops", alias = "vsts")]
    AzureDevOps,
}

impl RemoteKind {
    /// Service label used when formatting provider names
    pub fn label(&self) -> &'static str {
        match self {
            RemoteKind::GitHub => "GitHub",
            RemoteKind::GitLab => "GitLab",
            RemoteKind::Bitbucket => "Bitbucket",
            RemoteKind::BitbucketServer => "Bitbucket Server",
            RemoteKind::AzureDevOps => "Azure DevOps",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_disabled() {
        let config = LensConfig::default();
        assert!(!config.enabled);
        assert!(!config.recent_change_enabled());
        assert!(!config.authors_enabled());
        assert!(!config.should_activate());
    }

    #[test]
    fn test_activation_requires_master_switch_and_a_lens() {
        assert!(LensConfig::new(true, true, false).should_activate());
        assert!(LensConfig::new(true, false, true).should_activate());
        assert!(!LensConfig::new(true, false, false).should_activate());
        assert!(!LensConfig::new(false, true, true).should_activate());
    }

    #[test]
    fn test_toggle_availability_ignores_master_switch() {
        assert!(LensConfig::new(false, true, false).any_lens_enabled());
        assert!(!LensConfig::new(true, false, false).any_lens_enabled());
    }

    #[test]
    fn test_missing_fields_deserialize_as_disabled() {
        let settings: Settings =
            serde_json::from_str(r#"{ "codeLens": { "enabled": true } }"#).unwrap();
        assert!(settings.code_lens.enabled);
        assert!(!settings.code_lens.recent_change_enabled());
        assert!(!settings.code_lens.authors_enabled());
        assert!(settings.remotes.is_empty());
    }

    #[test]
    fn test_equality_is_structural() {
        let mut a = LensConfig::new(true, true, true);
        let b = a.clone();
        assert_eq!(a, b);

        a.locations.push(LensLocation::Blocks);
        assert_ne!(a, b);
    }

    #[test]
    fn test_remote_kind_names() {
        let remote: RemoteSettings = serde_json::from_str(
            r#"{ "type": "bitbucket-server", "domain": "git.example.com" }"#,
        )
        .unwrap();
        assert_eq!(remote.kind, RemoteKind::BitbucketServer);
        assert_eq!(remote.name, None);

        let legacy: RemoteKind = serde_json::from_str(r#""vsts""#).unwrap();
        assert_eq!(legacy, RemoteKind::AzureDevOps);
    }
}
