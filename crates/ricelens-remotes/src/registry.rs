//! Domain to provider lookup

use std::collections::HashMap;

use ricelens_config::{RemoteKind, RemoteSettings};
use tracing::debug;

use crate::error::{RemoteError, RemoteResult};
use crate::provider::{RemoteProvider, RemoteProviderDescriptor};
use crate::providers::create_provider;
use crate::remote_url::parse_git_remote;

#[derive(Debug, Clone)]
struct CustomRemote {
    kind: RemoteKind,
    name: Option<String>,
}

/// Resolves hosting providers for remote domains.
///
/// Custom remotes from settings take precedence over the built-in domains.
#[derive(Debug, Clone, Default)]
pub struct RemoteProviderRegistry {
    custom: HashMap<String, CustomRemote>,
}

impl RemoteProviderRegistry {
    /// Registry knowing only the built-in domains
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the custom remotes from settings
    pub fn from_settings(remotes: &[RemoteSettings]) -> Self {
        let mut registry = Self::new();
        for remote in remotes {
            registry.register_custom(&remote.domain, remote.kind, remote.name.clone());
        }
        registry
    }

    pub fn register_custom(&mut self, domain: &str, kind: RemoteKind, name: Option<String>) {
        debug!("Registering custom {} remote for {}", kind.label(), domain);
        self.custom
            .insert(domain.to_ascii_lowercase(), CustomRemote { kind, name });
    }

    /// Built-in provider kind for a domain
    pub fn builtin_kind(domain: &str) -> Option<RemoteKind> {
        let domain = domain.to_ascii_lowercase();
        match domain.as_str() {
            "github.com" => Some(RemoteKind::GitHub),
            "gitlab.com" => Some(RemoteKind::GitLab),
            "bitbucket.org" => Some(RemoteKind::Bitbucket),
            "dev.azure.com" | "visualstudio.com" => Some(RemoteKind::AzureDevOps),
            d if d.ends_with(".visualstudio.com") => Some(RemoteKind::AzureDevOps),
            _ => None,
        }
    }

    /// Provider for `domain` with repository `path`
    pub fn provider_for(&self, domain: &str, path: &str) -> Option<Box<dyn RemoteProvider>> {
        let key = domain.to_ascii_lowercase();
        if let Some(custom) = self.custom.get(&key) {
            let mut descriptor = RemoteProviderDescriptor::new(&key, path).custom(true);
            if let Some(name) = &custom.name {
                descriptor = descriptor.with_name(name);
            }
            return Some(create_provider(custom.kind, descriptor));
        }

        Self::builtin_kind(&key)
            .map(|kind| create_provider(kind, RemoteProviderDescriptor::new(&key, path)))
    }

    /// Provider for a git remote URL such as `git@github.com:owner/repo.git`
    pub fn provider_for_remote_url(&self, url: &str) -> RemoteResult<Box<dyn RemoteProvider>> {
        let remote = parse_git_remote(url)?;
        self.provider_for(&remote.domain, &remote.path)
            .ok_or(RemoteError::UnknownProvider(remote.domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_domains() {
        let registry = RemoteProviderRegistry::new();

        let github = registry.provider_for("GitHub.com", "owner/repo").unwrap();
        assert_eq!(github.kind(), RemoteKind::GitHub);
        assert!(!github.descriptor().is_custom());

        let azure = registry.provider_for("contoso.visualstudio.com", "p/_git/r").unwrap();
        assert_eq!(azure.kind(), RemoteKind::AzureDevOps);

        assert!(registry.provider_for("example.com", "owner/repo").is_none());
    }

    #[test]
    fn test_custom_remote_overrides_builtin() {
        let registry = RemoteProviderRegistry::from_settings(&[RemoteSettings {
            kind: RemoteKind::GitLab,
            domain: "github.com".to_string(),
            name: Some("Mirror".to_string()),
        }]);

        let provider = registry.provider_for("github.com", "owner/repo").unwrap();
        assert_eq!(provider.kind(), RemoteKind::GitLab);
        assert!(provider.descriptor().is_custom());
        assert_eq!(provider.name(), "Mirror");
    }

    #[test]
    fn test_provider_for_remote_url() {
        let registry = RemoteProviderRegistry::new();
        let provider = registry
            .provider_for_remote_url("git@github.com:owner/repo.git")
            .unwrap();
        assert_eq!(provider.descriptor().path(), "owner/repo");

        assert!(matches!(
            registry.provider_for_remote_url("https://example.com/owner/repo"),
            Err(RemoteError::UnknownProvider(domain)) if domain == "example.com"
        ));
    }
}
