//! Remote provider abstraction
//!
//! A [`RemoteProvider`] knows one hosting service's URL scheme. The behaviour
//! shared by every provider lives outside the trait so implementors cannot
//! change it:
//! - [`RemoteProviderDescriptor`] owns the endpoint identity plus `base_url`,
//!   `format_name` and `split_path`
//! - [`RemoteProviderExt`] (implemented for every provider) resolves a
//!   [`RemoteResource`] and hands the URL to a [`UrlOpener`]

use async_trait::async_trait;
use ricelens_config::RemoteKind;
use tracing::{debug, info};
use url::Url;

use crate::error::{RemoteError, RemoteResult};
use crate::opener::UrlOpener;
use crate::resource::{LineRange, RemoteResource};

/// Identity of one hosting-service endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProviderDescriptor {
    domain: String,
    path: String,
    name: Option<String>,
    custom: bool,
}

impl RemoteProviderDescriptor {
    /// `path` is the `owner/repository` part of the remote
    pub fn new(domain: impl Into<String>, path: impl Into<String>) -> Self {
        RemoteProviderDescriptor {
            domain: domain.into(),
            path: path.into(),
            name: None,
            custom: false,
        }
    }

    /// Display name overriding the formatted default
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the endpoint as user-configured rather than built in
    pub fn custom(mut self, custom: bool) -> Self {
        self.custom = custom;
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_custom(&self) -> bool {
        self.custom
    }

    pub fn base_url(&self) -> String {
        format!("https://{}/{}", self.domain, self.path)
    }

    /// Explicit name if set, otherwise `label` (suffixed with the domain for
    /// custom endpoints)
    pub fn format_name(&self, label: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None if self.custom => format!("{} ({})", label, self.domain),
            None => label.to_string(),
        }
    }

    /// Split the path at its first `/` into `(owner, repository)`
    pub fn split_path(&self) -> RemoteResult<(&str, &str)> {
        self.path
            .split_once('/')
            .ok_or_else(|| RemoteError::malformed_path(&self.path))
    }
}

/// URL scheme of one hosting service.
///
/// Every `url_for_*` returns `Ok(None)` when the service has no page for the
/// request.
pub trait RemoteProvider: Send + Sync {
    fn descriptor(&self) -> &RemoteProviderDescriptor;

    fn kind(&self) -> RemoteKind;

    /// Display name, e.g. `GitHub` or `GitLab (git.example.com)`
    fn name(&self) -> String {
        self.descriptor().format_name(self.kind().label())
    }

    fn url_for_repository(&self) -> RemoteResult<Option<String>> {
        Ok(Some(self.descriptor().base_url()))
    }

    fn url_for_branches(&self) -> RemoteResult<Option<String>>;

    fn url_for_branch(&self, branch: &str) -> RemoteResult<Option<String>>;

    fn url_for_commit(&self, sha: &str) -> RemoteResult<Option<String>>;

    /// URL of `file_name`, pinned to `sha` if given, else to `branch`
    fn url_for_file(
        &self,
        file_name: &str,
        branch: Option<&str>,
        sha: Option<&str>,
        range: Option<LineRange>,
    ) -> RemoteResult<Option<String>>;
}

/// Resolve-and-open operations available on every [`RemoteProvider`]
#[async_trait]
pub trait RemoteProviderExt: RemoteProvider {
    /// Resolve `resource` to a URL string without opening it
    fn url_for(&self, resource: &RemoteResource) -> RemoteResult<Option<String>>;

    /// Resolve `resource` and open it. Returns the opened URL, or `None` when
    /// the provider has no page for it.
    async fn open(
        &self,
        resource: &RemoteResource,
        opener: &dyn UrlOpener,
    ) -> RemoteResult<Option<Url>>;

    async fn open_repo(&self, opener: &dyn UrlOpener) -> RemoteResult<Option<Url>>;

    async fn open_branches(&self, opener: &dyn UrlOpener) -> RemoteResult<Option<Url>>;

    async fn open_branch(&self, branch: &str, opener: &dyn UrlOpener)
        -> RemoteResult<Option<Url>>;

    async fn open_commit(&self, sha: &str, opener: &dyn UrlOpener) -> RemoteResult<Option<Url>>;

    async fn open_file(
        &self,
        file_name: &str,
        branch: Option<&str>,
        sha: Option<&str>,
        range: Option<LineRange>,
        opener: &dyn UrlOpener,
    ) -> RemoteResult<Option<Url>>;
}

#[async_trait]
impl<P: RemoteProvider + ?Sized> RemoteProviderExt for P {
    fn url_for(&self, resource: &RemoteResource) -> RemoteResult<Option<String>> {
        match resource {
            RemoteResource::Branch { name } => self.url_for_branch(name),
            RemoteResource::Branches => self.url_for_branches(),
            RemoteResource::Commit { sha } => self.url_for_commit(sha),
            RemoteResource::File {
                file_name,
                branch,
                range,
            } => self.url_for_file(file_name, branch.as_deref(), None, *range),
            RemoteResource::Repo => self.url_for_repository(),
            RemoteResource::Revision {
                file_name,
                branch,
                sha,
                commit,
                range,
            } => {
                let sha = sha
                    .as_deref()
                    .or_else(|| commit.as_ref().map(|c| c.sha.as_str()));
                self.url_for_file(file_name, branch.as_deref(), sha, *range)
            }
        }
    }

    async fn open(
        &self,
        resource: &RemoteResource,
        opener: &dyn UrlOpener,
    ) -> RemoteResult<Option<Url>> {
        match resource {
            RemoteResource::Branch { name } => self.open_branch(name, opener).await,
            RemoteResource::Branches => self.open_branches(opener).await,
            RemoteResource::Commit { sha } => self.open_commit(sha, opener).await,
            RemoteResource::File {
                file_name,
                branch,
                range,
            } => {
                self.open_file(file_name, branch.as_deref(), None, *range, opener)
                    .await
            }
            RemoteResource::Repo => self.open_repo(opener).await,
            RemoteResource::Revision {
                file_name,
                branch,
                sha,
                commit,
                range,
            } => {
                let sha = sha
                    .as_deref()
                    .or_else(|| commit.as_ref().map(|c| c.sha.as_str()));
                self.open_file(file_name, branch.as_deref(), sha, *range, opener)
                    .await
            }
        }
    }

    async fn open_repo(&self, opener: &dyn UrlOpener) -> RemoteResult<Option<Url>> {
        open_resolved(self.url_for_repository()?, opener).await
    }

    async fn open_branches(&self, opener: &dyn UrlOpener) -> RemoteResult<Option<Url>> {
        open_resolved(self.url_for_branches()?, opener).await
    }

    async fn open_branch(
        &self,
        branch: &str,
        opener: &dyn UrlOpener,
    ) -> RemoteResult<Option<Url>> {
        open_resolved(self.url_for_branch(branch)?, opener).await
    }

    async fn open_commit(&self, sha: &str, opener: &dyn UrlOpener) -> RemoteResult<Option<Url>> {
        open_resolved(self.url_for_commit(sha)?, opener).await
    }

    async fn open_file(
        &self,
        file_name: &str,
        branch: Option<&str>,
        sha: Option<&str>,
        range: Option<LineRange>,
        opener: &dyn UrlOpener,
    ) -> RemoteResult<Option<Url>> {
        open_resolved(self.url_for_file(file_name, branch, sha, range)?, opener).await
    }
}

/// Parse a resolved URL string
pub fn parse_url(url: &str) -> RemoteResult<Url> {
    Url::parse(url).map_err(|source| RemoteError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

async fn open_resolved(url: Option<String>, opener: &dyn UrlOpener) -> RemoteResult<Option<Url>> {
    let Some(url) = url else {
        debug!("No remote URL resolved; nothing to open");
        return Ok(None);
    };

    let url = parse_url(&url)?;
    info!("Opening remote URL {}", url);
    opener.open_url(&url).await?;
    Ok(Some(url))
}
