//! RiceLens remote providers
//!
//! Turns a [`RemoteResource`] (branch, commit, file at a revision, ...) into a
//! URL on the hosting service behind a git remote and opens it through a
//! [`UrlOpener`].
//!
//! ```ignore
//! let registry = RemoteProviderRegistry::new();
//! let provider = registry.provider_for_remote_url("git@github.com:owner/repo.git")?;
//! provider.open(&RemoteResource::Branches, &SystemUrlOpener).await?;
//! ```

pub mod error;
pub mod opener;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod remote_url;
pub mod resource;

pub use error::{RemoteError, RemoteResult};
pub use opener::{SystemUrlOpener, UrlOpener};
pub use provider::{parse_url, RemoteProvider, RemoteProviderDescriptor, RemoteProviderExt};
pub use providers::{
    create_provider, AzureDevOpsProvider, BitbucketProvider, BitbucketServerProvider,
    GitHubProvider, GitLabProvider,
};
pub use registry::RemoteProviderRegistry;
pub use remote_url::{parse_git_remote, GitRemote};
pub use resource::{CommitRef, LineRange, RemoteResource};

pub use ricelens_config::RemoteKind;
