//! Concrete hosting-service providers

mod azure_devops;
mod bitbucket;
mod bitbucket_server;
mod github;
mod gitlab;

pub use azure_devops::AzureDevOpsProvider;
pub use bitbucket::BitbucketProvider;
pub use bitbucket_server::BitbucketServerProvider;
pub use github::GitHubProvider;
pub use gitlab::GitLabProvider;

use ricelens_config::RemoteKind;
use urlencoding::encode;

use crate::provider::{RemoteProvider, RemoteProviderDescriptor};

/// Build the provider for `kind`
pub fn create_provider(
    kind: RemoteKind,
    descriptor: RemoteProviderDescriptor,
) -> Box<dyn RemoteProvider> {
    match kind {
        RemoteKind::GitHub => Box::new(GitHubProvider::new(descriptor)),
        RemoteKind::GitLab => Box::new(GitLabProvider::new(descriptor)),
        RemoteKind::Bitbucket => Box::new(BitbucketProvider::new(descriptor)),
        RemoteKind::BitbucketServer => Box::new(BitbucketServerProvider::new(descriptor)),
        RemoteKind::AzureDevOps => Box::new(AzureDevOpsProvider::new(descriptor)),
    }
}

/// Revision a file URL is pinned to; a sha wins over a branch
fn revision<'a>(branch: Option<&'a str>, sha: Option<&'a str>) -> Option<&'a str> {
    sha.or(branch)
}

/// Percent-encode each `/`-separated segment of a repository path
///
/// Slashes stay as separators so nested files and branches such as
/// `feature/x` keep their hierarchy, while `#`, `?` and spaces can no longer
/// leak into the query or fragment.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path_keeps_separators() {
        assert_eq!(encode_path("src/lib.rs"), "src/lib.rs");
        assert_eq!(encode_path("docs/a#b.md"), "docs/a%23b.md");
        assert_eq!(encode_path("fix/#12"), "fix/%2312");
        assert_eq!(encode_path("what?.md"), "what%3F.md");
        assert_eq!(encode_path("my notes/100%.txt"), "my%20notes/100%25.txt");
    }
}
