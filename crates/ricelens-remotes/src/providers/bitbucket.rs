use ricelens_config::RemoteKind;

use crate::error::RemoteResult;
use crate::provider::{RemoteProvider, RemoteProviderDescriptor};
use crate::resource::LineRange;

use super::{encode_path, revision};

/// bitbucket.org
#[derive(Debug, Clone)]
pub struct BitbucketProvider {
    descriptor: RemoteProviderDescriptor,
}

impl BitbucketProvider {
    pub fn new(descriptor: RemoteProviderDescriptor) -> Self {
        BitbucketProvider { descriptor }
    }
}

fn line_anchor(file_name: &str, range: Option<LineRange>) -> String {
    match range {
        Some(range) if range.is_single_line() => format!("#{}-{}", file_name, range.start),
        Some(range) => format!("#{}-{}:{}", file_name, range.start, range.end),
        None => String::new(),
    }
}

impl RemoteProvider for BitbucketProvider {
    fn descriptor(&self) -> &RemoteProviderDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> RemoteKind {
        RemoteKind::Bitbucket
    }

    fn url_for_branches(&self) -> RemoteResult<Option<String>> {
        Ok(Some(format!("{}/branches", self.descriptor.base_url())))
    }

    fn url_for_branch(&self, branch: &str) -> RemoteResult<Option<String>> {
        Ok(Some(format!(
            "{}/commits/branch/{}",
            self.descriptor.base_url(),
            encode_path(branch)
        )))
    }

    fn url_for_commit(&self, sha: &str) -> RemoteResult<Option<String>> {
        Ok(Some(format!(
            "{}/commits/{}",
            self.descriptor.base_url(),
            encode_path(sha)
        )))
    }

    fn url_for_file(
        &self,
        file_name: &str,
        branch: Option<&str>,
        sha: Option<&str>,
        range: Option<LineRange>,
    ) -> RemoteResult<Option<String>> {
        let base = self.descriptor.base_url();
        let file_name = encode_path(file_name);
        let anchor = line_anchor(&file_name, range);
        let url = match revision(branch, sha) {
            Some(rev) => format!("{}/src/{}/{}{}", base, encode_path(rev), file_name, anchor),
            None => format!("{}?path={}{}", base, file_name, anchor),
        };
        Ok(Some(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> BitbucketProvider {
        BitbucketProvider::new(RemoteProviderDescriptor::new("bitbucket.org", "atlas/site"))
    }

    #[test]
    fn test_branch_url() {
        assert_eq!(
            provider().url_for_branch("main").unwrap().unwrap(),
            "https://bitbucket.org/atlas/site/commits/branch/main"
        );
    }

    #[test]
    fn test_file_anchor_names_the_file() {
        assert_eq!(
            provider()
                .url_for_file("index.html", None, Some("cafe"), Some(LineRange::new(2, 4)))
                .unwrap()
                .unwrap(),
            "https://bitbucket.org/atlas/site/src/cafe/index.html#index.html-2:4"
        );
        assert_eq!(
            provider()
                .url_for_file("index.html", Some("main"), None, Some(LineRange::single(2)))
                .unwrap()
                .unwrap(),
            "https://bitbucket.org/atlas/site/src/main/index.html#index.html-2"
        );
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let url = provider()
            .url_for_file("docs/a#b.md", Some("fix/#12"), None, Some(LineRange::new(1, 2)))
            .unwrap()
            .unwrap();
        assert_eq!(
            url,
            "https://bitbucket.org/atlas/site/src/fix/%2312/docs/a%23b.md#docs/a%23b.md-1:2"
        );
        let parsed = url::Url::parse(&url).unwrap();
        assert_eq!(parsed.path(), "/atlas/site/src/fix/%2312/docs/a%23b.md");
        assert_eq!(parsed.fragment(), Some("docs/a%23b.md-1:2"));
    }
}
