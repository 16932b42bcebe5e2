use ricelens_config::RemoteKind;
use urlencoding::encode;

use crate::error::RemoteResult;
use crate::provider::{RemoteProvider, RemoteProviderDescriptor};
use crate::resource::LineRange;

use super::{encode_path, revision};

/// Self-hosted Bitbucket Server / Data Center.
///
/// Pages live under `/projects/{project}/repos/{repo}`, so every URL needs the
/// path split into its two parts.
#[derive(Debug, Clone)]
pub struct BitbucketServerProvider {
    descriptor: RemoteProviderDescriptor,
}

impl BitbucketServerProvider {
    pub fn new(descriptor: RemoteProviderDescriptor) -> Self {
        BitbucketServerProvider { descriptor }
    }

    fn repo_url(&self) -> RemoteResult<String> {
        let (project, repo) = self.descriptor.split_path()?;
        Ok(format!(
            "https://{}/projects/{}/repos/{}",
            self.descriptor.domain(),
            project,
            repo
        ))
    }
}

fn line_anchor(range: Option<LineRange>) -> String {
    match range {
        Some(range) if range.is_single_line() => format!("#{}", range.start),
        Some(range) => format!("#{}-{}", range.start, range.end),
        None => String::new(),
    }
}

impl RemoteProvider for BitbucketServerProvider {
    fn descriptor(&self) -> &RemoteProviderDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> RemoteKind {
        RemoteKind::BitbucketServer
    }

    fn url_for_repository(&self) -> RemoteResult<Option<String>> {
        Ok(Some(format!("{}/browse", self.repo_url()?)))
    }

    fn url_for_branches(&self) -> RemoteResult<Option<String>> {
        Ok(Some(format!("{}/branches", self.repo_url()?)))
    }

    fn url_for_branch(&self, branch: &str) -> RemoteResult<Option<String>> {
        Ok(Some(format!(
            "{}/commits?until={}",
            self.repo_url()?,
            encode(branch)
        )))
    }

    fn url_for_commit(&self, sha: &str) -> RemoteResult<Option<String>> {
        Ok(Some(format!("{}/commits/{}", self.repo_url()?, encode(sha))))
    }

    fn url_for_file(
        &self,
        file_name: &str,
        branch: Option<&str>,
        sha: Option<&str>,
        range: Option<LineRange>,
    ) -> RemoteResult<Option<String>> {
        let base = self.repo_url()?;
        let anchor = line_anchor(range);
        let file_name = encode_path(file_name);
        let url = match revision(branch, sha) {
            Some(rev) => format!(
                "{}/browse/{}?at={}{}",
                base,
                file_name,
                encode(rev),
                anchor
            ),
            None => format!("{}/browse/{}{}", base, file_name, anchor),
        };
        Ok(Some(url))
    }
}
