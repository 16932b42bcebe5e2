use ricelens_config::RemoteKind;

use crate::error::RemoteResult;
use crate::provider::{RemoteProvider, RemoteProviderDescriptor};
use crate::resource::LineRange;

use super::{encode_path, revision};

/// gitlab.com and self-managed GitLab
#[derive(Debug, Clone)]
pub struct GitLabProvider {
    descriptor: RemoteProviderDescriptor,
}

impl GitLabProvider {
    pub fn new(descriptor: RemoteProviderDescriptor) -> Self {
        GitLabProvider { descriptor }
    }
}

fn line_anchor(range: Option<LineRange>) -> String {
    match range {
        Some(range) if range.is_single_line() => format!("#L{}", range.start),
        Some(range) => format!("#L{}-{}", range.start, range.end),
        None => String::new(),
    }
}

impl RemoteProvider for GitLabProvider {
    fn descriptor(&self) -> &RemoteProviderDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> RemoteKind {
        RemoteKind::GitLab
    }

    fn url_for_branches(&self) -> RemoteResult<Option<String>> {
        Ok(Some(format!("{}/branches", self.descriptor.base_url())))
    }

    fn url_for_branch(&self, branch: &str) -> RemoteResult<Option<String>> {
        Ok(Some(format!(
            "{}/commits/{}",
            self.descriptor.base_url(),
            encode_path(branch)
        )))
    }

    fn url_for_commit(&self, sha: &str) -> RemoteResult<Option<String>> {
        Ok(Some(format!(
            "{}/commit/{}",
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
        let anchor = line_anchor(range);
        let file_name = encode_path(file_name);
        let url = match revision(branch, sha) {
            Some(rev) => format!("{}/blob/{}/{}{}", base, encode_path(rev), file_name, anchor),
            None => format!("{}?path={}{}", base, file_name, anchor),
        };
        Ok(Some(url))
    }
}
