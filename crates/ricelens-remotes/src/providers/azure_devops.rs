use ricelens_config::RemoteKind;
use urlencoding::encode;

use crate::error::RemoteResult;
use crate::provider::{RemoteProvider, RemoteProviderDescriptor};
use crate::resource::LineRange;

use super::encode_path;

/// Azure DevOps (formerly Visual Studio Team Services)
#[derive(Debug, Clone)]
pub struct AzureDevOpsProvider {
    descriptor: RemoteProviderDescriptor,
}

impl AzureDevOpsProvider {
    pub fn new(descriptor: RemoteProviderDescriptor) -> Self {
        AzureDevOpsProvider { descriptor }
    }
}

// Only the first line of a range is addressable.
fn line_param(range: Option<LineRange>) -> String {
    range
        .map(|range| format!("&line={}", range.start))
        .unwrap_or_default()
}

impl RemoteProvider for AzureDevOpsProvider {
    fn descriptor(&self) -> &RemoteProviderDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> RemoteKind {
        RemoteKind::AzureDevOps
    }

    fn url_for_branches(&self) -> RemoteResult<Option<String>> {
        Ok(Some(format!("{}/branches", self.descriptor.base_url())))
    }

    fn url_for_branch(&self, branch: &str) -> RemoteResult<Option<String>> {
        Ok(Some(format!(
            "{}/?version=GB{}&_a=history",
            self.descriptor.base_url(),
            encode(branch)
        )))
    }

    fn url_for_commit(&self, sha: &str) -> RemoteResult<Option<String>> {
        Ok(Some(format!(
            "{}/commit/{}",
            self.descriptor.base_url(),
            encode(sha)
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
        let line = line_param(range);
        let file_name = encode_path(file_name);
        let url = match (sha, branch) {
            (Some(sha), _) => format!(
                "{}/commit/{}/?_a=contents&path=%2F{}{}",
                base,
                encode(sha),
                file_name,
                line
            ),
            (None, Some(branch)) => format!(
                "{}/?path=%2F{}&version=GB{}&_a=contents{}",
                base,
                file_name,
                encode(branch),
                line
            ),
            (None, None) => format!("{}?path=%2F{}{}", base, file_name, line),
        };
        Ok(Some(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AzureDevOpsProvider {
        AzureDevOpsProvider::new(RemoteProviderDescriptor::new(
            "dev.azure.com",
            "contoso/_git/web",
        ))
    }

    #[test]
    fn test_branch_url() {
        assert_eq!(
            provider().url_for_branch("main").unwrap().unwrap(),
            "https://dev.azure.com/contoso/_git/web/?version=GBmain&_a=history"
        );
    }

    #[test]
    fn test_file_urls_use_first_line_only() {
        let azure = provider();
        assert_eq!(
            azure
                .url_for_file("src/app.ts", Some("main"), Some("0ff1ce"), Some(LineRange::new(8, 20)))
                .unwrap()
                .unwrap(),
            "https://dev.azure.com/contoso/_git/web/commit/0ff1ce/?_a=contents&path=%2Fsrc/app.ts&line=8"
        );
        assert_eq!(
            azure
                .url_for_file("src/app.ts", Some("main"), None, None)
                .unwrap()
                .unwrap(),
            "https://dev.azure.com/contoso/_git/web/?path=%2Fsrc/app.ts&version=GBmain&_a=contents"
        );
        assert_eq!(
            azure
                .url_for_file("src/app.ts", None, None, Some(LineRange::single(3)))
                .unwrap()
                .unwrap(),
            "https://dev.azure.com/contoso/_git/web?path=%2Fsrc/app.ts&line=3"
        );
    }

    #[test]
    fn test_file_name_cannot_break_the_query() {
        let url = provider()
            .url_for_file("docs/a#b&c.md", Some("main"), None, Some(LineRange::single(2)))
            .unwrap()
            .unwrap();
        let parsed = url::Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("path".to_string(), "/docs/a#b&c.md".to_string())));
        assert!(pairs.contains(&("line".to_string(), "2".to_string())));
        assert_eq!(parsed.fragment(), None);
    }
}
