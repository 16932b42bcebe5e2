//! Git remote URL parsing

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{RemoteError, RemoteResult};

lazy_static! {
    // scheme://user@host:port/path; only here may a port follow the host
    static ref URL_REMOTE_RE: Regex = Regex::new(
        r"^[A-Za-z][A-Za-z0-9+.-]*://(?:[^@/\s]+@)?(?P<domain>[^/:\s]+)(?::\d+)?/+(?P<path>.+?)(?:\.git)?/*$"
    )
    .expect("url remote regex");

    // user@host:path and host/path; everything after the colon is path
    static ref SCP_REMOTE_RE: Regex = Regex::new(
        r"^(?:[^@/\s]+@)?(?P<domain>[^/:\s]+)[:/]+(?P<path>.+?)(?:\.git)?/*$"
    )
    .expect("scp remote regex");
}

/// Domain and repository path of a git remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRemote {
    pub domain: String,
    pub path: String,
}

/// Split a git remote URL (https, ssh or scp-like) into domain and path
pub fn parse_git_remote(url: &str) -> RemoteResult<GitRemote> {
    let url = url.trim();
    let re = if url.contains("://") {
        &*URL_REMOTE_RE
    } else {
        &*SCP_REMOTE_RE
    };
    let captures = re
        .captures(url)
        .ok_or_else(|| RemoteError::UnparsableRemote(url.to_string()))?;

    let domain = captures["domain"].to_ascii_lowercase();
    let path = captures["path"].trim_matches('/').to_string();
    if path.is_empty() {
        return Err(RemoteError::UnparsableRemote(url.to_string()));
    }

    Ok(GitRemote { domain, path })
}
