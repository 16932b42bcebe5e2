//! Git resources that can be shown on a hosting service

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

/// A git resource to resolve into a remote URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RemoteResource {
    Branch {
        name: String,
    },
    Branches,
    Commit {
        sha: String,
    },
    File {
        file_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        branch: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<LineRange>,
    },
    Repo,
    /// A file at a specific revision
    Revision {
        file_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        branch: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sha: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        commit: Option<CommitRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<LineRange>,
    },
}

impl RemoteResource {
    /// Display name of the resource kind
    pub fn label(&self) -> &'static str {
        match self {
            RemoteResource::Branch { .. } => "Branch",
            RemoteResource::Branches => "Branches",
            RemoteResource::Commit { .. } => "Commit",
            RemoteResource::File { .. } => "File",
            RemoteResource::Repo => "Repository",
            RemoteResource::Revision { .. } => "Revision",
        }
    }
}

/// Commit a revision was taken from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    pub sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl CommitRef {
    pub fn new(sha: impl Into<String>) -> Self {
        CommitRef {
            sha: sha.into(),
            summary: None,
        }
    }
}

/// Inclusive, 1-based line range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Range over `start..=end`; bounds are swapped if given in reverse
    pub fn new(start: u32, end: u32) -> Self {
        LineRange {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn single(line: u32) -> Self {
        LineRange {
            start: line,
            end: line,
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_line() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for LineRange {
    type Err = RemoteError;

    /// Parse `"10"` or `"10-20"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RemoteError::InvalidRange(s.to_string());
        let parse_line = |text: &str| -> Result<u32, RemoteError> {
            match text.trim().parse::<u32>() {
                Ok(0) | Err(_) => Err(invalid()),
                Ok(line) => Ok(line),
            }
        };

        match s.split_once('-') {
            Some((start, end)) => Ok(LineRange::new(parse_line(start)?, parse_line(end)?)),
            None => Ok(LineRange::single(parse_line(s)?)),
        }
    }
}
