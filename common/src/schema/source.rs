// Copyright (c) The Plinth Authors. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_path_segment;
use crate::intrinsic::Reference;

/// Where a project reads its source code from.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    /// The build spec carries everything the build needs.
    #[default]
    NoSource,
    /// A GitHub repository, cloned by the build service.
    #[serde(rename = "github")]
    GitHub(GitHubSource),
    /// The source is handed over by the pipeline that triggers the build.
    #[serde(rename = "codepipeline")]
    CodePipeline,
    #[serde(rename = "codecommit")]
    CodeCommit(CodeCommitSource),
    S3(S3Source),
}

impl Source {
    pub fn github(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Source::GitHub(GitHubSource::new(owner, repo))
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema, Validate)]
pub struct GitHubSource {
    #[validate(custom = "validate_path_segment")]
    pub owner: String,
    #[validate(custom = "validate_path_segment")]
    pub repo: String,
    /// Shallow clone depth, a full clone when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_depth: Option<u32>,
    /// Report the build status back to the commit, defaults to `true`.
    #[serde(default = "default_report_build_status")]
    pub report_build_status: bool,
    /// Rebuild every time a change is pushed to the repository.
    #[serde(default)]
    pub webhook: bool,
}

impl GitHubSource {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            clone_depth: None,
            report_build_status: default_report_build_status(),
            webhook: false,
        }
    }
}

fn default_report_build_status() -> bool {
    true
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema, Validate)]
pub struct CodeCommitSource {
    #[validate(custom = "validate_path_segment")]
    pub repository_name: String,
    #[validate(custom = "validate_path_segment")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_depth: Option<u32>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema, Validate)]
pub struct S3Source {
    pub bucket: Reference,
    /// Key of the zipped source bundle inside the bucket.
    #[validate(length(min = 1))]
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_defaults() {
        let source: Source = serde_json::from_str(r#"{"type": "github", "owner": "o", "repo": "r"}"#).unwrap();
        assert_eq!(source, Source::github("o", "r"));

        if let Source::GitHub(github) = source {
            assert!(github.report_build_status);
            assert!(!github.webhook);
            assert_eq!(github.clone_depth, None);
        }
    }

    #[test]
    fn test_unit_variants() {
        let source: Source = serde_json::from_str(r#"{"type": "no_source"}"#).unwrap();
        assert_eq!(source, Source::NoSource);

        let source: Source = serde_json::from_str(r#"{"type": "codepipeline"}"#).unwrap();
        assert_eq!(source, Source::CodePipeline);
    }

    #[test]
    fn test_invalid_github_owner() {
        let source = GitHubSource::new("", "repo");
        assert!(source.validate().is_err());
    }
}
