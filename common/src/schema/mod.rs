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

mod asset;
mod build_spec;
mod cache;
mod environment;
mod project;
mod repository;
mod source;

pub use asset::{AssetLocation, BuildScript};
pub use build_spec::BuildSpec;
pub use cache::CacheMode;
pub use environment::{BuildEnvironment, ComputeType, EnvironmentVariable, VariableKind};
pub use project::ProjectConfig;
pub use repository::{LifecycleRule, RepositoryConfig, TagMutability, TagStatus};
pub use source::{CodeCommitSource, GitHubSource, S3Source, Source};

use validator::ValidationError;

/// A name used as a single URL path segment (owner, repository, region).
/// Only ASCII letters, digits, `-`, `_` and `.` pass, so the segment is
/// never rewritten when it becomes part of a URL.
pub(crate) fn validate_path_segment(value: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if value.is_empty() || value == "." || value == ".." || !value.chars().all(allowed) {
        return Err(ValidationError::new("path_segment"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path_segment() {
        assert!(validate_path_segment("testowner").is_ok());
        assert!(validate_path_segment("").is_err());
        assert!(validate_path_segment("a/b").is_err());
        assert!(validate_path_segment("..").is_err());
        assert!(validate_path_segment("repo#main").is_err());
        assert!(validate_path_segment("my-repo_v2.0").is_ok());
    }

    #[test]
    fn test_segments_rewritten_by_url_parsing_are_rejected() {
        for segment in ["a\\b", "%2e%2e", "te\tst", "caf\u{e9}", "a b", "a?b", "\u{7f}"] {
            assert!(validate_path_segment(segment).is_err(), "{:?} was accepted", segment);
        }
    }
}
