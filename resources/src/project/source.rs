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

use plinth_common::intrinsic::join;
use plinth_common::schema::{self, Source as SourceConfig};
use serde_json::{json, Map, Value};
use url::Url;
use validator::Validate;

use crate::error::{Error, Result};

const GITHUB_URL: &str = "https://github.com/";

/// A source with its location already resolved.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Source {
    NoSource,
    GitHub { location: String, report_build_status: bool, clone_depth: Option<u32>, webhook: bool },
    CodePipeline,
    CodeCommit { location: String, clone_depth: Option<u32> },
    S3 { location: Value },
}

pub(crate) fn resolve(source: &SourceConfig) -> Result<Source> {
    let resolved = match source {
        SourceConfig::NoSource => Source::NoSource,
        SourceConfig::CodePipeline => Source::CodePipeline,
        SourceConfig::GitHub(github) => {
            github.validate().map_err(Error::InvalidConfiguration)?;
            Source::GitHub {
                location: github_location(github)?,
                report_build_status: github.report_build_status,
                clone_depth: github.clone_depth,
                webhook: github.webhook,
            }
        }
        SourceConfig::CodeCommit(codecommit) => {
            codecommit.validate().map_err(Error::InvalidConfiguration)?;
            Source::CodeCommit { location: codecommit_location(codecommit)?, clone_depth: codecommit.clone_depth }
        }
        SourceConfig::S3(s3) => {
            s3.validate().map_err(Error::InvalidConfiguration)?;
            Source::S3 { location: join("/", vec![s3.bucket.as_value().clone(), json!(s3.path)]) }
        }
    };

    Ok(resolved)
}

fn github_location(source: &schema::GitHubSource) -> Result<String> {
    checked_location(format!("{}{}/{}.git", GITHUB_URL, source.owner, source.repo))
}

fn codecommit_location(source: &schema::CodeCommitSource) -> Result<String> {
    checked_location(format!(
        "https://git-codecommit.{}.amazonaws.com/v1/repos/{}",
        source.region, source.repository_name
    ))
}

/// Returns the interpolated location if it is a URL that parses back unchanged.
fn checked_location(location: String) -> Result<String> {
    let url = Url::parse(&location).map_err(Error::UrlParseError)?;
    if url.as_str() != location {
        return Err(Error::InvalidSourceLocation(location));
    }

    Ok(location)
}

impl Source {
    pub fn token(&self) -> &'static str {
        match self {
            Source::NoSource => "NO_SOURCE",
            Source::GitHub { .. } => "GITHUB",
            Source::CodePipeline => "CODEPIPELINE",
            Source::CodeCommit { .. } => "CODECOMMIT",
            Source::S3 { .. } => "S3",
        }
    }

    pub fn render(&self, build_spec: Option<&str>) -> Value {
        let mut source = Map::new();
        source.insert("Type".into(), json!(self.token()));

        match self {
            Source::NoSource | Source::CodePipeline => {}
            Source::GitHub { location, report_build_status, clone_depth, .. } => {
                source.insert("Location".into(), json!(location));
                source.insert("ReportBuildStatus".into(), json!(report_build_status));
                if let Some(depth) = clone_depth {
                    source.insert("GitCloneDepth".into(), json!(depth));
                }
            }
            Source::CodeCommit { location, clone_depth } => {
                source.insert("Location".into(), json!(location));
                if let Some(depth) = clone_depth {
                    source.insert("GitCloneDepth".into(), json!(depth));
                }
            }
            Source::S3 { location } => {
                source.insert("Location".into(), location.clone());
            }
        }

        if let Some(build_spec) = build_spec {
            source.insert("BuildSpec".into(), json!(build_spec));
        }

        Value::Object(source)
    }

    /// Pipeline builds hand their output back to the pipeline, others produce nothing.
    pub fn artifacts(&self) -> Value {
        match self {
            Source::CodePipeline => json!({ "Type": "CODEPIPELINE" }),
            _ => json!({ "Type": "NO_ARTIFACTS" }),
        }
    }

    pub fn triggers(&self) -> Option<Value> {
        match self {
            Source::GitHub { webhook: true, .. } => Some(json!({ "Webhook": true })),
            _ => None,
        }
    }
}
