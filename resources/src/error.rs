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

use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum Error {
    /// Two settings were given that cannot be used together.
    #[error("Only one of {first} or {second} can be specified")]
    ConfigurationConflict { first: &'static str, second: &'static str },

    #[error("MissingBuildSpec: a project without source needs a buildSpec or a buildScriptAsset")]
    MissingBuildSpec,

    #[error("InvalidBuildSpec: {0}")]
    InvalidBuildSpec(String),

    #[error("ReservedEnvironmentVariable: {0}")]
    ReservedEnvironmentVariable(String),

    #[error("InvalidLifecycleRule: {0}")]
    InvalidLifecycleRule(String),

    #[error("InvalidConfiguration: {0}")]
    InvalidConfiguration(#[source] ValidationErrors),

    #[error("InvalidLogicalId: {0:?}")]
    InvalidLogicalId(String),

    #[error("DuplicateLogicalId: {0}")]
    DuplicateLogicalId(String),

    #[error("AssetReadFailed: {path}: {source}")]
    AssetReadFailed { path: String, source: std::io::Error },

    #[error("SerializationError: {0}")]
    SerializationError(#[source] serde_json::Error),

    #[error("YamlSerializationError: {0}")]
    YamlSerializationError(#[source] serde_yaml::Error),

    #[error("InvalidSourceLocation: {0:?} is not a canonical URL")]
    InvalidSourceLocation(String),

    #[error("UrlParseError: {0}")]
    UrlParseError(#[source] url::ParseError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
