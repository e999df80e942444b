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

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ReadManifestFailed: {path}: {source}")]
    ReadManifestFailed { path: PathBuf, source: std::io::Error },

    #[error("UnknownManifestFormat: {0}")]
    UnknownManifestFormat(PathBuf),

    #[error("YamlParseFailed: {0}")]
    YamlParseFailed(#[source] serde_yaml::Error),

    #[error("TomlParseFailed: {0}")]
    TomlParseFailed(#[source] toml::de::Error),

    #[error("JsonParseFailed: {0}")]
    JsonParseFailed(#[source] serde_json::Error),

    #[error("IncompleteBuildScript: project {0} needs both build_script_path and build_script_entrypoint")]
    IncompleteBuildScript(String),

    #[error("ConflictingBuildScript: project {0} sets both build_script and build_script_path")]
    ConflictingBuildScript(String),

    #[error("ConflictingCacheBucket: project {0} sets both cache_bucket and cache_bucket_name")]
    ConflictingCacheBucket(String),

    #[error("ResourceError: {0}")]
    ResourceError(#[from] plinth_resources::error::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
