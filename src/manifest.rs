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

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use plinth_common::intrinsic::Reference;
use plinth_common::schema::{BuildScript, ProjectConfig, RepositoryConfig};
use plinth_resources::asset::AssetStaging;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Error, Result};

/// A stack: the projects and repositories synthesized into one template.
#[derive(Deserialize, Serialize, Debug, Default, PartialEq, JsonSchema)]
pub struct StackManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub projects: BTreeMap<String, ProjectManifest>,

    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryConfig>,
}

/// A project configuration, plus the settings that only a manifest on disk
/// can express: local script directories and plain bucket names.
#[derive(Deserialize, Serialize, Debug, Default, PartialEq, JsonSchema)]
pub struct ProjectManifest {
    #[serde(flatten)]
    pub config: ProjectConfig,

    /// Directory of scripts to package, relative to the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_script_path: Option<PathBuf>,

    /// Script to run from `build_script_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_script_entrypoint: Option<String>,

    /// Name of an existing bucket used as the build cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_bucket_name: Option<String>,
}

impl ProjectManifest {
    /// Stages the build script, if any, and returns the project configuration.
    pub fn into_config(self, id: &str, base: &Path, staging: &mut dyn AssetStaging) -> Result<ProjectConfig> {
        let mut config = self.config;

        match (self.build_script_path, self.build_script_entrypoint) {
            (Some(_), Some(_)) if config.build_script.is_some() => {
                return Err(Error::ConflictingBuildScript(id.to_string()));
            }
            (Some(path), Some(entrypoint)) => {
                let path = base.join(path);
                debug!("Staging build script {} for project {}", path.display(), id);
                let asset = staging.stage(&path)?;
                config.build_script = Some(BuildScript::new(asset, entrypoint));
            }
            (None, None) => {}
            _ => return Err(Error::IncompleteBuildScript(id.to_string())),
        }

        if let Some(name) = self.cache_bucket_name {
            if config.cache_bucket.is_some() {
                return Err(Error::ConflictingCacheBucket(id.to_string()));
            }
            config.cache_bucket = Some(Reference::literal(name));
        }

        Ok(config)
    }
}

/// Reads a manifest, choosing the parser by file extension.
pub fn load(path: &Path) -> Result<StackManifest> {
    let content =
        fs::read_to_string(path).map_err(|source| Error::ReadManifestFailed { path: path.to_path_buf(), source })?;

    match path.extension().and_then(|extension| extension.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(Error::YamlParseFailed),
        Some("toml") => toml::from_str(&content).map_err(Error::TomlParseFailed),
        Some("json") => serde_json::from_str(&content).map_err(Error::JsonParseFailed),
        _ => Err(Error::UnknownManifestFormat(path.to_path_buf())),
    }
}
