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

use super::{BuildEnvironment, BuildScript, BuildSpec, CacheMode, Source};
use crate::intrinsic::Reference;

/// Configuration of a build project.
///
/// Nothing is checked here; `Project::new` in the resources crate validates
/// the whole record at once and resolves every default.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema, Validate)]
pub struct ProjectConfig {
    #[serde(default)]
    pub source: Source,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_spec: Option<BuildSpec>,

    /// Scripts packaged as an asset and run as the build, replaces `build_spec`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate]
    pub build_script: Option<BuildScript>,

    /// Bucket for the build cache, conflicts with `cache_modes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_bucket: Option<Reference>,

    /// Key prefix of the cache objects inside `cache_bucket`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_prefix: Option<String>,

    /// Local cache modes, conflicts with `cache_bucket`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_modes: Option<Vec<CacheMode>>,

    #[serde(default)]
    #[validate]
    pub environment: BuildEnvironment,

    /// Physical name of the project, generated by the provisioning backend when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 255))]
    pub project_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 5, max = 480))]
    pub timeout_minutes: Option<u32>,

    /// ARN of an existing service role; a new role is created when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Reference>,

    #[serde(default)]
    pub badge: bool,
}

impl ProjectConfig {
    pub fn new(source: Source) -> Self {
        Self { source, ..Default::default() }
    }

    /// Appends a local cache mode, keeping the order in which modes are added.
    pub fn add_cache_mode(&mut self, mode: CacheMode) {
        self.cache_modes.get_or_insert_with(Vec::new).push(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_cache_mode_preserves_order() {
        let mut config = ProjectConfig::default();
        assert_eq!(config.cache_modes, None);

        config.add_cache_mode(CacheMode::SourceCache);
        config.add_cache_mode(CacheMode::CustomCache);

        assert_eq!(config.cache_modes, Some(vec![CacheMode::SourceCache, CacheMode::CustomCache]));
    }

    #[test]
    fn test_timeout_range() {
        let config = ProjectConfig { timeout_minutes: Some(2), ..Default::default() };
        assert!(config.validate().is_err());

        let config = ProjectConfig { timeout_minutes: Some(60), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: ProjectConfig =
            serde_json::from_str(r#"{"source": {"type": "github", "owner": "o", "repo": "r"}}"#).unwrap();
        assert_eq!(config.source, Source::github("o", "r"));
        assert_eq!(config.environment, BuildEnvironment::default());
        assert!(!config.badge);
    }
}
