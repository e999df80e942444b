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

use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Local caching strategies kept on the build host between builds.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Directories listed in the build spec's cache section.
    CustomCache,
    /// Docker layers from previous image builds.
    DockerLayerCache,
    /// Git metadata of the primary and secondary sources.
    SourceCache,
}

impl CacheMode {
    pub fn token(&self) -> &'static str {
        match self {
            CacheMode::CustomCache => "LOCAL_CUSTOM_CACHE",
            CacheMode::DockerLayerCache => "LOCAL_DOCKER_LAYER_CACHE",
            CacheMode::SourceCache => "LOCAL_SOURCE_CACHE",
        }
    }
}

impl Display for CacheMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}
