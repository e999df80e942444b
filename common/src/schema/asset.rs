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

use crate::intrinsic::Reference;

/// Storage location of a packaged asset, as handed out by the asset stager.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct AssetLocation {
    /// Name of the bucket holding the asset.
    pub bucket: Reference,
    /// `<version>||<key>` of the uploaded object.
    pub version_key: Reference,
}

/// A packaged directory of scripts and the script to run from it.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema, Validate)]
pub struct BuildScript {
    pub asset: AssetLocation,
    /// Path of the script relative to the root of the asset.
    #[validate(length(min = 1))]
    pub entrypoint: String,
}

impl BuildScript {
    pub fn new(asset: AssetLocation, entrypoint: impl Into<String>) -> Self {
        Self { asset, entrypoint: entrypoint.into() }
    }
}
