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
use serde_json::Value;

/// The commands a build runs, either inline or by file name.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum BuildSpec {
    /// Path of a build spec file inside the source, e.g. `buildspec.yml`.
    Filename(String),
    /// A structured document, embedded into the template as JSON text.
    Inline(Value),
}

impl BuildSpec {
    /// Returns the text as it appears in the template. Inline documents are
    /// printed with two-space indentation and sorted keys.
    pub fn to_text(&self) -> serde_json::Result<String> {
        match self {
            BuildSpec::Filename(filename) => Ok(filename.clone()),
            BuildSpec::Inline(document) => serde_json::to_string_pretty(document),
        }
    }
}

impl From<Value> for BuildSpec {
    fn from(document: Value) -> Self {
        match document {
            Value::String(filename) => BuildSpec::Filename(filename),
            document => BuildSpec::Inline(document),
        }
    }
}
