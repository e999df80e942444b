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
use validator::Validate;

/// The container a build runs in.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema, Validate)]
pub struct BuildEnvironment {
    /// Compute tier, `small` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_type: Option<ComputeType>,
    /// Build image, the standard managed image when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub image: Option<String>,
    /// Required to build Docker images inside the build.
    #[serde(default)]
    pub privileged: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate]
    pub variables: Vec<EnvironmentVariable>,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComputeType {
    #[default]
    Small,
    Medium,
    Large,
}

impl ComputeType {
    pub fn token(&self) -> &'static str {
        match self {
            ComputeType::Small => "BUILD_GENERAL1_SMALL",
            ComputeType::Medium => "BUILD_GENERAL1_MEDIUM",
            ComputeType::Large => "BUILD_GENERAL1_LARGE",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema, Validate)]
pub struct EnvironmentVariable {
    #[validate(length(min = 1))]
    pub name: String,
    /// A literal, or a reference such as `{"Ref": "Parameter"}`.
    pub value: Value,
    #[serde(default)]
    pub kind: VariableKind,
}

impl EnvironmentVariable {
    pub fn plaintext(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { name: name.into(), value: value.into(), kind: VariableKind::Plaintext }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    #[default]
    Plaintext,
    ParameterStore,
    SecretsManager,
}

impl VariableKind {
    pub fn token(&self) -> &'static str {
        match self {
            VariableKind::Plaintext => "PLAINTEXT",
            VariableKind::ParameterStore => "PARAMETER_STORE",
            VariableKind::SecretsManager => "SECRETS_MANAGER",
        }
    }
}
