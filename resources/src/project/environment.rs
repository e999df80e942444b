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

use plinth_common::schema::{BuildEnvironment, BuildScript, ComputeType, EnvironmentVariable};
use serde_json::{json, Value};

use super::script;
use crate::error::{Error, Result};

const DEFAULT_BUILD_IMAGE: &str = "aws/codebuild/standard:7.0";
const ENVIRONMENT_TYPE: &str = "LINUX_CONTAINER";

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Environment {
    pub compute_type: ComputeType,
    pub image: String,
    pub privileged: bool,
    pub variables: Vec<EnvironmentVariable>,
}

/// Fills in the environment defaults. The script variables come first,
/// followed by the user variables in the order they were given.
pub(crate) fn resolve(environment: BuildEnvironment, build_script: Option<&BuildScript>) -> Result<Environment> {
    let mut variables = vec![];
    if let Some(build_script) = build_script {
        if let Some(reserved) = environment.variables.iter().find(|v| script::is_reserved(&v.name)) {
            return Err(Error::ReservedEnvironmentVariable(reserved.name.clone()));
        }
        variables.extend(script::variables(&build_script.asset));
    }
    variables.extend(environment.variables);

    Ok(Environment {
        compute_type: environment.compute_type.unwrap_or_default(),
        image: environment.image.unwrap_or_else(|| DEFAULT_BUILD_IMAGE.into()),
        privileged: environment.privileged,
        variables,
    })
}

impl Environment {
    pub fn render(&self) -> Value {
        let mut environment = json!({
            "Type": ENVIRONMENT_TYPE,
            "Image": self.image,
            "ComputeType": self.compute_type.token(),
            "PrivilegedMode": self.privileged,
        });

        if !self.variables.is_empty() {
            environment["EnvironmentVariables"] = self
                .variables
                .iter()
                .map(|variable| json!({"Name": variable.name, "Type": variable.kind.token(), "Value": variable.value}))
                .collect();
        }

        environment
    }
}
