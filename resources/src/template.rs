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

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::asset::AssetStaging;
use crate::error::{Error, Result};
use crate::project::Project;
use crate::repository::Repository;
use crate::ResourceDescription;

const FORMAT_VERSION: &str = "2010-09-09";

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub parameter_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    pub fn string(description: impl Into<String>) -> Self {
        Self { parameter_type: "String".into(), description: Some(description.into()) }
    }
}

/// A set of resources and parameters, keyed by logical ID.
#[derive(Clone, Debug, Default)]
pub struct Template {
    description: Option<String>,
    parameters: BTreeMap<String, Parameter>,
    resources: BTreeMap<String, ResourceDescription>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    pub fn resource(&self, logical_id: &str) -> Option<&ResourceDescription> {
        self.resources.get(logical_id)
    }

    #[inline]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Adds resources all at once; nothing is added if any ID is taken.
    pub fn add_resources(&mut self, resources: Vec<(String, ResourceDescription)>) -> Result<()> {
        if let Some((logical_id, _)) = resources.iter().find(|(logical_id, _)| self.resources.contains_key(logical_id)) {
            return Err(Error::DuplicateLogicalId(logical_id.clone()));
        }

        for (logical_id, resource) in resources {
            debug!("Adding resource {} of type {}", logical_id, resource.resource_type);
            self.resources.insert(logical_id, resource);
        }

        Ok(())
    }

    pub fn add_project(&mut self, project: &Project) -> Result<()> {
        self.add_resources(project.resources())
    }

    pub fn add_repository(&mut self, repository: &Repository) -> Result<()> {
        self.add_resources(vec![(repository.logical_id().to_string(), repository.render())])
    }

    /// Adds a parameter. Adding the same parameter twice is allowed, since
    /// several resources may share one asset.
    pub fn add_parameter(&mut self, name: impl Into<String>, parameter: Parameter) -> Result<()> {
        let name = name.into();
        match self.parameters.get(&name) {
            Some(existing) if *existing != parameter => Err(Error::DuplicateLogicalId(name)),
            Some(_) => Ok(()),
            None => {
                self.parameters.insert(name, parameter);
                Ok(())
            }
        }
    }

    pub fn add_assets(&mut self, staging: &dyn AssetStaging) -> Result<()> {
        for (name, parameter) in staging.parameters() {
            self.add_parameter(name, parameter)?;
        }

        Ok(())
    }

    pub fn render(&self) -> Value {
        let resources: Map<String, Value> =
            self.resources.iter().map(|(logical_id, resource)| (logical_id.clone(), resource.to_value())).collect();

        let mut template = json!({
            "AWSTemplateFormatVersion": FORMAT_VERSION,
            "Resources": resources,
        });
        if let Some(description) = &self.description {
            template["Description"] = json!(description);
        }
        if !self.parameters.is_empty() {
            template["Parameters"] = json!(self.parameters);
        }

        info!("Rendered template with {} resources and {} parameters", self.resources.len(), self.parameters.len());
        template
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.render()).map_err(Error::SerializationError)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.render()).map_err(Error::YamlSerializationError)
    }
}
