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

use serde::Serialize;
use serde_json::{json, Map, Value};

/// A rendered resource: its provider type and properties, ready to be placed
/// under a logical ID in a template.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceDescription {
    #[serde(rename = "Type")]
    pub resource_type: String,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl ResourceDescription {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self { resource_type: resource_type.into(), properties: Map::new(), depends_on: vec![] }
    }

    /// Sets a property, returning the description for chaining.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Sets a property when a value is present.
    pub fn with_opt(self, key: &str, value: Option<Value>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    #[inline]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Returns the description as a JSON document.
    pub fn to_value(&self) -> Value {
        let mut value = json!({
            "Type": self.resource_type,
            "Properties": self.properties,
        });
        if !self.depends_on.is_empty() {
            value["DependsOn"] = json!(self.depends_on);
        }

        value
    }
}
