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

/// Configuration of a container image repository.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema, Validate)]
pub struct RepositoryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 256))]
    pub repository_name: Option<String>,

    #[serde(default)]
    pub image_scan_on_push: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_tag_mutability: Option<TagMutability>,

    /// Account the lifecycle policy applies to, the current one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_registry_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate]
    pub lifecycle_rules: Vec<LifecycleRule>,
}

impl RepositoryConfig {
    /// Appends a lifecycle rule. Rules are checked when the repository is built.
    pub fn add_lifecycle_rule(&mut self, rule: LifecycleRule) {
        self.lifecycle_rules.push(rule);
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TagMutability {
    Mutable,
    Immutable,
}

impl TagMutability {
    pub fn token(&self) -> &'static str {
        match self {
            TagMutability::Mutable => "MUTABLE",
            TagMutability::Immutable => "IMMUTABLE",
        }
    }
}

/// A retention rule, expiring the images it selects.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema, Validate)]
pub struct LifecycleRule {
    /// Lower numbers are evaluated first; assigned automatically when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub rule_priority: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `tagged` when `tag_prefix_list` is set, `any` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_status: Option<TagStatus>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_prefix_list: Vec<String>,

    /// Keep at most this many images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub max_image_count: Option<u32>,

    /// Expire images pushed more than this many days ago.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub max_image_age_days: Option<u32>,
}

impl LifecycleRule {
    pub fn max_image_count(count: u32) -> Self {
        Self { max_image_count: Some(count), ..Default::default() }
    }

    pub fn max_image_age_days(days: u32) -> Self {
        Self { max_image_age_days: Some(days), ..Default::default() }
    }

    /// Returns the tag status with its default filled in.
    pub fn resolved_tag_status(&self) -> TagStatus {
        self.tag_status.unwrap_or(if self.tag_prefix_list.is_empty() { TagStatus::Any } else { TagStatus::Tagged })
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TagStatus {
    Any,
    Tagged,
    Untagged,
}

impl TagStatus {
    pub fn token(&self) -> &'static str {
        match self {
            TagStatus::Any => "any",
            TagStatus::Tagged => "tagged",
            TagStatus::Untagged => "untagged",
        }
    }
}
