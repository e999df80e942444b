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

mod lifecycle;

use plinth_common::intrinsic::Reference;
use plinth_common::schema::{LifecycleRule, RepositoryConfig};
use serde_json::json;
use tracing::{debug, info};
use validator::Validate;

use crate::error::{Error, Result};
use crate::{logical_id, ResourceDescription};

const REPOSITORY_TYPE: &str = "AWS::ECR::Repository";

/// A validated container image repository.
#[derive(Clone, Debug, PartialEq)]
pub struct Repository {
    id: String,
    logical_id: String,
    config: RepositoryConfig,
}

impl Repository {
    pub fn new(id: &str, config: RepositoryConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidConfiguration)?;
        lifecycle::validate(&config.lifecycle_rules)?;

        let repository = Repository { id: id.to_string(), logical_id: logical_id(&[id])?, config };
        info!("Constructed repository {} as {}", repository.id, repository.logical_id);

        Ok(repository)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    #[inline]
    pub fn lifecycle_rules(&self) -> &[LifecycleRule] {
        &self.config.lifecycle_rules
    }

    /// Adds a lifecycle rule after construction. The rule is checked
    /// against the existing ones and rejected without changing anything.
    pub fn add_lifecycle_rule(&mut self, rule: LifecycleRule) -> Result<()> {
        let mut rules = self.config.lifecycle_rules.clone();
        rules.push(rule);
        lifecycle::validate(&rules)?;

        debug!("Added lifecycle rule #{} to repository {}", rules.len(), self.id);
        self.config.lifecycle_rules = rules;

        Ok(())
    }

    /// The repository name, resolved at deploy time.
    pub fn name(&self) -> Reference {
        Reference::to(self.logical_id.as_str())
    }

    pub fn arn(&self) -> Reference {
        Reference::attribute(self.logical_id.as_str(), "Arn")
    }

    pub fn render(&self) -> ResourceDescription {
        let config = &self.config;
        let lifecycle_policy = (!config.lifecycle_rules.is_empty()).then(|| {
            let mut policy = json!({
                "LifecyclePolicyText": lifecycle::policy(&config.lifecycle_rules).to_string(),
            });
            if let Some(registry_id) = &config.lifecycle_registry_id {
                policy["RegistryId"] = json!(registry_id);
            }
            policy
        });

        ResourceDescription::new(REPOSITORY_TYPE)
            .with_opt("RepositoryName", config.repository_name.as_ref().map(|name| json!(name)))
            .with_opt("ImageScanningConfiguration", config.image_scan_on_push.then(|| json!({ "ScanOnPush": true })))
            .with_opt("ImageTagMutability", config.image_tag_mutability.map(|mutability| json!(mutability.token())))
            .with_opt("LifecyclePolicy", lifecycle_policy)
    }
}
