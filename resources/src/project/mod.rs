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

//! The build project builder.
//!
//! `Project::new` validates a [`ProjectConfig`] up front and resolves every
//! default into a fully populated record; `Project::render` then only has to
//! map that record onto the `AWS::CodeBuild::Project` schema and cannot fail.

mod cache;
mod environment;
mod role;
pub mod script;
mod source;

use plinth_common::intrinsic::Reference;
use plinth_common::schema::{BuildSpec, ProjectConfig};
use serde_json::{json, Value};
use tracing::{debug, info};
use validator::Validate;

use self::cache::Cache;
use self::environment::Environment;
use self::role::ServiceRole;
use self::source::Source;
use crate::error::{Error, Result};
use crate::{logical_id, ResourceDescription};

const PROJECT_TYPE: &str = "AWS::CodeBuild::Project";

/// A validated build project.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    id: String,
    logical_id: String,
    source: Source,
    build_spec: Option<String>,
    environment: Environment,
    cache: Cache,
    role: ServiceRole,
    asset_bucket: Option<Reference>,
    name: Option<String>,
    description: Option<String>,
    timeout_minutes: Option<u32>,
    badge: bool,
}

impl Project {
    /// Validates the configuration and resolves its defaults.
    ///
    /// Construction performs no I/O; assets must be staged beforehand and
    /// passed in as a [`plinth_common::schema::BuildScript`].
    pub fn new(id: &str, config: ProjectConfig) -> Result<Self> {
        validate(&config)?;

        let logical_id = logical_id(&[id])?;
        let role = match config.role {
            Some(arn) => ServiceRole::Existing(arn),
            None => ServiceRole::Owned {
                role_id: crate::logical_id(&[id, "Role"])?,
                policy_id: crate::logical_id(&[id, "Role", "DefaultPolicy"])?,
            },
        };

        let source = source::resolve(&config.source)?;
        let build_spec = match (&config.build_script, &config.build_spec) {
            (Some(build_script), _) => {
                let document = BuildSpec::Inline(script::build_spec(&build_script.entrypoint));
                Some(document.to_text().map_err(Error::SerializationError)?)
            }
            (None, Some(build_spec)) => Some(build_spec.to_text().map_err(Error::SerializationError)?),
            (None, None) => None,
        };
        let environment = environment::resolve(config.environment, config.build_script.as_ref())?;
        let cache = cache::resolve(config.cache_bucket, config.cache_prefix, config.cache_modes);

        let project = Project {
            id: id.to_string(),
            logical_id,
            source,
            build_spec,
            environment,
            cache,
            role,
            asset_bucket: config.build_script.map(|script| script.asset.bucket),
            name: config.project_name,
            description: config.description,
            timeout_minutes: config.timeout_minutes,
            badge: config.badge,
        };

        info!("Constructed project {} as {}", project.id, project.logical_id);
        debug!("The resolved project:\n {:?}\n", project);

        Ok(project)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Returns the ARN of the role the project runs as.
    pub fn role_arn(&self) -> Value {
        self.role.arn()
    }

    /// Renders the project resource.
    pub fn render(&self) -> ResourceDescription {
        let mut resource = ResourceDescription::new(PROJECT_TYPE)
            .with("Source", self.source.render(self.build_spec.as_deref()))
            .with("Artifacts", self.source.artifacts())
            .with("Environment", self.environment.render())
            .with("ServiceRole", self.role.arn())
            .with("Cache", self.cache.render())
            .with_opt("Triggers", self.source.triggers())
            .with_opt("Name", self.name.as_ref().map(|name| json!(name)))
            .with_opt("Description", self.description.as_ref().map(|description| json!(description)))
            .with_opt("TimeoutInMinutes", self.timeout_minutes.map(|timeout| json!(timeout)))
            .with_opt("BadgeEnabled", self.badge.then(|| json!(true)));

        // The role must carry its permissions before the project first runs.
        if let ServiceRole::Owned { policy_id, .. } = &self.role {
            resource.depends_on.push(policy_id.clone());
        }

        resource
    }

    /// Returns every resource the project consists of, keyed by logical ID:
    /// the project itself and, unless an existing role was given, its role
    /// and policy.
    pub fn resources(&self) -> Vec<(String, ResourceDescription)> {
        let mut resources = vec![(self.logical_id.clone(), self.render())];

        if let ServiceRole::Owned { role_id, policy_id } = &self.role {
            resources.push((role_id.clone(), role::role()));
            resources.push((
                policy_id.clone(),
                role::policy(policy_id, role_id, self.name.as_deref(), self.asset_bucket.as_ref(), self.cache.bucket()),
            ));
        }

        resources
    }
}

/// Checks everything that cannot be expressed in the configuration types.
/// Conflicts are reported before anything else.
fn validate(config: &ProjectConfig) -> Result<()> {
    if config.cache_bucket.is_some() && config.cache_modes.is_some() {
        return Err(Error::ConfigurationConflict { first: "cacheBucket", second: "cacheModes" });
    }

    if config.build_spec.is_some() && config.build_script.is_some() {
        return Err(Error::ConfigurationConflict { first: "buildSpec", second: "buildScriptAsset" });
    }

    config.validate().map_err(Error::InvalidConfiguration)?;

    if let Some(BuildSpec::Inline(document)) = &config.build_spec {
        if !document.is_object() {
            return Err(Error::InvalidBuildSpec("an inline build spec must be a mapping".into()));
        }
    }

    if matches!(config.source, plinth_common::schema::Source::NoSource)
        && config.build_spec.is_none()
        && config.build_script.is_none()
    {
        return Err(Error::MissingBuildSpec);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use plinth_common::schema::{AssetLocation, BuildScript, CacheMode, GitHubSource, Source as SourceConfig};

    use super::*;

    fn github() -> ProjectConfig {
        let source = GitHubSource { clone_depth: Some(3), ..GitHubSource::new("testowner", "testrepo") };
        ProjectConfig::new(SourceConfig::GitHub(source))
    }

    fn asset() -> AssetLocation {
        AssetLocation { bucket: Reference::to("AssetBucket"), version_key: Reference::to("AssetVersionKey") }
    }

    #[test]
    fn test_github_source() {
        let project = Project::new("Project", github()).unwrap();

        assert_eq!(
            project.render().property("Source"),
            Some(&json!({
                "Type": "GITHUB",
                "Location": "https://github.com/testowner/testrepo.git",
                "ReportBuildStatus": true,
                "GitCloneDepth": 3,
            }))
        );
    }

    #[test]
    fn test_github_without_build_status() {
        let mut config = github();
        if let SourceConfig::GitHub(github) = &mut config.source {
            github.report_build_status = false;
        }
        let project = Project::new("Project", config).unwrap();

        assert_eq!(
            project.render().property("Source"),
            Some(&json!({
                "Type": "GITHUB",
                "Location": "https://github.com/testowner/testrepo.git",
                "ReportBuildStatus": false,
                "GitCloneDepth": 3,
            }))
        );
    }

    #[test]
    fn test_webhook_trigger() {
        let mut config = github();
        if let SourceConfig::GitHub(github) = &mut config.source {
            github.webhook = true;
        }
        let project = Project::new("Project", config).unwrap();
        assert_eq!(project.render().property("Triggers"), Some(&json!({"Webhook": true})));

        let project = Project::new("Project", github()).unwrap();
        assert_eq!(project.render().property("Triggers"), None);
    }

    #[test]
    fn test_cache_conflict() {
        let config = ProjectConfig {
            cache_bucket: Some(Reference::literal("cache")),
            cache_modes: Some(vec![CacheMode::CustomCache]),
            ..github()
        };

        let error = Project::new("Project", config).unwrap_err();
        assert!(matches!(error, Error::ConfigurationConflict { first: "cacheBucket", second: "cacheModes" }));
        assert_eq!(error.to_string(), "Only one of cacheBucket or cacheModes can be specified");
    }

    #[test]
    fn test_cache_conflict_is_reported_first() {
        let config = ProjectConfig {
            source: SourceConfig::NoSource,
            cache_bucket: Some(Reference::literal("cache")),
            cache_modes: Some(vec![]),
            timeout_minutes: Some(1),
            ..Default::default()
        };

        assert!(matches!(Project::new("Project", config), Err(Error::ConfigurationConflict { .. })));
    }

    #[test]
    fn test_cache_types() {
        let project = Project::new("Project", github()).unwrap();
        assert_eq!(project.render().property("Cache"), Some(&json!({"Type": "NONE"})));

        let config = ProjectConfig { cache_bucket: Some(Reference::to("CacheBucket")), ..github() };
        let project = Project::new("Project", config).unwrap();
        assert_eq!(project.render().property("Cache").unwrap()["Type"], "S3");

        let mut config = github();
        config.add_cache_mode(CacheMode::CustomCache);
        config.add_cache_mode(CacheMode::DockerLayerCache);
        config.add_cache_mode(CacheMode::SourceCache);
        let project = Project::new("Project", config).unwrap();
        assert_eq!(
            project.render().property("Cache"),
            Some(&json!({
                "Type": "LOCAL",
                "Modes": ["LOCAL_CUSTOM_CACHE", "LOCAL_DOCKER_LAYER_CACHE", "LOCAL_SOURCE_CACHE"],
            }))
        );
    }

    #[test]
    fn test_inline_build_spec() {
        let config = ProjectConfig {
            build_spec: Some(BuildSpec::from(json!({"phases": ["say hi"]}))),
            ..ProjectConfig::new(SourceConfig::NoSource)
        };
        let project = Project::new("Project", config).unwrap();

        assert_eq!(
            project.render().property("Source"),
            Some(&json!({"Type": "NO_SOURCE", "BuildSpec": "{\n  \"phases\": [\n    \"say hi\"\n  ]\n}"}))
        );
    }

    #[test]
    fn test_inline_build_spec_must_be_a_mapping() {
        let config = ProjectConfig {
            build_spec: Some(BuildSpec::Inline(json!(["say hi"]))),
            ..ProjectConfig::new(SourceConfig::NoSource)
        };

        assert!(matches!(Project::new("Project", config), Err(Error::InvalidBuildSpec(_))));
    }

    #[test]
    fn test_no_source_requires_build_spec() {
        let result = Project::new("Project", ProjectConfig::new(SourceConfig::NoSource));
        assert!(matches!(result, Err(Error::MissingBuildSpec)));
    }

    #[test]
    fn test_build_script() {
        let config = ProjectConfig {
            build_script: Some(BuildScript::new(asset(), "build.sh")),
            ..ProjectConfig::new(SourceConfig::NoSource)
        };
        let project = Project::new("Project", config).unwrap();
        let resource = project.render();

        let variables = resource.property("Environment").unwrap()["EnvironmentVariables"].as_array().unwrap().clone();
        assert_eq!(variables.len(), 2);
        assert_eq!(variables[0], json!({"Name": "SCRIPT_S3_BUCKET", "Type": "PLAINTEXT", "Value": {"Ref": "AssetBucket"}}));
        assert_eq!(variables[1]["Name"], "SCRIPT_S3_KEY");
        assert_eq!(
            variables[1]["Value"],
            json!({
                "Fn::Join": ["", [
                    {"Fn::Select": [0, {"Fn::Split": ["||", {"Ref": "AssetVersionKey"}]}]},
                    {"Fn::Select": [1, {"Fn::Split": ["||", {"Ref": "AssetVersionKey"}]}]},
                ]]
            })
        );

        let build_spec = resource.property("Source").unwrap()["BuildSpec"].as_str().unwrap().to_string();
        assert!(build_spec.contains("/tmp/scriptdir/build.sh"));
        assert!(build_spec.starts_with("{\n  \"phases\""));
    }

    #[test]
    fn test_build_script_conflicts_with_build_spec() {
        let config = ProjectConfig {
            build_spec: Some(BuildSpec::Filename("buildspec.yml".into())),
            build_script: Some(BuildScript::new(asset(), "build.sh")),
            ..github()
        };

        let error = Project::new("Project", config).unwrap_err();
        assert!(matches!(error, Error::ConfigurationConflict { first: "buildSpec", second: "buildScriptAsset" }));
    }

    #[test]
    fn test_default_environment() {
        let project = Project::new("Project", github()).unwrap();
        let environment = project.render().property("Environment").unwrap().clone();

        assert_eq!(environment["ComputeType"], "BUILD_GENERAL1_SMALL");
        assert_eq!(environment.get("EnvironmentVariables"), None);
    }

    #[test]
    fn test_owned_role() {
        let project = Project::new("Project", github()).unwrap();
        let resources = project.resources();
        let role_id = crate::logical_id(&["Project", "Role"]).unwrap();
        let policy_id = crate::logical_id(&["Project", "Role", "DefaultPolicy"]).unwrap();

        assert_eq!(resources.len(), 3);
        assert_eq!(resources[0].0, "Project");
        assert_eq!(resources[1].0, role_id);
        assert_eq!(resources[2].0, policy_id);
        assert_eq!(resources[0].1.property("ServiceRole"), Some(&json!({"Fn::GetAtt": [role_id, "Arn"]})));
        assert_eq!(resources[0].1.depends_on, vec![policy_id]);
    }

    /// Logical IDs named by `Ref` and `Fn::GetAtt` anywhere in `value`.
    fn references(value: &Value, found: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(id)) = map.get("Ref") {
                    found.push(id.clone());
                }
                if let Some(Value::String(id)) = map.get("Fn::GetAtt").and_then(|attribute| attribute.get(0)) {
                    found.push(id.clone());
                }
                map.values().for_each(|value| references(value, found));
            }
            Value::Array(values) => values.iter().for_each(|value| references(value, found)),
            _ => {}
        }
    }

    #[test]
    fn test_owned_role_has_no_cycle() {
        for config in [github(), ProjectConfig { project_name: Some("nightly".into()), ..github() }] {
            let resources = Project::new("Project", config).unwrap().resources();

            for (id, resource) in &resources {
                for dependency in &resource.depends_on {
                    let (_, target) = resources.iter().find(|(other, _)| other == dependency).unwrap();
                    let mut found = vec![];
                    references(&target.to_value(), &mut found);
                    assert!(!found.contains(id), "{} depends on {} which references it", id, dependency);
                }
            }
        }
    }

    #[test]
    fn test_existing_role() {
        let config = ProjectConfig { role: Some(Reference::literal("arn:aws:iam::1:role/build")), ..github() };
        let project = Project::new("Project", config).unwrap();

        assert_eq!(project.resources().len(), 1);
        assert_eq!(project.role_arn(), json!("arn:aws:iam::1:role/build"));
        assert!(project.render().depends_on.is_empty());
    }

    #[test]
    fn test_optional_properties() {
        let config = ProjectConfig {
            project_name: Some("nightly".into()),
            description: Some("Nightly build".into()),
            timeout_minutes: Some(60),
            badge: true,
            ..github()
        };
        let resource = Project::new("Project", config).unwrap().render();

        assert_eq!(resource.property("Name"), Some(&json!("nightly")));
        assert_eq!(resource.property("Description"), Some(&json!("Nightly build")));
        assert_eq!(resource.property("TimeoutInMinutes"), Some(&json!(60)));
        assert_eq!(resource.property("BadgeEnabled"), Some(&json!(true)));
    }

    #[test]
    fn test_render_is_idempotent() {
        let project = Project::new("Project", github()).unwrap();
        let first = serde_json::to_string(&project.render()).unwrap();
        let second = serde_json::to_string(&project.render()).unwrap();

        assert_eq!(first, second);
    }
}
