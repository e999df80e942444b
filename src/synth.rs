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

use std::fs;
use std::path::Path;

use anyhow::Context;
use plinth_resources::asset::{AssetStaging, LocalAssetStaging};
use plinth_resources::project::Project;
use plinth_resources::repository::Repository;
use plinth_resources::template::Template;
use tracing::info;

use crate::config::{Format, SynthArgs};
use crate::errors::Result;
use crate::manifest::{self, StackManifest};

/// Builds the template of a stack. Script directories are resolved
/// relative to `base` and staged with the given stager.
pub fn synthesize(manifest: StackManifest, base: &Path, staging: &mut dyn AssetStaging) -> Result<Template> {
    let mut template = Template::new();
    if let Some(description) = manifest.description {
        template = template.with_description(description);
    }

    for (id, project) in manifest.projects {
        let config = project.into_config(&id, base, staging)?;
        template.add_project(&Project::new(&id, config)?)?;
    }

    for (id, config) in manifest.repositories {
        template.add_repository(&Repository::new(&id, config)?)?;
    }

    template.add_assets(staging)?;
    Ok(template)
}

/// Loads the manifest, synthesizes it and writes the template out.
pub fn run(args: &SynthArgs) -> anyhow::Result<()> {
    let manifest = manifest::load(&args.manifest)
        .with_context(|| format!("failed to load manifest {}", args.manifest.display()))?;
    let base = args.manifest.parent().unwrap_or_else(|| Path::new("."));

    let mut staging = LocalAssetStaging::new();
    let template = synthesize(manifest, base, &mut staging).context("failed to synthesize the stack")?;

    let data = match args.format {
        Format::Json => template.to_json_pretty()?,
        Format::Yaml => template.to_yaml()?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, data).with_context(|| format!("couldn't write to file {}", path.display()))?;
            info!("Wrote template to {}", path.display());
        }
        None => println!("{}", data),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::{json, Value};

    use super::*;
    use crate::errors::Error;

    fn write_manifest(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("stack.yaml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_synthesize_with_build_script() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("scripts")).unwrap();
        fs::write(dir.path().join("scripts/build.sh"), "#!/bin/sh\nmake\n").unwrap();
        let path = write_manifest(
            dir.path(),
            r#"
projects:
  nightly:
    build_script_path: scripts
    build_script_entrypoint: build.sh
    cache_bucket_name: build-cache
"#,
        );

        let mut staging = LocalAssetStaging::new();
        let template = synthesize(manifest::load(&path).unwrap(), dir.path(), &mut staging).unwrap();
        let rendered = template.render();

        let properties = &rendered["Resources"]["Nightly"]["Properties"];
        assert_eq!(properties["Source"]["Type"], "NO_SOURCE");
        assert_eq!(properties["Cache"], json!({"Type": "S3", "Location": "build-cache"}));
        assert_eq!(rendered["Parameters"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_synthesize_reports_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            dir.path(),
            r#"
projects:
  build:
    source: { type: github, owner: o, repo: r }
    cache_bucket_name: cache
    cache_modes: [docker_layer_cache]
"#,
        );

        let mut staging = LocalAssetStaging::new();
        let error = synthesize(manifest::load(&path).unwrap(), dir.path(), &mut staging).unwrap_err();

        assert!(matches!(error, Error::ResourceError(_)));
        assert!(error.to_string().contains("Only one of cacheBucket or cacheModes can be specified"));
    }

    #[test]
    fn test_run_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(
            dir.path(),
            r#"
repositories:
  images:
    image_scan_on_push: true
"#,
        );
        let output = dir.path().join("template.json");

        let args = SynthArgs { manifest, output: Some(output.clone()), format: Format::Json };
        run(&args).unwrap();

        let template: Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(template["Resources"]["Images"]["Properties"]["ImageScanningConfiguration"]["ScanOnPush"], true);
    }
}
