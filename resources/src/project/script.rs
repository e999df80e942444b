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

//! Running a packaged script asset as the build.

use plinth_common::intrinsic::{join, select, split};
use plinth_common::schema::{AssetLocation, EnvironmentVariable};
use serde_json::{json, Value};

pub const SCRIPT_BUCKET_VARIABLE: &str = "SCRIPT_S3_BUCKET";
pub const SCRIPT_KEY_VARIABLE: &str = "SCRIPT_S3_KEY";

const SCRIPT_DIR: &str = "/tmp/scriptdir";

/// The version key of an asset is `<version>||<key>`; both halves are
/// joined back together so the object key resolves at deploy time.
pub fn object_key(asset: &AssetLocation) -> Value {
    let parts = split("||", asset.version_key.as_value().clone());
    join("", vec![select(0, parts.clone()), select(1, parts)])
}

/// Returns the variables that tell the build where to download the scripts.
pub fn variables(asset: &AssetLocation) -> Vec<EnvironmentVariable> {
    vec![
        EnvironmentVariable::plaintext(SCRIPT_BUCKET_VARIABLE, asset.bucket.as_value().clone()),
        EnvironmentVariable::plaintext(SCRIPT_KEY_VARIABLE, object_key(asset)),
    ]
}

#[inline]
pub fn is_reserved(name: &str) -> bool {
    name == SCRIPT_BUCKET_VARIABLE || name == SCRIPT_KEY_VARIABLE
}

/// Returns the build spec that downloads, unpacks and runs the entrypoint.
pub fn build_spec(entrypoint: &str) -> Value {
    let script = format!("{}/{}", SCRIPT_DIR, entrypoint.trim_start_matches("./"));

    json!({
        "version": "0.2",
        "phases": {
            "pre_build": {
                "commands": [
                    format!("echo \"Downloading scripts from s3://${{{}}}/${{{}}}\"", SCRIPT_BUCKET_VARIABLE, SCRIPT_KEY_VARIABLE),
                    format!("aws s3 cp s3://${{{}}}/${{{}}} /tmp", SCRIPT_BUCKET_VARIABLE, SCRIPT_KEY_VARIABLE),
                    format!("mkdir -p {}", SCRIPT_DIR),
                    format!("unzip /tmp/$(basename ${}) -d {}", SCRIPT_KEY_VARIABLE, SCRIPT_DIR),
                ],
            },
            "build": {
                "commands": [
                    format!("export SCRIPT_DIR={}", SCRIPT_DIR),
                    format!("echo \"Running {}\"", entrypoint),
                    format!("chmod +x {}", script),
                    script,
                ],
            },
        },
    })
}
