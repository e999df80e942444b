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

use plinth_common::intrinsic::{join, Reference};
use plinth_common::schema::CacheMode;
use serde_json::{json, Value};

/// The resolved build cache of a project.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Cache {
    None,
    Bucket { bucket: Reference, prefix: Option<String> },
    Local(Vec<CacheMode>),
}

/// Resolves the cache settings, which must already be checked for conflicts.
/// An empty list of modes means no cache at all.
pub(crate) fn resolve(bucket: Option<Reference>, prefix: Option<String>, modes: Option<Vec<CacheMode>>) -> Cache {
    match (bucket, modes) {
        (Some(bucket), _) => Cache::Bucket { bucket, prefix },
        (None, Some(modes)) if !modes.is_empty() => Cache::Local(modes),
        _ => Cache::None,
    }
}

impl Cache {
    pub fn bucket(&self) -> Option<&Reference> {
        match self {
            Cache::Bucket { bucket, .. } => Some(bucket),
            _ => None,
        }
    }

    pub fn render(&self) -> Value {
        match self {
            Cache::None => json!({ "Type": "NONE" }),
            Cache::Bucket { bucket, prefix } => {
                let location = match prefix {
                    Some(prefix) => join("/", vec![bucket.as_value().clone(), json!(prefix)]),
                    None => bucket.as_value().clone(),
                };
                json!({ "Type": "S3", "Location": location })
            }
            Cache::Local(modes) => {
                let modes: Vec<&str> = modes.iter().map(CacheMode::token).collect();
                json!({ "Type": "LOCAL", "Modes": modes })
            }
        }
    }
}
