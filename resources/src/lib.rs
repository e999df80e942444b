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

use convert_case::{Case, Casing};
use sha2::{Digest, Sha256};

use self::error::{Error, Result};

pub mod asset;
pub mod description;
pub mod error;
pub mod project;
pub mod repository;
pub mod template;

pub use description::ResourceDescription;

/// Returns the hex encoded SHA-256 digest of the given data.
pub fn hash(data: impl AsRef<[u8]>) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Returns the logical ID for a construct path.
///
/// Each component is PascalCased and stripped to alphanumerics. A top-level
/// construct keeps its plain name; nested ones get the first 8 hex digits of
/// the path hash appended, so that `a/bc` and `ab/c` never collide.
pub fn logical_id(path: &[&str]) -> Result<String> {
    if path.is_empty() {
        return Err(Error::InvalidLogicalId(String::new()));
    }

    let mut id = String::new();
    for component in path {
        let component: String = component.to_case(Case::Pascal).chars().filter(char::is_ascii_alphanumeric).collect();
        if component.is_empty() {
            return Err(Error::InvalidLogicalId(path.join("/")));
        }
        id.push_str(&component);
    }

    if path.len() > 1 {
        let digest = hash(path.join("/"));
        id.push_str(&digest[..8].to_uppercase());
    }

    Ok(id)
}
