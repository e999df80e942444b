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

//! The boundary to the asset packaging collaborator.
//!
//! Packaging and uploading assets happens outside of the builders. A stager
//! only has to say where an asset will live, in the form of template
//! parameters that the deployment tooling fills in after the upload.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use plinth_common::intrinsic::Reference;
use plinth_common::schema::AssetLocation;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::template::Parameter;

pub trait AssetStaging {
    /// Stages the file or directory at `path` and returns its storage location.
    fn stage(&mut self, path: &Path) -> Result<AssetLocation>;

    /// Returns the template parameters of every asset staged so far.
    fn parameters(&self) -> Vec<(String, Parameter)>;
}

/// Stages assets by content hash, without uploading anything.
///
/// Each distinct content gets a bucket and a version key parameter; staging
/// the same content twice hands out the same parameters.
#[derive(Debug, Default)]
pub struct LocalAssetStaging {
    assets: BTreeMap<String, PathBuf>,
}

impl LocalAssetStaging {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetStaging for LocalAssetStaging {
    fn stage(&mut self, path: &Path) -> Result<AssetLocation> {
        let digest = fingerprint(path)?;
        let (bucket, version_key) = parameter_names(&digest);
        debug!("Staged asset {} with fingerprint {}", path.display(), digest);

        self.assets.entry(digest).or_insert_with(|| path.to_path_buf());

        Ok(AssetLocation { bucket: Reference::to(bucket), version_key: Reference::to(version_key) })
    }

    fn parameters(&self) -> Vec<(String, Parameter)> {
        let mut parameters = vec![];
        for digest in self.assets.keys() {
            let (bucket, version_key) = parameter_names(digest);
            parameters.push((bucket, Parameter::string(format!("S3 bucket for asset \"{}\"", digest))));
            parameters.push((version_key, Parameter::string(format!("S3 key for asset version \"{}\"", digest))));
        }

        parameters
    }
}

fn parameter_names(digest: &str) -> (String, String) {
    let short = digest[..8].to_uppercase();
    (format!("AssetParameters{}S3Bucket", short), format!("AssetParameters{}S3VersionKey", short))
}

/// Returns the SHA-256 of a file, or of every file below a directory.
///
/// Directory entries are visited in sorted order and their relative paths
/// are part of the digest, so renaming a file changes the fingerprint.
pub fn fingerprint(path: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    if path.is_dir() {
        let mut files = vec![];
        collect_files(path, &mut files)?;
        files.sort();

        for file in files {
            let relative = file.strip_prefix(path).unwrap_or(&file);
            hasher.update(relative.to_string_lossy().as_bytes());
            hasher.update([0u8]);
            hasher.update(read(&file)?);
        }
    } else {
        hasher.update(read(path)?);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|source| read_failed(dir, source))?;
    for entry in entries {
        let path = entry.map_err(|source| read_failed(dir, source))?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }

    Ok(())
}

#[inline]
fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| read_failed(path, source))
}

#[inline]
fn read_failed(path: &Path, source: std::io::Error) -> Error {
    Error::AssetReadFailed { path: path.display().to_string(), source }
}
