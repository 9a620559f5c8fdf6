// SPDX-License-Identifier: MIT

use anyhow::{Context, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional TOML build file for `vsfs-mkfs`.
///
/// ```toml
/// image = "out/disk.img"
/// size_kib = 1024
/// inodes = 256
/// ```
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    pub image: Option<PathBuf>,
    pub size_kib: Option<u64>,
    pub inodes: Option<u64>,
}

/// Fully resolved build parameters. Ranges are checked by the layout code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildParams {
    pub image: PathBuf,
    pub size_kib: u64,
    pub inodes: u64,
}

impl BuildConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config '{}'", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config '{}'", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Values set in `overrides` take precedence.
    pub fn merge(self, overrides: BuildConfig) -> Self {
        Self {
            image: overrides.image.or(self.image),
            size_kib: overrides.size_kib.or(self.size_kib),
            inodes: overrides.inodes.or(self.inodes),
        }
    }

    pub fn resolve(self) -> anyhow::Result<BuildParams> {
        let Some(image) = self.image else {
            bail!("missing --image");
        };
        let Some(size_kib) = self.size_kib else {
            bail!("missing --size-kib");
        };
        let Some(inodes) = self.inodes else {
            bail!("missing --inodes");
        };
        Ok(BuildParams {
            image,
            size_kib,
            inodes,
        })
    }
}
