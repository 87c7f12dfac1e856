use anyhow::Context;
use krishi_core::profile::FarmerProfile;
use krishi_engine::traits::ProfileRepository;
use std::path::{Path, PathBuf};

/// JSON-file persistence for the single farmer profile.
///
/// Loading never fails from the caller's point of view: a missing or
/// malformed file yields an empty profile so the application always starts.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> FarmerProfile {
        match self.try_load() {
            Ok(Some(profile)) => profile,
            Ok(None) => FarmerProfile::default(),
            Err(e) => {
                log::warn!(
                    "unreadable profile at {}, starting empty: {e:#}",
                    self.path.display()
                );
                FarmerProfile::default()
            }
        }
    }

    fn try_load(&self) -> anyhow::Result<Option<FarmerProfile>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e))
                    .with_context(|| format!("read profile: {}", self.path.display()));
            }
        };
        let profile: FarmerProfile =
            serde_json::from_slice(&bytes).context("decode profile JSON")?;
        Ok(Some(profile))
    }

    pub fn save(&self, profile: &FarmerProfile) -> anyhow::Result<()> {
        crate::fs::write_json_atomic(&self.path, profile)
            .with_context(|| format!("save profile: {}", self.path.display()))
    }
}

impl ProfileRepository for ProfileStore {
    fn load(&self) -> FarmerProfile {
        ProfileStore::load(self)
    }

    fn save(&self, profile: &FarmerProfile) -> anyhow::Result<()> {
        ProfileStore::save(self, profile)
    }
}
