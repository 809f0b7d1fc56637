//! @ai:module:intent JSON loading and saving of PVS profiles
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProfileLoader
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::profile::types::{Profile, DEFAULT_PVS_VERSION};
use std::path::Path;

/// @ai:intent Loads and persists profile documents
pub struct ProfileLoader;

impl ProfileLoader {
    /// @ai:intent Load and validate a profile from a JSON file
    /// @ai:pre path points to a readable JSON document
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Profile> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    /// @ai:intent Parse and validate a profile from JSON text
    /// @ai:effects pure
    pub fn parse(content: &str) -> Result<Profile> {
        let mut profile: Profile = serde_json::from_str(content)?;

        if profile.pvs_version.trim().is_empty() {
            profile.pvs_version = DEFAULT_PVS_VERSION.to_string();
        }

        Self::validate(&profile)?;
        Ok(profile)
    }

    /// @ai:intent Save a profile as pretty-printed JSON, creating parent directories
    /// @ai:effects fs:write
    pub fn save(profile: &Profile, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(profile)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn validate(profile: &Profile) -> Result<()> {
        if profile.owner.name.trim().is_empty() {
            return Err(Error::InvalidProfile("owner.name must not be empty".to_string()));
        }

        if let Some(ref embedding) = profile.embedding {
            if embedding.vector.iter().any(|v| !v.is_finite()) {
                return Err(Error::InvalidProfile(
                    "embedding vector contains non-finite values".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::fixtures::sample_profile;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load_preserves_profile() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("pvs.json");
        let profile = sample_profile();

        ProfileLoader::save(&profile, &path).unwrap();
        let loaded = ProfileLoader::load(&path).unwrap();

        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_rejects_empty_owner_name() {
        let json = r#"{
            "owner": {"name": "  "},
            "identity": {"bio": "", "skills": [], "interests": []},
            "communication_style": {"tone": "casual", "languages": []}
        }"#;

        let err = ProfileLoader::parse(json).unwrap_err();
        assert!(matches!(err, Error::InvalidProfile(_)));
    }

    #[test]
    fn test_blank_version_is_defaulted() {
        let json = r#"{
            "pvs_version": "",
            "owner": {"name": "Linus"},
            "identity": {"bio": "", "skills": [], "interests": []},
            "communication_style": {"tone": "direct", "languages": []}
        }"#;

        let profile = ProfileLoader::parse(json).unwrap();
        assert_eq!(profile.pvs_version, "0.1");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ProfileLoader::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
