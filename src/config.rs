use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// File backing the durable key-value storage.
    pub storage_path: PathBuf,
    /// Institution label stamped on every new profile.
    pub institution: String,
    pub avatar_base_url: String,
    pub avatar_background: String,
    pub avatar_color: String,
    /// Class size assumed when a new assignment does not give one.
    pub default_total_students: u32,
    /// Splash delay before the CLI shows anything.
    pub startup_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_path: PathBuf::from("educollab.json"),
            institution: "Demo University".to_string(),
            avatar_base_url: "https://ui-avatars.com/api/".to_string(),
            avatar_background: "6366f1".to_string(),
            avatar_color: "fff".to_string(),
            default_total_students: 45,
            startup_delay_ms: 1500,
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Config> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let contents = fs::read_to_string(path)?;
        Config::from_toml_str(&contents)
    }

    /// Deterministic avatar URL for a display name.
    pub fn avatar_for(&self, name: &str) -> String {
        format!(
            "{}?name={}&background={}&color={}",
            self.avatar_base_url,
            name.trim().replace(' ', "+"),
            self.avatar_background,
            self.avatar_color
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.institution, "Demo University");
        assert_eq!(config.default_total_students, 45);
        assert_eq!(
            config.avatar_for("ada"),
            "https://ui-avatars.com/api/?name=ada&background=6366f1&color=fff"
        );
        assert_eq!(
            config.avatar_for("Alex Johnson"),
            "https://ui-avatars.com/api/?name=Alex+Johnson&background=6366f1&color=fff"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            institution = "Night School"
            startup_delay_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.institution, "Night School");
        assert_eq!(config.startup_delay_ms, 0);
        assert_eq!(config.storage_path, PathBuf::from("educollab.json"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("educollab.toml");
        fs::write(&path, "default_total_students = 30\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().default_total_students, 30);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        match Config::from_toml_str("institution = [") {
            Err(crate::error::HubError::Config(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
