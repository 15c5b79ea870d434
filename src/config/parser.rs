//! OCI config file parser.
//!
//! Loads the INI-style `~/.oci/config`, merges `[DEFAULT]` into named
//! profiles and produces a [`Profile`] for the requested section.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::profile::{DEFAULT_PROFILE, Profile};

/// Keys every profile must define.
const REQUIRED_KEYS: &[&str] = &["user", "fingerprint", "tenancy", "region", "key_file"];

type Section = HashMap<String, Option<String>>;

/// Parser for the OCI config file.
#[derive(Debug, Default)]
pub struct ConfigParser;

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads `dir/.env` into the process environment if it exists.
    ///
    /// Returns the loaded path, or `None` when there is no `.env` file. This
    /// runs before logging is initialised, so the caller reports the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let env_path = dir.join(".env");
        if !env_path.exists() {
            return Ok(None);
        }

        dotenvy::from_path(&env_path).map_err(|e| ConfigError::ParseError {
            path: env_path.clone(),
            message: e.to_string(),
        })?;
        Ok(Some(env_path))
    }

    /// Loads a profile from the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unparsable, lacks the
    /// profile, or the profile lacks a required key.
    pub fn load_profile(&self, path: impl AsRef<Path>, profile: &str) -> Result<Profile> {
        let path = path.as_ref();
        debug!("Loading profile '{profile}' from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        self.parse_profile(&content, profile, path, config_dir)
    }

    /// Parses a profile out of config file content.
    ///
    /// `source` is only used in error messages; `config_dir` anchors
    /// relative `key_file` paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is unparsable, lacks the profile, or
    /// the profile lacks a required key.
    pub fn parse_profile(
        &self,
        content: &str,
        profile: &str,
        source: &Path,
        config_dir: &Path,
    ) -> Result<Profile> {
        let mut ini = Ini::new_cs();
        ini.set_default_section(DEFAULT_PROFILE);
        let sections = ini
            .read(content.to_string())
            .map_err(|message| ConfigError::ParseError {
                path: source.to_path_buf(),
                message,
            })?;

        let props = merged_section(&sections, profile).ok_or_else(|| {
            ConfigError::ProfileNotFound {
                profile: profile.to_string(),
                path: source.to_path_buf(),
            }
        })?;

        for key in REQUIRED_KEYS {
            if value(&props, key).is_none() {
                return Err(ConfigError::MissingKey {
                    profile: profile.to_string(),
                    key: (*key).to_string(),
                }
                .into());
            }
        }

        let get = |key: &str| value(&props, key).unwrap_or_default();
        Ok(Profile {
            name: profile.to_string(),
            user: get("user"),
            fingerprint: get("fingerprint"),
            tenancy: get("tenancy"),
            region: get("region"),
            key_file: resolve_path(config_dir, &get("key_file")),
            pass_phrase: value(&props, "pass_phrase"),
        })
    }
}

/// Returns the default config file location, `~/.oci/config`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map_or_else(|| PathBuf::from(".oci"), |home| home.join(".oci"))
        .join("config")
}

/// Returns the named section with `[DEFAULT]` values filled in underneath.
fn merged_section(sections: &HashMap<String, Section>, profile: &str) -> Option<Section> {
    let defaults = sections.get(DEFAULT_PROFILE);
    let own = sections.get(profile)?;

    let mut merged = defaults.cloned().unwrap_or_default();
    for (key, val) in own {
        merged.insert(key.clone(), val.clone());
    }
    Some(merged)
}

fn value(props: &Section, key: &str) -> Option<String> {
    props
        .get(key)
        .and_then(Clone::clone)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn resolve_path(config_dir: &Path, raw: &str) -> PathBuf {
    let expanded = match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map_or_else(|| PathBuf::from(raw), |home| home.join(rest)),
        None => PathBuf::from(raw),
    };
    if expanded.is_relative() {
        config_dir.join(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OciCliError;

    const CONFIG: &str = r"
[DEFAULT]
user=ocid1.user.oc1..default
fingerprint=aa:bb:cc
tenancy=ocid1.tenancy.oc1..tenancy
region=us-ashburn-1
key_file=oci_api_key.pem

[frankfurt]
region=eu-frankfurt-1
key_file=/keys/fra.pem

[broken]
region=us-phoenix-1
";

    fn parse(profile: &str) -> Result<Profile> {
        ConfigParser::new().parse_profile(
            CONFIG,
            profile,
            Path::new("/home/me/.oci/config"),
            Path::new("/home/me/.oci"),
        )
    }

    #[test]
    fn test_default_profile() {
        let profile = parse("DEFAULT").unwrap();
        assert_eq!(profile.user, "ocid1.user.oc1..default");
        assert_eq!(profile.region, "us-ashburn-1");
        assert_eq!(profile.key_file, PathBuf::from("/home/me/.oci/oci_api_key.pem"));
    }

    #[test]
    fn test_named_profile_inherits_default() {
        let profile = parse("frankfurt").unwrap();
        assert_eq!(profile.name, "frankfurt");
        assert_eq!(profile.tenancy, "ocid1.tenancy.oc1..tenancy");
        assert_eq!(profile.region, "eu-frankfurt-1");
        assert_eq!(profile.key_file, PathBuf::from("/keys/fra.pem"));
    }

    #[test]
    fn test_missing_profile() {
        let err = parse("nope").unwrap_err();
        assert!(matches!(
            err,
            OciCliError::Config(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn test_profile_names_are_case_sensitive() {
        assert!(parse("FRANKFURT").is_err());
    }

    #[test]
    fn test_missing_required_key() {
        let content = "[solo]\nuser=u\nregion=r\n";
        let err = ConfigParser::new()
            .parse_profile(content, "solo", Path::new("config"), Path::new("."))
            .unwrap_err();
        assert!(matches!(
            err,
            OciCliError::Config(ConfigError::MissingKey { ref key, .. }) if key == "fingerprint"
        ));
    }

    #[test]
    fn test_load_profile_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, CONFIG).unwrap();

        let profile = ConfigParser::new().load_profile(&path, "DEFAULT").unwrap();
        assert_eq!(profile.key_file, dir.path().join("oci_api_key.pem"));
    }

    #[test]
    fn test_pass_phrase_is_optional() {
        assert_eq!(parse("DEFAULT").unwrap().pass_phrase, None);

        let content = format!("{CONFIG}\n[secured]\npass_phrase = s3cret\n");
        let profile = ConfigParser::new()
            .parse_profile(&content, "secured", Path::new("config"), Path::new("/oci"))
            .unwrap();
        assert_eq!(profile.pass_phrase.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_load_dotenv_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(ConfigParser::new().load_dotenv(dir.path()).unwrap(), None);

        std::fs::write(dir.path().join(".env"), "OCI_CLI_DOTENV_TEST=loaded\n").unwrap();
        let loaded = ConfigParser::new().load_dotenv(dir.path()).unwrap();
        assert_eq!(loaded, Some(dir.path().join(".env")));
    }

    #[test]
    fn test_load_profile_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ConfigParser::new()
            .load_profile(dir.path().join("absent"), "DEFAULT")
            .unwrap_err();
        assert!(matches!(
            err,
            OciCliError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
