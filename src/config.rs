use std::{
    collections::BTreeMap,
    env,
    fs::File,
    io,
    path::{Path, PathBuf},
    time,
};

use serde::Deserialize;
use tracing::debug;

const DEFAULT_API_ENDPOINT: &str = "https://api.emsearch.io";

/// An error encountered while loading or resolving a configuration profile.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to load config file")]
    Io(#[from] io::Error),
    #[error("Invalid configuration")]
    Invalid(#[from] serde_yaml::Error),
    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),
    #[error("API key contains invalid characters")]
    InvalidApiKey,
    #[error("No API key found")]
    NoApiKey,
    #[error("Invalid URI")]
    InvalidUri(#[from] http::uri::InvalidUri),
    #[error("API endpoint must be an absolute URI: {0}")]
    RelativeEndpoint(String),
}

/// A fully resolved configuration profile for talking to the Emsearch API.
#[derive(Clone)]
pub struct Profile {
    /// The name of the profile.
    pub name: String,
    /// The API endpoint. Any path component is used as a prefix for request
    /// paths.
    pub api_endpoint: http::Uri,
    /// The API key, sent as a bearer token.
    pub api_key: String,
    /// The overall timeout applied by the default transport.
    pub timeout: Option<time::Duration>,
    /// The user-agent sent on requests.
    pub user_agent: String,
    /// The config file this profile was loaded from, if any.
    pub config_path: Option<PathBuf>,
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("api_endpoint", &self.api_endpoint)
            .field("api_key", &"********")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// A profile stored in the config file.
#[derive(Debug, Default, Clone, Deserialize)]
struct ConfigProfile {
    api_endpoint: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct Config {
    profiles: BTreeMap<String, ConfigProfile>,
}

impl Profile {
    /// Build a profile directly, without reading any configuration.
    pub fn new(api_endpoint: &str, api_key: impl Into<String>) -> Result<Self, Error> {
        let raw = ConfigProfile {
            api_endpoint: Some(api_endpoint.to_owned()),
            api_key: Some(api_key.into()),
            timeout_secs: None,
        };

        Self::from_raw(raw, "default".to_owned(), None)
    }

    /// Set the overall timeout applied by the default transport.
    pub fn with_timeout(self, timeout: Option<time::Duration>) -> Self {
        Self { timeout, ..self }
    }

    /// Load the profile named by `EMSEARCH_PROFILE` (or `default`) from the
    /// Emsearch configuration file (usually ~/.config/emsearch.yaml). If no
    /// configuration file is present, then the configuration will be loaded
    /// solely from the environment.
    ///
    /// The following environment variables can override the corresponding
    /// values in the config file:
    ///
    /// | Environment Variable     | Config Value   |
    /// |--------------------------|----------------|
    /// | `EMSEARCH_API_KEY`       | `api_key`      |
    /// | `EMSEARCH_API_ENDPOINT`  | `api_endpoint` |
    pub fn from_default_env() -> Result<Self, Error> {
        if let Ok(s) = env::var("EMSEARCH_PROFILE") {
            Self::from_env(&s)
        } else {
            Self::from_env("default")
        }
    }

    /// Load the given profile from the Emsearch configuration file, applying
    /// the environment overrides described in [Profile::from_default_env].
    pub fn from_env(name: &str) -> Result<Self, Error> {
        let api_key = env::var("EMSEARCH_API_KEY").ok();
        let api_endpoint = env::var("EMSEARCH_API_ENDPOINT").ok();

        let config_path = find_config()?;
        let profile = match read_profile(&config_path, name) {
            Ok(p) => p,
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no config file found");
                Default::default()
            }
            Err(e) => return Err(e),
        };

        let profile = ConfigProfile {
            api_endpoint: api_endpoint.or(profile.api_endpoint),
            api_key: api_key.or(profile.api_key),
            ..profile
        };

        Self::from_raw(profile, name.to_owned(), Some(config_path))
    }

    /// Load the given profile (or 'default') from the Emsearch configuration
    /// file. Does not read any environment variables.
    ///
    /// Usually, you will want to use [Profile::from_env] instead.
    pub fn load(name: Option<&str>) -> Result<Self, Error> {
        let file = find_config()?;
        Self::read(&file, name)
    }

    /// Load the given profile (or 'default') from the given file, which must
    /// be a valid Emsearch configuration file. Does not read any environment
    /// variables.
    pub fn read(path: impl AsRef<Path>, name: Option<&str>) -> Result<Self, Error> {
        let path = path.as_ref();
        let name = name.unwrap_or("default").to_owned();
        let profile = read_profile(path, &name)?;
        Self::from_raw(profile, name, Some(path.to_owned()))
    }

    /// Read all profiles from the given file, which must be a valid Emsearch
    /// configuration file. Does not read any environment variables.
    pub fn read_all(path: impl AsRef<Path>) -> Result<impl Iterator<Item = Self>, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;

        let profiles: Result<Vec<_>, Error> = config
            .profiles
            .into_iter()
            .map(|(name, raw)| Profile::from_raw(raw, name, Some(path.to_owned())))
            .collect();

        Ok(profiles?.into_iter())
    }

    fn from_raw(raw: ConfigProfile, name: String, path: Option<PathBuf>) -> Result<Self, Error> {
        let ConfigProfile {
            api_endpoint,
            api_key,
            timeout_secs,
        } = raw;

        let endpoint = api_endpoint.as_deref().unwrap_or(DEFAULT_API_ENDPOINT);
        let api_endpoint: http::Uri = endpoint.parse()?;
        if api_endpoint.scheme().is_none() || api_endpoint.authority().is_none() {
            return Err(Error::RelativeEndpoint(endpoint.to_owned()));
        }

        let api_key = api_key.ok_or(Error::NoApiKey)?;
        if api_key.is_empty() {
            return Err(Error::NoApiKey);
        }

        if !api_key.is_ascii() {
            return Err(Error::InvalidApiKey);
        }

        Ok(Self {
            name,
            api_endpoint,
            api_key,
            timeout: timeout_secs.map(time::Duration::from_secs),
            user_agent: make_ua(),
            config_path: path,
        })
    }
}

fn find_config() -> Result<PathBuf, Error> {
    let Some(home) = env::home_dir() else {
        return Err(Error::Io(io::Error::other(
            "No $HOME found for the current user",
        )));
    };

    let canonical = home.join(".config/emsearch.yaml");
    if canonical.exists() {
        return Ok(canonical);
    }

    // Try some fallback paths, and if that doesn't work, return the error from
    // the canonical location.
    for fallback in [".config/emsearch.yml", ".emsearch/config.yaml"] {
        let path = home.join(fallback);
        if path.exists() {
            return Ok(path);
        }
    }

    Ok(canonical)
}

fn read_profile(p: &Path, name: &str) -> Result<ConfigProfile, Error> {
    let file = File::open(p)?;
    let mut config: Config = serde_yaml::from_reader(file).map_err(Error::Invalid)?;
    let Some(config_profile) = config.profiles.remove(name) else {
        return Err(Error::ProfileNotFound(name.to_string()));
    };

    debug!(path = %p.display(), "loaded config file");

    Ok(config_profile)
}

fn make_ua() -> String {
    format!("emsearch-rs/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod test {
    use std::io::Write as _;

    use assert_matches::assert_matches;

    use super::*;

    fn config_file(contents: &str) -> anyhow::Result<tempfile::NamedTempFile> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;
        Ok(file)
    }

    const CONFIG: &str = "
profiles:
  default:
    api_key: abc123
  staging:
    api_key: def456
    api_endpoint: https://staging.emsearch.io
    timeout_secs: 30
  broken:
    api_endpoint: https://staging.emsearch.io
";

    #[test]
    fn read_default_profile() -> anyhow::Result<()> {
        let file = config_file(CONFIG)?;
        let profile = Profile::read(file.path(), None)?;

        assert_eq!(profile.name, "default");
        assert_eq!(profile.api_key, "abc123");
        assert_eq!(profile.api_endpoint.host(), Some("api.emsearch.io"));
        assert_eq!(profile.timeout, None);
        assert_eq!(profile.config_path.as_deref(), Some(file.path()));

        Ok(())
    }

    #[test]
    fn read_named_profile() -> anyhow::Result<()> {
        let file = config_file(CONFIG)?;
        let profile = Profile::read(file.path(), Some("staging"))?;

        assert_eq!(profile.api_key, "def456");
        assert_eq!(profile.api_endpoint.host(), Some("staging.emsearch.io"));
        assert_eq!(profile.api_endpoint.scheme_str(), Some("https"));
        assert_eq!(profile.timeout, Some(time::Duration::from_secs(30)));

        Ok(())
    }

    #[test]
    fn missing_profile() -> anyhow::Result<()> {
        let file = config_file(CONFIG)?;
        let res = Profile::read(file.path(), Some("production"));
        assert_matches!(res, Err(Error::ProfileNotFound(name)) if name == "production");

        Ok(())
    }

    #[test]
    fn missing_api_key() -> anyhow::Result<()> {
        let file = config_file(CONFIG)?;
        let res = Profile::read(file.path(), Some("broken"));
        assert_matches!(res, Err(Error::NoApiKey));

        Ok(())
    }

    #[test]
    fn read_all_profiles() -> anyhow::Result<()> {
        let file = config_file(
            "
profiles:
  a:
    api_key: one
  b:
    api_key: two
",
        )?;

        let names: Vec<_> = Profile::read_all(file.path())?.map(|p| p.name).collect();
        assert_eq!(names, ["a", "b"]);

        Ok(())
    }

    #[test]
    fn relative_endpoint_is_rejected() {
        let res = Profile::new("/api", "k");
        assert_matches!(res, Err(Error::RelativeEndpoint(_)));
    }

    #[test]
    fn non_ascii_key_is_rejected() {
        let res = Profile::new("https://api.emsearch.io", "clé");
        assert_matches!(res, Err(Error::InvalidApiKey));
    }

    #[test]
    fn debug_hides_api_key() -> anyhow::Result<()> {
        let profile = Profile::new("https://api.emsearch.io", "secret-key")?;
        assert!(!format!("{profile:?}").contains("secret-key"));

        Ok(())
    }
}
