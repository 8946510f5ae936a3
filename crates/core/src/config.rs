//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup (YAML file, then command-line overrides) and
//! then passed into the gateway client. Nothing below the CLI reads files or environment
//! variables, so gateway functions can be exercised in tests against any server URL.

use crate::constants::{DEFAULT_IDENTIFIER_SOURCE_ID, IDGEN_PATH, REST_API_PATH};
use crate::{OmrsError, OmrsResult};
use omrs_uuid::ResourceUuid;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Raw shape of the YAML configuration file.
///
/// Every key except `identifier_source_id` is required; a missing key fails deserialisation.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    base_url: String,
    user: String,
    pw: String,
    identifier_type_uuid: String,
    location_uuid: String,
    #[serde(default)]
    identifier_source_id: Option<u32>,
}

/// Values given on the command line (or via environment) that replace file values.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub api: Option<String>,
    pub user: Option<String>,
    pub pw: Option<String>,
}

/// Client configuration resolved at startup.
#[derive(Clone)]
pub struct OmrsConfig {
    base_url: String,
    user: String,
    pw: String,
    identifier_type_uuid: ResourceUuid,
    location_uuid: ResourceUuid,
    identifier_source_id: u32,
}

impl OmrsConfig {
    /// Create a new `OmrsConfig`.
    ///
    /// `base_url` may be either the instance URL (`https://host/openmrs`) or the REST root
    /// (`https://host/openmrs/ws/rest/v1`); both normalise to the instance URL.
    ///
    /// # Errors
    ///
    /// Returns [`OmrsError::InvalidConfig`] if a value is empty, the base URL is not http(s), or
    /// a configured UUID is not UUID-shaped.
    pub fn new(
        base_url: &str,
        user: &str,
        pw: &str,
        identifier_type_uuid: &str,
        location_uuid: &str,
    ) -> OmrsResult<Self> {
        let base_url = normalise_base_url(base_url)?;

        if user.trim().is_empty() {
            return Err(OmrsError::InvalidConfig("user cannot be empty".into()));
        }
        if pw.is_empty() {
            return Err(OmrsError::InvalidConfig("pw cannot be empty".into()));
        }

        let identifier_type_uuid = ResourceUuid::parse(identifier_type_uuid.trim())
            .map_err(|e| OmrsError::InvalidConfig(format!("identifier_type_uuid: {e}")))?;
        let location_uuid = ResourceUuid::parse(location_uuid.trim())
            .map_err(|e| OmrsError::InvalidConfig(format!("location_uuid: {e}")))?;

        Ok(Self {
            base_url,
            user: user.trim().to_owned(),
            pw: pw.to_owned(),
            identifier_type_uuid,
            location_uuid,
            identifier_source_id: DEFAULT_IDENTIFIER_SOURCE_ID,
        })
    }

    /// Use a different idgen identifier source.
    pub fn with_identifier_source_id(mut self, id: u32) -> Self {
        self.identifier_source_id = id;
        self
    }

    /// Load the YAML file at `path` and apply `overrides` on top.
    ///
    /// # Errors
    ///
    /// - [`OmrsError::ConfigRead`] if the file cannot be read,
    /// - [`OmrsError::ConfigParse`] if it is not valid YAML or a required key is missing,
    /// - [`OmrsError::InvalidConfig`] if a resolved value is invalid.
    pub fn load(path: &Path, overrides: ConfigOverrides) -> OmrsResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| OmrsError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_yaml::from_str(&raw).map_err(|source| OmrsError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        let base_url = overrides.api.unwrap_or(file.base_url);
        let user = overrides.user.unwrap_or(file.user);
        let pw = overrides.pw.unwrap_or(file.pw);

        let cfg = Self::new(
            &base_url,
            &user,
            &pw,
            &file.identifier_type_uuid,
            &file.location_uuid,
        )?;

        Ok(match file.identifier_source_id {
            Some(id) => cfg.with_identifier_source_id(id),
            None => cfg,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base_url>/ws/rest/v1`
    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url, REST_API_PATH)
    }

    /// `<base_url>/ws/rest/v1/<path>`
    pub fn resource_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url(), path.trim_start_matches('/'))
    }

    pub fn idgen_url(&self) -> String {
        format!("{}{}", self.base_url, IDGEN_PATH)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn pw(&self) -> &str {
        &self.pw
    }

    pub fn identifier_type_uuid(&self) -> &ResourceUuid {
        &self.identifier_type_uuid
    }

    pub fn location_uuid(&self) -> &ResourceUuid {
        &self.location_uuid
    }

    pub fn identifier_source_id(&self) -> u32 {
        self.identifier_source_id
    }
}

impl fmt::Debug for OmrsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmrsConfig")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("pw", &"<redacted>")
            .field("identifier_type_uuid", &self.identifier_type_uuid)
            .field("location_uuid", &self.location_uuid)
            .field("identifier_source_id", &self.identifier_source_id)
            .finish()
    }
}

/// Strip trailing slashes and a trailing REST root from `input`.
fn normalise_base_url(input: &str) -> OmrsResult<String> {
    let trimmed = input.trim().trim_end_matches('/');

    if trimmed.is_empty() {
        return Err(OmrsError::InvalidConfig("base_url cannot be empty".into()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(OmrsError::InvalidConfig(format!(
            "base_url must start with http:// or https://, got: '{}'",
            trimmed
        )));
    }

    let base = trimmed
        .strip_suffix(REST_API_PATH)
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    Ok(base.to_owned())
}
