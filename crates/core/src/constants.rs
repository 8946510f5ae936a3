//! Constants used throughout the OpenMRS client core crate.
//!
//! Path fragments and default values live here so URL templates stay consistent between the
//! lookup and mutation gateways.

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "omrs.yml";

/// Concept source used when a code is given without a `SOURCE:` prefix.
pub const DEFAULT_CONCEPT_SOURCE: &str = "CIEL";

/// CIEL concept "Unknown", recorded as cause of death when none is supplied.
pub const DEFAULT_CAUSE_OF_DEATH: &str = "1067AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// idgen identifier source used when the configuration does not name one.
pub const DEFAULT_IDENTIFIER_SOURCE_ID: u32 = 1;

/// REST API root, relative to the instance base URL.
pub const REST_API_PATH: &str = "/ws/rest/v1";

/// idgen form endpoint, relative to the instance base URL. idgen has no REST resource.
pub const IDGEN_PATH: &str = "/module/idgen/generateIdentifier.form";

/// `strftime` format for `obsDatetime`.
pub const OBS_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// `strftime` format for `deathDate`.
pub const DEATH_DATE_FORMAT: &str = "%Y-%m-%d";

pub const PATIENT_RESOURCE: &str = "patient";
pub const PERSON_RESOURCE: &str = "person";
pub const CONCEPT_RESOURCE: &str = "concept";
pub const LOCATION_RESOURCE: &str = "location";
pub const IDENTIFIER_TYPE_RESOURCE: &str = "patientidentifiertype";
pub const OBS_RESOURCE: &str = "obs";
