use omrs_uuid::ResourceUuid;

#[derive(Debug, thiserror::Error)]
pub enum OmrsError {
    #[error("failed to read config file {path}: {source}", path = path.display())]
    ConfigRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}", path = path.display())]
    ConfigParse {
        path: std::path::PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),
    #[error("Concept not found: {vocabulary}:{code}")]
    ConceptNotFound { vocabulary: String, code: String },

    #[error("Invalid response from {url} (HTTP {status}):\n{body}")]
    MalformedResponse {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Invalid response, missing '{field}':\n{body}")]
    MissingField { field: &'static str, body: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(
        "patient registration failed and the created person {person_uuid} could not be purged: registration={registration_error}; cleanup={cleanup_error}"
    )]
    CleanupAfterRegistrationFailed {
        person_uuid: ResourceUuid,
        #[source]
        registration_error: Box<OmrsError>,
        cleanup_error: Box<OmrsError>,
    },
}

impl From<omrs_types::TextError> for OmrsError {
    fn from(err: omrs_types::TextError) -> Self {
        OmrsError::InvalidInput(err.to_string())
    }
}

pub type OmrsResult<T> = std::result::Result<T, OmrsError>;
