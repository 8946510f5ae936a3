//! Multi-call workflows behind the `obs` and `died` commands.
//!
//! Free-text inputs (dates, coded values) are validated before the first request, so a typo never
//! costs a lookup round trip.

use crate::client::OpenmrsClient;
use crate::concept::parse_source_and_code;
use crate::constants::DEFAULT_CONCEPT_SOURCE;
use crate::datetime::{parse_date, parse_datetime};
use crate::OmrsResult;
use omrs_uuid::ResourceUuid;

/// The value of a new observation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObsValue {
    /// Sent as-is (numeric, text, ...).
    Raw(String),
    /// `SOURCE:CODE` or a bare code, sent as the composite `source:code`.
    Coded(String),
}

/// Inputs for recording one observation.
#[derive(Clone, Debug)]
pub struct ObservationRequest {
    /// Patient identifier or UUID.
    pub patient: String,
    /// Concept code or UUID of the thing observed.
    pub code: String,
    /// Source for `code`; defaults to CIEL.
    pub source: Option<String>,
    /// Human date/time; defaults to now.
    pub obs_datetime: Option<String>,
    pub value: ObsValue,
}

/// Inputs for recording a death.
#[derive(Clone, Debug)]
pub struct DeathRequest {
    /// Patient identifier or UUID.
    pub patient: String,
    /// Human date; defaults to today.
    pub death_date: Option<String>,
    /// Concept UUID, code or `SOURCE:CODE`; defaults to "Unknown".
    pub cause_of_death: Option<String>,
}

impl OpenmrsClient {
    /// Resolve patient and concept, then create the observation.
    pub async fn record_observation(&self, req: &ObservationRequest) -> OmrsResult<ResourceUuid> {
        let obs_datetime = req.obs_datetime.as_deref().map(parse_datetime).transpose()?;
        let (value, value_source) = match &req.value {
            ObsValue::Raw(value) => (value.as_str(), None),
            ObsValue::Coded(coded) => {
                let (source, code) = parse_source_and_code(coded);
                (code, Some(source))
            }
        };

        let patient = self.resolve_patient(&req.patient).await?;
        let source = req.source.as_deref().unwrap_or(DEFAULT_CONCEPT_SOURCE);
        let concept = self.resolve_concept(&req.code, source).await?;

        self.create_observation(&patient, &concept, value, value_source, obs_datetime)
            .await
    }

    /// Resolve patient and cause of death, then mark the person dead.
    pub async fn record_patient_death(&self, req: &DeathRequest) -> OmrsResult<ResourceUuid> {
        let death_date = req.death_date.as_deref().map(parse_date).transpose()?;

        let person = self.resolve_patient(&req.patient).await?;
        let cause_of_death = match req.cause_of_death.as_deref() {
            Some(cause) => {
                let (source, code) = parse_source_and_code(cause);
                Some(self.resolve_concept(code, source).await?)
            }
            None => None,
        };

        self.record_death(&person, cause_of_death.as_ref(), death_date)
            .await
    }
}
