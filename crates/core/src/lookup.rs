//! Lookup gateway: human identifiers and concept codes to UUIDs, plus listings.
//!
//! Resolution short-circuits on UUID-shaped input, so references that a caller already holds (for
//! example the output of `find --patient`) never cost a round trip.

use crate::client::{uuid_field, OpenmrsClient};
use crate::constants::{
    CONCEPT_RESOURCE, IDENTIFIER_TYPE_RESOURCE, LOCATION_RESOURCE, PATIENT_RESOURCE,
};
use crate::listing::{resource_refs, ResourceRef};
use crate::{OmrsError, OmrsResult};
use omrs_uuid::ResourceUuid;
use serde_json::Value;

impl OpenmrsClient {
    /// Resolve a patient identifier (or UUID) to the patient's UUID.
    ///
    /// # Errors
    ///
    /// - [`OmrsError::InvalidInput`] if the identifier is empty,
    /// - [`OmrsError::PatientNotFound`] if the identifier query returns no results,
    /// - [`OmrsError::MissingField`] / [`OmrsError::MalformedResponse`] for bad responses.
    pub async fn resolve_patient(&self, identifier_or_uuid: &str) -> OmrsResult<ResourceUuid> {
        if let Ok(uuid) = ResourceUuid::parse(identifier_or_uuid) {
            return Ok(uuid);
        }
        if identifier_or_uuid.trim().is_empty() {
            return Err(OmrsError::InvalidInput(
                "patient identifier cannot be empty".into(),
            ));
        }

        let results = self
            .get_results(PATIENT_RESOURCE, &[("identifier", identifier_or_uuid)])
            .await?;
        match results.first() {
            Some(first) => first_uuid(first),
            None => Err(OmrsError::PatientNotFound(identifier_or_uuid.to_owned())),
        }
    }

    /// Resolve a concept code within `source` (or a concept UUID) to the concept's UUID.
    ///
    /// # Errors
    ///
    /// - [`OmrsError::InvalidInput`] if `code` is empty,
    /// - [`OmrsError::ConceptNotFound`] if the source/code query returns no results,
    /// - [`OmrsError::MissingField`] / [`OmrsError::MalformedResponse`] for bad responses.
    pub async fn resolve_concept(&self, code: &str, source: &str) -> OmrsResult<ResourceUuid> {
        if let Ok(uuid) = ResourceUuid::parse(code) {
            return Ok(uuid);
        }
        if code.trim().is_empty() {
            return Err(OmrsError::InvalidInput("concept code cannot be empty".into()));
        }

        let results = self
            .get_results(CONCEPT_RESOURCE, &[("source", source), ("code", code)])
            .await?;
        match results.first() {
            Some(first) => first_uuid(first),
            None => Err(OmrsError::ConceptNotFound {
                vocabulary: source.to_owned(),
                code: code.to_owned(),
            }),
        }
    }

    /// Free-text concept search. No match is an empty list, not an error.
    pub async fn find_concepts(&self, query: &str) -> OmrsResult<Vec<ResourceRef>> {
        let results = self.get_results(CONCEPT_RESOURCE, &[("q", query)]).await?;
        resource_refs(&results)
    }

    pub async fn list_locations(&self) -> OmrsResult<Vec<ResourceRef>> {
        let results = self.get_results(LOCATION_RESOURCE, &[]).await?;
        resource_refs(&results)
    }

    pub async fn list_identifier_types(&self) -> OmrsResult<Vec<ResourceRef>> {
        let results = self.get_results(IDENTIFIER_TYPE_RESOURCE, &[]).await?;
        resource_refs(&results)
    }
}

fn first_uuid(result: &Value) -> OmrsResult<ResourceUuid> {
    uuid_field(result).ok_or_else(|| OmrsError::MissingField {
        field: "uuid",
        body: result.to_string(),
    })
}
