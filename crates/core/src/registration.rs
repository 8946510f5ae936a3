//! Patient registration pipeline.
//!
//! Registering a patient spans three calls against two systems:
//! 1. `POST /person` creates the demographic record,
//! 2. idgen issues a patient identifier,
//! 3. `POST /patient` attaches the identifier (with the configured type and location).
//!
//! If step 2 or 3 fails, the person from step 1 is purged so that no orphaned person is left
//! behind, and the original error is returned. If the purge fails as well,
//! [`OmrsError::CleanupAfterRegistrationFailed`] reports the orphaned person's UUID alongside
//! both errors.

use crate::client::OpenmrsClient;
use crate::{OmrsError, OmrsResult};
use omrs_types::{Gender, NonEmptyText};
use omrs_uuid::ResourceUuid;

/// Demographics for a new patient.
#[derive(Clone, Debug)]
pub struct NewPatient {
    pub given_name: NonEmptyText,
    pub family_name: NonEmptyText,
    pub gender: Gender,
    pub age: Option<u32>,
}

/// The resources created by a successful registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredPatient {
    pub person_uuid: ResourceUuid,
    pub patient_uuid: ResourceUuid,
    pub identifier: String,
}

impl OpenmrsClient {
    /// Create person, generate identifier, create patient.
    ///
    /// # Errors
    ///
    /// - Any error from `create_person` (nothing was created),
    /// - any error from the identifier or patient step, after the person was purged,
    /// - [`OmrsError::CleanupAfterRegistrationFailed`] if the purge also failed.
    pub async fn register_patient(&self, patient: &NewPatient) -> OmrsResult<RegisteredPatient> {
        let person_uuid = self
            .create_person(
                &patient.given_name,
                &patient.family_name,
                patient.gender,
                patient.age,
            )
            .await?;

        match self.attach_patient_identifier(&person_uuid).await {
            Ok((identifier, patient_uuid)) => Ok(RegisteredPatient {
                person_uuid,
                patient_uuid,
                identifier,
            }),
            Err(registration_error) => {
                tracing::warn!(
                    person = %person_uuid,
                    error = %registration_error,
                    "patient registration failed, purging created person"
                );
                if let Err(cleanup_error) = self.purge_person(&person_uuid).await {
                    return Err(OmrsError::CleanupAfterRegistrationFailed {
                        person_uuid,
                        registration_error: Box::new(registration_error),
                        cleanup_error: Box::new(cleanup_error),
                    });
                }
                Err(registration_error)
            }
        }
    }

    async fn attach_patient_identifier(
        &self,
        person: &ResourceUuid,
    ) -> OmrsResult<(String, ResourceUuid)> {
        let identifier = self.generate_patient_identifier().await?;
        let cfg = self.config();
        let patient_uuid = self
            .create_patient(
                person,
                &identifier,
                cfg.identifier_type_uuid(),
                cfg.location_uuid(),
            )
            .await?;
        Ok((identifier, patient_uuid))
    }
}
