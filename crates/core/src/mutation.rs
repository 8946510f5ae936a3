//! Mutation gateway: one POST per resource, each returning the UUID the server assigned.

use crate::client::OpenmrsClient;
use crate::constants::{DEFAULT_CAUSE_OF_DEATH, OBS_RESOURCE, PATIENT_RESOURCE, PERSON_RESOURCE};
use crate::datetime::{format_death_date, format_obs_datetime};
use crate::{OmrsError, OmrsResult};
use chrono::{Local, NaiveDate, NaiveDateTime};
use omrs_types::{Gender, NonEmptyText};
use omrs_uuid::ResourceUuid;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct PersonPayload<'a> {
    gender: Gender,
    names: [PersonName<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    age: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersonName<'a> {
    given_name: &'a str,
    family_name: &'a str,
}

#[derive(Serialize)]
struct PatientPayload<'a> {
    person: &'a ResourceUuid,
    identifiers: [PatientIdentifier<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PatientIdentifier<'a> {
    identifier: &'a str,
    identifier_type: &'a ResourceUuid,
    location: &'a ResourceUuid,
    preferred: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ObsPayload<'a> {
    person: &'a ResourceUuid,
    obs_datetime: String,
    concept: &'a ResourceUuid,
    value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeathPayload<'a> {
    dead: bool,
    death_date: String,
    cause_of_death: &'a str,
}

impl OpenmrsClient {
    /// POST `/person` with one name.
    pub async fn create_person(
        &self,
        given_name: &NonEmptyText,
        family_name: &NonEmptyText,
        gender: Gender,
        age: Option<u32>,
    ) -> OmrsResult<ResourceUuid> {
        let payload = PersonPayload {
            gender,
            names: [PersonName {
                given_name: given_name.as_str(),
                family_name: family_name.as_str(),
            }],
            age,
        };
        let uuid = self.post_for_uuid(PERSON_RESOURCE, &payload).await?;
        tracing::info!(person = %uuid, "created person");
        Ok(uuid)
    }

    /// POST `/patient`, promoting `person` to a patient with one preferred identifier.
    pub async fn create_patient(
        &self,
        person: &ResourceUuid,
        identifier: &str,
        identifier_type: &ResourceUuid,
        location: &ResourceUuid,
    ) -> OmrsResult<ResourceUuid> {
        let payload = PatientPayload {
            person,
            identifiers: [PatientIdentifier {
                identifier,
                identifier_type,
                location,
                preferred: true,
            }],
        };
        let uuid = self.post_for_uuid(PATIENT_RESOURCE, &payload).await?;
        tracing::info!(patient = %uuid, %person, "created patient");
        Ok(uuid)
    }

    /// POST `/obs`.
    ///
    /// With `value_source`, the value is sent as the coded composite `"<source>:<value>"`.
    /// `obs_datetime` defaults to the current local time.
    pub async fn create_observation(
        &self,
        patient: &ResourceUuid,
        concept: &ResourceUuid,
        value: &str,
        value_source: Option<&str>,
        obs_datetime: Option<NaiveDateTime>,
    ) -> OmrsResult<ResourceUuid> {
        let obs_datetime = obs_datetime.unwrap_or_else(|| Local::now().naive_local());
        let value = match value_source {
            Some(source) => format!("{source}:{value}"),
            None => value.to_owned(),
        };

        let payload = ObsPayload {
            person: patient,
            obs_datetime: format_obs_datetime(&obs_datetime),
            concept,
            value,
        };
        let uuid = self.post_for_uuid(OBS_RESOURCE, &payload).await?;
        tracing::info!(obs = %uuid, %patient, %concept, "created observation");
        Ok(uuid)
    }

    /// POST `/person/<uuid>` marking the person dead.
    ///
    /// `cause_of_death` defaults to the "Unknown" concept, `death_date` to today.
    pub async fn record_death(
        &self,
        person: &ResourceUuid,
        cause_of_death: Option<&ResourceUuid>,
        death_date: Option<NaiveDate>,
    ) -> OmrsResult<ResourceUuid> {
        let death_date = death_date.unwrap_or_else(|| Local::now().date_naive());
        let payload = DeathPayload {
            dead: true,
            death_date: format_death_date(&death_date),
            cause_of_death: cause_of_death
                .map(ResourceUuid::as_str)
                .unwrap_or(DEFAULT_CAUSE_OF_DEATH),
        };

        let path = format!("{PERSON_RESOURCE}/{person}");
        tracing::debug!(
            method = "POST",
            url = %self.config().resource_url(&path),
            body = ?payload,
            "recording death"
        );
        self.post_for_uuid(&path, &payload).await
    }

    /// Ask idgen for a fresh patient identifier.
    ///
    /// idgen only exposes a form controller, which authenticates through query parameters rather
    /// than basic auth.
    ///
    /// # Errors
    ///
    /// [`OmrsError::MissingField`] if the reply has no non-empty `identifiers` array of strings.
    pub async fn generate_patient_identifier(&self) -> OmrsResult<String> {
        let cfg = self.config();
        let source = cfg.identifier_source_id().to_string();
        let (json, body) = self
            .get_form_json(
                &cfg.idgen_url(),
                &[
                    ("source", source.as_str()),
                    ("username", cfg.user()),
                    ("password", cfg.pw()),
                ],
            )
            .await?;

        json.get("identifiers")
            .and_then(Value::as_array)
            .and_then(|ids| ids.first())
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(OmrsError::MissingField {
                field: "identifiers",
                body,
            })
    }

    /// DELETE `/person/<uuid>?purge=true`. Only used to undo a half-finished registration.
    pub async fn purge_person(&self, person: &ResourceUuid) -> OmrsResult<()> {
        let path = format!("{PERSON_RESOURCE}/{person}");
        self.delete(&path, &[("purge", "true")]).await?;
        tracing::warn!(%person, "purged person");
        Ok(())
    }
}
