//! # OMRS Core
//!
//! Gateway to the OpenMRS REST API (`<base_url>/ws/rest/v1`).
//!
//! This crate contains:
//! - Configuration resolved once at startup ([`OmrsConfig`])
//! - The response envelope primitives and [`OpenmrsClient`]
//! - Lookups (identifier/code to UUID, listings) and mutations (person, patient, obs, death)
//! - The patient registration pipeline and the `obs`/`died` workflows
//!
//! **No process concerns**: argument parsing, printing and exit codes belong in `omrs-cli`. Every
//! function here returns an [`OmrsResult`].

pub mod client;
pub mod concept;
pub mod config;
pub mod constants;
pub mod datetime;
pub mod error;
pub mod listing;
pub mod lookup;
pub mod mutation;
pub mod registration;
pub mod workflows;

pub use client::OpenmrsClient;
pub use config::{ConfigOverrides, OmrsConfig};
pub use error::{OmrsError, OmrsResult};
pub use listing::{list_results, ResourceRef};
pub use registration::{NewPatient, RegisteredPatient};
pub use workflows::{DeathRequest, ObsValue, ObservationRequest};

pub use omrs_types::{Gender, NonEmptyText};
pub use omrs_uuid::ResourceUuid;
