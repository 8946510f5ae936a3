//! Display helpers for `results` arrays.

use crate::client::uuid_field;
use crate::{OmrsError, OmrsResult};
use omrs_uuid::ResourceUuid;
use serde_json::Value;

/// A `{display, uuid}` pair as returned in OpenMRS default representations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRef {
    pub display: String,
    pub uuid: ResourceUuid,
}

impl TryFrom<&Value> for ResourceRef {
    type Error = OmrsError;

    fn try_from(value: &Value) -> OmrsResult<Self> {
        let uuid = uuid_field(value).ok_or_else(|| OmrsError::MissingField {
            field: "uuid",
            body: value.to_string(),
        })?;
        let display = value
            .get("display")
            .and_then(Value::as_str)
            .ok_or_else(|| OmrsError::MissingField {
                field: "display",
                body: value.to_string(),
            })?;

        Ok(Self {
            display: display.to_owned(),
            uuid,
        })
    }
}

/// Convert every element of a `results` array.
pub(crate) fn resource_refs(results: &[Value]) -> OmrsResult<Vec<ResourceRef>> {
    results.iter().map(ResourceRef::try_from).collect()
}

/// Render `items` as a 1-based enumeration, one `"<n>: <display> (<uuid>)"` line each.
///
/// An empty slice renders as an empty string.
pub fn list_results(items: &[ResourceRef]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}: {} ({})\n", i + 1, item.display, item.uuid))
        .collect()
}
