//! HTTP envelope handling for the OpenMRS REST API.
//!
//! Every gateway call goes through one of two primitives:
//! - [`OpenmrsClient::get_results`]: GET, expects a JSON object with a `results` array.
//! - [`OpenmrsClient::post_for_uuid`]: POST a JSON body, expects a JSON object with a `uuid`.
//!
//! Both read the body as text first so that a non-JSON reply (an HTML login page, a proxy error)
//! can be surfaced verbatim in [`OmrsError::MalformedResponse`]. A JSON reply without the expected
//! field yields [`OmrsError::MissingField`] carrying the full body. The HTTP status is recorded
//! but not interpreted: OpenMRS reports most failures as a JSON `error` object, which then fails
//! the field check. There is no retry.

use crate::config::OmrsConfig;
use crate::{OmrsError, OmrsResult};
use omrs_uuid::ResourceUuid;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Client for one OpenMRS instance.
///
/// Holds the resolved configuration and a single `reqwest::Client`. Requests are awaited one at
/// a time by the callers; nothing here spawns tasks.
#[derive(Clone, Debug)]
pub struct OpenmrsClient {
    cfg: Arc<OmrsConfig>,
    http: reqwest::Client,
}

impl OpenmrsClient {
    /// Creates a client for the instance described by `cfg`.
    ///
    /// # Errors
    ///
    /// Returns [`OmrsError::Http`] if the TLS backend cannot be initialised.
    pub fn new(cfg: Arc<OmrsConfig>) -> OmrsResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("omrs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { cfg, http })
    }

    pub fn config(&self) -> &OmrsConfig {
        &self.cfg
    }

    /// GET `<api>/<path>?<query>` and return the `results` array.
    pub(crate) async fn get_results(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> OmrsResult<Vec<Value>> {
        let url = self.cfg.resource_url(path);
        tracing::debug!(method = "GET", %url, "openmrs request");

        let response = self
            .http
            .get(&url)
            .basic_auth(self.cfg.user(), Some(self.cfg.pw()))
            .query(query)
            .send()
            .await?;

        let (mut json, body) = read_json(&url, response).await?;
        match json.get_mut("results").map(Value::take) {
            Some(Value::Array(results)) => {
                tracing::debug!(%url, count = results.len(), "openmrs results");
                Ok(results)
            }
            _ => Err(OmrsError::MissingField {
                field: "results",
                body,
            }),
        }
    }

    /// POST `payload` as JSON to `<api>/<path>` and return the `uuid` of the response.
    pub(crate) async fn post_for_uuid<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> OmrsResult<ResourceUuid> {
        let url = self.cfg.resource_url(path);
        tracing::debug!(method = "POST", %url, "openmrs request");

        let response = self
            .http
            .post(&url)
            .basic_auth(self.cfg.user(), Some(self.cfg.pw()))
            .json(payload)
            .send()
            .await?;

        let (json, body) = read_json(&url, response).await?;
        uuid_field(&json).ok_or(OmrsError::MissingField {
            field: "uuid",
            body,
        })
    }

    /// DELETE `<api>/<path>?<query>`. Any non-success status is an error.
    pub(crate) async fn delete(&self, path: &str, query: &[(&str, &str)]) -> OmrsResult<()> {
        let url = self.cfg.resource_url(path);
        tracing::debug!(method = "DELETE", %url, "openmrs request");

        self.http
            .delete(&url)
            .basic_auth(self.cfg.user(), Some(self.cfg.pw()))
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// GET an absolute URL outside the REST root, without basic auth, and parse the JSON body.
    ///
    /// Used for module form endpoints that authenticate through query parameters. The query
    /// carries credentials, so transport errors are stripped of their URL.
    pub(crate) async fn get_form_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> OmrsResult<(Value, String)> {
        tracing::debug!(method = "GET", %url, "openmrs form request");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| OmrsError::Http(e.without_url()))?;
        read_json(url, response).await.map_err(|e| match e {
            OmrsError::Http(e) => OmrsError::Http(e.without_url()),
            other => other,
        })
    }
}

/// Read the whole body and parse it as JSON, keeping the raw text for error reporting.
async fn read_json(url: &str, response: reqwest::Response) -> OmrsResult<(Value, String)> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(%url, status = status.as_u16(), "openmrs returned an error status");
    }

    match serde_json::from_str::<Value>(&body) {
        Ok(json) => Ok((json, body)),
        Err(_) => Err(OmrsError::MalformedResponse {
            url: url.to_owned(),
            status: status.as_u16(),
            body,
        }),
    }
}

/// The `uuid` member of a JSON object, if present and UUID-shaped.
pub(crate) fn uuid_field(json: &Value) -> Option<ResourceUuid> {
    json.get("uuid")
        .and_then(Value::as_str)
        .and_then(|s| ResourceUuid::parse(s).ok())
}
