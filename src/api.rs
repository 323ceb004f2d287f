//! HTTP client for the portal's form endpoints
//!
//! Every submission is a single POST. The portal's answer is treated as
//! "ok / not ok": non-2xx statuses become `PortalError::Rejected`, and a 2xx
//! body is handed back as loose JSON.

use reqwest::{multipart, Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::{PortalError, PortalResult};
use crate::models::{ApiEndpoint, AssistanceRequest, DonationRequest, OnboardingRequest};

pub const ONBOARDING_PATH: &str = "/api/onboarding";
pub const DONORS_PATH: &str = "/api/donors";
pub const ASSISTANCE_PATH: &str = "/api/assistance-request";

pub struct PortalClient {
    client: Client,
    config: Config,
}

impl PortalClient {
    pub fn new(config: &Config) -> PortalResult<Self> {
        let client = Client::builder()
            .user_agent(config.http.user_agent.as_str())
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Register an NGO with the portal
    pub async fn onboard(&self, request: &OnboardingRequest) -> PortalResult<Value> {
        request.validate()?;
        info!("Submitting onboarding for {}", request.ngo_name);
        self.post_json(ONBOARDING_PATH, request, false).await
    }

    /// Submit a donation
    pub async fn donate(&self, request: &DonationRequest) -> PortalResult<Value> {
        request.validate()?;
        info!(
            "Submitting donation of {} ({})",
            request.amount,
            request.purpose.kind()
        );
        self.post_json(DONORS_PATH, request, true).await
    }

    /// Submit a medical assistance request as multipart text fields
    pub async fn request_assistance(&self, request: &AssistanceRequest) -> PortalResult<Value> {
        request.validate()?;
        info!(
            "Submitting assistance request for {}",
            request.assistance_required.label()
        );

        let form = request
            .form_fields()
            .into_iter()
            .fold(multipart::Form::new(), |form, (name, value)| form.text(name, value));

        let url = self.config.endpoint(ASSISTANCE_PATH);
        let builder = self.authorize(self.client.post(&url), true).multipart(form);
        send(&url, builder).await
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        authorized: bool,
    ) -> PortalResult<Value> {
        let url = self.config.endpoint(path);
        let builder = self.authorize(self.client.post(&url), authorized).json(body);
        send(&url, builder).await
    }

    fn authorize(&self, builder: RequestBuilder, authorized: bool) -> RequestBuilder {
        match (&self.config.api_key, authorized) {
            (Some(key), true) => builder.bearer_auth(key),
            _ => builder,
        }
    }
}

async fn send(url: &str, builder: RequestBuilder) -> PortalResult<Value> {
    debug!("POST {}", url);
    let response = builder.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    interpret_response(url, status, &body)
}

/// Map a status and body to the portal's ok / not-ok outcome
pub fn interpret_response(endpoint: &str, status: u16, body: &str) -> PortalResult<Value> {
    if !(200..300).contains(&status) {
        debug!("{} answered {}: {}", endpoint, status, body);
        return Err(PortalError::Rejected {
            endpoint: endpoint.to_string(),
            status,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body).map_err(|source| PortalError::InvalidResponse {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Integration endpoints advertised to an onboarded NGO
pub fn integration_endpoints(config: &Config) -> Vec<ApiEndpoint> {
    [
        ("Donor API", "/api/v1/donor"),
        ("Recipients API", "/api/v1/recipient"),
        ("Volunteer API", "/api/v1/volunteer"),
    ]
    .into_iter()
    .map(|(name, path)| ApiEndpoint {
        name: name.to_string(),
        endpoint: config.endpoint(path),
    })
    .collect()
}
