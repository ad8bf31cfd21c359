//! HTTP protocol adapter for the CloudPayments API.
//!
//! One synchronous (awaited) POST per operation, JSON body, Basic auth with
//! the public/secret key pair. The gateway reports business failures in the
//! body with HTTP 200, so the `Success` flag decides the outcome, never the
//! status code.

use std::time::Duration;

use async_trait::async_trait;
use paymux_core::{PaymentError, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use tracing::{debug, warn};

use crate::config::CloudPaymentsConfig;
use crate::wire::{
    ChargeRequest, ChargeResponse, ScheduleListResponse, ScheduleModel, ScheduleResponse,
};

pub(crate) const ENDPOINT_CARD_CHARGE: &str = "/payments/cards/charge";
pub(crate) const ENDPOINT_SUBSCRIPTION_LIST: &str = "/subscriptions/find";
pub(crate) const ENDPOINT_SUBSCRIPTION_GET: &str = "/subscriptions/get";
pub(crate) const ENDPOINT_SUBSCRIPTION_CREATE: &str = "/subscriptions/create";
pub(crate) const ENDPOINT_SUBSCRIPTION_UPDATE: &str = "/subscriptions/update";
pub(crate) const ENDPOINT_SUBSCRIPTION_CANCEL: &str = "/subscriptions/cancel";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Gateway API surface the driver talks through.
///
/// Implemented by [`CloudPaymentsProtocol`] over HTTP and by test doubles
/// that record invocations.
#[async_trait]
pub trait CloudPaymentsApi: Send + Sync {
    /// Charge a card. Fails with [`PaymentError::Gateway`] when the gateway
    /// declines.
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeResponse>;

    /// Charge a saved-card token. Same endpoint and semantics as `charge`.
    async fn charge_token(&self, request: ChargeRequest) -> Result<ChargeResponse>;

    /// List subscriptions of one account.
    async fn find_schedules(&self, account_id: &str) -> Result<Vec<ScheduleModel>>;

    /// Fetch one subscription.
    async fn get_schedule(&self, id: &str) -> Result<ScheduleModel>;

    /// Create a subscription; returns the gateway-assigned id.
    async fn create_schedule(&self, payload: JsonValue) -> Result<String>;

    /// Update a subscription; the id is merged into the payload.
    async fn update_schedule(&self, id: &str, payload: JsonValue) -> Result<()>;

    /// Cancel a subscription.
    async fn cancel_schedule(&self, id: &str) -> Result<()>;
}

/// The HTTP adapter. Stateless: credentials and base URL are fixed at
/// construction, parsed responses are handed back to the caller.
pub struct CloudPaymentsProtocol {
    client: Client,
    url: String,
    public_key: String,
    secret_key: String,
}

impl CloudPaymentsProtocol {
    pub fn new(config: &CloudPaymentsConfig) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(CloudPaymentsProtocol {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            public_key: config.public_key.clone(),
            secret_key: config.secret_key.clone(),
        })
    }

    /// POST one JSON body and return the parsed response.
    ///
    /// A body that is not JSON comes back as Null; callers treat that as a
    /// gateway failure with an empty message rather than a parse crash.
    async fn post(&self, endpoint: &str, params: &impl Serialize) -> Result<JsonValue> {
        let url = format!("{}{}", self.url, endpoint);
        debug!(endpoint, "sending gateway request");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.public_key, Some(&self.secret_key))
            .json(params)
            .send()
            .await?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or(JsonValue::Null))
    }
}

/// Merge the gateway id into a subscription payload.
pub(crate) fn merge_id(mut payload: JsonValue, id: &str) -> JsonValue {
    match &mut payload {
        JsonValue::Object(map) => {
            map.insert("Id".to_string(), JsonValue::String(id.to_string()));
            payload
        }
        _ => json!({ "Id": id }),
    }
}

fn gateway_failure(endpoint: &str, message: Option<String>) -> PaymentError {
    let message = message.unwrap_or_default();
    warn!(endpoint, message = %message, "gateway reported failure");
    PaymentError::Gateway(message)
}

/// Apply the gateway verdict to a charge response body.
///
/// A missing `Success` flag or an unparseable body counts as a failure with
/// an empty message; on success the untouched body is kept on the response.
pub(crate) fn parse_charge(raw: JsonValue) -> Result<ChargeResponse> {
    let mut response: ChargeResponse = serde_json::from_value(raw.clone()).unwrap_or_default();
    if !response.success {
        return Err(gateway_failure(ENDPOINT_CARD_CHARGE, response.message));
    }
    response.raw = raw;

    Ok(response)
}

/// Apply the gateway verdict to a single-subscription response body.
pub(crate) fn parse_schedule(endpoint: &str, raw: JsonValue) -> Result<ScheduleResponse> {
    let response: ScheduleResponse = serde_json::from_value(raw).unwrap_or_default();
    if !response.success {
        return Err(gateway_failure(endpoint, response.message));
    }

    Ok(response)
}

/// Apply the gateway verdict to a subscription-list response body.
pub(crate) fn parse_schedule_list(raw: JsonValue) -> Result<Vec<ScheduleModel>> {
    let response: ScheduleListResponse = serde_json::from_value(raw).unwrap_or_default();
    if !response.success {
        return Err(gateway_failure(ENDPOINT_SUBSCRIPTION_LIST, response.message));
    }

    Ok(response.model)
}

#[async_trait]
impl CloudPaymentsApi for CloudPaymentsProtocol {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeResponse> {
        let raw = self.post(ENDPOINT_CARD_CHARGE, &request).await?;
        parse_charge(raw)
    }

    async fn charge_token(&self, request: ChargeRequest) -> Result<ChargeResponse> {
        self.charge(request).await
    }

    async fn find_schedules(&self, account_id: &str) -> Result<Vec<ScheduleModel>> {
        let raw = self
            .post(ENDPOINT_SUBSCRIPTION_LIST, &json!({ "accountId": account_id }))
            .await?;
        parse_schedule_list(raw)
    }

    async fn get_schedule(&self, id: &str) -> Result<ScheduleModel> {
        let raw = self.post(ENDPOINT_SUBSCRIPTION_GET, &json!({ "Id": id })).await?;

        // A success verdict without a record is a malformed gateway reply
        parse_schedule(ENDPOINT_SUBSCRIPTION_GET, raw)?
            .model
            .ok_or_else(|| PaymentError::Gateway(String::new()))
    }

    async fn create_schedule(&self, payload: JsonValue) -> Result<String> {
        let raw = self.post(ENDPOINT_SUBSCRIPTION_CREATE, &payload).await?;

        parse_schedule(ENDPOINT_SUBSCRIPTION_CREATE, raw)?
            .model
            .and_then(|model| model.id)
            .ok_or_else(|| PaymentError::Gateway(String::new()))
    }

    async fn update_schedule(&self, id: &str, payload: JsonValue) -> Result<()> {
        let raw = self
            .post(ENDPOINT_SUBSCRIPTION_UPDATE, &merge_id(payload, id))
            .await?;
        parse_schedule(ENDPOINT_SUBSCRIPTION_UPDATE, raw)?;

        Ok(())
    }

    async fn cancel_schedule(&self, id: &str) -> Result<()> {
        let raw = self
            .post(ENDPOINT_SUBSCRIPTION_CANCEL, &json!({ "Id": id }))
            .await?;
        parse_schedule(ENDPOINT_SUBSCRIPTION_CANCEL, raw)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn merge_id_overwrites_existing_id() {
        let merged = merge_id(json!({ "Id": "old", "amount": 10 }), "sc_new");
        assert_eq!(merged["Id"], "sc_new");
        assert_eq!(merged["amount"], 10);
    }

    #[test]
    fn merge_id_handles_non_object_payload() {
        let merged = merge_id(JsonValue::Null, "sc_1");
        assert_eq!(merged, json!({ "Id": "sc_1" }));
    }

    #[test]
    fn declined_envelope_surfaces_gateway_message() {
        let err = parse_charge(json!({ "Success": false, "Message": "Insufficient funds" }))
            .unwrap_err();
        match err {
            PaymentError::Gateway(message) => assert_eq!(message, "Insufficient funds"),
            other => panic!("expected gateway error, got {other:?}"),
        }
    }

    #[test]
    fn absent_success_flag_is_a_failure_with_empty_message() {
        let err = parse_charge(json!({ "Message": null })).unwrap_err();
        assert!(matches!(err, PaymentError::Gateway(ref message) if message.is_empty()));
    }

    #[test]
    fn unparseable_body_is_a_failure_with_empty_message() {
        // `post` turns a non-JSON body into Null before the verdict step
        let err = parse_charge(JsonValue::Null).unwrap_err();
        assert!(matches!(err, PaymentError::Gateway(ref message) if message.is_empty()));

        let err = parse_charge(json!("<html>Bad Gateway</html>")).unwrap_err();
        assert!(matches!(err, PaymentError::Gateway(ref message) if message.is_empty()));
    }

    #[test]
    fn accepted_envelope_keeps_raw_body() {
        let response = parse_charge(json!({
            "Success": true,
            "Model": { "AcsUrl": "https://acs.bank.example/3ds" }
        }))
        .unwrap();

        assert!(response.success);
        assert_eq!(
            response.model.unwrap().acs_url.as_deref(),
            Some("https://acs.bank.example/3ds")
        );
        assert_eq!(response.raw["Model"]["AcsUrl"], "https://acs.bank.example/3ds");
    }

    #[test]
    fn schedule_envelopes_apply_the_same_verdict() {
        let err = parse_schedule(
            ENDPOINT_SUBSCRIPTION_GET,
            json!({ "Success": false, "Message": "Not found" }),
        )
        .unwrap_err();
        assert!(matches!(err, PaymentError::Gateway(ref message) if message == "Not found"));

        let err = parse_schedule_list(JsonValue::Null).unwrap_err();
        assert!(matches!(err, PaymentError::Gateway(ref message) if message.is_empty()));

        let records = parse_schedule_list(json!({
            "Success": true,
            "Model": [{ "Id": "sc_221" }]
        }))
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn base_url_is_trimmed() {
        let config = CloudPaymentsConfig {
            url: "https://api.cloudpayments.ru/".into(),
            ..Default::default()
        };
        let protocol = CloudPaymentsProtocol::new(&config).unwrap();
        assert_eq!(protocol.url, "https://api.cloudpayments.ru");
    }
}
