//! CloudPayments wire formats.
//!
//! Request bodies are closed structs serialized PascalCase, the way the
//! gateway expects them. Response structs deserialize leniently: the gateway
//! answers HTTP 200 for business failures and webhook payloads come in two
//! shapes (fields nested under `Model` for API responses, flat for
//! callbacks), so every field is optional and every reader is total.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Body POSTed to the card/token charge endpoint.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChargeRequest {
    pub amount: f64,
    pub currency: String,
    /// Merchant order id, echoed back in notifications
    pub invoice_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Cardholder name; card flow only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Cryptogram from the client-side SDK; card flow only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_cryptogram_packet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Saved-card token; recurring flow only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Pass-through sidecar echoed in notifications; carries the internal
    /// payment id and caller extras
    #[serde(skip_serializing_if = "JsonValue::is_null")]
    pub json_data: JsonValue,
}

/// Transaction details nested under `Model` in charge responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TransactionModel {
    pub transaction_id: Option<i64>,
    pub invoice_id: Option<JsonValue>,
    /// 3-D Secure redirect URL, present when the issuer requires it
    pub acs_url: Option<String>,
    pub status: Option<String>,
    pub token: Option<String>,
    pub message: Option<String>,
}

/// Response of the charge endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ChargeResponse {
    pub success: bool,
    pub message: Option<String>,
    pub model: Option<TransactionModel>,
    /// Untouched response body, kept so the driver can store it for
    /// notification-style field extraction
    #[serde(skip)]
    pub raw: JsonValue,
}

/// One subscription record as the gateway reports it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScheduleModel {
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub require_confirmation: Option<bool>,
    pub start_date_iso: Option<String>,
    /// Interval unit label, "Day" / "Week" / "Month"
    pub interval: Option<String>,
    pub period: Option<u32>,
    pub max_periods: Option<u32>,
    /// "Active", "Cancelled", ...
    pub status: Option<String>,
}

/// Envelope of the single-subscription endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScheduleResponse {
    pub success: bool,
    pub message: Option<String>,
    pub model: Option<ScheduleModel>,
}

/// Envelope of the subscription-list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScheduleListResponse {
    pub success: bool,
    pub message: Option<String>,
    pub model: Vec<ScheduleModel>,
}

/// Fields a notification payload may carry, at either nesting level.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NotificationFields {
    pub invoice_id: Option<JsonValue>,
    pub status: Option<String>,
    pub transaction_id: Option<JsonValue>,
    pub amount: Option<JsonValue>,
    pub message: Option<String>,
    pub card_first_six: Option<String>,
    pub card_last_four: Option<String>,
    pub created_date_iso: Option<String>,
    pub token: Option<String>,
    /// Sidecar under `Model` in API responses
    pub json_data: Option<JsonValue>,
    /// Sidecar at top level in webhook callbacks
    pub data: Option<JsonValue>,
}

/// Lenient view of a webhook/callback payload or a stored charge response.
///
/// API responses nest transaction fields under `Model`; webhook callbacks
/// send them flat. Readers check the nested field first and fall back to
/// the flat one, defaulting when both are absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewayNotification {
    #[serde(rename = "Success")]
    pub success: Option<bool>,
    #[serde(rename = "Model")]
    pub model: NotificationFields,
    #[serde(flatten)]
    pub flat: NotificationFields,
}

impl GatewayNotification {
    /// Parse a payload; anything that is not a JSON object reads as empty.
    pub fn from_value(value: &JsonValue) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    pub fn invoice_id(&self) -> String {
        text(self.model.invoice_id.as_ref().or(self.flat.invoice_id.as_ref()))
    }

    pub fn status(&self) -> String {
        self.model
            .status
            .clone()
            .or_else(|| self.flat.status.clone())
            .unwrap_or_default()
    }

    pub fn transaction_id(&self) -> String {
        text(
            self.model
                .transaction_id
                .as_ref()
                .or(self.flat.transaction_id.as_ref()),
        )
    }

    pub fn amount(&self) -> f64 {
        number(self.model.amount.as_ref().or(self.flat.amount.as_ref()))
    }

    /// Gateway reason text; only ever present under `Model`.
    pub fn message(&self) -> String {
        self.model.message.clone().unwrap_or_default()
    }

    /// Masked card number, `<first six>******<last four>`.
    pub fn pan(&self) -> String {
        let first_six = self
            .model
            .card_first_six
            .as_deref()
            .or(self.flat.card_first_six.as_deref())
            .unwrap_or_default();
        let last_four = self
            .model
            .card_last_four
            .as_deref()
            .or(self.flat.card_last_four.as_deref())
            .unwrap_or_default();
        format!("{first_six}******{last_four}")
    }

    pub fn created_date(&self) -> String {
        self.model
            .created_date_iso
            .clone()
            .or_else(|| self.flat.created_date_iso.clone())
            .unwrap_or_default()
    }

    /// Recurring-payment token. Webhooks carry it flat, so the flat field
    /// wins here.
    pub fn token(&self) -> String {
        self.flat
            .token
            .clone()
            .or_else(|| self.model.token.clone())
            .unwrap_or_default()
    }

    /// Internal payment id from the pass-through sidecar. The sidecar is
    /// `Model.JsonData` in API responses and `Data` in callbacks, and may
    /// arrive either as an object or as a JSON-encoded string.
    pub fn payment_id(&self) -> String {
        let sidecar = self.model.json_data.as_ref().or(self.flat.data.as_ref());
        let Some(sidecar) = sidecar else {
            return String::new();
        };
        let parsed;
        let sidecar = match sidecar {
            JsonValue::String(s) => {
                parsed = serde_json::from_str(s).unwrap_or(JsonValue::Null);
                &parsed
            }
            other => other,
        };
        text(sidecar.get("PaymentId"))
    }
}

/// Resolve a dotted path (e.g. `"Model.Status"`) inside a JSON value.
pub fn lookup<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.').try_fold(value, |acc, key| acc.get(key))
}

/// Render a scalar as text; non-scalars read as empty.
fn text(value: Option<&JsonValue>) -> String {
    match value {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Coerce a numeric-ish value; anything else reads as zero.
fn number(value: Option<&JsonValue>) -> f64 {
    match value {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(JsonValue::String(s)) => s.parse().unwrap_or_default(),
        _ => 0.0,
    }
}
