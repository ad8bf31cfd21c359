//! Capability traits a gateway driver implements.
//!
//! A driver is one concrete type implementing the subset of capabilities its
//! gateway supports; callers compose over these traits instead of a single
//! wide interface. A driver instance holds the last notification payload it
//! was handed and is therefore scoped to one logical request; it is not
//! meant to be shared across overlapping requests.

use async_trait::async_trait;
use paymux_types::{ExtraParams, Payment, ResponseCode, Schedule, ScheduleBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Content type of the webhook acknowledgement body.
pub const ACK_CONTENT_TYPE: &str = "application/json";

/// Webhook acknowledgement.
///
/// Gateways key their redelivery logic off the numeric code in the body,
/// not the HTTP status; the embedding framework must answer HTTP 200 with
/// [`Ack::body`] and [`ACK_CONTENT_TYPE`] regardless of the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub code: i32,
}

impl Ack {
    pub fn new(code: i32) -> Self {
        Ack { code }
    }

    /// Serialized acknowledgement body, `{"code": <n>}`.
    pub fn body(&self) -> String {
        serde_json::json!({ "code": self.code }).to_string()
    }
}

/// Charging capability: turn a [`Payment`] into a redirect URL.
#[async_trait]
pub trait Charge {
    /// Name the driver registers under.
    fn name(&self) -> &'static str;

    /// Resolve the payment into a redirect URL.
    ///
    /// Returns an empty string when no redirect is needed (the gateway
    /// accepted the charge without 3-D Secure). Stores the gateway response
    /// on the driver for subsequent field extraction.
    async fn payment_link(&mut self, payment: &Payment) -> Result<String>;

    /// True when the caller must render a client-side payment form instead
    /// of redirecting.
    fn need_form(&self) -> bool;
}

/// Notification parsing capability: hold one gateway callback payload and
/// read normalized fields out of it.
///
/// Extractors are total: a missing or malformed field reads as an empty
/// string / zero / false, never a panic.
pub trait NotificationParser {
    /// Store a webhook/callback payload, replacing any previous one.
    fn set_response(&mut self, data: JsonValue) -> &mut Self;

    /// Merchant order id.
    fn order_id(&self) -> String;

    /// Internal payment id recovered from the pass-through sidecar.
    fn payment_id(&self) -> String;

    /// Gateway payment status.
    fn status(&self) -> String;

    /// Whether the gateway reports the payment as succeeded. Reads false
    /// when the flag is absent.
    fn is_success(&self) -> bool;

    /// Gateway transaction id.
    fn transaction_id(&self) -> String;

    /// Payment amount.
    fn amount(&self) -> f64;

    /// Gateway error/reason text.
    fn error_code(&self) -> String;

    /// Masked card number, first six + `"******"` + last four.
    fn pan(&self) -> String;

    /// Payment timestamp as reported by the gateway.
    fn date_time(&self) -> String;

    /// Token to charge future recurring payments with.
    fn recurring_token(&self) -> String;

    /// Raw response field by dotted path (e.g. `"Model.Status"`); Null when
    /// absent.
    fn response_param(&self, name: &str) -> JsonValue;

    /// Acknowledgement for a payment notification. `None` acknowledges
    /// success.
    fn notification_response(&self, code: Option<ResponseCode>) -> Ack;

    /// Acknowledgement for a pre-payment check request.
    fn check_response(&self, code: Option<ResponseCode>) -> Ack;
}

/// Recurring-schedule management capability.
#[async_trait]
pub trait ScheduleManager {
    /// Start building a schedule for this gateway.
    fn new_schedule(&self) -> ScheduleBuilder;

    /// Create the schedule when it has no id yet, update it otherwise.
    /// Returns the gateway-assigned schedule id.
    async fn save_schedule(&self, schedule: &Schedule) -> Result<String>;

    /// Cancel a schedule.
    async fn remove_schedule(&self, id: &str) -> Result<()>;

    /// Fetch one schedule.
    async fn get_schedule(&self, id: &str) -> Result<Schedule>;

    /// List schedules, optionally scoped to one account.
    async fn schedules(&self, account_id: Option<&str>) -> Result<Vec<Schedule>>;
}

/// Token-based recurring charging capability.
#[async_trait]
pub trait RecurringPayments {
    /// Account the recurring payments are charged for.
    fn set_account(&mut self, account_id: &str);

    fn account(&self) -> &str;

    /// Charge a previously obtained token. Gateway refusal surfaces as an
    /// error; `Ok(())` means the gateway accepted the charge request.
    #[allow(clippy::too_many_arguments)]
    async fn init_payment(
        &self,
        token: &str,
        order_id: &str,
        payment_id: &str,
        amount: f64,
        description: &str,
        currency: &str,
        extra: &ExtraParams,
    ) -> Result<()>;
}
