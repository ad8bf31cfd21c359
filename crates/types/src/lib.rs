use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub mod schedule;

pub use schedule::{Interval, IntervalUnit, ParseIntervalUnitError, Schedule, ScheduleBuilder};

/// Default values shared across drivers
pub mod defaults {
    /// Currency assumed when the caller does not specify one
    pub const CURRENCY: &str = "RUB";

    /// Plain card payment
    pub const PAYMENT_TYPE_CARD: &str = "card";
}

/// A single payment to be charged through a gateway driver.
///
/// This is an ephemeral value constructed per call; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    /// Merchant-side order identifier, echoed back by the gateway
    pub order_id: String,

    /// Internal payment identifier, carried through the gateway sidecar
    /// field and recovered from notifications
    pub payment_id: String,

    /// Amount in major units (e.g. 100.50)
    pub amount: f64,

    /// ISO currency code (e.g. "RUB", "USD")
    pub currency: String,

    /// Payment instrument kind (e.g. "card")
    pub payment_type: String,

    /// Where the payer lands after a successful payment
    pub success_url: String,

    /// Where the payer lands after a failed payment
    pub fail_url: String,

    /// Human-readable purchase description
    pub description: String,

    /// Driver-specific extra parameters
    pub extra: ExtraParams,
}

impl Default for Payment {
    fn default() -> Self {
        Payment {
            order_id: String::new(),
            payment_id: String::new(),
            amount: 0.0,
            currency: defaults::CURRENCY.to_string(),
            payment_type: defaults::PAYMENT_TYPE_CARD.to_string(),
            success_url: String::new(),
            fail_url: String::new(),
            description: String::new(),
            extra: ExtraParams::default(),
        }
    }
}

impl Payment {
    pub fn new(
        order_id: impl Into<String>,
        payment_id: impl Into<String>,
        amount: f64,
        currency: impl Into<String>,
    ) -> Self {
        Payment {
            order_id: order_id.into(),
            payment_id: payment_id.into(),
            amount,
            currency: currency.into(),
            ..Default::default()
        }
    }
}

/// Extra per-payment parameters a driver may need.
///
/// The well-known fields are typed; anything else goes into the open bag and
/// is passed through to the gateway untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraParams {
    /// Payer e-mail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Payer IP address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Merchant-side account/user identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    /// Cardholder name; required together with `card_cryptogram`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,

    /// Card cryptogram produced by the gateway's client-side SDK
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_cryptogram: Option<String>,

    /// Recurring-payment token obtained from a previous charge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Anything else, forwarded verbatim
    #[serde(flatten)]
    pub other: IndexMap<String, JsonValue>,
}

impl ExtraParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_cardholder_name(mut self, name: impl Into<String>) -> Self {
        self.cardholder_name = Some(name.into());
        self
    }

    pub fn with_card_cryptogram(mut self, cryptogram: impl Into<String>) -> Self {
        self.card_cryptogram = Some(cryptogram.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.other.insert(key.into(), value.into());
        self
    }
}

/// Generic outcome codes the embedding framework hands to a driver when
/// acknowledging a gateway notification. Each driver maps these onto its
/// gateway's own numeric vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCode {
    /// Notification processed, payment accepted
    Success,
    /// Generic processing error
    Error,
    /// Referenced order is unknown
    WrongOrder,
    /// Referenced payment is unknown
    WrongPayment,
    /// Notified amount does not match the order
    WrongAmount,
}

/// Kind of a driver configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Bool,
    String,
}

/// Describes one configuration knob a driver accepts, so an embedding
/// application can render a settings form without knowing the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayServiceOption {
    /// Machine name used as the configuration key
    pub alias: String,

    /// Human-readable label
    pub label: String,

    /// Value type
    pub kind: OptionKind,
}

impl PayServiceOption {
    pub fn new(kind: OptionKind, alias: impl Into<String>, label: impl Into<String>) -> Self {
        PayServiceOption {
            alias: alias.into(),
            label: label.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_params_open_bag_flattens() {
        let extra = ExtraParams::new()
            .with_email("payer@example.com")
            .with_param("basket_id", "b-42");

        let value = serde_json::to_value(&extra).unwrap();
        assert_eq!(value["email"], "payer@example.com");
        assert_eq!(value["basket_id"], "b-42");
        assert!(value.get("token").is_none());
    }

    #[test]
    fn payment_defaults_to_card_type() {
        let payment = Payment::new("order-1", "payment-1", 100.0, "USD");
        assert_eq!(payment.payment_type, defaults::PAYMENT_TYPE_CARD);
        assert_eq!(payment.amount, 100.0);
        assert_eq!(payment.currency, "USD");
        assert!(payment.extra.token.is_none());
    }

    #[test]
    fn payment_defaults_fill_currency_and_type() {
        assert_eq!(Payment::default().currency, defaults::CURRENCY);

        let payment: Payment =
            serde_json::from_str(r#"{"order_id": "o-1", "payment_id": "p-1", "amount": 1.0}"#)
                .unwrap();
        assert_eq!(payment.currency, defaults::CURRENCY);
        assert_eq!(payment.payment_type, defaults::PAYMENT_TYPE_CARD);
    }
}
