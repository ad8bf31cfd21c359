//! CloudPayments driver facade.
//!
//! Implements the paymux capability traits by translating generic payment
//! fields into CloudPayments request shapes and delegating the HTTP work to
//! a [`CloudPaymentsApi`] implementation. One driver instance serves one
//! logical request: it owns the last notification payload handed to
//! `set_response` and overwrites it on every call.

use async_trait::async_trait;
use paymux_core::{
    Ack, Charge, NotificationParser, PaymentError, RecurringPayments, Result, ScheduleManager,
};
use paymux_types::{
    ExtraParams, IntervalUnit, OptionKind, Payment, PayServiceOption, ResponseCode, Schedule,
    ScheduleBuilder,
};
use serde_json::Value as JsonValue;

use crate::config::CloudPaymentsConfig;
use crate::protocol::{CloudPaymentsApi, CloudPaymentsProtocol};
use crate::wire::{ChargeRequest, GatewayNotification, ScheduleModel, lookup};

/// CloudPayments implementation of the paymux contracts.
pub struct CloudPaymentsDriver<A = CloudPaymentsProtocol> {
    api: A,
    use_widget: bool,
    account_id: String,
    raw: JsonValue,
    notification: GatewayNotification,
}

impl CloudPaymentsDriver<CloudPaymentsProtocol> {
    /// Build a driver with the real HTTP adapter.
    pub fn from_config(config: &CloudPaymentsConfig) -> Result<Self> {
        Ok(Self::new(CloudPaymentsProtocol::new(config)?, config.use_widget))
    }
}

impl<A: CloudPaymentsApi> CloudPaymentsDriver<A> {
    pub const NAME: &'static str = "cloudpayments";

    pub fn new(api: A, use_widget: bool) -> Self {
        CloudPaymentsDriver {
            api,
            use_widget,
            account_id: String::new(),
            raw: JsonValue::Null,
            notification: GatewayNotification::default(),
        }
    }

    /// The gateway API collaborator; exposed for inspection in tests.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Configuration knobs this driver advertises to the embedding app.
    pub fn options() -> Vec<PayServiceOption> {
        vec![
            PayServiceOption::new(OptionKind::Bool, "use_widget", "Is widget"),
            PayServiceOption::new(OptionKind::String, "public_key", "Public id"),
            PayServiceOption::new(OptionKind::String, "secret_key", "Secret key"),
        ]
    }

    /// CloudPayments numeric acknowledgement codes for the generic outcome
    /// vocabulary.
    fn map_code(code: ResponseCode) -> i32 {
        match code {
            ResponseCode::Success => 0,
            ResponseCode::Error => 13,
            ResponseCode::WrongOrder => 10,
            ResponseCode::WrongPayment => 10,
            ResponseCode::WrongAmount => 12,
        }
    }

    fn charge_request(&self, payment: &Payment) -> ChargeRequest {
        let extra = &payment.extra;
        ChargeRequest {
            amount: payment.amount,
            currency: payment.currency.clone(),
            invoice_id: payment.order_id.clone(),
            description: (!payment.description.is_empty()).then(|| payment.description.clone()),
            email: extra.email.clone(),
            account_id: extra.account_id.clone(),
            name: extra.cardholder_name.clone(),
            card_cryptogram_packet: extra.card_cryptogram.clone(),
            ip_address: extra.ip.clone(),
            token: extra.token.clone(),
            json_data: sidecar(extra, &payment.payment_id),
        }
    }

    fn fill_schedule(model: ScheduleModel) -> Schedule {
        let mut builder = Schedule::builder()
            .id(model.id.unwrap_or_default())
            .account_id(model.account_id.unwrap_or_default())
            .description(model.description.unwrap_or_default())
            .email(model.email.unwrap_or_default())
            .amount(model.amount.unwrap_or_default())
            .currency(model.currency.unwrap_or_default())
            .require_confirmation(model.require_confirmation.unwrap_or_default())
            .start_date(model.start_date_iso.unwrap_or_default())
            .active(matches!(model.status.as_deref(), Some("Active")));

        if let Some(qty) = model.max_periods {
            builder = builder.max_periods(qty);
        }
        let unit = model
            .interval
            .as_deref()
            .and_then(|label| label.parse::<IntervalUnit>().ok());
        if let (Some(period), Some(unit)) = (model.period, unit) {
            builder = builder.period(period, unit);
        }

        builder.build()
    }

    fn store_response(&mut self, data: JsonValue) {
        self.notification = GatewayNotification::from_value(&data);
        self.raw = data;
    }
}

/// Pass-through sidecar: caller extras plus the internal payment id, echoed
/// back by the gateway in notifications.
fn sidecar(extra: &ExtraParams, payment_id: &str) -> JsonValue {
    let mut map = serde_json::Map::new();
    for (key, value) in &extra.other {
        map.insert(key.clone(), value.clone());
    }
    map.insert(
        "PaymentId".to_string(),
        JsonValue::String(payment_id.to_string()),
    );
    JsonValue::Object(map)
}

#[async_trait]
impl<A: CloudPaymentsApi> Charge for CloudPaymentsDriver<A> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn payment_link(&mut self, payment: &Payment) -> Result<String> {
        let extra = &payment.extra;

        // Widget mode: the charge happens client-side, nothing to call.
        if extra.token.is_none() && self.use_widget {
            return Ok(payment.success_url.clone());
        }

        if extra.token.is_none()
            && (extra.card_cryptogram.is_none() || extra.cardholder_name.is_none())
        {
            return Err(PaymentError::Validation(
                "either token or card_cryptogram with cardholder_name is required".to_string(),
            ));
        }

        let request = self.charge_request(payment);

        if extra.token.is_some() {
            let response = self.api.charge_token(request).await?;
            self.store_response(response.raw);
            return Ok(payment.success_url.clone());
        }

        let response = self.api.charge(request).await?;
        let link = response
            .model
            .as_ref()
            .and_then(|model| model.acs_url.clone())
            .unwrap_or_default();
        self.store_response(response.raw);

        Ok(link)
    }

    fn need_form(&self) -> bool {
        self.use_widget
    }
}

impl<A: CloudPaymentsApi> NotificationParser for CloudPaymentsDriver<A> {
    fn set_response(&mut self, data: JsonValue) -> &mut Self {
        self.store_response(data);
        self
    }

    fn order_id(&self) -> String {
        self.notification.invoice_id()
    }

    fn payment_id(&self) -> String {
        self.notification.payment_id()
    }

    fn status(&self) -> String {
        self.notification.status()
    }

    fn is_success(&self) -> bool {
        self.notification.success.unwrap_or(false)
    }

    fn transaction_id(&self) -> String {
        self.notification.transaction_id()
    }

    fn amount(&self) -> f64 {
        self.notification.amount()
    }

    fn error_code(&self) -> String {
        self.notification.message()
    }

    fn pan(&self) -> String {
        self.notification.pan()
    }

    fn date_time(&self) -> String {
        self.notification.created_date()
    }

    fn recurring_token(&self) -> String {
        self.notification.token()
    }

    fn response_param(&self, name: &str) -> JsonValue {
        lookup(&self.raw, name).cloned().unwrap_or(JsonValue::Null)
    }

    fn notification_response(&self, code: Option<ResponseCode>) -> Ack {
        Ack::new(Self::map_code(code.unwrap_or(ResponseCode::Success)))
    }

    fn check_response(&self, code: Option<ResponseCode>) -> Ack {
        self.notification_response(code)
    }
}

#[async_trait]
impl<A: CloudPaymentsApi> ScheduleManager for CloudPaymentsDriver<A> {
    fn new_schedule(&self) -> ScheduleBuilder {
        Schedule::builder()
    }

    async fn save_schedule(&self, schedule: &Schedule) -> Result<String> {
        if schedule.id().is_empty() {
            self.api.create_schedule(schedule.payload()).await
        } else {
            self.api
                .update_schedule(schedule.id(), schedule.payload())
                .await?;
            Ok(schedule.id().to_string())
        }
    }

    async fn remove_schedule(&self, id: &str) -> Result<()> {
        self.api.cancel_schedule(id).await
    }

    async fn get_schedule(&self, id: &str) -> Result<Schedule> {
        Ok(Self::fill_schedule(self.api.get_schedule(id).await?))
    }

    async fn schedules(&self, account_id: Option<&str>) -> Result<Vec<Schedule>> {
        let account_id = account_id.unwrap_or(self.account_id.as_str());
        let records = self.api.find_schedules(account_id).await?;

        Ok(records.into_iter().map(Self::fill_schedule).collect())
    }
}

#[async_trait]
impl<A: CloudPaymentsApi> RecurringPayments for CloudPaymentsDriver<A> {
    fn set_account(&mut self, account_id: &str) {
        self.account_id = account_id.to_string();
    }

    fn account(&self) -> &str {
        &self.account_id
    }

    async fn init_payment(
        &self,
        token: &str,
        order_id: &str,
        payment_id: &str,
        amount: f64,
        description: &str,
        currency: &str,
        extra: &ExtraParams,
    ) -> Result<()> {
        let request = ChargeRequest {
            amount,
            currency: currency.to_string(),
            invoice_id: order_id.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            email: extra.email.clone(),
            account_id: (!self.account_id.is_empty()).then(|| self.account_id.clone()),
            token: Some(token.to_string()),
            json_data: sidecar(extra, payment_id),
            ..Default::default()
        };

        self.api.charge_token(request).await?;

        Ok(())
    }
}
