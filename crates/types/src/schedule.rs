//! Recurring-payment schedules.
//!
//! A [`Schedule`] describes a recurring charge tracked by the gateway:
//! interval, amount, account. Instances are assembled locally through
//! [`ScheduleBuilder`], sent to the gateway, and re-hydrated from gateway
//! records for read operations. The `id` and `active` fields are assigned
//! by the gateway and stay empty/false until then.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Unit of a recurring-payment interval, in the gateway's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self {
            IntervalUnit::Day => "Day",
            IntervalUnit::Week => "Week",
            IntervalUnit::Month => "Month",
        };
        f.write_str(unit)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown interval unit: {0}")]
pub struct ParseIntervalUnitError(String);

impl FromStr for IntervalUnit {
    type Err = ParseIntervalUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Day" => Ok(IntervalUnit::Day),
            "Week" => Ok(IntervalUnit::Week),
            "Month" => Ok(IntervalUnit::Month),
            other => Err(ParseIntervalUnitError(other.to_string())),
        }
    }
}

/// How often a schedule charges: every `period` `unit`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub period: u32,
    pub unit: IntervalUnit,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.period, self.unit)
    }
}

/// A recurring-charge configuration.
///
/// Getters are total: unset fields read as empty string / zero / false.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    id: String,
    token: String,
    account_id: String,
    description: String,
    email: String,
    amount: f64,
    currency: String,
    require_confirmation: bool,
    start_date: String,
    interval: Option<Interval>,
    max_periods: Option<u32>,
    active: bool,
}

impl Schedule {
    pub fn builder() -> ScheduleBuilder {
        ScheduleBuilder::default()
    }

    /// Gateway-assigned schedule id; empty until the schedule was created.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn require_confirmation(&self) -> bool {
        self.require_confirmation
    }

    /// ISO date of the first charge.
    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    /// Formatted interval, e.g. "1 Day" or "12 Month"; empty when unset.
    pub fn interval(&self) -> String {
        self.interval.map(|i| i.to_string()).unwrap_or_default()
    }

    /// Interval period count; zero when unset.
    pub fn period(&self) -> u32 {
        self.interval.map(|i| i.period).unwrap_or_default()
    }

    /// Cap on the number of charges, when the gateway reports one.
    pub fn max_periods(&self) -> Option<u32> {
        self.max_periods
    }

    /// Whether the gateway currently runs this schedule.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Serialize to the normalized key set drivers send to the gateway.
    pub fn payload(&self) -> JsonValue {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload<'a> {
            token: &'a str,
            account_id: &'a str,
            description: &'a str,
            email: &'a str,
            amount: f64,
            currency: &'a str,
            require_confirmation: bool,
            start_date: &'a str,
            interval: String,
            period: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            max_periods: Option<u32>,
        }

        // Payload is a closed struct of plain scalars; serialization cannot fail.
        serde_json::to_value(Payload {
            token: &self.token,
            account_id: &self.account_id,
            description: &self.description,
            email: &self.email,
            amount: self.amount,
            currency: &self.currency,
            require_confirmation: self.require_confirmation,
            start_date: &self.start_date,
            interval: self.interval(),
            period: self.period(),
            max_periods: self.max_periods,
        })
        .unwrap_or(JsonValue::Null)
    }
}

/// Builder for [`Schedule`]. Methods consume and return the builder, so a
/// schedule is assembled in one expression and frozen by `build()`.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    schedule: Schedule,
}

impl ScheduleBuilder {
    /// Gateway-assigned id; set only when re-hydrating a gateway record.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.schedule.id = id.into();
        self
    }

    /// Payment token the recurring charges run against.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.schedule.token = token.into();
        self
    }

    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.schedule.account_id = account_id.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.schedule.description = description.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.schedule.email = email.into();
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.schedule.amount = amount;
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.schedule.currency = currency.into();
        self
    }

    pub fn require_confirmation(mut self, flag: bool) -> Self {
        self.schedule.require_confirmation = flag;
        self
    }

    /// ISO date of the first charge.
    pub fn start_date(mut self, start_date: impl Into<String>) -> Self {
        self.schedule.start_date = start_date.into();
        self
    }

    pub fn max_periods(mut self, qty: u32) -> Self {
        self.schedule.max_periods = Some(qty);
        self
    }

    /// Gateway-reported active flag; set only when re-hydrating.
    pub fn active(mut self, flag: bool) -> Self {
        self.schedule.active = flag;
        self
    }

    /// Charge every `period` `unit`s. Single source of truth for the
    /// interval; the convenience methods below all resolve to it.
    pub fn period(mut self, period: u32, unit: IntervalUnit) -> Self {
        self.schedule.interval = Some(Interval { period, unit });
        self
    }

    /// Charge once a day.
    pub fn daily(self) -> Self {
        self.period(1, IntervalUnit::Day)
    }

    /// Charge once a week.
    pub fn weekly(self) -> Self {
        self.period(1, IntervalUnit::Week)
    }

    /// Charge once a month.
    pub fn monthly(self) -> Self {
        self.period(1, IntervalUnit::Month)
    }

    /// Charge once a year.
    pub fn yearly(self) -> Self {
        self.period(12, IntervalUnit::Month)
    }

    /// Charge every `days` days.
    pub fn every(self, days: u32) -> Self {
        self.period(days, IntervalUnit::Day)
    }

    pub fn build(self) -> Schedule {
        self.schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_conveniences() {
        assert_eq!(Schedule::builder().daily().build().interval(), "1 Day");
        assert_eq!(Schedule::builder().weekly().build().interval(), "1 Week");
        assert_eq!(Schedule::builder().monthly().build().interval(), "1 Month");
        assert_eq!(Schedule::builder().yearly().build().interval(), "12 Month");
        assert_eq!(Schedule::builder().every(5).build().interval(), "5 Day");
    }

    #[test]
    fn getters_default_when_unset() {
        let schedule = Schedule::default();
        assert_eq!(schedule.id(), "");
        assert_eq!(schedule.amount(), 0.0);
        assert_eq!(schedule.interval(), "");
        assert_eq!(schedule.period(), 0);
        assert!(!schedule.require_confirmation());
        assert!(!schedule.is_active());
        assert_eq!(schedule.max_periods(), None);
    }

    #[test]
    fn payload_uses_documented_keys() {
        let schedule = Schedule::builder()
            .token("tk_477")
            .account_id("user-1")
            .description("Monthly box")
            .email("payer@example.com")
            .amount(1499.0)
            .currency("RUB")
            .require_confirmation(true)
            .start_date("2026-09-01T00:00:00")
            .monthly()
            .build();

        let payload = schedule.payload();
        assert_eq!(payload["token"], "tk_477");
        assert_eq!(payload["accountId"], "user-1");
        assert_eq!(payload["description"], "Monthly box");
        assert_eq!(payload["email"], "payer@example.com");
        assert_eq!(payload["amount"], 1499.0);
        assert_eq!(payload["currency"], "RUB");
        assert_eq!(payload["requireConfirmation"], true);
        assert_eq!(payload["startDate"], "2026-09-01T00:00:00");
        assert_eq!(payload["interval"], "1 Month");
        assert_eq!(payload["period"], 1);
        assert!(payload.get("maxPeriods").is_none());
    }

    #[test]
    fn payload_includes_max_periods_when_set() {
        let payload = Schedule::builder().daily().max_periods(12).build().payload();
        assert_eq!(payload["maxPeriods"], 12);
    }

    #[test]
    fn interval_unit_parses_gateway_labels() {
        assert_eq!("Day".parse::<IntervalUnit>().unwrap(), IntervalUnit::Day);
        assert_eq!("Week".parse::<IntervalUnit>().unwrap(), IntervalUnit::Week);
        assert_eq!("Month".parse::<IntervalUnit>().unwrap(), IntervalUnit::Month);
        assert!("Fortnight".parse::<IntervalUnit>().is_err());
    }
}
