//! CloudPayments gateway driver.
//!
//! Maps the paymux contracts onto the CloudPayments HTTP JSON API: card and
//! tokenized charges, webhook field extraction, recurring-subscription
//! management. The driver never initiates more than one request per
//! operation and surfaces the gateway's own verdict unmodified.

pub mod config;
pub mod driver;
pub mod protocol;
pub mod wire;

pub use config::{CloudPaymentsConfig, DEFAULT_API_URL};
pub use driver::CloudPaymentsDriver;
pub use protocol::{CloudPaymentsApi, CloudPaymentsProtocol};
