//! Generic payment-service contracts.
//!
//! Gateway drivers implement the capability traits in [`service`] and speak
//! the shared error vocabulary in [`error`]; the embedding application only
//! ever sees these contracts, never gateway wire formats.

pub mod error;
pub mod service;

pub use error::{PaymentError, Result};
pub use service::{
    ACK_CONTENT_TYPE, Ack, Charge, NotificationParser, RecurringPayments, ScheduleManager,
};
