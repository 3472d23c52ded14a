//! Domain layer: value objects, the vendor registry and the business-rule
//! policies the payment engine evaluates.

pub mod ledger;
pub mod payment;
pub mod ports;
pub mod schedule;
pub mod session;
pub mod token;
pub mod vendor;
