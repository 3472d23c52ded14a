//! Application layer: the `PaymentEngine` rule logic and the report
//! snapshot it assembles. The engine owns the in-memory session state and
//! write-through-mirrors every mutation to the persistence adapter.

pub mod engine;
pub mod report;
