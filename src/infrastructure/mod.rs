//! Storage backends behind the domain ports: an in-memory store for tests,
//! the durable local slot store, the best-effort workbook CSV store and the
//! mirrored adapter combining the latter two.

pub mod in_memory;
pub mod local;
pub mod mirrored;
pub mod workbook;
