//! Flutter-facing bindings for SchoolBoard core.

pub mod api;
