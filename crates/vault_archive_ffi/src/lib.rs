//! Flutter-facing bindings for the vault archive core.

pub mod api;
