//! Feature modules. Each has a `model`, a `service` working on the
//! [`Ledger`](crate::ledger::Ledger), a `controller` of axum handlers and a
//! `router`.

pub mod admins;
pub mod analytics;
pub mod auth;
pub mod cards;
pub mod deposits;
pub mod loans;
pub mod transactions;
pub mod users;
