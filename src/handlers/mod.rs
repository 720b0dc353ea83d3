//! HTTP handlers. Everything under `/api` receives a resolved `Scope` from
//! `middleware::scope_middleware`.

pub mod entities;
pub mod health;
pub mod reports;
pub mod residents;
pub mod statistics;
