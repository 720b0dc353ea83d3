pub mod access;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod report;
pub mod routes;
pub mod services;
pub mod stats;
pub mod types;

pub use access::{AccessGuard, CascadeGuard, OwnerChain, OwnershipResolver, Scope, ScopeResolver};
pub use error::{ApiError, RegistryError};
pub use routes::{app, AppState};
pub use services::RegistryService;
