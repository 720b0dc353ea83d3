pub mod health;
pub mod locations;
pub mod report;
pub mod stats;
