//! Team presence dashboard backend: login, team listing and self-service
//! status updates over a single `users` table.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod provision;
pub mod state;
pub mod team;
pub mod telemetry;
pub mod users;

#[cfg(test)]
mod test_support;
