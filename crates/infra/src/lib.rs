//! Infrastructure layer: repositories (in-memory + Postgres), application services, config.

pub mod config;
pub mod repository;
pub mod services;

#[cfg(test)]
mod integration_tests;
