//! Geo5Lux fleet admin API - REST backend over clients, tracking modules and
//! their telemetry
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
