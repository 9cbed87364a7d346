//! Data access, one repository per table family.
//!
//! Repositories borrow the shared pool, return typed rows and signal
//! failures through [`crate::error::AppError`]. Reads that enrich a row with
//! a related name do so with a SQL join.

pub mod admin_user;
pub mod anomaly;
pub mod client;
pub mod diagnostics;
pub mod module;
pub mod renewal;
pub mod signal;
pub mod sms;

pub use admin_user::AdminUserRepository;
pub use anomaly::AnomalyRepository;
pub use client::ClientRepository;
pub use diagnostics::DiagnosticsRepository;
pub use module::ModuleRepository;
pub use renewal::RenewalRepository;
pub use signal::SignalRepository;
pub use sms::SmsRepository;
