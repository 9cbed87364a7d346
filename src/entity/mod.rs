pub mod admin_sessions;
pub mod admin_users;
pub mod anomalies;
pub mod clients;
pub mod diagnostics;
pub mod modules;
pub mod renewals;
pub mod signals;
pub mod sms_history;
