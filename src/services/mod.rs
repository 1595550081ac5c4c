pub mod chat;
pub mod deployments;
pub mod files;
pub mod fine_tuning;
