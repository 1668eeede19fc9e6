// src/core/mod.rs
//! Form controller, service client and configuration

pub mod config_manager;
pub mod controller;
pub mod service_client;

pub use config_manager::{ApiContract, BuildMode, ConfigManager, ServiceConfig};
pub use controller::{
    Notification, NotificationVariant, RequestState, SubmissionController, SubmissionError,
};
pub use service_client::ServiceClient;
