pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod messages;
pub mod models;
pub mod page;

pub use client::BackendClient;
pub use config::{ControllerConfig, ResponseOrder};
pub use controller::{CancelToken, FormController};
pub use error::{ConfigError, SubmitError};
pub use messages::MessageId;
pub use models::*;
pub use page::{NoopRenderer, Notice, Page, Region, Renderer, Severity, Update};
