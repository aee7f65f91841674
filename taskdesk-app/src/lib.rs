//! Client for the taskdesk project-management API.
//!
//! Data flows one way: an [`api_client::ApiClient`] accessor fetches, a
//! [`render`] function turns the result into calls on a
//! [`surface::DisplaySurface`], and the [`controller::Controller`] wires user
//! [`state::Action`]s to those pairs.

pub mod api_client;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod render;
pub mod state;
pub mod surface;

pub use api_client::ApiClient;
pub use controller::Controller;
pub use error::{ActionError, ApiError, AppError, ValidationError};
pub use state::{Action, Field, FormState};
