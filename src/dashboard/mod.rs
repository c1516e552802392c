//! Client-side orchestration of the admin dashboard.
//!
//! [`DashboardController`] drives the HTTP API through the [`AdminApi`] trait
//! and keeps every piece of page state in a [`DashboardState`], which only
//! changes through [`DashboardState::apply`].

use thiserror::Error;

pub mod catalog;
pub mod client;
pub mod controller;
pub mod state;

pub use catalog::{ProgramDirectory, ProgramReference};
pub use client::{AdminApi, HttpAdminApi};
pub use controller::{DashboardController, LoadReport};
pub use state::{DashboardEvent, DashboardState, Notice, resolve_profile};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Unknown program id: {0}")]
    UnknownProgram(u32),
    #[error("Invalid program reference list: {0}")]
    Catalog(String),
}
