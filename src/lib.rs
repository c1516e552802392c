//! Backend of the Fakultas Humaniora, Hukum dan Pariwisata website.
//!
//! The HTTP API (`web`) serves the faculty profile, the selected study
//! programs, the organizational-structure image upload, visit statistics and
//! news. `dashboard` is the admin page's client-side logic, talking to that
//! API.

pub mod dashboard;
pub mod db;
pub mod server;
pub mod version;
pub mod web;
