//! Client-side session and hiring-pipeline coordination for the applicant tracking portal.
//!
//! The crate turns a bearer credential into a typed [`session::Identity`], gates routes and
//! actions through the role capability matrix, and validates hiring-pipeline actions before
//! they reach the backend.

pub mod access;
pub mod api;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod portal;
pub mod session;
pub mod telemetry;

pub use portal::{Portal, PortalSettings};
