//! Risk-assessment dashboard core.
//!
//! Pure producers (`clock`, `risk`, `timeline`, `navigator`, `dashboard`),
//! the session and orchestration layer (`session`, `assessment`, `report`),
//! and the adapters that render them (`cli`, `web`).

pub mod analytics;
pub mod assessment;
pub mod cli;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod navigator;
pub mod report;
pub mod risk;
pub mod session;
pub mod timeline;
pub mod web;
