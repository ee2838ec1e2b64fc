//! Web dashboard
//!
//! Serves the dashboard page and a small JSON API on 127.0.0.1:{port}.
//! Every request recomputes from the shared, read-only dataset.

mod handlers;
mod server;

pub use handlers::{DashboardResponse, OptionsResponse, SummaryView};
pub use server::{router, DashboardServer, ServerHandle};
