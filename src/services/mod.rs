//! Backend access: the dashboard REST API and its error model.

pub mod dashboard_client;
pub mod error;
pub mod market_data;

pub use dashboard_client::DashboardClient;
pub use error::ApiError;
pub use market_data::DashboardApi;
