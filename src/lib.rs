//! Delivery-performance analytics: load a delivery export once, filter it,
//! and derive OTD, delay, cost and route aggregates plus rule-based insights.

pub mod aggregate;
pub mod analysis;
pub mod cli;
pub mod constants;
pub mod error;
pub mod filter;
pub mod hubs;
pub mod insights;
pub mod loader;
pub mod output;
pub mod reports;
pub mod severity;
pub mod types;
pub mod util;
pub mod validator;

pub use analysis::Analysis;
pub use error::{ReportError, Result};
pub use filter::{FilterSpec, FilteredView};
pub use loader::{load_and_clean, Dataset, LoadReport};
