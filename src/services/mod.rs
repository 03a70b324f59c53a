pub mod analytics;
pub use analytics::AnalyticsStore;

pub mod analytics_impl;
pub use analytics_impl::HostedAnalyticsStore;

pub mod orchestrator;
pub use orchestrator::{SearchOrchestrator, SearchState};
