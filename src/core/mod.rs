pub mod orchestrator;
pub mod refresh;
pub mod retry;
pub mod scheduler;
pub mod timeseries;
