pub mod collector;

pub use collector::{BackendResult, Collector, Completion};
