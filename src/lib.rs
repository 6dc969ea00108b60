// ABOUTME: Root module for fanout - recursive fetch-execution engine.
// ABOUTME: Re-exports the node trait, executors, rate limiter, and sink.

pub mod engine;
pub mod error;
pub mod paged;
pub mod prelude;
pub mod sink;

pub use engine::{FetchNode, RateLimitOptions, execute_concurrent, execute_sequential};
pub use error::EngineError;
pub use sink::ResultSink;
