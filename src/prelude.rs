// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use fanout::prelude::*;` to get started quickly.

pub use crate::engine::{FetchNode, RateLimitOptions, execute_concurrent, execute_sequential};
pub use crate::error::EngineError;
pub use crate::paged::{FetchCallbacks, PageWalk};
pub use crate::sink::ResultSink;
