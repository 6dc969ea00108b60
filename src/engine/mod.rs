// ABOUTME: Engine module - tree expansion, fan-out/fan-in, and rate limiting.
// ABOUTME: Contains the FetchNode trait and both executors.

mod executor;
mod node;
mod rate_limiter;

pub use executor::{execute_concurrent, execute_sequential};
pub use node::FetchNode;
pub use rate_limiter::{RateLimitOptions, RateLimiter};
