// ABOUTME: Defines the error type for the fanout engine using thiserror.
// ABOUTME: Node methods are infallible by contract; only task failures surface here.

/// Top-level error type for the fanout engine.
///
/// The `FetchNode` contract has no failure signal: domain-level fetch errors
/// are recorded by node implementations themselves (typically as error values
/// in their sink). The engine can therefore fail in exactly one way - a
/// spawned child task panicked or was aborted before joining.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("child task failed to join: {0}")]
    ChildTask(#[from] tokio::task::JoinError),
}
