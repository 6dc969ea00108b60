// ABOUTME: Defines the FetchNode trait - the capability a tree element must provide.
// ABOUTME: Nodes prepare their own work, discover children lazily, and finalize last.

use async_trait::async_trait;

/// A node in the implicit fetch tree.
///
/// The tree is never materialized: it exists only as the call graph of the
/// executor. Each running executor task owns exactly one node, and a child
/// returned by [`next`](FetchNode::next) is moved into the task that will
/// execute it. That ownership discipline is what makes `&mut self` safe here
/// without any locking.
///
/// # Contract
///
/// - `prepare` always completes before `next` is first called.
/// - `next` is a forward-only, pull-based generator: each call advances the
///   node's internal position. It is not restartable.
/// - `collect_results` is called exactly once, after every child produced by
///   `next` has fully completed (including the child's own
///   `collect_results`).
///
/// None of the methods can fail. Domain-level fetch errors must be recorded
/// by the implementation itself, e.g. pushed into a shared sink as an error
/// value. The engine provides no propagation path and no retries.
#[async_trait]
pub trait FetchNode: Send + 'static {
    /// Perform this node's own unit of work.
    async fn prepare(&mut self);

    /// Produce the next not-yet-visited child, or `None` once exhausted.
    async fn next(&mut self) -> Option<Box<dyn FetchNode>>;

    /// Finalize and aggregate after all children have finished.
    async fn collect_results(&mut self);
}
