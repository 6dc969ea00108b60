// ABOUTME: Concurrent and sequential executors for the implicit fetch tree.
// ABOUTME: Fan-out one task per discovered child, fan-in before finalizing.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use super::node::FetchNode;
use super::rate_limiter::{RateLimitOptions, RateLimiter};
use crate::error::EngineError;

/// Execute the tree rooted at `root` concurrently.
///
/// Spawns one task per discovered child, gated on the rate limiter's
/// admission barrier before every spawn, and joins each node's children
/// before that node finalizes. The call returns after the root's
/// `collect_results` has returned and the limiter controller has shut down.
///
/// Ordering: a node's `collect_results` runs strictly after every
/// descendant's (post-order per branch). Sibling subtrees run concurrently
/// and may finish in any order.
///
/// Concurrency is unbounded: only the *rate* of new spawns is throttled,
/// never the total number of in-flight tasks. Callers who need a population
/// bound must impose it inside their nodes.
///
/// # Errors
///
/// Returns [`EngineError::ChildTask`] if any spawned child panicked or was
/// aborted. There is no partial recovery; the failing subtree's ancestors
/// skip their own finalization. Surviving siblings are still joined before
/// the error is returned, so no task outlives the call and the caller's sink
/// sees no writes after it returns.
pub async fn execute_concurrent(
    root: Box<dyn FetchNode>,
    options: Option<RateLimitOptions>,
) -> Result<(), EngineError> {
    let limiter = Arc::new(RateLimiter::start(options));

    debug!(limited = options.is_some(), "concurrent traversal starting");
    let result = run_concurrent(root, Arc::clone(&limiter)).await;
    limiter.shutdown().await;
    debug!("concurrent traversal finished");

    result
}

/// Recursive step: prepare, fan out one task per child, join, finalize.
///
/// Boxed because async recursion needs an indirected future type. The parent
/// holds its children's join handles directly, so joining them is the fan-in
/// barrier - no separate completion signal is needed.
fn run_concurrent(
    mut node: Box<dyn FetchNode>,
    limiter: Arc<RateLimiter>,
) -> BoxFuture<'static, Result<(), EngineError>> {
    Box::pin(async move {
        node.prepare().await;

        let mut children = Vec::new();
        while let Some(child) = node.next().await {
            limiter.admit().await;
            children.push(tokio::spawn(run_concurrent(child, Arc::clone(&limiter))));
        }

        // Join every child even after a failure: dropping a handle would
        // detach a still-running subtree, which could then outlive the
        // traversal and write to the caller's sink after we return.
        let mut first_error = None;
        for handle in children {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => Err(EngineError::ChildTask(join_error)),
            };
            if let Err(error) = outcome {
                first_error.get_or_insert(error);
            }
        }
        if let Some(error) = first_error {
            return Err(error);
        }

        node.collect_results().await;
        Ok(())
    })
}

/// Execute the tree rooted at `root` depth-first on the current task.
///
/// Reference traversal with the identical node contract: no spawning, no
/// rate limiting, strict depth-first post-order. Produces the same multiset
/// of sink values as [`execute_concurrent`] for side-effect-free nodes.
pub async fn execute_sequential(root: Box<dyn FetchNode>) {
    run_sequential(root).await;
}

fn run_sequential(mut node: Box<dyn FetchNode>) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        node.prepare().await;
        while let Some(child) = node.next().await {
            run_sequential(child).await;
        }
        node.collect_results().await;
    })
}
