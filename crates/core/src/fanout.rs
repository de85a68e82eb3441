//! Named fan-out combinators.
//!
//! Two distinct policies are used across the codebase and they must not
//! be mixed up: indexer queries tolerate partial failure (`settle_all`),
//! while debrid unrestrict calls fail as a unit (`all_or_first_error`).

use futures::future::{join_all, try_join_all};
use std::future::Future;

/// Run all futures to completion and split the outcomes. No future is
/// cancelled because a sibling failed.
pub async fn settle_all<T, E, F>(futures: Vec<F>) -> (Vec<T>, Vec<E>)
where
    F: Future<Output = Result<T, E>>,
{
    let mut oks = Vec::new();
    let mut errs = Vec::new();
    for outcome in join_all(futures).await {
        match outcome {
            Ok(v) => oks.push(v),
            Err(e) => errs.push(e),
        }
    }
    (oks, errs)
}

/// Run all futures, failing the whole batch on the first error.
pub async fn all_or_first_error<T, E, F>(futures: Vec<F>) -> Result<Vec<T>, E>
where
    F: Future<Output = Result<T, E>>,
{
    try_join_all(futures).await
}
