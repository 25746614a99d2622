use core::fmt;
use core::future::Future;
use core::hash::Hash;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use pin_project::pin_project;

use crate::error::Error;
use crate::lookup::Lookup;

/// Correlates the realized sequence with a realized inner sequence on
/// matching keys, one result per matching pair.
///
/// This `struct` is created by the [`join_on`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`join_on`]: crate::query::QueryExt::join_on
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct JoinOn<F, D, OK, IK, R> {
    #[pin]
    source: F,
    args: Option<(D, OK, IK, R)>,
}

impl<F, D, OK, IK, R> JoinOn<F, D, OK, IK, R> {
    pub(crate) fn new(source: F, inner: D, outer_key: OK, inner_key: IK, result: R) -> Self {
        Self {
            source,
            args: Some((inner, outer_key, inner_key, result)),
        }
    }
}

impl<F: fmt::Debug, D, OK, IK, R> fmt::Debug for JoinOn<F, D, OK, IK, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinOn")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, D, K, OK, IK, R, Out> Future for JoinOn<F, D, OK, IK, R>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    D: IntoIterator,
    K: Eq + Hash + Clone,
    OK: FnMut(&C::Item) -> K,
    IK: FnMut(&D::Item) -> K,
    R: FnMut(&C::Item, &D::Item) -> Out,
{
    type Output = Result<Vec<Out>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let (inner, mut outer_key, inner_key, mut result) =
            this.args.take().expect("future polled after completing");
        let lookup = Lookup::from_values(inner, inner_key);
        let mut out = Vec::new();
        for outer in sequence {
            let key = outer_key(&outer);
            for matched in lookup.get(&key) {
                out.push(result(&outer, matched));
            }
        }
        Poll::Ready(Ok(out))
    }
}

/// Correlates the realized sequence with a realized inner sequence on
/// matching keys, one result per outer element.
///
/// Outer elements without matches still produce a result, paired with an
/// empty group.
///
/// This `struct` is created by the [`group_join`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`group_join`]: crate::query::QueryExt::group_join
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct GroupJoin<F, D, OK, IK, R> {
    #[pin]
    source: F,
    args: Option<(D, OK, IK, R)>,
}

impl<F, D, OK, IK, R> GroupJoin<F, D, OK, IK, R> {
    pub(crate) fn new(source: F, inner: D, outer_key: OK, inner_key: IK, result: R) -> Self {
        Self {
            source,
            args: Some((inner, outer_key, inner_key, result)),
        }
    }
}

impl<F: fmt::Debug, D, OK, IK, R> fmt::Debug for GroupJoin<F, D, OK, IK, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupJoin")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, D, K, OK, IK, R, Out> Future for GroupJoin<F, D, OK, IK, R>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    D: IntoIterator,
    K: Eq + Hash + Clone,
    OK: FnMut(&C::Item) -> K,
    IK: FnMut(&D::Item) -> K,
    R: FnMut(C::Item, &[D::Item]) -> Out,
{
    type Output = Result<Vec<Out>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let (inner, mut outer_key, inner_key, mut result) =
            this.args.take().expect("future polled after completing");
        let lookup = Lookup::from_values(inner, inner_key);
        let mut out = Vec::new();
        for outer in sequence {
            let key = outer_key(&outer);
            out.push(result(outer, lookup.get(&key)));
        }
        Poll::Ready(Ok(out))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::source::deferred;

    use futures_lite::future::block_on;

    #[test]
    fn join_on_yields_one_result_per_matching_pair() {
        block_on(async {
            let orders = vec![(1, "apples"), (2, "pears"), (1, "plums")];
            let out = deferred(vec![(1, "alice"), (2, "bob"), (3, "carol")])
                .join_on(
                    orders,
                    |customer| customer.0,
                    |order| order.0,
                    |customer, order| (customer.1, order.1),
                )
                .await
                .unwrap();
            assert_eq!(
                out,
                vec![("alice", "apples"), ("alice", "plums"), ("bob", "pears")]
            );
        });
    }

    #[test]
    fn group_join_keeps_unmatched_outer_elements() {
        block_on(async {
            let orders = vec![(1, "apples"), (1, "plums")];
            let out = deferred(vec![(1, "alice"), (2, "bob")])
                .group_join(
                    orders,
                    |customer| customer.0,
                    |order| order.0,
                    |customer, orders| (customer.1, orders.len()),
                )
                .await
                .unwrap();
            assert_eq!(out, vec![("alice", 2), ("bob", 0)]);
        });
    }
}
