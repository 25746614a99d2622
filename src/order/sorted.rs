use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use pin_project::pin_project;

use super::{Compare, Ordered};
use crate::error::Error;

/// Sorts the realized sequence, producing an [`Ordered`] continuation.
///
/// This `struct` is created by the [`sorted`], [`sorted_desc`], [`sorted_by`],
/// [`sorted_by_key`], and [`sorted_by_key_desc`] methods on the [`QueryExt`]
/// trait. See their documentation for more.
///
/// [`sorted`]: crate::query::QueryExt::sorted
/// [`sorted_desc`]: crate::query::QueryExt::sorted_desc
/// [`sorted_by`]: crate::query::QueryExt::sorted_by
/// [`sorted_by_key`]: crate::query::QueryExt::sorted_by_key
/// [`sorted_by_key_desc`]: crate::query::QueryExt::sorted_by_key_desc
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Sorted<F, T> {
    #[pin]
    source: F,
    compare: Option<Compare<T>>,
}

impl<F, T> Sorted<F, T> {
    pub(crate) fn new(source: F, compare: Compare<T>) -> Self {
        Self {
            source,
            compare: Some(compare),
        }
    }
}

impl<F: fmt::Debug, T> fmt::Debug for Sorted<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sorted")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, T> Future for Sorted<F, T>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator<Item = T>,
{
    type Output = Result<Ordered<T>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let compare = this.compare.take().expect("future polled after completing");
        Poll::Ready(Ok(Ordered::new(sequence.into_iter().collect(), compare)))
    }
}

/// Refines an [`Ordered`] continuation with a tie-breaking sort key.
///
/// This `struct` is created by the [`then_by`] and [`then_by_desc`] methods
/// on the [`OrderedExt`] trait. See their documentation for more.
///
/// [`then_by`]: crate::order::OrderedExt::then_by
/// [`then_by_desc`]: crate::order::OrderedExt::then_by_desc
/// [`OrderedExt`]: crate::order::OrderedExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ThenBy<F, T> {
    #[pin]
    source: F,
    compare: Option<Compare<T>>,
}

impl<F, T> ThenBy<F, T> {
    pub(crate) fn new(source: F, compare: Compare<T>) -> Self {
        Self {
            source,
            compare: Some(compare),
        }
    }
}

impl<F: fmt::Debug, T> fmt::Debug for ThenBy<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThenBy")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, T> Future for ThenBy<F, T>
where
    F: Future<Output = Result<Ordered<T>, Error>>,
    T: 'static,
{
    type Output = Result<Ordered<T>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let ordered = match ready!(this.source.poll(cx)) {
            Ok(ordered) => ordered,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let compare = this.compare.take().expect("future polled after completing");
        Poll::Ready(Ok(ordered.refine(compare)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::source::deferred;
    use crate::Error;

    use futures_lite::future::block_on;

    #[test]
    fn sorted_by_key_is_stable() {
        block_on(async {
            // Equal keys keep source order.
            let out = deferred(vec![(1, 'b'), (0, 'a'), (1, 'a'), (0, 'b')])
                .sorted_by_key(|pair| pair.0)
                .to_vec()
                .await
                .unwrap();
            assert_eq!(out, vec![(0, 'a'), (0, 'b'), (1, 'b'), (1, 'a')]);
        });
    }

    #[test]
    fn then_by_breaks_ties_only() {
        block_on(async {
            let out = deferred(vec![(1, 'b'), (0, 'a'), (1, 'a'), (0, 'b')])
                .sorted_by_key(|pair| pair.0)
                .then_by(|pair| pair.1)
                .to_vec()
                .await
                .unwrap();
            assert_eq!(out, vec![(0, 'a'), (0, 'b'), (1, 'a'), (1, 'b')]);
        });
    }

    #[test]
    fn stacked_refinements_compose_left_to_right() {
        block_on(async {
            let out = deferred(vec![(1, 'b', 2), (1, 'a', 9), (0, 'c', 5), (1, 'b', 1)])
                .sorted_by_key(|row| row.0)
                .then_by(|row| row.1)
                .then_by(|row| row.2)
                .to_vec()
                .await
                .unwrap();
            assert_eq!(
                out,
                vec![(0, 'c', 5), (1, 'a', 9), (1, 'b', 1), (1, 'b', 2)]
            );
        });
    }

    #[test]
    fn descending_variants_reverse_the_key() {
        block_on(async {
            let out = deferred(vec![3, 1, 2]).sorted_desc().to_vec().await.unwrap();
            assert_eq!(out, vec![3, 2, 1]);

            let out = deferred(vec!["bb", "a", "ccc"])
                .sorted_by_key_desc(|word| word.len())
                .to_vec()
                .await
                .unwrap();
            assert_eq!(out, vec!["ccc", "bb", "a"]);
        });
    }

    #[test]
    fn ordered_sequences_feed_further_adapters() {
        block_on(async {
            let out = deferred(vec![3, 1, 2])
                .sorted()
                .map(|x| x * 10)
                .to_vec()
                .await
                .unwrap();
            assert_eq!(out, vec![10, 20, 30]);
        });
    }

    #[test]
    fn faults_pass_through_unchanged() {
        block_on(async {
            let err = crate::source::fail::<Vec<i32>>(Error::EmptySequence)
                .sorted()
                .then_by(|x| *x)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::EmptySequence));
        });
    }
}
