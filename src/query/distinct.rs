use core::fmt;
use core::future::Future;
use core::hash::Hash;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use itertools::structs::{Unique as UniqueIter, UniqueBy as UniqueByIter};
use itertools::Itertools;
use pin_project::pin_project;

use crate::error::Error;

/// Removes duplicate elements, keeping first occurrences in order.
///
/// This `struct` is created by the [`unique`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`unique`]: crate::query::QueryExt::unique
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Unique<F> {
    #[pin]
    source: F,
}

impl<F> Unique<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for Unique<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    C::Item: Clone + Eq + Hash,
{
    type Output = Result<UniqueIter<C::IntoIter>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(Ok(sequence.into_iter().unique()))
    }
}

/// Removes elements whose key has been seen before, keeping first
/// occurrences in order.
///
/// This `struct` is created by the [`unique_by`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`unique_by`]: crate::query::QueryExt::unique_by
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct UniqueBy<F, Fun> {
    #[pin]
    source: F,
    key: Option<Fun>,
}

impl<F, Fun> UniqueBy<F, Fun> {
    pub(crate) fn new(source: F, key: Fun) -> Self {
        Self {
            source,
            key: Some(key),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for UniqueBy<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueBy")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, K, Fun> Future for UniqueBy<F, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    K: Eq + Hash,
    Fun: FnMut(&C::Item) -> K,
{
    type Output = Result<UniqueByIter<C::IntoIter, K, Fun>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let key = this.key.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().unique_by(key)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::source::deferred;

    use futures_lite::future::block_on;

    #[test]
    fn unique_keeps_first_occurrences() {
        block_on(async {
            let out = deferred(vec![1, 2, 1, 3, 2]).unique().to_vec().await.unwrap();
            assert_eq!(out, vec![1, 2, 3]);
        });
    }

    #[test]
    fn unique_by_compares_keys_only() {
        block_on(async {
            let out = deferred(vec!["ab", "cd", "e", "fg"])
                .unique_by(|word| word.len())
                .to_vec()
                .await
                .unwrap();
            assert_eq!(out, vec!["ab", "e"]);
        });
    }
}
