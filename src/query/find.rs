use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use pin_project::pin_project;

use crate::error::Error;

/// Resolves to the first element of the realized sequence.
///
/// This `struct` is created by the [`first`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`first`]: crate::query::QueryExt::first
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct First<F> {
    #[pin]
    source: F,
}

impl<F> First<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for First<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<C::Item, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(sequence.into_iter().next().ok_or(Error::EmptySequence))
    }
}

/// Resolves to the last element of the realized sequence.
///
/// This `struct` is created by the [`last`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`last`]: crate::query::QueryExt::last
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Last<F> {
    #[pin]
    source: F,
}

impl<F> Last<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for Last<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<C::Item, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(sequence.into_iter().last().ok_or(Error::EmptySequence))
    }
}

/// Resolves to the only element of the realized sequence.
///
/// Fails with [`Error::EmptySequence`] when the sequence is empty and
/// [`Error::MultipleElements`] when it holds more than one element.
///
/// This `struct` is created by the [`single`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`single`]: crate::query::QueryExt::single
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Single<F> {
    #[pin]
    source: F,
}

impl<F> Single<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for Single<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<C::Item, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let mut items = sequence.into_iter();
        let result = match (items.next(), items.next()) {
            (Some(item), None) => Ok(item),
            (Some(_), Some(_)) => Err(Error::MultipleElements),
            (None, _) => Err(Error::EmptySequence),
        };
        Poll::Ready(result)
    }
}

/// Resolves to the element at a zero-based position in the realized
/// sequence.
///
/// This `struct` is created by the [`element_at`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`element_at`]: crate::query::QueryExt::element_at
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ElementAt<F> {
    #[pin]
    source: F,
    index: usize,
}

impl<F> ElementAt<F> {
    pub(crate) fn new(source: F, index: usize) -> Self {
        Self { source, index }
    }
}

impl<F, C> Future for ElementAt<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<C::Item, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(
            sequence
                .into_iter()
                .nth(*this.index)
                .ok_or(Error::IndexOutOfRange),
        )
    }
}

/// Resolves to the minimum of the realized sequence, or `None` when empty.
///
/// This `struct` is created by the [`min`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`min`]: crate::query::QueryExt::min
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Min<F> {
    #[pin]
    source: F,
}

impl<F> Min<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for Min<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    C::Item: Ord,
{
    type Output = Result<Option<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(Ok(sequence.into_iter().min()))
    }
}

/// Resolves to the maximum of the realized sequence, or `None` when empty.
///
/// This `struct` is created by the [`max`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`max`]: crate::query::QueryExt::max
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Max<F> {
    #[pin]
    source: F,
}

impl<F> Max<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for Max<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    C::Item: Ord,
{
    type Output = Result<Option<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(Ok(sequence.into_iter().max()))
    }
}

/// Resolves to the element whose key is minimal, or `None` when empty.
///
/// This `struct` is created by the [`min_by_key`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`min_by_key`]: crate::query::QueryExt::min_by_key
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct MinByKey<F, Fun> {
    #[pin]
    source: F,
    key: Option<Fun>,
}

impl<F, Fun> MinByKey<F, Fun> {
    pub(crate) fn new(source: F, key: Fun) -> Self {
        Self {
            source,
            key: Some(key),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for MinByKey<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinByKey")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, K, Fun> Future for MinByKey<F, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    K: Ord,
    Fun: FnMut(&C::Item) -> K,
{
    type Output = Result<Option<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let key = this.key.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().min_by_key(key)))
    }
}

/// Resolves to the element whose key is maximal, or `None` when empty.
///
/// This `struct` is created by the [`max_by_key`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`max_by_key`]: crate::query::QueryExt::max_by_key
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct MaxByKey<F, Fun> {
    #[pin]
    source: F,
    key: Option<Fun>,
}

impl<F, Fun> MaxByKey<F, Fun> {
    pub(crate) fn new(source: F, key: Fun) -> Self {
        Self {
            source,
            key: Some(key),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for MaxByKey<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxByKey")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, K, Fun> Future for MaxByKey<F, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    K: Ord,
    Fun: FnMut(&C::Item) -> K,
{
    type Output = Result<Option<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let key = this.key.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().max_by_key(key)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::source::{deferred, empty, range};
    use crate::Error;

    use futures_lite::future::block_on;

    #[test]
    fn first_and_last() {
        block_on(async {
            assert_eq!(range(1, 3).first().await.unwrap(), 1);
            assert_eq!(range(1, 3).last().await.unwrap(), 3);
        });
    }

    #[test]
    fn first_of_empty_faults() {
        block_on(async {
            let err = empty::<i32>().first().await.unwrap_err();
            assert!(matches!(err, Error::EmptySequence));
        });
    }

    #[test]
    fn single_requires_exactly_one_element() {
        block_on(async {
            assert_eq!(deferred(vec![7]).single().await.unwrap(), 7);
            assert!(matches!(
                empty::<i32>().single().await.unwrap_err(),
                Error::EmptySequence
            ));
            assert!(matches!(
                deferred(vec![1, 2]).single().await.unwrap_err(),
                Error::MultipleElements
            ));
        });
    }

    #[test]
    fn element_at_is_zero_based() {
        block_on(async {
            assert_eq!(range(10, 3).element_at(1).await.unwrap(), 11);
            assert!(matches!(
                range(10, 3).element_at(3).await.unwrap_err(),
                Error::IndexOutOfRange
            ));
        });
    }

    #[test]
    fn extremes_are_optional() {
        block_on(async {
            assert_eq!(deferred(vec![3, 1, 2]).min().await.unwrap(), Some(1));
            assert_eq!(deferred(vec![3, 1, 2]).max().await.unwrap(), Some(3));
            assert_eq!(empty::<i32>().min().await.unwrap(), None);
        });
    }

    #[test]
    fn by_key_extremes_return_the_element() {
        block_on(async {
            let shortest = deferred(vec!["hello", "hi", "hey"])
                .min_by_key(|word| word.len())
                .await
                .unwrap();
            assert_eq!(shortest, Some("hi"));

            let longest = deferred(vec!["hello", "hi", "hey"])
                .max_by_key(|word| word.len())
                .await
                .unwrap();
            assert_eq!(longest, Some("hello"));
        });
    }
}
