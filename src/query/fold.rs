use core::fmt;
use core::future::Future;
use core::iter;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use pin_project::pin_project;

use crate::error::Error;

/// Folds the realized sequence into an accumulator, starting from a seed.
///
/// This `struct` is created by the [`fold`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`fold`]: crate::query::QueryExt::fold
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Fold<F, B, Fun> {
    #[pin]
    source: F,
    seed: Option<B>,
    f: Option<Fun>,
}

impl<F, B, Fun> Fold<F, B, Fun> {
    pub(crate) fn new(source: F, seed: B, f: Fun) -> Self {
        Self {
            source,
            seed: Some(seed),
            f: Some(f),
        }
    }
}

impl<F: fmt::Debug, B, Fun> fmt::Debug for Fold<F, B, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fold")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, B, Fun> Future for Fold<F, B, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    Fun: FnMut(B, C::Item) -> B,
{
    type Output = Result<B, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let seed = this.seed.take().expect("future polled after completing");
        let f = this.f.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().fold(seed, f)))
    }
}

/// Folds the realized sequence using its first element as the seed.
///
/// Resolves to `None` over an empty sequence, following
/// [`Iterator::reduce`].
///
/// This `struct` is created by the [`reduce`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`reduce`]: crate::query::QueryExt::reduce
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Reduce<F, Fun> {
    #[pin]
    source: F,
    f: Option<Fun>,
}

impl<F, Fun> Reduce<F, Fun> {
    pub(crate) fn new(source: F, f: Fun) -> Self {
        Self {
            source,
            f: Some(f),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for Reduce<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reduce")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, Fun> Future for Reduce<F, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    Fun: FnMut(C::Item, C::Item) -> C::Item,
{
    type Output = Result<Option<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let f = this.f.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().reduce(f)))
    }
}

/// Sums the realized sequence.
///
/// This `struct` is created by the [`sum`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`sum`]: crate::query::QueryExt::sum
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Sum<F> {
    #[pin]
    source: F,
}

impl<F> Sum<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for Sum<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    C::Item: iter::Sum,
{
    type Output = Result<C::Item, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(Ok(sequence.into_iter().sum()))
    }
}

/// Counts the elements of the realized sequence.
///
/// This `struct` is created by the [`count`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`count`]: crate::query::QueryExt::count
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Count<F> {
    #[pin]
    source: F,
}

impl<F> Count<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for Count<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<usize, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(Ok(sequence.into_iter().count()))
    }
}

/// Tests whether every element of the realized sequence satisfies a
/// predicate.
///
/// This `struct` is created by the [`all`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`all`]: crate::query::QueryExt::all
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct All<F, P> {
    #[pin]
    source: F,
    predicate: Option<P>,
}

impl<F, P> All<F, P> {
    pub(crate) fn new(source: F, predicate: P) -> Self {
        Self {
            source,
            predicate: Some(predicate),
        }
    }
}

impl<F: fmt::Debug, P> fmt::Debug for All<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("All")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, P> Future for All<F, P>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    P: FnMut(C::Item) -> bool,
{
    type Output = Result<bool, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let predicate = this
            .predicate
            .take()
            .expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().all(predicate)))
    }
}

/// Tests whether any element of the realized sequence satisfies a predicate.
///
/// This `struct` is created by the [`any`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`any`]: crate::query::QueryExt::any
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Any<F, P> {
    #[pin]
    source: F,
    predicate: Option<P>,
}

impl<F, P> Any<F, P> {
    pub(crate) fn new(source: F, predicate: P) -> Self {
        Self {
            source,
            predicate: Some(predicate),
        }
    }
}

impl<F: fmt::Debug, P> fmt::Debug for Any<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Any")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, P> Future for Any<F, P>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    P: FnMut(C::Item) -> bool,
{
    type Output = Result<bool, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let predicate = this
            .predicate
            .take()
            .expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().any(predicate)))
    }
}

/// Tests whether the realized sequence contains a given element.
///
/// This `struct` is created by the [`contains`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`contains`]: crate::query::QueryExt::contains
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Contains<F, T> {
    #[pin]
    source: F,
    query: Option<T>,
}

impl<F, T> Contains<F, T> {
    pub(crate) fn new(source: F, query: T) -> Self {
        Self {
            source,
            query: Some(query),
        }
    }
}

impl<F, C, T> Future for Contains<F, T>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator<Item = T>,
    T: PartialEq,
{
    type Output = Result<bool, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let query = this.query.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().any(|item| item == query)))
    }
}

/// Compares the realized sequence element-wise against a realized second
/// sequence.
///
/// This `struct` is created by the [`seq_eq`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`seq_eq`]: crate::query::QueryExt::seq_eq
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct SeqEq<F, D> {
    #[pin]
    source: F,
    other: Option<D>,
}

impl<F, D> SeqEq<F, D> {
    pub(crate) fn new(source: F, other: D) -> Self {
        Self {
            source,
            other: Some(other),
        }
    }
}

impl<F, C, D> Future for SeqEq<F, D>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    D: IntoIterator,
    C::Item: PartialEq<D::Item>,
{
    type Output = Result<bool, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let other = this.other.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().eq(other)))
    }
}

/// Tests whether the realized sequence holds no elements.
///
/// This `struct` is created by the [`is_empty`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`is_empty`]: crate::query::QueryExt::is_empty
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct IsEmpty<F> {
    #[pin]
    source: F,
}

impl<F> IsEmpty<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for IsEmpty<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<bool, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(Ok(sequence.into_iter().next().is_none()))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::source::{deferred, empty, range};

    use futures_lite::future::block_on;

    #[test]
    fn fold_threads_the_accumulator() {
        block_on(async {
            let out = range(1, 4).fold(0, |acc, x| acc * 10 + x).await.unwrap();
            assert_eq!(out, 1234);
        });
    }

    #[test]
    fn reduce_is_none_on_empty() {
        block_on(async {
            assert_eq!(empty::<i32>().reduce(|a, b| a + b).await.unwrap(), None);
            assert_eq!(range(1, 3).reduce(|a, b| a + b).await.unwrap(), Some(6));
        });
    }

    #[test]
    fn sum_and_count() {
        block_on(async {
            assert_eq!(range(1, 4).sum().await.unwrap(), 10);
            assert_eq!(range(1, 4).count().await.unwrap(), 4);
            assert_eq!(empty::<i32>().sum().await.unwrap(), 0);
        });
    }

    #[test]
    fn quantifiers() {
        block_on(async {
            assert!(deferred(vec![2, 4]).all(|x| x % 2 == 0).await.unwrap());
            assert!(!deferred(vec![2, 3]).all(|x| x % 2 == 0).await.unwrap());
            assert!(deferred(vec![1, 2]).any(|x| x == 2).await.unwrap());
            assert!(deferred(vec![1, 2]).contains(2).await.unwrap());
            assert!(!deferred(vec![1, 2]).contains(7).await.unwrap());
        });
    }

    #[test]
    fn all_is_vacuously_true_on_empty() {
        block_on(async {
            assert!(empty::<i32>().all(|_| false).await.unwrap());
            assert!(!empty::<i32>().any(|_| true).await.unwrap());
        });
    }

    #[test]
    fn seq_eq_compares_elements_in_order() {
        block_on(async {
            assert!(deferred(vec![1, 2]).seq_eq(vec![1, 2]).await.unwrap());
            assert!(!deferred(vec![1, 2]).seq_eq(vec![2, 1]).await.unwrap());
            assert!(!deferred(vec![1, 2]).seq_eq(vec![1]).await.unwrap());
        });
    }

    #[test]
    fn is_empty_checks_for_any_element() {
        block_on(async {
            assert!(empty::<i32>().is_empty().await.unwrap());
            assert!(!deferred(vec![1]).is_empty().await.unwrap());
        });
    }
}
