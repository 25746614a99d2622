use core::future::Future;
use core::iter;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use pin_project::pin_project;

use crate::error::Error;

/// Concatenates a realized sequence onto the end of the deferred one.
///
/// This `struct` is created by the [`chain`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`chain`]: crate::query::QueryExt::chain
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Chain<F, D> {
    #[pin]
    source: F,
    other: Option<D>,
}

impl<F, D> Chain<F, D> {
    pub(crate) fn new(source: F, other: D) -> Self {
        Self {
            source,
            other: Some(other),
        }
    }
}

impl<F, C, D> Future for Chain<F, D>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    D: IntoIterator<Item = C::Item>,
{
    type Output = Result<iter::Chain<C::IntoIter, D::IntoIter>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let other = this.other.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().chain(other)))
    }
}

/// Adds one element to the end of the realized sequence.
///
/// This `struct` is created by the [`append`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`append`]: crate::query::QueryExt::append
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Append<F, T> {
    #[pin]
    source: F,
    element: Option<T>,
}

impl<F, T> Append<F, T> {
    pub(crate) fn new(source: F, element: T) -> Self {
        Self {
            source,
            element: Some(element),
        }
    }
}

impl<F, C, T> Future for Append<F, T>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator<Item = T>,
{
    type Output = Result<iter::Chain<C::IntoIter, iter::Once<T>>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let element = this.element.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().chain(iter::once(element))))
    }
}

/// Adds one element to the front of the realized sequence.
///
/// This `struct` is created by the [`prepend`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`prepend`]: crate::query::QueryExt::prepend
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Prepend<F, T> {
    #[pin]
    source: F,
    element: Option<T>,
}

impl<F, T> Prepend<F, T> {
    pub(crate) fn new(source: F, element: T) -> Self {
        Self {
            source,
            element: Some(element),
        }
    }
}

impl<F, C, T> Future for Prepend<F, T>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator<Item = T>,
{
    type Output = Result<iter::Chain<iter::Once<T>, C::IntoIter>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let element = this.element.take().expect("future polled after completing");
        Poll::Ready(Ok(iter::once(element).chain(sequence)))
    }
}

/// Pairs the realized sequence with a realized second sequence.
///
/// This `struct` is created by the [`zip`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`zip`]: crate::query::QueryExt::zip
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Zip<F, D> {
    #[pin]
    source: F,
    other: Option<D>,
}

impl<F, D> Zip<F, D> {
    pub(crate) fn new(source: F, other: D) -> Self {
        Self {
            source,
            other: Some(other),
        }
    }
}

impl<F, C, D> Future for Zip<F, D>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    D: IntoIterator,
{
    type Output = Result<iter::Zip<C::IntoIter, D::IntoIter>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let other = this.other.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().zip(other)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::source::deferred;

    use futures_lite::future::block_on;

    #[test]
    fn chain_concatenates_in_order() {
        block_on(async {
            let out = deferred(vec![1, 2]).chain(vec![3, 4]).to_vec().await.unwrap();
            assert_eq!(out, vec![1, 2, 3, 4]);
        });
    }

    #[test]
    fn append_and_prepend() {
        block_on(async {
            let out = deferred(vec![2, 3]).append(4).prepend(1).to_vec().await.unwrap();
            assert_eq!(out, vec![1, 2, 3, 4]);
        });
    }

    #[test]
    fn zip_stops_at_the_shorter_sequence() {
        block_on(async {
            let out = deferred(vec![1, 2, 3]).zip("ab".chars()).to_vec().await.unwrap();
            assert_eq!(out, vec![(1, 'a'), (2, 'b')]);
        });
    }
}
