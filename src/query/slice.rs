use core::fmt;
use core::future::Future;
use core::iter;
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use std::vec;

use itertools::Itertools;
use pin_project::pin_project;

use crate::error::Error;

/// Skips the first `count` elements of the realized sequence.
///
/// This `struct` is created by the [`skip`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`skip`]: crate::query::QueryExt::skip
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Skip<F> {
    #[pin]
    source: F,
    count: usize,
}

impl<F> Skip<F> {
    pub(crate) fn new(source: F, count: usize) -> Self {
        Self { source, count }
    }
}

impl<F, C> Future for Skip<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<iter::Skip<C::IntoIter>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(Ok(sequence.into_iter().skip(*this.count)))
    }
}

/// Keeps only the first `count` elements of the realized sequence.
///
/// This `struct` is created by the [`take`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`take`]: crate::query::QueryExt::take
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Take<F> {
    #[pin]
    source: F,
    count: usize,
}

impl<F> Take<F> {
    pub(crate) fn new(source: F, count: usize) -> Self {
        Self { source, count }
    }
}

impl<F, C> Future for Take<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<iter::Take<C::IntoIter>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(Ok(sequence.into_iter().take(*this.count)))
    }
}

/// Skips elements while a predicate holds, keeping the rest.
///
/// This `struct` is created by the [`skip_while`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`skip_while`]: crate::query::QueryExt::skip_while
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct SkipWhile<F, P> {
    #[pin]
    source: F,
    predicate: Option<P>,
}

impl<F, P> SkipWhile<F, P> {
    pub(crate) fn new(source: F, predicate: P) -> Self {
        Self {
            source,
            predicate: Some(predicate),
        }
    }
}

impl<F: fmt::Debug, P> fmt::Debug for SkipWhile<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipWhile")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, P> Future for SkipWhile<F, P>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    P: FnMut(&C::Item) -> bool,
{
    type Output = Result<iter::SkipWhile<C::IntoIter, P>, Error>;

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
        Poll::Ready(Ok(sequence.into_iter().skip_while(predicate)))
    }
}

/// Keeps elements while a predicate holds, dropping the rest.
///
/// This `struct` is created by the [`take_while`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`take_while`]: crate::query::QueryExt::take_while
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct TakeWhile<F, P> {
    #[pin]
    source: F,
    predicate: Option<P>,
}

impl<F, P> TakeWhile<F, P> {
    pub(crate) fn new(source: F, predicate: P) -> Self {
        Self {
            source,
            predicate: Some(predicate),
        }
    }
}

impl<F: fmt::Debug, P> fmt::Debug for TakeWhile<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TakeWhile")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, P> Future for TakeWhile<F, P>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    P: FnMut(&C::Item) -> bool,
{
    type Output = Result<iter::TakeWhile<C::IntoIter, P>, Error>;

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
        Poll::Ready(Ok(sequence.into_iter().take_while(predicate)))
    }
}

/// Drops the last `count` elements of the realized sequence.
///
/// Unlike [`skip`][crate::query::QueryExt::skip] this has to buffer the whole
/// sequence before it knows where the cut falls.
///
/// This `struct` is created by the [`skip_last`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`skip_last`]: crate::query::QueryExt::skip_last
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct SkipLast<F> {
    #[pin]
    source: F,
    count: usize,
}

impl<F> SkipLast<F> {
    pub(crate) fn new(source: F, count: usize) -> Self {
        Self { source, count }
    }
}

impl<F, C> Future for SkipLast<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<vec::IntoIter<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let mut items: Vec<C::Item> = sequence.into_iter().collect();
        items.truncate(items.len().saturating_sub(*this.count));
        Poll::Ready(Ok(items.into_iter()))
    }
}

/// Keeps only the last `count` elements of the realized sequence.
///
/// This `struct` is created by the [`take_last`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`take_last`]: crate::query::QueryExt::take_last
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct TakeLast<F> {
    #[pin]
    source: F,
    count: usize,
}

impl<F> TakeLast<F> {
    pub(crate) fn new(source: F, count: usize) -> Self {
        Self { source, count }
    }
}

impl<F, C> Future for TakeLast<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<vec::IntoIter<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let mut items: Vec<C::Item> = sequence.into_iter().collect();
        let tail = items.split_off(items.len().saturating_sub(*this.count));
        Poll::Ready(Ok(tail.into_iter()))
    }
}

/// Splits the realized sequence into runs of at most `size` elements.
///
/// This `struct` is created by the [`chunks`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`chunks`]: crate::query::QueryExt::chunks
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Chunks<F> {
    #[pin]
    source: F,
    size: usize,
}

impl<F> Chunks<F> {
    pub(crate) fn new(source: F, size: usize) -> Self {
        Self { source, size }
    }
}

impl<F, C> Future for Chunks<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<Vec<Vec<C::Item>>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let chunks = sequence.into_iter().chunks(*this.size);
        let runs = (&chunks).into_iter().map(|run| run.collect()).collect();
        Poll::Ready(Ok(runs))
    }
}

/// Reverses the realized sequence.
///
/// This `struct` is created by the [`rev`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`rev`]: crate::query::QueryExt::rev
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Rev<F> {
    #[pin]
    source: F,
}

impl<F> Rev<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for Rev<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<iter::Rev<vec::IntoIter<C::Item>>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let items: Vec<C::Item> = sequence.into_iter().collect();
        Poll::Ready(Ok(items.into_iter().rev()))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::source::{deferred, range};

    use futures_lite::future::block_on;

    #[test]
    fn skip_and_take_slice_the_middle() {
        block_on(async {
            let out = range(1, 10).skip(2).take(3).to_vec().await.unwrap();
            assert_eq!(out, vec![3, 4, 5]);
        });
    }

    #[test]
    fn skipping_past_the_end_is_empty() {
        block_on(async {
            assert!(range(1, 3).skip(5).to_vec().await.unwrap().is_empty());
            assert!(range(1, 3).skip_last(5).to_vec().await.unwrap().is_empty());
        });
    }

    #[test]
    fn while_variants_cut_at_the_first_mismatch() {
        block_on(async {
            let out = deferred(vec![1, 2, 9, 1]).take_while(|x| *x < 5).to_vec().await.unwrap();
            assert_eq!(out, vec![1, 2]);

            let out = deferred(vec![1, 2, 9, 1]).skip_while(|x| *x < 5).to_vec().await.unwrap();
            assert_eq!(out, vec![9, 1]);
        });
    }

    #[test]
    fn last_variants_buffer_and_cut_from_the_end() {
        block_on(async {
            let out = range(1, 5).skip_last(2).to_vec().await.unwrap();
            assert_eq!(out, vec![1, 2, 3]);

            let out = range(1, 5).take_last(2).to_vec().await.unwrap();
            assert_eq!(out, vec![4, 5]);
        });
    }

    #[test]
    fn chunks_keep_order_and_a_short_tail() {
        block_on(async {
            let out = range(1, 5).chunks(2).await.unwrap();
            assert_eq!(out, vec![vec![1, 2], vec![3, 4], vec![5]]);
        });
    }

    #[test]
    fn rev_reverses() {
        block_on(async {
            let out = deferred(vec![1, 2, 3]).rev().to_vec().await.unwrap();
            assert_eq!(out, vec![3, 2, 1]);
        });
    }
}
