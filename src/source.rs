use core::future::Future;
use core::iter;
use core::ops::Range;
use core::pin::Pin;
use core::task::{Context, Poll};

use pin_project::pin_project;

use crate::error::Error;

/// An immediately-ready deferred container.
///
/// This `struct` is created by the [`deferred`], [`empty`], [`range`],
/// [`repeat`], and [`fail`] functions. See their documentation for more.
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Deferred<C> {
    value: Option<Result<C, Error>>,
}

impl<C> Future for Deferred<C> {
    type Output = Result<C, Error>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        Poll::Ready(this.value.take().expect("future polled after completing"))
    }
}

/// Wraps an already-realized collection as a deferred sequence.
///
/// This is the entry point for querying data that is in hand: the returned
/// future resolves immediately, and every [`QueryExt`] adapter applies to it.
/// Futures produced by an asynchronous source need no wrapping as long as
/// they resolve to `Result<C, Error>` for some `C: IntoIterator`.
///
/// # Examples
///
/// ```rust
/// use futures_lite::future::block_on;
/// use futures_query::deferred;
/// use futures_query::prelude::*;
///
/// block_on(async {
///     let total = deferred([1, 2, 3]).sum().await.unwrap();
///     assert_eq!(total, 6);
/// });
/// ```
///
/// [`QueryExt`]: crate::query::QueryExt
pub fn deferred<C>(collection: C) -> Deferred<C>
where
    C: IntoIterator,
{
    Deferred {
        value: Some(Ok(collection)),
    }
}

/// A deferred sequence with no elements.
pub fn empty<T>() -> Deferred<iter::Empty<T>> {
    Deferred {
        value: Some(Ok(iter::empty())),
    }
}

/// A deferred sequence of `count` integers counting up from `start`.
///
/// # Panics
///
/// Panics if the end of the range does not fit in an `i64`.
///
/// # Examples
///
/// ```rust
/// use futures_lite::future::block_on;
/// use futures_query::prelude::*;
/// use futures_query::range;
///
/// block_on(async {
///     let squares = range(1, 4).map(|x| x * x).to_vec().await.unwrap();
///     assert_eq!(squares, vec![1, 4, 9, 16]);
/// });
/// ```
pub fn range(start: i64, count: usize) -> Deferred<Range<i64>> {
    let end = i64::try_from(count)
        .ok()
        .and_then(|len| start.checked_add(len))
        .expect("range end does not fit in an i64");
    Deferred {
        value: Some(Ok(start..end)),
    }
}

/// A deferred sequence repeating `element` `count` times.
pub fn repeat<T>(element: T, count: usize) -> Deferred<iter::Take<iter::Repeat<T>>>
where
    T: Clone,
{
    Deferred {
        value: Some(Ok(iter::repeat(element).take(count))),
    }
}

/// A deferred sequence whose resolution fails with `error`.
///
/// Useful for plumbing an upstream failure into a query, and for asserting
/// that adapters propagate source faults untranslated.
pub fn fail<C>(error: Error) -> Deferred<C> {
    Deferred {
        value: Some(Err(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryExt;

    use futures_lite::future::block_on;

    #[test]
    fn range_counts_up_from_start() {
        block_on(async {
            assert_eq!(range(1, 5).to_vec().await.unwrap(), vec![1, 2, 3, 4, 5]);
            assert_eq!(range(-2, 3).to_vec().await.unwrap(), vec![-2, -1, 0]);
            assert!(range(7, 0).to_vec().await.unwrap().is_empty());
        });
    }

    #[test]
    #[should_panic = "range end does not fit in an i64"]
    fn range_rejects_an_overflowing_end() {
        let _ = range(i64::MAX, 1);
    }

    #[test]
    fn repeat_and_empty() {
        block_on(async {
            assert_eq!(repeat("a", 3).to_vec().await.unwrap(), vec!["a", "a", "a"]);
            assert!(empty::<i32>().to_vec().await.unwrap().is_empty());
        });
    }

    #[test]
    fn fail_resolves_to_the_given_error() {
        block_on(async {
            let err = fail::<Vec<i32>>(Error::EmptySequence).await.unwrap_err();
            assert!(matches!(err, Error::EmptySequence));
        });
    }

    #[test]
    #[should_panic = "future polled after completing"]
    fn polling_after_completion_panics() {
        block_on(async {
            let mut source = deferred(vec![1]);
            let _ = Pin::new(&mut source).await;
            let _ = Pin::new(&mut source).await;
        });
    }
}
