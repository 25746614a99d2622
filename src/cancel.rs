use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pin_project::pin_project;

use crate::error::Error;

/// A cooperative cancellation signal shared between a query and its caller.
///
/// Tokens are cheap to clone; all clones observe the same state. Triggering a
/// token is sticky — there is no way to un-cancel it.
///
/// A token does nothing on its own: attach it to a query stage with
/// [`with_cancel`][crate::query::QueryExt::with_cancel], which fails the stage
/// with [`Error::Cancelled`] before its input is polled whenever the token is
/// already triggered.
///
/// # Examples
///
/// ```rust
/// use futures_lite::future::block_on;
/// use futures_query::prelude::*;
/// use futures_query::{deferred, CancelToken};
///
/// block_on(async {
///     let token = CancelToken::new();
///     token.cancel();
///
///     let result = deferred(vec![1, 2, 3]).to_vec().with_cancel(token).await;
///     assert!(result.unwrap_err().is_cancelled());
/// });
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a new, untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every query stage holding a clone of this
    /// token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`][CancelToken::cancel] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A future which checks a [`CancelToken`] before polling its inner future.
///
/// This `struct` is created by the [`with_cancel`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`with_cancel`]: crate::query::QueryExt::with_cancel
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct WithCancel<F> {
    #[pin]
    future: F,
    token: CancelToken,
}

impl<F> WithCancel<F> {
    pub(crate) fn new(future: F, token: CancelToken) -> Self {
        Self { future, token }
    }
}

impl<F, T> Future for WithCancel<F>
where
    F: Future<Output = Result<T, Error>>,
{
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        // The token is consulted before the inner future on every poll, so a
        // pre-cancelled query never touches its source.
        if this.token.is_cancelled() {
            return Poll::Ready(Err(Error::Cancelled));
        }
        this.future.poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryExt;
    use crate::source::deferred;

    use futures_lite::future::block_on;

    /// A deferred sequence which panics if anything ever polls it.
    struct Untouchable;

    impl Future for Untouchable {
        type Output = Result<Vec<i32>, Error>;

        fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
            panic!("the source of a cancelled query must not be polled")
        }
    }

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn untriggered_token_is_a_no_op() {
        block_on(async {
            let token = CancelToken::new();
            let out = deferred(vec![1, 2]).to_vec().with_cancel(token).await;
            assert_eq!(out.unwrap(), vec![1, 2]);
        });
    }

    #[test]
    fn pre_cancelled_query_never_polls_its_source() {
        block_on(async {
            let token = CancelToken::new();
            token.cancel();
            let out = Untouchable.to_vec().with_cancel(token).await;
            assert!(out.unwrap_err().is_cancelled());
        });
    }
}
