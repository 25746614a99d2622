use core::fmt;
use core::future::Future;
use core::iter;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use pin_project::pin_project;

use crate::error::Error;

/// Projects each element of the realized sequence through a closure.
///
/// This `struct` is created by the [`map`] method on the [`QueryExt`] trait.
/// See its documentation for more.
///
/// [`map`]: crate::query::QueryExt::map
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Map<F, Fun> {
    #[pin]
    source: F,
    f: Option<Fun>,
}

impl<F, Fun> Map<F, Fun> {
    pub(crate) fn new(source: F, f: Fun) -> Self {
        Self {
            source,
            f: Some(f),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for Map<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, B, Fun> Future for Map<F, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    Fun: FnMut(C::Item) -> B,
{
    type Output = Result<iter::Map<C::IntoIter, Fun>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let f = this.f.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().map(f)))
    }
}

/// Projects each element into a sequence and flattens the results.
///
/// This `struct` is created by the [`flat_map`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`flat_map`]: crate::query::QueryExt::flat_map
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct FlatMap<F, Fun> {
    #[pin]
    source: F,
    f: Option<Fun>,
}

impl<F, Fun> FlatMap<F, Fun> {
    pub(crate) fn new(source: F, f: Fun) -> Self {
        Self {
            source,
            f: Some(f),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for FlatMap<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatMap")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, U, Fun> Future for FlatMap<F, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    U: IntoIterator,
    Fun: FnMut(C::Item) -> U,
{
    type Output = Result<iter::FlatMap<C::IntoIter, U, Fun>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let f = this.f.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().flat_map(f)))
    }
}

/// Keeps the elements of the realized sequence that satisfy a predicate.
///
/// This `struct` is created by the [`filter`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`filter`]: crate::query::QueryExt::filter
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Filter<F, P> {
    #[pin]
    source: F,
    predicate: Option<P>,
}

impl<F, P> Filter<F, P> {
    pub(crate) fn new(source: F, predicate: P) -> Self {
        Self {
            source,
            predicate: Some(predicate),
        }
    }
}

impl<F: fmt::Debug, P> fmt::Debug for Filter<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, P> Future for Filter<F, P>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    P: FnMut(&C::Item) -> bool,
{
    type Output = Result<iter::Filter<C::IntoIter, P>, Error>;

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
        Poll::Ready(Ok(sequence.into_iter().filter(predicate)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::source::{deferred, fail};
    use crate::Error;

    use futures_lite::future::block_on;

    #[test]
    fn map_projects_every_element() {
        block_on(async {
            let out = deferred(vec![1, 2, 3]).map(|x| x * 2).to_vec().await.unwrap();
            assert_eq!(out, vec![2, 4, 6]);
        });
    }

    #[test]
    fn chained_maps_compose() {
        block_on(async {
            let chained = deferred(vec![1, 2, 3])
                .map(|x| x + 1)
                .map(|x| x * 10)
                .to_vec()
                .await
                .unwrap();
            let composed: Vec<i32> = vec![1, 2, 3].into_iter().map(|x| (x + 1) * 10).collect();
            assert_eq!(chained, composed);
        });
    }

    #[test]
    fn filter_keeps_matching_elements() {
        block_on(async {
            let out = deferred(vec![1, 2, 3, 4])
                .filter(|x| x % 2 == 0)
                .to_vec()
                .await
                .unwrap();
            assert_eq!(out, vec![2, 4]);
        });
    }

    #[test]
    fn flat_map_flattens() {
        block_on(async {
            let out = deferred(vec![1, 3])
                .flat_map(|x| vec![x, x + 1])
                .to_vec()
                .await
                .unwrap();
            assert_eq!(out, vec![1, 2, 3, 4]);
        });
    }

    #[test]
    fn source_faults_are_propagated() {
        block_on(async {
            let err = fail::<Vec<i32>>(Error::from_source("upstream broke"))
                .map(|x| x + 1)
                .to_vec()
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "upstream broke");
        });
    }
}
