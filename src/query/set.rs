use core::fmt;
use core::future::Future;
use core::hash::Hash;
use core::iter;
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use std::collections::HashSet;
use std::vec;

use itertools::structs::{Unique as UniqueIter, UniqueBy as UniqueByIter};
use itertools::Itertools;
use pin_project::pin_project;

use crate::error::Error;

/// Set difference: the distinct elements of the realized sequence that do not
/// appear in `other`.
///
/// This `struct` is created by the [`except`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`except`]: crate::query::QueryExt::except
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Except<F, D> {
    #[pin]
    source: F,
    other: Option<D>,
}

impl<F, D> Except<F, D> {
    pub(crate) fn new(source: F, other: D) -> Self {
        Self {
            source,
            other: Some(other),
        }
    }
}

impl<F, C, D> Future for Except<F, D>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    C::Item: Clone + Eq + Hash,
    D: IntoIterator<Item = C::Item>,
{
    type Output = Result<vec::IntoIter<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let other = this.other.take().expect("future polled after completing");
        // Everything excluded or already yielded lands in the same set, which
        // makes the result distinct as a side effect.
        let mut excluded: HashSet<C::Item> = other.into_iter().collect();
        let mut out = Vec::new();
        for item in sequence {
            if excluded.insert(item.clone()) {
                out.push(item);
            }
        }
        Poll::Ready(Ok(out.into_iter()))
    }
}

/// Set difference by key: elements of the realized sequence whose key appears
/// neither in `keys` nor earlier in the sequence.
///
/// This `struct` is created by the [`except_by`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`except_by`]: crate::query::QueryExt::except_by
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ExceptBy<F, D, Fun> {
    #[pin]
    source: F,
    keys: Option<D>,
    key: Option<Fun>,
}

impl<F, D, Fun> ExceptBy<F, D, Fun> {
    pub(crate) fn new(source: F, keys: D, key: Fun) -> Self {
        Self {
            source,
            keys: Some(keys),
            key: Some(key),
        }
    }
}

impl<F: fmt::Debug, D, Fun> fmt::Debug for ExceptBy<F, D, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptBy")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, D, K, Fun> Future for ExceptBy<F, D, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    D: IntoIterator<Item = K>,
    K: Eq + Hash,
    Fun: FnMut(&C::Item) -> K,
{
    type Output = Result<vec::IntoIter<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let keys = this.keys.take().expect("future polled after completing");
        let mut key = this.key.take().expect("future polled after completing");
        let mut excluded: HashSet<K> = keys.into_iter().collect();
        let mut out = Vec::new();
        for item in sequence {
            if excluded.insert(key(&item)) {
                out.push(item);
            }
        }
        Poll::Ready(Ok(out.into_iter()))
    }
}

/// Set intersection: the distinct elements of the realized sequence that also
/// appear in `other`, in first-sequence order.
///
/// This `struct` is created by the [`intersect`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`intersect`]: crate::query::QueryExt::intersect
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Intersect<F, D> {
    #[pin]
    source: F,
    other: Option<D>,
}

impl<F, D> Intersect<F, D> {
    pub(crate) fn new(source: F, other: D) -> Self {
        Self {
            source,
            other: Some(other),
        }
    }
}

impl<F, C, D> Future for Intersect<F, D>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    C::Item: Eq + Hash,
    D: IntoIterator<Item = C::Item>,
{
    type Output = Result<vec::IntoIter<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let other = this.other.take().expect("future polled after completing");
        // Removing on the first hit keeps the result distinct.
        let mut candidates: HashSet<C::Item> = other.into_iter().collect();
        let mut out = Vec::new();
        for item in sequence {
            if candidates.remove(&item) {
                out.push(item);
            }
        }
        Poll::Ready(Ok(out.into_iter()))
    }
}

/// Set intersection by key.
///
/// This `struct` is created by the [`intersect_by`] method on the
/// [`QueryExt`] trait. See its documentation for more.
///
/// [`intersect_by`]: crate::query::QueryExt::intersect_by
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct IntersectBy<F, D, Fun> {
    #[pin]
    source: F,
    keys: Option<D>,
    key: Option<Fun>,
}

impl<F, D, Fun> IntersectBy<F, D, Fun> {
    pub(crate) fn new(source: F, keys: D, key: Fun) -> Self {
        Self {
            source,
            keys: Some(keys),
            key: Some(key),
        }
    }
}

impl<F: fmt::Debug, D, Fun> fmt::Debug for IntersectBy<F, D, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntersectBy")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, D, K, Fun> Future for IntersectBy<F, D, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    D: IntoIterator<Item = K>,
    K: Eq + Hash,
    Fun: FnMut(&C::Item) -> K,
{
    type Output = Result<vec::IntoIter<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let keys = this.keys.take().expect("future polled after completing");
        let mut key = this.key.take().expect("future polled after completing");
        let mut candidates: HashSet<K> = keys.into_iter().collect();
        let mut out = Vec::new();
        for item in sequence {
            if candidates.remove(&key(&item)) {
                out.push(item);
            }
        }
        Poll::Ready(Ok(out.into_iter()))
    }
}

/// Set union: the distinct elements of both sequences, first-appearance
/// order.
///
/// This `struct` is created by the [`union`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`union`]: crate::query::QueryExt::union
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Union<F, D> {
    #[pin]
    source: F,
    other: Option<D>,
}

impl<F, D> Union<F, D> {
    pub(crate) fn new(source: F, other: D) -> Self {
        Self {
            source,
            other: Some(other),
        }
    }
}

impl<F, C, D> Future for Union<F, D>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    C::Item: Clone + Eq + Hash,
    D: IntoIterator<Item = C::Item>,
{
    type Output = Result<UniqueIter<iter::Chain<C::IntoIter, D::IntoIter>>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let other = this.other.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().chain(other).unique()))
    }
}

/// Set union by key.
///
/// This `struct` is created by the [`union_by`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`union_by`]: crate::query::QueryExt::union_by
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct UnionBy<F, D, Fun> {
    #[pin]
    source: F,
    other: Option<D>,
    key: Option<Fun>,
}

impl<F, D, Fun> UnionBy<F, D, Fun> {
    pub(crate) fn new(source: F, other: D, key: Fun) -> Self {
        Self {
            source,
            other: Some(other),
            key: Some(key),
        }
    }
}

impl<F: fmt::Debug, D, Fun> fmt::Debug for UnionBy<F, D, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionBy")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, D, K, Fun> Future for UnionBy<F, D, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    D: IntoIterator<Item = C::Item>,
    K: Eq + Hash,
    Fun: FnMut(&C::Item) -> K,
{
    type Output = Result<UniqueByIter<iter::Chain<C::IntoIter, D::IntoIter>, K, Fun>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let other = this.other.take().expect("future polled after completing");
        let key = this.key.take().expect("future polled after completing");
        Poll::Ready(Ok(sequence.into_iter().chain(other).unique_by(key)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::source::deferred;

    use futures_lite::future::block_on;

    #[test]
    fn except_is_distinct_and_ordered() {
        block_on(async {
            let out = deferred(vec![1, 2, 2, 3, 4]).except(vec![2, 4]).to_vec().await.unwrap();
            assert_eq!(out, vec![1, 3]);
        });
    }

    #[test]
    fn intersect_keeps_first_sequence_order() {
        block_on(async {
            let out = deferred(vec![3, 1, 1, 2]).intersect(vec![1, 3]).to_vec().await.unwrap();
            assert_eq!(out, vec![3, 1]);
        });
    }

    #[test]
    fn union_concatenates_then_dedups() {
        block_on(async {
            let out = deferred(vec![1, 2]).union(vec![2, 3]).to_vec().await.unwrap();
            assert_eq!(out, vec![1, 2, 3]);
        });
    }

    #[test]
    fn by_variants_compare_keys() {
        block_on(async {
            let out = deferred(vec!["apple", "banana", "cherry"])
                .except_by(vec![b'b'], |word| word.as_bytes()[0])
                .to_vec()
                .await
                .unwrap();
            assert_eq!(out, vec!["apple", "cherry"]);

            let out = deferred(vec!["apple", "banana", "cherry"])
                .intersect_by(vec![b'b', b'c'], |word| word.as_bytes()[0])
                .to_vec()
                .await
                .unwrap();
            assert_eq!(out, vec!["banana", "cherry"]);

            let out = deferred(vec!["aa", "b"])
                .union_by(vec!["cc", "d"], |word| word.len())
                .to_vec()
                .await
                .unwrap();
            assert_eq!(out, vec!["aa", "b"]);
        });
    }
}
