use core::fmt;
use core::future::Future;
use core::hash::Hash;
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use std::collections::{HashMap, HashSet};

use pin_project::pin_project;

use crate::error::Error;
use crate::lookup::Lookup;

/// Realizes the deferred sequence into a `Vec`.
///
/// This `struct` is created by the [`to_vec`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`to_vec`]: crate::query::QueryExt::to_vec
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ToVec<F> {
    #[pin]
    source: F,
}

impl<F> ToVec<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for ToVec<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
{
    type Output = Result<Vec<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(Ok(sequence.into_iter().collect()))
    }
}

/// Realizes the deferred sequence into a `HashSet`, dropping duplicates.
///
/// This `struct` is created by the [`to_hash_set`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`to_hash_set`]: crate::query::QueryExt::to_hash_set
/// [`QueryExt`]: crate::query::QueryExt
#[derive(Debug)]
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ToHashSet<F> {
    #[pin]
    source: F,
}

impl<F> ToHashSet<F> {
    pub(crate) fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F, C> Future for ToHashSet<F>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    C::Item: Eq + Hash,
{
    type Output = Result<HashSet<C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        Poll::Ready(Ok(sequence.into_iter().collect()))
    }
}

/// Realizes the deferred sequence into a `HashMap`, keyed by a selector.
///
/// Unlike [`to_lookup`][crate::query::QueryExt::to_lookup], a key may map to
/// only one element: a second element producing the same key fails the query
/// with [`Error::DuplicateKey`].
///
/// This `struct` is created by the [`to_hash_map`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`to_hash_map`]: crate::query::QueryExt::to_hash_map
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ToHashMap<F, Fun> {
    #[pin]
    source: F,
    key: Option<Fun>,
}

impl<F, Fun> ToHashMap<F, Fun> {
    pub(crate) fn new(source: F, key: Fun) -> Self {
        Self {
            source,
            key: Some(key),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for ToHashMap<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToHashMap")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, K, Fun> Future for ToHashMap<F, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    K: Eq + Hash,
    Fun: FnMut(&C::Item) -> K,
{
    type Output = Result<HashMap<K, C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let mut key = this.key.take().expect("future polled after completing");
        let mut map = HashMap::new();
        for value in sequence {
            if map.insert(key(&value), value).is_some() {
                return Poll::Ready(Err(Error::DuplicateKey));
            }
        }
        Poll::Ready(Ok(map))
    }
}

/// Groups the realized sequence into a [`Lookup`], keyed by a selector.
///
/// This `struct` is created by the [`to_lookup`] method on the [`QueryExt`]
/// trait. See its documentation for more.
///
/// [`to_lookup`]: crate::query::QueryExt::to_lookup
/// [`QueryExt`]: crate::query::QueryExt
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ToLookup<F, Fun> {
    #[pin]
    source: F,
    key: Option<Fun>,
}

impl<F, Fun> ToLookup<F, Fun> {
    pub(crate) fn new(source: F, key: Fun) -> Self {
        Self {
            source,
            key: Some(key),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for ToLookup<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToLookup")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<F, C, K, Fun> Future for ToLookup<F, Fun>
where
    F: Future<Output = Result<C, Error>>,
    C: IntoIterator,
    K: Eq + Hash + Clone,
    Fun: FnMut(&C::Item) -> K,
{
    type Output = Result<Lookup<K, C::Item>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let sequence = match ready!(this.source.poll(cx)) {
            Ok(sequence) => sequence,
            Err(err) => return Poll::Ready(Err(err)),
        };
        let key = this.key.take().expect("future polled after completing");
        Poll::Ready(Ok(Lookup::from_values(sequence, key)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::source::deferred;
    use crate::Error;

    use futures_lite::future::block_on;
    use std::collections::HashSet;

    #[test]
    fn to_vec_preserves_order() {
        block_on(async {
            let out = deferred(vec![3, 1, 2]).to_vec().await.unwrap();
            assert_eq!(out, vec![3, 1, 2]);
        });
    }

    #[test]
    fn to_hash_set_drops_duplicates() {
        block_on(async {
            let out = deferred(vec![1, 2, 2, 3]).to_hash_set().await.unwrap();
            assert_eq!(out, HashSet::from([1, 2, 3]));
        });
    }

    #[test]
    fn to_hash_map_keys_by_the_selector() {
        block_on(async {
            let out = deferred(vec!["a", "bb", "ccc"])
                .to_hash_map(|word| word.len())
                .await
                .unwrap();
            assert_eq!(out[&2], "bb");
            assert_eq!(out.len(), 3);
        });
    }

    #[test]
    fn to_hash_map_rejects_duplicate_keys() {
        block_on(async {
            let err = deferred(vec!["aa", "bb"])
                .to_hash_map(|word| word.len())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::DuplicateKey));
        });
    }

    #[test]
    fn to_lookup_groups_without_failing() {
        block_on(async {
            let out = deferred(vec!["aa", "bb", "c"])
                .to_lookup(|word| word.len())
                .await
                .unwrap();
            assert_eq!(out.get(&2), ["aa", "bb"]);
            assert_eq!(out.get(&1), ["c"]);
        });
    }
}
