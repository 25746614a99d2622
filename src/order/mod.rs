//! Ordered-sequence continuations.
//!
//! Sorting a deferred sequence with
//! [`sorted_by_key`][crate::query::QueryExt::sorted_by_key] (or any of its
//! siblings) produces a deferred [`Ordered`] rather than a plain sequence.
//! `Ordered` remembers its sort keys, so [`OrderedExt::then_by`] can append
//! tie-breaking keys without re-sorting what the primary key already decided —
//! and only futures of `Ordered` expose `then_by`, keeping the continuation
//! type-safe.
//!
//! `Ordered` is itself `IntoIterator`, so every [`QueryExt`] adapter applies
//! to a deferred ordered sequence as well.
//!
//! # Examples
//!
//! ```rust
//! use futures_lite::future::block_on;
//! use futures_query::deferred;
//! use futures_query::prelude::*;
//!
//! block_on(async {
//!     let words = deferred(vec!["pear", "fig", "plum", "kiwi"])
//!         .sorted_by_key(|word| word.len())
//!         .then_by(|word| *word)
//!         .to_vec()
//!         .await
//!         .unwrap();
//!     assert_eq!(words, vec!["fig", "kiwi", "pear", "plum"]);
//! });
//! ```
//!
//! [`QueryExt`]: crate::query::QueryExt

use core::cmp::Ordering;
use core::fmt;
use core::future::Future;
use std::vec;

use crate::error::Error;

pub use sorted::{Sorted, ThenBy};

mod sorted;

pub(crate) type Compare<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// A realized sequence carrying the sort keys applied to it so far.
///
/// The sort itself is deferred to the point the sequence is enumerated (or a
/// further adapter realizes it); a chain of `sorted_by_key` / `then_by` calls
/// sorts exactly once, with a stable sort, matching the behavior of the
/// synchronous layer's [`slice::sort_by`].
pub struct Ordered<T> {
    items: Vec<T>,
    compare: Compare<T>,
}

impl<T> Ordered<T> {
    pub(crate) fn new(items: Vec<T>, compare: Compare<T>) -> Self {
        Self { items, compare }
    }

    /// Appends a tie-breaking comparison, consulted only where every
    /// comparison applied so far considers two elements equal.
    pub(crate) fn refine(self, next: Compare<T>) -> Self
    where
        T: 'static,
    {
        let Ordered { items, compare } = self;
        Ordered {
            items,
            compare: Box::new(move |a, b| compare(a, b).then_with(|| next(a, b))),
        }
    }

    /// The number of elements in the sequence.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the sequence holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sorts and returns the underlying elements.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let Ordered { mut items, compare } = self;
        items.sort_by(|a, b| compare(a, b));
        items
    }
}

impl<T> IntoIterator for Ordered<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_sorted_vec().into_iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Ordered<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ordered")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

/// An extension trait for futures of [`Ordered`] sequences.
pub trait OrderedExt: Future {
    /// Appends an ascending tie-breaking sort key.
    fn then_by<T, K, Fun>(self, key: Fun) -> ThenBy<Self, T>
    where
        Self: Future<Output = Result<Ordered<T>, Error>> + Sized,
        T: 'static,
        Fun: Fn(&T) -> K + 'static,
        K: Ord,
    {
        ThenBy::new(self, Box::new(move |a, b| key(a).cmp(&key(b))))
    }

    /// Appends a descending tie-breaking sort key.
    fn then_by_desc<T, K, Fun>(self, key: Fun) -> ThenBy<Self, T>
    where
        Self: Future<Output = Result<Ordered<T>, Error>> + Sized,
        T: 'static,
        Fun: Fn(&T) -> K + 'static,
        K: Ord,
    {
        ThenBy::new(self, Box::new(move |a, b| key(b).cmp(&key(a))))
    }
}

impl<F> OrderedExt for F where F: Future {}
