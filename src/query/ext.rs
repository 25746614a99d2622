use core::cmp::Ordering;
use core::hash::Hash;
use core::iter;

use futures_core::Future;

use super::chain::{Append, Chain, Prepend, Zip};
use super::collect::{ToHashMap, ToHashSet, ToLookup, ToVec};
use super::distinct::{Unique, UniqueBy};
use super::find::{ElementAt, First, Last, Max, MaxByKey, Min, MinByKey, Single};
use super::fold::{All, Any, Contains, Count, Fold, IsEmpty, Reduce, SeqEq, Sum};
use super::join::{GroupJoin, JoinOn};
use super::map::{Filter, FlatMap, Map};
use super::set::{Except, ExceptBy, Intersect, IntersectBy, Union, UnionBy};
use super::slice::{Chunks, Rev, Skip, SkipLast, SkipWhile, Take, TakeLast, TakeWhile};
use crate::cancel::{CancelToken, WithCancel};
use crate::error::Error;
use crate::order::Sorted;

/// An extension trait providing query operations on futures of collections.
///
/// Implemented for every future; the individual operations become callable
/// when the future resolves to `Result<C, Error>` for some `C:
/// IntoIterator`. Each operation awaits the deferred input once, delegates to
/// the synchronous query layer, and is itself a future, so operations chain
/// without intermediate `await`s.
///
/// # Examples
///
/// ```rust
/// use futures_lite::future::block_on;
/// use futures_query::deferred;
/// use futures_query::prelude::*;
///
/// block_on(async {
///     let out = deferred(vec![5, 1, 4, 1])
///         .unique()
///         .sorted()
///         .map(|x| x * x)
///         .to_vec()
///         .await
///         .unwrap();
///     assert_eq!(out, vec![1, 16, 25]);
/// });
/// ```
pub trait QueryExt: Future {
    /// Projects each element through `f`. The result stays lazy, like
    /// [`Iterator::map`].
    fn map<C, B, Fun>(self, f: Fun) -> Map<Self, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        Fun: FnMut(C::Item) -> B,
    {
        Map::new(self, f)
    }

    /// Projects each element into a sequence and flattens the results.
    fn flat_map<C, U, Fun>(self, f: Fun) -> FlatMap<Self, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        U: IntoIterator,
        Fun: FnMut(C::Item) -> U,
    {
        FlatMap::new(self, f)
    }

    /// Keeps the elements satisfying `predicate`.
    fn filter<C, P>(self, predicate: P) -> Filter<Self, P>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        P: FnMut(&C::Item) -> bool,
    {
        Filter::new(self, predicate)
    }

    /// Concatenates a realized sequence onto the end of this one.
    fn chain<C, D>(self, other: D) -> Chain<Self, D>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        D: IntoIterator<Item = C::Item>,
    {
        Chain::new(self, other)
    }

    /// Adds `element` to the end of the sequence.
    fn append<C>(self, element: C::Item) -> Append<Self, C::Item>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        Append::new(self, element)
    }

    /// Adds `element` to the front of the sequence.
    fn prepend<C>(self, element: C::Item) -> Prepend<Self, C::Item>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        Prepend::new(self, element)
    }

    /// Pairs the sequence element-wise with a realized second sequence,
    /// stopping at the shorter of the two.
    fn zip<C, D>(self, other: D) -> Zip<Self, D>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        D: IntoIterator,
    {
        Zip::new(self, other)
    }

    /// Skips the first `count` elements.
    fn skip<C>(self, count: usize) -> Skip<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        Skip::new(self, count)
    }

    /// Keeps only the first `count` elements.
    fn take<C>(self, count: usize) -> Take<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        Take::new(self, count)
    }

    /// Skips elements while `predicate` holds, keeping everything from the
    /// first mismatch on.
    fn skip_while<C, P>(self, predicate: P) -> SkipWhile<Self, P>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        P: FnMut(&C::Item) -> bool,
    {
        SkipWhile::new(self, predicate)
    }

    /// Keeps elements while `predicate` holds, dropping everything from the
    /// first mismatch on.
    fn take_while<C, P>(self, predicate: P) -> TakeWhile<Self, P>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        P: FnMut(&C::Item) -> bool,
    {
        TakeWhile::new(self, predicate)
    }

    /// Drops the last `count` elements. Buffers the whole sequence.
    fn skip_last<C>(self, count: usize) -> SkipLast<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        SkipLast::new(self, count)
    }

    /// Keeps only the last `count` elements. Buffers the whole sequence.
    fn take_last<C>(self, count: usize) -> TakeLast<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        TakeLast::new(self, count)
    }

    /// Splits the sequence into runs of at most `size` elements; the final
    /// run may be shorter.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero, following [`Itertools::chunks`].
    ///
    /// [`Itertools::chunks`]: itertools::Itertools::chunks
    fn chunks<C>(self, size: usize) -> Chunks<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        Chunks::new(self, size)
    }

    /// Reverses the sequence. Buffers the whole sequence.
    fn rev<C>(self) -> Rev<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        Rev::new(self)
    }

    /// Removes duplicates, keeping the first occurrence of each element.
    fn unique<C>(self) -> Unique<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: Clone + Eq + Hash,
    {
        Unique::new(self)
    }

    /// Removes elements whose key was seen before, keeping first
    /// occurrences.
    fn unique_by<C, K, Fun>(self, key: Fun) -> UniqueBy<Self, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        K: Eq + Hash,
        Fun: FnMut(&C::Item) -> K,
    {
        UniqueBy::new(self, key)
    }

    /// Set difference: the distinct elements not appearing in `other`.
    fn except<C, D>(self, other: D) -> Except<Self, D>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: Clone + Eq + Hash,
        D: IntoIterator<Item = C::Item>,
    {
        Except::new(self, other)
    }

    /// Set difference by key: elements whose key appears neither in `keys`
    /// nor earlier in the sequence.
    fn except_by<C, D, K, Fun>(self, keys: D, key: Fun) -> ExceptBy<Self, D, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        D: IntoIterator<Item = K>,
        K: Eq + Hash,
        Fun: FnMut(&C::Item) -> K,
    {
        ExceptBy::new(self, keys, key)
    }

    /// Set intersection: the distinct elements also appearing in `other`, in
    /// this sequence's order.
    fn intersect<C, D>(self, other: D) -> Intersect<Self, D>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: Eq + Hash,
        D: IntoIterator<Item = C::Item>,
    {
        Intersect::new(self, other)
    }

    /// Set intersection by key.
    fn intersect_by<C, D, K, Fun>(self, keys: D, key: Fun) -> IntersectBy<Self, D, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        D: IntoIterator<Item = K>,
        K: Eq + Hash,
        Fun: FnMut(&C::Item) -> K,
    {
        IntersectBy::new(self, keys, key)
    }

    /// Set union: the distinct elements of both sequences, in first
    /// appearance order.
    fn union<C, D>(self, other: D) -> Union<Self, D>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: Clone + Eq + Hash,
        D: IntoIterator<Item = C::Item>,
    {
        Union::new(self, other)
    }

    /// Set union by key.
    fn union_by<C, D, K, Fun>(self, other: D, key: Fun) -> UnionBy<Self, D, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        D: IntoIterator<Item = C::Item>,
        K: Eq + Hash,
        Fun: FnMut(&C::Item) -> K,
    {
        UnionBy::new(self, other, key)
    }

    /// Sorts the sequence ascending, producing an
    /// [`Ordered`][crate::order::Ordered] continuation that
    /// [`then_by`][crate::order::OrderedExt::then_by] can refine.
    fn sorted<C>(self) -> Sorted<Self, C::Item>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: Ord + 'static,
    {
        Sorted::new(self, Box::new(|a, b| a.cmp(b)))
    }

    /// Sorts the sequence descending.
    fn sorted_desc<C>(self) -> Sorted<Self, C::Item>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: Ord + 'static,
    {
        Sorted::new(self, Box::new(|a, b| b.cmp(a)))
    }

    /// Sorts the sequence with an explicit comparison.
    fn sorted_by<C, Fun>(self, compare: Fun) -> Sorted<Self, C::Item>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: 'static,
        Fun: Fn(&C::Item, &C::Item) -> Ordering + 'static,
    {
        Sorted::new(self, Box::new(compare))
    }

    /// Sorts the sequence ascending by a key.
    ///
    /// The sort is stable: elements with equal keys keep their relative
    /// order, and the key is recomputed per comparison.
    fn sorted_by_key<C, K, Fun>(self, key: Fun) -> Sorted<Self, C::Item>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: 'static,
        Fun: Fn(&C::Item) -> K + 'static,
        K: Ord,
    {
        Sorted::new(self, Box::new(move |a, b| key(a).cmp(&key(b))))
    }

    /// Sorts the sequence descending by a key.
    fn sorted_by_key_desc<C, K, Fun>(self, key: Fun) -> Sorted<Self, C::Item>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: 'static,
        Fun: Fn(&C::Item) -> K + 'static,
        K: Ord,
    {
        Sorted::new(self, Box::new(move |a, b| key(b).cmp(&key(a))))
    }

    /// Folds the sequence into an accumulator, starting from `seed`.
    fn fold<C, B, Fun>(self, seed: B, f: Fun) -> Fold<Self, B, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        Fun: FnMut(B, C::Item) -> B,
    {
        Fold::new(self, seed, f)
    }

    /// Folds the sequence using its first element as the seed; `None` when
    /// the sequence is empty.
    fn reduce<C, Fun>(self, f: Fun) -> Reduce<Self, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        Fun: FnMut(C::Item, C::Item) -> C::Item,
    {
        Reduce::new(self, f)
    }

    /// Sums the sequence.
    fn sum<C>(self) -> Sum<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: iter::Sum,
    {
        Sum::new(self)
    }

    /// Counts the elements of the sequence.
    fn count<C>(self) -> Count<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        Count::new(self)
    }

    /// Tests whether every element satisfies `predicate`; vacuously `true`
    /// for an empty sequence.
    fn all<C, P>(self, predicate: P) -> All<Self, P>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        P: FnMut(C::Item) -> bool,
    {
        All::new(self, predicate)
    }

    /// Tests whether any element satisfies `predicate`.
    fn any<C, P>(self, predicate: P) -> Any<Self, P>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        P: FnMut(C::Item) -> bool,
    {
        Any::new(self, predicate)
    }

    /// Tests whether the sequence contains `query`.
    fn contains<C>(self, query: C::Item) -> Contains<Self, C::Item>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: PartialEq,
    {
        Contains::new(self, query)
    }

    /// Compares the sequence element-wise against a realized second
    /// sequence.
    fn seq_eq<C, D>(self, other: D) -> SeqEq<Self, D>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        D: IntoIterator,
        C::Item: PartialEq<D::Item>,
    {
        SeqEq::new(self, other)
    }

    /// Tests whether the sequence holds no elements.
    fn is_empty<C>(self) -> IsEmpty<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        IsEmpty::new(self)
    }

    /// The first element; fails with [`Error::EmptySequence`] when there is
    /// none.
    fn first<C>(self) -> First<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        First::new(self)
    }

    /// The last element; fails with [`Error::EmptySequence`] when there is
    /// none.
    fn last<C>(self) -> Last<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        Last::new(self)
    }

    /// The only element; fails when the sequence is empty or holds more than
    /// one element.
    fn single<C>(self) -> Single<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        Single::new(self)
    }

    /// The element at the zero-based `index`; fails with
    /// [`Error::IndexOutOfRange`] past the end.
    fn element_at<C>(self, index: usize) -> ElementAt<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        ElementAt::new(self, index)
    }

    /// The minimum element, or `None` when the sequence is empty.
    fn min<C>(self) -> Min<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: Ord,
    {
        Min::new(self)
    }

    /// The maximum element, or `None` when the sequence is empty.
    fn max<C>(self) -> Max<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: Ord,
    {
        Max::new(self)
    }

    /// The element whose key is minimal, or `None` when the sequence is
    /// empty.
    fn min_by_key<C, K, Fun>(self, key: Fun) -> MinByKey<Self, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        K: Ord,
        Fun: FnMut(&C::Item) -> K,
    {
        MinByKey::new(self, key)
    }

    /// The element whose key is maximal, or `None` when the sequence is
    /// empty.
    fn max_by_key<C, K, Fun>(self, key: Fun) -> MaxByKey<Self, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        K: Ord,
        Fun: FnMut(&C::Item) -> K,
    {
        MaxByKey::new(self, key)
    }

    /// Realizes the sequence into a `Vec`.
    fn to_vec<C>(self) -> ToVec<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
    {
        ToVec::new(self)
    }

    /// Realizes the sequence into a `HashSet`, dropping duplicates.
    fn to_hash_set<C>(self) -> ToHashSet<Self>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        C::Item: Eq + Hash,
    {
        ToHashSet::new(self)
    }

    /// Realizes the sequence into a `HashMap` keyed by `key`; fails with
    /// [`Error::DuplicateKey`] when two elements produce the same key.
    fn to_hash_map<C, K, Fun>(self, key: Fun) -> ToHashMap<Self, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        K: Eq + Hash,
        Fun: FnMut(&C::Item) -> K,
    {
        ToHashMap::new(self, key)
    }

    /// Groups the sequence into a [`Lookup`][crate::Lookup] keyed by `key`.
    /// Duplicate keys accumulate rather than fail.
    fn to_lookup<C, K, Fun>(self, key: Fun) -> ToLookup<Self, Fun>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        K: Eq + Hash + Clone,
        Fun: FnMut(&C::Item) -> K,
    {
        ToLookup::new(self, key)
    }

    /// Correlates the sequence with a realized `inner` sequence on matching
    /// keys, calling `result` once per matching pair. Output order follows
    /// this sequence, then `inner`.
    fn join_on<C, D, K, OK, IK, R, Out>(
        self,
        inner: D,
        outer_key: OK,
        inner_key: IK,
        result: R,
    ) -> JoinOn<Self, D, OK, IK, R>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        D: IntoIterator,
        K: Eq + Hash + Clone,
        OK: FnMut(&C::Item) -> K,
        IK: FnMut(&D::Item) -> K,
        R: FnMut(&C::Item, &D::Item) -> Out,
    {
        JoinOn::new(self, inner, outer_key, inner_key, result)
    }

    /// Correlates the sequence with a realized `inner` sequence on matching
    /// keys, calling `result` once per element of this sequence with the
    /// (possibly empty) group of matches.
    fn group_join<C, D, K, OK, IK, R, Out>(
        self,
        inner: D,
        outer_key: OK,
        inner_key: IK,
        result: R,
    ) -> GroupJoin<Self, D, OK, IK, R>
    where
        Self: Future<Output = Result<C, Error>> + Sized,
        C: IntoIterator,
        D: IntoIterator,
        K: Eq + Hash + Clone,
        OK: FnMut(&C::Item) -> K,
        IK: FnMut(&D::Item) -> K,
        R: FnMut(C::Item, &[D::Item]) -> Out,
    {
        GroupJoin::new(self, inner, outer_key, inner_key, result)
    }

    /// Attaches a cancellation token to this stage of the query.
    ///
    /// The token is consulted every time the stage is polled, before its
    /// input: a query whose token is already triggered fails with
    /// [`Error::Cancelled`] without the input ever being polled. A query
    /// without a token can never be cancelled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use futures_lite::future::block_on;
    /// use futures_query::prelude::*;
    /// use futures_query::{range, CancelToken};
    ///
    /// block_on(async {
    ///     let token = CancelToken::new();
    ///     token.cancel();
    ///
    ///     let result = range(1, 100).sum().with_cancel(token).await;
    ///     assert!(result.unwrap_err().is_cancelled());
    /// });
    /// ```
    fn with_cancel<T>(self, token: CancelToken) -> WithCancel<Self>
    where
        Self: Future<Output = Result<T, Error>> + Sized,
    {
        WithCancel::new(self, token)
    }
}

impl<F> QueryExt for F where F: Future {}
