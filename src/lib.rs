//! Query extensions for [`Future`][core::future::Future]s of collections.
//!
//! An asynchronous producer often hands back a *deferred sequence*: a future
//! which eventually resolves to a collection. Working with one today means
//! awaiting it first and only then reaching for the [`Iterator`] adapters,
//! which breaks the query up around every `await`. This library provides the
//! iterator vocabulary directly on the future, so a chained asynchronous
//! query reads like a chained synchronous one.
//!
//! Every operation follows the same shape: await the deferred input once,
//! delegate to the synchronous query layer ([`Iterator`] and [`itertools`]),
//! and hand the result back as a new deferred value. No query semantics
//! originate here — ordering, distinctness, and aggregation behave exactly as
//! the synchronous layer documents them.
//!
//! # Operations
//!
//! A deferred sequence is any `Future<Output = Result<C, Error>>` where `C:
//! IntoIterator`. On such futures [`QueryExt`] provides:
//!
//! - projection and restriction: [`map`], [`flat_map`], [`filter`]
//! - concatenation: [`chain`], [`append`], [`prepend`], [`zip`]
//! - partitioning: [`skip`], [`take`], [`skip_while`], [`take_while`],
//!   [`skip_last`], [`take_last`], [`chunks`], [`rev`]
//! - distinctness and set algebra: [`unique`], [`unique_by`], [`except`],
//!   [`intersect`], [`union`] and their `_by` variants
//! - ordering: [`sorted`], [`sorted_by`], [`sorted_by_key`] and friends,
//!   refined further through [`OrderedExt::then_by`]
//! - aggregation and search: [`fold`], [`reduce`], [`sum`], [`count`],
//!   [`min`], [`max`], [`first`], [`last`], [`single`], [`element_at`]
//! - conversion: [`to_vec`], [`to_hash_set`], [`to_hash_map`], [`to_lookup`]
//! - relational joins: [`join_on`], [`group_join`]
//! - cooperative cancellation: [`with_cancel`]
//!
//! # Examples
//!
//! ```rust
//! use futures_lite::future::block_on;
//! use futures_query::prelude::*;
//! use futures_query::{deferred, range};
//!
//! block_on(async {
//!     let doubled = deferred(vec![3, 1, 2])
//!         .sorted_by_key(|x| *x)
//!         .map(|x| x * 2)
//!         .to_vec()
//!         .await
//!         .unwrap();
//!     assert_eq!(doubled, vec![2, 4, 6]);
//!
//!     let evens = range(1, 5).filter(|x| x % 2 == 0).to_vec().await.unwrap();
//!     assert_eq!(evens, vec![2, 4]);
//! });
//! ```
//!
//! # Cancellation
//!
//! Adapters cooperate with a [`CancelToken`]: wrapping any stage of a query
//! in [`with_cancel`] makes it fail with [`Error::Cancelled`] before its
//! input is ever polled whenever the token has already been triggered. A
//! query that is never wrapped is never cancelled. The token is only
//! consulted between stages — once a synchronous delegate runs, it runs to
//! completion, matching the non-cancellable nature of the wrapped layer.
//!
//! # Errors
//!
//! Faults surface to the caller untranslated: a failing source propagates its
//! own [`Error`], and terminal operations fail exactly where their
//! synchronous counterparts would (an empty sequence in [`first`], a
//! duplicate key in [`to_hash_map`]). Operations whose synchronous delegate
//! expresses absence as [`Option`] — [`reduce`], [`min`], [`max`] — keep the
//! `Option`.
//!
//! [`map`]: query::QueryExt::map
//! [`flat_map`]: query::QueryExt::flat_map
//! [`filter`]: query::QueryExt::filter
//! [`chain`]: query::QueryExt::chain
//! [`append`]: query::QueryExt::append
//! [`prepend`]: query::QueryExt::prepend
//! [`zip`]: query::QueryExt::zip
//! [`skip`]: query::QueryExt::skip
//! [`take`]: query::QueryExt::take
//! [`skip_while`]: query::QueryExt::skip_while
//! [`take_while`]: query::QueryExt::take_while
//! [`skip_last`]: query::QueryExt::skip_last
//! [`take_last`]: query::QueryExt::take_last
//! [`chunks`]: query::QueryExt::chunks
//! [`rev`]: query::QueryExt::rev
//! [`unique`]: query::QueryExt::unique
//! [`unique_by`]: query::QueryExt::unique_by
//! [`except`]: query::QueryExt::except
//! [`intersect`]: query::QueryExt::intersect
//! [`union`]: query::QueryExt::union
//! [`sorted`]: query::QueryExt::sorted
//! [`sorted_by`]: query::QueryExt::sorted_by
//! [`sorted_by_key`]: query::QueryExt::sorted_by_key
//! [`fold`]: query::QueryExt::fold
//! [`reduce`]: query::QueryExt::reduce
//! [`sum`]: query::QueryExt::sum
//! [`count`]: query::QueryExt::count
//! [`min`]: query::QueryExt::min
//! [`max`]: query::QueryExt::max
//! [`first`]: query::QueryExt::first
//! [`last`]: query::QueryExt::last
//! [`single`]: query::QueryExt::single
//! [`element_at`]: query::QueryExt::element_at
//! [`to_vec`]: query::QueryExt::to_vec
//! [`to_hash_set`]: query::QueryExt::to_hash_set
//! [`to_hash_map`]: query::QueryExt::to_hash_map
//! [`to_lookup`]: query::QueryExt::to_lookup
//! [`join_on`]: query::QueryExt::join_on
//! [`group_join`]: query::QueryExt::group_join
//! [`with_cancel`]: query::QueryExt::with_cancel
//! [`QueryExt`]: query::QueryExt
//! [`OrderedExt::then_by`]: order::OrderedExt::then_by

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod cancel;
mod error;
mod lookup;
mod source;

pub mod order;
pub mod query;

pub use cancel::{CancelToken, WithCancel};
pub use error::Error;
pub use lookup::Lookup;
pub use source::{deferred, empty, fail, range, repeat, Deferred};

/// The futures query prelude.
pub mod prelude {
    pub use super::order::OrderedExt as _;
    pub use super::query::QueryExt as _;
}
