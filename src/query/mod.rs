//! Asynchronous query adapters over deferred sequences.
//!
//! Every adapter in this module follows the same single-suspension pattern:
//! poll the deferred source once, hand the realized sequence to the
//! synchronous query layer, and return the delegate's result as a new
//! deferred value. See the [`QueryExt`] trait for the full operation surface,
//! and the crate root for a tour.
//!
//! # Examples
//!
//! ```rust
//! use futures_lite::future::block_on;
//! use futures_query::deferred;
//! use futures_query::prelude::*;
//!
//! block_on(async {
//!     let by_parity = deferred(vec![1, 2, 3, 4, 5])
//!         .filter(|x| *x != 3)
//!         .to_lookup(|x| x % 2)
//!         .await
//!         .unwrap();
//!     assert_eq!(by_parity.get(&0), [2, 4]);
//!     assert_eq!(by_parity.get(&1), [1, 5]);
//! });
//! ```

pub use chain::{Append, Chain, Prepend, Zip};
pub use collect::{ToHashMap, ToHashSet, ToLookup, ToVec};
pub use distinct::{Unique, UniqueBy};
pub use ext::QueryExt;
pub use find::{ElementAt, First, Last, Max, MaxByKey, Min, MinByKey, Single};
pub use fold::{All, Any, Contains, Count, Fold, IsEmpty, Reduce, SeqEq, Sum};
pub use join::{GroupJoin, JoinOn};
pub use map::{Filter, FlatMap, Map};
pub use set::{Except, ExceptBy, Intersect, IntersectBy, Union, UnionBy};
pub use slice::{Chunks, Rev, Skip, SkipLast, SkipWhile, Take, TakeLast, TakeWhile};

mod chain;
mod collect;
mod distinct;
mod ext;
mod find;
mod fold;
mod join;
mod map;
mod set;
mod slice;
