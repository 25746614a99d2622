use std::cell::Cell;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures_lite::future::block_on;
use futures_query::prelude::*;
use futures_query::{deferred, empty, fail, range, repeat, CancelToken, Error};

#[test]
fn sorted_then_mapped_chain() {
    block_on(async {
        let out = deferred(vec![3, 1, 2])
            .sorted_by_key(|x| *x)
            .map(|x| x * 2)
            .to_vec()
            .await
            .unwrap();
        assert_eq!(out, vec![2, 4, 6]);
    })
}

#[test]
fn range_filters_to_evens() {
    block_on(async {
        let out = range(1, 5).filter(|x| x % 2 == 0).to_vec().await.unwrap();
        assert_eq!(out, vec![2, 4]);
    })
}

#[test]
fn first_of_empty_fails() {
    block_on(async {
        let err = empty::<i32>().first().await.unwrap_err();
        assert_eq!(err.to_string(), "sequence contains no elements");
    })
}

#[test]
fn works_across_container_shapes() {
    block_on(async {
        let from_vec = deferred(vec![1, 2, 3]).sum().await.unwrap();
        let from_array = deferred([1, 2, 3]).sum().await.unwrap();
        let from_deque = deferred(VecDeque::from([1, 2, 3])).sum().await.unwrap();
        assert_eq!(from_vec, 6);
        assert_eq!(from_array, 6);
        assert_eq!(from_deque, 6);
    })
}

#[test]
fn source_fault_skips_closures() {
    block_on(async {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let err = fail::<Vec<i32>>(Error::from_source("backend offline"))
            .map(move |x| {
                seen.set(seen.get() + 1);
                x + 1
            })
            .to_vec()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "backend offline");
        assert_eq!(calls.get(), 0);
    })
}

#[test]
fn cancelled_token_never_polls_the_source() {
    /// A source that fails the test if the query machinery ever reaches it.
    struct Untouchable;

    impl Future for Untouchable {
        type Output = Result<Vec<i32>, Error>;

        fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
            unreachable!("cancelled query polled its source");
        }
    }

    block_on(async {
        let token = CancelToken::new();
        token.cancel();

        let err = Untouchable
            .map(|x: i32| x + 1)
            .to_vec()
            .with_cancel(token)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    })
}

#[test]
fn untriggered_token_is_inert() {
    block_on(async {
        let token = CancelToken::new();
        let out = range(0, 4)
            .map(|x| x + 1)
            .to_vec()
            .with_cancel(token.clone())
            .await
            .unwrap();
        assert_eq!(out, vec![1, 2, 3, 4]);
        assert!(!token.is_cancelled());
    })
}

#[test]
fn to_hash_map_rejects_duplicate_keys() {
    block_on(async {
        let err = deferred(vec!["ant", "bee", "axolotl"])
            .to_hash_map(|s| s.as_bytes()[0])
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "an element with the same key has already been added"
        );
    })
}

#[test]
fn then_by_refines_without_reordering_primary_key() {
    block_on(async {
        let out = deferred(vec![("b", 2), ("a", 1), ("b", 1), ("a", 2)])
            .sorted_by_key(|pair| pair.0)
            .then_by_desc(|pair| pair.1)
            .to_vec()
            .await
            .unwrap();
        assert_eq!(out, vec![("a", 2), ("a", 1), ("b", 2), ("b", 1)]);
    })
}

#[test]
fn single_distinguishes_empty_from_crowded() {
    block_on(async {
        let only = deferred(vec![7]).single().await.unwrap();
        assert_eq!(only, 7);

        let crowded = deferred(vec![7, 8]).single().await.unwrap_err();
        assert_eq!(
            crowded.to_string(),
            "sequence contains more than one element"
        );
    })
}

#[test]
fn set_operators_compose_with_terminals() {
    block_on(async {
        let both = deferred(vec![1, 2, 3, 4])
            .intersect(vec![2, 4, 6])
            .to_vec()
            .await
            .unwrap();
        assert_eq!(both, vec![2, 4]);

        let merged = deferred(vec![1, 2])
            .union(vec![2, 3])
            .count()
            .await
            .unwrap();
        assert_eq!(merged, 3);

        let leftover = deferred(vec![1, 2, 3]).except(vec![2]).sum().await.unwrap();
        assert_eq!(leftover, 4);
    })
}

#[test]
fn join_pairs_matching_keys_in_outer_order() {
    block_on(async {
        let orders = [(1, "tea"), (2, "jam"), (1, "rye")];
        let out = deferred(vec![(1, "alice"), (2, "bob"), (3, "carol")])
            .join_on(
                orders,
                |customer| customer.0,
                |order| order.0,
                |customer, order| format!("{}:{}", customer.1, order.1),
            )
            .to_vec()
            .await
            .unwrap();
        assert_eq!(out, vec!["alice:tea", "alice:rye", "bob:jam"]);
    })
}

#[test]
fn repeat_feeds_aggregates() {
    block_on(async {
        let total = repeat(3u32, 4).sum().await.unwrap();
        assert_eq!(total, 12);

        let all_three = repeat(3u32, 4).all(|x| x == 3).await.unwrap();
        assert!(all_three);
    })
}

#[test]
fn staged_pipeline_matches_single_expression() {
    block_on(async {
        let staged = {
            let filtered = range(1, 10).filter(|x| x % 2 == 1);
            let squared = filtered.map(|x| x * x);
            squared.fold(0, |acc, x| acc + x).await.unwrap()
        };
        let direct = range(1, 10)
            .filter(|x| x % 2 == 1)
            .map(|x| x * x)
            .fold(0, |acc, x| acc + x)
            .await
            .unwrap();
        assert_eq!(staged, direct);
        assert_eq!(staged, 165);
    })
}
