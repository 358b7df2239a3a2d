//! Quote cache behavior under concurrent writers and readers.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use cryptogap::application::cache::QuoteCache;
use cryptogap::testkit::domain::{exchange, quote, quote_at, symbols};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_observe_a_half_applied_batch() {
    let cache = Arc::new(QuoteCache::new(Duration::from_secs(60)));
    let tracked = symbols(&["BTC/USD"]);

    let writer = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            for i in 1..=500u32 {
                let px = Decimal::from(100 + i);
                // Both exchanges move together; a reader must see them in step.
                cache.apply([
                    quote("a", "BTC/USD", px, px + dec!(1)),
                    quote("b", "BTC/USD", px, px + dec!(1)),
                ]);
                tokio::task::yield_now().await;
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let tracked = tracked.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    let snapshot = cache.snapshot_all(&tracked, Utc::now());
                    let a = snapshot.fresh(&exchange("a"), &tracked[0]).map(|q| q.bid());
                    let b = snapshot.fresh(&exchange("b"), &tracked[0]).map(|q| q.bid());
                    assert_eq!(a, b);
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    let last = cache.get(&exchange("a"), &tracked[0]).unwrap();
    assert_eq!(last.bid(), dec!(600));
}

#[test]
fn snapshot_marks_old_quotes_stale_but_keeps_them() {
    let cache = QuoteCache::new(Duration::from_secs(10));
    let now = Utc::now();
    cache.update(quote_at("a", "BTC/USD", dec!(100), dec!(101), now - chrono::Duration::seconds(11)));
    cache.update(quote_at("b", "BTC/USD", dec!(100), dec!(101), now));

    let tracked = symbols(&["BTC/USD"]);
    let snapshot = cache.snapshot_all(&tracked, now);

    let a = snapshot.entry(&exchange("a"), &tracked[0]).unwrap();
    assert!(a.is_stale());
    assert!(snapshot.fresh(&exchange("a"), &tracked[0]).is_none());
    assert!(snapshot.fresh(&exchange("b"), &tracked[0]).is_some());
    assert_eq!(snapshot.fresh_count(&exchange("b")), 1);
    assert_eq!(snapshot.len(), 2);
}
