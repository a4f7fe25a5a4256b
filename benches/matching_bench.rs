use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use matchbook::{MatchingEngine, OrderType, Side, SubmitRequest};

const SYMBOL: &str = "BTC-USD";

fn limit(side: Side, price: Decimal, quantity: Decimal) -> SubmitRequest {
    SubmitRequest {
        symbol: SYMBOL.to_string(),
        order_type: OrderType::Limit,
        side,
        quantity,
        price: Some(price),
    }
}

/// Rest a bid and cancel it again: exercises level creation and teardown plus
/// the cancellation index without growing the book.
fn bench_rest_and_cancel(c: &mut Criterion) {
    let engine = MatchingEngine::new();
    c.bench_function("rest_then_cancel", |b| {
        b.iter(|| {
            let result = engine.submit(limit(Side::Buy, dec!(50000), dec!(1)));
            engine.cancel(SYMBOL, result.order_id).unwrap();
        })
    });
}

/// A maker and a matching taker per iteration: exercises the full match loop
/// and trade construction, leaving the book empty each round.
fn bench_cross_pair(c: &mut Criterion) {
    let engine = MatchingEngine::new();
    c.bench_function("cross_pair", |b| {
        b.iter(|| {
            engine.submit(limit(Side::Sell, dec!(50000), dec!(1)));
            black_box(engine.submit(limit(Side::Buy, dec!(50000), dec!(1))));
        })
    });
}

/// Sweep ten price levels with one market order: exercises the ladder walk.
fn bench_market_sweep(c: &mut Criterion) {
    let engine = MatchingEngine::new();
    c.bench_function("market_sweep_10_levels", |b| {
        b.iter(|| {
            for i in 0..10 {
                engine.submit(limit(
                    Side::Sell,
                    dec!(50000) + Decimal::from(i),
                    dec!(1),
                ));
            }
            black_box(engine.submit(SubmitRequest {
                symbol: SYMBOL.to_string(),
                order_type: OrderType::Market,
                side: Side::Buy,
                quantity: dec!(10),
                price: None,
            }));
        })
    });
}

criterion_group!(
    benches,
    bench_rest_and_cancel,
    bench_cross_pair,
    bench_market_sweep
);
criterion_main!(benches);
