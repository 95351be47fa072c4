use criterion::{Criterion, criterion_group, criterion_main};
use order_book_engine::order::{Order, OrderType, Side};
use order_book_engine::orderbook::Orderbook;

fn limit_order(id: u64, side: Side, size: u64) -> Order {
    Order {
        id,
        user_id: 1,
        side,
        order_type: OrderType::Limit,
        market: "BTC_USD".into(),
        size,
        timestamp: 0,
        resting_at: None,
    }
}

fn market_order(id: u64, side: Side, size: u64) -> Order {
    Order {
        order_type: OrderType::Market,
        ..limit_order(id, side, size)
    }
}

fn setup_order_book(depth: u64, orders_per_level: u64) -> Orderbook {
    let mut ob = Orderbook::new();
    for price in 1..=depth {
        for i in 0..orders_per_level {
            ob.place_limit_order(price, limit_order(price * 1_000 + i, Side::Ask, 1));
            ob.place_limit_order(price, limit_order((depth + price) * 1_000 + i, Side::Bid, 1));
        }
    }
    ob
}

fn bench_match_order(c: &mut Criterion) {
    let depth = 100;
    let orders_per_level = 10;

    c.bench_function("market order walks half the book", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                let market_buy = market_order(0, Side::Bid, depth * orders_per_level / 2);
                ob.place_market_order(market_buy);
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("cancel a deeply resting order", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                ob.cancel_order(depth * 1_000);
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_match_order);
criterion_main!(benches);
