use chrono::{Duration, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use order_store::{
    Condition, InMemoryOrderStore, Money, NewLineItem, NewOrder, OrderStatus, OrderStore,
    OrderTransaction, OrderWrite, PageRequest, ProductCategory, Range, TextField,
};

fn make_order(index: i64) -> NewOrder {
    let items: Vec<_> = (0..3)
        .map(|n| NewLineItem {
            product_front_id: Some(n),
            category: ProductCategory::Tacos,
            product_name: format!("Tacos {n}"),
            base_price: Money::from_cents(750),
            line_total: Money::from_cents(750),
            quantity: 1,
            selections: None,
            description: None,
        })
        .collect();

    NewOrder {
        created_at: Utc::now() - Duration::minutes(index),
        total_amount: Money::checked_sum(items.iter().map(|i| i.line_total)).unwrap(),
        status: OrderStatus::Received,
        customer_name: Some(format!("Customer {index}")),
        customer_phone: None,
        pickup_time: None,
        items,
    }
}

fn seeded_store(rt: &tokio::runtime::Runtime, count: i64) -> InMemoryOrderStore {
    let store = InMemoryOrderStore::new();
    rt.block_on(async {
        let mut tx = store.begin().await.unwrap();
        for i in 0..count {
            tx.save(OrderWrite::Insert(make_order(i))).await.unwrap();
        }
        tx.commit().await.unwrap();
    });
    store
}

fn bench_find_page_unfiltered(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = seeded_store(&rt, 1_000);

    c.bench_function("order_store/find_page_all", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut tx = store.begin().await.unwrap();
                tx.find_page(&Condition::All, &PageRequest::default())
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_find_page_search(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = seeded_store(&rt, 1_000);
    let condition = Condition::and([
        Condition::TotalWithin(Range::new(Some(Money::from_cents(1000)), None)),
        Condition::or([
            Condition::contains(TextField::CustomerName, "tacos 2"),
            Condition::contains(TextField::ItemProductName, "tacos 2"),
        ]),
    ]);

    c.bench_function("order_store/find_page_search", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut tx = store.begin().await.unwrap();
                tx.find_page(&condition, &PageRequest::default())
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_find_page_unfiltered, bench_find_page_search);
criterion_main!(benches);
