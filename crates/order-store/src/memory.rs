use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    Condition, LineItemId, LineItemRecord, OrderId, OrderRecord, OrderWrite, Page, PageRequest,
    Result, SortDirection, SortKey, StoreError, TextField,
    store::{OrderStore, OrderTransaction},
};

#[derive(Debug, Clone)]
struct MemoryState {
    orders: BTreeMap<OrderId, OrderRecord>,
    next_order_id: i64,
    next_item_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            orders: BTreeMap::new(),
            next_order_id: 1,
            next_item_id: 1,
        }
    }
}

/// In-memory order store for testing and local runs.
///
/// Transactions are serialised: each one holds the store lock, works on a
/// private copy of the data and publishes it on commit.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of committed orders.
    pub async fn order_count(&self) -> usize {
        self.state.lock().await.orders.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTransaction { guard, staged })
    }
}

/// Transaction over an [`InMemoryOrderStore`].
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl OrderTransaction for InMemoryTransaction {
    async fn save(&mut self, write: OrderWrite) -> Result<OrderRecord> {
        match write {
            OrderWrite::Insert(order) => {
                let id = OrderId::new(self.staged.next_order_id);
                self.staged.next_order_id += 1;

                let mut items = Vec::with_capacity(order.items.len());
                for item in order.items {
                    let item_id = LineItemId::new(self.staged.next_item_id);
                    self.staged.next_item_id += 1;
                    items.push(LineItemRecord::from_new(item_id, item));
                }

                let record = OrderRecord {
                    id,
                    created_at: order.created_at,
                    total_amount: order.total_amount,
                    status: order.status,
                    customer_name: order.customer_name,
                    customer_phone: order.customer_phone,
                    pickup_time: order.pickup_time,
                    items,
                };
                self.staged.orders.insert(id, record.clone());
                Ok(record)
            }
            OrderWrite::UpdateStatus { id, status } => {
                let record = self
                    .staged
                    .orders
                    .get_mut(&id)
                    .ok_or(StoreError::OrderNotFound(id))?;
                record.status = status;
                Ok(record.clone())
            }
        }
    }

    async fn get_by_id(&mut self, id: OrderId) -> Result<Option<OrderRecord>> {
        Ok(self.staged.orders.get(&id).cloned())
    }

    async fn find_page(
        &mut self,
        condition: &Condition,
        page: &PageRequest,
    ) -> Result<Page<OrderRecord>> {
        // One entry per order, so item-level matches cannot duplicate rows.
        let mut matches: Vec<&OrderRecord> = self
            .staged
            .orders
            .values()
            .filter(|order| evaluate(condition, order))
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match page.sort.key {
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::TotalAmount => a.total_amount.cmp(&b.total_amount),
                SortKey::Id => Ordering::Equal,
            }
            .then(a.id.cmp(&b.id));
            match page.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matches.len() as u64;
        let content = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, page, total))
    }

    async fn commit(self) -> Result<()> {
        let Self { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}

fn evaluate(condition: &Condition, order: &OrderRecord) -> bool {
    match condition {
        Condition::All => true,
        Condition::StatusIs(status) => order.status == *status,
        Condition::IdIs(id) => order.id == *id,
        Condition::Contains { field, needle } => match field {
            TextField::CustomerName => contains_ignore_case(order.customer_name.as_deref(), needle),
            TextField::CustomerPhone => {
                contains_ignore_case(order.customer_phone.as_deref(), needle)
            }
            TextField::ItemProductName => order
                .items
                .iter()
                .any(|item| contains_ignore_case(Some(&item.product_name), needle)),
        },
        Condition::CreatedWithin(range) => range.contains(&order.created_at),
        Condition::TotalWithin(range) => range.contains(&order.total_amount),
        Condition::And(children) => children.iter().all(|c| evaluate(c, order)),
        Condition::Or(children) => children.iter().any(|c| evaluate(c, order)),
    }
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|value| value.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::{
        Money, NewLineItem, NewOrder, OrderStatus, OrderTransactionExt, ProductCategory, Range,
        Sort,
    };

    fn item(name: &str, total_cents: i64) -> NewLineItem {
        NewLineItem {
            product_front_id: Some(1),
            category: ProductCategory::Tacos,
            product_name: name.to_string(),
            base_price: Money::from_cents(total_cents),
            line_total: Money::from_cents(total_cents),
            quantity: 1,
            selections: None,
            description: None,
        }
    }

    fn new_order(customer: &str, minutes: i64, items: Vec<NewLineItem>) -> NewOrder {
        let total = Money::checked_sum(items.iter().map(|i| i.line_total)).unwrap();
        NewOrder {
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
            total_amount: total,
            status: OrderStatus::Received,
            customer_name: Some(customer.to_string()),
            customer_phone: None,
            pickup_time: None,
            items,
        }
    }

    async fn seed(store: &InMemoryOrderStore, orders: Vec<NewOrder>) -> Vec<OrderRecord> {
        let mut tx = store.begin().await.unwrap();
        let mut saved = Vec::new();
        for order in orders {
            saved.push(tx.save(OrderWrite::Insert(order)).await.unwrap());
        }
        tx.commit().await.unwrap();
        saved
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = InMemoryOrderStore::new();
        let saved = seed(
            &store,
            vec![
                new_order("a", 0, vec![item("Tacos M", 800), item("Coca", 200)]),
                new_order("b", 1, vec![item("Panini", 650)]),
            ],
        )
        .await;

        assert_eq!(saved[0].id, OrderId::new(1));
        assert_eq!(saved[1].id, OrderId::new(2));
        assert_eq!(saved[0].items[0].id, LineItemId::new(1));
        assert_eq!(saved[0].items[1].id, LineItemId::new(2));
        assert_eq!(saved[1].items[0].id, LineItemId::new(3));
        assert_eq!(store.order_count().await, 2);
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let store = InMemoryOrderStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.save(OrderWrite::Insert(new_order("a", 0, vec![item("x", 100)])))
                .await
                .unwrap();
        }
        assert_eq!(store.order_count().await, 0);

        let mut tx = store.begin().await.unwrap();
        tx.save(OrderWrite::Insert(new_order("a", 0, vec![item("x", 100)])))
            .await
            .unwrap();
        tx.rollback().await.unwrap();
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn update_status_on_missing_order_fails() {
        let store = InMemoryOrderStore::new();
        let mut tx = store.begin().await.unwrap();
        let result = tx
            .save(OrderWrite::UpdateStatus {
                id: OrderId::new(99),
                status: OrderStatus::Ready,
            })
            .await;
        assert!(matches!(result, Err(StoreError::OrderNotFound(id)) if id == OrderId::new(99)));
    }

    #[tokio::test]
    async fn update_status_keeps_items() {
        let store = InMemoryOrderStore::new();
        let saved = seed(&store, vec![new_order("a", 0, vec![item("x", 100)])]).await;

        let mut tx = store.begin().await.unwrap();
        let updated = tx
            .save(OrderWrite::UpdateStatus {
                id: saved[0].id,
                status: OrderStatus::Ready,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(updated.status, OrderStatus::Ready);
        assert_eq!(updated.items, saved[0].items);
        assert_eq!(updated.total_amount, saved[0].total_amount);
    }

    #[tokio::test]
    async fn item_match_returns_order_once() {
        let store = InMemoryOrderStore::new();
        seed(
            &store,
            vec![new_order(
                "a",
                0,
                vec![item("Tacos M", 800), item("Tacos M", 800), item("Tacos L", 900)],
            )],
        )
        .await;

        let mut tx = store.begin().await.unwrap();
        let page = tx
            .find_page(
                &Condition::contains(TextField::ItemProductName, "tacos"),
                &PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content.len(), 1);
    }

    #[tokio::test]
    async fn default_sort_is_newest_first() {
        let store = InMemoryOrderStore::new();
        seed(
            &store,
            vec![
                new_order("old", 0, vec![item("x", 100)]),
                new_order("new", 30, vec![item("x", 100)]),
                new_order("mid", 10, vec![item("x", 100)]),
            ],
        )
        .await;

        let mut tx = store.begin().await.unwrap();
        let page = tx
            .find_page(&Condition::All, &PageRequest::default())
            .await
            .unwrap();
        let names: Vec<_> = page
            .content
            .iter()
            .map(|o| o.customer_name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn pagination_slices_and_counts() {
        let store = InMemoryOrderStore::new();
        let orders = (0..5)
            .map(|i| new_order(&format!("c{i}"), i, vec![item("x", 100)]))
            .collect();
        seed(&store, orders).await;

        let mut tx = store.begin().await.unwrap();
        let request =
            PageRequest::new(1, 2).sorted_by(Sort::new(SortKey::Id, SortDirection::Asc));
        let page = tx.find_page(&Condition::All, &request).await.unwrap();

        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        let ids: Vec<_> = page.content.iter().map(|o| o.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[tokio::test]
    async fn evaluates_ranges_and_groups() {
        let store = InMemoryOrderStore::new();
        let saved = seed(
            &store,
            vec![
                new_order("alice", 0, vec![item("x", 500)]),
                new_order("bob", 10, vec![item("x", 1500)]),
                new_order("carol", 20, vec![item("x", 2500)]),
            ],
        )
        .await;

        let mut tx = store.begin().await.unwrap();
        let condition = Condition::and([
            Condition::TotalWithin(Range::new(Some(Money::from_cents(1000)), None)),
            Condition::or([
                Condition::contains(TextField::CustomerName, "BOB"),
                Condition::IdIs(saved[2].id),
            ]),
        ]);
        let page = tx
            .find_page(&condition, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 2);

        assert_eq!(tx.get_required(saved[0].id).await.unwrap().id, saved[0].id);
        let missing = tx.get_required(OrderId::new(42)).await;
        assert!(matches!(missing, Err(StoreError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn missing_customer_fields_never_match_text() {
        let store = InMemoryOrderStore::new();
        let mut anonymous = new_order("x", 0, vec![item("x", 100)]);
        anonymous.customer_name = None;
        seed(&store, vec![anonymous]).await;

        let mut tx = store.begin().await.unwrap();
        let page = tx
            .find_page(
                &Condition::contains(TextField::CustomerName, ""),
                &PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total_elements, 0);
    }
}
