use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction, postgres::PgRow};

use crate::{
    Condition, LineItemId, LineItemRecord, Money, NewLineItem, NewOrder, OrderId, OrderRecord,
    OrderStatus, OrderWrite, Page, PageRequest, ProductCategory, Range, Result, SortDirection,
    SortKey, StoreError, TextField,
    store::{OrderStore, OrderTransaction},
};

const ORDER_COLUMNS: &str = "o.id, o.created_at, o.total_amount, o.status, o.customer_name, o.customer_phone, o.pickup_time";

const ITEM_COLUMNS: &str = "id, order_id, product_front_id, category, product_name, base_price, line_total, quantity, selections, description";

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    type Transaction = PostgresTransaction;

    async fn begin(&self) -> Result<PostgresTransaction> {
        let tx = self.pool.begin().await?;
        Ok(PostgresTransaction { tx })
    }
}

/// Transaction over a [`PostgresOrderStore`].
///
/// Rolled back by sqlx when dropped uncommitted.
pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PostgresTransaction {
    async fn insert(&mut self, order: NewOrder) -> Result<OrderId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (created_at, total_amount, status, customer_name, customer_phone, pickup_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(order.created_at)
        .bind(order.total_amount.amount())
        .bind(order.status.as_str())
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(order.pickup_time)
        .fetch_one(&mut *self.tx)
        .await?;

        for item in &order.items {
            self.insert_item(id, item).await?;
        }

        Ok(OrderId::new(id))
    }

    async fn insert_item(&mut self, order_id: i64, item: &NewLineItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, product_front_id, category, product_name, base_price, line_total, quantity, selections, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(order_id)
        .bind(item.product_front_id)
        .bind(item.category.as_str())
        .bind(&item.product_name)
        .bind(item.base_price.amount())
        .bind(item.line_total.amount())
        .bind(i32::try_from(item.quantity).map_err(|_| {
            StoreError::Corrupt(format!("quantity {} out of range", item.quantity))
        })?)
        .bind(&item.selections)
        .bind(&item.description)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    /// Loads the line items of several orders in one round trip.
    async fn load_items(&mut self, order_ids: &[i64]) -> Result<HashMap<i64, Vec<LineItemRecord>>> {
        let mut grouped: HashMap<i64, Vec<LineItemRecord>> = HashMap::new();
        if order_ids.is_empty() {
            return Ok(grouped);
        }

        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY order_id ASC, id ASC"
        ))
        .bind(order_ids)
        .fetch_all(&mut *self.tx)
        .await?;

        for row in rows {
            let order_id: i64 = row.try_get("order_id")?;
            grouped
                .entry(order_id)
                .or_default()
                .push(row_to_item(&row)?);
        }

        Ok(grouped)
    }

    async fn attach_items(&mut self, rows: Vec<PgRow>) -> Result<Vec<OrderRecord>> {
        let ids = rows
            .iter()
            .map(|row| row.try_get::<i64, _>("id"))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut items = self.load_items(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let id: i64 = row.try_get("id")?;
                row_to_order(&row, items.remove(&id).unwrap_or_default())
            })
            .collect()
    }
}

#[async_trait]
impl OrderTransaction for PostgresTransaction {
    async fn save(&mut self, write: OrderWrite) -> Result<OrderRecord> {
        let id = match write {
            OrderWrite::Insert(order) => self.insert(order).await?,
            OrderWrite::UpdateStatus { id, status } => {
                let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
                    .bind(status.as_str())
                    .bind(id.as_i64())
                    .execute(&mut *self.tx)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(StoreError::OrderNotFound(id));
                }
                id
            }
        };

        // Read back so callers see exactly what the columns hold.
        self.get_by_id(id)
            .await?
            .ok_or(StoreError::OrderNotFound(id))
    }

    async fn get_by_id(&mut self, id: OrderId) -> Result<Option<OrderRecord>> {
        let row: Option<PgRow> = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&mut *self.tx)
        .await?;

        match row {
            Some(row) => Ok(self.attach_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_page(
        &mut self,
        condition: &Condition,
        page: &PageRequest,
    ) -> Result<Page<OrderRecord>> {
        let join = condition.requires_item_join();

        let mut count = QueryBuilder::<Postgres>::new(if join {
            "SELECT COUNT(DISTINCT o.id) FROM orders o LEFT JOIN order_items i ON i.order_id = o.id WHERE "
        } else {
            "SELECT COUNT(*) FROM orders o WHERE "
        });
        push_condition(&mut count, condition);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&mut *self.tx)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT ");
        if join {
            // An order with several matching items would otherwise come back once per item.
            select.push("DISTINCT ");
        }
        select.push(ORDER_COLUMNS).push(" FROM orders o");
        if join {
            select.push(" LEFT JOIN order_items i ON i.order_id = o.id");
        }
        select.push(" WHERE ");
        push_condition(&mut select, condition);

        let direction = match page.sort.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        match page.sort.key {
            SortKey::CreatedAt => select.push(format!(" ORDER BY o.created_at {direction}, o.id {direction}")),
            SortKey::TotalAmount => select.push(format!(" ORDER BY o.total_amount {direction}, o.id {direction}")),
            SortKey::Id => select.push(format!(" ORDER BY o.id {direction}")),
        };
        select
            .push(" LIMIT ")
            .push_bind(i64::from(page.size))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = select.build().fetch_all(&mut *self.tx).await?;
        let content = self.attach_items(rows).await?;

        Ok(Page::new(content, page, u64::try_from(total).unwrap_or(0)))
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

/// Appends the SQL form of `condition`, binding every value.
fn push_condition<'args>(qb: &mut QueryBuilder<'args, Postgres>, condition: &Condition) {
    match condition {
        Condition::All => {
            qb.push("TRUE");
        }
        Condition::StatusIs(status) => {
            qb.push("o.status = ").push_bind(status.as_str());
        }
        Condition::IdIs(id) => {
            qb.push("o.id = ").push_bind(id.as_i64());
        }
        Condition::Contains { field, needle } => {
            let column = match field {
                TextField::CustomerName => "o.customer_name",
                TextField::CustomerPhone => "o.customer_phone",
                TextField::ItemProductName => "i.product_name",
            };
            qb.push("LOWER(")
                .push(column)
                .push(") LIKE ")
                .push_bind(like_pattern(needle));
        }
        Condition::CreatedWithin(range) => push_range(qb, "o.created_at", range),
        Condition::TotalWithin(range) => {
            let decimal = Range::new(
                range.from.map(|m| m.amount()),
                range.to.map(|m| m.amount()),
            );
            push_range::<Decimal>(qb, "o.total_amount", &decimal)
        }
        Condition::And(children) => push_group(qb, children, " AND ", "TRUE"),
        Condition::Or(children) => push_group(qb, children, " OR ", "FALSE"),
    }
}

fn push_group<'args>(
    qb: &mut QueryBuilder<'args, Postgres>,
    children: &[Condition],
    separator: &str,
    empty: &str,
) {
    if children.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            qb.push(separator);
        }
        push_condition(qb, child);
    }
    qb.push(")");
}

fn push_range<'args, T>(qb: &mut QueryBuilder<'args, Postgres>, column: &str, range: &Range<T>)
where
    T: 'args + Copy + Send + sqlx::Encode<'args, Postgres> + sqlx::Type<Postgres>,
{
    match (range.from, range.to) {
        (Some(from), Some(to)) => {
            qb.push(column)
                .push(" BETWEEN ")
                .push_bind(from)
                .push(" AND ")
                .push_bind(to);
        }
        (Some(from), None) => {
            qb.push(column).push(" >= ").push_bind(from);
        }
        (None, Some(to)) => {
            qb.push(column).push(" <= ").push_bind(to);
        }
        (None, None) => {
            qb.push("TRUE");
        }
    }
}

/// Wraps a needle in `%` wildcards, escaping LIKE metacharacters.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn row_to_order(row: &PgRow, items: Vec<LineItemRecord>) -> Result<OrderRecord> {
    let status: String = row.try_get("status")?;
    let total: Decimal = row.try_get("total_amount")?;

    Ok(OrderRecord {
        id: OrderId::new(row.try_get("id")?),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        total_amount: Money::new(total),
        status: status
            .parse::<OrderStatus>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        customer_name: row.try_get("customer_name")?,
        customer_phone: row.try_get("customer_phone")?,
        pickup_time: row.try_get::<Option<NaiveDateTime>, _>("pickup_time")?,
        items,
    })
}

fn row_to_item(row: &PgRow) -> Result<LineItemRecord> {
    let category: String = row.try_get("category")?;
    let quantity: i32 = row.try_get("quantity")?;

    Ok(LineItemRecord {
        id: LineItemId::new(row.try_get("id")?),
        product_front_id: row.try_get("product_front_id")?,
        category: category
            .parse::<ProductCategory>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        product_name: row.try_get("product_name")?,
        base_price: Money::new(row.try_get("base_price")?),
        line_total: Money::new(row.try_get("line_total")?),
        quantity: u32::try_from(quantity)
            .map_err(|_| StoreError::Corrupt(format!("negative quantity {quantity}")))?,
        selections: row.try_get("selections")?,
        description: row.try_get("description")?,
    })
}
