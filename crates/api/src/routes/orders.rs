//! Order intake, listing and status endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, NaiveDateTime, Utc};
use common::{Money, OrderId, OrderStatus};
use domain::{
    CartLine, CreateOrder, CustomerInfo, OrderDetails, OrderFilters, OrderListItem,
    OrderService, OrderSummary, Selections, UpdateStatus,
};
use order_store::{OrderStore, Page, PageRequest, Sort, SortDirection, SortKey};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, FieldError};

const CUSTOMER_NAME_MAX_CHARS: usize = 100;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub order_service: OrderService<S>,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    /// Shop-local pickup time.
    pub pickup_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    #[serde(alias = "id")]
    pub product_id_front: Option<i64>,
    #[serde(alias = "name")]
    pub product_name: Option<String>,
    #[serde(alias = "type")]
    pub product_type: Option<String>,
    pub base_price: Option<Money>,
    pub total_price: Option<Money>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
    pub selections: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Query parameters of `GET /api/orders`.
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersParams {
    pub status: Option<String>,
    pub q: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub min_total: Option<String>,
    pub max_total: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `field[,asc|desc]`
    pub sort: Option<String>,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        }
    }
}

// -- Validation --

impl CreateOrderRequest {
    /// Collects every structural problem of the payload.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();

        if self.items.is_empty() {
            errors.push(FieldError::new("items", "must contain at least one item"));
        }
        if let Some(name) = &self.customer_name
            && name.chars().count() > CUSTOMER_NAME_MAX_CHARS
        {
            errors.push(FieldError::new(
                "customer_name",
                format!("must be at most {CUSTOMER_NAME_MAX_CHARS} characters"),
            ));
        }
        if let Some(phone) = &self.customer_phone
            && !is_valid_phone(phone)
        {
            errors.push(FieldError::new(
                "customer_phone",
                "must be 8 to 20 digits, spaces or '+'",
            ));
        }

        for (index, item) in self.items.iter().enumerate() {
            if is_blank(item.product_name.as_deref()) {
                errors.push(FieldError::new(
                    format!("items[{index}].product_name"),
                    "must not be blank",
                ));
            }
            if is_blank(item.product_type.as_deref()) {
                errors.push(FieldError::new(
                    format!("items[{index}].product_type"),
                    "must not be blank",
                ));
            }
            match item.quantity {
                None => errors.push(FieldError::new(
                    format!("items[{index}].quantity"),
                    "must not be null",
                )),
                Some(quantity) if quantity < 1 => errors.push(FieldError::new(
                    format!("items[{index}].quantity"),
                    "must be greater than or equal to 1",
                )),
                Some(_) => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }

    /// Converts a validated payload into the domain command.
    pub fn into_command(self) -> CreateOrder {
        let customer = CustomerInfo {
            name: self.customer_name,
            phone: self.customer_phone,
            pickup_time: self.pickup_time,
        };
        let items = self
            .items
            .into_iter()
            .map(|item| CartLine {
                product_front_id: item.product_id_front,
                product_type: item.product_type,
                product_name: item.product_name.unwrap_or_default(),
                base_price: item.base_price,
                total_price: item.total_price,
                quantity: item.quantity.unwrap_or_default(),
                description: item.description,
                selections: item.selections.map(Selections::new),
            })
            .collect();

        CreateOrder::new(customer, items)
    }
}

fn is_blank(text: Option<&str>) -> bool {
    text.is_none_or(|text| text.trim().is_empty())
}

/// Loose phone shape: 8 to 20 characters among digits, spaces and `+`.
fn is_valid_phone(phone: &str) -> bool {
    let len = phone.chars().count();
    (8..=20).contains(&len) && phone.chars().all(|c| c.is_ascii_digit() || c == '+' || c == ' ')
}

// -- Query parsing --

impl ListOrdersParams {
    /// Parses the filter parameters.
    pub fn filters(&self) -> Result<OrderFilters, ApiError> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse::<OrderStatus>()
                    .map_err(|e| ApiError::BadRequest(e.to_string()))
            })
            .transpose()?;

        Ok(OrderFilters {
            status,
            q: self.q.clone(),
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            created_from: parse_optional(self.from.as_deref(), "from", parse_instant)?,
            created_to: parse_optional(self.to.as_deref(), "to", parse_instant)?,
            min_total: parse_optional(self.min_total.as_deref(), "min_total", |s| {
                s.parse::<Money>().ok()
            })?,
            max_total: parse_optional(self.max_total.as_deref(), "max_total", |s| {
                s.parse::<Money>().ok()
            })?,
        })
    }

    /// Parses paging and sorting.
    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        let request = PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(PageRequest::DEFAULT_SIZE),
        );

        match self.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(sort) => Ok(request.sorted_by(parse_sort(sort)?)),
            None => Ok(request),
        }
    }
}

fn parse_optional<T>(
    value: Option<&str>,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse(v)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid value for '{name}': {v}"))),
        None => Ok(None),
    }
}

/// Accepts RFC 3339 or a naive date-time, the latter read as UTC.
fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            text.parse::<NaiveDateTime>()
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn parse_sort(text: &str) -> Result<Sort, ApiError> {
    let mut parts = text.split(',').map(str::trim);

    let key = match parts.next().unwrap_or_default() {
        "created_at" | "createdAt" => SortKey::CreatedAt,
        "total_amount" | "totalAmount" => SortKey::TotalAmount,
        "id" => SortKey::Id,
        other => return Err(ApiError::BadRequest(format!("Unknown sort field: {other}"))),
    };

    let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
        None | Some("asc") => SortDirection::Asc,
        Some("desc") => SortDirection::Desc,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "Unknown sort direction: {other}"
            )));
        }
    };

    Ok(Sort::new(key, direction))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    id.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid order id: {id}")))
}

// -- Handlers --

/// POST /api/orders: price a cart and store it as a new order.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderSummary>), ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let summary = state.order_service.create(req.into_command()).await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/orders: filtered, paged order listing.
#[tracing::instrument(skip(state, params))]
pub async fn list<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<ListOrdersParams>, QueryRejection>,
) -> Result<Json<PageResponse<OrderListItem>>, ApiError> {
    let Query(params) = params?;
    let filters = params.filters()?;
    let page_request = params.page_request()?;

    let page = state.order_service.list(&filters, &page_request).await?;

    Ok(Json(page.into()))
}

/// GET /api/orders/{id}: full order with its line items.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderDetails>, ApiError> {
    let order_id = parse_order_id(&id)?;

    let details = state.order_service.get_details(order_id).await?;

    Ok(Json(details))
}

/// PATCH /api/orders/{id}/status: overwrite the status of an order.
#[tracing::instrument(skip(state, payload))]
pub async fn update_status<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<OrderSummary>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let Json(req) = payload?;

    let status = match req.status.as_deref().map(str::trim) {
        None | Some("") => {
            return Err(ApiError::Validation(vec![FieldError::new(
                "status",
                "must not be null",
            )]));
        }
        Some(status) => status.parse::<OrderStatus>().map_err(|e| {
            ApiError::Validation(vec![FieldError::new("status", e.to_string())])
        })?,
    };

    let summary = state
        .order_service
        .update_status(UpdateStatus::new(order_id, status))
        .await?;

    Ok(Json(summary))
}
