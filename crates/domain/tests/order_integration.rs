//! Integration tests for the order lifecycle.
//!
//! These tests drive the service against the in-memory store and check
//! pricing, aggregate construction, filtered listing and status updates
//! end to end.

use chrono::{Duration, Utc};
use domain::{
    CartLine, CreateOrder, CustomerInfo, DomainError, Money, OrderError, OrderFilters, OrderId,
    OrderService, OrderStatus, ProductCategory, Selections, UpdateStatus,
};
use order_store::{InMemoryOrderStore, PageRequest};
use serde_json::json;

/// Helper to create a test order service
fn create_service() -> OrderService<InMemoryOrderStore> {
    OrderService::new(InMemoryOrderStore::new())
}

fn line(kind: &str, name: &str, cents: i64, quantity: i64) -> CartLine {
    CartLine::new(kind, name, quantity).with_base_price(Money::from_cents(cents))
}

async fn place(
    service: &OrderService<InMemoryOrderStore>,
    customer: CustomerInfo,
    items: Vec<CartLine>,
) -> OrderId {
    service
        .create(CreateOrder::new(customer, items))
        .await
        .unwrap()
        .id
}

fn list_filters() -> OrderFilters {
    OrderFilters::default()
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn tex_mex_example() {
        let service = create_service();

        let summary = service
            .create(CreateOrder::anonymous(vec![line("tex-mex", "Nachos", 1000, 2)]))
            .await
            .unwrap();

        assert_eq!(summary.status, OrderStatus::Received);
        assert_eq!(summary.total_amount, "20.00".parse::<Money>().unwrap());

        let details = service.get_details(summary.id).await.unwrap();
        assert_eq!(details.items[0].category, ProductCategory::Texmex);
        assert_eq!(details.items[0].line_total, Money::from_cents(2000));
    }

    #[tokio::test]
    async fn total_is_exact_sum_of_line_totals() {
        let service = create_service();

        let summary = service
            .create(CreateOrder::anonymous(vec![
                line("drink", "Eau", 10, 3),
                line("dessert", "Tiramisu", 20, 1),
                line("tacos", "Tacos XL", 1290, 1).with_total_price("9.99".parse().unwrap()),
            ]))
            .await
            .unwrap();

        assert_eq!(summary.total_amount, "10.49".parse::<Money>().unwrap());
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_and_not_stored() {
        let service = create_service();

        let result = service.create(CreateOrder::anonymous(vec![])).await;

        assert!(matches!(result, Err(DomainError::Order(OrderError::EmptyCart))));
        assert_eq!(service.store().order_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_category_names_the_value() {
        let service = create_service();

        let err = service
            .create(CreateOrder::anonymous(vec![line("ramen", "Shoyu", 1200, 1)]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("ramen"));
        assert_eq!(service.store().order_count().await, 0);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let service = create_service();

        let result = service
            .create(CreateOrder::anonymous(vec![line("tacos", "Tacos", 850, 0)]))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::InvalidQuantity { quantity: 0 }))
        ));
    }

    #[tokio::test]
    async fn details_round_trip_items_and_selections() {
        let service = create_service();
        let document = json!({
            "meats": ["poulet", "cordon bleu"],
            "sauces": ["algerienne"],
            "extras": [{"name": "cheddar", "price": 1.0}]
        });

        let id = place(
            &service,
            CustomerInfo::new("Alice", "06 12 34 56 78"),
            vec![
                line("tacos", "Tacos M", 850, 1)
                    .with_front_id(12)
                    .with_description("poulet, cordon bleu")
                    .with_selections(document.clone()),
                line("boisson", "Coca", 200, 2),
            ],
        )
        .await;

        let details = service.get_details(id).await.unwrap();

        assert_eq!(details.item_count, 2);
        assert_eq!(details.items[0].product_name, "Tacos M");
        assert_eq!(details.items[0].product_front_id, Some(12));
        assert_eq!(details.items[1].category, ProductCategory::Drink);
        assert_eq!(details.items[1].selections, None);

        let stored = details.items[0].selections.as_deref().unwrap();
        assert_eq!(Selections::decode(stored).unwrap().into_value(), document);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn no_filters_returns_every_order_once() {
        let service = create_service();
        place(&service, CustomerInfo::default(), vec![line("tacos", "A", 100, 1)]).await;
        place(
            &service,
            CustomerInfo::default(),
            vec![line("tacos", "B", 100, 1), line("tacos", "C", 100, 1)],
        )
        .await;

        let page = service
            .list(&list_filters(), &PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 2);
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].item_count, 2);
    }

    #[tokio::test]
    async fn product_name_search_returns_parent_once() {
        let service = create_service();
        let id = place(
            &service,
            CustomerInfo::new("Bob", "0700000000"),
            vec![
                line("panini", "Panini Poulet", 650, 1),
                line("panini", "Panini Poulet", 650, 1),
            ],
        )
        .await;
        place(&service, CustomerInfo::new("Eve", "0711111111"), vec![line("bowl", "Bowl", 900, 1)]).await;

        let filters = OrderFilters {
            q: Some("Panini Poulet".into()),
            ..list_filters()
        };
        let page = service.list(&filters, &PageRequest::default()).await.unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].id, id);
    }

    #[tokio::test]
    async fn numeric_search_matches_id() {
        let service = create_service();
        place(&service, CustomerInfo::new("Alice", "0613456789"), vec![line("tacos", "A", 100, 1)]).await;
        let second = place(&service, CustomerInfo::new("Bob", "0699999999"), vec![line("tacos", "B", 100, 1)]).await;

        let filters = OrderFilters {
            q: Some(second.to_string()),
            ..list_filters()
        };
        let page = service.list(&filters, &PageRequest::default()).await.unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].id, second);
    }

    #[tokio::test]
    async fn date_range_bounds_are_inclusive() {
        let service = create_service();
        let first = place(&service, CustomerInfo::default(), vec![line("tacos", "A", 100, 1)]).await;
        let second = place(&service, CustomerInfo::default(), vec![line("tacos", "B", 100, 1)]).await;

        let first_at = service.get_details(first).await.unwrap().created_at;
        let second_at = service.get_details(second).await.unwrap().created_at;

        let both = OrderFilters {
            created_from: Some(first_at),
            created_to: Some(second_at),
            ..list_filters()
        };
        let page = service.list(&both, &PageRequest::default()).await.unwrap();
        assert_eq!(page.total_elements, 2);

        let from_only = OrderFilters {
            created_from: Some(second_at),
            ..list_filters()
        };
        let page = service.list(&from_only, &PageRequest::default()).await.unwrap();
        assert!(page.content.iter().any(|o| o.id == second));
        assert!(page.content.iter().all(|o| o.created_at >= second_at));

        let future = OrderFilters {
            created_from: Some(Utc::now() + Duration::hours(1)),
            ..list_filters()
        };
        let page = service.list(&future, &PageRequest::default()).await.unwrap();
        assert_eq!(page.total_elements, 0);
    }

    #[tokio::test]
    async fn filters_combine_with_and() {
        let service = create_service();
        let cheap = place(&service, CustomerInfo::new("Alice", "0612345678"), vec![line("tacos", "A", 500, 1)]).await;
        let pricey = place(&service, CustomerInfo::new("Alice", "0612345678"), vec![line("tacos", "B", 2500, 1)]).await;
        place(&service, CustomerInfo::new("Bob", "0799999999"), vec![line("tacos", "C", 2500, 1)]).await;

        service
            .update_status(UpdateStatus::new(cheap, OrderStatus::Ready))
            .await
            .unwrap();

        let filters = OrderFilters {
            customer_name: Some("alice".into()),
            min_total: Some(Money::from_cents(1000)),
            status: Some(OrderStatus::Received),
            ..list_filters()
        };
        let page = service.list(&filters, &PageRequest::default()).await.unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].id, pricey);
    }

    #[tokio::test]
    async fn pages_report_totals() {
        let service = create_service();
        for i in 0..5 {
            place(&service, CustomerInfo::default(), vec![line("tacos", &format!("T{i}"), 100, 1)]).await;
        }

        let page = service
            .list(&list_filters(), &PageRequest::new(1, 2))
            .await
            .unwrap();

        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
    }
}

mod status {
    use super::*;

    #[tokio::test]
    async fn update_missing_order_is_not_found_and_changes_nothing() {
        let service = create_service();
        let id = place(&service, CustomerInfo::default(), vec![line("tacos", "A", 100, 1)]).await;

        let result = service
            .update_status(UpdateStatus::new(OrderId::new(id.as_i64() + 100), OrderStatus::Ready))
            .await;

        assert!(matches!(result, Err(DomainError::OrderNotFound(_))));
        assert_eq!(service.store().order_count().await, 1);
        assert_eq!(
            service.get_details(id).await.unwrap().status,
            OrderStatus::Received
        );
    }

    #[tokio::test]
    async fn status_change_keeps_items_and_total() {
        let service = create_service();
        let id = place(
            &service,
            CustomerInfo::default(),
            vec![line("burger", "Burger", 1100, 1), line("side", "Frites", 300, 1)],
        )
        .await;

        service
            .update_status(UpdateStatus::new(id, OrderStatus::InPreparation))
            .await
            .unwrap();

        let details = service.get_details(id).await.unwrap();
        assert_eq!(details.status, OrderStatus::InPreparation);
        assert_eq!(details.items.len(), 2);
        assert_eq!(details.total_amount, Money::from_cents(1400));
    }

    #[tokio::test]
    async fn any_transition_is_allowed() {
        let service = create_service();
        let id = place(&service, CustomerInfo::default(), vec![line("tacos", "A", 100, 1)]).await;

        for status in [
            OrderStatus::Cancelled,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Received,
        ] {
            let summary = service
                .update_status(UpdateStatus::new(id, status))
                .await
                .unwrap();
            assert_eq!(summary.status, status);
        }
    }
}
