//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use exchange_rates::{CurrencyCode, RateTable};
    use storefront_types::{
        CreateItemFields, DomainError, OrderId, OrderSource, PaymentStatus, Percentage,
        PricingRule, RepoError, RuleKind, ShopRepository,
    };

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn rates() -> RateTable {
        RateTable::new(CurrencyCode::USD, CurrencyCode::EUR, 0.90).unwrap()
    }

    async fn seed_item(repo: &SqliteRepo, name: &str, price: i64) -> storefront_types::Item {
        repo.create_item(CreateItemFields {
            name: name.to_string(),
            description: None,
            price,
            currency: CurrencyCode::USD,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_item() {
        let repo = setup_repo().await;

        let created = seed_item(&repo, "Espresso cup", 1_250).await;
        let fetched = repo.get_item(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Espresso cup");
        assert_eq!(fetched.price, 1_250);
        assert_eq!(fetched.currency, CurrencyCode::USD);
    }

    #[tokio::test]
    async fn test_get_item_not_found() {
        let repo = setup_repo().await;

        let result = repo
            .get_item(storefront_types::ItemId::new())
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_items() {
        let repo = setup_repo().await;

        seed_item(&repo, "Mug", 1_500).await;
        seed_item(&repo, "Plate", 2_000).await;

        let items = repo.list_items().await.unwrap();

        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_cart_add_item_sums_quantities() {
        let repo = setup_repo().await;
        let item = seed_item(&repo, "Mug", 1_500).await;

        let cart = repo.create_cart().await.unwrap();
        repo.add_cart_item(cart.id, item.id, 2).await.unwrap();
        let line = repo.add_cart_item(cart.id, item.id, 1).await.unwrap();

        assert_eq!(line.quantity, 3);

        let fetched = repo.get_cart(cart.id).await.unwrap().unwrap();
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].quantity, 3);
        assert_eq!(fetched.total_price(), 4_500);
    }

    #[tokio::test]
    async fn test_add_item_to_missing_cart() {
        let repo = setup_repo().await;
        let item = seed_item(&repo, "Mug", 1_500).await;

        let result = repo
            .add_cart_item(storefront_types::CartId::new(), item.id, 1)
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_add_missing_item_to_cart() {
        let repo = setup_repo().await;
        let cart = repo.create_cart().await.unwrap();

        let result = repo
            .add_cart_item(cart.id, storefront_types::ItemId::new(), 1)
            .await;

        assert!(matches!(
            result,
            Err(RepoError::Domain(DomainError::ItemNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_cart() {
        let repo = setup_repo().await;
        let cart = repo.create_cart().await.unwrap();

        assert!(repo.delete_cart(cart.id).await.unwrap());
        assert!(repo.get_cart(cart.id).await.unwrap().is_none());
        assert!(!repo.delete_cart(cart.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_build_order_single_item_converts_currency() {
        let repo = setup_repo().await;
        let item = seed_item(&repo, "Lamp", 10_000).await;

        let order = repo
            .build_order(OrderSource::SingleItem(item.id), CurrencyCode::EUR, &rates())
            .await
            .unwrap();

        // $100.00 at 0.90 -> €90.00
        assert_eq!(order.order_currency, CurrencyCode::EUR);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 1);
        assert_eq!(order.items[0].unit_price, 9_000);
        assert_eq!(order.subtotal, 9_000);
        assert_eq!(order.total, 9_000);
        assert!(order.payment_intent_id.is_none());
    }

    #[tokio::test]
    async fn test_build_order_same_currency_keeps_price() {
        let repo = setup_repo().await;
        let item = seed_item(&repo, "Lamp", 10_000).await;

        let order = repo
            .build_order(OrderSource::SingleItem(item.id), CurrencyCode::USD, &rates())
            .await
            .unwrap();

        assert_eq!(order.items[0].unit_price, 10_000);
        assert_eq!(order.total, 10_000);
    }

    #[tokio::test]
    async fn test_build_order_missing_item() {
        let repo = setup_repo().await;

        let result = repo
            .build_order(
                OrderSource::SingleItem(storefront_types::ItemId::new()),
                CurrencyCode::USD,
                &rates(),
            )
            .await;

        assert!(matches!(
            result,
            Err(RepoError::Domain(DomainError::ItemNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_build_order_from_cart_applies_active_rules() {
        let repo = setup_repo().await;
        let mug = seed_item(&repo, "Mug", 1_000).await;
        let plate = seed_item(&repo, "Plate", 500).await;

        let discount = repo
            .create_rule(
                PricingRule::new(
                    RuleKind::Discount,
                    "Launch discount".to_string(),
                    Percentage::from_percent(10.0).unwrap(),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        let tax = repo
            .create_rule(
                PricingRule::new(
                    RuleKind::Tax,
                    "VAT".to_string(),
                    Percentage::from_percent(5.0).unwrap(),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        repo.activate_rule(discount.id).await.unwrap();
        repo.activate_rule(tax.id).await.unwrap();

        let cart = repo.create_cart().await.unwrap();
        repo.add_cart_item(cart.id, mug.id, 2).await.unwrap();
        repo.add_cart_item(cart.id, plate.id, 1).await.unwrap();

        let order = repo
            .build_order(OrderSource::Cart(cart.id), CurrencyCode::USD, &rates())
            .await
            .unwrap();

        assert_eq!(order.subtotal, 2_500);
        assert_eq!(order.discount_amount, 250);
        // 5% of 2250 = 112.5, rounds half-even to 112
        assert_eq!(order.tax_amount, 112);
        assert_eq!(order.total, 2_362);
        assert_eq!(
            order.total,
            order.subtotal - order.discount_amount + order.tax_amount
        );

        // The cart was consumed; a second build observes it gone.
        assert!(repo.get_cart(cart.id).await.unwrap().is_none());
        let second = repo
            .build_order(OrderSource::Cart(cart.id), CurrencyCode::USD, &rates())
            .await;
        assert!(matches!(
            second,
            Err(RepoError::Domain(DomainError::CartNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_build_order_empty_cart() {
        let repo = setup_repo().await;
        let cart = repo.create_cart().await.unwrap();

        let result = repo
            .build_order(OrderSource::Cart(cart.id), CurrencyCode::USD, &rates())
            .await;

        assert!(matches!(
            result,
            Err(RepoError::Domain(DomainError::EmptyCart))
        ));
        // The failed build left the cart in place.
        assert!(repo.get_cart(cart.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_build_order_missing_cart() {
        let repo = setup_repo().await;

        let result = repo
            .build_order(
                OrderSource::Cart(storefront_types::CartId::new()),
                CurrencyCode::USD,
                &rates(),
            )
            .await;

        assert!(matches!(
            result,
            Err(RepoError::Domain(DomainError::CartNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_get_order_round_trip() {
        let repo = setup_repo().await;
        let item = seed_item(&repo, "Lamp", 10_000).await;

        let built = repo
            .build_order(OrderSource::SingleItem(item.id), CurrencyCode::EUR, &rates())
            .await
            .unwrap();
        let fetched = repo.get_order(built.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, built.id);
        assert_eq!(fetched.payment_status, PaymentStatus::Pending);
        assert_eq!(fetched.order_currency, CurrencyCode::EUR);
        assert_eq!(fetched.total, built.total);
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].item.id, item.id);
    }

    #[tokio::test]
    async fn test_get_order_not_found() {
        let repo = setup_repo().await;

        let result = repo.get_order(OrderId::new()).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_rule_activation_leaves_one_active() {
        let repo = setup_repo().await;

        let first = repo
            .create_rule(
                PricingRule::new(
                    RuleKind::Discount,
                    "First".to_string(),
                    Percentage::from_percent(5.0).unwrap(),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        let second = repo
            .create_rule(
                PricingRule::new(
                    RuleKind::Discount,
                    "Second".to_string(),
                    Percentage::from_percent(15.0).unwrap(),
                )
                .unwrap(),
            )
            .await
            .unwrap();

        repo.activate_rule(first.id).await.unwrap();
        repo.activate_rule(second.id).await.unwrap();

        let rules = repo.list_rules(RuleKind::Discount).await.unwrap();
        let active: Vec<_> = rules.iter().filter(|r| r.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);

        let current = repo.active_rule(RuleKind::Discount).await.unwrap().unwrap();
        assert_eq!(current.id, second.id);

        // Activation of a discount does not touch tax rules.
        assert!(repo.active_rule(RuleKind::Tax).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_activate_missing_rule() {
        let repo = setup_repo().await;

        let result = repo.activate_rule(storefront_types::RuleId::new()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_set_payment_intent_while_pending() {
        let repo = setup_repo().await;
        let item = seed_item(&repo, "Lamp", 10_000).await;
        let order = repo
            .build_order(OrderSource::SingleItem(item.id), CurrencyCode::USD, &rates())
            .await
            .unwrap();

        repo.set_payment_intent(
            order.id,
            "pi_123",
            &[PaymentStatus::Pending, PaymentStatus::Failed],
        )
        .await
        .unwrap();

        let fetched = repo.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(fetched.payment_intent_id.as_deref(), Some("pi_123"));
        assert_eq!(fetched.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_set_payment_intent_rejected_after_terminal() {
        let repo = setup_repo().await;
        let item = seed_item(&repo, "Lamp", 10_000).await;
        let order = repo
            .build_order(OrderSource::SingleItem(item.id), CurrencyCode::USD, &rates())
            .await
            .unwrap();

        repo.transition_payment_status(order.id, &[PaymentStatus::Pending], PaymentStatus::Cancelled)
            .await
            .unwrap();

        let result = repo
            .set_payment_intent(
                order.id,
                "pi_456",
                &[PaymentStatus::Pending, PaymentStatus::Failed],
            )
            .await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
        let fetched = repo.get_order(order.id).await.unwrap().unwrap();
        assert!(fetched.payment_intent_id.is_none());
    }

    #[tokio::test]
    async fn test_transition_compare_and_swap() {
        let repo = setup_repo().await;
        let item = seed_item(&repo, "Lamp", 10_000).await;
        let order = repo
            .build_order(OrderSource::SingleItem(item.id), CurrencyCode::USD, &rates())
            .await
            .unwrap();

        repo.transition_payment_status(
            order.id,
            &[PaymentStatus::Pending, PaymentStatus::Failed],
            PaymentStatus::Complete,
        )
        .await
        .unwrap();

        // A racing confirm that also observed Pending loses the swap.
        let second = repo
            .transition_payment_status(
                order.id,
                &[PaymentStatus::Pending, PaymentStatus::Failed],
                PaymentStatus::Failed,
            )
            .await;
        assert!(matches!(second, Err(RepoError::Conflict(_))));

        let fetched = repo.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(fetched.payment_status, PaymentStatus::Complete);
    }

    #[tokio::test]
    async fn test_transition_unknown_order() {
        let repo = setup_repo().await;

        let result = repo
            .transition_payment_status(
                OrderId::new(),
                &[PaymentStatus::Pending],
                PaymentStatus::Cancelled,
            )
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_monetary_invariant_with_odd_percentages() {
        let repo = setup_repo().await;
        let item = seed_item(&repo, "Odd", 999).await;

        let discount = repo
            .create_rule(
                PricingRule::new(
                    RuleKind::Discount,
                    "Odd discount".to_string(),
                    Percentage::from_percent(33.33).unwrap(),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        let tax = repo
            .create_rule(
                PricingRule::new(
                    RuleKind::Tax,
                    "Odd tax".to_string(),
                    Percentage::from_percent(7.25).unwrap(),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        repo.activate_rule(discount.id).await.unwrap();
        repo.activate_rule(tax.id).await.unwrap();

        let order = repo
            .build_order(OrderSource::SingleItem(item.id), CurrencyCode::USD, &rates())
            .await
            .unwrap();

        assert_eq!(
            order.total,
            order.subtotal - order.discount_amount + order.tax_amount
        );
        assert!(order.discount_amount >= 0);
        assert!(order.tax_amount >= 0);
    }
}
