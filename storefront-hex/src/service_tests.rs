//! CheckoutService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use exchange_rates::{CurrencyCode, RateTable};
    use storefront_types::{
        AppError, Cart, CartId, CartLineItem, CreateIntentRequest, CreateItemFields,
        CreateItemRequest, CreateRuleRequest, DomainError, GatewayError, IntentStatus, Item,
        ItemId, Order, OrderId, OrderLineItem, OrderSource, PaymentGateway, PaymentIntent,
        PaymentStatus, PricingRule, RepoError, RuleId, RuleKind, ShopRepository, price_lines,
    };

    use crate::CheckoutService;

    // ─────────────────────────────────────────────────────────────────────────────
    // In-memory repository
    // ─────────────────────────────────────────────────────────────────────────────

    /// Simple in-memory repository for testing the service layer. Mirrors
    /// the adapters' semantics, including the compare-and-swap status
    /// writes.
    pub struct MockRepo {
        items: Mutex<HashMap<ItemId, Item>>,
        carts: Mutex<HashMap<CartId, Cart>>,
        orders: Mutex<HashMap<OrderId, Order>>,
        rules: Mutex<Vec<PricingRule>>,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self {
                items: Mutex::new(HashMap::new()),
                carts: Mutex::new(HashMap::new()),
                orders: Mutex::new(HashMap::new()),
                rules: Mutex::new(Vec::new()),
            }
        }

        /// Inserts an order directly, for driving the state machine from an
        /// arbitrary starting state.
        fn seed_order(&self, status: PaymentStatus, intent: Option<&str>) -> Order {
            let item = Item::from_parts(
                ItemId::new(),
                "Seeded".to_string(),
                None,
                1_000,
                CurrencyCode::USD,
            );
            let order = Order::from_parts(
                OrderId::new(),
                Utc::now(),
                status,
                intent.map(String::from),
                vec![OrderLineItem {
                    id: Uuid::new_v4(),
                    item,
                    quantity: 1,
                    unit_price: 1_000,
                }],
                1_000,
                0,
                0,
                1_000,
                CurrencyCode::USD,
            );
            self.orders.lock().unwrap().insert(order.id, order.clone());
            order
        }

        fn stored_order(&self, id: OrderId) -> Order {
            self.orders.lock().unwrap().get(&id).cloned().unwrap()
        }
    }

    #[async_trait]
    impl ShopRepository for MockRepo {
        async fn create_item(&self, fields: CreateItemFields) -> Result<Item, RepoError> {
            let item = Item::new(fields.name, fields.description, fields.price, fields.currency)
                .map_err(RepoError::Domain)?;
            self.items.lock().unwrap().insert(item.id, item.clone());
            Ok(item)
        }

        async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
            Ok(self.items.lock().unwrap().get(&id).cloned())
        }

        async fn list_items(&self) -> Result<Vec<Item>, RepoError> {
            Ok(self.items.lock().unwrap().values().cloned().collect())
        }

        async fn create_cart(&self) -> Result<Cart, RepoError> {
            let cart = Cart::new();
            self.carts.lock().unwrap().insert(cart.id, cart.clone());
            Ok(cart)
        }

        async fn get_cart(&self, id: CartId) -> Result<Option<Cart>, RepoError> {
            Ok(self.carts.lock().unwrap().get(&id).cloned())
        }

        async fn add_cart_item(
            &self,
            cart_id: CartId,
            item_id: ItemId,
            quantity: u32,
        ) -> Result<CartLineItem, RepoError> {
            let item = self
                .items
                .lock()
                .unwrap()
                .get(&item_id)
                .cloned()
                .ok_or(RepoError::Domain(DomainError::ItemNotFound(item_id)))?;

            let mut carts = self.carts.lock().unwrap();
            let cart = carts.get_mut(&cart_id).ok_or(RepoError::NotFound)?;

            if let Some(line) = cart.items.iter_mut().find(|l| l.item.id == item_id) {
                line.quantity += quantity;
                Ok(line.clone())
            } else {
                let line = CartLineItem {
                    id: Uuid::new_v4(),
                    item,
                    quantity,
                };
                cart.items.push(line.clone());
                Ok(line)
            }
        }

        async fn delete_cart(&self, id: CartId) -> Result<bool, RepoError> {
            Ok(self.carts.lock().unwrap().remove(&id).is_some())
        }

        async fn build_order(
            &self,
            source: OrderSource,
            currency: CurrencyCode,
            rates: &RateTable,
        ) -> Result<Order, RepoError> {
            let source_lines: Vec<(Item, u32)> = match source {
                OrderSource::Cart(cart_id) => {
                    let mut carts = self.carts.lock().unwrap();
                    let cart = carts
                        .get(&cart_id)
                        .ok_or(RepoError::Domain(DomainError::CartNotFound(cart_id)))?;
                    if cart.items.is_empty() {
                        return Err(RepoError::Domain(DomainError::EmptyCart));
                    }
                    let lines = cart
                        .items
                        .iter()
                        .map(|l| (l.item.clone(), l.quantity))
                        .collect();
                    carts.remove(&cart_id);
                    lines
                }
                OrderSource::SingleItem(item_id) => {
                    let item = self
                        .items
                        .lock()
                        .unwrap()
                        .get(&item_id)
                        .cloned()
                        .ok_or(RepoError::Domain(DomainError::ItemNotFound(item_id)))?;
                    vec![(item, 1)]
                }
            };

            let mut order_lines = Vec::with_capacity(source_lines.len());
            for (item, quantity) in source_lines {
                let unit_price = rates
                    .convert(item.price, item.currency, currency)
                    .map_err(|e| RepoError::Domain(DomainError::Exchange(e)))?;
                order_lines.push(OrderLineItem {
                    id: Uuid::new_v4(),
                    item,
                    quantity,
                    unit_price,
                });
            }

            let rules = self.rules.lock().unwrap();
            let discount = rules
                .iter()
                .find(|r| r.kind == RuleKind::Discount && r.is_active)
                .map(|r| r.percentage);
            let tax = rules
                .iter()
                .find(|r| r.kind == RuleKind::Tax && r.is_active)
                .map(|r| r.percentage);

            let breakdown = price_lines(
                order_lines.iter().map(|l| (l.quantity, l.unit_price)),
                discount,
                tax,
            );

            let order = Order::from_parts(
                OrderId::new(),
                Utc::now(),
                PaymentStatus::Pending,
                None,
                order_lines,
                breakdown.subtotal,
                breakdown.discount_amount,
                breakdown.tax_amount,
                breakdown.total,
                currency,
            );
            self.orders.lock().unwrap().insert(order.id, order.clone());
            Ok(order)
        }

        async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
            Ok(self.orders.lock().unwrap().get(&id).cloned())
        }

        async fn set_payment_intent(
            &self,
            id: OrderId,
            intent_id: &str,
            expected_from: &[PaymentStatus],
        ) -> Result<(), RepoError> {
            let mut orders = self.orders.lock().unwrap();
            let order = orders.get_mut(&id).ok_or(RepoError::NotFound)?;
            if !expected_from.contains(&order.payment_status) {
                return Err(RepoError::Conflict(
                    "Payment state changed concurrently".into(),
                ));
            }
            order.payment_intent_id = Some(intent_id.to_string());
            Ok(())
        }

        async fn transition_payment_status(
            &self,
            id: OrderId,
            expected_from: &[PaymentStatus],
            to: PaymentStatus,
        ) -> Result<(), RepoError> {
            let mut orders = self.orders.lock().unwrap();
            let order = orders.get_mut(&id).ok_or(RepoError::NotFound)?;
            if !expected_from.contains(&order.payment_status) {
                return Err(RepoError::Conflict(
                    "Payment state changed concurrently".into(),
                ));
            }
            order.payment_status = to;
            Ok(())
        }

        async fn create_rule(&self, rule: PricingRule) -> Result<PricingRule, RepoError> {
            self.rules.lock().unwrap().push(rule.clone());
            Ok(rule)
        }

        async fn list_rules(&self, kind: RuleKind) -> Result<Vec<PricingRule>, RepoError> {
            Ok(self
                .rules
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.kind == kind)
                .cloned()
                .collect())
        }

        async fn active_rule(&self, kind: RuleKind) -> Result<Option<PricingRule>, RepoError> {
            Ok(self
                .rules
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.kind == kind && r.is_active)
                .cloned())
        }

        async fn activate_rule(&self, id: RuleId) -> Result<PricingRule, RepoError> {
            let mut rules = self.rules.lock().unwrap();
            let kind = rules
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.kind)
                .ok_or(RepoError::NotFound)?;
            for rule in rules.iter_mut().filter(|r| r.kind == kind) {
                rule.is_active = rule.id == id;
            }
            Ok(rules.iter().find(|r| r.id == id).cloned().unwrap())
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Scriptable gateway
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gateway double that records calls and reports a configured outcome.
    pub struct MockGateway {
        settle: bool,
        decline_create: bool,
        create_calls: Mutex<Vec<CreateIntentRequest>>,
        cancel_calls: Mutex<Vec<String>>,
    }

    impl MockGateway {
        /// Gateway whose intents settle on confirm.
        pub fn settling() -> Self {
            Self {
                settle: true,
                decline_create: false,
                create_calls: Mutex::new(Vec::new()),
                cancel_calls: Mutex::new(Vec::new()),
            }
        }

        /// Gateway whose intents never settle.
        pub fn unsettled() -> Self {
            Self {
                settle: false,
                ..Self::settling()
            }
        }

        /// Gateway that rejects intent creation.
        pub fn declining() -> Self {
            Self {
                decline_create: true,
                ..Self::settling()
            }
        }

        fn create_count(&self) -> usize {
            self.create_calls.lock().unwrap().len()
        }

        fn cancelled(&self) -> Vec<String> {
            self.cancel_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentGateway for MockGateway {
        async fn create_intent(
            &self,
            req: CreateIntentRequest,
        ) -> Result<PaymentIntent, GatewayError> {
            self.create_calls.lock().unwrap().push(req.clone());
            if self.decline_create {
                return Err(GatewayError::Provider("Your card was declined.".into()));
            }
            let id = format!("pi_mock_{}", Uuid::new_v4().simple());
            Ok(PaymentIntent {
                client_secret: Some(format!("{id}_secret")),
                id,
                status: IntentStatus::RequiresPaymentMethod,
                amount: req.amount,
                currency: req.currency,
            })
        }

        async fn retrieve_intent(
            &self,
            currency: CurrencyCode,
            intent_id: &str,
        ) -> Result<PaymentIntent, GatewayError> {
            Ok(PaymentIntent {
                id: intent_id.to_string(),
                client_secret: None,
                status: if self.settle {
                    IntentStatus::Succeeded
                } else {
                    IntentStatus::RequiresPaymentMethod
                },
                amount: 0,
                currency,
            })
        }

        async fn cancel_intent(
            &self,
            currency: CurrencyCode,
            intent_id: &str,
        ) -> Result<PaymentIntent, GatewayError> {
            self.cancel_calls.lock().unwrap().push(intent_id.to_string());
            Ok(PaymentIntent {
                id: intent_id.to_string(),
                client_secret: None,
                status: IntentStatus::Canceled,
                amount: 0,
                currency,
            })
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────────

    fn rates() -> RateTable {
        RateTable::new(CurrencyCode::USD, CurrencyCode::EUR, 0.90).unwrap()
    }

    fn service(gateway: MockGateway) -> CheckoutService<MockRepo, MockGateway> {
        CheckoutService::new(MockRepo::new(), gateway, rates())
    }

    async fn seed_item(
        service: &CheckoutService<MockRepo, MockGateway>,
        price: i64,
    ) -> Item {
        service
            .create_item(CreateItemRequest {
                name: "Lamp".to_string(),
                description: None,
                price,
                currency: None,
            })
            .await
            .unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Order building
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_buy_item_converts_currency_and_starts_pending() {
        let service = service(MockGateway::settling());
        let item = seed_item(&service, 10_000).await;

        let order = service.buy_item(item.id, CurrencyCode::EUR).await.unwrap();

        assert_eq!(order.order_currency, CurrencyCode::EUR);
        assert_eq!(order.total, 9_000);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert!(order.payment_intent_id.is_none());
    }

    #[tokio::test]
    async fn test_create_item_validation() {
        let service = service(MockGateway::settling());

        let empty_name = service
            .create_item(CreateItemRequest {
                name: "  ".to_string(),
                description: None,
                price: 100,
                currency: None,
            })
            .await;
        assert!(matches!(empty_name, Err(AppError::BadRequest(_))));

        let bad_currency = service
            .create_item(CreateItemRequest {
                name: "Lamp".to_string(),
                description: None,
                price: 100,
                currency: Some("GBP".to_string()),
            })
            .await;
        assert!(matches!(bad_currency, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_add_cart_item_zero_quantity_rejected() {
        let service = service(MockGateway::settling());
        let item = seed_item(&service, 1_000).await;
        let cart = service.create_cart().await.unwrap();

        let result = service.add_cart_item(cart.id, item.id, 0).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_order_consumes_cart() {
        let service = service(MockGateway::settling());
        let item = seed_item(&service, 1_000).await;
        let cart = service.create_cart().await.unwrap();
        service.add_cart_item(cart.id, item.id, 2).await.unwrap();

        let order = service
            .create_order(cart.id, CurrencyCode::USD)
            .await
            .unwrap();
        assert_eq!(order.subtotal, 2_000);

        let gone = service.get_cart(cart.id).await;
        assert!(matches!(gone, Err(AppError::NotFound(_))));

        let again = service.create_order(cart.id, CurrencyCode::USD).await;
        assert!(matches!(again, Err(AppError::BadRequest(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // create-session
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_session_sets_reference_keeps_pending() {
        let service = service(MockGateway::settling());
        let order = service.repo().seed_order(PaymentStatus::Pending, None);

        let session = service.create_payment_session(order.id).await.unwrap();

        assert_eq!(session.amount, 1_000);
        assert_eq!(session.currency, CurrencyCode::USD);
        assert!(session.client_secret.is_some());

        let stored = service.repo().stored_order(order.id);
        assert_eq!(stored.payment_status, PaymentStatus::Pending);
        assert_eq!(
            stored.payment_intent_id.as_deref(),
            Some(session.payment_intent_id.as_str())
        );
    }

    #[tokio::test]
    async fn test_create_session_twice_overwrites_reference() {
        // No idempotency guard: a repeat call replaces the stored reference.
        let service = service(MockGateway::settling());
        let order = service.repo().seed_order(PaymentStatus::Pending, None);

        let first = service.create_payment_session(order.id).await.unwrap();
        let second = service.create_payment_session(order.id).await.unwrap();

        assert_ne!(first.payment_intent_id, second.payment_intent_id);
        let stored = service.repo().stored_order(order.id);
        assert_eq!(
            stored.payment_intent_id.as_deref(),
            Some(second.payment_intent_id.as_str())
        );
    }

    #[tokio::test]
    async fn test_create_session_rejected_when_cancelled() {
        let service = service(MockGateway::settling());
        let order = service.repo().seed_order(PaymentStatus::Cancelled, None);

        let result = service.create_payment_session(order.id).await;

        assert!(
            matches!(result, Err(AppError::InvalidState(ref msg)) if msg == "Order is cancelled")
        );
        // Guard rejections never reach the gateway.
        assert_eq!(service.gateway().create_count(), 0);
        let stored = service.repo().stored_order(order.id);
        assert!(stored.payment_intent_id.is_none());
    }

    #[tokio::test]
    async fn test_create_session_rejected_when_completed() {
        let service = service(MockGateway::settling());
        let order = service.repo().seed_order(PaymentStatus::Complete, None);

        let result = service.create_payment_session(order.id).await;

        assert!(
            matches!(result, Err(AppError::InvalidState(ref msg)) if msg == "Order already completed")
        );
        assert_eq!(service.gateway().create_count(), 0);
    }

    #[tokio::test]
    async fn test_create_session_gateway_decline_leaves_order_untouched() {
        let service = service(MockGateway::declining());
        let order = service.repo().seed_order(PaymentStatus::Pending, None);

        let result = service.create_payment_session(order.id).await;

        assert!(
            matches!(result, Err(AppError::Gateway(ref msg)) if msg.contains("declined"))
        );
        let stored = service.repo().stored_order(order.id);
        assert_eq!(stored.payment_status, PaymentStatus::Pending);
        assert!(stored.payment_intent_id.is_none());
    }

    #[tokio::test]
    async fn test_create_session_unknown_order() {
        let service = service(MockGateway::settling());

        let result = service.create_payment_session(OrderId::new()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // confirm
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_confirm_settled_completes_order() {
        let service = service(MockGateway::settling());
        let order = service
            .repo()
            .seed_order(PaymentStatus::Pending, Some("pi_1"));

        let result = service.confirm_payment(order.id).await.unwrap();

        assert_eq!(result.status, "success");
        assert_eq!(result.order_id, order.id);
        assert_eq!(
            service.repo().stored_order(order.id).payment_status,
            PaymentStatus::Complete
        );
    }

    #[tokio::test]
    async fn test_confirm_unsettled_marks_failed() {
        let service = service(MockGateway::unsettled());
        let order = service
            .repo()
            .seed_order(PaymentStatus::Pending, Some("pi_1"));

        let result = service.confirm_payment(order.id).await.unwrap();

        assert_eq!(result.status, "failed");
        assert!(result.message.contains("Payment failed"));
        assert_eq!(
            service.repo().stored_order(order.id).payment_status,
            PaymentStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_confirm_after_complete_rejected() {
        let service = service(MockGateway::settling());
        let order = service
            .repo()
            .seed_order(PaymentStatus::Complete, Some("pi_1"));

        let result = service.confirm_payment(order.id).await;

        assert!(
            matches!(result, Err(AppError::InvalidState(ref msg)) if msg.contains("already completed"))
        );
        assert_eq!(
            service.repo().stored_order(order.id).payment_status,
            PaymentStatus::Complete
        );
    }

    #[tokio::test]
    async fn test_confirm_cancelled_rejected() {
        let service = service(MockGateway::settling());
        let order = service
            .repo()
            .seed_order(PaymentStatus::Cancelled, Some("pi_1"));

        let result = service.confirm_payment(order.id).await;

        assert!(
            matches!(result, Err(AppError::InvalidState(ref msg)) if msg.contains("cancelled"))
        );
    }

    #[tokio::test]
    async fn test_confirm_without_session_rejected() {
        let service = service(MockGateway::settling());
        let order = service.repo().seed_order(PaymentStatus::Pending, None);

        let result = service.confirm_payment(order.id).await;

        assert!(
            matches!(result, Err(AppError::BadRequest(ref msg)) if msg.contains("no payment session"))
        );
    }

    #[tokio::test]
    async fn test_confirm_retry_after_failure_can_complete() {
        // A Failed order is not terminal: a later confirm that settles
        // moves it to Complete.
        let service = service(MockGateway::settling());
        let order = service
            .repo()
            .seed_order(PaymentStatus::Failed, Some("pi_1"));

        let result = service.confirm_payment(order.id).await.unwrap();

        assert_eq!(result.status, "success");
        assert_eq!(
            service.repo().stored_order(order.id).payment_status,
            PaymentStatus::Complete
        );
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // cancel
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_cancel_pending_with_session_cancels_intent() {
        let service = service(MockGateway::settling());
        let order = service
            .repo()
            .seed_order(PaymentStatus::Pending, Some("pi_1"));

        let result = service.cancel_payment(order.id).await.unwrap();

        assert!(result.message.to_lowercase().contains("cancelled"));
        assert_eq!(service.gateway().cancelled(), vec!["pi_1".to_string()]);
        assert_eq!(
            service.repo().stored_order(order.id).payment_status,
            PaymentStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_cancel_pending_without_session_skips_gateway() {
        let service = service(MockGateway::settling());
        let order = service.repo().seed_order(PaymentStatus::Pending, None);

        service.cancel_payment(order.id).await.unwrap();

        assert!(service.gateway().cancelled().is_empty());
        assert_eq!(
            service.repo().stored_order(order.id).payment_status,
            PaymentStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_cancel_failed_order_skips_gateway() {
        // The intent is only cancelled at the provider while the order is
        // still Pending.
        let service = service(MockGateway::settling());
        let order = service
            .repo()
            .seed_order(PaymentStatus::Failed, Some("pi_1"));

        service.cancel_payment(order.id).await.unwrap();

        assert!(service.gateway().cancelled().is_empty());
        assert_eq!(
            service.repo().stored_order(order.id).payment_status,
            PaymentStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_cancel_completed_rejected() {
        let service = service(MockGateway::settling());
        let order = service.repo().seed_order(PaymentStatus::Complete, None);

        let result = service.cancel_payment(order.id).await;

        assert!(
            matches!(result, Err(AppError::InvalidState(ref msg)) if msg == "Cannot cancel processed order")
        );
        assert_eq!(
            service.repo().stored_order(order.id).payment_status,
            PaymentStatus::Complete
        );
    }

    #[tokio::test]
    async fn test_cancel_cancelled_rejected() {
        let service = service(MockGateway::settling());
        let order = service.repo().seed_order(PaymentStatus::Cancelled, None);

        let result = service.cancel_payment(order.id).await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // rules
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_rule_validation() {
        let service = service(MockGateway::settling());

        let bad_kind = service
            .create_rule(CreateRuleRequest {
                kind: "vat".to_string(),
                name: "VAT".to_string(),
                percentage: 5.0,
            })
            .await;
        assert!(matches!(bad_kind, Err(AppError::BadRequest(_))));

        let bad_pct = service
            .create_rule(CreateRuleRequest {
                kind: "discount".to_string(),
                name: "Too much".to_string(),
                percentage: 101.0,
            })
            .await;
        assert!(matches!(bad_pct, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_activated_rules_drive_order_pricing() {
        let service = service(MockGateway::settling());
        let item = seed_item(&service, 10_000).await;

        let discount = service
            .create_rule(CreateRuleRequest {
                kind: "discount".to_string(),
                name: "Sale".to_string(),
                percentage: 10.0,
            })
            .await
            .unwrap();
        let tax = service
            .create_rule(CreateRuleRequest {
                kind: "tax".to_string(),
                name: "VAT".to_string(),
                percentage: 5.0,
            })
            .await
            .unwrap();
        service.activate_rule(discount.id).await.unwrap();
        service.activate_rule(tax.id).await.unwrap();

        let order = service.buy_item(item.id, CurrencyCode::USD).await.unwrap();

        assert_eq!(order.subtotal, 10_000);
        assert_eq!(order.discount_amount, 1_000);
        assert_eq!(order.tax_amount, 450);
        assert_eq!(order.total, 9_450);
    }
}
