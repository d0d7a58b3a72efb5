//! End-to-end buyer flow: browse, fill the cart, submit, reconcile.
//!
//! The gateway is mocked, so every assertion about network traffic is a
//! call-count or request-shape expectation.

use bazaar::prelude::*;
use bazaar::checkout::MockOrderGateway;
use reqwest::StatusCode;
use serde_json::json;
use testresult::TestResult;

fn product(id: &str, title: &str, price: f64, stock: u32) -> Product {
    serde_json::from_value(json!({
        "_id": id,
        "title": title,
        "description": "integration fixture",
        "price": price,
        "stock": stock,
        "category": "tools",
        "sellerId": "s1"
    }))
    .unwrap_or_else(|e| panic!("bad product fixture: {e}"))
}

fn server_order(id: &str, total: f64) -> Order {
    serde_json::from_value(json!({
        "_id": id,
        "buyerId": "b1",
        "items": [],
        "totalAmount": total,
        "status": "pending"
    }))
    .unwrap_or_else(|e| panic!("bad order fixture: {e}"))
}

#[tokio::test]
async fn buyer_fills_cart_and_places_order() -> TestResult {
    let mut session = Session::new();
    session.login_buyer("b1");

    session.add_to_cart(&product("P1", "Widget", 10.0, 5), 3)?;
    session.add_to_cart(&product("P2", "Gadget", 4.5, 2), 2)?;

    assert_eq!(session.cart().len(), 2);
    assert_eq!(session.cart().item_count(), 5);

    let mut gateway = MockOrderGateway::new();
    gateway
        .expect_submit_order()
        .times(1)
        .withf(|request| {
            request.buyer_id == "b1"
                && request.items
                    == vec![
                        OrderRequestItem {
                            product_id: "P1".to_string(),
                            quantity: 3,
                        },
                        OrderRequestItem {
                            product_id: "P2".to_string(),
                            quantity: 2,
                        },
                    ]
        })
        .returning(|_| Ok(server_order("o1", 39.0)));

    let order = Checkout::new(gateway).place_order(&mut session).await?;

    assert_eq!(order.id, "o1");
    assert_eq!(session.cart().item_count(), 0);

    Ok(())
}

#[tokio::test]
async fn widget_add_clamp_remove_scenario() -> TestResult {
    let mut session = Session::new();
    session.login_buyer("b1");

    let widget = product("P1", "Widget", 10.0, 5);

    session.add_to_cart(&widget, 3)?;
    assert_eq!(session.cart().len(), 1);
    assert_eq!(session.cart().items()[0].quantity(), 3);
    assert!((session.cart().total() - 30.0).abs() < 1e-9);

    let outcome = session.add_to_cart(&widget, 4)?;
    assert!(matches!(outcome, AddOutcome::Clamped { quantity: 5, .. }));
    assert!((session.cart().total() - 50.0).abs() < 1e-9);

    session.remove_from_cart("P1")?;
    assert!(session.cart().is_empty());
    assert!((session.cart().total() - 0.0).abs() < f64::EPSILON);

    Ok(())
}

#[tokio::test]
async fn validation_failures_never_reach_the_network() {
    let mut gateway = MockOrderGateway::new();
    gateway.expect_submit_order().times(0);
    let checkout = Checkout::new(gateway);

    // Empty cart with a signed-in buyer.
    let mut session = Session::new();
    session.login_buyer("b1");
    assert!(matches!(
        checkout.place_order(&mut session).await,
        Err(CheckoutError::EmptyCart)
    ));

    // No buyer at all.
    let mut anonymous = Session::new();
    assert!(matches!(
        checkout.place_order(&mut anonymous).await,
        Err(CheckoutError::NoActiveBuyer)
    ));
}

#[tokio::test]
async fn rejected_submission_keeps_the_cart_for_retry() -> TestResult {
    let mut session = Session::new();
    session.login_buyer("b1");
    session.add_to_cart(&product("P1", "Widget", 10.0, 5), 3)?;

    let before = session.cart().clone();

    let mut gateway = MockOrderGateway::new();
    gateway.expect_submit_order().times(1).returning(|_| {
        Err(ApiError::Remote {
            status: StatusCode::CONFLICT,
            message: "Insufficient stock for product P1".to_string(),
        })
    });

    let result = Checkout::new(gateway).place_order(&mut session).await;

    match result {
        Err(CheckoutError::Api(error)) => {
            assert!(error.is_remote());
            assert_eq!(error.to_string(), "Insufficient stock for product P1");
        }
        other => panic!("expected a remote error, got {other:?}"),
    }

    assert_eq!(session.cart(), &before);

    Ok(())
}
