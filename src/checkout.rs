//! Order submission workflow.
//!
//! Converts the session's cart into an order request and submits it through
//! an [`OrderGateway`]. The workflow is atomic on the client side: the cart
//! is cleared only after the gateway confirms the order, so any failure
//! leaves it untouched and a manual retry re-submits identical contents.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{
    api::{
        error::ApiError,
        models::{Order, OrderRequest, OrderRequestItem},
    },
    cart::Cart,
    session::{Actor, Session},
};

/// Errors from [`Checkout::place_order`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No buyer is signed in; nothing was sent.
    #[error("no active buyer")]
    NoActiveBuyer,

    /// The cart has no line items; nothing was sent.
    #[error("cart is empty")]
    EmptyCart,

    /// The remote order endpoint failed; the cart is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Seam to the remote order-creation endpoint.
///
/// [`crate::api::MarketClient`] is the production implementation; tests use
/// the generated [`MockOrderGateway`] to assert call counts and request
/// shapes without a network.
#[automock]
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit an order request, returning the created order.
    async fn submit_order(&self, request: &OrderRequest) -> Result<Order, ApiError>;
}

/// Order submission workflow over an [`OrderGateway`].
#[derive(Debug, Clone)]
pub struct Checkout<G> {
    gateway: G,
}

impl<G: OrderGateway> Checkout<G> {
    /// Wrap a gateway.
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Submit the session's cart as an order.
    ///
    /// Preconditions are checked before any network call: a buyer must be
    /// signed in and the cart must be non-empty. The request carries product
    /// ids and quantities only; the server is the authority on pricing. On
    /// success the cart is cleared and the created order returned so the
    /// caller can refresh the buyer's order history.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NoActiveBuyer`] or
    /// [`CheckoutError::EmptyCart`] without contacting the gateway, and
    /// propagates [`ApiError`] from the gateway with the cart intact.
    pub async fn place_order(&self, session: &mut Session) -> Result<Order, CheckoutError> {
        let buyer_id = match session.actor() {
            Actor::Buyer(id) => id.clone(),
            _ => return Err(CheckoutError::NoActiveBuyer),
        };

        if session.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let request = build_request(buyer_id, session.cart());
        let order = self.gateway.submit_order(&request).await?;

        // Only a confirmed order may touch the cart.
        session.cart_mut().clear();

        tracing::info!(order_id = %order.id, total = order.total_amount, "order placed");

        Ok(order)
    }
}

fn build_request(buyer_id: String, cart: &Cart) -> OrderRequest {
    OrderRequest {
        buyer_id,
        items: cart
            .items()
            .iter()
            .map(|item| OrderRequestItem {
                product_id: item.product_id().to_string(),
                quantity: item.quantity(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use testresult::TestResult;

    use super::*;
    use crate::api::models::{OrderStatus, UserRef};

    fn created_order(id: &str, total: f64) -> Order {
        Order {
            id: id.to_string(),
            buyer_id: UserRef::Id("b1".to_string()),
            items: Vec::new(),
            total_amount: total,
            status: OrderStatus::Pending,
            created_at: None,
        }
    }

    fn buyer_session_with_items() -> Session {
        let mut session = Session::new();
        session.login_buyer("b1");
        session
            .cart_mut()
            .add_item("P1", "Widget", 10.0, 5, 3)
            .unwrap_or_else(|e| panic!("fixture add failed: {e}"));
        session
    }

    #[tokio::test]
    async fn empty_cart_fails_without_contacting_the_gateway() {
        let mut gateway = MockOrderGateway::new();
        gateway.expect_submit_order().times(0);

        let mut session = Session::new();
        session.login_buyer("b1");

        let result = Checkout::new(gateway).place_order(&mut session).await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn anonymous_actor_fails_without_contacting_the_gateway() {
        let mut gateway = MockOrderGateway::new();
        gateway.expect_submit_order().times(0);

        let mut session = Session::new();

        let result = Checkout::new(gateway).place_order(&mut session).await;

        assert!(matches!(result, Err(CheckoutError::NoActiveBuyer)));
    }

    #[tokio::test]
    async fn request_carries_product_ids_and_quantities_only() -> TestResult {
        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_submit_order()
            .times(1)
            .withf(|request| {
                request.buyer_id == "b1"
                    && request.items
                        == vec![OrderRequestItem {
                            product_id: "P1".to_string(),
                            quantity: 3,
                        }]
            })
            .returning(|_| Ok(created_order("o1", 30.0)));

        let mut session = buyer_session_with_items();

        Checkout::new(gateway).place_order(&mut session).await?;

        Ok(())
    }

    #[tokio::test]
    async fn success_clears_the_cart_and_returns_the_server_id() -> TestResult {
        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_submit_order()
            .times(1)
            .returning(|_| Ok(created_order("o42", 30.0)));

        let mut session = buyer_session_with_items();

        let order = Checkout::new(gateway).place_order(&mut session).await?;

        assert_eq!(order.id, "o42");
        assert_eq!(session.cart().item_count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn rejection_preserves_the_cart_and_surfaces_the_message() {
        let mut gateway = MockOrderGateway::new();
        gateway.expect_submit_order().times(1).returning(|_| {
            Err(ApiError::Remote {
                status: StatusCode::BAD_REQUEST,
                message: "Insufficient stock for product P1".to_string(),
            })
        });

        let mut session = buyer_session_with_items();
        let before = session.cart().clone();

        let result = Checkout::new(gateway).place_order(&mut session).await;

        match result {
            Err(CheckoutError::Api(error)) => {
                assert_eq!(error.to_string(), "Insufficient stock for product P1");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
        assert_eq!(session.cart(), &before);
    }

    #[tokio::test]
    async fn retry_after_failure_submits_identical_contents() -> TestResult {
        let mut gateway = MockOrderGateway::new();
        let mut seen: Option<OrderRequest> = None;

        gateway
            .expect_submit_order()
            .times(2)
            .returning_st(move |request| {
                match seen.take() {
                    None => {
                        seen = Some(request.clone());
                        Err(ApiError::Remote {
                            status: StatusCode::SERVICE_UNAVAILABLE,
                            message: "try again".to_string(),
                        })
                    }
                    Some(first) => {
                        assert_eq!(&first, request, "retry must re-send the same request");
                        Ok(created_order("o7", 30.0))
                    }
                }
            });

        let mut session = buyer_session_with_items();
        let checkout = Checkout::new(gateway);

        let first = checkout.place_order(&mut session).await;
        assert!(first.is_err());

        let order = checkout.place_order(&mut session).await?;
        assert_eq!(order.id, "o7");
        assert!(session.cart().is_empty());

        Ok(())
    }
}
