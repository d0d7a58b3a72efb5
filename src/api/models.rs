//! Wire models for the marketplace API.
//!
//! Read shapes mirror what the server returns; ids are opaque strings
//! assigned server-side. References inside orders arrive either as plain ids
//! or as populated objects, so both decode.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A user's role on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Browses and purchases products.
    Buyer,
    /// Manages their own catalogue.
    Seller,
    /// Oversees users, products and orders.
    Admin,
}

impl Role {
    /// Lowercase wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }
}

/// User record.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Contact email, when provided.
    #[serde(default)]
    pub email: Option<String>,

    /// Marketplace role.
    pub role: Role,

    /// Creation time, when the server supplies it.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<Timestamp>,
}

/// Body for `POST /users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    /// Display name.
    pub name: String,

    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Marketplace role.
    pub role: Role,
}

/// Body for `PATCH /users/:id`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Product record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display title.
    pub title: String,

    /// Longer description, when provided.
    #[serde(default)]
    pub description: Option<String>,

    /// Unit price.
    pub price: f64,

    /// Units available.
    pub stock: u32,

    /// Category label.
    pub category: String,

    /// Optional image URL.
    #[serde(default)]
    pub image: Option<String>,

    /// The seller who owns this product.
    pub seller_id: UserRef,
}

/// Body for `POST /products`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// Display title.
    pub title: String,

    /// Longer description.
    pub description: String,

    /// Unit price.
    pub price: f64,

    /// Units available.
    pub stock: u32,

    /// Category label.
    pub category: String,

    /// Owning seller's id.
    pub seller_id: String,

    /// Optional image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Body for `PATCH /products/:id`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// New stock level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,

    /// New category label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// New image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Optional filters for `GET /products`.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Restrict to one category.
    pub category: Option<String>,

    /// Restrict to one seller's catalogue.
    pub seller_id: Option<String>,
}

impl ProductQuery {
    /// Query-string pairs for the request.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.as_str()));
        }
        if let Some(seller_id) = &self.seller_id {
            pairs.push(("sellerId", seller_id.as_str()));
        }
        pairs
    }
}

/// A user reference that may arrive populated.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    /// Plain id string.
    Id(String),
    /// Populated object.
    Populated(UserSummary),
}

impl UserRef {
    /// The referenced user's id.
    pub fn id(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::Populated(summary) => &summary.id,
        }
    }

    /// Display name, when the reference was populated with one.
    pub fn name(&self) -> Option<&str> {
        match self {
            UserRef::Id(_) => None,
            UserRef::Populated(summary) => summary.name.as_deref(),
        }
    }
}

/// Populated form of a [`UserRef`].
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name, when present.
    #[serde(default)]
    pub name: Option<String>,
}

/// A product reference inside an order that may arrive populated.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    /// Plain id string.
    Id(String),
    /// Populated object.
    Populated(ProductSummary),
}

impl ProductRef {
    /// The referenced product's id.
    pub fn id(&self) -> &str {
        match self {
            ProductRef::Id(id) => id,
            ProductRef::Populated(summary) => &summary.id,
        }
    }

    /// Product title, when the reference was populated with one.
    pub fn title(&self) -> Option<&str> {
        match self {
            ProductRef::Id(_) => None,
            ProductRef::Populated(summary) => summary.title.as_deref(),
        }
    }

    /// Owning seller's id, when the reference was populated with one.
    pub fn seller_id(&self) -> Option<&str> {
        match self {
            ProductRef::Id(_) => None,
            ProductRef::Populated(summary) => {
                summary.seller_id.as_ref().map(UserRef::id)
            }
        }
    }
}

/// Populated form of a [`ProductRef`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display title, when present.
    #[serde(default)]
    pub title: Option<String>,

    /// Owning seller, when present (itself possibly populated).
    #[serde(default)]
    pub seller_id: Option<UserRef>,
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed but not yet paid.
    Pending,
    /// Payment confirmed.
    Paid,
    /// Cancelled before fulfilment.
    Cancelled,
}

impl OrderStatus {
    /// Lowercase wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// One priced line of a placed order, as reported by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The ordered product.
    pub product_id: ProductRef,

    /// Units ordered.
    pub quantity: u32,

    /// Server-authoritative unit price.
    pub unit_price: f64,

    /// Server-computed line subtotal.
    pub subtotal: f64,
}

/// Order record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// The buyer who placed the order.
    pub buyer_id: UserRef,

    /// Priced lines.
    pub items: Vec<OrderItem>,

    /// Server-computed order total.
    pub total_amount: f64,

    /// Lifecycle state.
    pub status: OrderStatus,

    /// Creation time, when the server supplies it.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Order {
    /// Restrict this order to the lines sold by `seller_id`.
    ///
    /// Returns `None` when the order contains none of the seller's products.
    /// Only populated product references carry a seller, so plain-id lines
    /// never match.
    pub fn seller_view<'a>(&'a self, seller_id: &str) -> Option<SellerOrderView<'a>> {
        let items: Vec<&OrderItem> = self
            .items
            .iter()
            .filter(|item| item.product_id.seller_id() == Some(seller_id))
            .collect();

        if items.is_empty() {
            return None;
        }

        let seller_subtotal = items.iter().map(|item| item.subtotal).sum();

        Some(SellerOrderView {
            order: self,
            items,
            seller_subtotal,
        })
    }
}

/// One seller's share of a possibly multi-seller order.
#[derive(Debug)]
pub struct SellerOrderView<'a> {
    /// The full order.
    pub order: &'a Order,

    /// Only the lines sold by this seller.
    pub items: Vec<&'a OrderItem>,

    /// Sum of this seller's line subtotals.
    pub seller_subtotal: f64,
}

impl SellerOrderView<'_> {
    /// Whether the order also contains other sellers' items.
    pub fn is_partial(&self) -> bool {
        self.items.len() < self.order.items.len()
    }

    /// Number of lines in the order that belong to other sellers.
    pub fn other_item_count(&self) -> usize {
        self.order.items.len() - self.items.len()
    }
}

/// Body for `POST /orders`, derived from the cart at submission time.
///
/// Carries product ids and quantities only; the server is the authority on
/// pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// The purchasing buyer's id.
    pub buyer_id: String,

    /// Requested lines.
    pub items: Vec<OrderRequestItem>,
}

/// One requested line of an [`OrderRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequestItem {
    /// Product to order.
    pub product_id: String,

    /// Units to order.
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn order_decodes_populated_references() -> TestResult {
        let body = r#"{
            "_id": "o1",
            "buyerId": {"_id": "b1", "name": "Ada"},
            "items": [
                {
                    "productId": {"_id": "p1", "title": "Widget", "sellerId": "s1"},
                    "quantity": 2,
                    "unitPrice": 10.0,
                    "subtotal": 20.0
                }
            ],
            "totalAmount": 20.0,
            "status": "pending",
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;

        let order: Order = serde_json::from_str(body)?;

        assert_eq!(order.buyer_id.id(), "b1");
        assert_eq!(order.buyer_id.name(), Some("Ada"));
        assert_eq!(order.items[0].product_id.id(), "p1");
        assert_eq!(order.items[0].product_id.seller_id(), Some("s1"));
        assert_eq!(order.status, OrderStatus::Pending);

        Ok(())
    }

    #[test]
    fn order_decodes_plain_id_references() -> TestResult {
        let body = r#"{
            "_id": "o2",
            "buyerId": "b1",
            "items": [
                {"productId": "p1", "quantity": 1, "unitPrice": 5.0, "subtotal": 5.0}
            ],
            "totalAmount": 5.0,
            "status": "paid"
        }"#;

        let order: Order = serde_json::from_str(body)?;

        assert_eq!(order.buyer_id.id(), "b1");
        assert_eq!(order.buyer_id.name(), None);
        assert_eq!(order.items[0].product_id.title(), None);
        assert!(order.created_at.is_none());

        Ok(())
    }

    #[test]
    fn seller_view_splits_a_multi_seller_order() -> TestResult {
        let body = r#"{
            "_id": "o3",
            "buyerId": "b1",
            "items": [
                {
                    "productId": {"_id": "p1", "title": "Widget", "sellerId": "s1"},
                    "quantity": 2, "unitPrice": 10.0, "subtotal": 20.0
                },
                {
                    "productId": {"_id": "p2", "title": "Gadget", "sellerId": "s2"},
                    "quantity": 1, "unitPrice": 4.0, "subtotal": 4.0
                }
            ],
            "totalAmount": 24.0,
            "status": "pending"
        }"#;

        let order: Order = serde_json::from_str(body)?;
        let view = order.seller_view("s1").ok_or("expected a seller view")?;

        assert_eq!(view.items.len(), 1);
        assert!((view.seller_subtotal - 20.0).abs() < f64::EPSILON);
        assert!(view.is_partial());
        assert_eq!(view.other_item_count(), 1);
        assert!(order.seller_view("s9").is_none());

        Ok(())
    }

    #[test]
    fn order_request_serializes_ids_and_quantities_only() -> TestResult {
        let request = OrderRequest {
            buyer_id: "b1".to_string(),
            items: vec![OrderRequestItem {
                product_id: "p1".to_string(),
                quantity: 3,
            }],
        };

        let json = serde_json::to_value(&request)?;

        assert_eq!(
            json,
            serde_json::json!({
                "buyerId": "b1",
                "items": [{"productId": "p1", "quantity": 3}]
            })
        );

        Ok(())
    }

    #[test]
    fn patch_bodies_omit_absent_fields() -> TestResult {
        let update = ProductUpdate {
            price: Some(9.5),
            ..ProductUpdate::default()
        };

        let json = serde_json::to_value(&update)?;

        assert_eq!(json, serde_json::json!({"price": 9.5}));

        Ok(())
    }
}
