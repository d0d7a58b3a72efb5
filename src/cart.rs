//! Cart
//!
//! In-memory shopping cart: an ordered sequence of line items, one entry per
//! distinct product. Quantities are clamped against the stock captured when
//! the product was added; totals are recomputed from un-rounded unit prices
//! on every call.

use thiserror::Error;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product has no stock; no line item was inserted.
    #[error("product {0} is out of stock")]
    OutOfStock(String),
}

/// One product and quantity held in the cart.
///
/// Title, unit price and stock limit are captured at add time and are not
/// re-synced if the product changes upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    product_id: String,
    title: String,
    unit_price: f64,
    quantity: u32,
    stock_limit: u32,
}

impl LineItem {
    /// Identifier of the product this line refers to.
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Display name captured at add time.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Unit price captured at add time, un-rounded.
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// Current quantity, always within `1..=stock_limit`.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Last-known stock for this product.
    pub fn stock_limit(&self) -> u32 {
        self.stock_limit
    }

    /// Unit price × quantity for this line, un-rounded.
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Outcome of a successful [`Cart::add_item`].
///
/// Clamping is informational, not an error: the mutation succeeded, but the
/// resulting quantity was held at the product's stock limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The requested quantity was applied in full; `quantity` is the
    /// resulting quantity of the entry.
    Added {
        /// Resulting entry quantity.
        quantity: u32,
    },

    /// The requested quantity would have exceeded stock; the entry was held
    /// at the stock limit.
    Clamped {
        /// Resulting entry quantity (equal to `stock_limit`).
        quantity: u32,
        /// The stock limit the quantity was clamped to.
        stock_limit: u32,
    },
}

impl AddOutcome {
    /// Resulting entry quantity, regardless of clamping.
    pub fn quantity(&self) -> u32 {
        match *self {
            AddOutcome::Added { quantity } | AddOutcome::Clamped { quantity, .. } => quantity,
        }
    }
}

/// Client-local, non-persisted collection of selected products pending order
/// submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `requested` units of a product, merging into the existing entry
    /// when the product is already in the cart.
    ///
    /// A requested quantity of zero is treated as one. On merge, `stock`
    /// becomes the entry's new last-known stock limit and the combined
    /// quantity is re-clamped against it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] when `stock` is zero; the cart is
    /// left unchanged.
    pub fn add_item(
        &mut self,
        product_id: &str,
        title: &str,
        unit_price: f64,
        stock: u32,
        requested: u32,
    ) -> Result<AddOutcome, CartError> {
        if stock == 0 {
            return Err(CartError::OutOfStock(product_id.to_string()));
        }

        let requested = requested.max(1);

        if let Some(existing) = self.find_mut(product_id) {
            existing.stock_limit = stock;
            let combined = existing.quantity.saturating_add(requested);

            if combined > stock {
                existing.quantity = stock;
                return Ok(AddOutcome::Clamped {
                    quantity: stock,
                    stock_limit: stock,
                });
            }

            existing.quantity = combined;
            return Ok(AddOutcome::Added { quantity: combined });
        }

        let quantity = requested.min(stock);
        let outcome = if requested > stock {
            AddOutcome::Clamped {
                quantity,
                stock_limit: stock,
            }
        } else {
            AddOutcome::Added { quantity }
        };

        self.items.push(LineItem {
            product_id: product_id.to_string(),
            title: title.to_string(),
            unit_price,
            quantity,
            stock_limit: stock,
        });

        Ok(outcome)
    }

    /// Delete the entry for `product_id`. A missing id is a no-op.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|item| item.product_id != product_id);
    }

    /// Set the quantity of an existing entry, clamped into
    /// `1..=stock_limit`.
    ///
    /// Returns the quantity actually applied, or `None` when no entry
    /// matches `product_id`.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> Option<u32> {
        let item = self.find_mut(product_id)?;
        item.quantity = quantity.clamp(1, item.stock_limit);
        Some(item.quantity)
    }

    /// Sum of unit price × quantity over all entries, recomputed fresh from
    /// un-rounded unit prices.
    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Sum of quantities over all entries (the badge count), distinct from
    /// the entry count.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(LineItem::quantity).sum()
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn find_mut(&mut self, product_id: &str) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }
}
