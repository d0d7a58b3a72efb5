//! Console rendering of catalog, user, order and cart snapshots.
//!
//! This is the rendering layer's input contract made concrete: every
//! function takes a read-only snapshot produced by the core and returns a
//! table. Currency amounts are rounded to two decimal places here and only
//! here; the core always works with un-rounded values.

use tabled::{Table, builder::Builder, settings::Style};

use crate::{
    api::models::{Order, Product, SellerOrderView, User},
    cart::Cart,
};

/// Format a currency amount for display.
pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Cart badge text: the quantity sum, capped at "99+".
pub fn badge(item_count: u32) -> String {
    if item_count > 99 {
        "99+".to_string()
    } else {
        item_count.to_string()
    }
}

/// Tabulate a product listing.
pub fn products_table(products: &[Product]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Title", "Price", "Stock", "Category", "Seller"]);

    for product in products {
        let seller = product
            .seller_id
            .name()
            .unwrap_or_else(|| product.seller_id.id());

        builder.push_record([
            product.id.as_str(),
            product.title.as_str(),
            &money(product.price),
            &product.stock.to_string(),
            product.category.as_str(),
            seller,
        ]);
    }

    styled(builder)
}

/// Tabulate a user listing.
pub fn users_table(users: &[User]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Email", "Role", "Member since"]);

    for user in users {
        builder.push_record([
            user.id.as_str(),
            user.name.as_str(),
            user.email.as_deref().unwrap_or("-"),
            user.role.as_str(),
            &timestamp(user.created_at.as_ref()),
        ]);
    }

    styled(builder)
}

/// Tabulate an order listing.
pub fn orders_table(orders: &[Order]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Order", "Buyer", "Lines", "Total", "Status", "Placed"]);

    for order in orders {
        let buyer = order.buyer_id.name().unwrap_or_else(|| order.buyer_id.id());

        builder.push_record([
            order.id.as_str(),
            buyer,
            &order.items.len().to_string(),
            &money(order.total_amount),
            order.status.as_str(),
            &timestamp(order.created_at.as_ref()),
        ]);
    }

    styled(builder)
}

/// Tabulate one order's priced lines.
pub fn order_lines_table(order: &Order) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Product", "Qty", "Unit", "Subtotal"]);

    for item in &order.items {
        let title = item.product_id.title().unwrap_or_else(|| item.product_id.id());

        builder.push_record([
            title,
            &item.quantity.to_string(),
            &money(item.unit_price),
            &money(item.subtotal),
        ]);
    }

    styled(builder)
}

/// Tabulate a seller's share of orders, marking multi-seller orders.
pub fn seller_orders_table(views: &[SellerOrderView<'_>]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Order", "Buyer", "Your lines", "Your total", "Status", "Note"]);

    for view in views {
        let order = view.order;
        let buyer = order.buyer_id.name().unwrap_or_else(|| order.buyer_id.id());
        let note = if view.is_partial() {
            format!(
                "+{} line(s) from other sellers (order total {})",
                view.other_item_count(),
                money(order.total_amount)
            )
        } else {
            String::new()
        };

        builder.push_record([
            order.id.as_str(),
            buyer,
            &view.items.len().to_string(),
            &money(view.seller_subtotal),
            order.status.as_str(),
            &note,
        ]);
    }

    styled(builder)
}

/// Tabulate the cart with a trailing total row.
pub fn cart_table(cart: &Cart) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Product", "Qty", "Unit", "Subtotal"]);

    for item in cart.items() {
        builder.push_record([
            item.title(),
            &item.quantity().to_string(),
            &money(item.unit_price()),
            &money(item.subtotal()),
        ]);
    }

    builder.push_record([
        "Total",
        &cart.item_count().to_string(),
        "",
        &money(cart.total()),
    ]);

    styled(builder)
}

fn styled(builder: Builder) -> Table {
    let mut table = builder.build();
    table.with(Style::rounded());
    table
}

fn timestamp(value: Option<&jiff::Timestamp>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_rounds_to_two_decimals() {
        assert_eq!(money(10.0), "$10.00");
        assert_eq!(money(3.556), "$3.56");
        assert_eq!(money(0.004), "$0.00");
    }

    #[test]
    fn badge_caps_at_ninety_nine() {
        assert_eq!(badge(0), "0");
        assert_eq!(badge(42), "42");
        assert_eq!(badge(100), "99+");
    }

    #[test]
    fn cart_table_includes_total_row() {
        let mut cart = Cart::new();
        cart.add_item("P1", "Widget", 10.0, 5, 3)
            .unwrap_or_else(|e| panic!("fixture add failed: {e}"));

        let rendered = cart_table(&cart).to_string();

        assert!(rendered.contains("Widget"));
        assert!(rendered.contains("$30.00"));
    }
}
