//! Bazaar prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    api::{
        MarketClient,
        error::ApiError,
        models::{
            NewProduct, NewUser, Order, OrderRequest, OrderRequestItem, OrderStatus, Product,
            ProductQuery, ProductUpdate, Role, SellerOrderView, User, UserUpdate,
        },
    },
    cart::{AddOutcome, Cart, CartError, LineItem},
    checkout::{Checkout, CheckoutError, OrderGateway},
    config::ApiConfig,
    session::{Actor, CatalogFilter, DashboardSection, RoleParseError, Session, SessionError},
};
