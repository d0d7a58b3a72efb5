//! Session & roles
//!
//! The role/view state machine: exactly one [`Actor`] is active at a time,
//! and every role transition (other than staying anonymous) resets the cart
//! and the catalog filters. Transitions are synchronous; all remote work
//! happens outside this module.

use thiserror::Error;

use crate::{
    api::models::Product,
    cart::{AddOutcome, Cart, CartError},
};

/// The role currently driving the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Actor {
    /// Nobody is signed in.
    #[default]
    Anonymous,
    /// A buyer, browsing and purchasing via the storefront.
    Buyer(String),
    /// A seller, managing their own catalogue.
    Seller(String),
    /// An admin, overseeing users, products and orders.
    Admin(String),
}

impl Actor {
    /// Parse a dashboard role-selector value.
    ///
    /// The selector encodes roles as `""` (anonymous), `seller_<id>` and
    /// `admin`; `admin` resolves against the directory's admin user id.
    /// `buyer` is rejected here because buyers sign in through the
    /// storefront, which supplies a concrete buyer id (see
    /// [`Session::login_buyer`]).
    ///
    /// # Errors
    ///
    /// Returns a [`RoleParseError`] for `buyer`, for `admin` without a known
    /// admin user, and for anything else unrecognised.
    pub fn from_selector(value: &str, admin_id: Option<&str>) -> Result<Self, RoleParseError> {
        match value {
            "" => Ok(Actor::Anonymous),
            "admin" => admin_id
                .map(|id| Actor::Admin(id.to_string()))
                .ok_or(RoleParseError::NoAdminUser),
            "buyer" => Err(RoleParseError::BuyerUsesStorefront),
            other => match other.strip_prefix("seller_") {
                Some(id) if !id.is_empty() => Ok(Actor::Seller(id.to_string())),
                _ => Err(RoleParseError::Unrecognised(other.to_string())),
            },
        }
    }

    /// The signed-in user's id, if any.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Actor::Anonymous => None,
            Actor::Buyer(id) | Actor::Seller(id) | Actor::Admin(id) => Some(id),
        }
    }

    /// Whether nobody is signed in.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Actor::Anonymous)
    }

    /// Whether a buyer is signed in.
    pub fn is_buyer(&self) -> bool {
        matches!(self, Actor::Buyer(_))
    }

    /// The area of the UI this actor lands on.
    pub fn home_section(&self) -> DashboardSection {
        match self {
            Actor::Anonymous => DashboardSection::Welcome,
            Actor::Buyer(_) => DashboardSection::Storefront,
            Actor::Seller(_) => DashboardSection::SellerTools,
            Actor::Admin(_) => DashboardSection::AdminOverview,
        }
    }
}

/// Errors parsing a role-selector value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleParseError {
    /// Buyers sign in through the storefront, not the dashboard selector.
    #[error("buyers sign in through the storefront")]
    BuyerUsesStorefront,

    /// `admin` was selected but no admin user is known.
    #[error("no admin user is available")]
    NoAdminUser,

    /// The selector value matched no known encoding.
    #[error("unrecognised role selector {0:?}")]
    Unrecognised(String),
}

/// Which area of the UI is visible for the active actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardSection {
    /// No role selected yet.
    Welcome,
    /// Buyer-facing browsing and purchasing view.
    Storefront,
    /// Seller catalogue management.
    SellerTools,
    /// Admin overview of users, products and orders.
    AdminOverview,
}

/// Search and category filters held by the view layer.
///
/// Category filtering is delegated to the server where possible; search is
/// applied client-side over title, description and category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    search: Option<String>,
    category: Option<String>,
}

impl CatalogFilter {
    /// Active search term.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Active category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Set or clear the search term; blank input clears it.
    pub fn set_search(&mut self, term: Option<String>) {
        self.search = term
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    /// Set or clear the category.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty());
    }

    /// Drop both filters.
    pub fn reset(&mut self) {
        self.search = None;
        self.category = None;
    }

    /// Whether a product passes both filters.
    ///
    /// The search term matches case-insensitively against title, description
    /// and category; the category filter is an exact (case-insensitive)
    /// match.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        let Some(search) = &self.search else {
            return true;
        };
        let needle = search.to_lowercase();

        [
            Some(product.title.as_str()),
            product.description.as_deref(),
            Some(product.category.as_str()),
        ]
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Errors from role-gated cart operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Cart mutations are a buyer affordance.
    #[error("only a signed-in buyer can modify the cart")]
    NotABuyer,

    /// The underlying cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Per-tab session state: the active actor, their cart, and the catalog
/// filters.
///
/// This replaces the page-level globals of a browser client with one owned
/// value; the rendering layer reads [`Session::actor`], [`Session::cart`]
/// and [`Session::filter`] as snapshots after each mutation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    actor: Actor,
    cart: Cart,
    filter: CatalogFilter,
}

impl Session {
    /// Create an anonymous session with an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active actor.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The session's cart, read-only.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Direct cart access. Storefront paths go through the role-gated
    /// helpers below; this exists for flows that own their own gating.
    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// The catalog filters, read-only.
    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    /// Mutable access to the catalog filters.
    pub fn filter_mut(&mut self) -> &mut CatalogFilter {
        &mut self.filter
    }

    /// Switch the active actor.
    ///
    /// Every transition except Anonymous→Anonymous clears the cart and
    /// resets the catalog filters; the cart never survives a change of
    /// actor.
    pub fn switch_to(&mut self, next: Actor) {
        if !(self.actor.is_anonymous() && next.is_anonymous()) {
            self.cart.clear();
            self.filter.reset();
        }

        self.actor = next;
    }

    /// Parse a dashboard selector value and transition to the resulting
    /// actor.
    ///
    /// # Errors
    ///
    /// Returns a [`RoleParseError`] when the value does not parse; the
    /// session is left unchanged in that case.
    pub fn select_role(
        &mut self,
        value: &str,
        admin_id: Option<&str>,
    ) -> Result<&Actor, RoleParseError> {
        let next = Actor::from_selector(value, admin_id)?;
        self.switch_to(next);
        Ok(&self.actor)
    }

    /// Sign in as a concrete buyer (the storefront login action).
    pub fn login_buyer(&mut self, user_id: impl Into<String>) {
        self.switch_to(Actor::Buyer(user_id.into()));
    }

    /// Return to anonymous browsing.
    pub fn logout(&mut self) {
        self.switch_to(Actor::Anonymous);
    }

    /// Add a product to the cart, capturing its title, price and stock at
    /// this moment.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotABuyer`] unless a buyer is signed in, and
    /// propagates [`CartError`] for out-of-stock products.
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        requested: u32,
    ) -> Result<AddOutcome, SessionError> {
        self.require_buyer()?;

        let outcome = self.cart.add_item(
            &product.id,
            &product.title,
            product.price,
            product.stock,
            requested,
        )?;

        Ok(outcome)
    }

    /// Remove a product from the cart; a missing id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotABuyer`] unless a buyer is signed in.
    pub fn remove_from_cart(&mut self, product_id: &str) -> Result<(), SessionError> {
        self.require_buyer()?;
        self.cart.remove_item(product_id);
        Ok(())
    }

    /// Edit the quantity of an existing cart entry, clamped against the
    /// stock captured at add time.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotABuyer`] unless a buyer is signed in.
    pub fn set_cart_quantity(
        &mut self,
        product_id: &str,
        quantity: u32,
    ) -> Result<Option<u32>, SessionError> {
        self.require_buyer()?;
        Ok(self.cart.set_quantity(product_id, quantity))
    }

    fn require_buyer(&self) -> Result<(), SessionError> {
        if self.actor.is_buyer() {
            Ok(())
        } else {
            Err(SessionError::NotABuyer)
        }
    }
}
