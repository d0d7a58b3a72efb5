//! Bazaar CLI
//!
//! Command surface over the marketplace API: browse and manage users,
//! products and orders, plus an end-to-end `orders place` flow that drives a
//! buyer session (add to cart with stock clamping, then submit).

use clap::{Args, Parser, Subcommand};

use crate::{
    api::{
        MarketClient,
        models::{NewProduct, NewUser, ProductQuery, ProductUpdate, Role, UserUpdate},
    },
    cart::AddOutcome,
    checkout::Checkout,
    config::ApiConfig,
    render,
    session::{CatalogFilter, Session},
};

/// Marketplace storefront client.
#[derive(Debug, Parser)]
#[command(name = "bazaar", about = "Marketplace storefront client", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    api: ApiConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage marketplace users
    #[command(subcommand)]
    Users(UsersCommand),

    /// Browse and manage the product catalogue
    #[command(subcommand)]
    Products(ProductsCommand),

    /// Inspect and place orders
    #[command(subcommand)]
    Orders(OrdersCommand),
}

#[derive(Debug, Subcommand)]
enum UsersCommand {
    /// List all users
    List,

    /// Create a user
    Create(CreateUserArgs),

    /// Update a user's name and/or email
    Update(UpdateUserArgs),
}

#[derive(Debug, Args)]
struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Contact email
    #[arg(long)]
    email: Option<String>,

    /// Role: buyer, seller or admin
    #[arg(long, value_parser = parse_role)]
    role: Role,
}

#[derive(Debug, Args)]
struct UpdateUserArgs {
    /// User id
    id: String,

    /// New display name
    #[arg(long)]
    name: Option<String>,

    /// New contact email
    #[arg(long)]
    email: Option<String>,
}

#[derive(Debug, Subcommand)]
enum ProductsCommand {
    /// List products, with optional filters
    List(ListProductsArgs),

    /// Show one product
    Show {
        /// Product id
        id: String,
    },

    /// Create a product in a seller's catalogue
    Create(CreateProductArgs),

    /// Update fields of a product
    Update(UpdateProductArgs),

    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },
}

#[derive(Debug, Args)]
struct ListProductsArgs {
    /// Restrict to one category (server-side filter)
    #[arg(long)]
    category: Option<String>,

    /// Restrict to one seller's catalogue (server-side filter)
    #[arg(long)]
    seller: Option<String>,

    /// Case-insensitive search over title, description and category
    #[arg(long)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    /// Owning seller's id
    #[arg(long)]
    seller: String,

    /// Display title
    #[arg(long)]
    title: String,

    /// Longer description
    #[arg(long)]
    description: String,

    /// Unit price
    #[arg(long)]
    price: f64,

    /// Units available
    #[arg(long)]
    stock: u32,

    /// Category label
    #[arg(long)]
    category: String,

    /// Optional image URL
    #[arg(long)]
    image: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateProductArgs {
    /// Product id
    id: String,

    /// New title
    #[arg(long)]
    title: Option<String>,

    /// New description
    #[arg(long)]
    description: Option<String>,

    /// New unit price
    #[arg(long)]
    price: Option<f64>,

    /// New stock level
    #[arg(long)]
    stock: Option<u32>,

    /// New category label
    #[arg(long)]
    category: Option<String>,

    /// New image URL
    #[arg(long)]
    image: Option<String>,
}

#[derive(Debug, Subcommand)]
enum OrdersCommand {
    /// List orders, optionally restricted to one buyer or seller
    List(ListOrdersArgs),

    /// Place an order as a buyer
    Place(PlaceOrderArgs),
}

#[derive(Debug, Args)]
struct ListOrdersArgs {
    /// Only this buyer's orders (server-side filter)
    #[arg(long)]
    buyer: Option<String>,

    /// Only lines sold by this seller (client-side view)
    #[arg(long, conflicts_with = "buyer")]
    seller: Option<String>,
}

#[derive(Debug, Args)]
struct PlaceOrderArgs {
    /// The purchasing buyer's id
    #[arg(long)]
    buyer: String,

    /// Line to order, as `<product-id>=<quantity>`; repeatable
    #[arg(long = "item", required = true)]
    items: Vec<String>,
}

impl Cli {
    /// Run the parsed command against the configured API.
    ///
    /// # Errors
    ///
    /// Returns a display-ready message when the command fails.
    pub async fn run(self) -> Result<(), String> {
        let client = MarketClient::new(&self.api)
            .map_err(|error| format!("failed to build API client: {error}"))?;

        match self.command {
            Commands::Users(command) => run_users(&client, command).await,
            Commands::Products(command) => run_products(&client, command).await,
            Commands::Orders(command) => run_orders(&client, command).await,
        }
    }
}

async fn run_users(client: &MarketClient, command: UsersCommand) -> Result<(), String> {
    match command {
        UsersCommand::List => {
            let users = client
                .list_users()
                .await
                .map_err(|error| format!("failed to list users: {error}"))?;
            println!("{}", render::users_table(&users));
        }
        UsersCommand::Create(args) => {
            let user = client
                .create_user(&NewUser {
                    name: args.name,
                    email: args.email,
                    role: args.role,
                })
                .await
                .map_err(|error| format!("failed to create user: {error}"))?;
            println!("created user {} ({})", user.id, user.role.as_str());
        }
        UsersCommand::Update(args) => {
            let user = client
                .update_user(
                    &args.id,
                    &UserUpdate {
                        name: args.name,
                        email: args.email,
                    },
                )
                .await
                .map_err(|error| format!("failed to update user: {error}"))?;
            println!("updated user {}", user.id);
        }
    }

    Ok(())
}

async fn run_products(client: &MarketClient, command: ProductsCommand) -> Result<(), String> {
    match command {
        ProductsCommand::List(args) => {
            let query = ProductQuery {
                category: args.category,
                seller_id: args.seller,
            };
            let products = client
                .list_products(&query)
                .await
                .map_err(|error| format!("failed to list products: {error}"))?;

            let mut filter = CatalogFilter::default();
            filter.set_search(args.search);
            let visible: Vec<_> = products
                .into_iter()
                .filter(|product| filter.matches(product))
                .collect();

            if visible.is_empty() {
                println!("no products found");
            } else {
                println!("{}", render::products_table(&visible));
            }
        }
        ProductsCommand::Show { id } => {
            let product = client
                .get_product(&id)
                .await
                .map_err(|error| format!("failed to fetch product: {error}"))?;
            println!("{}", render::products_table(std::slice::from_ref(&product)));
        }
        ProductsCommand::Create(args) => {
            let product = client
                .create_product(&NewProduct {
                    title: args.title,
                    description: args.description,
                    price: args.price,
                    stock: args.stock,
                    category: args.category,
                    seller_id: args.seller,
                    image: args.image,
                })
                .await
                .map_err(|error| format!("failed to create product: {error}"))?;
            println!("created product {}", product.id);
        }
        ProductsCommand::Update(args) => {
            let product = client
                .update_product(
                    &args.id,
                    &ProductUpdate {
                        title: args.title,
                        description: args.description,
                        price: args.price,
                        stock: args.stock,
                        category: args.category,
                        image: args.image,
                    },
                )
                .await
                .map_err(|error| format!("failed to update product: {error}"))?;
            println!("updated product {}", product.id);
        }
        ProductsCommand::Delete { id } => {
            client
                .delete_product(&id)
                .await
                .map_err(|error| format!("failed to delete product: {error}"))?;
            println!("deleted product {id}");
        }
    }

    Ok(())
}

async fn run_orders(client: &MarketClient, command: OrdersCommand) -> Result<(), String> {
    match command {
        OrdersCommand::List(args) => {
            let orders = client
                .list_orders(args.buyer.as_deref())
                .await
                .map_err(|error| format!("failed to list orders: {error}"))?;

            if let Some(seller_id) = args.seller {
                let views: Vec<_> = orders
                    .iter()
                    .filter_map(|order| order.seller_view(&seller_id))
                    .collect();
                if views.is_empty() {
                    println!("no orders contain this seller's products");
                } else {
                    println!("{}", render::seller_orders_table(&views));
                }
            } else if orders.is_empty() {
                println!("no orders found");
            } else {
                println!("{}", render::orders_table(&orders));
            }
        }
        OrdersCommand::Place(args) => place_order(client, args).await?,
    }

    Ok(())
}

async fn place_order(client: &MarketClient, args: PlaceOrderArgs) -> Result<(), String> {
    let mut session = Session::new();
    session.login_buyer(args.buyer.clone());

    for spec in &args.items {
        let (product_id, quantity) = parse_item_spec(spec)?;

        let product = client
            .get_product(product_id)
            .await
            .map_err(|error| format!("failed to fetch product {product_id}: {error}"))?;

        match session.add_to_cart(&product, quantity) {
            Ok(AddOutcome::Added { .. }) => {}
            Ok(AddOutcome::Clamped { quantity, stock_limit }) => {
                println!(
                    "only {stock_limit} of {} in stock; quantity adjusted to {quantity}",
                    product.title
                );
            }
            Err(error) => return Err(format!("cannot add {}: {error}", product.title)),
        }
    }

    println!("{}", render::cart_table(session.cart()));

    let order = Checkout::new(client.clone())
        .place_order(&mut session)
        .await
        .map_err(|error| format!("failed to place order: {error}"))?;

    println!(
        "order {} placed, total {}",
        order.id,
        render::money(order.total_amount)
    );

    // Refresh the buyer's order history, as the storefront does after checkout.
    let orders = client
        .list_orders(Some(&args.buyer))
        .await
        .map_err(|error| format!("failed to refresh order history: {error}"))?;
    println!("{}", render::orders_table(&orders));

    Ok(())
}

fn parse_item_spec(spec: &str) -> Result<(&str, u32), String> {
    match spec.split_once('=') {
        None => Ok((spec, 1)),
        Some((product_id, quantity)) => {
            let quantity = quantity
                .parse()
                .map_err(|_| format!("invalid quantity in item spec {spec:?}"))?;
            Ok((product_id, quantity))
        }
    }
}

fn parse_role(value: &str) -> Result<Role, String> {
    match value {
        "buyer" => Ok(Role::Buyer),
        "seller" => Ok(Role::Seller),
        "admin" => Ok(Role::Admin),
        other => Err(format!("unknown role {other:?}")),
    }
}
