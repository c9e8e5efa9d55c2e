//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Redirect to /products
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check
//!
//! # Products
//! GET  /products                    - Catalog (?notice=)
//! GET  /products/new                - Create form
//! POST /products                    - Create (multipart)
//! GET  /products/{id}/edit          - Edit form
//! POST /products/{id}               - Update (multipart)
//! POST /products/{id}/toggle        - Flip active/inactive
//! GET  /products/{id}/delete        - Delete confirmation
//! POST /products/{id}/delete        - Delete (confirm=yes)
//!
//! # Orders
//! GET  /orders                      - Order list (?status=)
//! GET  /orders/{number}             - Order list with detail panel
//! POST /orders/{number}/status      - Apply an action
//!
//! # Chat
//! GET  /chat                        - Redirect to the first contact
//! GET  /chat/{id}                   - Contacts and conversation (?q=);
//!                                     marks the contact read (idempotent)
//! POST /chat/{id}/messages          - Send a message
//!
//! # Points and sales
//! GET  /points                      - Loyalty points
//! GET  /sales                       - Sales desk (?notice=)
//! GET  /sales/{id}/sell             - Sale confirmation
//! POST /sales/{id}/sell             - Sell one unit
//!
//! # JSON API
//! GET  /api/orders                  - Orders (?status=)
//! GET  /api/orders/{number}         - One order with its available actions
//! POST /api/orders/{number}/status  - Apply {"action": "..."}
//! ```

pub mod api;
pub mod chat;
pub mod health;
pub mod orders;
pub mod points;
pub mod products;
pub mod sales;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Top-level dashboard screens, one per sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Products,
    Orders,
    Chat,
    Points,
    Sales,
}

impl Tab {
    pub const ALL: [Self; 5] = [
        Self::Products,
        Self::Orders,
        Self::Chat,
        Self::Points,
        Self::Sales,
    ];

    #[must_use]
    pub const fn href(self) -> &'static str {
        match self {
            Self::Products => "/products",
            Self::Orders => "/orders",
            Self::Chat => "/chat",
            Self::Points => "/points",
            Self::Sales => "/sales",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Products => "My products",
            Self::Orders => "Orders",
            Self::Chat => "Chat",
            Self::Points => "Points",
            Self::Sales => "Sales",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Products => "📦",
            Self::Orders => "🛒",
            Self::Chat => "💬",
            Self::Points => "🏆",
            Self::Sales => "📈",
        }
    }
}

/// Sidebar link display data.
#[derive(Clone)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

/// Header and sidebar shared by every page.
#[derive(Clone)]
pub struct ShellView {
    pub seller_name: String,
    pub nav: Vec<NavItem>,
}

impl ShellView {
    #[must_use]
    pub fn new(state: &AppState, active: Tab) -> Self {
        Self {
            seller_name: state.config().seller_name.clone(),
            nav: Tab::ALL
                .iter()
                .map(|&tab| NavItem {
                    href: tab.href(),
                    label: tab.label(),
                    icon: tab.icon(),
                    active: tab == active,
                })
                .collect(),
        }
    }
}

/// One-shot message carried through a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

/// Form field confirming a destructive or stock-changing action.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    pub confirm: Option<String>,
}

impl ConfirmForm {
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("yes")
    }
}

/// Redirect to `path` with `?notice=` set.
#[must_use]
pub fn redirect_with_notice(path: &str, notice: &str) -> Redirect {
    let encoded: String = url::form_urlencoded::byte_serialize(notice.as_bytes()).collect();
    Redirect::to(&format!("{path}?notice={encoded}"))
}

/// Create the product routes router.
pub fn product_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_form))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_form))
        .route("/{id}/toggle", post(products::toggle))
        .route(
            "/{id}/delete",
            get(products::delete_confirm).post(products::delete),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{number}", get(orders::show))
        .route("/{number}/status", post(orders::update_status))
}

/// Create the chat routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(chat::index))
        .route("/{id}", get(chat::show))
        .route("/{id}/messages", post(chat::send))
}

/// Create the sales desk routes router.
pub fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(sales::index))
        .route("/{id}/sell", get(sales::confirm).post(sales::sell))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(api::list_orders))
        .route("/orders/{number}", get(api::get_order))
        .route("/orders/{number}/status", post(api::update_order_status))
}

/// Create all routes for the dashboard.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes(max_upload_bytes))
        .nest("/orders", order_routes())
        .nest("/chat", chat_routes())
        .route("/points", get(points::index))
        .nest("/sales", sales_routes())
        .nest("/api", api_routes())
}
