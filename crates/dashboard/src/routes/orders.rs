//! Order route handlers.
//!
//! The list and the detail panel share one page. Selecting an order keeps the
//! active filter; applying an action redirects back to the same selection so
//! both the card and the panel show the new status.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use farm2hand_core::order::{Order, OrderFilter, OrderLine, StatusCounts};
use farm2hand_core::{OrderAction, OrderNumber, OrderStatus};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::routes::{ShellView, Tab};
use crate::state::AppState;

/// Order list query string.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    pub notice: Option<String>,
}

impl OrdersQuery {
    fn filter(&self) -> Result<OrderFilter, AppError> {
        parse_filter(self.status.as_deref())
    }
}

/// Parse a `?status=` value; absent means everything.
pub fn parse_filter(raw: Option<&str>) -> Result<OrderFilter, AppError> {
    raw.unwrap_or_default()
        .parse()
        .map_err(AppError::BadRequest)
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub action: String,
    /// Filter to return to.
    #[serde(default)]
    pub status: Option<String>,
}

/// Filter chip display data.
#[derive(Clone)]
pub struct FilterChipView {
    pub label: &'static str,
    pub href: String,
    pub count: usize,
    pub active: bool,
}

fn filter_chips(counts: &StatusCounts, active: OrderFilter) -> Vec<FilterChipView> {
    OrderFilter::CHIPS
        .iter()
        .map(|&filter| FilterChipView {
            label: filter.label(),
            href: format!("/orders?status={filter}"),
            count: counts.count(filter),
            active: filter == active,
        })
        .collect()
}

/// Line item display data.
#[derive(Clone)]
pub struct LineView {
    pub product_name: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: String,
    pub total: String,
}

impl From<&OrderLine> for LineView {
    fn from(line: &OrderLine) -> Self {
        Self {
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            unit: line.unit.clone(),
            unit_price: line.unit_price.display(),
            total: line.line_total().display(),
        }
    }
}

/// Order card display data for the list.
#[derive(Clone)]
pub struct OrderCardView {
    pub number: String,
    pub href: String,
    pub customer_name: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub ordered_at: String,
    pub lines: Vec<LineView>,
    pub total: String,
    pub selected: bool,
}

impl OrderCardView {
    fn new(order: &Order, filter: OrderFilter, selected: Option<&OrderNumber>) -> Self {
        Self {
            number: order.number.to_string(),
            href: order_href(&order.number, filter),
            customer_name: order.customer_name.clone(),
            status_label: order.status.label(),
            status_class: order.status.as_str(),
            ordered_at: format_timestamp(order.ordered_at),
            lines: order.lines.iter().map(LineView::from).collect(),
            total: order.total().display(),
            selected: selected == Some(&order.number),
        }
    }
}

/// Action button display data.
#[derive(Clone)]
pub struct ActionView {
    pub value: &'static str,
    pub label: &'static str,
    pub class: &'static str,
}

impl From<OrderAction> for ActionView {
    fn from(action: OrderAction) -> Self {
        Self {
            value: action.as_str(),
            label: action.label(),
            class: if action == OrderAction::Cancel {
                "danger"
            } else {
                "primary"
            },
        }
    }
}

/// Detail panel display data.
#[derive(Clone)]
pub struct OrderDetailView {
    pub number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub note: Option<String>,
    pub lines: Vec<LineView>,
    pub total: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub ordered_at: String,
    pub delivery_at: Option<String>,
    pub actions: Vec<ActionView>,
    pub form_action: String,
}

impl From<&Order> for OrderDetailView {
    fn from(order: &Order) -> Self {
        Self {
            number: order.number.to_string(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            address: order.address.clone(),
            note: order.note.clone().filter(|n| !n.trim().is_empty()),
            lines: order.lines.iter().map(LineView::from).collect(),
            total: order.total().display(),
            status_label: order.status.label(),
            status_class: order.status.as_str(),
            ordered_at: format_timestamp(order.ordered_at),
            delivery_at: order.delivery_at.map(format_timestamp),
            actions: order
                .status
                .available_actions()
                .iter()
                .copied()
                .map(ActionView::from)
                .collect(),
            form_action: format!("/orders/{}/status", order.number),
        }
    }
}

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub shell: ShellView,
    pub chips: Vec<FilterChipView>,
    pub orders: Vec<OrderCardView>,
    pub detail: Option<OrderDetailView>,
    pub filter: &'static str,
    pub notice: Option<String>,
}

fn format_timestamp(at: chrono::NaiveDateTime) -> String {
    at.format(farm2hand_core::order::TIMESTAMP_FORMAT).to_string()
}

fn order_href(number: &OrderNumber, filter: OrderFilter) -> String {
    format!("/orders/{number}?status={filter}")
}

async fn render(
    state: &AppState,
    filter: OrderFilter,
    selected: Option<&OrderNumber>,
    notice: Option<String>,
) -> Result<OrdersTemplate, AppError> {
    let orders = state.store().orders().await;

    let detail = match selected {
        Some(number) => Some(
            orders
                .get(number)
                .map(OrderDetailView::from)
                .ok_or_else(|| AppError::NotFound(format!("order {number}")))?,
        ),
        None => None,
    };

    Ok(OrdersTemplate {
        shell: ShellView::new(state, Tab::Orders),
        chips: filter_chips(&orders.counts(), filter),
        orders: orders
            .list(filter)
            .into_iter()
            .map(|order| OrderCardView::new(order, filter, selected))
            .collect(),
        detail,
        filter: filter.as_str(),
        notice,
    })
}

/// Display the order list.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.filter()?;
    render(&state, filter, None, query.notice).await
}

/// Display the order list with one order's detail panel.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(number): Path<OrderNumber>,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.filter()?;
    render(&state, filter, Some(&number), query.notice).await
}

/// Apply an operator action to one order.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(number): Path<OrderNumber>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AppError> {
    let action: OrderAction = form.action.parse().map_err(AppError::BadRequest)?;
    let filter = parse_filter(form.status.as_deref()).unwrap_or_default();
    let now = chrono::Local::now().naive_local();

    let status: OrderStatus = state
        .store()
        .orders_mut()
        .await
        .apply(&number, action, now)?
        .status;
    tracing::info!(order = %number, action = %action, status = %status, "Order status updated");

    let notice: String = url::form_urlencoded::byte_serialize(
        format!("Order {number} is now {}", status.label().to_lowercase()).as_bytes(),
    )
    .collect();
    Ok(Redirect::to(&format!(
        "{}&notice={notice}",
        order_href(&number, filter)
    )))
}
