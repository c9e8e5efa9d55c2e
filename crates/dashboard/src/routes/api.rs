//! JSON order API.
//!
//! Mirrors the order screen for scripts: the same filter, the same
//! transitions and the same error statuses.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use farm2hand_core::order::{Order, TIMESTAMP_FORMAT};
use farm2hand_core::{OrderAction, OrderNumber, OrderStatus};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::routes::orders::parse_filter;
use crate::state::AppState;

/// Query string for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
}

/// Request for changing an order's status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub action: OrderAction,
}

/// One line of an order.
#[derive(Debug, Serialize)]
pub struct LineResponse {
    pub product_name: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: String,
    pub total: String,
}

/// An order as returned by the API.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub number: OrderNumber,
    pub customer_name: String,
    pub customer_phone: String,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub lines: Vec<LineResponse>,
    pub total: String,
    pub ordered_at: String,
    pub delivery_at: Option<String>,
    pub address: String,
    pub note: Option<String>,
    pub available_actions: Vec<OrderAction>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            number: order.number.clone(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            status: order.status,
            status_label: order.status.label(),
            lines: order
                .lines
                .iter()
                .map(|line| LineResponse {
                    product_name: line.product_name.clone(),
                    quantity: line.quantity,
                    unit: line.unit.clone(),
                    unit_price: line.unit_price.amount.to_string(),
                    total: line.line_total().amount.to_string(),
                })
                .collect(),
            total: order.total().amount.to_string(),
            ordered_at: order.ordered_at.format(TIMESTAMP_FORMAT).to_string(),
            delivery_at: order
                .delivery_at
                .map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
            address: order.address.clone(),
            note: order.note.clone(),
            available_actions: order.status.available_actions().to_vec(),
        }
    }
}

/// List orders, optionally filtered by `?status=`.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for an unknown status filter.
#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let filter = parse_filter(query.status.as_deref())?;
    let orders = state.store().orders().await;
    Ok(Json(
        orders
            .list(filter)
            .into_iter()
            .map(OrderResponse::from)
            .collect(),
    ))
}

/// Fetch one order.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown order number.
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(number): Path<OrderNumber>,
) -> Result<Json<OrderResponse>, AppError> {
    let orders = state.store().orders().await;
    orders
        .get(&number)
        .map(|order| Json(OrderResponse::from(order)))
        .ok_or_else(|| AppError::NotFound(format!("order {number}")))
}

/// Apply an action and return the updated order.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown order and `AppError::Conflict`
/// when the action is not available from the current status.
#[instrument(skip(state))]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(number): Path<OrderNumber>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let now = chrono::Local::now().naive_local();
    let mut orders = state.store().orders_mut().await;
    let order = orders.apply(&number, body.action, now)?;
    tracing::info!(order = %number, action = %body.action, status = %order.status, "Order status updated via API");
    Ok(Json(OrderResponse::from(order)))
}
