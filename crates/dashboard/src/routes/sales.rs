//! Sales desk: sell single units from the catalog and watch today's totals.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use farm2hand_core::ProductId;
use farm2hand_core::loyalty::points_for;
use farm2hand_core::product::Product;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::routes::{ConfirmForm, NoticeQuery, ShellView, Tab, redirect_with_notice};
use crate::state::AppState;

/// Sellable product display data.
#[derive(Clone)]
pub struct SaleItemView {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: String,
    pub unit: String,
    pub stock: u32,
    pub points: u64,
    pub sellable: bool,
    pub reason: Option<&'static str>,
}

impl From<&Product> for SaleItemView {
    fn from(product: &Product) -> Self {
        let reason = if !product.status.is_active() {
            Some("Paused")
        } else if product.is_out_of_stock() {
            Some("Out of stock")
        } else {
            None
        };
        Self {
            id: product.id,
            name: product.name.clone(),
            image: product.image.as_str().to_string(),
            price: product.price.display(),
            unit: product.unit.clone(),
            stock: product.stock,
            points: points_for(&product.price),
            sellable: reason.is_none(),
            reason,
        }
    }
}

/// Sales desk template.
#[derive(Template, WebTemplate)]
#[template(path = "sales/index.html")]
pub struct SalesTemplate {
    pub shell: ShellView,
    pub revenue: String,
    pub points: u64,
    pub items: u32,
    pub products: Vec<SaleItemView>,
    pub notice: Option<String>,
}

/// Sale confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "sales/confirm.html")]
pub struct SaleConfirmTemplate {
    pub shell: ShellView,
    pub product: SaleItemView,
}

/// Display today's totals and the sellable catalog.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    let ledger = state.store().ledger().await;
    let products = state
        .store()
        .products()
        .await
        .list()
        .map(SaleItemView::from)
        .collect();

    SalesTemplate {
        shell: ShellView::new(&state, Tab::Sales),
        revenue: ledger.revenue.display(),
        points: ledger.points,
        items: ledger.items,
        products,
        notice: query.notice,
    }
}

/// Ask before selling a unit.
#[instrument(skip(state))]
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .store()
        .products()
        .await
        .get(id)
        .map(SaleItemView::from)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(SaleConfirmTemplate {
        shell: ShellView::new(&state, Tab::Sales),
        product,
    })
}

/// Sell one unit once confirmed; otherwise ask again.
#[instrument(skip(state))]
pub async fn sell(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<ConfirmForm>,
) -> Result<Redirect, AppError> {
    if !form.is_confirmed() {
        return Ok(Redirect::to(&format!("/sales/{id}/sell")));
    }

    let receipt = state.store().sell_one(id).await?;
    tracing::info!(
        product_id = %receipt.product_id,
        price = %receipt.price,
        points = receipt.points,
        "Sale recorded"
    );

    Ok(redirect_with_notice(
        "/sales",
        &format!("Sold! Earned {} points", receipt.points),
    ))
}
