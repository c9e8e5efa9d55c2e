//! Single-unit sales and the running daily ledger.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loyalty::points_for;
use crate::product::Product;
use crate::types::{Price, ProductId};

/// Why a sale was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleError {
    #[error("{0} is out of stock")]
    OutOfStock(String),
    #[error("{0} is not on sale")]
    Inactive(String),
    #[error("today's totals cannot record another sale")]
    LedgerFull,
}

/// What one sale produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleReceipt {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit: String,
    pub price: Price,
    pub points: u64,
}

/// The receipt selling one unit of `product` would produce, without
/// touching it.
///
/// # Errors
///
/// Returns `SaleError::Inactive` when the product is paused and
/// `SaleError::OutOfStock` when no stock is left.
pub fn quote(product: &Product) -> Result<SaleReceipt, SaleError> {
    if !product.status.is_active() {
        return Err(SaleError::Inactive(product.name.clone()));
    }
    if product.is_out_of_stock() {
        return Err(SaleError::OutOfStock(product.name.clone()));
    }
    Ok(SaleReceipt {
        product_id: product.id,
        product_name: product.name.clone(),
        unit: product.unit.clone(),
        price: product.price,
        points: points_for(&product.price),
    })
}

/// Sell one unit of `product`, decrementing its stock.
///
/// # Errors
///
/// As [`quote`]. The product is left untouched on error, so stock can never
/// go below zero.
pub fn sell_one(product: &mut Product) -> Result<SaleReceipt, SaleError> {
    let receipt = quote(product)?;
    product.stock -= 1;
    Ok(receipt)
}

/// Today's running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesLedger {
    pub revenue: Price,
    pub points: u64,
    pub items: u32,
}

impl SalesLedger {
    /// The totals after one more sale.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::LedgerFull` if any total would overflow.
    pub fn with_sale(&self, receipt: &SaleReceipt) -> Result<Self, SaleError> {
        Ok(Self {
            revenue: self
                .revenue
                .checked_add(receipt.price)
                .ok_or(SaleError::LedgerFull)?,
            points: self
                .points
                .checked_add(receipt.points)
                .ok_or(SaleError::LedgerFull)?,
            items: self.items.checked_add(1).ok_or(SaleError::LedgerFull)?,
        })
    }

    /// Add one sale to the totals. Nothing changes on error.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::LedgerFull` if any total would overflow.
    pub fn record(&mut self, receipt: &SaleReceipt) -> Result<(), SaleError> {
        *self = self.with_sale(receipt)?;
        Ok(())
    }
}
