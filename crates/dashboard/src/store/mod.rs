//! In-memory repositories behind the dashboard.
//!
//! Every collection is keyed by its identifier and owned by one [`Store`]
//! shared through `AppState`. Each repository sits behind its own
//! `tokio::sync::RwLock`; handlers hold a guard only for the duration of one
//! operation and never across an await on another lock, except the sale path
//! which always takes `products` before `sales`.

pub mod chat;
pub mod orders;
pub mod products;
pub mod seed;

use farm2hand_core::loyalty::{LoyaltyAccount, Reward};
use farm2hand_core::sales::{self, SaleError, SaleReceipt, SalesLedger};
use farm2hand_core::ProductId;
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use chat::ChatRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use seed::{SeedData, SeedError, validate_seed};

/// Errors that can occur during repository operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("{0}")]
    NotFound(String),

    /// The operation clashes with existing data or the record's state.
    #[error("{0}")]
    Conflict(String),
}

/// All dashboard data.
#[derive(Debug)]
pub struct Store {
    products: RwLock<ProductRepository>,
    orders: RwLock<OrderRepository>,
    chat: RwLock<ChatRepository>,
    sales: RwLock<SalesLedger>,
    loyalty: LoyaltyAccount,
    rewards: Vec<Reward>,
}

impl Store {
    /// Build every repository from a seed dataset.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the seed repeats an
    /// identifier or has messages for unknown contacts.
    pub fn from_seed(seed: SeedData) -> Result<Self, RepositoryError> {
        Ok(Self {
            products: RwLock::new(ProductRepository::new(seed.products)?),
            orders: RwLock::new(OrderRepository::new(seed.orders)?),
            chat: RwLock::new(ChatRepository::new(seed.contacts, seed.messages)?),
            sales: RwLock::new(seed.sales),
            loyalty: seed.loyalty,
            rewards: seed.rewards,
        })
    }

    pub async fn products(&self) -> RwLockReadGuard<'_, ProductRepository> {
        self.products.read().await
    }

    pub async fn products_mut(&self) -> RwLockWriteGuard<'_, ProductRepository> {
        self.products.write().await
    }

    pub async fn orders(&self) -> RwLockReadGuard<'_, OrderRepository> {
        self.orders.read().await
    }

    pub async fn orders_mut(&self) -> RwLockWriteGuard<'_, OrderRepository> {
        self.orders.write().await
    }

    pub async fn chat(&self) -> RwLockReadGuard<'_, ChatRepository> {
        self.chat.read().await
    }

    pub async fn chat_mut(&self) -> RwLockWriteGuard<'_, ChatRepository> {
        self.chat.write().await
    }

    /// Snapshot of today's sales totals.
    pub async fn ledger(&self) -> SalesLedger {
        *self.sales.read().await
    }

    #[must_use]
    pub const fn loyalty(&self) -> &LoyaltyAccount {
        &self.loyalty
    }

    #[must_use]
    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    /// Sell one unit of a product and add it to today's ledger.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown product and
    /// `RepositoryError::Conflict` when the product is paused or sold out,
    /// or today's totals cannot take another sale. Nothing changes on error.
    pub async fn sell_one(&self, id: ProductId) -> Result<SaleReceipt, RepositoryError> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(format!("product {id}")))?;
        let mut ledger = self.sales.write().await;

        let receipt = sales::quote(product).map_err(sale_conflict)?;
        let totals = ledger.with_sale(&receipt).map_err(sale_conflict)?;
        let receipt = sales::sell_one(product).map_err(sale_conflict)?;
        *ledger = totals;
        Ok(receipt)
    }

    /// Readiness probe: every repository lock can be taken.
    pub async fn is_ready(&self) -> bool {
        let _products = self.products.read().await;
        let _orders = self.orders.read().await;
        let _chat = self.chat.read().await;
        let _sales = self.sales.read().await;
        true
    }
}

fn sale_conflict(err: SaleError) -> RepositoryError {
    RepositoryError::Conflict(err.to_string())
}
