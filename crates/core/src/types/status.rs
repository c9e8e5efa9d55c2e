//! Status enums for various entities.
//!
//! The order lifecycle is forward-only:
//!
//! ```text
//! pending ──confirm──▶ confirmed ──ship──▶ shipped ──deliver──▶ delivered
//!    │
//!    └──cancel──▶ cancelled
//! ```
//!
//! `delivered` and `cancelled` are terminal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Stable machine name used in URLs and serialized data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Awaiting confirmation",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// No action leads out of a terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Actions an operator may take from this status.
    ///
    /// This is the single source for which buttons the detail panel renders.
    #[must_use]
    pub const fn available_actions(self) -> &'static [OrderAction] {
        match self {
            Self::Pending => &[OrderAction::Confirm, OrderAction::Cancel],
            Self::Confirmed => &[OrderAction::Ship],
            Self::Shipped => &[OrderAction::Deliver],
            Self::Delivered | Self::Cancelled => &[],
        }
    }

    /// The status reached by taking `action` from this status.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` when `action` is not available from this status.
    pub const fn apply(self, action: OrderAction) -> Result<Self, TransitionError> {
        match (self, action) {
            (Self::Pending, OrderAction::Confirm) => Ok(Self::Confirmed),
            (Self::Pending, OrderAction::Cancel) => Ok(Self::Cancelled),
            (Self::Confirmed, OrderAction::Ship) => Ok(Self::Shipped),
            (Self::Shipped, OrderAction::Deliver) => Ok(Self::Delivered),
            (from, action) => Err(TransitionError { from, action }),
        }
    }

    /// Whether a single operator action moves this status to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.available_actions()
            .iter()
            .any(|action| action.target() == next)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// An operator action on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    Confirm,
    Cancel,
    Ship,
    Deliver,
}

impl OrderAction {
    /// Stable machine name used in forms and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Ship => "ship",
            Self::Deliver => "deliver",
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirm => "Confirm order",
            Self::Cancel => "Cancel",
            Self::Ship => "Ship order",
            Self::Deliver => "Confirm delivery",
        }
    }

    /// Status an order ends up in after this action.
    #[must_use]
    pub const fn target(self) -> OrderStatus {
        match self {
            Self::Confirm => OrderStatus::Confirmed,
            Self::Cancel => OrderStatus::Cancelled,
            Self::Ship => OrderStatus::Shipped,
            Self::Deliver => OrderStatus::Delivered,
        }
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirm" => Ok(Self::Confirm),
            "cancel" => Ok(Self::Cancel),
            "ship" => Ok(Self::Ship),
            "deliver" => Ok(Self::Deliver),
            _ => Err(format!("invalid order action: {s}")),
        }
    }
}

/// A requested action is not available from the order's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} an order that is {from}")]
pub struct TransitionError {
    /// Status the order was in.
    pub from: OrderStatus,
    /// Action that was refused.
    pub action: OrderAction,
}

/// Catalog listing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    /// The other status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "On sale",
            Self::Inactive => "Paused",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
