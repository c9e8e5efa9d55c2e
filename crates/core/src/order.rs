//! Orders, line items, list filters and status counts.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{OrderAction, OrderNumber, OrderStatus, Price, TransitionError};

/// Display and seed-file format for order timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_name: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: Price,
}

impl OrderLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub number: OrderNumber,
    pub customer_name: String,
    pub customer_phone: String,
    pub lines: Vec<OrderLine>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(with = "timestamp")]
    pub ordered_at: NaiveDateTime,
    #[serde(default, with = "optional_timestamp")]
    pub delivery_at: Option<NaiveDateTime>,
    pub address: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl Order {
    /// Sum of unit price × quantity over every line.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    /// Apply an operator action.
    ///
    /// Moving into `confirmed` stamps the delivery time with `now` unless one
    /// is already set. Every other transition leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` and leaves the order unchanged when the
    /// action is not available from the current status.
    pub fn apply(
        &mut self,
        action: OrderAction,
        now: NaiveDateTime,
    ) -> Result<OrderStatus, TransitionError> {
        let next = self.status.apply(action)?;
        if next == OrderStatus::Confirmed && self.delivery_at.is_none() {
            self.delivery_at = Some(now);
        }
        self.status = next;
        Ok(next)
    }
}

/// Order list filter: everything, or one exact status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderFilter {
    #[default]
    All,
    Status(OrderStatus),
}

impl OrderFilter {
    /// Filters offered as chips above the order list.
    pub const CHIPS: [Self; 5] = [
        Self::All,
        Self::Status(OrderStatus::Pending),
        Self::Status(OrderStatus::Confirmed),
        Self::Status(OrderStatus::Shipped),
        Self::Status(OrderStatus::Delivered),
    ];

    #[must_use]
    pub fn matches(self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => order.status == status,
        }
    }

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Status(status) => status.as_str(),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Status(status) => status.label(),
        }
    }
}

impl std::fmt::Display for OrderFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            other => other.parse().map(Self::Status),
        }
    }
}

/// Per-status order counts, computed in one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub shipped: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn tally<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut counts = Self::default();
        for order in orders {
            counts.all += 1;
            match order.status {
                OrderStatus::Pending => counts.pending += 1,
                OrderStatus::Confirmed => counts.confirmed += 1,
                OrderStatus::Shipped => counts.shipped += 1,
                OrderStatus::Delivered => counts.delivered += 1,
                OrderStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }

    /// Count shown next to a filter chip.
    #[must_use]
    pub const fn count(&self, filter: OrderFilter) -> usize {
        match filter {
            OrderFilter::All => self.all,
            OrderFilter::Status(OrderStatus::Pending) => self.pending,
            OrderFilter::Status(OrderStatus::Confirmed) => self.confirmed,
            OrderFilter::Status(OrderStatus::Shipped) => self.shipped,
            OrderFilter::Status(OrderStatus::Delivered) => self.delivered,
            OrderFilter::Status(OrderStatus::Cancelled) => self.cancelled,
        }
    }
}

/// Serde adapter for `NaiveDateTime` in [`TIMESTAMP_FORMAT`].
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    /// # Errors
    ///
    /// Fails when the value is not in `YYYY-MM-DD HH:MM` form.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<NaiveDateTime>` in [`TIMESTAMP_FORMAT`].
pub mod optional_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.collect_str(&value.format(TIMESTAMP_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    /// # Errors
    ///
    /// Fails when a present value is not in `YYYY-MM-DD HH:MM` form.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}
