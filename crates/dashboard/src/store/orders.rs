//! Order repository.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use farm2hand_core::order::{Order, OrderFilter, StatusCounts};
use farm2hand_core::{OrderAction, OrderNumber};

use super::RepositoryError;

/// Orders keyed by order number.
#[derive(Debug)]
pub struct OrderRepository {
    orders: BTreeMap<OrderNumber, Order>,
}

impl OrderRepository {
    /// Create a repository holding `orders`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if two orders share a number.
    pub fn new(orders: impl IntoIterator<Item = Order>) -> Result<Self, RepositoryError> {
        let mut map = BTreeMap::new();
        for order in orders {
            let number = order.number.clone();
            if map.insert(number.clone(), order).is_some() {
                return Err(RepositoryError::Conflict(format!(
                    "duplicate order number {number}"
                )));
            }
        }
        Ok(Self { orders: map })
    }

    /// Orders matching `filter`, in order-number order.
    #[must_use]
    pub fn list(&self, filter: OrderFilter) -> Vec<&Order> {
        self.orders.values().filter(|o| filter.matches(o)).collect()
    }

    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(self.orders.values())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[must_use]
    pub fn get(&self, number: &OrderNumber) -> Option<&Order> {
        self.orders.get(number)
    }

    /// Apply an operator action to one order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown order and
    /// `RepositoryError::Conflict` when the action is not available from the
    /// order's current status. The order is unchanged on error.
    pub fn apply(
        &mut self,
        number: &OrderNumber,
        action: OrderAction,
        now: NaiveDateTime,
    ) -> Result<&Order, RepositoryError> {
        let order = self
            .orders
            .get_mut(number)
            .ok_or_else(|| RepositoryError::NotFound(format!("order {number}")))?;
        order
            .apply(action, now)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use farm2hand_core::OrderStatus;

    use super::*;
    use crate::store::SeedData;

    fn repo() -> OrderRepository {
        OrderRepository::new(SeedData::builtin().orders).unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-01-16 07:00", "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_filter_returns_exact_status() {
        let repo = repo();
        assert_eq!(repo.list(OrderFilter::All).len(), 4);
        let shipped: Vec<&str> = repo
            .list(OrderFilter::Status(OrderStatus::Shipped))
            .iter()
            .map(|o| o.number.as_str())
            .collect();
        assert_eq!(shipped, ["ORD004"]);
        assert!(repo
            .list(OrderFilter::Status(OrderStatus::Cancelled))
            .is_empty());
    }

    #[test]
    fn test_ship_confirmed_order() {
        let mut repo = repo();
        let number = OrderNumber::from("ORD002");
        let order = repo.apply(&number, OrderAction::Ship, now()).unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(repo.counts().shipped, 2);
        assert_eq!(repo.counts().confirmed, 0);
    }

    #[test]
    fn test_confirm_pending_stamps_delivery() {
        let mut repo = repo();
        let number = OrderNumber::from("ORD001");
        let order = repo.apply(&number, OrderAction::Confirm, now()).unwrap();
        assert_eq!(order.delivery_at, Some(now()));
    }

    #[test]
    fn test_invalid_transition_is_conflict_and_changes_nothing() {
        let mut repo = repo();
        let number = OrderNumber::from("ORD003");
        let before = repo.get(&number).unwrap().clone();
        let err = repo.apply(&number, OrderAction::Confirm, now()).unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.get(&number), Some(&before));
    }

    #[test]
    fn test_unknown_order() {
        let mut repo = repo();
        let err = repo
            .apply(&OrderNumber::from("ORD999"), OrderAction::Cancel, now())
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
