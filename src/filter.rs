use serde::Serialize;

use crate::models::order::{DeliveryOrder, OrderStatus};

/// What the operator typed in the search box and picked in the status
/// dropdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    pub search_term: String,
    pub status: Option<OrderStatus>,
}

impl OrderQuery {
    pub fn new(search_term: impl Into<String>, status: Option<OrderStatus>) -> Self {
        Self {
            search_term: search_term.into(),
            status,
        }
    }

    pub fn matches(&self, order: &DeliveryOrder) -> bool {
        self.matches_lowered(order, &self.search_term.to_lowercase())
    }

    /// `needle` is the search term already lowercased.
    fn matches_lowered(&self, order: &DeliveryOrder, needle: &str) -> bool {
        matches_search(order, needle) && self.status.is_none_or(|status| order.status == status)
    }
}

/// Per-status totals for the panel summary.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

fn matches_search(order: &DeliveryOrder, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    [
        &order.id,
        &order.client_name,
        &order.driver_name,
        &order.destination,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Orders matching both the search term and the status filter, in
/// collection order.
pub fn filter_orders<'a>(orders: &'a [DeliveryOrder], query: &OrderQuery) -> Vec<&'a DeliveryOrder> {
    let needle = query.search_term.to_lowercase();
    orders
        .iter()
        .filter(|order| query.matches_lowered(order, &needle))
        .collect()
}

pub fn status_counts(orders: &[DeliveryOrder]) -> StatusCounts {
    orders
        .iter()
        .fold(StatusCounts::default(), |mut counts, order| {
            match order.status {
                OrderStatus::InProgress => counts.in_progress += 1,
                OrderStatus::Completed => counts.completed += 1,
                OrderStatus::Cancelled => counts.cancelled += 1,
            }
            counts
        })
}
