use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::geo::{CoordinateTarget, Coordinates};
use crate::models::{all_present, CollectionKind, Record};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    #[serde(alias = "en_curso")]
    InProgress,
    #[serde(alias = "completado")]
    Completed,
    #[serde(alias = "cancelado")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "in_progress" | "en_curso" => Ok(OrderStatus::InProgress),
            "completed" | "completado" => Ok(OrderStatus::Completed),
            "cancelled" | "cancelado" => Ok(OrderStatus::Cancelled),
            other => Err(format!(
                "unknown order status: {other}, expected in_progress/completed/cancelled"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrder {
    pub id: String,
    pub client_name: String,
    pub client_phone: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub destination: String,
    pub details: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub start_coordinates: String,
    pub end_coordinates: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Field set submitted by the create and edit order forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDraft {
    pub client_name: String,
    pub client_phone: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub destination: String,
    pub details: String,
    pub comments: String,
    pub status: OrderStatus,
    pub start_coordinates: String,
    pub end_coordinates: String,
}

impl OrderDraft {
    pub fn with_client(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.client_name = name.into();
        self.client_phone = phone.into();
        self
    }

    pub fn with_driver(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.driver_name = name.into();
        self.driver_phone = phone.into();
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_start_coordinates(mut self, encoded: impl Into<String>) -> Self {
        self.start_coordinates = encoded.into();
        self
    }

    pub fn with_end_coordinates(mut self, encoded: impl Into<String>) -> Self {
        self.end_coordinates = encoded.into();
        self
    }

    /// Writes a picked map point into the start or end field.
    pub fn with_picked_point(self, target: CoordinateTarget, point: Coordinates) -> Self {
        match target {
            CoordinateTarget::Start => self.with_start_coordinates(point.encode()),
            CoordinateTarget::End => self.with_end_coordinates(point.encode()),
        }
    }
}

impl From<&DeliveryOrder> for OrderDraft {
    fn from(order: &DeliveryOrder) -> Self {
        Self {
            client_name: order.client_name.clone(),
            client_phone: order.client_phone.clone(),
            driver_name: order.driver_name.clone(),
            driver_phone: order.driver_phone.clone(),
            destination: order.destination.clone(),
            details: order.details.clone(),
            comments: order.comments.clone(),
            status: order.status,
            start_coordinates: order.start_coordinates.clone(),
            end_coordinates: order.end_coordinates.clone(),
        }
    }
}

impl Record for DeliveryOrder {
    type Draft = OrderDraft;

    const KIND: CollectionKind = CollectionKind::Orders;
    const ID_PREFIX: &'static str = "ORD";
    const LABEL: &'static str = "order";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn draft_is_complete(draft: &OrderDraft) -> bool {
        all_present(&[
            &draft.client_name,
            &draft.client_phone,
            &draft.driver_name,
            &draft.driver_phone,
            &draft.destination,
            &draft.details,
            &draft.start_coordinates,
            &draft.end_coordinates,
        ])
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: OrderDraft) -> Self {
        let completed_at = (draft.status == OrderStatus::Completed).then_some(created_at);

        Self {
            id,
            client_name: draft.client_name,
            client_phone: draft.client_phone,
            driver_name: draft.driver_name,
            driver_phone: draft.driver_phone,
            destination: draft.destination,
            details: draft.details,
            comments: draft.comments,
            status: draft.status,
            start_coordinates: draft.start_coordinates,
            end_coordinates: draft.end_coordinates,
            created_at,
            completed_at,
        }
    }

    fn apply_draft(&self, draft: OrderDraft) -> Self {
        let completed_at = match (self.status, draft.status) {
            (OrderStatus::Completed, OrderStatus::Completed) => self.completed_at,
            (_, OrderStatus::Completed) => Some(Utc::now()),
            _ => None,
        };

        let mut updated = Self::from_draft(self.id.clone(), self.created_at, draft);
        updated.completed_at = completed_at;
        updated
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{DeliveryOrder, OrderDraft, OrderStatus};
    use crate::models::geo::{CoordinateTarget, Coordinates};
    use crate::models::Record;

    fn draft() -> OrderDraft {
        OrderDraft::default()
            .with_client("Ana", "555-0001")
            .with_driver("Luis", "555-0002")
            .with_destination("San José")
            .with_details("2 cajas")
            .with_start_coordinates("9.93,-84.08")
            .with_end_coordinates("9.90,-84.10")
    }

    #[test]
    fn comments_are_optional() {
        assert!(DeliveryOrder::draft_is_complete(&draft()));
        assert!(!DeliveryOrder::draft_is_complete(
            &draft().with_end_coordinates("")
        ));
    }

    #[test]
    fn picked_point_fills_the_selected_field() {
        let point = Coordinates {
            lat: 9.5,
            lng: -84.0,
        };
        let draft = draft().with_picked_point(CoordinateTarget::End, point);

        assert_eq!(draft.start_coordinates, "9.93,-84.08");
        assert_eq!(draft.end_coordinates, "9.5,-84");
    }

    #[test]
    fn legacy_status_values_are_accepted() {
        let status: OrderStatus = serde_json::from_str("\"completado\"").unwrap();
        assert_eq!(status, OrderStatus::Completed);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"completed\"");
        assert_eq!("en_curso".parse::<OrderStatus>(), Ok(OrderStatus::InProgress));
    }

    #[test]
    fn completion_stamp_follows_status_transitions() {
        let order = DeliveryOrder::from_draft("ORD100".to_string(), Utc::now(), draft());
        assert!(order.completed_at.is_none());

        let completed = order.apply_draft(draft().with_status(OrderStatus::Completed));
        let stamp = completed.completed_at;
        assert!(stamp.is_some());

        let edited = completed.apply_draft(
            draft()
                .with_status(OrderStatus::Completed)
                .with_comments("left at door"),
        );
        assert_eq!(edited.completed_at, stamp);

        let reopened = edited.apply_draft(draft());
        assert!(reopened.completed_at.is_none());
    }

    #[test]
    fn apply_draft_keeps_identity() {
        let created_at = Utc::now();
        let order = DeliveryOrder::from_draft("ORD321".to_string(), created_at, draft());
        let updated = order.apply_draft(draft().with_destination("Heredia"));

        assert_eq!(updated.id, "ORD321");
        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.destination, "Heredia");
    }
}
