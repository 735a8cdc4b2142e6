pub mod driver;
pub mod geo;
pub mod order;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// The two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Orders,
    Drivers,
}

impl CollectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Orders => "orders",
            CollectionKind::Drivers => "drivers",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a timestamp for display in the operator's local time zone.
///
/// Timestamps are parsed into `DateTime<Utc>` when a collection is loaded, so
/// a value read back from storage renders exactly like one created in this
/// session.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A persisted record owned by the record store.
pub trait Record: Clone + Serialize + for<'de> Deserialize<'de> {
    type Draft: Clone + std::fmt::Debug + Default;

    const KIND: CollectionKind;
    const ID_PREFIX: &'static str;
    /// Singular noun used in notices, e.g. "order".
    const LABEL: &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// True when every required draft field is non-blank.
    fn draft_is_complete(draft: &Self::Draft) -> bool;

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    /// Replaces every draft-owned field, keeping `id` and `created_at`.
    fn apply_draft(&self, draft: Self::Draft) -> Self;
}

pub(crate) fn all_present(fields: &[&str]) -> bool {
    fields.iter().all(|field| !field.trim().is_empty())
}
