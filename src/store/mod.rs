//! Authoritative in-memory copy of orders and drivers, mirrored to slot
//! storage.
//!
//! Every mutation builds the next collection, writes it as one payload and
//! only then swaps it into memory, so a failed write never leaves the
//! displayed state ahead of the persisted one.

pub mod ids;

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::driver::Driver;
use crate::models::order::DeliveryOrder;
use crate::models::Record;
use crate::notify::Notifier;
use crate::observability::metrics::Metrics;
use crate::storage::{slot_name, SlotStorage};
use crate::store::ids::generate_id;

/// Gives the store typed access to the collection holding `R`.
pub trait Holds<R: Record> {
    fn records(&self) -> &Vec<R>;
    fn records_mut(&mut self) -> &mut Vec<R>;
}

pub struct RecordStore {
    storage: Arc<dyn SlotStorage>,
    notifier: Notifier,
    metrics: Metrics,
    orders: Vec<DeliveryOrder>,
    drivers: Vec<Driver>,
}

impl Holds<DeliveryOrder> for RecordStore {
    fn records(&self) -> &Vec<DeliveryOrder> {
        &self.orders
    }

    fn records_mut(&mut self) -> &mut Vec<DeliveryOrder> {
        &mut self.orders
    }
}

impl Holds<Driver> for RecordStore {
    fn records(&self) -> &Vec<Driver> {
        &self.drivers
    }

    fn records_mut(&mut self) -> &mut Vec<Driver> {
        &mut self.drivers
    }
}

impl RecordStore {
    /// Builds an empty store. Call [`RecordStore::load_all`] to pull in
    /// persisted data.
    pub fn new(storage: Arc<dyn SlotStorage>, notifier: Notifier, metrics: Metrics) -> Self {
        Self {
            storage,
            notifier,
            metrics,
            orders: Vec::new(),
            drivers: Vec::new(),
        }
    }

    /// Builds a store and loads both collections.
    pub fn open(storage: Arc<dyn SlotStorage>, notifier: Notifier, metrics: Metrics) -> Self {
        let mut store = Self::new(storage, notifier, metrics);
        store.load_all();
        store
    }

    pub fn load_all(&mut self) {
        self.load::<DeliveryOrder>();
        self.load::<Driver>();
    }

    pub fn orders(&self) -> &[DeliveryOrder] {
        &self.orders
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn list<R: Record>(&self) -> &[R]
    where
        Self: Holds<R>,
    {
        self.collection::<R>()
    }

    pub fn get<R: Record>(&self, id: &str) -> Option<&R>
    where
        Self: Holds<R>,
    {
        self.collection::<R>().iter().find(|record| record.id() == id)
    }

    /// Replaces the in-memory collection with the persisted one.
    ///
    /// A missing or blank slot yields an empty collection. An unreadable or
    /// unparsable payload is reported as an error notice and also yields an
    /// empty collection.
    pub fn load<R: Record>(&mut self) -> &[R]
    where
        Self: Holds<R>,
    {
        let kind = R::KIND;
        let slot = slot_name(kind);

        let loaded = match self.storage.read(slot) {
            Ok(None) => Vec::new(),
            Ok(Some(payload)) if payload.trim().is_empty() => Vec::new(),
            Ok(Some(payload)) => match serde_json::from_str::<Vec<R>>(&payload) {
                Ok(records) => records,
                Err(err) => {
                    warn!(kind = %kind, error = %err, "persisted collection is not valid");
                    self.notifier.error(format!("failed to load {kind}"));
                    self.metrics.record_operation(kind, "load", "error");
                    Vec::new()
                }
            },
            Err(err) => {
                warn!(kind = %kind, error = %err, "failed to read persisted collection");
                self.notifier.error(format!("failed to load {kind}"));
                self.metrics.record_operation(kind, "load", "error");
                Vec::new()
            }
        };

        debug!(kind = %kind, count = loaded.len(), "collection loaded");
        self.metrics.set_records(kind, loaded.len());
        *self.collection_mut::<R>() = loaded;
        self.collection::<R>()
    }

    /// Overwrites the persisted collection, then the in-memory one.
    pub fn save<R: Record>(&mut self, records: Vec<R>) -> Result<(), AppError>
    where
        Self: Holds<R>,
    {
        let kind = R::KIND;
        let payload = serde_json::to_string(&records)
            .map_err(|err| AppError::Internal(format!("failed to serialize {kind}: {err}")))?;

        if let Err(err) = self.storage.write(slot_name(kind), &payload) {
            warn!(kind = %kind, error = %err, "failed to persist collection");
            self.notifier.error(format!("failed to save {kind}"));
            self.metrics.record_operation(kind, "save", "error");
            return Err(err.into());
        }

        self.metrics.set_records(kind, records.len());
        self.metrics.record_operation(kind, "save", "success");
        *self.collection_mut::<R>() = records;
        self.notifier.success(format!("{kind} saved"));
        Ok(())
    }

    pub fn create<R: Record>(&mut self, draft: R::Draft) -> Result<R, AppError>
    where
        Self: Holds<R>,
    {
        self.ensure_complete::<R>(&draft, "create")?;

        let taken = self.collection::<R>().iter().map(|record| record.id());
        let id = generate_id(R::ID_PREFIX, taken);
        let record = R::from_draft(id, Utc::now(), draft);

        let mut next = self.collection::<R>().clone();
        next.push(record.clone());
        self.commit(next, "create")?;

        let kind = R::KIND;
        info!(kind = %kind, id = %record.id(), "{} created", R::LABEL);
        self.notifier.success(format!("{} created", R::LABEL));
        Ok(record)
    }

    /// Replaces every draft field of the record with `id`. The stored `id`
    /// and creation time are kept.
    pub fn update<R: Record>(&mut self, id: &str, draft: R::Draft) -> Result<R, AppError>
    where
        Self: Holds<R>,
    {
        let kind = R::KIND;
        let position = self
            .collection::<R>()
            .iter()
            .position(|record| record.id() == id);
        let Some(position) = position else {
            self.notifier.warning(format!("no {} to update", R::LABEL));
            self.metrics.record_operation(kind, "update", "not_found");
            return Err(AppError::NotFound(format!("{} {id} not found", R::LABEL)));
        };
        self.ensure_complete::<R>(&draft, "update")?;

        let mut next = self.collection::<R>().clone();
        let updated = next[position].apply_draft(draft);
        next[position] = updated.clone();
        self.commit(next, "update")?;

        info!(kind = %kind, id = %id, "{} updated", R::LABEL);
        self.notifier.success(format!("{} updated", R::LABEL));
        Ok(updated)
    }

    /// Removes the record with `id`. The collection is persisted whether or
    /// not a record matched, so repeating a removal is harmless.
    pub fn remove<R: Record>(&mut self, id: &str) -> Result<bool, AppError>
    where
        Self: Holds<R>,
    {
        let next: Vec<R> = self
            .collection::<R>()
            .iter()
            .filter(|record| record.id() != id)
            .cloned()
            .collect();
        let removed = next.len() != self.collection::<R>().len();
        self.commit(next, "remove")?;

        let kind = R::KIND;
        info!(kind = %kind, id = %id, removed, "{} deleted", R::LABEL);
        self.notifier.success(format!("{} deleted", R::LABEL));
        Ok(removed)
    }

    fn collection<R: Record>(&self) -> &Vec<R>
    where
        Self: Holds<R>,
    {
        <Self as Holds<R>>::records(self)
    }

    fn collection_mut<R: Record>(&mut self) -> &mut Vec<R>
    where
        Self: Holds<R>,
    {
        <Self as Holds<R>>::records_mut(self)
    }

    fn ensure_complete<R: Record>(
        &self,
        draft: &R::Draft,
        operation: &str,
    ) -> Result<(), AppError> {
        if R::draft_is_complete(draft) {
            return Ok(());
        }

        let kind = R::KIND;
        debug!(kind = %kind, operation, "draft rejected: missing fields");
        self.notifier.warning("complete all required fields");
        self.metrics.record_operation(kind, operation, "invalid");
        Err(AppError::MissingFields)
    }

    fn commit<R: Record>(&mut self, next: Vec<R>, operation: &str) -> Result<(), AppError>
    where
        Self: Holds<R>,
    {
        match self.save(next) {
            Ok(()) => {
                self.metrics.record_operation(R::KIND, operation, "success");
                Ok(())
            }
            Err(err) => {
                self.metrics.record_operation(R::KIND, operation, "error");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::RecordStore;
    use crate::error::AppError;
    use crate::models::driver::{Driver, DriverDraft, DriverStatus};
    use crate::models::order::{DeliveryOrder, OrderDraft, OrderStatus};
    use crate::models::{format_timestamp, CollectionKind};
    use crate::notify::{NoticeLevel, Notifier};
    use crate::observability::metrics::Metrics;
    use crate::storage::{slot_name, MemorySlotStorage, SlotStorage, StorageError};

    struct UnreadableStorage;

    impl SlotStorage for UnreadableStorage {
        fn read(&self, slot: &'static str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Read {
                slot,
                path: format!("/unreadable/{slot}.json").into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn write(&self, _slot: &'static str, _payload: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn order_draft() -> OrderDraft {
        OrderDraft::default()
            .with_client("Ana", "555-0001")
            .with_driver("Luis", "555-0002")
            .with_destination("San José")
            .with_details("2 cajas")
            .with_start_coordinates("9.93,-84.08")
            .with_end_coordinates("9.90,-84.10")
    }

    fn driver_draft() -> DriverDraft {
        DriverDraft::default()
            .with_contact("Luis", "555-0002", "luis@example.com")
            .with_vehicle("ABC-123", "Hilux")
    }

    fn store_with(storage: Arc<MemorySlotStorage>) -> RecordStore {
        RecordStore::open(storage, Notifier::new(64), Metrics::new())
    }

    fn is_order_id(id: &str) -> bool {
        id.len() == 6
            && id.starts_with("ORD")
            && id[3..].chars().all(|c| c.is_ascii_digit())
    }

    #[test]
    fn create_appends_order_with_generated_id() {
        let storage = Arc::new(MemorySlotStorage::new());
        let mut store = store_with(storage.clone());

        let order: DeliveryOrder = store.create(order_draft()).unwrap();

        assert_eq!(store.orders().len(), 1);
        assert!(is_order_id(&order.id), "unexpected id {}", order.id);
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.client_name, "Ana");
        assert_eq!(order.destination, "San José");
        assert_eq!(order.comments, "");
        assert!(order.completed_at.is_none());
        assert!(storage.raw(slot_name(CollectionKind::Orders)).is_some());
    }

    #[test]
    fn create_with_missing_field_changes_nothing() {
        let storage = Arc::new(MemorySlotStorage::new());
        let mut store = store_with(storage.clone());
        let mut notices = store.notifier().subscribe();

        let drafts = [
            order_draft().with_client("", "555-0001"),
            order_draft().with_driver("Luis", ""),
            order_draft().with_destination(""),
            order_draft().with_details(" "),
            order_draft().with_start_coordinates(""),
            order_draft().with_end_coordinates(""),
        ];

        for draft in drafts {
            let err = store.create::<DeliveryOrder>(draft).unwrap_err();
            assert!(matches!(err, AppError::MissingFields));
            assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Warning);
        }

        assert!(store.orders().is_empty());
        assert!(storage.raw(slot_name(CollectionKind::Orders)).is_none());
    }

    #[test]
    fn update_keeps_id_and_creation_time() {
        let storage = Arc::new(MemorySlotStorage::new());
        let mut store = store_with(storage.clone());
        let original: DeliveryOrder = store.create(order_draft()).unwrap();

        let draft = order_draft()
            .with_destination("Heredia")
            .with_comments("call on arrival")
            .with_status(OrderStatus::Cancelled);
        store.update::<DeliveryOrder>(&original.id, draft.clone()).unwrap();

        let mut reopened = store_with(storage);
        let reloaded: &[DeliveryOrder] = reopened.load();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].id, original.id);
        assert_eq!(reloaded[0].created_at, original.created_at);
        assert_eq!(OrderDraft::from(&reloaded[0]), draft);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = store_with(Arc::new(MemorySlotStorage::new()));

        let err = store
            .update::<Driver>("DRV000", driver_draft())
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn update_with_missing_field_keeps_record() {
        let mut store = store_with(Arc::new(MemorySlotStorage::new()));
        let driver: Driver = store.create(driver_draft()).unwrap();

        let err = store
            .update::<Driver>(&driver.id, driver_draft().with_vehicle("ABC-123", ""))
            .unwrap_err();

        assert!(matches!(err, AppError::MissingFields));
        assert_eq!(store.drivers(), &[driver]);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = store_with(Arc::new(MemorySlotStorage::new()));
        let keep: DeliveryOrder = store.create(order_draft()).unwrap();
        let mut gone: DeliveryOrder = store.create(order_draft()).unwrap();
        while gone.id == keep.id {
            gone = store.create(order_draft()).unwrap();
        }

        assert!(store.remove::<DeliveryOrder>(&gone.id).unwrap());
        let once = store.orders().to_vec();
        assert!(!store.remove::<DeliveryOrder>(&gone.id).unwrap());

        assert_eq!(store.orders(), once.as_slice());
        assert!(store.orders().iter().all(|order| order.id != gone.id));
    }

    #[test]
    fn generated_ids_do_not_collide() {
        let mut store = store_with(Arc::new(MemorySlotStorage::new()));
        for _ in 0..50 {
            store.create::<Driver>(driver_draft()).unwrap();
        }

        let mut ids: Vec<&str> = store.drivers().iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 50);
        assert!(ids.iter().all(|id| id.starts_with("DRV")));
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let storage = Arc::new(MemorySlotStorage::new());
        let mut store = store_with(storage.clone());
        let first: DeliveryOrder = store.create(order_draft()).unwrap();
        let mut notices = store.notifier().subscribe();

        storage.reject_writes(true);
        let err = store.create::<DeliveryOrder>(order_draft()).unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(store.orders(), &[first]);
        assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn corrupt_payload_loads_as_empty_with_error_notice() {
        let storage = Arc::new(
            MemorySlotStorage::new().with_payload(slot_name(CollectionKind::Drivers), "{not json"),
        );
        let notifier = Notifier::new(8);
        let mut notices = notifier.subscribe();

        let store = RecordStore::open(storage, notifier, Metrics::new());

        assert!(store.drivers().is_empty());
        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "failed to load drivers");
    }

    #[test]
    fn blank_payload_loads_as_empty_without_notice() {
        let storage = Arc::new(
            MemorySlotStorage::new().with_payload(slot_name(CollectionKind::Orders), "  "),
        );
        let notifier = Notifier::new(8);
        let mut notices = notifier.subscribe();

        let store = RecordStore::open(storage, notifier, Metrics::new());

        assert!(store.orders().is_empty());
        assert!(notices.try_recv().is_err());
    }

    #[test]
    fn unreadable_slot_loads_as_empty_with_error_notice() {
        let notifier = Notifier::new(8);
        let mut notices = notifier.subscribe();

        let store = RecordStore::open(Arc::new(UnreadableStorage), notifier, Metrics::new());

        assert!(store.orders().is_empty());
        assert!(store.drivers().is_empty());
        let first = notices.try_recv().unwrap();
        assert_eq!(first.level, NoticeLevel::Error);
        assert_eq!(first.message, "failed to load orders");
        assert_eq!(notices.try_recv().unwrap().message, "failed to load drivers");
    }

    #[test]
    fn save_and_reload_round_trips() {
        let storage = Arc::new(MemorySlotStorage::new());
        let mut store = store_with(storage.clone());
        store.create::<DeliveryOrder>(order_draft()).unwrap();
        let done: DeliveryOrder = store
            .create(order_draft().with_status(OrderStatus::Completed))
            .unwrap();
        store
            .create::<Driver>(driver_draft().with_status(DriverStatus::Inactive))
            .unwrap();

        let fresh = store_with(storage);

        assert_eq!(fresh.orders(), store.orders());
        assert_eq!(fresh.drivers(), store.drivers());
        let reloaded = fresh.get::<DeliveryOrder>(&done.id).unwrap();
        assert_eq!(
            format_timestamp(&reloaded.created_at),
            format_timestamp(&done.created_at)
        );
        assert_eq!(reloaded.completed_at, Some(done.created_at));
    }

    #[test]
    fn loads_legacy_browser_payload() {
        let payload = r#"[{
            "id": "ORD512",
            "clientName": "ACME Corp",
            "clientPhone": "555-0100",
            "driverName": "Luis",
            "driverPhone": "555-0002",
            "destination": "Cartago",
            "details": "1 sobre",
            "comments": "",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "status": "en_curso",
            "startCoordinates": "9.93,-84.08",
            "endCoordinates": "9.86,-83.92"
        }]"#;
        let storage = Arc::new(
            MemorySlotStorage::new().with_payload(slot_name(CollectionKind::Orders), payload),
        );

        let store = store_with(storage);

        let order = store.get::<DeliveryOrder>("ORD512").unwrap();
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.client_name, "ACME Corp");
    }
}
