//! Modal state behind the create, edit and delete dialogs.
//!
//! A form owns the draft being typed and knows which dialog is open;
//! submitting hands the draft to the [`RecordStore`]. Failed submissions keep
//! the dialog open with the draft intact.

use crate::error::AppError;
use crate::models::driver::Driver;
use crate::models::geo::{CoordinateTarget, Coordinates};
use crate::models::order::DeliveryOrder;
use crate::models::Record;
use crate::notify::Notifier;
use crate::store::{Holds, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    Create,
    Edit(String),
    Delete(String),
}

#[derive(Debug, Clone)]
pub struct RecordForm<R: Record> {
    modal: Modal,
    create_draft: R::Draft,
    edit_draft: Option<R::Draft>,
    map_target: Option<CoordinateTarget>,
}

pub type OrderForm = RecordForm<DeliveryOrder>;
pub type DriverForm = RecordForm<Driver>;

impl<R: Record> Default for RecordForm<R> {
    fn default() -> Self {
        Self {
            modal: Modal::Closed,
            create_draft: R::Draft::default(),
            edit_draft: None,
            map_target: None,
        }
    }
}

impl<R> RecordForm<R>
where
    R: Record,
    R::Draft: for<'a> From<&'a R>,
    RecordStore: Holds<R>,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn is_open(&self) -> bool {
        self.modal != Modal::Closed
    }

    pub fn open_create(&mut self) {
        self.modal = Modal::Create;
    }

    /// Opens the edit dialog prefilled from `record`.
    pub fn open_edit(&mut self, record: &R) {
        self.edit_draft = Some(R::Draft::from(record));
        self.modal = Modal::Edit(record.id().to_string());
    }

    pub fn open_delete(&mut self, id: impl Into<String>) {
        self.modal = Modal::Delete(id.into());
    }

    /// Closes whatever dialog is open. The create draft survives so a
    /// half-filled form is still there when reopened.
    pub fn close(&mut self) {
        self.modal = Modal::Closed;
        self.edit_draft = None;
        self.map_target = None;
    }

    /// The draft the open dialog edits: the edit draft while editing,
    /// otherwise the create draft.
    pub fn draft(&self) -> &R::Draft {
        match (&self.modal, &self.edit_draft) {
            (Modal::Edit(_), Some(draft)) => draft,
            _ => &self.create_draft,
        }
    }

    /// Applies a setter to the active draft.
    pub fn set(&mut self, change: impl FnOnce(R::Draft) -> R::Draft) {
        let slot = match (&self.modal, self.edit_draft.as_mut()) {
            (Modal::Edit(_), Some(draft)) => draft,
            _ => &mut self.create_draft,
        };
        *slot = change(std::mem::take(slot));
    }

    /// Creates or updates, depending on the open dialog.
    pub fn submit(&mut self, store: &mut RecordStore) -> Result<R, AppError> {
        match self.modal.clone() {
            Modal::Create => {
                let record = store.create::<R>(self.create_draft.clone())?;
                self.create_draft = R::Draft::default();
                self.close();
                Ok(record)
            }
            Modal::Edit(id) => {
                let Some(draft) = self.edit_draft.clone() else {
                    return Err(self.nothing_to(store, "update"));
                };
                let record = store.update::<R>(&id, draft)?;
                self.close();
                Ok(record)
            }
            Modal::Closed | Modal::Delete(_) => Err(self.nothing_to(store, "submit")),
        }
    }

    /// Removes the record selected in the delete dialog.
    pub fn confirm_delete(&mut self, store: &mut RecordStore) -> Result<bool, AppError> {
        let Modal::Delete(id) = self.modal.clone() else {
            return Err(self.nothing_to(store, "delete"));
        };

        let removed = store.remove::<R>(&id)?;
        self.close();
        Ok(removed)
    }

    fn nothing_to(&self, store: &RecordStore, action: &str) -> AppError {
        store
            .notifier()
            .warning(format!("no {} to {action}", R::LABEL));
        AppError::BadRequest(format!("no {} selected to {action}", R::LABEL))
    }
}

impl RecordForm<DeliveryOrder> {
    pub fn map_target(&self) -> Option<CoordinateTarget> {
        self.map_target
    }

    /// Opens the map dialog for the start or end point.
    pub fn open_map(&mut self, target: CoordinateTarget) {
        self.map_target = Some(target);
    }

    pub fn close_map(&mut self) {
        self.map_target = None;
    }

    /// Writes the picked point into the active draft, closes the map and
    /// announces which end was set. Returns the field that was filled, or
    /// `None` when no map was open.
    pub fn select_location(
        &mut self,
        point: Coordinates,
        notifier: &Notifier,
    ) -> Option<CoordinateTarget> {
        let target = self.map_target.take()?;
        self.set(|draft| draft.with_picked_point(target, point));

        let end = match target {
            CoordinateTarget::Start => "start",
            CoordinateTarget::End => "end",
        };
        notifier.success(format!("{end} location selected"));
        Some(target)
    }
}
