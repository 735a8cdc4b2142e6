use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{all_present, CollectionKind, Record};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    #[default]
    #[serde(alias = "activo")]
    Active,
    #[serde(alias = "inactivo")]
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub license_plate: String,
    pub vehicle_model: String,
    #[serde(default)]
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub license_plate: String,
    pub vehicle_model: String,
    pub status: DriverStatus,
}

impl DriverDraft {
    pub fn with_contact(
        mut self,
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.phone = phone.into();
        self.email = email.into();
        self
    }

    pub fn with_vehicle(mut self, plate: impl Into<String>, model: impl Into<String>) -> Self {
        self.license_plate = plate.into();
        self.vehicle_model = model.into();
        self
    }

    pub fn with_status(mut self, status: DriverStatus) -> Self {
        self.status = status;
        self
    }
}

impl From<&Driver> for DriverDraft {
    fn from(driver: &Driver) -> Self {
        Self {
            name: driver.name.clone(),
            phone: driver.phone.clone(),
            email: driver.email.clone(),
            license_plate: driver.license_plate.clone(),
            vehicle_model: driver.vehicle_model.clone(),
            status: driver.status,
        }
    }
}

impl Record for Driver {
    type Draft = DriverDraft;

    const KIND: CollectionKind = CollectionKind::Drivers;
    const ID_PREFIX: &'static str = "DRV";
    const LABEL: &'static str = "driver";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn draft_is_complete(draft: &DriverDraft) -> bool {
        all_present(&[
            &draft.name,
            &draft.phone,
            &draft.email,
            &draft.license_plate,
            &draft.vehicle_model,
        ])
    }

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: DriverDraft) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            license_plate: draft.license_plate,
            vehicle_model: draft.vehicle_model,
            status: draft.status,
            created_at,
        }
    }

    fn apply_draft(&self, draft: DriverDraft) -> Self {
        Self::from_draft(self.id.clone(), self.created_at, draft)
    }
}
