//! Diesel row structs bridging the schema and the domain types.
//!
//! Rows stay `pub(crate)`; conversion into validated domain values happens
//! in the repository adapters so a bad row never leaks past this layer.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{pet_photos, profiles, reminder_log, vaccinations};

/// Queryable row for owner profiles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub secondary_email: Option<String>,
}

/// Insert/update payload for owner profiles.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = profiles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileChangeset {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub secondary_email: Option<String>,
}

/// Queryable row for vaccination records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vaccinations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VaccinationRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub pet_name: String,
    pub vaccine_type: String,
    pub date_applied: NaiveDate,
    pub next_due_date: NaiveDate,
    pub weight_kg: f64,
    pub notes: Option<String>,
}

/// Insert payload for vaccination records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vaccinations)]
pub(crate) struct NewVaccinationRow {
    pub owner_id: Uuid,
    pub pet_name: String,
    pub vaccine_type: String,
    pub date_applied: NaiveDate,
    pub next_due_date: NaiveDate,
    pub weight_kg: f64,
    pub notes: Option<String>,
}

/// Update payload for bulk-edited vaccination records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = vaccinations)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct VaccinationUpdate {
    pub pet_name: String,
    pub vaccine_type: String,
    pub date_applied: NaiveDate,
    pub next_due_date: NaiveDate,
    pub weight_kg: f64,
    pub notes: Option<String>,
}

/// Queryable row for pet photos.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pet_photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PetPhotoRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub pet_name: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for pet photos.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pet_photos)]
pub(crate) struct NewPetPhotoRow {
    pub owner_id: Uuid,
    pub pet_name: String,
    pub photo_url: String,
}

impl VaccinationRow {
    /// Convert into the validated domain record.
    ///
    /// Fails with a description when a stored value no longer passes
    /// validation, e.g. an unknown vaccine token after a bad migration.
    pub(crate) fn into_domain(self) -> Result<crate::domain::VaccinationRecord, String> {
        use crate::domain::{
            OwnerId, PetName, RecordId, VaccinationRecord, VaccineType, WeightKg,
        };

        let vaccine_type = VaccineType::from_db_value(&self.vaccine_type)
            .ok_or_else(|| format!("unknown vaccine type token {:?}", self.vaccine_type))?;
        let pet_name = PetName::new(&self.pet_name)
            .map_err(|error| format!("invalid stored pet name: {error}"))?;
        let weight_kg = WeightKg::new(self.weight_kg)
            .map_err(|error| format!("invalid stored weight: {error}"))?;
        Ok(VaccinationRecord {
            id: RecordId::from_uuid(self.id),
            owner_id: OwnerId::from_uuid(self.owner_id),
            pet_name,
            vaccine_type,
            date_applied: self.date_applied,
            next_due_date: self.next_due_date,
            weight_kg,
            notes: self.notes,
        })
    }
}

impl ProfileRow {
    /// Convert into the validated domain profile.
    pub(crate) fn into_domain(self) -> Result<crate::domain::Profile, String> {
        use crate::domain::{EmailAddress, OwnerId, Profile};

        let email = EmailAddress::new(&self.email)
            .map_err(|error| format!("invalid stored email: {error}"))?;
        let secondary_email = self
            .secondary_email
            .as_deref()
            .map(EmailAddress::new)
            .transpose()
            .map_err(|error| format!("invalid stored secondary email: {error}"))?;
        Ok(Profile {
            id: OwnerId::from_uuid(self.id),
            email,
            full_name: self.full_name,
            secondary_email,
        })
    }
}

impl PetPhotoRow {
    /// Convert into the domain photo.
    pub(crate) fn into_domain(self) -> Result<crate::domain::PetPhoto, String> {
        use crate::domain::{OwnerId, PetName, PetPhoto, PhotoId};

        let pet_name = PetName::new(&self.pet_name)
            .map_err(|error| format!("invalid stored pet name: {error}"))?;
        Ok(PetPhoto {
            id: PhotoId::from_uuid(self.id),
            owner_id: OwnerId::from_uuid(self.owner_id),
            pet_name,
            photo_url: self.photo_url,
            created_at: self.created_at,
        })
    }
}

/// Insert payload for the sent-reminder ledger.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reminder_log)]
pub(crate) struct NewReminderLogRow {
    pub record_id: Uuid,
    pub due_date: NaiveDate,
    pub day_offset: i64,
}
