//! Vaccination record data model.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum allowed length for a pet name.
pub const PET_NAME_MAX: usize = 64;

/// Validation errors for vaccination record fields.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    EmptyPetName,
    PetNameTooLong { max: usize },
    NegativeWeight { value: f64 },
    NonFiniteWeight,
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPetName => write!(f, "pet name must not be empty"),
            Self::PetNameTooLong { max } => {
                write!(f, "pet name must be at most {max} characters")
            }
            Self::NegativeWeight { value } => {
                write!(f, "weight must not be negative (got {value})")
            }
            Self::NonFiniteWeight => write!(f, "weight must be a finite number"),
        }
    }
}

impl std::error::Error for RecordValidationError {}

/// Stable vaccination record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the account that owns a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OwnerId(Uuid);

impl OwnerId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pet name as entered by the owner.
///
/// Pets have no identity of their own: records and photos are grouped by
/// this string, so two pets with the same name share a dashboard group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct PetName(String);

impl PetName {
    /// Validate and construct a pet name. Surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self, RecordValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RecordValidationError::EmptyPetName);
        }
        if trimmed.chars().count() > PET_NAME_MAX {
            return Err(RecordValidationError::PetNameTooLong { max: PET_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PetName> for String {
    fn from(value: PetName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PetName {
    type Error = RecordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Vaccine or procedure recorded against a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VaccineType {
    /// Combined core vaccine.
    Combination,
    /// Rabies vaccine.
    Rabies,
    /// Feline leukemia vaccine.
    Leukemia,
    /// Internal parasite treatment.
    InternalParasite,
    /// External parasite treatment.
    ExternalParasite,
    /// General check-up visit.
    Checkup,
}

impl VaccineType {
    /// Database and wire value for this variant.
    pub fn as_db_value(self) -> &'static str {
        match self {
            Self::Combination => "combination",
            Self::Rabies => "rabies",
            Self::Leukemia => "leukemia",
            Self::InternalParasite => "internal_parasite",
            Self::ExternalParasite => "external_parasite",
            Self::Checkup => "checkup",
        }
    }

    /// Parse a stored database value.
    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "combination" => Some(Self::Combination),
            "rabies" => Some(Self::Rabies),
            "leukemia" => Some(Self::Leukemia),
            "internal_parasite" => Some(Self::InternalParasite),
            "external_parasite" => Some(Self::ExternalParasite),
            "checkup" => Some(Self::Checkup),
            _ => None,
        }
    }

    /// Human-readable label used in reminder mail.
    pub fn label(self) -> &'static str {
        match self {
            Self::Combination => "Combination",
            Self::Rabies => "Rabies",
            Self::Leukemia => "Leukemia",
            Self::InternalParasite => "Internal parasite",
            Self::ExternalParasite => "External parasite",
            Self::Checkup => "Check-up",
        }
    }
}

/// Pet weight in kilograms, non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "f64", into = "f64")]
pub struct WeightKg(f64);

impl WeightKg {
    /// Validate and construct a weight.
    pub fn new(value: f64) -> Result<Self, RecordValidationError> {
        if !value.is_finite() {
            return Err(RecordValidationError::NonFiniteWeight);
        }
        if value < 0.0 {
            return Err(RecordValidationError::NegativeWeight { value });
        }
        Ok(Self(value))
    }

    /// The weight in kilograms.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<WeightKg> for f64 {
    fn from(value: WeightKg) -> Self {
        value.0
    }
}

impl TryFrom<f64> for WeightKg {
    type Error = RecordValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A single vaccination event, owned exclusively by one account.
///
/// Invariant: `next_due_date >= date_applied` for every persisted record;
/// [`crate::domain::schedule::DueDateRule::resolve`] enforces it on entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecord {
    /// Primary key.
    pub id: RecordId,
    /// Owning account.
    pub owner_id: OwnerId,
    /// Pet name the record is grouped under.
    pub pet_name: PetName,
    /// Vaccine or procedure applied.
    pub vaccine_type: VaccineType,
    /// Date the vaccine was applied.
    pub date_applied: NaiveDate,
    /// Date the next application is due.
    pub next_due_date: NaiveDate,
    /// Weight measured at the visit, in kilograms.
    pub weight_kg: WeightKg,
    /// Free-form notes, if any.
    pub notes: Option<String>,
}

/// Payload for inserting a new vaccination record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVaccinationRecord {
    /// Owning account.
    pub owner_id: OwnerId,
    /// Pet name the record is grouped under.
    pub pet_name: PetName,
    /// Vaccine or procedure applied.
    pub vaccine_type: VaccineType,
    /// Date the vaccine was applied.
    pub date_applied: NaiveDate,
    /// Date the next application is due.
    pub next_due_date: NaiveDate,
    /// Weight measured at the visit, in kilograms.
    pub weight_kg: WeightKg,
    /// Free-form notes, if any.
    pub notes: Option<String>,
}
