//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the migrations exactly; `diesel print-schema` against a
//! migrated database regenerates them.

diesel::table! {
    /// Owner profiles, one per authenticated account.
    ///
    /// `id` mirrors the auth service's user id, so no separate sequence.
    profiles (id) {
        /// Primary key: auth service user id.
        id -> Uuid,
        /// Primary notification address.
        email -> Varchar,
        /// Optional display name.
        full_name -> Nullable<Varchar>,
        /// Optional second notification address.
        secondary_email -> Nullable<Varchar>,
        /// Row creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Vaccination events, one row per application.
    vaccinations (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Owning profile.
        owner_id -> Uuid,
        /// Pet name the record is grouped under (max 64 characters).
        pet_name -> Varchar,
        /// Vaccine type token, e.g. `rabies` or `combination`.
        vaccine_type -> Varchar,
        /// Date the vaccine was applied.
        date_applied -> Date,
        /// Date the next application is due.
        next_due_date -> Date,
        /// Weight at the visit, kilograms.
        weight_kg -> Float8,
        /// Free-form notes.
        notes -> Nullable<Text>,
        /// Row creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Photo URLs per (owner, pet), capped by oldest-first pruning.
    pet_photos (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Owning profile.
        owner_id -> Uuid,
        /// Pet the photo belongs to.
        pet_name -> Varchar,
        /// Public URL of the stored image.
        photo_url -> Text,
        /// Upload timestamp, drives pruning order.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sent-reminder ledger keyed by (record, due date, day offset).
    ///
    /// The unique constraint makes dispatch idempotent: a rerun on the same
    /// day inserts nothing and sends nothing.
    reminder_log (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Vaccination record the reminder was for.
        record_id -> Uuid,
        /// Due date the reminder referenced.
        due_date -> Date,
        /// Days before (positive) or after (negative) the due date.
        day_offset -> Int8,
        /// When the reminder was claimed.
        sent_at -> Timestamptz,
    }
}

diesel::joinable!(vaccinations -> profiles (owner_id));
diesel::joinable!(pet_photos -> profiles (owner_id));
diesel::joinable!(reminder_log -> vaccinations (record_id));

diesel::allow_tables_to_appear_in_same_query!(profiles, vaccinations, pet_photos, reminder_log);
