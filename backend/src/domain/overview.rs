//! Per-pet dashboard overview.
//!
//! Groups a user's records by pet name string and surfaces the next due
//! vaccine per group. Grouping is deliberately by name, not id: two records
//! with the same owner and pet name but different ids land in one group.
//! That mirrors the original product and is covered by test.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::due::{self, DueTier};
use crate::domain::record::{VaccinationRecord, VaccineType, WeightKg};

/// Dashboard summary for one pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetOverview {
    /// Pet name the group is keyed by.
    pub pet_name: String,
    /// Earliest next due date across the pet's records.
    pub next_due_date: NaiveDate,
    /// Vaccine due on that date.
    pub next_vaccine: VaccineType,
    /// Urgency of the earliest due date.
    pub due_tier: DueTier,
    /// Signed days until the earliest due date.
    pub days_left: i64,
    /// Weight from the most recent application, in kilograms.
    pub latest_weight_kg: WeightKg,
    /// Number of records in the group.
    pub record_count: usize,
}

/// Build per-pet summaries, ordered by earliest due date ascending.
pub fn build_overview(records: &[VaccinationRecord], today: NaiveDate) -> Vec<PetOverview> {
    let mut groups: Vec<(String, Vec<&VaccinationRecord>)> = Vec::new();
    for record in records {
        let name = record.pet_name.as_str();
        match groups.iter_mut().find(|(key, _)| key == name) {
            Some((_, members)) => members.push(record),
            None => groups.push((name.to_owned(), vec![record])),
        }
    }

    let mut overviews: Vec<PetOverview> = groups
        .into_iter()
        .map(|(pet_name, members)| summarise(pet_name, &members, today))
        .collect();
    overviews.sort_by_key(|o| o.next_due_date);
    overviews
}

fn summarise(pet_name: String, members: &[&VaccinationRecord], today: NaiveDate) -> PetOverview {
    // members is never empty: groups are only created with one record.
    let next = members
        .iter()
        .min_by_key(|r| r.next_due_date)
        .copied()
        .unwrap_or(members[0]);
    let latest = members
        .iter()
        .max_by_key(|r| r.date_applied)
        .copied()
        .unwrap_or(members[0]);

    PetOverview {
        pet_name,
        next_due_date: next.next_due_date,
        next_vaccine: next.vaccine_type,
        due_tier: due::classify(next.next_due_date, today),
        days_left: due::days_until(next.next_due_date, today),
        latest_weight_kg: latest.weight_kg,
        record_count: members.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{NewVaccinationRecord, OwnerId, PetName, RecordId};
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
    }

    fn record(
        owner: OwnerId,
        pet: &str,
        vaccine: VaccineType,
        applied: NaiveDate,
        due: NaiveDate,
        weight: f64,
    ) -> VaccinationRecord {
        let new = NewVaccinationRecord {
            owner_id: owner,
            pet_name: PetName::new(pet).expect("valid pet name"),
            vaccine_type: vaccine,
            date_applied: applied,
            next_due_date: due,
            weight_kg: WeightKg::new(weight).expect("valid weight"),
            notes: None,
        };
        VaccinationRecord {
            id: RecordId::random(),
            owner_id: new.owner_id,
            pet_name: new.pet_name,
            vaccine_type: new.vaccine_type,
            date_applied: new.date_applied,
            next_due_date: new.next_due_date,
            weight_kg: new.weight_kg,
            notes: new.notes,
        }
    }

    #[rstest]
    fn groups_are_keyed_by_name_not_id() {
        let owner = OwnerId::random();
        let today = date(2024, 6, 10);
        // Same owner and pet name, distinct record ids.
        let records = vec![
            record(
                owner,
                "Boncuk",
                VaccineType::Rabies,
                date(2024, 5, 1),
                date(2024, 7, 1),
                4.2,
            ),
            record(
                owner,
                "Boncuk",
                VaccineType::Combination,
                date(2024, 6, 1),
                date(2024, 6, 20),
                4.5,
            ),
        ];

        let overview = build_overview(&records, today);
        assert_eq!(overview.len(), 1);
        assert_eq!(overview[0].pet_name, "Boncuk");
        assert_eq!(overview[0].record_count, 2);
    }

    #[rstest]
    fn picks_earliest_due_and_latest_weight() {
        let owner = OwnerId::random();
        let today = date(2024, 6, 10);
        let records = vec![
            record(
                owner,
                "Pamuk",
                VaccineType::Rabies,
                date(2024, 1, 5),
                date(2025, 1, 5),
                3.0,
            ),
            record(
                owner,
                "Pamuk",
                VaccineType::InternalParasite,
                date(2024, 6, 1),
                date(2024, 6, 12),
                3.6,
            ),
        ];

        let overview = build_overview(&records, today);
        assert_eq!(overview[0].next_vaccine, VaccineType::InternalParasite);
        assert_eq!(overview[0].next_due_date, date(2024, 6, 12));
        assert_eq!(overview[0].due_tier, DueTier::DueSoon);
        assert_eq!(overview[0].days_left, 2);
        assert_eq!(overview[0].latest_weight_kg.value(), 3.6);
    }

    #[rstest]
    fn pets_are_ordered_by_earliest_due_date() {
        let owner = OwnerId::random();
        let today = date(2024, 6, 10);
        let records = vec![
            record(
                owner,
                "Later",
                VaccineType::Checkup,
                date(2024, 5, 1),
                date(2024, 9, 1),
                8.0,
            ),
            record(
                owner,
                "Sooner",
                VaccineType::Rabies,
                date(2024, 5, 1),
                date(2024, 6, 5),
                2.0,
            ),
        ];

        let overview = build_overview(&records, today);
        let names: Vec<&str> = overview.iter().map(|o| o.pet_name.as_str()).collect();
        assert_eq!(names, vec!["Sooner", "Later"]);
        assert_eq!(overview[0].due_tier, DueTier::Overdue);
    }

    #[rstest]
    fn empty_input_yields_empty_overview() {
        assert!(build_overview(&[], date(2024, 6, 10)).is_empty());
    }
}
