//! Vaccination record endpoints.
//!
//! All routes are scoped to the signed-in owner; the repository applies the
//! owner filter, handlers never pass through ids from the payload as the
//! owner.

use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::RecordRepositoryError;
use crate::domain::schedule::{DueDateRule, ScheduleError};
use crate::domain::{
    ApiResult, Error, NewVaccinationRecord, PetName, RecordId, VaccinationRecord, VaccineType,
    WeightKg, build_overview,
};
use crate::inbound::http::{HttpState, SessionContext};

pub(crate) fn map_record_error(error: RecordRepositoryError) -> Error {
    match error {
        RecordRepositoryError::Connection { message } => Error::service_unavailable(message),
        RecordRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_schedule_error(error: ScheduleError) -> Error {
    match &error {
        ScheduleError::ManualDateBeforeApplication { applied, requested } => {
            Error::invalid_request(error.to_string()).with_details(json!({
                "dateApplied": applied,
                "requestedDueDate": requested,
            }))
        }
        ScheduleError::OutOfRange { .. } => Error::invalid_request(error.to_string()),
    }
}

/// Payload for creating a vaccination record.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    /// Pet the record belongs to. Trimmed, non-empty, at most 64 chars.
    pub pet_name: PetName,
    /// Vaccine or procedure applied.
    pub vaccine_type: VaccineType,
    /// Date the vaccine was applied.
    pub date_applied: NaiveDate,
    /// How to derive the next due date.
    pub due: DueDateRule,
    /// Weight at the visit, in kilograms.
    pub weight_kg: WeightKg,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Payload for bulk-editing existing records.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkEditRequest {
    /// Full replacement rows, keyed by their ids.
    pub records: Vec<VaccinationRecord>,
}

/// Outcome of a bulk edit.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkEditResponse {
    /// Rows written.
    pub updated: usize,
    /// Ids that matched no row for this owner.
    pub missing: Vec<RecordId>,
}

/// List every record of the signed-in owner, soonest due first.
#[utoipa::path(
    get,
    path = "/api/v1/records",
    tag = "records",
    responses(
        (status = 200, description = "Records for the owner", body = [VaccinationRecord]),
        (status = 401, description = "Not signed in", body = Error),
    )
)]
pub async fn list_records(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let owner = session.require_owner()?;
    let records = state
        .records
        .list_for_owner(&owner)
        .await
        .map_err(map_record_error)?;
    Ok(HttpResponse::Ok().json(records))
}

/// Create a record, deriving the next due date from the submitted rule.
#[utoipa::path(
    post,
    path = "/api/v1/records",
    tag = "records",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Stored record", body = VaccinationRecord),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Not signed in", body = Error),
    )
)]
pub async fn create_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<CreateRecordRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_owner()?;
    let body = body.into_inner();
    let next_due_date = body.due.resolve(body.date_applied).map_err(map_schedule_error)?;
    let new_record = NewVaccinationRecord {
        owner_id: owner,
        pet_name: body.pet_name,
        vaccine_type: body.vaccine_type,
        date_applied: body.date_applied,
        next_due_date,
        weight_kg: body.weight_kg,
        notes: body
            .notes
            .map(|notes| notes.trim().to_owned())
            .filter(|notes| !notes.is_empty()),
    };
    let record = state
        .records
        .insert(&new_record)
        .await
        .map_err(map_record_error)?;
    tracing::info!(
        owner = %owner.as_uuid(),
        pet = %record.pet_name,
        due = %record.next_due_date,
        "record created"
    );
    Ok(HttpResponse::Created().json(record))
}

/// Replace existing rows in bulk, the way the editable dashboard grid saves.
///
/// Rows that match no record of this owner are reported, not fatal; a row
/// whose due date precedes its application date fails the whole batch.
#[utoipa::path(
    put,
    path = "/api/v1/records",
    tag = "records",
    request_body = BulkEditRequest,
    responses(
        (status = 200, description = "Batch outcome", body = BulkEditResponse),
        (status = 400, description = "A row violates date ordering", body = Error),
        (status = 401, description = "Not signed in", body = Error),
    )
)]
pub async fn bulk_edit_records(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<BulkEditRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_owner()?;
    let mut records = body.into_inner().records;
    for record in &records {
        if record.next_due_date < record.date_applied {
            return Err(Error::invalid_request(
                "next due date precedes application date",
            )
            .with_details(json!({ "recordId": record.id })));
        }
    }

    let mut updated = 0;
    let mut missing = Vec::new();
    for record in &mut records {
        // The payload's owner field is untrusted; the session owns the rows.
        record.owner_id = owner;
        if state
            .records
            .update_owned(&owner, record)
            .await
            .map_err(map_record_error)?
        {
            updated += 1;
        } else {
            missing.push(record.id);
        }
    }
    if !missing.is_empty() {
        tracing::warn!(
            owner = %owner.as_uuid(),
            missing = missing.len(),
            "bulk edit skipped rows that matched no record"
        );
    }
    Ok(HttpResponse::Ok().json(BulkEditResponse { updated, missing }))
}

/// Per-pet summary cards, soonest due first.
#[utoipa::path(
    get,
    path = "/api/v1/overview",
    tag = "records",
    responses(
        (status = 200, description = "One card per pet", body = [crate::domain::PetOverview]),
        (status = 401, description = "Not signed in", body = Error),
    )
)]
pub async fn pet_overview(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let owner = session.require_owner()?;
    let records = state
        .records
        .list_for_owner(&owner)
        .await
        .map_err(map_record_error)?;
    let today = Utc::now().date_naive();
    Ok(HttpResponse::Ok().json(build_overview(&records, today)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use chrono::Duration;

    use crate::domain::OwnerId;
    use crate::domain::ports::{
        MockAuthGateway, MockPhotoRepository, MockProfileRepository, MockRecordRepository,
    };
    use crate::inbound::http::test_utils::{mock_state, seed_identity, sign_in_cookie, test_owner};

    fn record(owner: OwnerId, pet: &str, applied: NaiveDate, due: NaiveDate) -> VaccinationRecord {
        VaccinationRecord {
            id: RecordId::random(),
            owner_id: owner,
            pet_name: PetName::new(pet).expect("valid pet name"),
            vaccine_type: VaccineType::Rabies,
            date_applied: applied,
            next_due_date: due,
            weight_kg: WeightKg::new(4.2).expect("valid weight"),
            notes: None,
        }
    }

    async fn app_with(
        records: MockRecordRepository,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(mock_state(
                    MockAuthGateway::new(),
                    records,
                    MockProfileRepository::new(),
                    MockPhotoRepository::new(),
                ))
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route("/test/session", web::post().to(seed_identity))
                .configure(crate::inbound::http::configure),
        )
        .await
    }

    #[actix_web::test]
    async fn list_requires_a_session() {
        let app = app_with(MockRecordRepository::new()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/records").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_resolves_an_interval_due_date() {
        let mut records = MockRecordRepository::new();
        records
            .expect_insert()
            .withf(|new_record| {
                new_record.next_due_date
                    == NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date")
            })
            .times(1)
            .returning(|new_record| {
                Ok(VaccinationRecord {
                    id: RecordId::random(),
                    owner_id: new_record.owner_id,
                    pet_name: new_record.pet_name.clone(),
                    vaccine_type: new_record.vaccine_type,
                    date_applied: new_record.date_applied,
                    next_due_date: new_record.next_due_date,
                    weight_kg: new_record.weight_kg,
                    notes: new_record.notes.clone(),
                })
            });
        let app = app_with(records).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/records")
                .cookie(cookie)
                .set_json(json!({
                    "petName": "Boncuk",
                    "vaccineType": "rabies",
                    "dateApplied": "2024-01-01",
                    "due": { "kind": "interval", "interval": "one_year" },
                    "weightKg": 4.2,
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let stored: VaccinationRecord = test::read_body_json(res).await;
        assert_eq!(
            stored.next_due_date,
            NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date")
        );
        assert_eq!(stored.owner_id, test_owner());
    }

    #[actix_web::test]
    async fn create_rejects_a_manual_date_before_application() {
        let app = app_with(MockRecordRepository::new()).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/records")
                .cookie(cookie)
                .set_json(json!({
                    "petName": "Boncuk",
                    "vaccineType": "rabies",
                    "dateApplied": "2024-06-10",
                    "due": { "kind": "manual", "date": "2024-06-01" },
                    "weightKg": 4.2,
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["requestedDueDate"], "2024-06-01");
    }

    #[actix_web::test]
    async fn create_rejects_a_blank_pet_name() {
        let app = app_with(MockRecordRepository::new()).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/records")
                .cookie(cookie)
                .set_json(json!({
                    "petName": "   ",
                    "vaccineType": "rabies",
                    "dateApplied": "2024-06-10",
                    "due": { "kind": "interval", "interval": "one_month" },
                    "weightKg": 4.2,
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn bulk_edit_reports_missing_rows() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
        let owner = test_owner();
        let known = record(owner, "Boncuk", date(2024, 1, 1), date(2024, 12, 31));
        let unknown = record(owner, "Duman", date(2024, 2, 1), date(2024, 3, 1));
        let unknown_id = unknown.id;

        let known_id = known.id;
        let mut records = MockRecordRepository::new();
        records
            .expect_update_owned()
            .times(2)
            .returning(move |_, record| Ok(record.id == known_id));
        let app = app_with(records).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/records")
                .cookie(cookie)
                .set_json(json!({ "records": [known, unknown] }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: BulkEditResponse = test::read_body_json(res).await;
        assert_eq!(body.updated, 1);
        assert_eq!(body.missing, vec![unknown_id]);
    }

    #[actix_web::test]
    async fn bulk_edit_rejects_inverted_dates() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
        let inverted = record(test_owner(), "Boncuk", date(2024, 6, 10), date(2024, 6, 1));

        let app = app_with(MockRecordRepository::new()).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/records")
                .cookie(cookie)
                .set_json(json!({ "records": [inverted] }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn overview_summarises_per_pet() {
        let today = Utc::now().date_naive();
        let owner = test_owner();
        let rows = vec![
            record(owner, "Boncuk", today - Duration::days(30), today + Duration::days(2)),
            record(owner, "Boncuk", today - Duration::days(60), today + Duration::days(90)),
            record(owner, "Duman", today - Duration::days(10), today - Duration::days(1)),
        ];
        let mut records = MockRecordRepository::new();
        records
            .expect_list_for_owner()
            .times(1)
            .returning(move |_| Ok(rows.clone()));
        let app = app_with(records).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/overview")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        let cards = body.as_array().expect("array of cards");
        assert_eq!(cards.len(), 2);
        // Duman is overdue and sorts first.
        assert_eq!(cards[0]["petName"], "Duman");
        assert_eq!(cards[0]["dueTier"], "overdue");
        assert_eq!(cards[1]["petName"], "Boncuk");
        assert_eq!(cards[1]["recordCount"], 2);
    }

    #[actix_web::test]
    async fn repository_connection_failure_maps_to_unavailable() {
        let mut records = MockRecordRepository::new();
        records
            .expect_list_for_owner()
            .returning(|_| Err(RecordRepositoryError::connection("pool timed out")));
        let app = app_with(records).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/records")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
