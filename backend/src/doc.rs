//! OpenAPI documentation configuration.
//!
//! Registers every HTTP path and the schemas they reference, plus the
//! session cookie security scheme. Swagger UI serves the document in debug
//! builds at `/docs`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    DueTier, Error, ErrorCode, PetOverview, PetPhoto, Profile, VaccinationRecord, VaccineType,
};
use crate::domain::schedule::{DueDateRule, VaccinationInterval};
use crate::inbound::http::auth::{
    CodeRequest, LoginRequest, SignUpRequest, SignUpResponse, UpdatePasswordRequest,
    VerifyCodeRequest,
};
use crate::inbound::http::health::HealthResponse;
use crate::inbound::http::photos::AddPhotoRequest;
use crate::inbound::http::profile::UpdateProfileRequest;
use crate::inbound::http::records::{BulkEditRequest, BulkEditResponse, CreateRecordRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "PatiCheck backend API",
        description = "Vaccination records, per-pet due overviews, pet photos, \
                       and session-authenticated account management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::request_code,
        crate::inbound::http::auth::verify_code,
        crate::inbound::http::auth::update_password,
        crate::inbound::http::auth::logout,
        crate::inbound::http::profile::fetch_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::records::list_records,
        crate::inbound::http::records::create_record,
        crate::inbound::http::records::bulk_edit_records,
        crate::inbound::http::records::pet_overview,
        crate::inbound::http::photos::list_photos,
        crate::inbound::http::photos::add_photo,
        crate::inbound::http::photos::delete_photo,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
    ),
    components(schemas(
        Error,
        ErrorCode,
        VaccinationRecord,
        VaccineType,
        DueTier,
        DueDateRule,
        VaccinationInterval,
        PetOverview,
        PetPhoto,
        Profile,
        HealthResponse,
        LoginRequest,
        SignUpRequest,
        SignUpResponse,
        CodeRequest,
        VerifyCodeRequest,
        UpdatePasswordRequest,
        UpdateProfileRequest,
        CreateRecordRequest,
        BulkEditRequest,
        BulkEditResponse,
        AddPhotoRequest,
    ))
)]
pub struct ApiDoc;
