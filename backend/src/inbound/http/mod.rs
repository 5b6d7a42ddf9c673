//! Inbound HTTP adapter.
//!
//! Thin Actix handlers that translate requests into domain calls and domain
//! errors into HTTP responses. All business rules live in
//! [`crate::domain`]; nothing here should make a scheduling or validation
//! decision beyond parsing.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod health;
pub mod photos;
pub mod profile;
pub mod records;
pub mod session;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;

pub use health::HealthState;
pub use session::SessionContext;
pub use state::HttpState;

/// Mount the versioned API surface.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login))
                    .route("/signup", web::post().to(auth::sign_up))
                    .route("/code", web::post().to(auth::request_code))
                    .route("/verify", web::post().to(auth::verify_code))
                    .route("/password", web::put().to(auth::update_password))
                    .route("/logout", web::post().to(auth::logout)),
            )
            .route("/profile", web::get().to(profile::fetch_profile))
            .route("/profile", web::put().to(profile::update_profile))
            .route("/records", web::get().to(records::list_records))
            .route("/records", web::post().to(records::create_record))
            .route("/records", web::put().to(records::bulk_edit_records))
            .route("/overview", web::get().to(records::pet_overview))
            .route("/pets/{pet}/photos", web::get().to(photos::list_photos))
            .route("/photos", web::post().to(photos::add_photo))
            .route("/photos/{id}", web::delete().to(photos::delete_photo)),
    );
}
