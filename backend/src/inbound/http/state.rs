//! Shared application state handed to HTTP handlers.

use std::sync::Arc;

use crate::domain::ports::{
    AuthGateway, PhotoRepository, ProfileRepository, RecordRepository,
};

/// Trait-object bundle of every outbound port the HTTP surface needs.
///
/// Handlers receive this through `web::Data<HttpState>`; tests swap in
/// mocks per port.
#[derive(Clone)]
pub struct HttpState {
    /// Authentication gateway for sign-in, sign-up and password flows.
    pub auth: Arc<dyn AuthGateway>,
    /// Vaccination record storage.
    pub records: Arc<dyn RecordRepository>,
    /// Owner profile storage.
    pub profiles: Arc<dyn ProfileRepository>,
    /// Pet photo storage.
    pub photos: Arc<dyn PhotoRepository>,
}

impl HttpState {
    /// Bundle the outbound ports for handler consumption.
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        records: Arc<dyn RecordRepository>,
        profiles: Arc<dyn ProfileRepository>,
        photos: Arc<dyn PhotoRepository>,
    ) -> Self {
        Self {
            auth,
            records,
            profiles,
            photos,
        }
    }
}
