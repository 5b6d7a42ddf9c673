//! Best-effort wake ping for the dashboard host.
//!
//! The hosting platform idles the dashboard after inactivity; the notifier
//! pokes its URL before dispatch so owners who click a reminder link land
//! on a warm instance. Failure here never blocks sending.

use std::time::Duration;

use reqwest::Url;

const WAKE_TIMEOUT: Duration = Duration::from_secs(20);

/// Fire one GET at the app URL and log the outcome.
pub async fn ping_app(url: &Url) {
    let client = match reqwest::Client::builder().timeout(WAKE_TIMEOUT).build() {
        Ok(client) => client,
        Err(error) => {
            tracing::warn!(%error, "could not build wake-up client");
            return;
        }
    };
    match client.get(url.clone()).send().await {
        Ok(response) => {
            tracing::info!(status = %response.status(), %url, "wake-up ping answered");
        }
        Err(error) => {
            tracing::warn!(%error, %url, "wake-up ping failed");
        }
    }
}
