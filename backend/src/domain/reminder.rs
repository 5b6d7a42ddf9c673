//! Reminder planning, rendering, and dispatch.
//!
//! The notifier binary drives [`ReminderDispatcher::run`] once per
//! scheduled invocation: load every record with its owner profile, keep the
//! ones whose days-until-due fall on the notify schedule, claim each in the
//! dedup log, and send one message per recipient. Per-record and per-send
//! failures are logged and the loop continues.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::due::days_until;
use crate::domain::error::Error;
use crate::domain::ports::{
    Mailer, MailerError, OutboundEmail, ReminderFeed, ReminderFeedError, ReminderLog,
};
use crate::domain::profile::{EmailAddress, Profile};
use crate::domain::record::VaccinationRecord;

/// Day offsets from the due date on which reminder mail goes out.
///
/// Negative offsets are post-due nudges for overdue records.
pub const NOTIFY_DAY_OFFSETS: [i64; 6] = [7, 3, 1, 0, -3, -7];

/// One planned reminder: a record on a notify day plus its recipients.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    /// The record being reminded about.
    pub record: VaccinationRecord,
    /// Signed days until the due date; always in [`NOTIFY_DAY_OFFSETS`].
    pub days_left: i64,
    /// Addresses to mail, primary first.
    pub recipients: Vec<EmailAddress>,
}

/// Select the records due for a reminder today.
///
/// Emits exactly one [`Reminder`] per record whose `days_left` is in the
/// notify set, carrying every configured recipient of the owner.
pub fn plan_reminders(
    rows: &[(VaccinationRecord, Profile)],
    today: NaiveDate,
) -> Vec<Reminder> {
    rows.iter()
        .filter_map(|(record, profile)| {
            let days_left = days_until(record.next_due_date, today);
            NOTIFY_DAY_OFFSETS.contains(&days_left).then(|| Reminder {
                record: record.clone(),
                days_left,
                recipients: profile.recipients().into_iter().cloned().collect(),
            })
        })
        .collect()
}

/// Google Calendar "add event" deep link for a due date.
///
/// The event is a fixed 09:00-09:15 slot on the due date, titled
/// `{pet}-{vaccine}`, matching the link the original product emitted.
pub fn calendar_link(pet: &str, vaccine: &str, due_date: NaiveDate) -> String {
    let day = due_date.format("%Y%m%d");
    format!(
        "https://www.google.com/calendar/render?action=TEMPLATE&text={pet}-{vaccine}&dates={day}T090000/{day}T091500&details=PatiCheck"
    )
}

fn urgency_phrase(days_left: i64) -> String {
    if days_left < 0 {
        format!("overdue by {} day(s)", -days_left)
    } else if days_left == 0 {
        "due today".to_owned()
    } else {
        format!("due in {days_left} day(s)")
    }
}

/// Render the reminder for one recipient.
pub fn render_email(reminder: &Reminder, recipient: &EmailAddress) -> OutboundEmail {
    let record = &reminder.record;
    let pet = record.pet_name.as_str();
    let vaccine = record.vaccine_type.label();
    let phrase = urgency_phrase(reminder.days_left);
    let link = calendar_link(pet, vaccine, record.next_due_date);

    let subject = format!("PatiCheck: {pet} - {vaccine} {phrase}");
    let html_body = format!(
        "<h3>Reminder for {pet}</h3>\
         <p><strong>{vaccine}</strong> is {phrase}.</p>\
         <ul><li>Due date: {due}</li><li>Days left: {days}</li></ul>\
         <a href=\"{link}\" style=\"background-color:#4285F4;color:white;padding:10px;\
text-decoration:none;border-radius:5px;\">Add to Google Calendar</a>",
        due = record.next_due_date,
        days = reminder.days_left,
    );

    OutboundEmail {
        to: recipient.clone(),
        subject,
        html_body,
    }
}

/// Outcome counters for one dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Records loaded from the feed.
    pub records_considered: usize,
    /// Reminders whose day offset matched the notify set.
    pub reminders_planned: usize,
    /// Messages accepted by the relay.
    pub emails_sent: usize,
    /// Reminders skipped because a previous run already claimed them.
    pub suppressed: usize,
    /// Claim or send failures; the run continues past each.
    pub failures: usize,
}

/// Stateless batch dispatcher over the feed, dedup log, and mailer ports.
#[derive(Clone)]
pub struct ReminderDispatcher<F, L, M> {
    feed: Arc<F>,
    log: Arc<L>,
    mailer: Arc<M>,
}

impl<F, L, M> ReminderDispatcher<F, L, M>
where
    F: ReminderFeed,
    L: ReminderLog,
    M: Mailer,
{
    /// Create a dispatcher over the given ports.
    pub fn new(feed: Arc<F>, log: Arc<L>, mailer: Arc<M>) -> Self {
        Self { feed, log, mailer }
    }

    /// Run one dispatch pass for `today`.
    ///
    /// Only a feed failure aborts the run; everything downstream is
    /// per-reminder and logged.
    pub async fn run(&self, today: NaiveDate) -> Result<DispatchSummary, Error> {
        let rows = self
            .feed
            .records_with_recipients()
            .await
            .map_err(map_feed_error)?;

        let reminders = plan_reminders(&rows, today);
        let mut summary = DispatchSummary {
            records_considered: rows.len(),
            reminders_planned: reminders.len(),
            ..DispatchSummary::default()
        };

        for reminder in &reminders {
            self.dispatch_one(reminder, &mut summary).await;
        }

        info!(
            considered = summary.records_considered,
            planned = summary.reminders_planned,
            sent = summary.emails_sent,
            suppressed = summary.suppressed,
            failures = summary.failures,
            %today,
            "reminder dispatch finished"
        );
        Ok(summary)
    }

    async fn dispatch_one(&self, reminder: &Reminder, summary: &mut DispatchSummary) {
        let record = &reminder.record;
        let claimed = match self
            .log
            .try_claim(record.id, record.next_due_date, reminder.days_left)
            .await
        {
            Ok(claimed) => claimed,
            Err(error) => {
                // Without a claim we must not send: a retry next run is
                // better than a possible double-send now.
                warn!(record = %record.id, %error, "reminder claim failed");
                summary.failures += 1;
                return;
            }
        };

        if !claimed {
            summary.suppressed += 1;
            return;
        }

        for recipient in &reminder.recipients {
            let email = render_email(reminder, recipient);
            match self.mailer.send(&email).await {
                Ok(()) => summary.emails_sent += 1,
                Err(error) => {
                    warn!(
                        record = %record.id,
                        recipient = %recipient,
                        %error,
                        "reminder send failed"
                    );
                    summary.failures += 1;
                }
            }
        }
    }
}

fn map_feed_error(error: ReminderFeedError) -> Error {
    match error {
        ReminderFeedError::Connection { message } => {
            Error::service_unavailable(format!("reminder feed unavailable: {message}"))
        }
        ReminderFeedError::Query { message } => {
            Error::internal(format!("reminder feed error: {message}"))
        }
    }
}
