use std::sync::Arc;

use crate::domain::accepted_student::AcceptedStudent;
use crate::domain::student_change::StudentChange;
use crate::email_client::{EmailMessage, MailTransport};
use crate::ledger::DeliveryLedger;

pub const ACCEPTANCE_SUBJECT: &str = "Congratulations! You Have Been Accepted";

/// What happened to a single trigger invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationOutcome {
    /// The update was not a transition into `Accepted`.
    Skipped,
    Sent,
    /// The transport failed; the failure was logged and swallowed.
    Failed,
    /// The same trigger event was already handled.
    Duplicate,
}

#[derive(thiserror::Error, Debug)]
pub enum NotifyError {
    #[error("{0}")]
    ValidationError(String),
}

/// Reacts to one update of a student record and emails the student when the
/// record has just been accepted.
pub struct ChangeNotifier {
    transport: Arc<dyn MailTransport>,
    ledger: Option<Arc<dyn DeliveryLedger>>,
    institution_name: String,
}

impl ChangeNotifier {
    pub fn new(transport: Arc<dyn MailTransport>, institution_name: String) -> ChangeNotifier {
        ChangeNotifier {
            transport,
            ledger: None,
            institution_name,
        }
    }

    pub fn with_ledger(mut self, ledger: Arc<dyn DeliveryLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    #[tracing::instrument(
        name = "Handling a student record update",
        skip(self, change),
        fields(
            student_id = %change.student_id(),
            before_status = %change.before.status.as_ref(),
            after_status = %change.after.status.as_ref(),
        )
    )]
    pub async fn handle_change(
        &self,
        change: &StudentChange,
    ) -> Result<NotificationOutcome, NotifyError> {
        if !change.is_acceptance() {
            return Ok(NotificationOutcome::Skipped);
        }

        let student =
            AcceptedStudent::try_from(&change.after).map_err(NotifyError::ValidationError)?;

        if let (Some(event_id), Some(ledger)) = (change.event_id.as_deref(), &self.ledger) {
            match ledger.record_first_delivery(event_id).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::info!("Trigger event {} was already handled", event_id);
                    return Ok(NotificationOutcome::Duplicate);
                }
                Err(err) => {
                    tracing::warn!(
                        "Failed to record trigger event {}, sending anyway: {:?}",
                        event_id,
                        err
                    );
                }
            }
        }

        let message = self.acceptance_email(&student);

        match self.transport.send(&message).await {
            Ok(()) => {
                tracing::info!(
                    "Email sent to {} for {} (student {}) successfully",
                    student.email,
                    student.name,
                    student.id
                );
                Ok(NotificationOutcome::Sent)
            }
            Err(err) => {
                tracing::error!(
                    "Failed to send the acceptance email to {}: {:?}",
                    student.email,
                    err
                );
                Ok(NotificationOutcome::Failed)
            }
        }
    }

    pub fn acceptance_email(&self, student: &AcceptedStudent) -> EmailMessage {
        let body = format!(
            "Dear {},\n\nCongratulations! You have been accepted.\n\nBest regards,\n{}",
            student.name.full_name(),
            self.institution_name
        );

        EmailMessage {
            to: student.email.clone(),
            subject: String::from(ACCEPTANCE_SUBJECT),
            body,
        }
    }
}
