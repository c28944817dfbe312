use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use secrecy::ExposeSecret;
use std::future::{ready, Ready};
use subtle::ConstantTimeEq;

use crate::domain::student_change::{StudentChange, StudentChangeBody};
use crate::notifier::{ChangeNotifier, NotificationOutcome, NotifyError};
use crate::startup::TriggerToken;

#[derive(serde::Serialize)]
struct StudentUpdatedResponse {
    outcome: NotificationOutcome,
}

/// Proof that the caller presented the trigger token. Listed before the body
/// in a handler, it rejects unauthenticated calls before the body is read.
#[derive(Debug)]
pub struct AuthorizedTrigger;

impl FromRequest for AuthorizedTrigger {
    type Error = TriggerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(request: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authorize(request).map(|()| AuthorizedTrigger))
    }
}

fn authorize(request: &HttpRequest) -> Result<(), TriggerError> {
    let trigger_token = request
        .app_data::<web::Data<TriggerToken>>()
        .ok_or(TriggerError::Unauthorized)?;
    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(TriggerError::Unauthorized)?;
    let expected = trigger_token.0.expose_secret();

    if !bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(TriggerError::Unauthorized);
    }

    Ok(())
}

/// Endpoint called by the Record Store once per committed update to a student
/// record. Mail relay failures are logged and still answered with 200: the
/// update is already committed and nothing upstream can act on them.
#[tracing::instrument(
    name = "Student record updated handler",
    skip(_caller, body, notifier),
    fields(
        student_id = %body.after.id,
        event_id = ?body.event_id
    )
)]
pub async fn handle_student_updated(
    _caller: AuthorizedTrigger,
    body: web::Json<StudentChangeBody>,
    notifier: web::Data<ChangeNotifier>,
) -> Result<HttpResponse, TriggerError> {
    let change: StudentChange = body.try_into().map_err(TriggerError::ValidationError)?;
    let outcome = notifier.handle_change(&change).await?;

    Ok(HttpResponse::Ok().json(StudentUpdatedResponse { outcome }))
}

#[derive(thiserror::Error)]
pub enum TriggerError {
    #[error("Invalid student update: {0}")]
    ValidationError(String),
    #[error("Missing or invalid trigger token.")]
    Unauthorized,
}

impl From<NotifyError> for TriggerError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::ValidationError(reason) => TriggerError::ValidationError(reason),
        }
    }
}

impl std::fmt::Debug for TriggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for TriggerError {
    fn status_code(&self) -> StatusCode {
        match self {
            TriggerError::ValidationError(_) => StatusCode::BAD_REQUEST,
            TriggerError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}
