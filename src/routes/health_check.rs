use actix_web::{HttpResponse, Responder};

/// Liveness probe for the deployment and the Record Store's trigger delivery
#[tracing::instrument(name = "Health Check handler")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}
