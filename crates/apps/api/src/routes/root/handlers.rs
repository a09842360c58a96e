use app_state::AppSettings;
use axum::extract::State;
use axum::http::StatusCode;
use tokio::fs;
use tracing::error;

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "API is healthy and the invitation template is in place", body = String),
        (status = 503, description = "The invitation template is missing, submissions would fail.")
    )
)]
pub async fn health_check(State(settings): State<AppSettings>) -> Result<&'static str, StatusCode> {
    let template = &settings.invitation.template_path;
    match fs::try_exists(template).await {
        Ok(true) => Ok("OK"),
        Ok(false) => {
            error!("Health check failed: template {} not found", template.display());
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
        Err(e) => {
            error!("Health check failed: cannot access template: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
