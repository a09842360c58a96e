use axum::extract::{FromRequest, Request};
use axum::http::header;
use axum::{Form, Json};
use common_services::api::invitation::error::InvitationError;
use common_services::api::invitation::interfaces::SubmissionPayload;

/// Accepts the registration form either as JSON or url-encoded, picked by `Content-Type`.
pub struct SubmissionBody(pub SubmissionPayload);

impl<S> FromRequest<S> for SubmissionBody
where
    S: Send + Sync,
{
    type Rejection = InvitationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);

        let payload = if is_json {
            let Json(payload) = Json::<SubmissionPayload>::from_request(req, state)
                .await
                .map_err(|e| InvitationError::InvalidBody(e.body_text()))?;
            payload
        } else {
            let Form(payload) = Form::<SubmissionPayload>::from_request(req, state)
                .await
                .map_err(|e| InvitationError::InvalidBody(e.body_text()))?;
            payload
        };

        Ok(Self(payload))
    }
}

/// `application/json` or any `application/*+json`, ignoring case and parameters.
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
