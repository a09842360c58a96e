use crate::invitation::extractors::SubmissionBody;
use axum::extract::State;
use common_services::api::invitation::error::InvitationError;
use common_services::api::invitation::interfaces::{Submission, SubmissionPayload};
use common_services::api::invitation::service::InvitationService;

pub const SUCCESS_MESSAGE: &str = "✅ Invito generato e inviato via email!";

/// Register for the event and receive a personalized invitation by email.
///
/// The body may be JSON or `application/x-www-form-urlencoded`. The invitation is rendered,
/// stored under the public folder and mailed to the given address, in that order.
///
/// # Errors
///
/// Returns `InvitationError::MissingFields` or `InvalidBody` (400) for a bad submission, and
/// a stage error (500, generic body) when rendering, storing or sending fails.
#[utoipa::path(
    post,
    path = "/iscrizione",
    tag = "Invitation",
    request_body = SubmissionPayload,
    responses(
        (status = 200, description = "Invitation rendered, stored and sent.", body = String, content_type = "text/plain"),
        (status = 400, description = "A required field is missing or empty.", body = String, content_type = "text/plain"),
        (status = 500, description = "Rendering, storing or sending failed.", body = String, content_type = "text/plain"),
    )
)]
pub async fn post_submission(
    State(service): State<InvitationService>,
    SubmissionBody(payload): SubmissionBody,
) -> Result<&'static str, InvitationError> {
    let submission = Submission::parse(payload)?;
    service.process(&submission).await?;
    Ok(SUCCESS_MESSAGE)
}
