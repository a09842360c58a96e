use crate::routes::{invitation, root};
use common_services::api::invitation::interfaces::SubmissionPayload;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::health_check,
        invitation::handlers::post_submission,
    ),
    components(
        schemas(
            SubmissionPayload,
        ),
    ),
    tags(
        (name = "Invitation", description = "Event registration and personalized invitations"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;
