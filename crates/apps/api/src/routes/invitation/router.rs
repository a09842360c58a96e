use crate::api_state::ApiContext;
use crate::invitation::handlers::post_submission;
use axum::{Router, routing::post};

pub fn invitation_public_router() -> Router<ApiContext> {
    Router::new().route("/iscrizione", post(post_submission))
}
