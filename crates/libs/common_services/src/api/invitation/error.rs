use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use thiserror::Error;
use tracing::{error, warn};

/// Body returned for every failure after validation. The caller never learns which stage failed.
pub const GENERIC_FAILURE_MESSAGE: &str = "Errore durante la generazione o l'invio dell'email.";

#[derive(Debug, Error)]
pub enum InvitationError {
    #[error("❌ Tutti i campi sono obbligatori. Mancanti: {}.", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("❌ Richiesta non valida: {0}")]
    InvalidBody(String),

    #[error("failed to render invitation")]
    Render(eyre::Report),

    #[error("failed to store invitation")]
    Persist(eyre::Report),

    #[error("failed to deliver invitation email")]
    Deliver(eyre::Report),
}

impl InvitationError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Render(_) | Self::Persist(_) | Self::Deliver(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for InvitationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::MissingFields(_) | Self::InvalidBody(_) => {
                warn!("Rejected submission: {}", self);
                self.to_string()
            }
            Self::Render(report) | Self::Persist(report) | Self::Deliver(report) => {
                error!("❌ {}: {:?}", self, report);
                GENERIC_FAILURE_MESSAGE.to_owned()
            }
        };

        (status, message).into_response()
    }
}
