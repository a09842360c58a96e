use crate::api::invitation::error::InvitationError;
use crate::api::invitation::interfaces::{InvitationReceipt, Submission};
use crate::mailer::{InvitationComposer, InvitationMailer, SmtpMailer};
use crate::render::{INVITATION_EXTENSION, InvitationRenderer, TemplateRenderer};
use crate::storage::InvitationStore;
use app_state::AppSettings;
use color_eyre::eyre::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Render → persist → deliver, one attempt per submission.
///
/// Holds no per-request state; clones share the renderer, composer and mail transport.
#[derive(Clone)]
pub struct InvitationService {
    renderer: Arc<dyn InvitationRenderer>,
    store: InvitationStore,
    composer: Arc<InvitationComposer>,
    mailer: Arc<dyn InvitationMailer>,
}

impl InvitationService {
    #[must_use]
    pub fn new(
        renderer: Arc<dyn InvitationRenderer>,
        store: InvitationStore,
        composer: InvitationComposer,
        mailer: Arc<dyn InvitationMailer>,
    ) -> Self {
        Self {
            renderer,
            store,
            composer: Arc::new(composer),
            mailer,
        }
    }

    /// Production wiring: template renderer, filesystem store and pooled SMTP mailer.
    pub fn from_settings(settings: &AppSettings) -> Result<Self> {
        let renderer = TemplateRenderer::from_settings(&settings.invitation)?;
        let store = InvitationStore::new(&settings.invitation.output_folder);
        let composer = InvitationComposer::from_settings(&settings.mail, &settings.secrets)?;
        let mailer = SmtpMailer::from_settings(&settings.mail, &settings.secrets)?;

        Ok(Self::new(
            Arc::new(renderer),
            store,
            composer,
            Arc::new(mailer),
        ))
    }

    #[must_use]
    pub fn store(&self) -> &InvitationStore {
        &self.store
    }

    /// Runs every stage in order. A failing stage stops the pipeline, so no email goes out
    /// unless the file was fully written. A delivery failure leaves the file in place.
    #[instrument(skip_all, fields(email = %submission.email))]
    pub async fn process(
        &self,
        submission: &Submission,
    ) -> Result<InvitationReceipt, InvitationError> {
        let full_name = submission.full_name();
        info!("📩 New submission: {} ({})", full_name, submission.email);

        let rendered = self
            .renderer
            .render(&full_name)
            .await
            .map_err(InvitationError::Render)?;
        debug!("Rendered invitation for {}", full_name);

        let file_name = submission.file_name(INVITATION_EXTENSION);
        let stored = self
            .store
            .save(&file_name, &rendered.jpeg)
            .await
            .map_err(InvitationError::Persist)?;
        debug!("Stored invitation at {}", stored.path.display());

        let message = self
            .composer
            .compose(submission, &stored, rendered.jpeg)
            .map_err(InvitationError::Deliver)?;
        self.mailer
            .send(message)
            .await
            .map_err(InvitationError::Deliver)?;
        info!("✅ Invitation sent to {}", submission.email);

        Ok(InvitationReceipt {
            stored,
            recipient: submission.email.clone(),
        })
    }
}
