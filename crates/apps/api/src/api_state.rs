use app_state::AppSettings;
use axum::extract::FromRef;
use common_services::api::invitation::service::InvitationService;

#[derive(Clone)]
pub struct ApiContext {
    pub settings: AppSettings,
    pub invitation_service: InvitationService,
}

// Lets handlers extract only the part of the state they need.
impl FromRef<ApiContext> for InvitationService {
    fn from_ref(state: &ApiContext) -> Self {
        state.invitation_service.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}
