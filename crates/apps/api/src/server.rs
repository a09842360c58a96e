use crate::api_state::ApiContext;
use crate::create_router;
use app_state::AppSettings;
use axum::Router;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_services::api::invitation::service::InvitationService;
use std::net::SocketAddr;
use tokio::fs;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Builds the production services from `settings`, binds `api.host:api.port` and serves.
pub async fn serve(settings: AppSettings) -> Result<()> {
    info!("🚀 Initializing server...");
    let api_state = ApiContext {
        invitation_service: InvitationService::from_settings(&settings)?,
        settings: settings.clone(),
    };

    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;
    let listener = TcpListener::bind(addr).await?;

    serve_on(listener, api_state).await
}

/// Serves an already built context on `listener`. Used directly by the integration tests.
pub async fn serve_on(listener: TcpListener, api_state: ApiContext) -> Result<()> {
    let template = &api_state.settings.invitation.template_path;
    if !fs::try_exists(template).await.unwrap_or(false) {
        warn!(
            "Template {} not found, every submission will fail until it exists",
            template.display()
        );
    }
    api_state.invitation_service.store().ensure_folder().await?;

    let app = create_app(api_state);

    info!("🐸 Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// API routes plus the public folder as fallback, so rendered invitations are reachable too.
pub fn create_app(api_state: ApiContext) -> Router {
    let serve_dir = ServeDir::new(&api_state.settings.api.public_folder);

    create_router(api_state)
        .fallback_service(serve_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}
