use crate::runner::context::doubles::{RecordingMailer, test_renderer};
use api::api_state::ApiContext;
use app_state::{AppSettings, load_settings_from_path};
use color_eyre::eyre::{Result, eyre};
use common_services::api::invitation::service::InvitationService;
use common_services::mailer::InvitationComposer;
use common_services::render::TextStyle;
use common_services::storage::InvitationStore;
use image::{Rgb, RgbImage};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub const TEMPLATE_WIDTH: u32 = 800;
pub const TEMPLATE_HEIGHT: u32 = 600;

/// A running API on a free port, backed by a temporary public folder and a recording mailer.
pub struct TestContext {
    pub settings: AppSettings,
    pub base_url: String,
    pub http_client: Client,
    pub mailer: Arc<RecordingMailer>,
    _root: TempDir,
    api_handle: JoinHandle<()>,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        info!("Setting up test environment...");

        let settings_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets/settings.yaml")
            .canonicalize()?;
        let base_settings = load_settings_from_path(&settings_path, false)?;

        let root = TempDir::new()?;
        let settings = create_test_settings(&base_settings, root.path());
        write_template(&settings.invitation.template_path)?;

        let mailer = Arc::new(RecordingMailer::new(&settings.invitation.output_folder));
        let invitation_service = InvitationService::new(
            test_renderer(
                &settings.invitation.template_path,
                TextStyle::from(&settings.invitation),
            )?,
            InvitationStore::new(&settings.invitation.output_folder),
            InvitationComposer::from_settings(&settings.mail, &settings.secrets)?,
            mailer.clone(),
        );
        let api_state = ApiContext {
            settings: settings.clone(),
            invitation_service,
        };

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let api_handle = tokio::spawn(async move {
            if let Err(e) = api::serve_on(listener, api_state).await {
                error!("API server failed: {:?}", e);
            }
        });

        let http_client = Client::new();
        wait_for_healthy_api(&base_url, &http_client).await?;

        info!("Test environment is ready at {}", base_url);
        Ok(Self {
            settings,
            base_url,
            http_client,
            mailer,
            _root: root,
            api_handle,
        })
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[must_use]
    pub fn invitation_path(&self, file_name: &str) -> PathBuf {
        self.settings.invitation.output_folder.join(file_name)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.api_handle.abort();
    }
}

/// Points every path of `base` into `root`.
fn create_test_settings(base: &AppSettings, root: &Path) -> AppSettings {
    let mut settings = base.clone();
    let public_folder = root.join("public");
    settings.invitation.output_folder = public_folder.join("inviti");
    settings.invitation.template_path = root.join("locandina.jpg");
    settings.api.public_folder = public_folder;
    settings
}

fn write_template(path: &Path) -> Result<()> {
    let template = RgbImage::from_fn(TEMPLATE_WIDTH, TEMPLATE_HEIGHT, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    });
    template.save(path)?;
    Ok(())
}

async fn wait_for_healthy_api(base_url: &str, client: &Client) -> Result<()> {
    let health_url = format!("{base_url}/health");
    for _ in 0..50 {
        if let Ok(response) = client.get(&health_url).send().await
            && response.status().is_success()
        {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Err(eyre!("API at {} did not become healthy", base_url))
}
