use async_trait::async_trait;
use color_eyre::eyre::{Result, bail};
use common_services::mailer::InvitationMailer;
use common_services::render::{InvitationRenderer, TemplateRenderer, TextStyle, bundled_font};
use lettre::Message;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// The production renderer with the bundled font, reading the template on every call.
pub fn test_renderer(template_path: &Path, style: TextStyle) -> Result<Arc<dyn InvitationRenderer>> {
    Ok(Arc::new(TemplateRenderer::new(
        template_path,
        bundled_font()?,
        style,
    )))
}

/// What the mailer saw when a message was handed to it.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipients: Vec<String>,
    pub raw: String,
    /// `(file name, size)` of every file in the output folder at send time.
    pub output_files: Vec<(String, u64)>,
}

impl SentEmail {
    #[must_use]
    pub fn output_file_size(&self, file_name: &str) -> Option<u64> {
        self.output_files
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, size)| *size)
    }
}

/// Records every message instead of delivering it. Can be switched to fail.
pub struct RecordingMailer {
    output_folder: PathBuf,
    failing: AtomicBool,
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingMailer {
    #[must_use]
    pub fn new(output_folder: &Path) -> Self {
        Self {
            output_folder: output_folder.to_path_buf(),
            failing: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    #[must_use]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }

    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer lock poisoned").len()
    }

    fn snapshot_output_folder(&self) -> Vec<(String, u64)> {
        let Ok(entries) = std::fs::read_dir(&self.output_folder) else {
            return Vec::new();
        };
        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let size = entry.metadata().ok()?.len();
                Some((entry.file_name().to_string_lossy().to_string(), size))
            })
            .collect()
    }
}

#[async_trait]
impl InvitationMailer for RecordingMailer {
    async fn send(&self, message: Message) -> Result<()> {
        let email = SentEmail {
            recipients: message
                .envelope()
                .to()
                .iter()
                .map(ToString::to_string)
                .collect(),
            raw: String::from_utf8_lossy(&message.formatted()).to_string(),
            output_files: self.snapshot_output_folder(),
        };
        self.sent.lock().expect("mailer lock poisoned").push(email);

        if self.failing.load(Ordering::SeqCst) {
            bail!("simulated SMTP failure");
        }
        Ok(())
    }
}
