use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: RawApiSettings,
    pub invitation: RawInvitationSettings,
    pub mail: MailSettings,
    pub logging: LoggingSettings,
    pub secrets: SecretSettings,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct RawApiSettings {
    pub host: String,
    pub port: u16,
    /// Folder served as-is for every path without a route. Invitations are written below it.
    pub public_folder: PathBuf,
}

/// How the personalized invitation is drawn and stored.
#[derive(Debug, Deserialize, Clone)]
pub struct RawInvitationSettings {
    /// Base artwork, read again on every render.
    pub template_path: PathBuf,
    /// Bold TTF/OTF font, loaded once at startup.
    pub font_path: PathBuf,
    /// Subfolder of `api.public_folder` that receives the rendered files.
    pub output_subfolder: String,
    pub font_size: f32,
    /// `#RRGGBB` or `#RRGGBBAA`.
    pub text_color: String,
    /// `#RRGGBB` or `#RRGGBBAA`.
    pub shadow_color: String,
    /// Blur radius of the drop shadow in pixels. 0 disables the blur.
    pub shadow_blur: f32,
    /// How far above the vertical center the text is placed.
    pub vertical_offset: i32,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Use STARTTLS on a plain connection instead of implicit TLS.
    pub starttls: bool,
    /// Display name of the sender, the address itself is `secrets.email_user`.
    pub sender_name: String,
    /// Event named in the email greeting.
    pub event_name: String,
    pub subject: String,
    /// Content id shared by the inline image and the downloadable attachment.
    pub content_id: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Deserialize, Clone)]
pub struct SecretSettings {
    pub email_user: String,
    pub email_pass: String,
}

impl fmt::Debug for SecretSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretSettings")
            .field("email_user", &self.email_user)
            .field("email_pass", &"[redacted]")
            .finish()
    }
}
