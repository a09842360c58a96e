use crate::{
    LoggingSettings, MailSettings, RawApiSettings, RawInvitationSettings, RawSettings,
    SecretSettings, parse_hex_color,
};
use color_eyre::eyre::{Context, Result, bail};
use std::path::{PathBuf, absolute};

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub invitation: InvitationSettings,
    pub mail: MailSettings,
    pub logging: LoggingSettings,
    pub secrets: SecretSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    pub public_folder: PathBuf,
}

#[derive(Debug, Clone)]
pub struct InvitationSettings {
    pub template_path: PathBuf,
    pub font_path: PathBuf,
    /// Absolute folder the rendered invitations go to, `public_folder/output_subfolder`.
    pub output_folder: PathBuf,
    pub font_size: f32,
    pub text_color: [u8; 4],
    pub shadow_color: [u8; 4],
    pub shadow_blur: f32,
    pub vertical_offset: i32,
    pub jpeg_quality: u8,
}

impl TryFrom<RawSettings> for AppSettings {
    type Error = color_eyre::Report;

    fn try_from(raw: RawSettings) -> Result<Self> {
        let api = ApiSettings::try_from(raw.api)?;
        let invitation = InvitationSettings::from_raw(raw.invitation, &api)?;

        Ok(Self {
            api,
            invitation,
            mail: raw.mail,
            logging: raw.logging,
            secrets: raw.secrets,
        })
    }
}

impl TryFrom<RawApiSettings> for ApiSettings {
    type Error = color_eyre::Report;

    fn try_from(raw: RawApiSettings) -> Result<Self> {
        let public_folder = absolute(&raw.public_folder).wrap_err("Invalid api.public_folder")?;
        Ok(Self {
            host: raw.host,
            port: raw.port,
            public_folder,
        })
    }
}

impl InvitationSettings {
    fn from_raw(raw: RawInvitationSettings, api: &ApiSettings) -> Result<Self> {
        if !(1..=100).contains(&raw.jpeg_quality) {
            bail!(
                "invitation.jpeg_quality must be within 1..=100, got {}",
                raw.jpeg_quality
            );
        }
        if raw.font_size <= 0. {
            bail!("invitation.font_size must be positive, got {}", raw.font_size);
        }
        if raw.output_subfolder.trim().is_empty() {
            bail!("invitation.output_subfolder cannot be empty");
        }

        Ok(Self {
            template_path: absolute(&raw.template_path)
                .wrap_err("Invalid invitation.template_path")?,
            font_path: absolute(&raw.font_path).wrap_err("Invalid invitation.font_path")?,
            output_folder: api.public_folder.join(&raw.output_subfolder),
            font_size: raw.font_size,
            text_color: parse_hex_color(&raw.text_color)
                .wrap_err("Invalid invitation.text_color")?,
            shadow_color: parse_hex_color(&raw.shadow_color)
                .wrap_err("Invalid invitation.shadow_color")?,
            shadow_blur: raw.shadow_blur.max(0.),
            vertical_offset: raw.vertical_offset,
            jpeg_quality: raw.jpeg_quality,
        })
    }
}

impl AppSettings {
    /// Default `EnvFilter` directive built from `logging.level`.
    #[must_use]
    pub fn log_filter(&self) -> String {
        let level = &self.logging.level;
        format!("api={level},common_services={level},app_state={level},tower_http=debug")
    }
}
