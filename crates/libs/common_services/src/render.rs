//! Drawing the submitter's name onto the invitation template.

use ab_glyph::{FontArc, PxScale};
use app_state::InvitationSettings;
use async_trait::async_trait;
use color_eyre::eyre::{Context, Result, eyre};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::filter::gaussian_blur_f32;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, warn};

/// File extension matching the encoding produced by [`TemplateRenderer`].
pub const INVITATION_EXTENSION: &str = "jpg";

/// DejaVu Sans Bold, used when the configured font file does not exist.
static BUNDLED_FONT: &[u8] = include_bytes!("../../../../assets/fonts/DejaVuSans-Bold.ttf");

/// An encoded invitation, ready to be written and attached.
#[derive(Debug, Clone)]
pub struct RenderedInvitation {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait InvitationRenderer: Send + Sync {
    /// Renders the template with `text` overlaid and returns the encoded image.
    async fn render(&self, text: &str) -> Result<RenderedInvitation>;
}

/// How the name is drawn on the template.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font_size: f32,
    pub fill: Rgba<u8>,
    pub shadow: Rgba<u8>,
    pub shadow_blur: f32,
    /// Pixels above the vertical center.
    pub vertical_offset: i32,
    pub jpeg_quality: u8,
}

impl From<&InvitationSettings> for TextStyle {
    fn from(settings: &InvitationSettings) -> Self {
        Self {
            font_size: settings.font_size,
            fill: Rgba(settings.text_color),
            shadow: Rgba(settings.shadow_color),
            shadow_blur: settings.shadow_blur,
            vertical_offset: settings.vertical_offset,
            jpeg_quality: settings.jpeg_quality,
        }
    }
}

/// Renders on top of a template read from disk on every call, so a replaced template is
/// picked up without a restart and a missing one fails each request.
#[derive(Clone)]
pub struct TemplateRenderer {
    template_path: PathBuf,
    font: FontArc,
    style: Arc<TextStyle>,
}

impl TemplateRenderer {
    #[must_use]
    pub fn new(template_path: impl Into<PathBuf>, font: FontArc, style: TextStyle) -> Self {
        Self {
            template_path: template_path.into(),
            font,
            style: Arc::new(style),
        }
    }

    /// Resolves the font from `font_path`. The template itself is only read when rendering.
    pub fn from_settings(settings: &InvitationSettings) -> Result<Self> {
        let font = resolve_font(&settings.font_path)?;
        Ok(Self::new(
            settings.template_path.clone(),
            font,
            TextStyle::from(settings),
        ))
    }
}

pub fn bundled_font() -> Result<FontArc> {
    FontArc::try_from_slice(BUNDLED_FONT).wrap_err("Invalid bundled font")
}

/// Loads the font at `path`, or the bundled one when no file exists there.
/// A file that exists but cannot be parsed is still an error.
pub fn resolve_font(path: &Path) -> Result<FontArc> {
    if path.exists() {
        return load_font(path);
    }
    warn!(
        "Font {} not found, using bundled DejaVu Sans Bold",
        path.display()
    );
    bundled_font()
}

pub fn load_font(path: &Path) -> Result<FontArc> {
    let data =
        std::fs::read(path).wrap_err_with(|| format!("Cannot read font {}", path.display()))?;
    FontArc::try_from_vec(data).wrap_err_with(|| format!("Invalid font {}", path.display()))
}

#[async_trait]
impl InvitationRenderer for TemplateRenderer {
    async fn render(&self, text: &str) -> Result<RenderedInvitation> {
        let renderer = self.clone();
        let text = text.to_owned();

        task::spawn_blocking(move || -> Result<RenderedInvitation> {
            let now = Instant::now();
            let rendered = draw_invitation(
                &renderer.template_path,
                &renderer.font,
                &renderer.style,
                &text,
            )?;
            debug!(
                "Rendered {}x{} invitation in {:.2?}",
                rendered.width,
                rendered.height,
                now.elapsed()
            );
            Ok(rendered)
        })
        .await?
    }
}

/// Decodes the template, draws `text` with its drop shadow and encodes the result as JPEG.
pub fn draw_invitation(
    template_path: &Path,
    font: &FontArc,
    style: &TextStyle,
    text: &str,
) -> Result<RenderedInvitation> {
    let template = ImageReader::open(template_path)
        .wrap_err_with(|| format!("Cannot open template {}", template_path.display()))?
        .with_guessed_format()?
        .decode()
        .wrap_err_with(|| format!("Cannot decode template {}", template_path.display()))?;

    let mut canvas: RgbaImage = template.into_rgba8();
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return Err(eyre!("Template {} is empty", template_path.display()));
    }

    // Center the text box on (width / 2, height / 2 - offset).
    let scale = PxScale::from(style.font_size);
    let (text_w, text_h) = text_size(scale, font, text);
    let x = (width as i32 - text_w as i32) / 2;
    let y = height as i32 / 2 - style.vertical_offset - text_h as i32 / 2;

    if style.shadow[3] > 0 {
        let mut shadow = RgbaImage::new(width, height);
        draw_text_mut(&mut shadow, style.shadow, x, y, scale, font, text);
        if style.shadow_blur > 0. {
            // A canvas-style blur radius is roughly twice the gaussian sigma.
            shadow = gaussian_blur_f32(&shadow, style.shadow_blur / 2.);
        }
        imageops::overlay(&mut canvas, &shadow, 0, 0);
    }
    draw_text_mut(&mut canvas, style.fill, x, y, scale, font, text);

    let rgb = DynamicImage::ImageRgba8(canvas).into_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, style.jpeg_quality)
        .encode_image(&rgb)
        .wrap_err("Cannot encode invitation")?;

    Ok(RenderedInvitation {
        jpeg,
        width,
        height,
    })
}
