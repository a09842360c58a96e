//! Composition and delivery of the invitation email.

use crate::api::invitation::interfaces::Submission;
use crate::storage::StoredInvitation;
use app_state::{MailSettings, SecretSettings};
use async_trait::async_trait;
use color_eyre::eyre::{Context, Result};
use handlebars::Handlebars;
use lettre::message::header::{ContentDisposition, ContentId, ContentType};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;
use tracing::debug;

const INVITATION_TEMPLATE_NAME: &str = "invitation_email";

const INVITATION_TEMPLATE: &str = r#"
<h2>Ciao {{full_name}} 🎉</h2>
<p>Ecco il tuo invito personalizzato per l’evento <b>{{event_name}}</b>!</p>
<p>Puoi scaricarlo o mostrarlo all’ingresso dell’evento.</p>
<br>
<img src="cid:{{content_id}}" alt="Invito {{event_name}}" style="max-width:100%; border-radius:12px;" />
<br><br>
<p>📅 Ti aspettiamo all’evento!<br>Grazie per esserti registrato 🙌</p>
"#;

#[async_trait]
pub trait InvitationMailer: Send + Sync {
    async fn send(&self, message: Message) -> Result<()>;
}

/// Pooled SMTP client. Clones share the pool, so concurrent sends are fine.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builds the transport without connecting. Bad credentials only show up on the first send.
    pub fn from_settings(mail: &MailSettings, secrets: &SecretSettings) -> Result<Self> {
        let builder = if mail.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&mail.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&mail.smtp_host)
        };
        let builder =
            builder.wrap_err_with(|| format!("Invalid SMTP host {}", mail.smtp_host))?;

        let transport = builder
            .port(mail.smtp_port)
            .credentials(Credentials::new(
                secrets.email_user.clone(),
                secrets.email_pass.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl InvitationMailer for SmtpMailer {
    async fn send(&self, message: Message) -> Result<()> {
        let response = self
            .transport
            .send(message)
            .await
            .wrap_err("SMTP delivery failed")?;
        debug!("SMTP response: {:?}", response.code());
        Ok(())
    }
}

/// Builds the invitation email: HTML greeting with the image inline, plus the same image
/// as a downloadable attachment. Both parts share one content id.
pub struct InvitationComposer {
    sender_name: String,
    sender_address: String,
    event_name: String,
    subject: String,
    content_id: String,
    templates: Handlebars<'static>,
}

impl InvitationComposer {
    pub fn new(
        sender_name: impl Into<String>,
        sender_address: impl Into<String>,
        event_name: impl Into<String>,
        subject: impl Into<String>,
        content_id: impl Into<String>,
    ) -> Result<Self> {
        let mut templates = Handlebars::new();
        templates.set_strict_mode(true);
        templates
            .register_template_string(INVITATION_TEMPLATE_NAME, INVITATION_TEMPLATE)
            .wrap_err("Invalid invitation email template")?;

        Ok(Self {
            sender_name: sender_name.into(),
            sender_address: sender_address.into(),
            event_name: event_name.into(),
            subject: subject.into(),
            content_id: content_id.into(),
            templates,
        })
    }

    pub fn from_settings(mail: &MailSettings, secrets: &SecretSettings) -> Result<Self> {
        Self::new(
            mail.sender_name.clone(),
            secrets.email_user.clone(),
            mail.event_name.clone(),
            mail.subject.clone(),
            mail.content_id.clone(),
        )
    }

    /// HTML body greeting the submitter. Names are HTML-escaped.
    pub fn render_body(&self, submission: &Submission) -> Result<String> {
        self.templates
            .render(
                INVITATION_TEMPLATE_NAME,
                &json!({
                    "full_name": submission.full_name(),
                    "event_name": self.event_name,
                    "content_id": self.content_id,
                }),
            )
            .wrap_err("Cannot render invitation email body")
    }

    /// The sender and recipient addresses are parsed here, so a bad account or
    /// recipient fails the delivery stage rather than validation.
    pub fn compose(
        &self,
        submission: &Submission,
        stored: &StoredInvitation,
        jpeg: Vec<u8>,
    ) -> Result<Message> {
        let sender = Mailbox::new(
            Some(self.sender_name.clone()),
            self.sender_address
                .parse()
                .wrap_err_with(|| format!("Invalid sender address {:?}", self.sender_address))?,
        );
        let recipient: Mailbox = submission
            .email
            .parse()
            .wrap_err_with(|| format!("Invalid recipient address {:?}", submission.email))?;

        let html = self.render_body(submission)?;
        let content_type = ContentType::parse("image/jpeg")?;
        let content_id = ContentId::from(format!("<{}>", self.content_id));

        let inline = SinglePart::builder()
            .header(content_type.clone())
            .header(ContentDisposition::inline_with_name(&stored.file_name))
            .header(content_id.clone())
            .body(jpeg.clone());
        let attachment = SinglePart::builder()
            .header(content_type)
            .header(ContentDisposition::attachment(&stored.file_name))
            .header(content_id)
            .body(jpeg);

        Message::builder()
            .from(sender)
            .to(recipient)
            .subject(self.subject.clone())
            .multipart(
                MultiPart::mixed()
                    .multipart(
                        MultiPart::related()
                            .singlepart(SinglePart::html(html))
                            .singlepart(inline),
                    )
                    .singlepart(attachment),
            )
            .wrap_err("Cannot build invitation email")
    }
}
