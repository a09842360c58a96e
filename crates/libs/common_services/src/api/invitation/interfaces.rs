use crate::api::invitation::error::InvitationError;
use crate::storage::StoredInvitation;
use serde::Deserialize;
use utoipa::ToSchema;

/// Registration form as submitted, either JSON or url-encoded.
///
/// Every field is optional on the wire so a missing one surfaces as a validation
/// error instead of a deserialization rejection.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct SubmissionPayload {
    /// First name.
    #[serde(default)]
    pub nome: Option<String>,
    /// Last name.
    #[serde(default)]
    pub cognome: Option<String>,
    /// Recipient address. Only checked for presence.
    #[serde(default)]
    pub email: Option<String>,
}

/// A validated submission, all fields trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Submission {
    /// Trims every field and rejects the payload if any of them ends up empty.
    pub fn parse(payload: SubmissionPayload) -> Result<Self, InvitationError> {
        let mut missing = Vec::new();
        let mut take = |value: Option<String>, name: &'static str| {
            let value = value.map(|v| v.trim().to_owned()).unwrap_or_default();
            if value.is_empty() {
                missing.push(name);
            }
            value
        };

        let first_name = take(payload.nome, "nome");
        let last_name = take(payload.cognome, "cognome");
        let email = take(payload.email, "email");

        if !missing.is_empty() {
            return Err(InvitationError::MissingFields(missing));
        }

        Ok(Self {
            first_name,
            last_name,
            email,
        })
    }

    /// Text drawn on the invitation and used in the greeting.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// `{first}_{last}.{extension}` with every whitespace run collapsed to `_`.
    ///
    /// Path separators are replaced as well so the name always stays inside the output folder.
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        let stem = format!("{}_{}", self.first_name, self.last_name)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .replace(['/', '\\'], "_");
        format!("{stem}.{extension}")
    }
}

/// Outcome of a submission that went through every stage.
#[derive(Debug, Clone)]
pub struct InvitationReceipt {
    pub stored: StoredInvitation,
    pub recipient: String,
}
