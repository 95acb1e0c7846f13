use async_trait::async_trait;

pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub base64_content: String,
}

pub struct SendEmailRequest {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub attachment: Attachment,
}

/// Interpreted result of a send, per the provider's numeric result code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent { message_id: String },
    InvalidRecipient,
    RecipientDeactivated,
    Rejected { provider_message: String },
    Other { code: u16 },
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail gateway request failed: {0}")]
    Request(String),
}

/// External transactional mail gateway: sends attachments and reports a
/// provider-specific numeric result code, and can reactivate a recipient
/// that previously bounced.
#[async_trait]
pub trait MailGateway: Send + Sync {
    async fn send(&self, request: SendEmailRequest) -> Result<SendOutcome, MailError>;

    /// `can_activate` mirrors the provider's own flag on the bounce payload:
    /// some bounce reasons (e.g. hard spam complaints) are not recipient-activatable,
    /// in which case this is a no-op.
    async fn reactivate(&self, email: &str, can_activate: bool) -> Result<(), MailError>;
}

/// Default HTTP-backed implementation shaped like a Postmark-style JSON API.
pub struct HttpMailGateway {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpMailGateway {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl MailGateway for HttpMailGateway {
    async fn send(&self, request: SendEmailRequest) -> Result<SendOutcome, MailError> {
        let body = serde_json::json!({
            "From": request.from,
            "To": request.to,
            "Subject": request.subject,
            "TextBody": request.text_body,
            "Attachments": [{
                "Name": request.attachment.filename,
                "Content": request.attachment.base64_content,
                "ContentType": request.attachment.content_type,
            }],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Postmark-Server-Token", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|err| MailError::Request(err.to_string()))?;

        let parsed: ProviderResponse = response
            .json()
            .await
            .map_err(|err| MailError::Request(err.to_string()))?;

        Ok(match parsed.error_code {
            0 => SendOutcome::Sent {
                message_id: parsed.message_id.unwrap_or_default(),
            },
            300 => SendOutcome::InvalidRecipient,
            406 => SendOutcome::RecipientDeactivated,
            422 => SendOutcome::Rejected {
                provider_message: parsed.message.unwrap_or_default(),
            },
            other => SendOutcome::Other { code: other },
        })
    }

    async fn reactivate(&self, email: &str, can_activate: bool) -> Result<(), MailError> {
        if !can_activate {
            return Ok(());
        }
        self.client
            .post(format!("{}/{email}/reactivate", self.endpoint))
            .header("X-Postmark-Server-Token", &self.token)
            .send()
            .await
            .map_err(|err| MailError::Request(err.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, serde::Deserialize)]
struct ProviderResponse {
    #[serde(rename = "ErrorCode")]
    error_code: u16,
    #[serde(rename = "MessageID", default)]
    message_id: Option<String>,
    #[serde(rename = "Message", default)]
    message: Option<String>,
}
