use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::student_email::StudentEmail;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

/// A plain-text message ready to be handed to a mail transport.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: StudentEmail,
    pub subject: String,
    pub body: String,
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("The mail relay could not be reached.")]
    Unreachable(#[source] reqwest::Error),
    #[error("The mail relay rejected the message.")]
    Rejected(#[source] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Delivers composed messages. Implementations are shared by every request
/// handler, so they must be safe to use concurrently.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), TransportError>;
}

/// HTTP mail relay client. The sender address is fixed at construction time
/// and the relay is authenticated with an account and secret token pair.
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: StudentEmail,
    account: String,
    auth_token: Secret<String>,
}

#[derive(serde::Serialize)]
struct SendEmailBody {
    personalizations: Vec<RelayPersonalization>,
    from: RelayEmail,
    subject: String,
    content: Vec<RelayContent>,
}

#[derive(serde::Serialize)]
struct RelayEmail {
    email: String,
}

#[derive(serde::Serialize)]
struct RelayPersonalization {
    to: Vec<RelayEmail>,
}

#[derive(serde::Serialize)]
struct RelayContent {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: StudentEmail,
        account: String,
        auth_token: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<EmailClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(EmailClient {
            http_client,
            base_url,
            sender,
            account,
            auth_token,
        })
    }

    #[tracing::instrument(
        name = "Sending an email through the mail relay",
        skip(self, recipient, subject, text_content),
        fields(recipient = %recipient)
    )]
    pub async fn send_email(
        &self,
        recipient: &StudentEmail,
        subject: &str,
        text_content: &str,
    ) -> Result<(), TransportError> {
        let url = format!("{}/mail/send", self.base_url);
        let body = SendEmailBody {
            from: RelayEmail {
                email: String::from(self.sender.as_ref()),
            },
            personalizations: vec![RelayPersonalization {
                to: vec![RelayEmail {
                    email: String::from(recipient.as_ref()),
                }],
            }],
            subject: String::from(subject),
            content: vec![RelayContent {
                content_type: String::from("text/plain"),
                value: String::from(text_content),
            }],
        };

        self.http_client
            .post(&url)
            .basic_auth(&self.account, Some(self.auth_token.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(TransportError::Unreachable)?
            .error_for_status() // return an error when server response status code is 4xx or 5xx
            .map_err(TransportError::Rejected)?;

        Ok(())
    }
}

#[async_trait]
impl MailTransport for EmailClient {
    async fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
        self.send_email(&message.to, &message.subject, &message.body)
            .await
    }
}
