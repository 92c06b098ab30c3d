//! SMTP implementation of the code sender port

use async_trait::async_trait;
use lettre::{
    message::Mailbox,
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use mg_core::services::verification::CodeSenderTrait;
use mg_shared::config::SmtpConfig;
use mg_shared::utils::email::mask_email;

/// Delivers verification codes through an SMTP relay
#[derive(Clone)]
pub struct SmtpCodeSender {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Mailbox,
}

impl SmtpCodeSender {
    /// Build a sender from SMTP settings
    pub fn new(config: &SmtpConfig) -> Result<Self, anyhow::Error> {
        let sender: Mailbox =
            format!("{} <{}>", config.from_name, config.from_address).parse()?;

        let transport = if config.tls_disabled {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build()
        } else {
            let tls = TlsParameters::new(config.host.clone())?;
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
                .port(config.port)
                .tls(Tls::Required(tls));

            if let (Some(username), Some(password)) = (&config.username, &config.password) {
                builder = builder
                    .credentials(Credentials::new(username.clone(), password.clone()));
            }

            builder.build()
        };

        Ok(Self {
            transport: Arc::new(transport),
            sender,
        })
    }

    fn build_message(&self, to: &str, code: &str) -> Result<Message, String> {
        let body = format!(
            "Your verification code is {}.\n\n\
             The code expires in 15 minutes. If you did not request it, you \
             can ignore this message.\n",
            code
        );

        Message::builder()
            .from(self.sender.clone())
            .to(to.parse().map_err(|e| format!("invalid address: {}", e))?)
            .subject("Your verification code")
            .body(body)
            .map_err(|e| format!("failed to build message: {}", e))
    }
}

#[async_trait]
impl CodeSenderTrait for SmtpCodeSender {
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String> {
        let message = self.build_message(email, code)?;

        self.transport.send(message).await.map_err(|e| {
            error!(
                email = %mask_email(email),
                error = %e,
                "SMTP relay rejected verification message"
            );
            format!("smtp send failed: {}", e)
        })?;

        // The relay does not hand back a stable identifier; mint one for
        // correlating the delivery in logs.
        let message_id = format!("smtp-{}", Uuid::new_v4());
        debug!(
            email = %mask_email(email),
            message_id = %message_id,
            "Handed verification message to SMTP relay"
        );

        Ok(message_id)
    }
}
