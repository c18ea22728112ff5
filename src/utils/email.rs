use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument};

use crate::config::email::EmailConfig;
use crate::metrics;
use formation_core::AppError;

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Credentials email sent when a student account is created.
    #[instrument(skip(self, password))]
    pub async fn send_welcome_email(
        &self,
        to_email: &str,
        to_name: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let text_body = format!(
            "Bonjour {},\n\n\
             Votre espace stagiaire est ouvert.\n\n\
             Identifiant : {}\n\
             Mot de passe provisoire : {}\n\n\
             Connectez-vous sur {} et changez votre mot de passe dès la première connexion.\n\n\
             L'équipe {}",
            to_name, to_email, password, self.config.frontend_url, self.config.from_name
        );
        let html_body = self.layout(
            "Bienvenue",
            &format!(
                "<p>Bonjour <strong>{}</strong>,</p>\
                 <p>Votre espace stagiaire est ouvert.</p>\
                 <p>Identifiant : <strong>{}</strong><br>\
                 Mot de passe provisoire : <strong>{}</strong></p>\
                 <p>Connectez-vous sur <a href=\"{}\">{}</a> et changez votre mot de passe \
                 dès la première connexion.</p>",
                to_name, to_email, password, self.config.frontend_url, self.config.frontend_url
            ),
        );

        self.send_email("welcome", to_email, "Bienvenue", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, reset_token))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        reset_token: &str,
    ) -> Result<(), AppError> {
        let reset_link = format!(
            "{}/reset-password?token={}",
            self.config.frontend_url, reset_token
        );

        let text_body = format!(
            "Bonjour {},\n\n\
             Vous avez demandé la réinitialisation de votre mot de passe.\n\n\
             Suivez ce lien pour en choisir un nouveau :\n{}\n\n\
             Si vous n'êtes pas à l'origine de cette demande, ignorez ce message.\n\n\
             L'équipe {}",
            to_name, reset_link, self.config.from_name
        );
        let html_body = self.layout(
            "Réinitialisation du mot de passe",
            &format!(
                "<p>Bonjour <strong>{}</strong>,</p>\
                 <p>Vous avez demandé la réinitialisation de votre mot de passe.</p>\
                 <p><a href=\"{}\">Choisir un nouveau mot de passe</a></p>\
                 <p>Si vous n'êtes pas à l'origine de cette demande, ignorez ce message.</p>",
                to_name, reset_link
            ),
        );

        self.send_email(
            "password_reset",
            to_email,
            "Réinitialisation de votre mot de passe",
            &text_body,
            &html_body,
        )
        .await
    }

    #[instrument(skip(self, verification_token))]
    pub async fn send_verification_email(
        &self,
        to_email: &str,
        to_name: &str,
        verification_token: &str,
    ) -> Result<(), AppError> {
        let verify_link = format!(
            "{}/verify-email?token={}",
            self.config.frontend_url, verification_token
        );

        let text_body = format!(
            "Bonjour {},\n\n\
             Merci de confirmer votre adresse e-mail en suivant ce lien :\n{}\n\n\
             L'équipe {}",
            to_name, verify_link, self.config.from_name
        );
        let html_body = self.layout(
            "Confirmation de votre adresse e-mail",
            &format!(
                "<p>Bonjour <strong>{}</strong>,</p>\
                 <p>Merci de confirmer votre adresse e-mail :</p>\
                 <p><a href=\"{}\">Confirmer mon adresse</a></p>",
                to_name, verify_link
            ),
        );

        self.send_email(
            "email_verification",
            to_email,
            "Confirmez votre adresse e-mail",
            &text_body,
            &html_body,
        )
        .await
    }

    /// Plain notification to the configured admin address. A no-op when no
    /// `ADMIN_EMAIL` is configured.
    #[instrument(skip(self, body))]
    pub async fn send_admin_notification(&self, subject: &str, body: &str) -> Result<(), AppError> {
        let Some(admin_email) = self.config.admin_email.clone() else {
            info!("No ADMIN_EMAIL configured, skipping admin notification");
            return Ok(());
        };

        let html_body = self.layout(subject, &format!("<p>{}</p>", body));
        self.send_email("admin_notification", &admin_email, subject, body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        kind: &str,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            info!(kind, to = to_email, "SMTP disabled, skipping email");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(from.parse().map_err(|e| {
                AppError::internal(anyhow::anyhow!("Invalid from email: {}", e))
            })?)
            .to(to_email.parse().map_err(|e| {
                AppError::internal(anyhow::anyhow!("Invalid to email: {}", e))
            })?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Task join error: {}", e)))?;

        match result {
            Ok(_) => {
                metrics::track_email_sent(kind, true);
                Ok(())
            }
            Err(e) => {
                metrics::track_email_sent(kind, false);
                Err(AppError::internal(anyhow::anyhow!(
                    "Failed to send email: {}",
                    e
                )))
            }
        }
    }

    fn layout(&self, title: &str, body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; overflow: hidden;">
                    <tr>
                        <td style="background-color: #1D4ED8; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 28px;">{from_name}</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px; color: #333333; font-size: 16px; line-height: 1.5;">
                            <h2 style="margin: 0 0 20px 0; font-size: 24px;">{title}</h2>
                            {body}
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 20px 30px; text-align: center; border-top: 1px solid #e9ecef;">
                            <p style="margin: 0; color: #999999; font-size: 12px;">
                                Message automatique de {from_name}. Merci de ne pas répondre.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
            title = title,
            body = body,
            from_name = self.config.from_name
        )
    }
}
