//! Pre-login support requests: new account and password recovery.

use crate::guard::SubmitGuard;
use maph_core::resource::{Resource, ResourceClient};
use maph_core::support::{CreateUserRequestForm, ForgotPasswordForm, SupportMail};
use maph_core::{MaphError, Result};
use std::sync::Arc;

pub struct AccountRequestsScreen {
    client: Arc<dyn ResourceClient>,
    support_email: String,
    guard: SubmitGuard,
}

impl AccountRequestsScreen {
    pub fn new(client: Arc<dyn ResourceClient>, support_email: impl Into<String>) -> Self {
        Self {
            client,
            support_email: support_email.into(),
            guard: SubmitGuard::new(),
        }
    }

    /// Mails the account request to the support mailbox.
    pub async fn request_account(&self, form: &CreateUserRequestForm) -> Result<()> {
        let _ticket = self.guard.try_begin()?;
        let mail = form.to_mail(&self.support_email)?;
        self.send(Resource::CreateUserMail, &mail).await?;
        tracing::info!("Account request sent for {}", form.id.trim());
        Ok(())
    }

    pub async fn request_password_reset(&self, form: &ForgotPasswordForm) -> Result<()> {
        let _ticket = self.guard.try_begin()?;
        let mail = form.to_mail()?;
        self.send(Resource::ForgotPasswordMail, &mail).await?;
        tracing::info!("Password recovery requested");
        Ok(())
    }

    async fn send(&self, resource: Resource, mail: &SupportMail) -> Result<()> {
        self.client
            .create(resource, serde_json::to_value(mail)?)
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::error!("Support request to {} failed: {}", resource.path(), e);
                MaphError::create(&e, "Could not send the request.")
            })
    }
}
