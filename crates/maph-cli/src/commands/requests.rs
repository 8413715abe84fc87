use crate::app::App;
use anyhow::Result;
use clap::{Args, Subcommand};
use maph_application::Route;
use maph_application::screens::AccountRequestsScreen;
use maph_core::support::{CompanyField, CreateUserRequestForm, ForgotPasswordForm, RequesterField};

#[derive(Subcommand)]
pub enum RequestAction {
    /// Ask support to create an account
    Account(AccountArgs),
    /// Ask support to reset a forgotten password
    ForgotPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Args)]
pub struct AccountArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_names: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: String,
    /// Registered company name; enables the company block
    #[arg(long)]
    company_name: Option<String>,
    #[arg(long, requires = "company_name")]
    company_id: Option<String>,
    #[arg(long, requires = "company_name")]
    company_phone: Option<String>,
    #[arg(long, requires = "company_name")]
    company_email: Option<String>,
}

impl AccountArgs {
    fn to_form(&self) -> CreateUserRequestForm {
        let mut form = CreateUserRequestForm::default();
        form.set(RequesterField::Id, &self.id);
        form.set(RequesterField::FirstName, &self.first_name);
        form.set(RequesterField::LastNames, &self.last_names);
        form.set(RequesterField::Phone, &self.phone);
        form.set(RequesterField::Email, &self.email);

        if self.company_name.is_some() {
            form.set_has_company(true);
            let company = [
                (CompanyField::Name, &self.company_name),
                (CompanyField::Id, &self.company_id),
                (CompanyField::Phone, &self.company_phone),
                (CompanyField::Email, &self.company_email),
            ];
            for (field, value) in company {
                form.set_company(field, value.as_deref().unwrap_or(""));
            }
        }
        form
    }
}

pub async fn run(app: &App, action: RequestAction) -> Result<()> {
    let screen = AccountRequestsScreen::new(app.resources(), app.config.support_email.clone());

    match action {
        RequestAction::Account(args) => {
            app.shell.navigate(Route::CreateUserRequest).await?;
            screen.request_account(&args.to_form()).await?;
            println!("Request sent. Support will contact you.");
        }
        RequestAction::ForgotPassword { email, reason } => {
            app.shell.navigate(Route::ForgotPassword).await?;
            screen
                .request_password_reset(&ForgotPasswordForm { email, reason })
                .await?;
            println!("Password recovery requested.");
        }
    }
    Ok(())
}
