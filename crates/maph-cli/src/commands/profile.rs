use crate::app::App;
use anyhow::Result;
use clap::Subcommand;
use maph_application::Route;
use maph_application::screens::ProfileScreen;
use maph_core::user::ProfileField;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the signed-in professional's profile
    Show,
    /// Update the profile; omitted fields keep their value
    Edit {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_names: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

pub async fn run(app: &App, action: ProfileAction) -> Result<()> {
    app.open(Route::UserProfile).await?;
    let screen = ProfileScreen::open(app.resources(), app.context().clone()).await?;

    match action {
        ProfileAction::Show => {
            let form = screen.form().await;
            println!("{} {}", form.first_name, form.last_names);
            super::field("Phone", &form.phone);
            super::field("Email", &form.email);
        }
        ProfileAction::Edit {
            first_name,
            last_names,
            phone,
            email,
        } => {
            screen.toggle_edit().await?;
            let changes = [
                (ProfileField::FirstName, first_name),
                (ProfileField::LastNames, last_names),
                (ProfileField::Phone, phone),
                (ProfileField::Email, email),
            ];
            for (field, value) in changes {
                if let Some(value) = value {
                    screen.set_field(field, &value).await;
                }
            }
            let session = screen.accept().await?;
            println!("Profile updated for {}.", session.display_name());
        }
    }
    Ok(())
}
