use crate::app::App;
use anyhow::Result;
use maph_application::Route;

pub async fn login(app: &App, id: &str, password: &str) -> Result<()> {
    let session = app.shell.login(id, password).await?;
    println!(
        "Signed in as {} ({})",
        session.display_name(),
        session.user_id()
    );
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.shell.logout().await?;
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    match app.context().current().await {
        Some(session) => {
            println!("{}", session.display_name());
            super::field("Id", session.user_id());
            super::field("Company", session.company_id());
            super::field("Role", session.role().unwrap_or(""));
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

/// Lists the principal menu, or the public screens when signed out.
pub async fn menu(app: &App) -> Result<()> {
    let routes: Vec<Route> = match app.context().current().await {
        Some(_) => app.shell.principal_menu().await?,
        None => Route::public().collect(),
    };
    for route in routes {
        println!("  {:<24} {}", route.as_ref(), route.title());
    }
    Ok(())
}
