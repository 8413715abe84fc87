//! Navigation shell: the route table and the route stack.

use crate::session_context::SessionContext;
use maph_core::session::Session;
use maph_core::{MaphError, Result};
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tokio::sync::RwLock;

/// Every screen the app can show. The string form is the route name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
pub enum Route {
    #[strum(serialize = "loginScreen")]
    Login,
    #[strum(serialize = "principalScreen")]
    Principal,
    #[strum(serialize = "userProfile")]
    UserProfile,
    #[strum(serialize = "agendaScreen")]
    Agenda,
    #[strum(serialize = "patientScreen")]
    Patients,
    #[strum(serialize = "createPatientScreen")]
    CreatePatient,
    #[strum(serialize = "createConsultationScreen")]
    Consultation,
    #[strum(serialize = "patientFileScreen")]
    Files,
    #[strum(serialize = "reportScreen")]
    Reports,
    #[strum(serialize = "createUserRequestScreen")]
    CreateUserRequest,
    #[strum(serialize = "forgotPasswordScreen")]
    ForgotPassword,
}

impl Route {
    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Principal => "Home",
            Route::UserProfile => "Professional profile",
            Route::Agenda => "Agenda",
            Route::Patients => "Patients",
            Route::CreatePatient => "Patient",
            Route::Consultation => "Consultation",
            Route::Files => "Files",
            Route::Reports => "Reports",
            Route::CreateUserRequest => "Request an account",
            Route::ForgotPassword => "Recover password",
        }
    }

    /// Whether the route needs a signed-in user.
    pub fn requires_auth(self) -> bool {
        !matches!(
            self,
            Route::Login | Route::CreateUserRequest | Route::ForgotPassword
        )
    }

    /// Hidden from dependent staff.
    pub fn is_restricted(self) -> bool {
        matches!(self, Route::Reports | Route::Files)
    }

    /// Routes reachable from the public (signed-out) screens.
    pub fn public() -> impl Iterator<Item = Route> {
        Route::iter().filter(|r| !r.requires_auth())
    }
}

/// Entries of the principal menu, in display order.
const PRINCIPAL_MENU: [Route; 5] = [
    Route::UserProfile,
    Route::Agenda,
    Route::Patients,
    Route::Reports,
    Route::Files,
];

/// Principal menu for `session`. Dependent staff do not see Reports or Files.
pub fn menu_for(session: &Session) -> Vec<Route> {
    PRINCIPAL_MENU
        .into_iter()
        .filter(|route| !(session.is_dependent() && route.is_restricted()))
        .collect()
}

/// Owns the session context and the stack of visited routes.
pub struct NavigationShell {
    context: Arc<SessionContext>,
    stack: RwLock<Vec<Route>>,
}

impl NavigationShell {
    pub fn new(context: Arc<SessionContext>) -> Self {
        Self {
            context,
            stack: RwLock::new(vec![Route::Login]),
        }
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    /// Restores a stored session; lands on `Principal` when one exists.
    pub async fn start(&self) -> Result<Route> {
        let route = match self.context.restore().await? {
            Some(_) => Route::Principal,
            None => Route::Login,
        };
        self.reset(route).await;
        Ok(route)
    }

    pub async fn current(&self) -> Route {
        self.stack
            .read()
            .await
            .last()
            .copied()
            .unwrap_or(Route::Login)
    }

    pub async fn stack(&self) -> Vec<Route> {
        self.stack.read().await.clone()
    }

    /// Pushes `route`. Authenticated routes need a session, and restricted
    /// routes are refused to dependent staff.
    pub async fn navigate(&self, route: Route) -> Result<Route> {
        if route.requires_auth() {
            let session = self.context.require().await?;
            if session.is_dependent() && route.is_restricted() {
                return Err(MaphError::invalid_state(format!(
                    "{} is not available to dependent staff",
                    route.title()
                )));
            }
        }

        self.stack.write().await.push(route);
        tracing::debug!("Navigated to {}", route);
        Ok(route)
    }

    /// Pops the current route, never leaving the stack empty.
    pub async fn back(&self) -> Route {
        let mut stack = self.stack.write().await;
        if stack.len() > 1 {
            stack.pop();
        }
        stack.last().copied().unwrap_or(Route::Login)
    }

    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Session> {
        let session = self.context.login(identifier, secret).await?;
        self.reset(Route::Principal).await;
        Ok(session)
    }

    pub async fn logout(&self) -> Result<()> {
        self.context.logout().await?;
        self.reset(Route::Login).await;
        Ok(())
    }

    pub async fn principal_menu(&self) -> Result<Vec<Route>> {
        Ok(menu_for(&self.context.require().await?))
    }

    async fn reset(&self, root: Route) {
        let mut stack = self.stack.write().await;
        stack.clear();
        stack.push(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maph_core::session::SessionUser;

    fn session(role: Option<&str>) -> Session {
        Session::new(
            SessionUser {
                user_id: "101".into(),
                company_id: "7".into(),
                first_name: "Ana".into(),
                last_names: "Mora".into(),
                role: role.map(str::to_string),
                phone: None,
                email: None,
            },
            "token",
        )
    }

    #[test]
    fn test_route_names() {
        assert_eq!(Route::Agenda.as_ref(), "agendaScreen");
        assert_eq!("createConsultationScreen".parse::<Route>().unwrap(), Route::Consultation);
        assert_eq!(Route::public().count(), 3);
    }

    #[test]
    fn test_dependent_menu_hides_reports_and_files() {
        let menu = menu_for(&session(Some(" d ")));
        assert_eq!(menu, vec![Route::UserProfile, Route::Agenda, Route::Patients]);

        let full = menu_for(&session(Some("A")));
        assert!(full.contains(&Route::Reports));
        assert!(full.contains(&Route::Files));
        assert_eq!(menu_for(&session(None)).len(), 5);
    }
}
