//! Profile screen for the signed-in user.

use crate::guard::SubmitGuard;
use crate::session_context::SessionContext;
use maph_core::resource::{Resource, ResourceClient};
use maph_core::session::Session;
use maph_core::user::{ProfileField, ProfileForm};
use maph_core::{MaphError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
struct ProfileState {
    editing: bool,
    form: ProfileForm,
}

pub struct ProfileScreen {
    client: Arc<dyn ResourceClient>,
    context: Arc<SessionContext>,
    state: RwLock<ProfileState>,
    guard: SubmitGuard,
}

impl ProfileScreen {
    /// Fails with `NotAuthenticated` when nobody is signed in.
    pub async fn open(client: Arc<dyn ResourceClient>, context: Arc<SessionContext>) -> Result<Self> {
        let session = context.require().await?;
        Ok(Self {
            client,
            context,
            state: RwLock::new(ProfileState {
                editing: false,
                form: ProfileForm::from_user(&session.user),
            }),
            guard: SubmitGuard::new(),
        })
    }

    pub async fn is_editing(&self) -> bool {
        self.state.read().await.editing
    }

    pub async fn form(&self) -> ProfileForm {
        self.state.read().await.form.clone()
    }

    /// Enters or leaves edit mode. Leaving discards unsaved changes.
    pub async fn toggle_edit(&self) -> Result<bool> {
        let session = self.context.require().await?;
        let mut state = self.state.write().await;
        state.editing = !state.editing;
        if !state.editing {
            state.form = ProfileForm::from_user(&session.user);
        }
        Ok(state.editing)
    }

    /// Ignored unless editing.
    pub async fn set_field(&self, field: ProfileField, value: &str) -> bool {
        let mut state = self.state.write().await;
        if !state.editing {
            return false;
        }
        state.form.set(field, value);
        true
    }

    /// Sends the profile to `PATCH /user` and updates the session on success.
    pub async fn accept(&self) -> Result<Session> {
        let _ticket = self.guard.try_begin()?;
        let current = self.context.require().await?;

        let updated = {
            let state = self.state.read().await;
            if !state.editing {
                return Err(MaphError::invalid_state("the profile is not being edited"));
            }
            state.form.apply_to(&current.user)?
        };

        self.client
            .update(Resource::Users, None, serde_json::to_value(&updated)?)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update profile {}: {}", updated.user_id, e);
                MaphError::update(&e, "Could not update the profile.")
            })?;

        let session = self.context.replace_user(updated).await?;
        tracing::info!("Profile {} updated", session.user_id());

        let mut state = self.state.write().await;
        state.editing = false;
        state.form = ProfileForm::from_user(&session.user);
        Ok(session)
    }
}
