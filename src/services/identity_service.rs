//! Identity service - read and update operations over registered identities.
//!
//! Every operation is gated by the access policy table before touching the
//! repository. Display serialization always goes through [`IdentityView`],
//! which never carries credential material.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{authorize, Action, IdentityView, ProfileUpdate, UserIdentity, Viewer};
use crate::errors::{IdentityError, IdentityResult, OptionExt};
use crate::infra::IdentityRepository;
use crate::types::{Page, PaginationParams};

/// Serialize an identity for display.
///
/// Never contains `password_hash` or `password_confirm`. The identity's
/// owner and administrators additionally see the status flags and
/// `updated_at`; everyone else gets the public field set.
pub fn serialize_for_display(identity: &UserIdentity, viewer_is_self_or_admin: bool) -> IdentityView {
    if viewer_is_self_or_admin {
        IdentityView::privileged(identity)
    } else {
        IdentityView::public(identity)
    }
}

/// Identity read/update operations.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Retrieve one identity (authenticated viewers only)
    async fn get_identity(&self, viewer: Viewer, id: Uuid) -> IdentityResult<IdentityView>;

    /// List identities, paginated (authenticated viewers only)
    async fn list_identities(
        &self,
        viewer: Viewer,
        params: PaginationParams,
    ) -> IdentityResult<Page<IdentityView>>;

    /// Update name fields (self or admin)
    async fn update_profile(
        &self,
        viewer: Viewer,
        id: Uuid,
        update: ProfileUpdate,
    ) -> IdentityResult<IdentityView>;

    /// Set staff/superuser flags (admin only)
    async fn set_role_flags(
        &self,
        viewer: Viewer,
        id: Uuid,
        is_staff: bool,
        is_superuser: bool,
    ) -> IdentityResult<IdentityView>;

    /// Deactivate an identity (self or admin); identities are never hard-deleted
    async fn deactivate(&self, viewer: Viewer, id: Uuid) -> IdentityResult<()>;

    /// The caller's own profile
    async fn view_own_profile(&self, viewer: Viewer) -> IdentityResult<IdentityView>;

    /// Mark an identity verified. Called by the external verification
    /// workflow, which authenticates out of band.
    async fn mark_verified(&self, id: Uuid) -> IdentityResult<IdentityView>;
}

/// Concrete implementation backed by an explicit repository.
pub struct IdentityManager {
    repo: Arc<dyn IdentityRepository>,
}

impl IdentityManager {
    pub fn new(repo: Arc<dyn IdentityRepository>) -> Self {
        Self { repo }
    }

    async fn load(&self, id: Uuid) -> IdentityResult<UserIdentity> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }
}

#[async_trait]
impl IdentityService for IdentityManager {
    async fn get_identity(&self, viewer: Viewer, id: Uuid) -> IdentityResult<IdentityView> {
        authorize(Action::Retrieve(id), viewer)?;
        let identity = self.load(id).await?;
        Ok(serialize_for_display(
            &identity,
            viewer.is_self_or_admin(id),
        ))
    }

    async fn list_identities(
        &self,
        viewer: Viewer,
        params: PaginationParams,
    ) -> IdentityResult<Page<IdentityView>> {
        authorize(Action::List, viewer)?;

        let identities = self.repo.list(params.offset(), params.limit()).await?;
        let total = self.repo.count().await?;

        let views = identities
            .iter()
            .map(|identity| serialize_for_display(identity, viewer.is_self_or_admin(identity.id)))
            .collect();

        Ok(Page::new(views, &params, total))
    }

    async fn update_profile(
        &self,
        viewer: Viewer,
        id: Uuid,
        update: ProfileUpdate,
    ) -> IdentityResult<IdentityView> {
        authorize(Action::Update(id), viewer)?;
        update
            .validate()
            .map_err(|e| IdentityError::validation(e.to_string()))?;

        let mut identity = self.load(id).await?;
        let first = update.first_name.unwrap_or_else(|| identity.first_name.clone());
        let last = update.last_name.unwrap_or_else(|| identity.last_name.clone());
        identity.update_name(first, last);

        let saved = self.repo.update(identity).await?;
        Ok(serialize_for_display(&saved, true))
    }

    async fn set_role_flags(
        &self,
        viewer: Viewer,
        id: Uuid,
        is_staff: bool,
        is_superuser: bool,
    ) -> IdentityResult<IdentityView> {
        // Role escalation is admin-only; being the owner is not enough.
        match viewer {
            Viewer::Anonymous => return Err(IdentityError::Unauthorized),
            Viewer::Authenticated { is_admin: false, .. } => {
                return Err(IdentityError::Forbidden)
            }
            Viewer::Authenticated { is_admin: true, .. } => {}
        }

        let mut identity = self.load(id).await?;
        identity.set_role_flags(is_staff, is_superuser);
        let saved = self.repo.update(identity).await?;
        Ok(serialize_for_display(&saved, true))
    }

    async fn deactivate(&self, viewer: Viewer, id: Uuid) -> IdentityResult<()> {
        authorize(Action::Deactivate(id), viewer)?;

        let mut identity = self.load(id).await?;
        identity.deactivate();
        self.repo.update(identity).await?;
        tracing::info!(id = %id, "identity deactivated");
        Ok(())
    }

    async fn view_own_profile(&self, viewer: Viewer) -> IdentityResult<IdentityView> {
        authorize(Action::ViewOwnProfile, viewer)?;
        let id = match viewer {
            Viewer::Authenticated { id, .. } => id,
            // Unreachable after the policy check; kept explicit
            Viewer::Anonymous => return Err(IdentityError::Unauthorized),
        };

        let identity = self.load(id).await?;
        Ok(serialize_for_display(&identity, true))
    }

    async fn mark_verified(&self, id: Uuid) -> IdentityResult<IdentityView> {
        let mut identity = self.load(id).await?;
        identity.mark_verified();
        let saved = self.repo.update(identity).await?;
        Ok(serialize_for_display(&saved, true))
    }
}
