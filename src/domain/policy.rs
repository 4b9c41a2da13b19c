//! Access policy for identity operations.
//!
//! A static table, decoupled from any transport. The transport layer only
//! supplies two facts: whether the request is authenticated, and as whom.

use uuid::Uuid;

use crate::errors::{IdentityError, IdentityResult};

/// Who is making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Authenticated { id: Uuid, is_admin: bool },
}

impl Viewer {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Viewer::Authenticated { .. })
    }

    /// True when the viewer is the identity itself or an administrator.
    pub fn is_self_or_admin(&self, target: Uuid) -> bool {
        match self {
            Viewer::Anonymous => false,
            Viewer::Authenticated { id, is_admin } => *is_admin || *id == target,
        }
    }
}

/// Identity operations subject to the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a new identity (open to anyone)
    Register,
    /// List all identities
    List,
    /// Retrieve a single identity
    Retrieve(Uuid),
    /// Update a single identity
    Update(Uuid),
    /// Deactivate a single identity
    Deactivate(Uuid),
    /// View the caller's own profile
    ViewOwnProfile,
}

/// Apply the policy table.
///
/// | Action                | Required state                              |
/// |-----------------------|---------------------------------------------|
/// | Register              | none (open)                                 |
/// | List                  | authenticated                               |
/// | Retrieve              | authenticated                               |
/// | Update / Deactivate   | authenticated, and (is self OR is admin)    |
/// | ViewOwnProfile        | authenticated                               |
///
/// `Unauthorized` for unauthenticated viewers, `Forbidden` for an
/// authenticated viewer acting on someone else without admin rights.
pub fn authorize(action: Action, viewer: Viewer) -> IdentityResult<()> {
    match action {
        Action::Register => Ok(()),
        Action::List | Action::Retrieve(_) | Action::ViewOwnProfile => {
            if viewer.is_authenticated() {
                Ok(())
            } else {
                Err(IdentityError::Unauthorized)
            }
        }
        Action::Update(target) | Action::Deactivate(target) => {
            if !viewer.is_authenticated() {
                Err(IdentityError::Unauthorized)
            } else if viewer.is_self_or_admin(target) {
                Ok(())
            } else {
                Err(IdentityError::Forbidden)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: Uuid) -> Viewer {
        Viewer::Authenticated {
            id,
            is_admin: false,
        }
    }

    fn admin() -> Viewer {
        Viewer::Authenticated {
            id: Uuid::new_v4(),
            is_admin: true,
        }
    }

    #[test]
    fn register_is_open_to_anyone() {
        assert!(authorize(Action::Register, Viewer::Anonymous).is_ok());
        assert!(authorize(Action::Register, user(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn list_requires_authentication() {
        assert!(matches!(
            authorize(Action::List, Viewer::Anonymous),
            Err(IdentityError::Unauthorized)
        ));
        assert!(authorize(Action::List, user(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn update_requires_self_or_admin() {
        let target = Uuid::new_v4();

        assert!(matches!(
            authorize(Action::Update(target), Viewer::Anonymous),
            Err(IdentityError::Unauthorized)
        ));
        assert!(matches!(
            authorize(Action::Update(target), user(Uuid::new_v4())),
            Err(IdentityError::Forbidden)
        ));
        assert!(authorize(Action::Update(target), user(target)).is_ok());
        assert!(authorize(Action::Update(target), admin()).is_ok());
    }

    #[test]
    fn deactivate_follows_update_rules() {
        let target = Uuid::new_v4();
        assert!(matches!(
            authorize(Action::Deactivate(target), user(Uuid::new_v4())),
            Err(IdentityError::Forbidden)
        ));
        assert!(authorize(Action::Deactivate(target), admin()).is_ok());
    }

    #[test]
    fn own_profile_requires_authentication() {
        assert!(matches!(
            authorize(Action::ViewOwnProfile, Viewer::Anonymous),
            Err(IdentityError::Unauthorized)
        ));
        assert!(authorize(Action::ViewOwnProfile, user(Uuid::new_v4())).is_ok());
    }
}
