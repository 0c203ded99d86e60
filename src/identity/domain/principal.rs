//! Authenticated principal and its capability checks.

use super::{Role, UserId};
use serde::{Deserialize, Serialize};

/// Verified identity attached to a request.
///
/// Authorization decisions are expressed as capability methods so callers
/// ask "may this principal do X" rather than branching on [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    user_id: UserId,
    role: Role,
    company_name: Option<String>,
}

impl Principal {
    /// Creates a principal without company affiliation.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            role,
            company_name: None,
        }
    }

    /// Sets the company the principal belongs to.
    ///
    /// Blank names are ignored.
    #[must_use]
    pub fn with_company(mut self, company_name: impl Into<String>) -> Self {
        let name = company_name.into();
        let trimmed = name.trim();
        self.company_name = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the principal's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the company name, if any.
    #[must_use]
    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    /// Returns `true` for platform administrators.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Returns `true` when the principal is the given user.
    #[must_use]
    pub fn acts_for(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Returns `true` when the principal may apply to jobs and pay fees.
    #[must_use]
    pub const fn can_apply_to_jobs(&self) -> bool {
        matches!(self.role, Role::JobSeeker)
    }

    /// Returns `true` when the principal may post new jobs.
    #[must_use]
    pub const fn can_post_jobs(&self) -> bool {
        matches!(self.role, Role::Employee | Role::Admin)
    }

    /// Returns `true` when the principal may mutate, delete, or review
    /// applications for a job posted by `poster`.
    ///
    /// Administrators are always allowed; employees only for their own
    /// postings.
    #[must_use]
    pub fn can_manage_job(&self, poster: UserId) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Employee => self.user_id == poster,
            Role::JobSeeker => false,
        }
    }

    /// Returns `true` when the principal may audit platform-wide activity.
    #[must_use]
    pub const fn can_audit(&self) -> bool {
        self.is_admin()
    }
}
