//! User account domain service.
//!
//! Implements the driving ports for registration, civic-id lookup, and role
//! updates. Role updates are the first onboarding step; the richer stepped
//! flow lives in the onboarding service.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::UserRepository;
use crate::domain::service_support::{map_user_repo_error, resolve_user};
use crate::domain::{CivicId, EmailAddress, Error, PersonaName, User, UserRole};

/// Request payload for registering a user.
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    /// External identity-provider identifier.
    pub civic_id: CivicId,
    /// Contact email address.
    pub email: EmailAddress,
    /// Display name.
    pub name: PersonaName,
    /// Roles the user starts with (may be empty before onboarding).
    pub active_roles: Vec<UserRole>,
}

/// Driving port for account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new user under a civic id.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Replace the active role set of an existing user.
    async fn update_roles(&self, civic_id: &CivicId, roles: Vec<UserRole>)
    -> Result<User, Error>;
}

/// Driving port for account lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Fetch a user by civic id.
    async fn fetch_user(&self, civic_id: &CivicId) -> Result<User, Error>;
}

/// Account service implementing the driving ports.
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
}

impl<U> AccountService<U> {
    /// Create a new service over a user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> AccountCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let user = User::new(
            Uuid::new_v4(),
            request.civic_id,
            request.email,
            request.name,
            request.active_roles,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.users
            .insert(&user)
            .await
            .map_err(map_user_repo_error)?;
        Ok(user)
    }

    async fn update_roles(
        &self,
        civic_id: &CivicId,
        roles: Vec<UserRole>,
    ) -> Result<User, Error> {
        let user = resolve_user(self.users.as_ref(), civic_id).await?;
        // Validates the new role set (no duplicates) without persisting.
        let validated = user
            .with_roles(roles)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.users
            .update_roles(civic_id, validated.active_roles())
            .await
            .map_err(map_user_repo_error)?
            .ok_or_else(|| Error::not_found(format!("user '{civic_id}' not found")))
    }
}

#[async_trait]
impl<U> AccountQuery for AccountService<U>
where
    U: UserRepository,
{
    async fn fetch_user(&self, civic_id: &CivicId) -> Result<User, Error> {
        resolve_user(self.users.as_ref(), civic_id).await
    }
}
