//! User identity model.
//!
//! Users are keyed externally by their identity-provider id ([`CivicId`]) and
//! internally by a UUID. A user may hold any subset of the three platform
//! roles; role-specific data lives in the profile entities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyCivicId,
    CivicIdTooLong { max: usize },
    CivicIdInvalidCharacters,
    EmptyEmail,
    InvalidEmail,
    EmptyName,
    NameTooShort { min: usize },
    NameTooLong { max: usize },
    NameInvalidCharacters,
    DuplicateRole { role: UserRole },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCivicId => write!(f, "civic id must not be empty"),
            Self::CivicIdTooLong { max } => {
                write!(f, "civic id must be at most {max} characters")
            }
            Self::CivicIdInvalidCharacters => {
                write!(f, "civic id must contain only visible ASCII characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like local@domain.tld"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooShort { min } => {
                write!(f, "name must be at least {min} characters")
            }
            Self::NameTooLong { max } => {
                write!(f, "name must be at most {max} characters")
            }
            Self::NameInvalidCharacters => write!(
                f,
                "name may only contain letters, numbers, spaces, hyphens, or apostrophes",
            ),
            Self::DuplicateRole { role } => {
                write!(f, "role '{role}' is listed more than once")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum allowed length for a civic id.
pub const CIVIC_ID_MAX: usize = 128;

/// External identity-provider user identifier.
///
/// Opaque to this service beyond shape checks: the identity provider owns the
/// format. Used as the join key across profile tables and as the query
/// credential on persona endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CivicId(String);

impl CivicId {
    /// Validate and construct a [`CivicId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyCivicId);
        }
        if id.chars().count() > CIVIC_ID_MAX {
            return Err(UserValidationError::CivicIdTooLong { max: CIVIC_ID_MAX });
        }
        if !id.chars().all(|c| c.is_ascii_graphic()) {
            return Err(UserValidationError::CivicIdInvalidCharacters);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for CivicId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CivicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CivicId> for String {
    fn from(value: CivicId) -> Self {
        value.0
    }
}

impl TryFrom<String> for CivicId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Contact email address.
///
/// Shape-checked only (one `@`, dotted domain, no whitespace); deliverability
/// stays with the mail system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from owned input.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if email.len() > EMAIL_MAX || email.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        let Some((local, domain)) = email.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        if !domain.split('.').skip(1).any(|part| !part.is_empty()) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Minimum allowed length for a persona name.
pub const PERSONA_NAME_MIN: usize = 2;
/// Maximum allowed length for a persona name.
pub const PERSONA_NAME_MAX: usize = 80;

/// Human readable name shown across dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonaName(String);

impl PersonaName {
    /// Validate and construct a [`PersonaName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }

        let length = name.chars().count();
        if length < PERSONA_NAME_MIN {
            return Err(UserValidationError::NameTooShort {
                min: PERSONA_NAME_MIN,
            });
        }
        if length > PERSONA_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: PERSONA_NAME_MAX,
            });
        }

        let allowed = name
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '\'');
        if !allowed {
            return Err(UserValidationError::NameInvalidCharacters);
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for PersonaName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonaName> for String {
    fn from(value: PersonaName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonaName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Platform persona a user may act as.
///
/// # Example
///
/// ```
/// use backend::domain::UserRole;
///
/// assert_eq!(UserRole::Founder.as_str(), "founder");
/// assert_eq!("investor".parse::<UserRole>(), Ok(UserRole::Investor));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Runs one or more companies; posts jobs and idea validations.
    Founder,
    /// Tracks a deal-flow pipeline against companies.
    Investor,
    /// Applies to job postings.
    Jobseeker,
}

impl UserRole {
    /// All role variants.
    pub const ALL: [UserRole; 3] = [UserRole::Founder, UserRole::Investor, UserRole::Jobseeker];

    /// Returns the wire and database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Founder => "founder",
            Self::Investor => "investor",
            Self::Jobseeker => "jobseeker",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an invalid role string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseUserRoleError {
    /// The invalid input string.
    pub input: String,
}

impl fmt::Display for ParseUserRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variants: Vec<_> = UserRole::ALL.iter().map(|v| v.as_str()).collect();
        write!(
            f,
            "invalid role '{}': expected one of {}",
            self.input,
            variants.join(", ")
        )
    }
}

impl std::error::Error for ParseUserRoleError {}

impl FromStr for UserRole {
    type Err = ParseUserRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| ParseUserRoleError {
                input: s.to_owned(),
            })
    }
}

/// Platform user.
///
/// ## Invariants
/// - `civic_id`, `email`, and `name` satisfy their newtype validations.
/// - `active_roles` contains no duplicate role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: Uuid,
    #[schema(value_type = String, example = "civic-7f3d2a")]
    civic_id: CivicId,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
    #[schema(value_type = String, example = "Ada Lovelace")]
    name: PersonaName,
    active_roles: Vec<UserRole>,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(
        id: Uuid,
        civic_id: CivicId,
        email: EmailAddress,
        name: PersonaName,
        active_roles: Vec<UserRole>,
    ) -> Result<Self, UserValidationError> {
        if let Some(role) = first_duplicate_role(&active_roles) {
            return Err(UserValidationError::DuplicateRole { role });
        }
        Ok(Self {
            id,
            civic_id,
            email,
            name,
            active_roles,
        })
    }

    /// Fallible constructor from raw string inputs.
    pub fn try_from_strings(
        id: Uuid,
        civic_id: impl AsRef<str>,
        email: impl Into<String>,
        name: impl Into<String>,
        active_roles: Vec<UserRole>,
    ) -> Result<Self, UserValidationError> {
        Self::new(
            id,
            CivicId::new(civic_id)?,
            EmailAddress::new(email)?,
            PersonaName::new(name)?,
            active_roles,
        )
    }

    /// Stable internal identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// External identity-provider identifier.
    pub fn civic_id(&self) -> &CivicId {
        &self.civic_id
    }

    /// Contact email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &PersonaName {
        &self.name
    }

    /// Roles the user currently acts under.
    pub fn active_roles(&self) -> &[UserRole] {
        self.active_roles.as_slice()
    }

    /// Whether the user holds the given role.
    pub fn has_role(&self, role: UserRole) -> bool {
        self.active_roles.contains(&role)
    }

    /// Return a copy with `role` added to the active set (no-op when present).
    pub fn with_role(mut self, role: UserRole) -> Self {
        if !self.active_roles.contains(&role) {
            self.active_roles.push(role);
        }
        self
    }

    /// Replace the active role set.
    pub fn with_roles(mut self, roles: Vec<UserRole>) -> Result<Self, UserValidationError> {
        if let Some(role) = first_duplicate_role(&roles) {
            return Err(UserValidationError::DuplicateRole { role });
        }
        self.active_roles = roles;
        Ok(self)
    }
}

fn first_duplicate_role(roles: &[UserRole]) -> Option<UserRole> {
    roles
        .iter()
        .enumerate()
        .find(|(index, role)| roles[..*index].contains(role))
        .map(|(_, role)| *role)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: Uuid,
    civic_id: String,
    email: String,
    name: String,
    #[serde(default)]
    active_roles: Vec<UserRole>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            civic_id,
            email,
            name,
            active_roles,
        } = value;
        Self {
            id,
            civic_id: civic_id.into(),
            email: email.into(),
            name: name.into(),
            active_roles,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        User::try_from_strings(
            value.id,
            value.civic_id,
            value.email,
            value.name,
            value.active_roles,
        )
    }
}
