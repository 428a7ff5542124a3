use crate::api::error::AppError;
use bytes::Bytes;

/// Caller-asserted role. Only the literal claim "admin" maps to `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim {
            Some("admin") => Role::Admin,
            _ => Role::User,
        }
    }
}

/// Identity context asserted by the caller. Nothing here is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub role: Role,
    pub user_id: Option<i32>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Scope for a user-owned route; the asserted id must match the path owner.
    pub fn owner_scope(&self, owner_id: i32) -> Result<Scope, AppError> {
        match self.user_id {
            Some(user_id) if user_id == owner_id => Ok(Scope::Owner(user_id)),
            Some(_) => Err(AppError::Forbidden(
                "User id does not match the requested owner".to_string(),
            )),
            None => Err(AppError::Forbidden("Missing user identity".to_string())),
        }
    }
}

/// Row visibility for complaint operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every complaint is visible and mutable.
    Admin,
    /// Only complaints whose `user_id` equals the wrapped id.
    Owner(i32),
}

impl Scope {
    pub fn owner(&self) -> Option<i32> {
        match self {
            Scope::Admin => None,
            Scope::Owner(user_id) => Some(*user_id),
        }
    }

    /// The miss reported for this scope. Owners cannot tell "absent" from "not theirs".
    pub fn not_found(&self) -> AppError {
        match self {
            Scope::Admin => AppError::NotFound("Complaint not found".to_string()),
            Scope::Owner(_) => AppError::NotFoundOrForbidden,
        }
    }
}

/// An uploaded file held in memory until it is handed to the blob store.
#[derive(Debug, Clone)]
pub struct Upload {
    pub field_name: String,
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    pub subject: String,
    pub description: String,
    pub status: String,
    pub complaint_type: String,
    pub priority: Option<String>,
    /// Only honoured in admin scope; owners always file under their own id.
    pub user_id: Option<i32>,
}

/// Sparse complaint edit. `None` means "leave untouched".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintChanges {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub complaint_type: Option<String>,
    pub priority: Option<String>,
}
