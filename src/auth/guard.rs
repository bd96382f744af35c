use crate::errors::AppError;
use crate::models::user::{AuthUser, Role};
use crate::AppState;

/// Helper: require a signed-in session and return the user.
pub fn require_session(state: &AppState) -> Result<AuthUser, AppError> {
    let store = state
        .auth
        .lock()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    store
        .user()
        .cloned()
        .ok_or_else(|| AppError::Auth("Please sign in first".into()))
}

/// Helper: require a signed-in session carrying the given role.
pub fn require_role(state: &AppState, role: Role) -> Result<AuthUser, AppError> {
    let user = require_session(state)?;
    if !user.roles.contains(&role) {
        return Err(AppError::Forbidden(format!(
            "This action requires the {} role",
            role.as_str()
        )));
    }
    Ok(user)
}
