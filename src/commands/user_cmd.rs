use crate::models::user::{CreateUserPayload, Role, UpdateUserPayload, User, UserStatus};
use crate::{log_info, validation, AppState};

/// Staff list (Admin only).
#[tauri::command]
pub async fn get_users(state: tauri::State<'_, AppState>) -> Result<Vec<User>, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;
    Ok(state.api.get("/users").await?)
}

/// Create a staff account (Admin only). At least one role is required.
#[tauri::command]
pub async fn create_user(
    state: tauri::State<'_, AppState>,
    payload: CreateUserPayload,
) -> Result<User, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;

    validation::validate_name(&payload.name)?;
    validation::validate_email(&payload.email)?;
    if payload.password.len() < 8 {
        return Err("Password must be at least 8 characters".into());
    }
    if payload.roles.is_empty() {
        return Err("At least one role must be selected".into());
    }

    let user: User = state
        .api
        .post(
            "/users",
            &serde_json::json!({
                "name": payload.name.trim(),
                "email": payload.email.trim(),
                "password": payload.password,
                "roles": payload.roles,
            }),
        )
        .await?;

    log_info!(
        "USER",
        "User created",
        serde_json::json!({ "user_id": user.id })
    );
    Ok(user)
}

/// Update name, email and roles (Admin only). Passwords change through a
/// separate server-side flow.
#[tauri::command]
pub async fn update_user(
    state: tauri::State<'_, AppState>,
    user_id: i64,
    payload: UpdateUserPayload,
) -> Result<User, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;

    validation::validate_name(&payload.name)?;
    validation::validate_email(&payload.email)?;
    if payload.roles.is_empty() {
        return Err("At least one role must be selected".into());
    }

    Ok(state
        .api
        .put(
            &format!("/users/{}", user_id),
            &serde_json::json!({
                "name": payload.name.trim(),
                "email": payload.email.trim(),
                "roles": payload.roles,
            }),
        )
        .await?)
}

/// Toggle a user between active and inactive (Admin only). Admins cannot
/// deactivate their own account.
#[tauri::command]
pub async fn toggle_user_status(
    state: tauri::State<'_, AppState>,
    user_id: i64,
    status: UserStatus,
) -> Result<User, String> {
    let current = crate::auth::guard::require_role(&state, Role::Admin)?;

    if current.id == user_id && status == UserStatus::Inactive {
        return Err("You cannot deactivate your own account".into());
    }

    let user: User = state
        .api
        .put(
            &format!("/users/{}", user_id),
            &serde_json::json!({ "status": status }),
        )
        .await?;

    log_info!(
        "USER",
        "User status changed",
        serde_json::json!({ "user_id": user_id, "status": status })
    );
    Ok(user)
}
