use serde::Serialize;

use crate::models::user::{AuthUser, LoginResult};
use crate::{log_info, log_warn, validation, AppState};

/// Session info returned to the webview for routing decisions.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub user: AuthUser,
    pub default_route: String,
}

/// Sign in against the API and install the session.
#[tauri::command]
pub async fn login(
    state: tauri::State<'_, AppState>,
    email: String,
    password: String,
) -> Result<SessionInfo, String> {
    validation::validate_email(&email)?;
    if password.is_empty() {
        return Err("Password is required".into());
    }

    let result: LoginResult = state
        .api
        .post(
            "/login",
            &serde_json::json!({ "email": email.trim(), "password": password }),
        )
        .await?;

    state.api.set_token(&result.token);

    let default_route = {
        let mut store = state.auth.lock().map_err(|e| e.to_string())?;
        store.set_session(result.token.clone(), result.user.clone());
        if let Err(e) = store.persist(&state.auth_snapshot_path) {
            log_warn!("AUTH", &format!("Failed to persist auth snapshot: {}", e));
        }
        store.default_route().to_string()
    };

    log_info!(
        "AUTH",
        "User signed in",
        serde_json::json!({ "user_id": result.user.id })
    );

    Ok(SessionInfo {
        user: result.user,
        default_route,
    })
}

/// Sign out: clear the session locally, best-effort revoke on the server.
#[tauri::command]
pub async fn logout(state: tauri::State<'_, AppState>) -> Result<(), String> {
    // Server revocation is best-effort; local state is cleared regardless.
    let _ = state
        .api
        .post::<serde_json::Value, _>("/logout", &serde_json::json!({}))
        .await;

    state.api.clear_token();

    let mut store = state.auth.lock().map_err(|e| e.to_string())?;
    store.clear(&state.auth_snapshot_path);

    log_info!("AUTH", "User signed out");
    Ok(())
}

/// Session check for auto-login at startup (hydrated from the snapshot).
#[tauri::command]
pub async fn check_session(state: tauri::State<'_, AppState>) -> Result<SessionInfo, String> {
    let store = state.auth.lock().map_err(|e| e.to_string())?;
    let user = store
        .user()
        .cloned()
        .ok_or_else(|| "No active session".to_string())?;

    Ok(SessionInfo {
        default_route: store.default_route().to_string(),
        user,
    })
}
