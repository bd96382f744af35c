use crate::models::dashboard::DashboardSummary;
use crate::models::user::Role;
use crate::AppState;

/// Sales and ticket summary for the admin dashboard.
#[tauri::command]
pub async fn get_dashboard_summary(
    state: tauri::State<'_, AppState>,
) -> Result<DashboardSummary, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;
    Ok(state.api.get("/dashboard/summary").await?)
}
