use crate::models::ticket::{CreateRepairPayload, Repair};
use crate::models::user::Role;
use crate::{log_info, validation, AppState};

fn validate_repair(payload: &CreateRepairPayload) -> Result<(), String> {
    validation::validate_item_name(&payload.repair_name)?;
    validation::validate_amount(payload.cost, Some(0.0), None)?;
    if let Some(ref description) = payload.description {
        validation::validate_notes(description)?;
    }
    Ok(())
}

fn repair_body(payload: &CreateRepairPayload) -> serde_json::Value {
    serde_json::json!({
        "repair_name": payload.repair_name.trim(),
        "device_category": payload.device_category,
        "cost": payload.cost,
        "description": payload.description,
    })
}

/// Repair-job catalog, optionally filtered by device category.
#[tauri::command]
pub async fn get_repairs(
    state: tauri::State<'_, AppState>,
    device_category: Option<String>,
) -> Result<Vec<Repair>, String> {
    crate::auth::guard::require_session(&state)?;

    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(category) = device_category {
        query.push(("device_category", category));
    }

    Ok(state.api.get_with_query("/repairs", &query).await?)
}

/// Create a repair job (Admin only).
#[tauri::command]
pub async fn create_repair(
    state: tauri::State<'_, AppState>,
    payload: CreateRepairPayload,
) -> Result<Repair, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;
    validate_repair(&payload)?;

    let repair: Repair = state.api.post("/repairs", &repair_body(&payload)).await?;

    log_info!(
        "SERVICE",
        "Repair job created",
        serde_json::json!({ "repair_id": repair.id })
    );
    Ok(repair)
}

/// Update a repair job (Admin only).
#[tauri::command]
pub async fn update_repair(
    state: tauri::State<'_, AppState>,
    repair_id: i64,
    payload: CreateRepairPayload,
) -> Result<Repair, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;
    validate_repair(&payload)?;

    Ok(state
        .api
        .put(&format!("/repairs/{}", repair_id), &repair_body(&payload))
        .await?)
}

/// Delete a repair job (Admin only).
#[tauri::command]
pub async fn delete_repair(
    state: tauri::State<'_, AppState>,
    repair_id: i64,
) -> Result<(), String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;
    state.api.delete(&format!("/repairs/{}", repair_id)).await?;
    Ok(())
}
