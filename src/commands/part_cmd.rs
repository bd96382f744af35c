use reqwest::multipart::Form;

use crate::api::image_part;
use crate::models::ticket::{CreatePartPayload, Part};
use crate::models::user::Role;
use crate::{log_info, validation, AppState};

fn validate_part(payload: &CreatePartPayload) -> Result<(), String> {
    validation::validate_item_name(&payload.part_name)?;
    validation::validate_part_prices(payload.unit_price, payload.selling_price)?;
    validation::validate_quantity(payload.quantity, Some(0), None)?;
    if let Some(ref description) = payload.description {
        validation::validate_notes(description)?;
    }
    Ok(())
}

fn part_form(payload: &CreatePartPayload) -> Result<Form, String> {
    let mut form = Form::new()
        .text("part_name", payload.part_name.trim().to_string())
        .text("quantity", payload.quantity.to_string())
        .text("unit_price", payload.unit_price.to_string())
        .text("selling_price", payload.selling_price.to_string())
        .text("device_category", payload.device_category.clone())
        .text(
            "grade",
            serde_json::to_value(payload.grade)
                .map_err(|e| e.to_string())?
                .as_str()
                .unwrap_or_default()
                .to_string(),
        );
    if let Some(description) = payload.description.clone() {
        form = form.text("description", description);
    }
    Ok(form)
}

fn part_body(payload: &CreatePartPayload) -> serde_json::Value {
    serde_json::json!({
        "part_name": payload.part_name.trim(),
        "quantity": payload.quantity,
        "unit_price": payload.unit_price,
        "selling_price": payload.selling_price,
        "device_category": payload.device_category,
        "grade": payload.grade,
        "description": payload.description,
    })
}

/// Parts inventory, optionally filtered by device category.
#[tauri::command]
pub async fn get_parts(
    state: tauri::State<'_, AppState>,
    device_category: Option<String>,
) -> Result<Vec<Part>, String> {
    crate::auth::guard::require_session(&state)?;

    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(category) = device_category {
        query.push(("device_category", category));
    }

    Ok(state.api.get_with_query("/parts", &query).await?)
}

/// Create a spare part (Admin only). Image-bearing creates go as multipart.
#[tauri::command]
pub async fn create_part(
    state: tauri::State<'_, AppState>,
    payload: CreatePartPayload,
) -> Result<Part, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;
    validate_part(&payload)?;

    let part: Part = if let Some(ref image_path) = payload.image_path {
        let form = part_form(&payload)?.part("part_image", image_part(image_path)?);
        state.api.post_multipart("/parts", form).await?
    } else {
        state.api.post("/parts", &part_body(&payload)).await?
    };

    log_info!(
        "SERVICE",
        "Part created",
        serde_json::json!({ "part_id": part.id })
    );
    Ok(part)
}

/// Update a spare part (Admin only). Multipart updates use the form-method
/// override the API expects for file uploads.
#[tauri::command]
pub async fn update_part(
    state: tauri::State<'_, AppState>,
    part_id: i64,
    payload: CreatePartPayload,
) -> Result<Part, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;
    validate_part(&payload)?;

    let path = format!("/parts/{}", part_id);

    let part: Part = if let Some(ref image_path) = payload.image_path {
        let form = part_form(&payload)?
            .text("_method", "PUT")
            .part("part_image", image_part(image_path)?);
        state.api.post_multipart(&path, form).await?
    } else {
        state.api.put(&path, &part_body(&payload)).await?
    };

    Ok(part)
}

/// Delete a spare part (Admin only).
#[tauri::command]
pub async fn delete_part(state: tauri::State<'_, AppState>, part_id: i64) -> Result<(), String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;
    state.api.delete(&format!("/parts/{}", part_id)).await?;
    Ok(())
}
