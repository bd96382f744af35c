use reqwest::multipart::Form;

use crate::api::image_part;
use crate::models::product::{
    Category, CreateProductPayload, Product, UpdateProductPayload,
};
use crate::models::user::Role;
use crate::{log_info, validation, AppState};

/// Fetch categories with their subcategories.
#[tauri::command]
pub async fn get_categories(state: tauri::State<'_, AppState>) -> Result<Vec<Category>, String> {
    crate::auth::guard::require_session(&state)?;
    Ok(state.api.get("/categories").await?)
}

/// Fetch the product list, optionally filtered.
#[tauri::command]
pub async fn get_products(
    state: tauri::State<'_, AppState>,
    search: Option<String>,
    category_id: Option<i64>,
) -> Result<Vec<Product>, String> {
    crate::auth::guard::require_session(&state)?;

    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(term) = search {
        query.push(("search", term));
    }
    if let Some(id) = category_id {
        query.push(("category_id", id.to_string()));
    }

    Ok(state.api.get_with_query("/products", &query).await?)
}

/// Fetch a single product.
#[tauri::command]
pub async fn get_product(
    state: tauri::State<'_, AppState>,
    product_id: i64,
) -> Result<Product, String> {
    crate::auth::guard::require_session(&state)?;
    Ok(state.api.get(&format!("/products/{}", product_id)).await?)
}

/// Create a product (Admin only). Image-bearing creates go as multipart.
#[tauri::command]
pub async fn create_product(
    state: tauri::State<'_, AppState>,
    payload: CreateProductPayload,
) -> Result<Product, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;

    validation::validate_item_name(&payload.name)?;
    if let Some(ref description) = payload.description {
        validation::validate_notes(description)?;
    }

    let product: Product = if let Some(ref image_path) = payload.image_path {
        let mut form = Form::new()
            .text("name", payload.name.trim().to_string())
            .text("device_category_id", payload.device_category_id.to_string())
            .part("image", image_part(image_path)?);
        if let Some(description) = payload.description.clone() {
            form = form.text("description", description);
        }
        if let Some(sub) = payload.device_subcategory_id {
            form = form.text("device_subcategory_id", sub.to_string());
        }
        state.api.post_multipart("/products", form).await?
    } else {
        state
            .api
            .post(
                "/products",
                &serde_json::json!({
                    "name": payload.name.trim(),
                    "description": payload.description,
                    "device_category_id": payload.device_category_id,
                    "device_subcategory_id": payload.device_subcategory_id,
                }),
            )
            .await?
    };

    log_info!(
        "CATALOG",
        "Product created",
        serde_json::json!({ "product_id": product.id })
    );
    Ok(product)
}

/// Update a product (Admin only). Multipart updates use the form-method
/// override the API expects for file uploads.
#[tauri::command]
pub async fn update_product(
    state: tauri::State<'_, AppState>,
    product_id: i64,
    payload: UpdateProductPayload,
) -> Result<Product, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;

    validation::validate_item_name(&payload.name)?;
    if let Some(ref description) = payload.description {
        validation::validate_notes(description)?;
    }

    let path = format!("/products/{}", product_id);

    let product: Product = if let Some(ref image_path) = payload.image_path {
        let mut form = Form::new()
            .text("_method", "PUT")
            .text("name", payload.name.trim().to_string())
            .text("status", payload.status.as_str())
            .text("device_category_id", payload.device_category_id.to_string())
            .part("image", image_part(image_path)?);
        if let Some(description) = payload.description.clone() {
            form = form.text("description", description);
        }
        if let Some(sub) = payload.device_subcategory_id {
            form = form.text("device_subcategory_id", sub.to_string());
        }
        state.api.post_multipart(&path, form).await?
    } else {
        state
            .api
            .put(
                &path,
                &serde_json::json!({
                    "name": payload.name.trim(),
                    "description": payload.description,
                    "status": payload.status,
                    "device_category_id": payload.device_category_id,
                    "device_subcategory_id": payload.device_subcategory_id,
                }),
            )
            .await?
    };

    Ok(product)
}

/// Delete a product (Admin only).
#[tauri::command]
pub async fn delete_product(
    state: tauri::State<'_, AppState>,
    product_id: i64,
) -> Result<(), String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;
    state.api.delete(&format!("/products/{}", product_id)).await?;
    log_info!(
        "CATALOG",
        "Product deleted",
        serde_json::json!({ "product_id": product_id })
    );
    Ok(())
}
