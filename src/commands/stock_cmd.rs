use crate::models::product::Product;
use crate::models::stock::{CreateStockPayload, Stock, UpdateStockPayload};
use crate::models::user::Role;
use crate::outlet::OutletCategory;
use crate::{log_info, log_warn, validation, AppState};

/// Fetch stocks, optionally scoped to one product.
#[tauri::command]
pub async fn get_stocks(
    state: tauri::State<'_, AppState>,
    product_id: Option<i64>,
) -> Result<Vec<Stock>, String> {
    crate::auth::guard::require_session(&state)?;

    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(id) = product_id {
        query.push(("product_id", id.to_string()));
    }

    Ok(state.api.get_with_query("/stocks", &query).await?)
}

/// Create a stock row (Admin only). Serial numbers are mandatory for
/// serialized categories (phones); prices are checked before any request.
#[tauri::command]
pub async fn create_stock(
    state: tauri::State<'_, AppState>,
    payload: CreateStockPayload,
) -> Result<Stock, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;

    validation::validate_stock_prices(payload.cost_price, payload.selling_price)?;
    validation::validate_quantity(payload.quantity, Some(1), None)?;

    let product: Product = state
        .api
        .get(&format!("/products/{}", payload.product_id))
        .await?;
    validation::validate_serial_number(
        payload.serial_number.as_deref().unwrap_or(""),
        product.is_serialized(),
    )?;

    let stock: Stock = state.api.post("/stocks", &stock_body(&payload)).await?;

    log_info!(
        "STOCK",
        "Stock created",
        serde_json::json!({ "stock_id": stock.id, "product_id": payload.product_id })
    );
    Ok(stock)
}

/// Update a stock row (Admin only).
#[tauri::command]
pub async fn update_stock(
    state: tauri::State<'_, AppState>,
    stock_id: i64,
    payload: UpdateStockPayload,
) -> Result<Stock, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;

    validation::validate_stock_prices(payload.cost_price, payload.selling_price)?;
    validation::validate_quantity(payload.quantity, Some(0), None)?;

    // same serialized-category rule as on create: an edit may not clear a
    // phone's serial number
    let current: Stock = state.api.get(&format!("/stocks/{}", stock_id)).await?;
    let serialized = match current.product {
        Some(ref product) => product.is_serialized(),
        None => {
            let product: Product = state
                .api
                .get(&format!("/products/{}", current.product_id))
                .await?;
            product.is_serialized()
        }
    };
    validation::validate_serial_number(
        payload.serial_number.as_deref().unwrap_or(""),
        serialized,
    )?;

    Ok(state
        .api
        .put(
            &format!("/stocks/{}", stock_id),
            &serde_json::json!({
                "serial_number": payload.serial_number,
                "quantity": payload.quantity,
                "cost_price": payload.cost_price,
                "selling_price": payload.selling_price,
                "condition": payload.condition,
                "color": payload.color,
            }),
        )
        .await?)
}

/// Delete a stock row (Admin only).
#[tauri::command]
pub async fn delete_stock(state: tauri::State<'_, AppState>, stock_id: i64) -> Result<(), String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;
    state.api.delete(&format!("/stocks/{}", stock_id)).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sales outlet browsing
// ---------------------------------------------------------------------------

/// Fetch the full available-stock list once and cache it for browsing.
#[tauri::command]
pub async fn load_outlet_stocks(state: tauri::State<'_, AppState>) -> Result<Vec<Stock>, String> {
    crate::auth::guard::require_session(&state)?;

    let stocks: Vec<Stock> = state
        .api
        .get_with_query("/stocks", &[("available", "1".to_string())])
        .await?;

    let mut browser = state.outlet.lock().map_err(|e| e.to_string())?;
    browser.set_stocks(stocks);
    Ok(browser.visible.clone())
}

/// Switch the fixed Phones/Accessories toggle.
#[tauri::command]
pub async fn select_outlet_category(
    state: tauri::State<'_, AppState>,
    category: String,
) -> Result<Vec<Stock>, String> {
    crate::auth::guard::require_session(&state)?;

    let category = match category.as_str() {
        "phones" => OutletCategory::Phones,
        "accessories" => OutletCategory::Accessories,
        other => return Err(format!("Unknown outlet category: {}", other)),
    };

    let mut browser = state.outlet.lock().map_err(|e| e.to_string())?;
    browser.select_category(category);
    Ok(browser.visible.clone())
}

/// Set or clear the subcategory filter (Accessories only).
#[tauri::command]
pub async fn select_outlet_subcategory(
    state: tauri::State<'_, AppState>,
    subcategory_id: Option<i64>,
) -> Result<Vec<Stock>, String> {
    crate::auth::guard::require_session(&state)?;

    let mut browser = state.outlet.lock().map_err(|e| e.to_string())?;
    browser.select_subcategory(subcategory_id);
    Ok(browser.visible.clone())
}

/// Search the outlet. Empty terms restore the cached, category-filtered
/// view without touching the API. Server failures degrade to a substring
/// filter over the cache.
#[tauri::command]
pub async fn search_outlet_stocks(
    state: tauri::State<'_, AppState>,
    term: String,
) -> Result<Vec<Stock>, String> {
    crate::auth::guard::require_session(&state)?;

    let seq = {
        let mut browser = state.outlet.lock().map_err(|e| e.to_string())?;
        match browser.set_search_term(&term) {
            None => return Ok(browser.visible.clone()),
            Some(seq) => seq,
        }
    };

    let limit = crate::config::get_config().api.search_limit;
    let result: Result<Vec<Stock>, _> = state
        .api
        .get_with_query(
            "/stocks/search",
            &[("term", term.trim().to_string()), ("limit", limit.to_string())],
        )
        .await;

    let mut browser = state.outlet.lock().map_err(|e| e.to_string())?;
    match result {
        Ok(stocks) => {
            browser.apply_search_results(seq, stocks);
        }
        Err(e) => {
            log_warn!(
                "OUTLET",
                &format!("Stock search failed, using local filter: {}", e)
            );
            browser.apply_search_fallback(seq);
        }
    }

    Ok(browser.visible.clone())
}

fn stock_body(payload: &CreateStockPayload) -> serde_json::Value {
    serde_json::json!({
        "product_id": payload.product_id,
        "serial_number": payload.serial_number,
        "quantity": payload.quantity,
        "cost_price": payload.cost_price,
        "selling_price": payload.selling_price,
        "condition": payload.condition,
        "color": payload.color,
    })
}
