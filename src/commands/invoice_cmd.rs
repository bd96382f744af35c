use crate::api::Page;
use crate::models::invoice::{CreateReturnPayload, Invoice, ReturnedItem};
use crate::{log_info, validation, AppState};

/// Paginated invoice history with an optional search over customer name,
/// contact number and invoice id.
#[tauri::command]
pub async fn get_invoices(
    state: tauri::State<'_, AppState>,
    page: u32,
    search: Option<String>,
) -> Result<Page<Invoice>, String> {
    crate::auth::guard::require_session(&state)?;

    let per_page = crate::config::get_config().api.page_size;
    let mut query: Vec<(&str, String)> = vec![
        ("page", page.max(1).to_string()),
        ("per_page", per_page.to_string()),
    ];
    if let Some(term) = search {
        let term = term.trim().to_string();
        if !term.is_empty() {
            query.push(("search", term));
        }
    }

    Ok(state.api.get_paginated("/invoices", &query).await?)
}

/// Single invoice with its line items, for the detail / receipt view.
#[tauri::command]
pub async fn get_invoice(
    state: tauri::State<'_, AppState>,
    invoice_id: i64,
) -> Result<Invoice, String> {
    crate::auth::guard::require_session(&state)?;
    Ok(state.api.get(&format!("/invoices/{}", invoice_id)).await?)
}

/// Record a return against an invoice line. The quantity is checked against
/// the sold quantity before anything is sent; the server adjusts stock for
/// restockable returns.
#[tauri::command]
pub async fn create_return(
    state: tauri::State<'_, AppState>,
    payload: CreateReturnPayload,
) -> Result<ReturnedItem, String> {
    crate::auth::guard::require_session(&state)?;

    let invoice: Invoice = state
        .api
        .get(&format!("/invoices/{}", payload.invoice_id))
        .await?;
    let item = invoice
        .items
        .iter()
        .find(|item| item.id == payload.item_id)
        .ok_or("Item does not belong to this invoice")?;

    validation::validate_quantity(payload.quantity, Some(1), Some(item.quantity))?;

    let returned: ReturnedItem = state
        .api
        .post(
            "/returned-items",
            &serde_json::json!({
                "invoice_id": payload.invoice_id,
                "item_id": payload.item_id,
                "quantity": payload.quantity,
                "return_type": payload.return_type,
            }),
        )
        .await?;

    log_info!(
        "INVOICE",
        "Return recorded",
        serde_json::json!({
            "invoice_id": payload.invoice_id,
            "item_id": payload.item_id,
            "quantity": payload.quantity,
            "return_type": payload.return_type,
        })
    );
    Ok(returned)
}

/// Returns already recorded against an invoice.
#[tauri::command]
pub async fn get_returned_items(
    state: tauri::State<'_, AppState>,
    invoice_id: i64,
) -> Result<Vec<ReturnedItem>, String> {
    crate::auth::guard::require_session(&state)?;
    Ok(state
        .api
        .get(&format!("/invoices/{}/returned-items", invoice_id))
        .await?)
}
