use serde::Serialize;

use crate::errors::AppError;
use crate::models::cart::{
    validate_checkout, Cart, CartItem, CartTotals, CheckoutDetails, CheckoutResult,
};
use crate::models::invoice::Invoice;
use crate::{log_error, log_info, validation, AppState};

/// Cart view returned to the webview: line items plus totals recomputed
/// from the full item list.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub cart_id: Option<i64>,
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

fn view(state: &AppState) -> Result<CartView, String> {
    let session = state.cart.lock().map_err(|e| e.to_string())?;
    Ok(CartView {
        cart_id: session.cart_id,
        items: session.items.clone(),
        totals: session.totals(),
    })
}

/// Full refetch of the cart's items after a mutation (no merging;
/// last fetch wins).
async fn refetch_items(state: &AppState, cart_id: i64) -> Result<Vec<CartItem>, AppError> {
    state.api.get(&format!("/carts/{}/items", cart_id)).await
}

async fn refresh(state: &AppState, cart_id: i64) -> Result<CartView, String> {
    let items = refetch_items(state, cart_id).await?;
    let mut session = state.cart.lock().map_err(|e| e.to_string())?;
    session.replace_items(items);
    drop(session);
    view(state)
}

/// Current cart contents.
#[tauri::command]
pub async fn get_cart(state: tauri::State<'_, AppState>) -> Result<CartView, String> {
    crate::auth::guard::require_session(&state)?;
    view(&state)
}

/// Add a stock unit to the cart, creating the cart lazily on first use.
/// New items start at quantity 1 with no discount.
#[tauri::command]
pub async fn add_to_cart(
    state: tauri::State<'_, AppState>,
    stock_id: i64,
) -> Result<CartView, String> {
    crate::auth::guard::require_session(&state)?;

    let existing = state.cart.lock().map_err(|e| e.to_string())?.cart_id;

    let cart_id = match existing {
        Some(id) => id,
        None => {
            let cart: Cart = state.api.post("/carts", &serde_json::json!({})).await?;
            state.cart.lock().map_err(|e| e.to_string())?.cart_id = Some(cart.id);
            cart.id
        }
    };

    let _: CartItem = state
        .api
        .post(
            &format!("/carts/{}/items", cart_id),
            &serde_json::json!({ "stock_id": stock_id, "quantity": 1, "price": 0 }),
        )
        .await?;

    refresh(&state, cart_id).await
}

/// Change a line item's quantity, then refetch the cart.
#[tauri::command]
pub async fn update_item_quantity(
    state: tauri::State<'_, AppState>,
    item_id: i64,
    quantity: i64,
) -> Result<CartView, String> {
    crate::auth::guard::require_session(&state)?;
    validation::validate_quantity(quantity, Some(1), None)?;

    let cart_id = state
        .cart
        .lock()
        .map_err(|e| e.to_string())?
        .cart_id
        .ok_or("No active cart")?;

    let _: CartItem = state
        .api
        .put(
            &format!("/cart-items/{}", item_id),
            &serde_json::json!({ "quantity": quantity }),
        )
        .await?;

    refresh(&state, cart_id).await
}

/// Set a line item's absolute discount amount. The server rejects a price
/// above the stock's selling price; that message is surfaced as-is for the
/// modal to display.
#[tauri::command]
pub async fn update_item_price(
    state: tauri::State<'_, AppState>,
    item_id: i64,
    price: f64,
) -> Result<CartView, String> {
    crate::auth::guard::require_session(&state)?;
    validation::validate_amount(price, Some(0.0), None)?;

    let cart_id = state
        .cart
        .lock()
        .map_err(|e| e.to_string())?
        .cart_id
        .ok_or("No active cart")?;

    let _: CartItem = state
        .api
        .put(
            &format!("/cart-items/{}", item_id),
            &serde_json::json!({ "price": price }),
        )
        .await?;

    refresh(&state, cart_id).await
}

/// Optimistically remove a line item. On server failure the pre-removal
/// snapshot is restored wholesale and the error is surfaced.
#[tauri::command]
pub async fn remove_cart_item(
    state: tauri::State<'_, AppState>,
    item_id: i64,
) -> Result<CartView, String> {
    crate::auth::guard::require_session(&state)?;

    let snapshot = {
        let mut session = state.cart.lock().map_err(|e| e.to_string())?;
        let snapshot = session.snapshot();
        if !session.remove_local(item_id) {
            return Err("Item is not in the cart".into());
        }
        snapshot
    };

    if let Err(e) = state.api.delete(&format!("/cart-items/{}", item_id)).await {
        let mut session = state.cart.lock().map_err(|e| e.to_string())?;
        session.restore(snapshot);
        drop(session);
        log_error!("CART", "Item removal failed, restored snapshot", e.to_string());
        return Err(e.into());
    }

    view(&state)
}

/// Delete the cart entirely (explicit user action).
#[tauri::command]
pub async fn delete_cart(state: tauri::State<'_, AppState>) -> Result<(), String> {
    crate::auth::guard::require_session(&state)?;

    let cart_id = state
        .cart
        .lock()
        .map_err(|e| e.to_string())?
        .cart_id
        .ok_or("No active cart")?;

    state.api.delete(&format!("/carts/{}", cart_id)).await?;

    state.cart.lock().map_err(|e| e.to_string())?.clear();
    Ok(())
}

/// Validate and submit checkout. The server atomically converts the cart
/// into an invoice; the local cart is superseded. `print_receipt` is carried
/// through so "checkout without bill" skips the print trigger.
#[tauri::command]
pub async fn checkout(
    state: tauri::State<'_, AppState>,
    details: CheckoutDetails,
) -> Result<CheckoutResult, String> {
    let user = crate::auth::guard::require_session(&state)?;

    let (cart_id, items) = {
        let session = state.cart.lock().map_err(|e| e.to_string())?;
        (session.cart_id.ok_or("No active cart")?, session.snapshot())
    };

    // Pre-flight: nothing is sent if this fails.
    validate_checkout(&details, &items)?;

    let invoice: Invoice = state
        .api
        .post(
            &format!("/carts/{}/checkout", cart_id),
            &serde_json::json!({
                "first_name": details.first_name.trim(),
                "last_name": details.last_name.trim(),
                "contact_number": details.contact_number.trim(),
                "payment_method": details.payment_method,
            }),
        )
        .await?;

    state.cart.lock().map_err(|e| e.to_string())?.clear();

    log_info!(
        "CART",
        "Checkout completed",
        serde_json::json!({
            "invoice_id": invoice.id,
            "total": invoice.total_amount,
            "cashier_id": user.id,
            "print_receipt": details.print_receipt,
        })
    );

    Ok(CheckoutResult {
        invoice_id: invoice.id,
        print_receipt: details.print_receipt,
    })
}
