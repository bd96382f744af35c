use serde::Serialize;

use crate::errors::AppError;
use crate::models::ticket::{
    CompleteRepairPayload, CreateTicketPayload, Ticket, TicketItem, TicketItemKind, TicketStatus,
    TrackedTicket,
};
use crate::models::user::Role;
use crate::{log_info, validation, AppState};

/// Ticket with its attached items, for the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub items: Vec<TicketItem>,
}

async fn fetch_ticket(state: &AppState, ticket_id: i64) -> Result<Ticket, AppError> {
    state.api.get(&format!("/tickets/{}", ticket_id)).await
}

/// Guard shared by every mutation: a completed (or cancelled) ticket is
/// immutable.
fn ensure_modifiable(ticket: &Ticket) -> Result<(), String> {
    if !ticket.status.is_modifiable() {
        return Err("Ticket can no longer be modified".into());
    }
    Ok(())
}

/// Create a repair ticket.
#[tauri::command]
pub async fn create_ticket(
    state: tauri::State<'_, AppState>,
    payload: CreateTicketPayload,
) -> Result<Ticket, String> {
    crate::auth::guard::require_session(&state)?;

    validation::validate_name(&payload.first_name)?;
    validation::validate_name(&payload.last_name)?;
    validation::validate_contact_number(&payload.contact_number)?;
    validation::validate_item_name(&payload.device_model)?;
    if payload.issue.trim().is_empty() {
        return Err("Issue description is required".into());
    }
    validation::validate_notes(&payload.issue)?;
    if let Some(ref imei) = payload.imei {
        if !imei.trim().is_empty() {
            validation::validate_imei(imei)?;
        }
    }

    let ticket: Ticket = state
        .api
        .post(
            "/tickets",
            &serde_json::json!({
                "first_name": payload.first_name.trim(),
                "last_name": payload.last_name.trim(),
                "contact_number": payload.contact_number.trim(),
                "device_category": payload.device_category,
                "device_model": payload.device_model.trim(),
                "imei": payload.imei,
                "issue": payload.issue.trim(),
                "priority": payload.priority,
            }),
        )
        .await?;

    log_info!(
        "TICKET",
        "Ticket created",
        serde_json::json!({ "ticket_id": ticket.id })
    );
    Ok(ticket)
}

/// (Re)load the ticket feed from page one, keeping the status filter.
#[tauri::command]
pub async fn load_tickets(
    state: tauri::State<'_, AppState>,
    status: Option<TicketStatus>,
) -> Result<Vec<Ticket>, String> {
    crate::auth::guard::require_session(&state)?;

    {
        let mut feed = state.tickets.lock().map_err(|e| e.to_string())?;
        feed.status_filter = status;
        feed.reset();
    }

    load_next_page(&state).await
}

/// Scroll-triggered load of the next page. A no-op once the last page has
/// been reached or while a search is active.
#[tauri::command]
pub async fn load_more_tickets(state: tauri::State<'_, AppState>) -> Result<Vec<Ticket>, String> {
    crate::auth::guard::require_session(&state)?;

    {
        let feed = state.tickets.lock().map_err(|e| e.to_string())?;
        if !feed.has_more || feed.search.is_some() {
            return Ok(feed.tickets.clone());
        }
    }

    load_next_page(&state).await
}

async fn load_next_page(state: &AppState) -> Result<Vec<Ticket>, String> {
    let (page, status) = {
        let feed = state.tickets.lock().map_err(|e| e.to_string())?;
        (feed.next_page(), feed.status_filter)
    };

    let per_page = crate::config::get_config().api.page_size;
    let mut query: Vec<(&str, String)> = vec![
        ("page", page.to_string()),
        ("per_page", per_page.to_string()),
    ];
    if let Some(status) = status {
        query.push(("status", status.as_str().to_string()));
    }

    let fetched = state.api.get_paginated::<Ticket>("/tickets", &query).await?;

    let mut feed = state.tickets.lock().map_err(|e| e.to_string())?;
    feed.apply_page(fetched);
    Ok(feed.tickets.clone())
}

/// Search tickets. A non-empty term replaces the list wholesale and
/// disables pagination; clearing the term reloads the paginated feed.
#[tauri::command]
pub async fn search_tickets(
    state: tauri::State<'_, AppState>,
    term: String,
) -> Result<Vec<Ticket>, String> {
    crate::auth::guard::require_session(&state)?;

    let term = term.trim().to_string();
    if term.is_empty() {
        {
            let mut feed = state.tickets.lock().map_err(|e| e.to_string())?;
            feed.reset();
        }
        return load_next_page(&state).await;
    }

    let seq = {
        let mut feed = state.tickets.lock().map_err(|e| e.to_string())?;
        feed.begin_search(&term)
    };

    let limit = crate::config::get_config().api.search_limit;
    let results: Vec<Ticket> = state
        .api
        .get_with_query(
            "/tickets/search",
            &[("term", term), ("limit", limit.to_string())],
        )
        .await?;

    let mut feed = state.tickets.lock().map_err(|e| e.to_string())?;
    feed.apply_search(seq, results);
    Ok(feed.tickets.clone())
}

/// Ticket detail with attached items.
#[tauri::command]
pub async fn get_ticket(
    state: tauri::State<'_, AppState>,
    ticket_id: i64,
) -> Result<TicketDetail, String> {
    crate::auth::guard::require_session(&state)?;

    let ticket = fetch_ticket(&state, ticket_id).await?;
    let items: Vec<TicketItem> = state
        .api
        .get(&format!("/tickets/{}/items", ticket_id))
        .await?;

    Ok(TicketDetail { ticket, items })
}

/// "Start Repair": the sole open → in_progress transition; status-only PUT.
#[tauri::command]
pub async fn start_repair(
    state: tauri::State<'_, AppState>,
    ticket_id: i64,
) -> Result<Ticket, String> {
    crate::auth::guard::require_session(&state)?;

    let ticket = fetch_ticket(&state, ticket_id).await?;
    if ticket.status.next() != Some(TicketStatus::InProgress) {
        return Err("Repair can only be started on an open ticket".into());
    }

    let updated: Ticket = state
        .api
        .put(
            &format!("/tickets/{}", ticket_id),
            &serde_json::json!({ "status": TicketStatus::InProgress }),
        )
        .await?;

    log_info!(
        "TICKET",
        "Repair started",
        serde_json::json!({ "ticket_id": ticket_id })
    );
    Ok(updated)
}

/// "Complete Repair": in_progress → completed. Requires a non-empty IMEI
/// and a payment type; all three fields commit in one PUT.
#[tauri::command]
pub async fn complete_repair(
    state: tauri::State<'_, AppState>,
    ticket_id: i64,
    payload: CompleteRepairPayload,
) -> Result<Ticket, String> {
    crate::auth::guard::require_session(&state)?;

    validation::validate_imei(&payload.imei)?;

    let ticket = fetch_ticket(&state, ticket_id).await?;
    if ticket.status.next() != Some(TicketStatus::Completed) {
        return Err("Only an in-progress repair can be completed".into());
    }

    let updated: Ticket = state
        .api
        .put(
            &format!("/tickets/{}", ticket_id),
            &serde_json::json!({
                "status": TicketStatus::Completed,
                "payment_type": payload.payment_type,
                "imei": payload.imei.trim(),
            }),
        )
        .await?;

    log_info!(
        "TICKET",
        "Repair completed",
        serde_json::json!({ "ticket_id": ticket_id })
    );
    Ok(updated)
}

/// "Mark as Paid": records the payment type without touching status, for
/// tickets where payment lags completion.
#[tauri::command]
pub async fn mark_ticket_paid(
    state: tauri::State<'_, AppState>,
    ticket_id: i64,
    payment_type: crate::models::ticket::PaymentType,
) -> Result<Ticket, String> {
    crate::auth::guard::require_session(&state)?;

    Ok(state
        .api
        .put(
            &format!("/tickets/{}", ticket_id),
            &serde_json::json!({ "payment_type": payment_type }),
        )
        .await?)
}

/// Attach or update the service charge. This writes the charge only;
/// advancing the status is its own explicit operation (`start_repair`).
#[tauri::command]
pub async fn set_service_charge(
    state: tauri::State<'_, AppState>,
    ticket_id: i64,
    amount: f64,
) -> Result<Ticket, String> {
    crate::auth::guard::require_session(&state)?;
    validation::validate_amount(amount, Some(0.0), None)?;

    let ticket = fetch_ticket(&state, ticket_id).await?;
    ensure_modifiable(&ticket)?;

    Ok(state
        .api
        .put(
            &format!("/tickets/{}", ticket_id),
            &serde_json::json!({ "service_charge": amount }),
        )
        .await?)
}

/// Attach a part to a ticket.
#[tauri::command]
pub async fn attach_part(
    state: tauri::State<'_, AppState>,
    ticket_id: i64,
    part_id: i64,
    quantity: i64,
) -> Result<TicketItem, String> {
    crate::auth::guard::require_session(&state)?;
    validation::validate_quantity(quantity, Some(1), None)?;

    let ticket = fetch_ticket(&state, ticket_id).await?;
    ensure_modifiable(&ticket)?;

    Ok(state
        .api
        .post(
            "/ticket-items",
            &serde_json::json!({
                "ticket_id": ticket_id,
                "type": TicketItemKind::Part,
                "part_id": part_id,
                "quantity": quantity,
            }),
        )
        .await?)
}

/// Attach a repair job to a ticket.
#[tauri::command]
pub async fn attach_repair(
    state: tauri::State<'_, AppState>,
    ticket_id: i64,
    repair_id: i64,
) -> Result<TicketItem, String> {
    crate::auth::guard::require_session(&state)?;

    let ticket = fetch_ticket(&state, ticket_id).await?;
    ensure_modifiable(&ticket)?;

    Ok(state
        .api
        .post(
            "/ticket-items",
            &serde_json::json!({
                "ticket_id": ticket_id,
                "type": TicketItemKind::Repair,
                "repair_id": repair_id,
            }),
        )
        .await?)
}

/// Detach an item; the webview filters its local list on success.
#[tauri::command]
pub async fn remove_ticket_item(
    state: tauri::State<'_, AppState>,
    ticket_id: i64,
    item_id: i64,
) -> Result<(), String> {
    crate::auth::guard::require_session(&state)?;

    let ticket = fetch_ticket(&state, ticket_id).await?;
    ensure_modifiable(&ticket)?;

    state
        .api
        .delete(&format!("/ticket-items/{}", item_id))
        .await?;
    Ok(())
}

/// Assign a technician (Admin only).
#[tauri::command]
pub async fn assign_technician(
    state: tauri::State<'_, AppState>,
    ticket_id: i64,
    user_id: i64,
) -> Result<Ticket, String> {
    crate::auth::guard::require_role(&state, Role::Admin)?;

    let ticket = fetch_ticket(&state, ticket_id).await?;
    ensure_modifiable(&ticket)?;

    Ok(state
        .api
        .put(
            &format!("/tickets/{}", ticket_id),
            &serde_json::json!({ "repaired_by": user_id }),
        )
        .await?)
}

/// Public tracker: unauthenticated status lookup by ticket id and the
/// contact number given at intake.
#[tauri::command]
pub async fn track_ticket(
    state: tauri::State<'_, AppState>,
    ticket_id: i64,
    contact_number: String,
) -> Result<TrackedTicket, String> {
    validation::validate_contact_number(&contact_number)?;

    Ok(state
        .api
        .get_with_query(
            "/tickets/track",
            &[
                ("ticket_id", ticket_id.to_string()),
                ("contact_number", contact_number.trim().to_string()),
            ],
        )
        .await?)
}
