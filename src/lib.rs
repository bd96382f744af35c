pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod errors;
pub mod logger;
pub mod models;
pub mod outlet;
pub mod validation;

use std::path::PathBuf;
use std::sync::Mutex;

use tauri::Manager;

use api::ApiClient;
use auth::store::AuthStore;
use models::cart::CartSession;
use models::ticket::TicketFeed;
use outlet::OutletBrowser;

/// Global application state managed by Tauri.
pub struct AppState {
    pub api: ApiClient,
    pub auth: Mutex<AuthStore>,
    pub auth_snapshot_path: PathBuf,
    pub cart: Mutex<CartSession>,
    pub outlet: Mutex<OutletBrowser>,
    pub tickets: Mutex<TicketFeed>,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let app_handle = app.handle().clone();

            let app_data_dir = app_handle.path().app_data_dir()?;

            let config = config::init_config();
            config.validate()?;

            if let Err(e) = logger::init_global_logger(&app_data_dir, config.logging.clone()) {
                eprintln!("Warning: failed to initialize logger: {}", e);
            }

            log_info!(
                "APP",
                "Application starting",
                serde_json::json!({
                    "version": config.version,
                    "environment": config.environment.as_str(),
                    "api_base_url": config.api.base_url,
                })
            );

            let api = ApiClient::new(&config.api)?;

            // Auto-login: restore the previous session from disk if present.
            let snapshot_path = config.get_auth_snapshot_path(&app_data_dir);
            let store = AuthStore::hydrate(&snapshot_path);
            if let Some(token) = store.token() {
                api.set_token(token);
                log_info!("AUTH", "Session restored from snapshot");
            }

            app_handle.manage(AppState {
                api,
                auth: Mutex::new(store),
                auth_snapshot_path: snapshot_path,
                cart: Mutex::new(CartSession::default()),
                outlet: Mutex::new(OutletBrowser::default()),
                tickets: Mutex::new(TicketFeed::default()),
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Auth
            commands::auth_cmd::login,
            commands::auth_cmd::logout,
            commands::auth_cmd::check_session,
            // Catalog
            commands::product_cmd::get_categories,
            commands::product_cmd::get_products,
            commands::product_cmd::get_product,
            commands::product_cmd::create_product,
            commands::product_cmd::update_product,
            commands::product_cmd::delete_product,
            // Stock
            commands::stock_cmd::get_stocks,
            commands::stock_cmd::create_stock,
            commands::stock_cmd::update_stock,
            commands::stock_cmd::delete_stock,
            // Sales outlet
            commands::stock_cmd::load_outlet_stocks,
            commands::stock_cmd::select_outlet_category,
            commands::stock_cmd::select_outlet_subcategory,
            commands::stock_cmd::search_outlet_stocks,
            // Cart & checkout
            commands::cart_cmd::get_cart,
            commands::cart_cmd::add_to_cart,
            commands::cart_cmd::update_item_quantity,
            commands::cart_cmd::update_item_price,
            commands::cart_cmd::remove_cart_item,
            commands::cart_cmd::delete_cart,
            commands::cart_cmd::checkout,
            // Tickets
            commands::ticket_cmd::create_ticket,
            commands::ticket_cmd::load_tickets,
            commands::ticket_cmd::load_more_tickets,
            commands::ticket_cmd::search_tickets,
            commands::ticket_cmd::get_ticket,
            commands::ticket_cmd::start_repair,
            commands::ticket_cmd::complete_repair,
            commands::ticket_cmd::mark_ticket_paid,
            commands::ticket_cmd::set_service_charge,
            commands::ticket_cmd::attach_part,
            commands::ticket_cmd::attach_repair,
            commands::ticket_cmd::remove_ticket_item,
            commands::ticket_cmd::assign_technician,
            commands::ticket_cmd::track_ticket,
            // Parts & repairs
            commands::part_cmd::get_parts,
            commands::part_cmd::create_part,
            commands::part_cmd::update_part,
            commands::part_cmd::delete_part,
            commands::repair_cmd::get_repairs,
            commands::repair_cmd::create_repair,
            commands::repair_cmd::update_repair,
            commands::repair_cmd::delete_repair,
            // Invoices & returns
            commands::invoice_cmd::get_invoices,
            commands::invoice_cmd::get_invoice,
            commands::invoice_cmd::create_return,
            commands::invoice_cmd::get_returned_items,
            // Users
            commands::user_cmd::get_users,
            commands::user_cmd::create_user,
            commands::user_cmd::update_user,
            commands::user_cmd::toggle_user_status,
            // Dashboard
            commands::dashboard_cmd::get_dashboard_summary,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
