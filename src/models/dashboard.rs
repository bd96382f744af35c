use serde::{Deserialize, Serialize};

/// Aggregate metrics for the admin dashboard. Chart rendering happens in the
/// webview; this is the data behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_sales: f64,
    pub invoice_count: i64,
    pub ticket_count: i64,
    pub open_tickets: i64,
    pub in_progress_tickets: i64,
    pub completed_tickets: i64,
    #[serde(default)]
    pub daily_sales: Vec<SalesPoint>,
}

/// One point on the daily sales chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: String,
    pub revenue: f64,
    pub count: i64,
}
