//! Sales-outlet browsing state.
//!
//! The outlet keeps the full stock list fetched once, and a filtered view
//! recomputed whenever the category, subcategory or search term changes.
//! The top-level switch is a fixed binary: Phones (category id 1) vs
//! Accessories (category id 2); subcategory selection only applies under
//! Accessories.
//!
//! A non-empty search goes to the server (the endpoint is not
//! category-scoped, so results are post-filtered by the selected top-level
//! category). Responses carry a sequence number and are dropped when a newer
//! request has been issued since. Clearing the term restores the filtered
//! cached list with no API call, and a failed server search degrades to a
//! substring filter over the cache.

use crate::models::stock::Stock;

pub const PHONES_CATEGORY_ID: i64 = 1;
pub const ACCESSORIES_CATEGORY_ID: i64 = 2;

/// Fixed top-level category switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutletCategory {
    Phones,
    Accessories,
}

impl OutletCategory {
    pub fn category_id(&self) -> i64 {
        match self {
            OutletCategory::Phones => PHONES_CATEGORY_ID,
            OutletCategory::Accessories => ACCESSORIES_CATEGORY_ID,
        }
    }
}

impl Default for OutletCategory {
    fn default() -> Self {
        OutletCategory::Phones
    }
}

#[derive(Debug, Default)]
pub struct OutletBrowser {
    /// Full stock list fetched once.
    stocks: Vec<Stock>,
    /// Filtered view presented to the webview.
    pub visible: Vec<Stock>,
    pub category: OutletCategory,
    pub subcategory: Option<i64>,
    pub search: String,
    latest_request: u64,
}

impl OutletBrowser {
    /// Replace the cached full list and recompute the view.
    pub fn set_stocks(&mut self, stocks: Vec<Stock>) {
        self.stocks = stocks;
        self.refilter();
    }

    pub fn select_category(&mut self, category: OutletCategory) {
        self.category = category;
        if category == OutletCategory::Phones {
            // subcategories only exist under Accessories
            self.subcategory = None;
        }
        self.refilter();
    }

    pub fn select_subcategory(&mut self, subcategory: Option<i64>) {
        if self.category == OutletCategory::Accessories {
            self.subcategory = subcategory;
        }
        self.refilter();
    }

    /// Register a search term. Returns the request sequence for a non-empty
    /// term; an empty term takes the local path (no API call) and returns
    /// `None`.
    pub fn set_search_term(&mut self, term: &str) -> Option<u64> {
        self.search = term.trim().to_string();
        // any in-flight response belongs to a superseded term
        self.latest_request += 1;

        if self.search.is_empty() {
            self.refilter();
            return None;
        }

        Some(self.latest_request)
    }

    /// Apply server search results if they belong to the latest request,
    /// post-filtering by the selected top-level category.
    pub fn apply_search_results(&mut self, seq: u64, results: Vec<Stock>) -> bool {
        if seq != self.latest_request {
            return false;
        }
        self.visible = results
            .into_iter()
            .filter(|s| self.matches_category(s))
            .collect();
        true
    }

    /// Degraded search path: substring filter over the cached list. Used
    /// when the server search fails.
    pub fn apply_search_fallback(&mut self, seq: u64) -> bool {
        if seq != self.latest_request {
            return false;
        }
        let term = self.search.to_lowercase();
        self.visible = self
            .stocks
            .iter()
            .filter(|s| self.matches_category(s))
            .filter(|s| s.display_name().to_lowercase().contains(&term))
            .cloned()
            .collect();
        true
    }

    fn matches_category(&self, stock: &Stock) -> bool {
        let Some(product) = stock.product.as_ref() else {
            return false;
        };

        if product.device_category_id != self.category.category_id() {
            return false;
        }

        if self.category == OutletCategory::Accessories {
            if let Some(sub) = self.subcategory {
                return product.device_subcategory_id == Some(sub);
            }
        }

        true
    }

    /// Recompute the view from the cached list (category/subcategory only).
    fn refilter(&mut self) {
        self.visible = self
            .stocks
            .iter()
            .filter(|s| self.matches_category(s))
            .cloned()
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::{Product, ProductStatus};
    use crate::models::stock::StockCondition;

    fn stock(id: i64, name: &str, category_id: i64, subcategory_id: Option<i64>) -> Stock {
        Stock {
            id,
            product_id: id,
            serial_number: None,
            quantity: 5,
            cost_price: 50.0,
            selling_price: 100.0,
            condition: StockCondition::New,
            color: None,
            product: Some(Product {
                id,
                name: name.into(),
                description: None,
                image: None,
                status: ProductStatus::Active,
                device_category_id: category_id,
                device_subcategory_id: subcategory_id,
            }),
        }
    }

    fn browser() -> OutletBrowser {
        let mut b = OutletBrowser::default();
        b.set_stocks(vec![
            stock(1, "iPhone 12", PHONES_CATEGORY_ID, None),
            stock(2, "iPhone 13", PHONES_CATEGORY_ID, None),
            stock(3, "Lightning Cable", ACCESSORIES_CATEGORY_ID, Some(7)),
            stock(4, "Charger Brick", ACCESSORIES_CATEGORY_ID, Some(8)),
        ]);
        b
    }

    #[test]
    fn defaults_to_phones_view() {
        let b = browser();
        assert_eq!(b.visible.len(), 2);
        assert!(b.visible.iter().all(|s| s.product.as_ref().unwrap().device_category_id == 1));
    }

    #[test]
    fn subcategory_only_applies_under_accessories() {
        let mut b = browser();
        b.select_subcategory(Some(7));
        // ignored under Phones
        assert_eq!(b.visible.len(), 2);

        b.select_category(OutletCategory::Accessories);
        b.select_subcategory(Some(7));
        assert_eq!(b.visible.len(), 1);
        assert_eq!(b.visible[0].id, 3);

        // switching back to Phones clears the subcategory
        b.select_category(OutletCategory::Phones);
        assert_eq!(b.subcategory, None);
    }

    #[test]
    fn empty_term_restores_local_view_without_api_call() {
        let mut b = browser();
        let seq = b.set_search_term("iphone 12").unwrap();
        b.apply_search_results(seq, vec![stock(1, "iPhone 12", PHONES_CATEGORY_ID, None)]);
        assert_eq!(b.visible.len(), 1);

        assert_eq!(b.set_search_term(""), None);
        assert_eq!(b.visible.len(), 2);
    }

    #[test]
    fn cleared_search_is_not_overridden_by_inflight_response() {
        let mut b = browser();
        let seq = b.set_search_term("iphone 12").unwrap();

        // operator clears the box before the response lands
        assert_eq!(b.set_search_term(""), None);
        assert_eq!(b.visible.len(), 2);

        assert!(!b.apply_search_results(seq, vec![stock(1, "iPhone 12", PHONES_CATEGORY_ID, None)]));
        assert_eq!(b.visible.len(), 2);
    }

    #[test]
    fn server_results_are_post_filtered_by_category() {
        let mut b = browser();
        let seq = b.set_search_term("i").unwrap();
        // endpoint is not category-scoped: it may return accessories too
        let applied = b.apply_search_results(
            seq,
            vec![
                stock(1, "iPhone 12", PHONES_CATEGORY_ID, None),
                stock(3, "Lightning Cable", ACCESSORIES_CATEGORY_ID, Some(7)),
            ],
        );
        assert!(applied);
        assert_eq!(b.visible.len(), 1);
        assert_eq!(b.visible[0].id, 1);
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut b = browser();
        let first = b.set_search_term("iphone").unwrap();
        let second = b.set_search_term("iphone 13").unwrap();

        assert!(b.apply_search_results(second, vec![stock(2, "iPhone 13", 1, None)]));
        assert!(!b.apply_search_results(first, vec![stock(1, "iPhone 12", 1, None)]));
        assert_eq!(b.visible[0].id, 2);
    }

    #[test]
    fn failed_search_falls_back_to_cached_substring_filter() {
        let mut b = browser();
        let seq = b.set_search_term("iphone 13").unwrap();
        assert!(b.apply_search_fallback(seq));
        assert_eq!(b.visible.len(), 1);
        assert_eq!(b.visible[0].id, 2);
    }
}
