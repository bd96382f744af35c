//! Input validation module
//!
//! Centralized pre-flight validation for:
//! - Customer details (names, contact numbers, emails)
//! - Financial data (prices, quantities)
//! - Device identifiers (IMEI, serial numbers)
//! - File paths for image uploads
//!
//! Every validator runs before any request is sent; a failure here means
//! the API is never called.

/// Validation result type
pub type ValidationResult = Result<(), String>;

/// Validate a customer/person name
/// - Length: 2-100 characters
/// - Allowed: letters, spaces, basic punctuation
pub fn validate_name(name: &str) -> ValidationResult {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("Name is required".into());
    }

    if trimmed.len() < 2 || trimmed.len() > 100 {
        return Err("Name must be 2-100 characters".into());
    }

    if !trimmed
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || ".-'".contains(c))
    {
        return Err("Name may only contain letters, spaces, and .-'".into());
    }

    Ok(())
}

/// Validate a checkout/ticket contact number: exactly 10 digits.
pub fn validate_contact_number(contact: &str) -> ValidationResult {
    let trimmed = contact.trim();

    if trimmed.is_empty() {
        return Err("Contact number is required".into());
    }

    if trimmed.len() != 10 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid contact number format".into());
    }

    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> ValidationResult {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err("Email is required".into());
    }

    if trimmed.len() > 254 {
        return Err("Email is too long (max 254 characters)".into());
    }

    let parts: Vec<&str> = trimmed.split('@').collect();
    if parts.len() != 2 {
        return Err("Invalid email format".into());
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || local.len() > 64 {
        return Err("Invalid email format".into());
    }

    if !domain.contains('.') {
        return Err("Invalid email domain".into());
    }

    Ok(())
}

/// Validate an IMEI: required non-empty, digits only, up to 17 characters.
pub fn validate_imei(imei: &str) -> ValidationResult {
    let trimmed = imei.trim();

    if trimmed.is_empty() {
        return Err("IMEI is required".into());
    }

    if trimmed.len() > 17 {
        return Err("IMEI is too long (max 17 characters)".into());
    }

    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err("IMEI may only contain digits".into());
    }

    Ok(())
}

/// Validate a stock serial number. Optional unless `required` is set
/// (serialized categories such as phones).
pub fn validate_serial_number(serial: &str, required: bool) -> ValidationResult {
    let trimmed = serial.trim();

    if trimmed.is_empty() {
        if required {
            return Err("Serial number is required for this category".into());
        }
        return Ok(());
    }

    if trimmed.len() > 50 {
        return Err("Serial number is too long (max 50 characters)".into());
    }

    if !trimmed.chars().all(|c| c.is_alphanumeric() || "-/".contains(c)) {
        return Err("Serial number may only contain letters, digits, - and /".into());
    }

    Ok(())
}

/// Validate a monetary amount
pub fn validate_amount(amount: f64, min: Option<f64>, max: Option<f64>) -> ValidationResult {
    if amount.is_nan() || amount.is_infinite() {
        return Err("Invalid amount".into());
    }

    let min_val = min.unwrap_or(0.0);
    let max_val = max.unwrap_or(10_000_000.0);

    if amount < min_val {
        return Err(format!("Amount must be at least {:.2}", min_val));
    }

    if amount > max_val {
        return Err(format!("Amount must be at most {:.2}", max_val));
    }

    Ok(())
}

/// Validate a stock/part/cart quantity
pub fn validate_quantity(qty: i64, min: Option<i64>, max: Option<i64>) -> ValidationResult {
    if qty < 0 {
        return Err("Quantity cannot be negative".into());
    }

    let min_val = min.unwrap_or(0);
    let max_val = max.unwrap_or(100_000);

    if qty < min_val {
        return Err(format!("Quantity must be at least {}", min_val));
    }

    if qty > max_val {
        return Err(format!("Quantity must be at most {}", max_val));
    }

    Ok(())
}

/// Validate a stock price pair: cost price must be below selling price.
pub fn validate_stock_prices(cost_price: f64, selling_price: f64) -> ValidationResult {
    validate_amount(cost_price, Some(0.0), None)?;
    validate_amount(selling_price, Some(0.0), None)?;

    if cost_price >= selling_price {
        return Err("Cost price must be less than selling price".into());
    }

    Ok(())
}

/// Validate a part price pair: selling price must exceed unit price.
pub fn validate_part_prices(unit_price: f64, selling_price: f64) -> ValidationResult {
    validate_amount(unit_price, Some(0.0), None)?;
    validate_amount(selling_price, Some(0.0), None)?;

    if selling_price <= unit_price {
        return Err("Selling price must be greater than unit price".into());
    }

    Ok(())
}

/// Validate a product/part/repair name
pub fn validate_item_name(name: &str) -> ValidationResult {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("Name is required".into());
    }

    if trimmed.len() < 2 || trimmed.len() > 200 {
        return Err("Name must be 2-200 characters".into());
    }

    Ok(())
}

/// Validate notes/description fields
pub fn validate_notes(notes: &str) -> ValidationResult {
    if notes.is_empty() {
        return Ok(()); // optional
    }

    if notes.len() > 1000 {
        return Err("Text is too long (max 1000 characters)".into());
    }

    Ok(())
}

/// Validate a local file path for image uploads (security check)
pub fn validate_file_path(path: &str) -> ValidationResult {
    if path.is_empty() {
        return Err("File path is required".into());
    }

    // Prevent path traversal
    if path.contains("..") {
        return Err("Invalid file path".into());
    }

    if path.contains('\0') {
        return Err("Invalid file path".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_number_requires_exactly_ten_digits() {
        assert!(validate_contact_number("0771234567").is_ok());
        assert_eq!(
            validate_contact_number("12345").unwrap_err(),
            "Invalid contact number format"
        );
        assert!(validate_contact_number("07712345678").is_err()); // 11 digits
        assert!(validate_contact_number("077123456a").is_err());
        assert!(validate_contact_number("").is_err());
    }

    #[test]
    fn cost_price_must_be_below_selling_price() {
        assert!(validate_stock_prices(100.0, 150.0).is_ok());
        assert_eq!(
            validate_stock_prices(100.0, 90.0).unwrap_err(),
            "Cost price must be less than selling price"
        );
        // equal prices are rejected too
        assert!(validate_stock_prices(100.0, 100.0).is_err());
    }

    #[test]
    fn part_selling_price_must_exceed_unit_price() {
        assert!(validate_part_prices(50.0, 80.0).is_ok());
        assert!(validate_part_prices(80.0, 50.0).is_err());
        assert!(validate_part_prices(50.0, 50.0).is_err());
    }

    #[test]
    fn serial_number_required_only_for_serialized_categories() {
        assert!(validate_serial_number("", false).is_ok());
        assert!(validate_serial_number("", true).is_err());
        assert!(validate_serial_number("SN-123/A", true).is_ok());
        assert!(validate_serial_number("bad serial!", true).is_err());
    }

    #[test]
    fn imei_rejects_non_digits_and_empty() {
        assert!(validate_imei("356938035643809").is_ok());
        assert!(validate_imei("").is_err());
        assert!(validate_imei("35693-8035").is_err());
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("John O'Neil").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("A").is_err());
    }

    #[test]
    fn file_path_rejects_traversal() {
        assert!(validate_file_path("/tmp/photo.jpg").is_ok());
        assert!(validate_file_path("../etc/passwd").is_err());
        assert!(validate_file_path("").is_err());
    }
}
