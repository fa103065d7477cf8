//! Total coercion of untrusted GraphQL payloads into typed entities.
//!
//! Every inbound payload passes through these functions before it reaches the
//! store, so server schema drift degrades to default values instead of
//! failing a whole screen. Coercion is total: no function here panics or
//! returns an error.
//!
//! | Target | Accepted | Fallback |
//! |--------|----------|----------|
//! | string | string, number, bool | `""` |
//! | optional string | same as string | `None` for null/missing |
//! | decimal | number, numeric string | `0` |
//! | quantity | finite number, numeric string (truncated, floored at 0) | `0` |
//! | list | array | empty |
//! | optional relation | object | `None` |

mod account;
mod cart;
mod catalog;
mod cms;
mod order;

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

pub use account::{
    normalize_address, normalize_addresses, normalize_auth_payload, normalize_profile_update,
    normalize_user, normalize_user_context,
};
pub use cart::{normalize_cart, normalize_cart_item, normalize_wishlist};
pub use catalog::{
    normalize_categories, normalize_category, normalize_image, normalize_product,
    normalize_product_detail, normalize_products, normalize_review, normalize_reviews,
};
pub use cms::{normalize_cms_page, normalize_cms_pages};
pub use order::{normalize_order, normalize_orders, normalize_payment};

static NULL: Value = Value::Null;

/// Look up `key` on an object, yielding `Null` for anything else.
#[must_use]
pub fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

/// Elements of an array, or an empty slice.
#[must_use]
pub fn list(value: &Value) -> &[Value] {
    value.as_array().map_or(&[], Vec::as_slice)
}

/// Whether the value is usable as a nested record.
#[must_use]
pub fn is_record(value: &Value) -> bool {
    value.is_object()
}

/// Coerce to a string: strings as-is, scalars rendered, everything else `""`.
#[must_use]
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Coerce to an optional string. Null and missing become `None`.
#[must_use]
pub fn coerce_optional_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Some(coerce_string(value)),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerce to a decimal. Unparsable or out-of-range input becomes zero.
#[must_use]
pub fn coerce_decimal(value: &Value) -> Decimal {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Decimal::ZERO,
    };
    parse_decimal(&text).unwrap_or(Decimal::ZERO)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

/// Coerce to a non-negative integer quantity.
///
/// Fractions are truncated toward zero, negatives become zero and values
/// beyond `u32::MAX` saturate.
#[must_use]
pub fn coerce_quantity(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) if f.is_finite() && f > 0.0 => {
            if f >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                // Bounds checked above.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let whole = f.trunc() as u32;
                whole
            }
        }
        _ => 0,
    }
}
