use serde_json::Value;

use crate::types::{Order, OrderId, OrderProductSummary, Payment, PaymentId, ProductId, UserId};

use super::{
    coerce_decimal, coerce_optional_string, coerce_quantity, coerce_string, field, list,
};

fn normalize_order_product(value: &Value) -> OrderProductSummary {
    OrderProductSummary {
        product_id: ProductId::from(coerce_string(field(value, "productId"))),
        quantity: coerce_quantity(field(value, "quantity")),
        price: coerce_decimal(field(value, "price")),
    }
}

/// Normalize an order record.
#[must_use]
pub fn normalize_order(value: &Value) -> Order {
    Order {
        id: OrderId::from(coerce_string(field(value, "id"))),
        user_id: UserId::from(coerce_string(field(value, "userId"))),
        total: coerce_decimal(field(value, "total")),
        status: coerce_string(field(value, "status")),
        created_at: coerce_optional_string(field(value, "createdAt")),
        updated_at: coerce_optional_string(field(value, "updatedAt")),
        products: list(field(value, "products"))
            .iter()
            .map(normalize_order_product)
            .collect(),
    }
}

/// Normalize a list of orders.
#[must_use]
pub fn normalize_orders(value: &Value) -> Vec<Order> {
    list(value).iter().map(normalize_order).collect()
}

/// Normalize a payment. The method is read from `method`, falling back to
/// `provider`.
#[must_use]
pub fn normalize_payment(value: &Value) -> Payment {
    let method = coerce_optional_string(field(value, "method"))
        .or_else(|| coerce_optional_string(field(value, "provider")))
        .unwrap_or_default();
    Payment {
        id: PaymentId::from(coerce_string(field(value, "id"))),
        order_id: OrderId::from(coerce_string(field(value, "orderId"))),
        amount: coerce_decimal(field(value, "amount")),
        method,
        status: coerce_string(field(value, "status")),
        created_at: coerce_optional_string(field(value, "createdAt")),
        updated_at: coerce_optional_string(field(value, "updatedAt")),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_normalize_order() {
        let order = normalize_order(&json!({
            "id": "o1",
            "userId": "u1",
            "total": 20.5,
            "status": "PENDING",
            "products": [{"productId": "p1", "quantity": 2, "price": 10.25}]
        }));
        assert_eq!(order.total, Decimal::new(205, 1));
        assert_eq!(order.products.len(), 1);
        assert_eq!(order.products[0].subtotal(), order.total);
        assert_eq!(order.created_at, None);
    }

    #[test]
    fn test_normalize_orders_garbage() {
        let orders = normalize_orders(&json!([null, 5, {"status": 3}]));
        assert_eq!(orders.len(), 3);
        assert_eq!(orders[2].status, "3");
        assert!(orders[0].products.is_empty());
    }

    #[test]
    fn test_payment_method_fallback() {
        let payment = normalize_payment(&json!({"provider": "stripe", "amount": "12"}));
        assert_eq!(payment.method, "stripe");
        assert_eq!(payment.amount, Decimal::from(12));
    }
}
