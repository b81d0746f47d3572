//! Fixed payloads compiled into the server.
//!
//! Every endpoint answers from these records. Nothing here is ever mutated,
//! so handlers read them without synchronization.

use once_cell::sync::Lazy;

use crate::types::{
    Analytics, ApiError, Order, OrderStatus, OrdersResponse, Product, ProductsResponse, UserV1,
    UserV2, UsersV1Response, UsersV2Response,
};

/// Error code carried by the simulated database failure
pub const DB_TIMEOUT_CODE: &str = "DB_TIMEOUT";
pub const DB_TIMEOUT_MESSAGE: &str = "Database connection timeout";

static USERS: Lazy<Vec<UserV1>> = Lazy::new(|| {
    vec![
        UserV1 {
            id: 1,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
            role: "admin".to_string(),
        },
        UserV1 {
            id: 2,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
            role: "user".to_string(),
        },
    ]
});

static USERS_V1: Lazy<UsersV1Response> = Lazy::new(|| UsersV1Response {
    version: "v1".to_string(),
    users: USERS.clone(),
});

static USERS_V2: Lazy<UsersV2Response> = Lazy::new(|| UsersV2Response {
    version: "v2".to_string(),
    data: USERS.iter().map(UserV2::from).collect(),
});

static PRODUCTS: Lazy<ProductsResponse> = Lazy::new(|| ProductsResponse {
    products: vec![
        Product {
            id: 101,
            title: "Laptop Pro".to_string(),
            price: 1299,
            stock: 15,
        },
        Product {
            id: 102,
            title: "Wireless Mouse".to_string(),
            price: 29,
            stock: 150,
        },
    ],
});

static ORDERS: Lazy<OrdersResponse> = Lazy::new(|| OrdersResponse {
    orders: vec![
        Order {
            order_id: "ORD-001".to_string(),
            status: OrderStatus::Shipped,
            total: 156.99,
        },
        Order {
            order_id: "ORD-002".to_string(),
            status: OrderStatus::Pending,
            total: 89.50,
        },
    ],
});

static ANALYTICS: Analytics = Analytics {
    page_views: 45231,
    unique_visitors: 12304,
    conversion_rate: 3.2,
    avg_session_duration: 245,
};

static DB_TIMEOUT: Lazy<ApiError> = Lazy::new(|| ApiError {
    error: DB_TIMEOUT_MESSAGE.to_string(),
    code: DB_TIMEOUT_CODE.to_string(),
});

pub fn users_v1() -> &'static UsersV1Response {
    &USERS_V1
}

/// Same people as [`users_v1`], in the breaking v2 shape
pub fn users_v2() -> &'static UsersV2Response {
    &USERS_V2
}

pub fn products() -> &'static ProductsResponse {
    &PRODUCTS
}

pub fn orders() -> &'static OrdersResponse {
    &ORDERS
}

pub fn analytics() -> &'static Analytics {
    &ANALYTICS
}

pub fn db_timeout() -> &'static ApiError {
    &DB_TIMEOUT
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn field_names(value: &serde_json::Value) -> BTreeSet<String> {
        value
            .as_object()
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_v1_and_v2_users_share_no_fields() {
        let v1 = serde_json::to_value(users_v1()).unwrap();
        let v2 = serde_json::to_value(users_v2()).unwrap();

        let v1_users = v1["users"].as_array().unwrap();
        let v2_users = v2["data"].as_array().unwrap();
        assert_eq!(v1_users.len(), 2);
        assert_eq!(v2_users.len(), 2);

        for (a, b) in v1_users.iter().zip(v2_users) {
            let a = field_names(a);
            let b = field_names(b);
            assert!(a.is_disjoint(&b), "shared fields: {:?}", a.intersection(&b));
        }
    }

    #[test]
    fn test_v2_describes_same_people() {
        for (a, b) in users_v1().users.iter().zip(&users_v2().data) {
            assert_eq!(a.id, b.user_id);
            assert_eq!(a.name, b.full_name);
            assert_eq!(a.email, b.contact);
            assert_eq!(a.role, b.user_role);
        }
    }

    #[test]
    fn test_products_wire_shape() {
        let json = serde_json::to_value(products()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "products": [
                    { "id": 101, "title": "Laptop Pro", "price": 1299, "stock": 15 },
                    { "id": 102, "title": "Wireless Mouse", "price": 29, "stock": 150 }
                ]
            })
        );
    }

    #[test]
    fn test_analytics_wire_shape() {
        let json = serde_json::to_value(analytics()).unwrap();
        assert_eq!(json["pageViews"], 45231);
        assert_eq!(json["uniqueVisitors"], 12304);
        assert_eq!(json["conversionRate"], 3.2);
        assert_eq!(json["avgSessionDuration"], 245);
    }

    #[test]
    fn test_db_timeout_body() {
        let json = serde_json::to_value(db_timeout()).unwrap();
        assert_eq!(json["code"], "DB_TIMEOUT");
        assert_eq!(json["error"], "Database connection timeout");
    }
}
