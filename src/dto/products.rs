use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Product;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(
        length(min = 3, max = 50, message = "product name must be 3 to 50 characters long"),
        custom(function = "crate::dto::rules::no_digits")
    )]
    pub name: String,
    pub category_id: Uuid,
    #[validate(
        length(min = 1, message = "unit cannot be empty"),
        custom(function = "crate::dto::rules::unit_not_zero")
    )]
    pub unit: String,
    #[validate(custom(function = "crate::dto::rules::price_bounds"))]
    pub price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(
        length(min = 3, max = 50, message = "product name must be 3 to 50 characters long"),
        custom(function = "crate::dto::rules::no_digits")
    )]
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    #[validate(
        length(min = 1, message = "unit cannot be empty"),
        custom(function = "crate::dto::rules::unit_not_zero")
    )]
    pub unit: Option<String>,
    #[validate(custom(function = "crate::dto::rules::price_bounds"))]
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreateProductRequest {
        CreateProductRequest {
            name: "Chai".into(),
            category_id: Uuid::new_v4(),
            unit: "10 boxes x 20 bags".into(),
            price: "18.00".parse().unwrap(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn price_over_cap_fails() {
        let mut form = valid();
        form.price = "500.01".parse().unwrap();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn short_name_fails() {
        let mut form = valid();
        form.name = "Ch".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn unit_zero_fails() {
        let mut form = valid();
        form.unit = "0".into();
        assert!(form.validate().is_err());
    }
}
