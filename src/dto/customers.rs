use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Customer;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(
        length(min = 3, message = "customer name must be at least 3 characters long"),
        custom(function = "crate::dto::rules::no_digits")
    )]
    pub name: String,
    #[validate(length(min = 3, message = "contact name must be at least 3 characters long"))]
    pub contact_name: String,
    #[validate(length(min = 1, message = "address cannot be empty"))]
    pub address: String,
    #[validate(length(min = 2, message = "city must be at least 2 characters long"))]
    pub city: String,
    #[validate(
        length(min = 5, max = 9, message = "postal code must be 5 to 9 digits"),
        custom(function = "crate::dto::rules::digits_only")
    )]
    pub postal_code: String,
    #[validate(length(min = 2, message = "country must be at least 2 characters long"))]
    pub country: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(
        length(min = 3, message = "customer name must be at least 3 characters long"),
        custom(function = "crate::dto::rules::no_digits")
    )]
    pub name: Option<String>,
    #[validate(length(min = 3, message = "contact name must be at least 3 characters long"))]
    pub contact_name: Option<String>,
    #[validate(length(min = 1, message = "address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 2, message = "city must be at least 2 characters long"))]
    pub city: Option<String>,
    #[validate(
        length(min = 5, max = 9, message = "postal code must be 5 to 9 digits"),
        custom(function = "crate::dto::rules::digits_only")
    )]
    pub postal_code: Option<String>,
    #[validate(length(min = 2, message = "country must be at least 2 characters long"))]
    pub country: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerList {
    pub items: Vec<Customer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreateCustomerRequest {
        CreateCustomerRequest {
            name: "Acme Traders".into(),
            contact_name: "Jo Doe".into(),
            address: "1 Main St".into(),
            city: "Lyon".into(),
            postal_code: "69001".into(),
            country: "France".into(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn name_with_digits_fails() {
        let mut form = valid();
        form.name = "Acme 2".into();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn postal_code_rules() {
        let mut form = valid();
        form.postal_code = "69A01".into();
        assert!(form.validate().is_err());
        form.postal_code = "123".into();
        assert!(form.validate().is_err());
        form.postal_code = "1234567890".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn update_validates_only_present_fields() {
        let form = UpdateCustomerRequest {
            name: None,
            contact_name: None,
            address: None,
            city: Some("L".into()),
            postal_code: None,
            country: None,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("city"));
        assert_eq!(errors.field_errors().len(), 1);
    }
}
