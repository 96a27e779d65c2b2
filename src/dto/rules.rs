//! Field rules shared by the customer and product forms.

use rust_decimal::Decimal;
use validator::ValidationError;

pub fn no_digits(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("no_digits");
        err.message = Some("must not contain numbers".into());
        return Err(err);
    }
    Ok(())
}

pub fn digits_only(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("digits_only");
        err.message = Some("must contain only digits".into());
        return Err(err);
    }
    Ok(())
}

/// Price is never negative and never more than 500.00.
pub fn price_bounds(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("price_negative");
        err.message = Some("price is never negative".into());
        return Err(err);
    }
    if *value > Decimal::from(500) {
        let mut err = ValidationError::new("price_cap");
        err.message = Some("price is never more than 500.00".into());
        return Err(err);
    }
    Ok(())
}

pub fn unit_not_zero(value: &str) -> Result<(), ValidationError> {
    if value == "0" {
        let mut err = ValidationError::new("unit_zero");
        err.message = Some("unit cannot be zero".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_rejected_in_names() {
        assert!(no_digits("Acme Traders").is_ok());
        assert!(no_digits("Acme 2").is_err());
    }

    #[test]
    fn postal_codes_are_digits_only() {
        assert!(digits_only("75001").is_ok());
        assert!(digits_only("7500a").is_err());
        assert!(digits_only("").is_err());
    }

    #[test]
    fn price_is_bounded() {
        assert!(price_bounds(&"0".parse().unwrap()).is_ok());
        assert!(price_bounds(&"500".parse().unwrap()).is_ok());
        assert!(price_bounds(&"500.01".parse().unwrap()).is_err());
        assert!(price_bounds(&"-0.01".parse().unwrap()).is_err());
    }

    #[test]
    fn unit_zero_is_rejected() {
        assert!(unit_not_zero("bottle").is_ok());
        assert!(unit_not_zero("0").is_err());
    }
}
