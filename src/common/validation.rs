// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// `validator` não tem range() para Decimal; validador manual compartilhado
// pelos payloads de produto e de movimentação.
pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejeita_apenas_valores_negativos() {
        assert!(validate_not_negative(&dec!(-0.01)).is_err());
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&dec!(10.50)).is_ok());
    }
}
