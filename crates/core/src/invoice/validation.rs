//! Validation of invoice input.

use rust_decimal::Decimal;
use vatdesk_shared::types::{Nip, NipError};

use super::types::{InvoiceDirection, NewInvoice, NewInvoiceInput};
use crate::validation::{FieldErrors, Validated, not_blank, printable};

/// Validates raw invoice input.
///
/// Rules: number, NIP and counterparty name are required; the NIP must be
/// exactly 10 digits after stripping `-` and spaces; number and name must not
/// contain control characters; net and tax amounts must be positive; the
/// issue date is required. A missing direction means sale.
pub fn validate_new_invoice(input: NewInvoiceInput) -> Validated<NewInvoice> {
    let mut errors = FieldErrors::new();

    errors.check(
        not_blank(&input.number),
        "number",
        "Invoice number must not be blank.",
    );
    errors.check(
        printable(input.number.trim()),
        "number",
        "Invoice number must not contain control characters.",
    );

    let nip = match Nip::parse(&input.counterparty_nip) {
        Ok(nip) => Some(nip),
        Err(NipError::Blank) => {
            errors.add("nip", "NIP must not be blank.");
            None
        }
        Err(NipError::Length(_)) => {
            errors.add("nip", "NIP must have 10 digits.");
            None
        }
        Err(NipError::NonDigit) => {
            errors.add("nip", "NIP must consist of digits only.");
            None
        }
    };

    errors.check(
        not_blank(&input.counterparty_name),
        "counterparty_name",
        "Company name must not be blank.",
    );
    errors.check(
        printable(input.counterparty_name.trim()),
        "counterparty_name",
        "Company name must not contain control characters.",
    );
    errors.check(
        input.net_amount > Decimal::ZERO,
        "net_amount",
        "Net amount must be greater than zero.",
    );
    errors.check(
        input.tax_amount > Decimal::ZERO,
        "tax_amount",
        "Tax amount must be greater than zero.",
    );
    errors.check(
        input.issue_date.is_some(),
        "issue_date",
        "Issue date is required.",
    );

    match (nip, input.issue_date) {
        (Some(counterparty_nip), Some(issue_date)) if errors.is_empty() => Ok(NewInvoice {
            number: input.number.trim().to_string(),
            counterparty_nip,
            counterparty_name: input.counterparty_name.trim().to_string(),
            net_amount: input.net_amount,
            tax_amount: input.tax_amount,
            issue_date,
            direction: input.direction.unwrap_or(InvoiceDirection::Sale),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn valid_input() -> NewInvoiceInput {
        NewInvoiceInput {
            number: " FV/1/05/2024 ".to_string(),
            counterparty_nip: "526-025-02-74".to_string(),
            counterparty_name: "Acme S.A.".to_string(),
            net_amount: dec!(1000.00),
            tax_amount: dec!(230.00),
            issue_date: NaiveDate::from_ymd_opt(2024, 5, 2),
            direction: Some(InvoiceDirection::Purchase),
        }
    }

    #[test]
    fn test_valid_input() {
        let invoice = validate_new_invoice(valid_input()).unwrap();
        assert_eq!(invoice.number, "FV/1/05/2024");
        assert_eq!(invoice.counterparty_nip.as_str(), "5260250274");
        assert_eq!(invoice.direction, InvoiceDirection::Purchase);
    }

    #[test]
    fn test_missing_direction_defaults_to_sale() {
        let input = NewInvoiceInput {
            direction: None,
            ..valid_input()
        };
        assert_eq!(
            validate_new_invoice(input).unwrap().direction,
            InvoiceDirection::Sale
        );
    }

    #[rstest]
    #[case("", "NIP must not be blank.")]
    #[case("12345", "NIP must have 10 digits.")]
    #[case("12345678AB", "NIP must consist of digits only.")]
    fn test_invalid_nip(#[case] nip: &str, #[case] message: &str) {
        let input = NewInvoiceInput {
            counterparty_nip: nip.to_string(),
            ..valid_input()
        };
        let errors = validate_new_invoice(input).unwrap_err();
        assert_eq!(errors.get("nip"), Some(message));
        assert_eq!(errors.len(), 1);
    }

    #[rstest]
    #[case("FV/\u{1}1", "Acme S.A.", "number", "Invoice number must not contain control characters.")]
    #[case("FV/1", "Acme\u{1}S.A.", "counterparty_name", "Company name must not contain control characters.")]
    #[case("FV/1", "Acme\nS.A.", "counterparty_name", "Company name must not contain control characters.")]
    fn test_control_characters_rejected(
        #[case] number: &str,
        #[case] name: &str,
        #[case] field: &str,
        #[case] message: &str,
    ) {
        let input = NewInvoiceInput {
            number: number.to_string(),
            counterparty_name: name.to_string(),
            ..valid_input()
        };
        let errors = validate_new_invoice(input).unwrap_err();
        assert_eq!(errors.get(field), Some(message));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_edge_whitespace_is_trimmed_not_rejected() {
        let input = NewInvoiceInput {
            counterparty_name: "\t Acme S.A.\n".to_string(),
            ..valid_input()
        };
        let invoice = validate_new_invoice(input).unwrap();
        assert_eq!(invoice.counterparty_name, "Acme S.A.");
    }

    #[test]
    fn test_collects_errors_in_field_order() {
        let input = NewInvoiceInput {
            number: "  ".to_string(),
            counterparty_nip: "6793194113".to_string(),
            counterparty_name: String::new(),
            net_amount: Decimal::ZERO,
            tax_amount: dec!(-1),
            issue_date: None,
            direction: None,
        };
        let errors = validate_new_invoice(input).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "number",
                "counterparty_name",
                "net_amount",
                "tax_amount",
                "issue_date"
            ]
        );
    }
}
