//! Assembly of a declaration from an aggregation.

use chrono::{DateTime, Utc};
use vatdesk_shared::config::FilerConfig;

use super::constants;
use super::types::{
    ControlTotals, Declaration, DeclarationForm, DeclarationFormCode, Filer, FilerIdentity,
    FormCode, FormFields, Header, Ledger, SubmissionPurpose,
};
use crate::period::YearMonth;
use crate::vat::Aggregation;

/// Builds declarations for one filing entity.
///
/// The builder never reads the wall clock: both the declared period and the
/// generation timestamp are arguments, so equal inputs give equal documents.
#[derive(Debug, Clone)]
pub struct DeclarationBuilder {
    filer: FilerIdentity,
    tax_office_code: u16,
}

impl DeclarationBuilder {
    /// Creates a builder for the given filer and tax office.
    #[must_use]
    pub const fn new(filer: FilerIdentity, tax_office_code: u16) -> Self {
        Self {
            filer,
            tax_office_code,
        }
    }

    /// Creates a builder from the `filer` configuration section.
    #[must_use]
    pub fn from_config(config: &FilerConfig) -> Self {
        Self::new(FilerIdentity::from(config), config.tax_office_code)
    }

    /// The filer written into every declaration.
    #[must_use]
    pub const fn filer(&self) -> &FilerIdentity {
        &self.filer
    }

    /// Builds the declaration for `period`.
    #[must_use]
    pub fn build(
        &self,
        period: YearMonth,
        aggregation: Aggregation,
        generated_at: DateTime<Utc>,
    ) -> Declaration {
        let Aggregation {
            totals,
            sales,
            purchases,
        } = aggregation;

        Declaration {
            header: Header {
                form_code: FormCode::default(),
                form_variant: constants::FORM_VARIANT,
                generated_at,
                system_name: constants::SYSTEM_NAME.to_string(),
                purpose: SubmissionPurpose::default(),
                tax_office_code: self.tax_office_code,
                period,
            },
            filer: Filer {
                role: constants::FILER_ROLE.to_string(),
                identity: self.filer.clone(),
            },
            form: DeclarationForm {
                form_code: DeclarationFormCode::default(),
                form_variant: constants::DECLARATION_FORM_VARIANT,
                fields: FormFields::from_totals(&totals),
                instructions: constants::INSTRUCTIONS_ACKNOWLEDGED,
            },
            ledger: Ledger {
                sales_control: ControlTotals {
                    row_count: sales.len(),
                    tax_total: totals.sales_tax,
                },
                purchases_control: ControlTotals {
                    row_count: purchases.len(),
                    tax_total: totals.purchases_tax,
                },
                sales,
                purchases,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use crate::vat::{LedgerRow, SettlementTotals};

    fn row(sequence: u32, net: rust_decimal::Decimal, tax: rust_decimal::Decimal) -> LedgerRow {
        LedgerRow {
            sequence,
            country_code: "PL".to_string(),
            counterparty_nip: "5260250274".to_string(),
            counterparty_name: "Acme S.A.".to_string(),
            document_number: format!("FV/{sequence}"),
            date: chrono::NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            net_amount: net,
            tax_amount: tax,
        }
    }

    fn aggregation() -> Aggregation {
        Aggregation {
            totals: SettlementTotals {
                sales_net: dec!(1500.40),
                sales_tax: dec!(345.49),
                purchases_net: dec!(800.50),
                purchases_tax: dec!(184.50),
                sale_count: 2,
                purchase_count: 1,
                carried_forward_in: 20,
                amount_due: 140,
                carry_forward_out: 0,
            },
            sales: vec![row(1, dec!(1000.40), dec!(230.09)), row(2, dec!(500), dec!(115.40))],
            purchases: vec![row(1, dec!(800.50), dec!(184.50))],
        }
    }

    fn builder() -> DeclarationBuilder {
        DeclarationBuilder::from_config(&FilerConfig::default())
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 5, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_form_fields_are_rounded_totals() {
        let period = YearMonth::new(2024, 5).unwrap();
        let declaration = builder().build(period, aggregation(), at());
        let f = declaration.form.fields;

        assert_eq!(f.p_37, 1500);
        assert_eq!(f.p_38, 345);
        assert_eq!(f.p_39, 20);
        assert_eq!(f.p_42, 801);
        assert_eq!(f.p_43, 185);
        assert_eq!(f.p_48, 205);
        assert_eq!(f.p_51, 140);
        assert_eq!(f.p_53, 0);
        assert_eq!(f.p_62, 0);
        assert_eq!((f.p_68, f.p_69), (0, 0));
        assert_eq!(declaration.amount_due(), 140);
    }

    #[test]
    fn test_control_totals_are_exact() {
        let period = YearMonth::new(2024, 5).unwrap();
        let declaration = builder().build(period, aggregation(), at());

        assert_eq!(declaration.ledger.sales_control.row_count, 2);
        assert_eq!(declaration.ledger.sales_control.tax_total, dec!(345.49));
        assert_eq!(declaration.ledger.purchases_control.row_count, 1);
        assert_eq!(declaration.ledger.purchases_control.tax_total, dec!(184.50));
    }

    #[test]
    fn test_header_carries_period_and_fixed_metadata() {
        let period = YearMonth::new(2024, 5).unwrap();
        let declaration = builder().build(period, aggregation(), at());

        assert_eq!(declaration.period(), period);
        assert_eq!(declaration.generated_at(), at());
        assert_eq!(declaration.header.form_code.system_code, "JPK_V7M (2)");
        assert_eq!(declaration.header.tax_office_code, 1210);
        assert_eq!(declaration.filer.role, "Podatnik");
        assert_eq!(declaration.filer.identity.nip, "6793194113");
        assert_eq!(declaration.form.form_code.system_code, "VAT-7 (22)");
        assert_eq!(declaration.form.form_variant, 22);
        assert_eq!(declaration.form.instructions, 1);
    }

    #[test]
    fn test_build_is_pure() {
        let period = YearMonth::new(2024, 5).unwrap();
        let a = builder().build(period, aggregation(), at());
        let b = builder().build(period, aggregation(), at());
        assert_eq!(a, b);
    }
}
