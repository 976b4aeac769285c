//! Reads stored declaration files back into the document tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::{XmlError, read_error};
use crate::declaration::{
    ControlTotals, Declaration, DeclarationForm, DeclarationFormCode, Filer, FilerIdentity,
    FormCode, FormFields, Header, Ledger, SubmissionPurpose,
};
use crate::period::YearMonth;
use crate::vat::LedgerRow;

/// Parses a declaration file.
///
/// Parsing the output of [`to_bytes`](super::to_bytes) yields a declaration
/// equal to the one written.
///
/// # Errors
///
/// - `XmlError::Read` if the bytes are not UTF-8 or not a JPK document
/// - `XmlError::InvalidValue` if a date, timestamp or period is impossible
pub fn from_bytes(bytes: &[u8]) -> Result<Declaration, XmlError> {
    let text = std::str::from_utf8(bytes).map_err(read_error)?;
    let doc: JpkDoc = quick_xml::de::from_str(text).map_err(read_error)?;
    doc.try_into()
}

#[derive(Deserialize)]
struct JpkDoc {
    #[serde(rename = "Naglowek")]
    header: HeaderDoc,
    #[serde(rename = "Podmiot1")]
    filer: FilerDoc,
    #[serde(rename = "Deklaracja")]
    form: FormDoc,
    #[serde(rename = "Ewidencja")]
    ledger: LedgerDoc,
}

#[derive(Deserialize)]
struct FormCodeDoc {
    #[serde(rename = "@kodSystemowy")]
    system_code: String,
    #[serde(rename = "@wersjaSchemy")]
    schema_version: String,
    #[serde(rename = "$text")]
    code: String,
}

#[derive(Deserialize)]
struct PurposeDoc {
    #[serde(rename = "@poz")]
    position: String,
    #[serde(rename = "$text")]
    code: u8,
}

#[derive(Deserialize)]
struct HeaderDoc {
    #[serde(rename = "KodFormularza")]
    form_code: FormCodeDoc,
    #[serde(rename = "WariantFormularza")]
    form_variant: u8,
    #[serde(rename = "DataWytworzeniaJPK")]
    generated_at: String,
    #[serde(rename = "NazwaSystemu")]
    system_name: String,
    #[serde(rename = "CelZlozenia")]
    purpose: PurposeDoc,
    #[serde(rename = "KodUrzedu")]
    tax_office_code: u16,
    #[serde(rename = "Rok")]
    year: i32,
    #[serde(rename = "Miesiac")]
    month: u32,
}

#[derive(Deserialize)]
struct IdentityDoc {
    #[serde(rename = "NIP")]
    nip: String,
    #[serde(rename = "PelnaNazwa")]
    full_name: String,
    #[serde(rename = "Email", default)]
    email: String,
    #[serde(rename = "Telefon", default)]
    phone: String,
}

#[derive(Deserialize)]
struct FilerDoc {
    #[serde(rename = "@rola")]
    role: String,
    #[serde(rename = "OsobaNiefizyczna")]
    identity: IdentityDoc,
}

#[derive(Deserialize)]
struct DeclarationFormCodeDoc {
    #[serde(rename = "@kodSystemowy")]
    system_code: String,
    #[serde(rename = "@kodPodatku")]
    tax_code: String,
    #[serde(rename = "@rodzajZobowiazania")]
    obligation_kind: String,
    #[serde(rename = "@wersjaSchemy")]
    schema_version: String,
    #[serde(rename = "$text")]
    code: String,
}

#[derive(Deserialize)]
struct FormHeaderDoc {
    #[serde(rename = "KodFormularzaDekl")]
    form_code: DeclarationFormCodeDoc,
    #[serde(rename = "WariantFormularzaDekl")]
    form_variant: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct FieldsDoc {
    p_37: i64,
    p_38: i64,
    p_39: i64,
    p_42: i64,
    p_43: i64,
    p_48: i64,
    p_51: i64,
    p_53: i64,
    p_62: i64,
    p_68: i64,
    p_69: i64,
}

#[derive(Deserialize)]
struct FormDoc {
    #[serde(rename = "Naglowek")]
    header: FormHeaderDoc,
    #[serde(rename = "PozycjeSzczegolowe")]
    fields: FieldsDoc,
    #[serde(rename = "Pouczenia")]
    instructions: u8,
}

#[derive(Deserialize)]
struct SaleRowDoc {
    #[serde(rename = "LpSprzedazy")]
    sequence: u32,
    #[serde(rename = "KodKrajuNadaniaTIN")]
    country_code: String,
    #[serde(rename = "NrKontrahenta")]
    counterparty_nip: String,
    #[serde(rename = "NazwaKontrahenta")]
    counterparty_name: String,
    #[serde(rename = "DowodSprzedazy")]
    document_number: String,
    #[serde(rename = "DataWystawienia")]
    date: String,
    #[serde(rename = "K_19", with = "rust_decimal::serde::str")]
    net_amount: Decimal,
    #[serde(rename = "K_20", with = "rust_decimal::serde::str")]
    tax_amount: Decimal,
}

#[derive(Deserialize)]
struct PurchaseRowDoc {
    #[serde(rename = "LpZakupu")]
    sequence: u32,
    #[serde(rename = "KodKrajuNadaniaTIN")]
    country_code: String,
    #[serde(rename = "NrDostawcy")]
    counterparty_nip: String,
    #[serde(rename = "NazwaDostawcy")]
    counterparty_name: String,
    #[serde(rename = "DowodZakupu")]
    document_number: String,
    #[serde(rename = "DataZakupu")]
    date: String,
    #[serde(rename = "K_42", with = "rust_decimal::serde::str")]
    net_amount: Decimal,
    #[serde(rename = "K_43", with = "rust_decimal::serde::str")]
    tax_amount: Decimal,
}

#[derive(Deserialize)]
struct SalesControlDoc {
    #[serde(rename = "LiczbaWierszySprzedazy")]
    row_count: usize,
    #[serde(rename = "PodatekNalezny", with = "rust_decimal::serde::str")]
    tax_total: Decimal,
}

#[derive(Deserialize)]
struct PurchasesControlDoc {
    #[serde(rename = "LiczbaWierszyZakupow")]
    row_count: usize,
    #[serde(rename = "PodatekNaliczony", with = "rust_decimal::serde::str")]
    tax_total: Decimal,
}

#[derive(Deserialize)]
struct LedgerDoc {
    #[serde(rename = "SprzedazWiersz", default)]
    sales: Vec<SaleRowDoc>,
    #[serde(rename = "SprzedazCtrl")]
    sales_control: SalesControlDoc,
    #[serde(rename = "ZakupWiersz", default)]
    purchases: Vec<PurchaseRowDoc>,
    #[serde(rename = "ZakupCtrl")]
    purchases_control: PurchasesControlDoc,
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, XmlError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| XmlError::InvalidValue {
        field,
        message: e.to_string(),
    })
}

impl TryFrom<SaleRowDoc> for LedgerRow {
    type Error = XmlError;

    fn try_from(row: SaleRowDoc) -> Result<Self, Self::Error> {
        Ok(Self {
            sequence: row.sequence,
            country_code: row.country_code,
            counterparty_nip: row.counterparty_nip,
            counterparty_name: row.counterparty_name,
            document_number: row.document_number,
            date: parse_date("DataWystawienia", &row.date)?,
            net_amount: row.net_amount,
            tax_amount: row.tax_amount,
        })
    }
}

impl TryFrom<PurchaseRowDoc> for LedgerRow {
    type Error = XmlError;

    fn try_from(row: PurchaseRowDoc) -> Result<Self, Self::Error> {
        Ok(Self {
            sequence: row.sequence,
            country_code: row.country_code,
            counterparty_nip: row.counterparty_nip,
            counterparty_name: row.counterparty_name,
            document_number: row.document_number,
            date: parse_date("DataZakupu", &row.date)?,
            net_amount: row.net_amount,
            tax_amount: row.tax_amount,
        })
    }
}

impl TryFrom<JpkDoc> for Declaration {
    type Error = XmlError;

    fn try_from(doc: JpkDoc) -> Result<Self, Self::Error> {
        let JpkDoc {
            header,
            filer,
            form,
            ledger,
        } = doc;

        let generated_at = DateTime::parse_from_rfc3339(&header.generated_at)
            .map_err(|e| XmlError::InvalidValue {
                field: "DataWytworzeniaJPK",
                message: e.to_string(),
            })?
            .with_timezone(&Utc);
        let period =
            YearMonth::new(header.year, header.month).map_err(|e| XmlError::InvalidValue {
                field: "Miesiac",
                message: e.to_string(),
            })?;

        let sales = ledger
            .sales
            .into_iter()
            .map(LedgerRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let purchases = ledger
            .purchases
            .into_iter()
            .map(LedgerRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let f = form.fields;
        Ok(Self {
            header: Header {
                form_code: FormCode {
                    system_code: header.form_code.system_code,
                    schema_version: header.form_code.schema_version,
                    code: header.form_code.code,
                },
                form_variant: header.form_variant,
                generated_at,
                system_name: header.system_name,
                purpose: SubmissionPurpose {
                    position: header.purpose.position,
                    code: header.purpose.code,
                },
                tax_office_code: header.tax_office_code,
                period,
            },
            filer: Filer {
                role: filer.role,
                identity: FilerIdentity {
                    nip: filer.identity.nip,
                    full_name: filer.identity.full_name,
                    email: filer.identity.email,
                    phone: filer.identity.phone,
                },
            },
            form: DeclarationForm {
                form_code: DeclarationFormCode {
                    system_code: form.header.form_code.system_code,
                    tax_code: form.header.form_code.tax_code,
                    obligation_kind: form.header.form_code.obligation_kind,
                    schema_version: form.header.form_code.schema_version,
                    code: form.header.form_code.code,
                },
                form_variant: form.header.form_variant,
                fields: FormFields {
                    p_37: f.p_37,
                    p_38: f.p_38,
                    p_39: f.p_39,
                    p_42: f.p_42,
                    p_43: f.p_43,
                    p_48: f.p_48,
                    p_51: f.p_51,
                    p_53: f.p_53,
                    p_62: f.p_62,
                    p_68: f.p_68,
                    p_69: f.p_69,
                },
                instructions: form.instructions,
            },
            ledger: Ledger {
                sales,
                sales_control: ControlTotals {
                    row_count: ledger.sales_control.row_count,
                    tax_total: ledger.sales_control.tax_total,
                },
                purchases,
                purchases_control: ControlTotals {
                    row_count: ledger.purchases_control.row_count,
                    tax_total: ledger.purchases_control.tax_total,
                },
            },
        })
    }
}
