//! Deterministic XML writer.

use chrono::SecondsFormat;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use vatdesk_shared::types::format_amount;

use super::error::{XmlError, write_error};
use crate::declaration::constants::{NS_DEFINITION_TYPES, NS_FORM, NS_XSI};
use crate::declaration::{ControlTotals, Declaration, FormFields};
use crate::vat::LedgerRow;

/// First line of every file.
pub const PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const DATE_FORMAT: &str = "%Y-%m-%d";

type XmlWriter = Writer<Vec<u8>>;

/// Renders a declaration to bytes.
///
/// Equal declarations always produce identical bytes: element order is
/// fixed, amounts use `.` with no grouping and integers carry no decimal
/// point.
///
/// # Errors
///
/// - `XmlError::InvalidValue` if a text value holds a character XML 1.0
///   cannot carry, or starts or ends with whitespace a reader would drop
/// - `XmlError::Write` if the underlying writer fails
pub fn to_bytes(declaration: &Declaration) -> Result<Vec<u8>, XmlError> {
    let mut wr = Writer::new_with_indent(Vec::new(), b' ', 2);

    wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;

    let mut root = BytesStart::new("JPK");
    root.push_attribute(("xmlns:etd", NS_DEFINITION_TYPES));
    root.push_attribute(("xmlns:xsi", NS_XSI));
    root.push_attribute(("xmlns", NS_FORM));
    wr.write_event(Event::Start(root)).map_err(write_error)?;

    write_header(&mut wr, declaration)?;
    write_filer(&mut wr, declaration)?;
    write_form(&mut wr, declaration)?;
    write_ledger(&mut wr, declaration)?;

    end(&mut wr, "JPK")?;
    Ok(wr.into_inner())
}

fn write_header(wr: &mut XmlWriter, declaration: &Declaration) -> Result<(), XmlError> {
    let header = &declaration.header;
    start(wr, "Naglowek")?;
    leaf_with_attributes(
        wr,
        "KodFormularza",
        &[
            ("kodSystemowy", header.form_code.system_code.as_str()),
            ("wersjaSchemy", header.form_code.schema_version.as_str()),
        ],
        &header.form_code.code,
    )?;
    leaf(wr, "WariantFormularza", &header.form_variant.to_string())?;
    leaf(
        wr,
        "DataWytworzeniaJPK",
        &header
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Nanos, true),
    )?;
    leaf(wr, "NazwaSystemu", &header.system_name)?;
    leaf_with_attributes(
        wr,
        "CelZlozenia",
        &[("poz", header.purpose.position.as_str())],
        &header.purpose.code.to_string(),
    )?;
    leaf(wr, "KodUrzedu", &header.tax_office_code.to_string())?;
    leaf(wr, "Rok", &header.period.year().to_string())?;
    leaf(wr, "Miesiac", &header.period.month().to_string())?;
    end(wr, "Naglowek")
}

fn write_filer(wr: &mut XmlWriter, declaration: &Declaration) -> Result<(), XmlError> {
    let filer = &declaration.filer;
    let mut podmiot = BytesStart::new("Podmiot1");
    podmiot.push_attribute(("rola", filer.role.as_str()));
    wr.write_event(Event::Start(podmiot)).map_err(write_error)?;

    start(wr, "OsobaNiefizyczna")?;
    leaf(wr, "NIP", &filer.identity.nip)?;
    leaf(wr, "PelnaNazwa", &filer.identity.full_name)?;
    leaf(wr, "Email", &filer.identity.email)?;
    leaf(wr, "Telefon", &filer.identity.phone)?;
    end(wr, "OsobaNiefizyczna")?;

    end(wr, "Podmiot1")
}

fn write_form(wr: &mut XmlWriter, declaration: &Declaration) -> Result<(), XmlError> {
    let form = &declaration.form;
    start(wr, "Deklaracja")?;

    start(wr, "Naglowek")?;
    leaf_with_attributes(
        wr,
        "KodFormularzaDekl",
        &[
            ("kodSystemowy", form.form_code.system_code.as_str()),
            ("kodPodatku", form.form_code.tax_code.as_str()),
            ("rodzajZobowiazania", form.form_code.obligation_kind.as_str()),
            ("wersjaSchemy", form.form_code.schema_version.as_str()),
        ],
        &form.form_code.code,
    )?;
    leaf(wr, "WariantFormularzaDekl", &form.form_variant.to_string())?;
    end(wr, "Naglowek")?;

    write_fields(wr, &form.fields)?;
    leaf(wr, "Pouczenia", &form.instructions.to_string())?;

    end(wr, "Deklaracja")
}

fn write_fields(wr: &mut XmlWriter, fields: &FormFields) -> Result<(), XmlError> {
    start(wr, "PozycjeSzczegolowe")?;
    for (tag, value) in [
        ("P_37", fields.p_37),
        ("P_38", fields.p_38),
        ("P_39", fields.p_39),
        ("P_42", fields.p_42),
        ("P_43", fields.p_43),
        ("P_48", fields.p_48),
        ("P_51", fields.p_51),
        ("P_53", fields.p_53),
        ("P_62", fields.p_62),
        ("P_68", fields.p_68),
        ("P_69", fields.p_69),
    ] {
        leaf(wr, tag, &value.to_string())?;
    }
    end(wr, "PozycjeSzczegolowe")
}

/// Tag names of one ledger section.
struct Section {
    row: &'static str,
    sequence: &'static str,
    counterparty_nip: &'static str,
    counterparty_name: &'static str,
    document: &'static str,
    date: &'static str,
    net: &'static str,
    tax: &'static str,
    control: &'static str,
    row_count: &'static str,
    tax_total: &'static str,
}

const SALES: Section = Section {
    row: "SprzedazWiersz",
    sequence: "LpSprzedazy",
    counterparty_nip: "NrKontrahenta",
    counterparty_name: "NazwaKontrahenta",
    document: "DowodSprzedazy",
    date: "DataWystawienia",
    net: "K_19",
    tax: "K_20",
    control: "SprzedazCtrl",
    row_count: "LiczbaWierszySprzedazy",
    tax_total: "PodatekNalezny",
};

const PURCHASES: Section = Section {
    row: "ZakupWiersz",
    sequence: "LpZakupu",
    counterparty_nip: "NrDostawcy",
    counterparty_name: "NazwaDostawcy",
    document: "DowodZakupu",
    date: "DataZakupu",
    net: "K_42",
    tax: "K_43",
    control: "ZakupCtrl",
    row_count: "LiczbaWierszyZakupow",
    tax_total: "PodatekNaliczony",
};

fn write_ledger(wr: &mut XmlWriter, declaration: &Declaration) -> Result<(), XmlError> {
    let ledger = &declaration.ledger;
    start(wr, "Ewidencja")?;
    write_section(wr, &SALES, &ledger.sales, &ledger.sales_control)?;
    write_section(wr, &PURCHASES, &ledger.purchases, &ledger.purchases_control)?;
    end(wr, "Ewidencja")
}

fn write_section(
    wr: &mut XmlWriter,
    tags: &Section,
    rows: &[LedgerRow],
    control: &ControlTotals,
) -> Result<(), XmlError> {
    for row in rows {
        start(wr, tags.row)?;
        leaf(wr, tags.sequence, &row.sequence.to_string())?;
        leaf(wr, "KodKrajuNadaniaTIN", &row.country_code)?;
        leaf(wr, tags.counterparty_nip, &row.counterparty_nip)?;
        leaf(wr, tags.counterparty_name, &row.counterparty_name)?;
        leaf(wr, tags.document, &row.document_number)?;
        leaf(wr, tags.date, &row.date.format(DATE_FORMAT).to_string())?;
        leaf(wr, tags.net, &format_amount(row.net_amount))?;
        leaf(wr, tags.tax, &format_amount(row.tax_amount))?;
        end(wr, tags.row)?;
    }

    start(wr, tags.control)?;
    leaf(wr, tags.row_count, &control.row_count.to_string())?;
    leaf(wr, tags.tax_total, &format_amount(control.tax_total))?;
    end(wr, tags.control)
}

fn start(wr: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
    wr.write_event(Event::Start(BytesStart::new(name)))
        .map_err(write_error)
}

fn end(wr: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
    wr.write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_error)
}

fn leaf(wr: &mut XmlWriter, name: &'static str, value: &str) -> Result<(), XmlError> {
    leaf_with_attributes(wr, name, &[], value)
}

// The text event is written even when empty so the closing tag stays on the
// same line.
fn leaf_with_attributes(
    wr: &mut XmlWriter,
    name: &'static str,
    attributes: &[(&str, &str)],
    value: &str,
) -> Result<(), XmlError> {
    check_text(name, value)?;
    let mut element = BytesStart::new(name);
    for attribute in attributes {
        element.push_attribute(*attribute);
    }
    wr.write_event(Event::Start(element)).map_err(write_error)?;
    wr.write_event(Event::Text(BytesText::new(value)))
        .map_err(write_error)?;
    end(wr, name)
}

/// The `Char` production of XML 1.0.
const fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

const fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

// Readers normalize `\r` and trim edge whitespace, so either would make the
// stored file read back differently from what was written.
fn check_text(name: &'static str, value: &str) -> Result<(), XmlError> {
    if let Some(c) = value.chars().find(|&c| c == '\r' || !is_xml_char(c)) {
        return Err(XmlError::InvalidValue {
            field: name,
            message: format!("character U+{:04X} cannot be written", u32::from(c)),
        });
    }
    if value.trim_matches(is_xml_space).len() != value.len() {
        return Err(XmlError::InvalidValue {
            field: name,
            message: "value starts or ends with whitespace".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use vatdesk_shared::config::FilerConfig;

    use crate::declaration::DeclarationBuilder;
    use crate::period::YearMonth;
    use crate::vat::{Aggregation, SettlementTotals};

    pub(crate) fn sample() -> Declaration {
        let aggregation = Aggregation {
            totals: SettlementTotals {
                sales_net: dec!(1000),
                sales_tax: dec!(230.50),
                purchases_net: dec!(0),
                purchases_tax: dec!(0),
                sale_count: 1,
                purchase_count: 0,
                carried_forward_in: 0,
                amount_due: 231,
                carry_forward_out: 0,
            },
            sales: vec![LedgerRow {
                sequence: 1,
                country_code: "PL".to_string(),
                counterparty_nip: "5260250274".to_string(),
                counterparty_name: "Kowalski & Syn".to_string(),
                document_number: "FV/1/05".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
                net_amount: dec!(1000.00),
                tax_amount: dec!(230.50),
            }],
            purchases: Vec::new(),
        };
        DeclarationBuilder::from_config(&FilerConfig::default()).build(
            YearMonth::new(2024, 5).unwrap(),
            aggregation,
            Utc.with_ymd_and_hms(2024, 6, 5, 9, 30, 0).unwrap(),
        )
    }

    const EXPECTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<JPK xmlns:etd="http://crd.gov.pl/xml/schematy/dziedzinowe/mf/2021/06/08/eD/DefinicjeTypy/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns="http://crd.gov.pl/wzor/2021/12/27/11148/">
  <Naglowek>
    <KodFormularza kodSystemowy="JPK_V7M (2)" wersjaSchemy="1-0E">JPK_VAT</KodFormularza>
    <WariantFormularza>2</WariantFormularza>
    <DataWytworzeniaJPK>2024-06-05T09:30:00.000000000Z</DataWytworzeniaJPK>
    <NazwaSystemu>Formularz uproszczony</NazwaSystemu>
    <CelZlozenia poz="P_7">1</CelZlozenia>
    <KodUrzedu>1210</KodUrzedu>
    <Rok>2024</Rok>
    <Miesiac>5</Miesiac>
  </Naglowek>
  <Podmiot1 rola="Podatnik">
    <OsobaNiefizyczna>
      <NIP>6793194113</NIP>
      <PelnaNazwa>Grey House sp. z o.o.</PelnaNazwa>
      <Email>info@greyhouse.es</Email>
      <Telefon>608415900</Telefon>
    </OsobaNiefizyczna>
  </Podmiot1>
  <Deklaracja>
    <Naglowek>
      <KodFormularzaDekl kodSystemowy="VAT-7 (22)" kodPodatku="VAT" rodzajZobowiazania="Z" wersjaSchemy="1-0E">VAT-7</KodFormularzaDekl>
      <WariantFormularzaDekl>22</WariantFormularzaDekl>
    </Naglowek>
    <PozycjeSzczegolowe>
      <P_37>1000</P_37>
      <P_38>231</P_38>
      <P_39>0</P_39>
      <P_42>0</P_42>
      <P_43>0</P_43>
      <P_48>0</P_48>
      <P_51>231</P_51>
      <P_53>0</P_53>
      <P_62>0</P_62>
      <P_68>0</P_68>
      <P_69>0</P_69>
    </PozycjeSzczegolowe>
    <Pouczenia>1</Pouczenia>
  </Deklaracja>
  <Ewidencja>
    <SprzedazWiersz>
      <LpSprzedazy>1</LpSprzedazy>
      <KodKrajuNadaniaTIN>PL</KodKrajuNadaniaTIN>
      <NrKontrahenta>5260250274</NrKontrahenta>
      <NazwaKontrahenta>Kowalski &amp; Syn</NazwaKontrahenta>
      <DowodSprzedazy>FV/1/05</DowodSprzedazy>
      <DataWystawienia>2024-05-03</DataWystawienia>
      <K_19>1000</K_19>
      <K_20>230.5</K_20>
    </SprzedazWiersz>
    <SprzedazCtrl>
      <LiczbaWierszySprzedazy>1</LiczbaWierszySprzedazy>
      <PodatekNalezny>230.5</PodatekNalezny>
    </SprzedazCtrl>
    <ZakupCtrl>
      <LiczbaWierszyZakupow>0</LiczbaWierszyZakupow>
      <PodatekNaliczony>0</PodatekNaliczony>
    </ZakupCtrl>
  </Ewidencja>
</JPK>"#;

    #[test]
    fn test_exact_output() {
        let bytes = to_bytes(&sample()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), EXPECTED);
    }

    #[test]
    fn test_starts_with_prolog_line() {
        let bytes = to_bytes(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(&format!("{PROLOG}\n<JPK ")));
    }

    #[test]
    fn test_empty_text_keeps_closing_tag_inline() {
        let mut declaration = sample();
        declaration.filer.identity.email = String::new();
        let text = String::from_utf8(to_bytes(&declaration).unwrap()).unwrap();
        assert!(text.contains("\n      <Email></Email>\n"));
    }

    #[test]
    fn test_control_character_is_rejected() {
        let mut declaration = sample();
        declaration.ledger.sales[0].counterparty_name = "Acme\u{1}S.A.".to_string();

        let err = to_bytes(&declaration).unwrap_err();
        assert!(matches!(
            &err,
            XmlError::InvalidValue { field: "NazwaKontrahenta", message }
                if message == "character U+0001 cannot be written"
        ));
    }

    #[test]
    fn test_edge_whitespace_is_rejected() {
        for name in [" Acme", "Acme ", "\tAcme", "Acme\n"] {
            let mut declaration = sample();
            declaration.ledger.sales[0].counterparty_name = name.to_string();
            assert!(matches!(
                to_bytes(&declaration),
                Err(XmlError::InvalidValue { field: "NazwaKontrahenta", .. })
            ));
        }

        let mut declaration = sample();
        declaration.filer.identity.full_name = "Grey House ".to_string();
        assert!(matches!(
            to_bytes(&declaration),
            Err(XmlError::InvalidValue { field: "PelnaNazwa", .. })
        ));
    }

    #[test]
    fn test_inner_whitespace_and_non_ascii_survive() {
        let mut declaration = sample();
        declaration.ledger.sales[0].counterparty_name = "Zakład  Łódź\tS.A.".to_string();

        let bytes = to_bytes(&declaration).unwrap();
        let parsed = crate::xml::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, declaration);
    }

    #[test]
    fn test_xml_char_ranges() {
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('ż'));
        assert!(is_xml_char('\u{1F600}'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{1F}'));
        assert!(!is_xml_char('\u{FFFE}'));
    }

    #[test]
    fn test_purchase_rows_follow_sales_control() {
        let mut declaration = sample();
        let mut row = declaration.ledger.sales[0].clone();
        row.document_number = "ZK/9".to_string();
        declaration.ledger.purchases.push(row);
        declaration.ledger.purchases_control.row_count = 1;

        let text = String::from_utf8(to_bytes(&declaration).unwrap()).unwrap();
        let sales_ctrl = text.find("<SprzedazCtrl>").unwrap();
        let purchase = text.find("<ZakupWiersz>").unwrap();
        let purchase_ctrl = text.find("<ZakupCtrl>").unwrap();
        assert!(sales_ctrl < purchase && purchase < purchase_ctrl);
        assert!(text.contains("<DowodZakupu>ZK/9</DowodZakupu>"));
        assert!(text.contains("<K_43>230.5</K_43>"));
    }
}
