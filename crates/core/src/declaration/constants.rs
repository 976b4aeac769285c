//! Fixed metadata of the JPK_V7M(2) schema.
//!
//! These values are an external contract and must not change without a new
//! schema version.

/// `xmlns:etd` attribute of the root element.
pub const NS_DEFINITION_TYPES: &str =
    "http://crd.gov.pl/xml/schematy/dziedzinowe/mf/2021/06/08/eD/DefinicjeTypy/";
/// `xmlns:xsi` attribute of the root element.
pub const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// Default namespace of the root element.
pub const NS_FORM: &str = "http://crd.gov.pl/wzor/2021/12/27/11148/";

/// `kodSystemowy` of the file header.
pub const FORM_SYSTEM_CODE: &str = "JPK_V7M (2)";
/// `wersjaSchemy` shared by the header and the declaration part.
pub const SCHEMA_VERSION: &str = "1-0E";
/// Text of `KodFormularza`.
pub const FORM_CODE: &str = "JPK_VAT";
/// `WariantFormularza`.
pub const FORM_VARIANT: u8 = 2;
/// `NazwaSystemu`.
pub const SYSTEM_NAME: &str = "Formularz uproszczony";
/// `poz` attribute of `CelZlozenia`.
pub const PURPOSE_POSITION: &str = "P_7";
/// `CelZlozenia` code for an original (non-corrective) filing.
pub const PURPOSE_ORIGINAL: u8 = 1;

/// `rola` attribute of `Podmiot1`.
pub const FILER_ROLE: &str = "Podatnik";

/// `kodSystemowy` of the declaration part.
pub const DECLARATION_SYSTEM_CODE: &str = "VAT-7 (22)";
/// `kodPodatku`.
pub const TAX_CODE: &str = "VAT";
/// `rodzajZobowiazania`.
pub const OBLIGATION_KIND: &str = "Z";
/// Text of `KodFormularzaDekl`.
pub const DECLARATION_FORM_CODE: &str = "VAT-7";
/// `WariantFormularzaDekl`.
pub const DECLARATION_FORM_VARIANT: u8 = 22;
/// `Pouczenia`: the filer acknowledged the instructions.
pub const INSTRUCTIONS_ACKNOWLEDGED: u8 = 1;
