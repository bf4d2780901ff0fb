//! Common regex patterns for Spanish invoice extraction.
//!
//! Labeled field patterns are case-insensitive and tolerate the usual OCR
//! noise: optional colons and dashes, stray spaces and a trailing `€`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice date
    pub static ref FECHA: Regex = Regex::new(
        r"(?i)Fecha\s*(?:de\s*factura)?[:\-]?\s*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})"
    ).unwrap();

    // Day/month/year at the start of a matched date
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^([0-9]{1,2})[/-]([0-9]{1,2})[/-]([0-9]{2,4})"
    ).unwrap();

    // Invoice number
    pub static ref NUMERO_FACTURA: Regex = Regex::new(
        r"(?i)Factura\s*(?:Recapitulativa)?\s*#?([A-Z0-9/\-]+)"
    ).unwrap();

    pub static ref NUMERO_FACTURA_LABELED: Regex = Regex::new(
        r"(?i)N[úu]mero\s*de\s*factura[:\-]?\s*([A-Z0-9/\-]+)"
    ).unwrap();

    // Tax base
    pub static ref BASE_IMPONIBLE: Regex = Regex::new(
        r"(?i)BASE\s*IMPONIBLE[:\s]*([\d.,]+)\s*€?"
    ).unwrap();

    pub static ref TOTAL_BASE_IMPONIBLE: Regex = Regex::new(
        r"(?i)Total\s*Base\s*Imponible[:\s]*([\d.,]+)\s*€?"
    ).unwrap();

    // VAT: "IVA (21%): 25,00 €", "IVA: 25,00", and "INA" as an OCR misread of "IVA".
    // The rate ends at "%", ")" or whitespace, so "IVA 21 210,00" keeps both
    // numbers while "IVA 8,40" is not split into rate 8,4 and amount 0.
    pub static ref IVA_RATE_AMOUNT: Regex = Regex::new(
        r"(?i)IVA\s*\(?\s*(\d{1,2}(?:[.,]\d+)?)(?:\s*%\s*\)?|\)|\s)\s*[:\-]?\s*([\d.,]+)\s*€?"
    ).unwrap();

    pub static ref IVA_AMOUNT: Regex = Regex::new(
        r"(?i)IVA\s*[:\-]?\s*([\d.,]+)\s*€?"
    ).unwrap();

    pub static ref INA_MISREAD: Regex = Regex::new(
        r"(?i)INA\s*(\d{1,2}%)?\s*[:\-]?\s*([\d.,]+)\s*€?"
    ).unwrap();

    // Equivalence surcharge, optionally with its rate: "RE (5,2%): 5,20"
    pub static ref RECARGO: Regex = Regex::new(
        r"(?i)\bR\.?E\.?\s*(?:\(\s*[\d.,]+%?\s*\))?\s*[:\-]?\s*([\d.,]+)\s*€?"
    ).unwrap();

    // Invoice total; "bbl" is how OCR tends to read a bold "Total"
    pub static ref TOTAL: Regex = Regex::new(
        r"(?i)\bTOTAL\s*[:\-]?\s*([\d.,]+)\s*€"
    ).unwrap();

    pub static ref TOTAL_MISREAD: Regex = Regex::new(
        r"(?i)bbl\s*([\d.,]+)\s*€"
    ).unwrap();

    // Tax identifiers
    pub static ref CIF_NIF: Regex = Regex::new(
        r"(?i)CIF/NIF[:\s/]*([A-Z0-9]+)"
    ).unwrap();

    pub static ref CIF: Regex = Regex::new(
        r"(?i)CIF[:\s/]*([A-Z0-9]+)"
    ).unwrap();

    pub static ref NIF: Regex = Regex::new(
        r"(?i)NIF[:\s/]*([A-Z0-9]+)"
    ).unwrap();

    // Five-digit postal code followed by a city
    pub static ref POSTAL_CODE_CITY: Regex = Regex::new(
        r"(\d{5}),\s*([^\n,]+)"
    ).unwrap();

    // Email-like tokens, including ones where OCR dropped the "@"
    pub static ref EMAIL_CANDIDATE: Regex = Regex::new(
        r"[A-Za-z0-9._+\-@]+\.[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*"
    ).unwrap();

    pub static ref EMAIL: Regex = Regex::new(
        r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$"
    ).unwrap();
}
