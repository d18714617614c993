//! # Issuing Bank Detection
//!
//! Exact lookup of the first four card digits against a small table of
//! issuers. Several prefixes can belong to the same bank.

use crate::digits_only;
use serde::Serialize;
use tracing::trace;

/// Display identity of an issuing bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BankDescriptor {
    pub name: &'static str,
    /// Accent color for card artwork
    pub color: &'static str,
}

const BRADESCO: BankDescriptor = BankDescriptor {
    name: "Bradesco",
    color: "#CC092F",
};
const ITAU: BankDescriptor = BankDescriptor {
    name: "Itaú",
    color: "#EC7000",
};
const BANCO_DO_BRASIL: BankDescriptor = BankDescriptor {
    name: "Banco do Brasil",
    color: "#FFCC00",
};
const SANTANDER: BankDescriptor = BankDescriptor {
    name: "Santander",
    color: "#EC0000",
};
const CAIXA: BankDescriptor = BankDescriptor {
    name: "Caixa",
    color: "#005CA9",
};
const NUBANK: BankDescriptor = BankDescriptor {
    name: "Nubank",
    color: "#820AD1",
};
const INTER: BankDescriptor = BankDescriptor {
    name: "Inter",
    color: "#FF7A00",
};
const C6_BANK: BankDescriptor = BankDescriptor {
    name: "C6 Bank",
    color: "#1A1A1A",
};

/// 4-digit prefix → issuer
pub static BANK_TABLE: &[(&str, BankDescriptor)] = &[
    ("4389", BRADESCO),
    ("5425", BRADESCO),
    ("4514", ITAU),
    ("5412", ITAU),
    ("4984", BANCO_DO_BRASIL),
    ("5434", BANCO_DO_BRASIL),
    ("4916", SANTANDER),
    ("5276", SANTANDER),
    ("5355", CAIXA),
    ("4296", NUBANK),
    ("5162", NUBANK),
    ("4371", INTER),
    ("5258", C6_BANK),
];

/// Detect the issuing bank from raw user input.
///
/// Returns `None` until at least four digits are present, and for any prefix
/// not in [`BANK_TABLE`].
pub fn classify_bank(raw: &str) -> Option<&'static BankDescriptor> {
    let digits = digits_only(raw);
    let bin = digits.get(..4)?;

    let bank = BANK_TABLE
        .iter()
        .find(|(prefix, _)| *prefix == bin)
        .map(|(_, bank)| bank);

    trace!(bin, found = bank.is_some(), "bank lookup");
    bank
}
