//! Boleto Core
//!
//! Field-encoding and check-digit engine for Sicredi (748) payment slips.
//!
//! # Architecture
//!
//! - **Nosso Número**: year, byte tag, sequence and a modulo-11 check digit
//! - **Campo livre**: 25-digit free field embedding the Nosso Número and the
//!   account identity, closed by its own check digit
//! - **API mapping**: sparse outbound payloads, permissive inbound import
//! - **Bank variants**: one [`BankVariant`] per institution, selected by
//!   [`BankCode`]
//!
//! # Invariants
//!
//! - Determinism: the same inputs always produce the same check digits
//! - Round-trip: `parse(encode(x))` recovers every encoded component
//! - Frozen derivation: a slip's derived fields never change once computed

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod api;
pub mod bank;
pub mod boleto;
pub mod campo_livre;
pub mod checksum;
pub mod config;
pub mod error;
pub mod especie;
pub mod format;
pub mod metrics;
pub mod nosso_numero;
pub mod telemetry;
pub mod types;

// Re-exports
pub use api::{RemoteContext, SlipParams};
pub use bank::{BankCode, BankVariant, Sicredi};
pub use boleto::Boleto;
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use metrics::Metrics;
pub use types::{
    AccountIdentity, CampoLivre, CampoLivreParts, Carteira, Derived, NossoNumero, Party,
    PersonType, PrintType, SlipStatus,
};
