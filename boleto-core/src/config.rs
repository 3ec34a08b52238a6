//! Configuration for slip issuance

use crate::{
    nosso_numero,
    types::{Carteira, PrintType},
};
use serde::{Deserialize, Serialize};

/// Slip defaults applied when a [`crate::Boleto`] is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Byte tag for new Nosso Números (1..=9)
    pub byte: u8,

    /// Wallet
    pub carteira: Carteira,

    /// Registered collection
    pub registered: bool,

    /// Charge type sent to the settlement API
    pub tipo_cobranca: String,

    /// Print layout; required before encoding
    pub print_type: Option<PrintType>,

    /// Payment place printed on the slip
    pub local_pagamento: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            byte: 2,
            carteira: Carteira::One,
            registered: true,
            tipo_cobranca: "HIBRIDO".to_string(),
            print_type: None,
            local_pagamento: "Pagável preferencialmente nas cooperativas de crédito do sicredi"
                .to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(byte) = std::env::var("BOLETO_BYTE") {
            config.byte = byte
                .parse()
                .map_err(|_| crate::Error::Config(format!("Invalid BOLETO_BYTE: {}", byte)))?;
        }

        if let Ok(carteira) = std::env::var("BOLETO_CARTEIRA") {
            config.carteira = Carteira::parse(&carteira)
                .map_err(|e| crate::Error::Config(e.to_string()))?;
        }

        if let Ok(registered) = std::env::var("BOLETO_REGISTERED") {
            config.registered = registered.parse().map_err(|_| {
                crate::Error::Config(format!("Invalid BOLETO_REGISTERED: {}", registered))
            })?;
        }

        if let Ok(tipo) = std::env::var("BOLETO_TIPO_COBRANCA") {
            config.tipo_cobranca = tipo;
        }

        if let Ok(print_type) = std::env::var("BOLETO_PRINT_TYPE") {
            config.print_type = Some(
                PrintType::parse(&print_type).map_err(|e| crate::Error::Config(e.to_string()))?,
            );
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value domains
    pub fn validate(&self) -> crate::Result<()> {
        nosso_numero::validate_byte_tag(self.byte)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        if self.tipo_cobranca.trim().is_empty() {
            return Err(crate::Error::Config("tipo_cobranca must not be empty".into()));
        }
        Ok(())
    }
}
