//! Bank variants
//!
//! Each institution supplies the same capability set behind [`BankVariant`]
//! and is selected by its [`BankCode`].

use crate::{
    api::{self, RemoteContext, SlipParams},
    boleto::Boleto,
    campo_livre,
    metrics::Metrics,
    nosso_numero,
    types::{AccountIdentity, CampoLivre, CampoLivreParts, Carteira, NossoNumero},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Febraban bank code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BankCode {
    /// Sicredi (748)
    Sicredi,
}

impl BankCode {
    /// Three-digit code
    pub fn code(&self) -> &'static str {
        match self {
            BankCode::Sicredi => "748",
        }
    }

    /// Parse from the three-digit code
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim() {
            "748" => Ok(BankCode::Sicredi),
            other => Err(Error::InvalidArgument(format!(
                "unsupported bank code '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for BankCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Field-encoding capability set of one institution
pub trait BankVariant: Send + Sync {
    /// Bank code tag
    fn bank_code(&self) -> BankCode;

    /// Generate the Nosso Número
    fn generate_nosso_numero(
        &self,
        account: &AccountIdentity,
        issue_year: &str,
        byte_tag: u8,
        document_sequence: u64,
    ) -> Result<NossoNumero>;

    /// Assemble the free field
    fn encode_campo_livre(
        &self,
        registered: bool,
        carteira: Carteira,
        nosso_numero: &NossoNumero,
        account: &AccountIdentity,
    ) -> Result<CampoLivre>;

    /// Split a free field into its components
    fn parse_campo_livre(&self, raw: &str) -> Result<CampoLivreParts>;

    /// Outbound settlement API payload
    fn to_remote(&self, slip: &Boleto) -> Result<Value>;

    /// Construction parameters from an inbound settlement API payload
    fn from_remote(&self, payload: &Value, context: RemoteContext) -> Result<SlipParams>;
}

/// Sicredi (748)
#[derive(Default)]
pub struct Sicredi {
    metrics: Option<Arc<Metrics>>,
}

impl Sicredi {
    /// Create the variant without metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the variant recording into `metrics`
    pub fn with_metrics(metrics: Arc<Metrics>) -> Self {
        Self {
            metrics: Some(metrics),
        }
    }

    fn record(&self, f: impl FnOnce(&Metrics)) {
        if let Some(metrics) = &self.metrics {
            f(metrics);
        }
    }
}

impl BankVariant for Sicredi {
    fn bank_code(&self) -> BankCode {
        BankCode::Sicredi
    }

    fn generate_nosso_numero(
        &self,
        account: &AccountIdentity,
        issue_year: &str,
        byte_tag: u8,
        document_sequence: u64,
    ) -> Result<NossoNumero> {
        let generated = nosso_numero::generate(account, issue_year, byte_tag, document_sequence)?;
        self.record(|m| m.nosso_numero_generated.inc());
        Ok(generated)
    }

    fn encode_campo_livre(
        &self,
        registered: bool,
        carteira: Carteira,
        nosso_numero: &NossoNumero,
        account: &AccountIdentity,
    ) -> Result<CampoLivre> {
        let field = campo_livre::encode(registered, carteira, nosso_numero, account)?;
        self.record(|m| m.campo_livre_encoded.inc());
        Ok(field)
    }

    fn parse_campo_livre(&self, raw: &str) -> Result<CampoLivreParts> {
        campo_livre::parse(raw).map_err(|e| {
            tracing::warn!(error = %e, "Rejected campo livre");
            self.record(|m| m.campo_livre_parse_failures.inc());
            e
        })
    }

    fn to_remote(&self, slip: &Boleto) -> Result<Value> {
        Ok(api::to_remote(slip))
    }

    fn from_remote(&self, payload: &Value, context: RemoteContext) -> Result<SlipParams> {
        let params = api::from_remote(payload, context)?;
        self.record(|m| {
            m.remote_imports.inc();
            if params.status.as_ref().is_some_and(|s| s.is_unmapped()) {
                m.remote_unknown_status.inc();
            }
        });
        Ok(params)
    }
}

/// Variant for `code`
pub fn variant(code: BankCode) -> Arc<dyn BankVariant> {
    match code {
        BankCode::Sicredi => sicredi(),
    }
}

/// Variant for `code`, recording into `metrics`
pub fn variant_with_metrics(code: BankCode, metrics: Arc<Metrics>) -> Arc<dyn BankVariant> {
    match code {
        BankCode::Sicredi => Arc::new(Sicredi::with_metrics(metrics)),
    }
}

/// Sicredi variant without metrics
pub fn sicredi() -> Arc<dyn BankVariant> {
    Arc::new(Sicredi::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Party;
    use serde_json::json;

    #[test]
    fn test_bank_code() {
        let code = BankCode::from_code("748").unwrap();
        assert_eq!(code, BankCode::Sicredi);
        assert_eq!(code.to_string(), "748");
        assert_eq!(
            BankCode::from_code("001").unwrap_err().kind(),
            crate::ErrorKind::InvalidArgument
        );
        assert_eq!(variant(code).bank_code(), BankCode::Sicredi);
    }

    #[test]
    fn test_metrics_recorded() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let bank = variant_with_metrics(BankCode::Sicredi, metrics.clone());
        let account = AccountIdentity::new("0716", "02", "12345").unwrap();

        let nn = bank.generate_nosso_numero(&account, "23", 2, 1).unwrap();
        bank.encode_campo_livre(true, Carteira::One, &nn, &account)
            .unwrap();
        assert!(bank.parse_campo_livre("123").is_err());

        let context = RemoteContext::new(Party::new("Coop", "12345678000190"), account);
        bank.from_remote(&json!({"situacao": "SUSTADO"}), context)
            .unwrap();

        assert_eq!(metrics.nosso_numero_generated.get(), 1);
        assert_eq!(metrics.campo_livre_encoded.get(), 1);
        assert_eq!(metrics.campo_livre_parse_failures.get(), 1);
        assert_eq!(metrics.remote_imports.get(), 1);
        assert_eq!(metrics.remote_unknown_status.get(), 1);
    }
}
