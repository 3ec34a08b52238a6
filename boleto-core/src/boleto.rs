//! Slip entity
//!
//! The Nosso Número and the free field are derived on first access and then
//! frozen. Later changes to the inputs they were derived from do not alter
//! them; a caller may instead set either one explicitly before first use.

use crate::{
    api::SlipParams,
    bank::BankVariant,
    campo_livre,
    config::Config,
    format, nosso_numero,
    types::{
        AccountIdentity, CampoLivre, CampoLivreParts, Carteira, Derived, NossoNumero, Party,
        PrintType, SlipStatus,
    },
    Error, Result,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;

/// A payment slip bound to one account identity and one bank variant
pub struct Boleto {
    bank: Arc<dyn BankVariant>,
    account: AccountIdentity,
    byte: u8,
    carteira: Carteira,
    registered: bool,
    tipo_cobranca: String,
    print_type: Option<PrintType>,
    local_pagamento: String,
    numero: Option<u64>,
    numero_documento: Option<String>,
    data_documento: NaiveDate,
    data_vencimento: NaiveDate,
    valor: Decimal,
    especie_doc: String,
    pagador: Party,
    beneficiario: Option<Party>,
    sacador_avalista: Option<Party>,
    descricao_demonstrativo: Vec<String>,
    instrucoes: Vec<String>,
    status: Option<SlipStatus>,
    nosso_numero: Derived<NossoNumero>,
    campo_livre: Derived<CampoLivre>,
}

impl std::fmt::Debug for Boleto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Boleto")
            .field("bank", &self.bank.bank_code())
            .field("account", &self.account)
            .field("numero", &self.numero)
            .field("nosso_numero", &self.nosso_numero)
            .field("campo_livre", &self.campo_livre)
            .finish_non_exhaustive()
    }
}

impl Boleto {
    /// Create a slip with the defaults of `config`, dated today
    pub fn new(bank: Arc<dyn BankVariant>, account: AccountIdentity, config: &Config) -> Self {
        let today = Utc::now().date_naive();
        Self {
            bank,
            account,
            byte: config.byte,
            carteira: config.carteira,
            registered: config.registered,
            tipo_cobranca: config.tipo_cobranca.clone(),
            print_type: config.print_type,
            local_pagamento: config.local_pagamento.clone(),
            numero: None,
            numero_documento: None,
            data_documento: today,
            data_vencimento: today,
            valor: Decimal::ZERO,
            especie_doc: "DM".to_string(),
            pagador: Party::default(),
            beneficiario: None,
            sacador_avalista: None,
            descricao_demonstrativo: Vec::new(),
            instrucoes: Vec::new(),
            status: None,
            nosso_numero: Derived::Unset,
            campo_livre: Derived::Unset,
        }
    }

    /// Rebuild a slip from parameters imported from the settlement API
    pub fn from_params(
        bank: Arc<dyn BankVariant>,
        params: SlipParams,
        config: &Config,
    ) -> Result<Self> {
        let mut slip = Self::new(bank, params.conta, config);
        slip.beneficiario = Some(params.beneficiario);
        slip.status = params.status;
        slip.numero = params
            .numero
            .as_deref()
            .filter(|n| format::is_digits(n))
            .and_then(|n| n.parse().ok());
        slip.numero_documento = params.numero_documento;
        if let Some(valor) = params.valor {
            slip.valor = valor;
        }
        if let Some(vencimento) = params.data_vencimento {
            slip.data_vencimento = vencimento;
        }
        if let Some(pagador) = params.pagador {
            slip.pagador = pagador;
        }
        if let Some(raw) = params.nosso_numero {
            slip.set_nosso_numero(&raw)?;
        }
        Ok(slip)
    }

    // =========================================================================
    // BUILDERS
    // =========================================================================

    /// Set the document sequence
    pub fn with_numero(mut self, numero: u64) -> Self {
        self.numero = Some(numero);
        self
    }

    /// Set the document number printed on the slip
    pub fn with_numero_documento(mut self, numero_documento: impl Into<String>) -> Self {
        self.numero_documento = Some(numero_documento.into());
        self
    }

    /// Set the document date; its year goes into the Nosso Número
    pub fn with_data_documento(mut self, date: NaiveDate) -> Self {
        self.data_documento = date;
        self
    }

    /// Set the due date
    pub fn with_data_vencimento(mut self, date: NaiveDate) -> Self {
        self.data_vencimento = date;
        self
    }

    /// Set the face amount
    pub fn with_valor(mut self, valor: Decimal) -> Self {
        self.valor = valor;
        self
    }

    /// Set the document species code (`DM`, `NP`, ...)
    pub fn with_especie_doc(mut self, especie: impl Into<String>) -> Self {
        self.especie_doc = especie.into();
        self
    }

    /// Set the payer
    pub fn with_pagador(mut self, pagador: Party) -> Self {
        self.pagador = pagador;
        self
    }

    /// Set the beneficiary
    pub fn with_beneficiario(mut self, beneficiario: Party) -> Self {
        self.beneficiario = Some(beneficiario);
        self
    }

    /// Set the guarantor (sacador avalista)
    pub fn with_sacador_avalista(mut self, avalista: Party) -> Self {
        self.sacador_avalista = Some(avalista);
        self
    }

    /// Set the statement lines
    pub fn with_descricao_demonstrativo(mut self, lines: Vec<String>) -> Self {
        self.descricao_demonstrativo = lines;
        self
    }

    /// Set the cashier instructions
    pub fn with_instrucoes(mut self, lines: Vec<String>) -> Self {
        self.instrucoes = lines;
        self
    }

    /// Set the print layout
    pub fn with_print_type(mut self, print_type: PrintType) -> Self {
        self.print_type = Some(print_type);
        self
    }

    /// Set the charge type sent to the settlement API
    pub fn with_tipo_cobranca(mut self, tipo: impl Into<String>) -> Self {
        self.tipo_cobranca = tipo.into();
        self
    }

    /// Set registered or unregistered collection
    pub fn with_registro(mut self, registered: bool) -> Self {
        self.registered = registered;
        self
    }

    // =========================================================================
    // VALIDATED SETTERS
    // =========================================================================

    /// Set the byte tag (1..=9)
    pub fn set_byte(&mut self, byte: u8) -> Result<()> {
        self.byte = nosso_numero::validate_byte_tag(byte)?;
        Ok(())
    }

    /// Set the wallet from its code (`A`, `1`, `2`, `3`)
    pub fn set_carteira(&mut self, code: &str) -> Result<()> {
        self.carteira = Carteira::parse(code)?;
        Ok(())
    }

    /// Freeze the Nosso Número from its nine-digit form. The check digit must
    /// match this slip's account.
    pub fn set_nosso_numero(&mut self, raw: &str) -> Result<()> {
        let parsed = nosso_numero::parse(raw)?;
        if !nosso_numero::verify(&self.account, &parsed)? {
            return Err(Error::MalformedInput(format!(
                "nosso numero check digit mismatch for {}: '{}'",
                self.account.agencia_codigo_beneficiario(),
                raw
            )));
        }
        self.nosso_numero.freeze("nosso_numero", parsed)?;
        Ok(())
    }

    /// Freeze the free field from a raw value
    pub fn set_campo_livre(&mut self, raw: &str) -> Result<()> {
        self.bank.parse_campo_livre(raw)?;
        let field = CampoLivre::new(raw)?;
        if !campo_livre::verify(&field)? {
            return Err(Error::MalformedInput(format!(
                "free field check digit mismatch: '{}'",
                raw
            )));
        }
        self.campo_livre.freeze("campo_livre", field)?;
        Ok(())
    }

    // =========================================================================
    // DERIVED FIELDS
    // =========================================================================

    /// Nosso Número, generated on first access
    pub fn nosso_numero(&mut self) -> Result<&NossoNumero> {
        let bank = &self.bank;
        let account = &self.account;
        let byte = self.byte;
        let numero = self.numero;
        let year = nosso_numero::issue_year(self.data_documento);
        self.nosso_numero.get_or_try_freeze(|| {
            let sequence = numero.ok_or(Error::MissingContext("numero"))?;
            bank.generate_nosso_numero(account, &year, byte, sequence)
        })
    }

    /// Masked Nosso Número printed on the slip
    pub fn nosso_numero_boleto(&mut self) -> Result<String> {
        Ok(self.nosso_numero()?.masked())
    }

    /// Free field, encoded on first access
    pub fn campo_livre(&mut self) -> Result<&CampoLivre> {
        if !self.campo_livre.is_frozen() {
            if self.print_type.is_none() {
                return Err(Error::MissingContext("print type"));
            }
            let nosso_numero = self.nosso_numero()?.clone();
            let bank = &self.bank;
            let account = &self.account;
            let (registered, carteira) = (self.registered, self.carteira);
            self.campo_livre.get_or_try_freeze(|| {
                bank.encode_campo_livre(registered, carteira, &nosso_numero, account)
            })?;
        }
        self.campo_livre
            .get()
            .ok_or(Error::MissingContext("campo livre"))
    }

    /// Parse this slip's free field back into its components
    pub fn campo_livre_parts(&mut self) -> Result<CampoLivreParts> {
        let raw = self.campo_livre()?.as_str().to_string();
        self.bank.parse_campo_livre(&raw)
    }

    /// Outbound settlement API payload
    pub fn to_remote(&self) -> Result<Value> {
        self.bank.to_remote(self)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Bank variant
    pub fn bank(&self) -> &dyn BankVariant {
        self.bank.as_ref()
    }

    /// Account identity
    pub fn account(&self) -> &AccountIdentity {
        &self.account
    }

    /// `AAAA.PP.CCCCC`
    pub fn agencia_codigo_beneficiario(&self) -> String {
        self.account.agencia_codigo_beneficiario()
    }

    /// Byte tag
    pub fn byte(&self) -> u8 {
        self.byte
    }

    /// Wallet
    pub fn carteira(&self) -> Carteira {
        self.carteira
    }

    /// Registered collection
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Charge type
    pub fn tipo_cobranca(&self) -> &str {
        &self.tipo_cobranca
    }

    /// Print layout
    pub fn print_type(&self) -> Option<PrintType> {
        self.print_type
    }

    /// Payment place
    pub fn local_pagamento(&self) -> &str {
        &self.local_pagamento
    }

    /// Document sequence
    pub fn numero(&self) -> Option<u64> {
        self.numero
    }

    /// Document number
    pub fn numero_documento(&self) -> Option<&str> {
        self.numero_documento.as_deref()
    }

    /// Document date
    pub fn data_documento(&self) -> NaiveDate {
        self.data_documento
    }

    /// Due date
    pub fn data_vencimento(&self) -> NaiveDate {
        self.data_vencimento
    }

    /// Face amount
    pub fn valor(&self) -> Decimal {
        self.valor
    }

    /// Species code
    pub fn especie_doc(&self) -> &str {
        &self.especie_doc
    }

    /// Payer
    pub fn pagador(&self) -> &Party {
        &self.pagador
    }

    /// Beneficiary
    pub fn beneficiario(&self) -> Option<&Party> {
        self.beneficiario.as_ref()
    }

    /// Guarantor
    pub fn sacador_avalista(&self) -> Option<&Party> {
        self.sacador_avalista.as_ref()
    }

    /// Statement lines
    pub fn descricao_demonstrativo(&self) -> &[String] {
        &self.descricao_demonstrativo
    }

    /// Cashier instructions
    pub fn instrucoes(&self) -> &[String] {
        &self.instrucoes
    }

    /// Settlement status
    pub fn status(&self) -> Option<&SlipStatus> {
        self.status.as_ref()
    }
}
