//! Core types for the boleto engine
//!
//! All digit-string types are normalized at construction: they hold exactly
//! the number of ASCII digits their slot in the free field occupies.

use crate::{format, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the free field
pub const CAMPO_LIVRE_LEN: usize = 25;

/// Largest document sequence that fits the Nosso Número
pub const MAX_SEQUENCE: u64 = 99_999;

fn digits_up_to(field: &str, value: &str, width: usize) -> Result<String> {
    let trimmed = value.trim();
    if !format::is_digits(trimmed) || trimmed.len() > width {
        return Err(Error::InvalidArgument(format!(
            "{} must have 1 to {} digits, got '{}'",
            field, width, value
        )));
    }
    Ok(format::pad(trimmed, width))
}

/// Branch, post and client codes identifying the beneficiary account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountIdentity {
    branch_code: String,
    post_code: String,
    client_code: String,
}

impl AccountIdentity {
    /// Create a new account identity, zero-padding each code to its width
    pub fn new(
        branch_code: impl AsRef<str>,
        post_code: impl AsRef<str>,
        client_code: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            branch_code: digits_up_to("branch code", branch_code.as_ref(), 4)?,
            post_code: digits_up_to("post code", post_code.as_ref(), 2)?,
            client_code: digits_up_to("client code", client_code.as_ref(), 5)?,
        })
    }

    /// Branch (agência), 4 digits
    pub fn branch_code(&self) -> &str {
        &self.branch_code
    }

    /// Post (posto), 2 digits
    pub fn post_code(&self) -> &str {
        &self.post_code
    }

    /// Client (código do beneficiário), 5 digits
    pub fn client_code(&self) -> &str {
        &self.client_code
    }

    /// `AAAA.PP.CCCCC` rendering printed in the beneficiary box
    pub fn agencia_codigo_beneficiario(&self) -> String {
        format!(
            "{}.{}.{}",
            self.branch_code, self.post_code, self.client_code
        )
    }
}

/// Issuer-assigned document identifier: year, byte, sequence, check digit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NossoNumero {
    /// Two-digit issue year
    pub issue_year: String,
    /// Byte tag (1..=9)
    pub byte_tag: u8,
    /// Five-digit zero-padded sequence
    pub sequence: String,
    /// Check digit
    pub check_digit: u8,
}

impl NossoNumero {
    /// Display mask: year, byte and sequence, check digit
    pub const MASK: &'static str = "##/######-#";

    /// The eight digits preceding the check digit
    pub fn body(&self) -> String {
        format!("{}{}{}", self.issue_year, self.byte_tag, self.sequence)
    }

    /// All nine digits
    pub fn full(&self) -> String {
        format!("{}{}", self.body(), self.check_digit)
    }

    /// Masked form printed on the slip (`23/200001-0`)
    pub fn masked(&self) -> String {
        format::mask(&self.full(), Self::MASK)
    }
}

impl fmt::Display for NossoNumero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full())
    }
}

/// 25-digit bank-specific segment of the barcode line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CampoLivre(String);

impl CampoLivre {
    /// Wrap a raw free field after checking its shape
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.len() != CAMPO_LIVRE_LEN || !format::is_digits(&raw) {
            return Err(Error::MalformedInput(format!(
                "free field must be {} digits, got '{}'",
                CAMPO_LIVRE_LEN, raw
            )));
        }
        Ok(Self(raw))
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CampoLivre {
    type Error = Error;

    fn try_from(raw: String) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<CampoLivre> for String {
    fn from(value: CampoLivre) -> Self {
        value.0
    }
}

impl fmt::Display for CampoLivre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured view of a parsed free field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampoLivreParts {
    /// Not used by this layout
    pub convenio: Option<String>,
    /// Not used by this layout
    pub agencia_dv: Option<String>,
    /// Not used by this layout
    pub conta_corrente_dv: Option<String>,
    /// Registration flag ('1' registered, '3' unregistered)
    pub registered: bool,
    /// Client code, offsets 17..22
    pub codigo_cliente: String,
    /// Wallet digit, offset 1
    pub carteira: String,
    /// Nosso Número without check digit, offsets 2..10
    pub nosso_numero: String,
    /// Nosso Número check digit, offset 10
    pub nosso_numero_dv: String,
    /// Nosso Número with check digit, offsets 2..11
    pub nosso_numero_full: String,
    /// Branch, offsets 11..15
    pub agencia: String,
    /// Post, offsets 15..17
    pub posto: String,
    /// Trailing checksum digit, offset 24
    pub dv: String,
}

/// Wallet (carteira) codes accepted by the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Carteira {
    /// `A`, simple collection; encodes as wallet 1
    A,
    /// `1`
    #[serde(rename = "1")]
    One,
    /// `2`
    #[serde(rename = "2")]
    Two,
    /// `3`
    #[serde(rename = "3")]
    Three,
}

impl Carteira {
    /// Parse from string
    pub fn parse(code: &str) -> Result<Self> {
        match code.trim() {
            "A" | "a" => Ok(Carteira::A),
            "1" => Ok(Carteira::One),
            "2" => Ok(Carteira::Two),
            "3" => Ok(Carteira::Three),
            other => Err(Error::InvalidArgument(format!(
                "carteira must be one of A, 1, 2, 3, got '{}'",
                other
            ))),
        }
    }

    /// Digit written into the free field
    pub fn wallet_digit(&self) -> char {
        match self {
            Carteira::A | Carteira::One => '1',
            Carteira::Two => '2',
            Carteira::Three => '3',
        }
    }
}

impl fmt::Display for Carteira {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Carteira::A => write!(f, "A"),
            other => write!(f, "{}", other.wallet_digit()),
        }
    }
}

/// Print layout (tipo de impressão)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrintType {
    /// `A`, normal slip
    #[serde(rename = "A")]
    Normal,
    /// `B`, payment booklet
    #[serde(rename = "B")]
    Carne,
}

impl PrintType {
    /// Parse from string
    pub fn parse(code: &str) -> Result<Self> {
        match code.trim() {
            "A" | "a" => Ok(PrintType::Normal),
            "B" | "b" => Ok(PrintType::Carne),
            other => Err(Error::InvalidArgument(format!(
                "print type must be A or B, got '{}'",
                other
            ))),
        }
    }
}

/// Person type of a payer or guarantor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonType {
    /// CPF holder
    #[serde(rename = "PESSOA_FISICA")]
    Natural,
    /// CNPJ holder
    #[serde(rename = "PESSOA_JURIDICA")]
    Legal,
}

impl PersonType {
    /// Legal entity when the document has 14 digits
    pub fn from_document(documento: &str) -> Self {
        if format::only_numbers(documento).len() == 14 {
            PersonType::Legal
        } else {
            PersonType::Natural
        }
    }

    /// Remote API vocabulary
    pub fn as_api_str(&self) -> &'static str {
        match self {
            PersonType::Natural => "PESSOA_FISICA",
            PersonType::Legal => "PESSOA_JURIDICA",
        }
    }
}

/// Settlement status of a slip
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlipStatus {
    /// Paid
    Paid,
    /// Written off
    WrittenOff,
    /// Open (includes overdue)
    Open,
    /// Protested
    Protested,
    /// Status the engine has no mapping for, kept verbatim
    Other(String),
}

impl SlipStatus {
    /// Translate the remote vocabulary, passing unknown values through
    pub fn from_remote(status: &str) -> Self {
        match status {
            "LIQUIDADO" => SlipStatus::Paid,
            "BAIXADO" => SlipStatus::WrittenOff,
            "EM_ABERTO" | "VENCIDO" => SlipStatus::Open,
            "PROTESTADO" => SlipStatus::Protested,
            other => SlipStatus::Other(other.to_string()),
        }
    }

    /// True when the remote value had no mapping
    pub fn is_unmapped(&self) -> bool {
        matches!(self, SlipStatus::Other(_))
    }
}

/// Payer, guarantor or beneficiary record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Name
    pub nome: Option<String>,
    /// CPF or CNPJ, any punctuation
    pub documento: Option<String>,
    /// Street address
    pub endereco: Option<String>,
    /// District
    pub bairro: Option<String>,
    /// City
    pub cidade: Option<String>,
    /// State abbreviation
    pub uf: Option<String>,
    /// Postal code, any punctuation
    pub cep: Option<String>,
}

impl Party {
    /// Create a party with a name and tax document
    pub fn new(nome: impl Into<String>, documento: impl Into<String>) -> Self {
        Self {
            nome: Some(nome.into()),
            documento: Some(documento.into()),
            ..Default::default()
        }
    }

    /// Set the address block
    pub fn with_address(
        mut self,
        endereco: impl Into<String>,
        cidade: impl Into<String>,
        uf: impl Into<String>,
        cep: impl Into<String>,
    ) -> Self {
        self.endereco = Some(endereco.into());
        self.cidade = Some(cidade.into());
        self.uf = Some(uf.into());
        self.cep = Some(cep.into());
        self
    }

    /// Person type derived from the document
    pub fn person_type(&self) -> PersonType {
        PersonType::from_document(self.documento.as_deref().unwrap_or_default())
    }
}

/// Lifecycle of a lazily derived field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Derived<T> {
    /// Not computed yet
    #[default]
    Unset,
    /// Computed or explicitly set; never changes again
    Frozen(T),
}

impl<T> Derived<T> {
    /// Frozen value, if any
    pub fn get(&self) -> Option<&T> {
        match self {
            Derived::Unset => None,
            Derived::Frozen(value) => Some(value),
        }
    }

    /// True once frozen
    pub fn is_frozen(&self) -> bool {
        matches!(self, Derived::Frozen(_))
    }

    /// Freeze with `value`. `name` identifies the field in the error.
    pub fn freeze(&mut self, name: &'static str, value: T) -> Result<&T> {
        if self.is_frozen() {
            return Err(Error::AlreadyFrozen(name));
        }
        *self = Derived::Frozen(value);
        self.get().ok_or(Error::AlreadyFrozen(name))
    }

    /// Return the frozen value, deriving it with `init` on first use.
    /// A failed derivation leaves the field unset.
    pub fn get_or_try_freeze<F>(&mut self, init: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Derived::Unset = self {
            *self = Derived::Frozen(init()?);
        }
        match self {
            Derived::Frozen(value) => Ok(value),
            Derived::Unset => unreachable!("derived field frozen above"),
        }
    }
}
