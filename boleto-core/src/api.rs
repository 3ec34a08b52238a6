//! Settlement API payload mapping
//!
//! Outbound payloads are sparse: keys whose value is null, an empty string or
//! an empty collection are left out, nested blocks included. Inbound payloads
//! are read by dotted path; a missing leaf is `None`, never an error.

use crate::{
    boleto::Boleto,
    especie, format,
    types::{AccountIdentity, Party, SlipStatus},
    Error, Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identity the payload cannot carry, supplied by the importing caller
#[derive(Debug, Clone, Default)]
pub struct RemoteContext {
    /// Beneficiary (cedente) record
    pub beneficiario: Option<Party>,
    /// Account identity the slip was issued under
    pub conta: Option<AccountIdentity>,
}

impl RemoteContext {
    /// Context with both identities present
    pub fn new(beneficiario: Party, conta: AccountIdentity) -> Self {
        Self {
            beneficiario: Some(beneficiario),
            conta: Some(conta),
        }
    }
}

/// Slip construction parameters recovered from an inbound payload
#[derive(Debug, Clone, PartialEq)]
pub struct SlipParams {
    /// Beneficiary from the context
    pub beneficiario: Party,
    /// Account identity from the context
    pub conta: AccountIdentity,
    /// Settlement status (`situacao`)
    pub status: Option<SlipStatus>,
    /// Raw Nosso Número (`nossoNumero`)
    pub nosso_numero: Option<String>,
    /// Face amount (`valor`)
    pub valor: Option<Decimal>,
    /// Document number (`seuNumero`)
    pub numero: Option<String>,
    /// Document number (`seuNumero`)
    pub numero_documento: Option<String>,
    /// Due date (`dataVencimento`)
    pub data_vencimento: Option<NaiveDate>,
    /// Payer (`pagador.*`), absent when every leaf is missing
    pub pagador: Option<Party>,
}

/// Read a dotted path (`pagador.nome`) out of a payload
pub fn get_path<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(payload, |node, key| node.as_object()?.get(key))
        .filter(|value| !value.is_null())
}

fn text(payload: &Value, path: &str) -> Option<String> {
    match get_path(payload, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Build an object from ordered pairs, dropping absent and empty values
fn sparse(pairs: Vec<(&'static str, Option<Value>)>) -> Value {
    let map: Map<String, Value> = pairs
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !is_empty(v)).map(|v| (key.to_string(), v)))
        .collect();
    Value::Object(map)
}

fn opt_str(value: &Option<String>) -> Option<Value> {
    value.as_ref().map(|s| Value::String(s.clone()))
}

fn digits(value: &Option<String>) -> Option<String> {
    value.as_deref().map(format::only_numbers)
}

fn lines(values: &[String]) -> Option<Value> {
    let kept: Vec<Value> = values
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Value::String(line.clone()))
        .collect();
    Some(Value::Array(kept))
}

fn pagador_block(pagador: &Party) -> Value {
    sparse(vec![
        ("tipoPessoa", Some(pagador.person_type().as_api_str().into())),
        ("documento", digits(&pagador.documento).map(Value::String)),
        ("nome", opt_str(&pagador.nome)),
        ("endereco", opt_str(&pagador.endereco)),
        ("cidade", opt_str(&pagador.cidade)),
        ("uf", opt_str(&pagador.uf)),
        ("cep", digits(&pagador.cep).map(Value::String)),
    ])
}

fn beneficiario_final_block(avalista: &Party) -> Value {
    let cep = digits(&avalista.cep)
        .and_then(|cep| cep.parse::<u64>().ok())
        .map(Value::from);
    sparse(vec![
        ("tipoPessoa", Some(avalista.person_type().as_api_str().into())),
        ("documento", digits(&avalista.documento).map(Value::String)),
        ("nome", opt_str(&avalista.nome)),
        ("logradouro", opt_str(&avalista.endereco)),
        ("cidade", opt_str(&avalista.cidade)),
        ("uf", opt_str(&avalista.uf)),
        ("cep", cep),
    ])
}

/// Build the outbound payload for a slip
pub fn to_remote(slip: &Boleto) -> Value {
    let seu_numero = slip
        .numero()
        .map(|n| n.to_string())
        .or_else(|| slip.numero_documento().map(str::to_string));

    sparse(vec![
        (
            "codigoBeneficiario",
            Some(slip.account().client_code().into()),
        ),
        ("seuNumero", seu_numero.map(Value::String)),
        ("valor", Some(format::amount(slip.valor()).into())),
        (
            "dataVencimento",
            Some(slip.data_vencimento().format(DATE_FORMAT).to_string().into()),
        ),
        (
            "especieDocumento",
            Some(especie::api_code(slip.especie_doc()).into()),
        ),
        ("tipoCobranca", Some(slip.tipo_cobranca().into())),
        ("pagador", Some(pagador_block(slip.pagador()))),
        (
            "beneficiarioFinal",
            slip.sacador_avalista().map(beneficiario_final_block),
        ),
        ("informativos", lines(slip.descricao_demonstrativo())),
        ("mensagens", lines(slip.instrucoes())),
    ])
}

fn decimal(payload: &Value, path: &str) -> Result<Option<Decimal>> {
    text(payload, path)
        .map(|raw| {
            Decimal::from_str(raw.trim())
                .or_else(|_| Decimal::from_scientific(raw.trim()))
                .map_err(|_| Error::MalformedInput(format!("{} is not numeric: '{}'", path, raw)))
        })
        .transpose()
}

fn date(payload: &Value, path: &str) -> Result<Option<NaiveDate>> {
    text(payload, path)
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
                Error::MalformedInput(format!("{} is not YYYY-MM-DD: '{}'", path, raw))
            })
        })
        .transpose()
}

fn pagador_from(payload: &Value) -> Option<Party> {
    let pagador = Party {
        nome: text(payload, "pagador.nome"),
        documento: text(payload, "pagador.documento"),
        endereco: text(payload, "pagador.endereco"),
        bairro: text(payload, "pagador.bairro"),
        cidade: text(payload, "pagador.cidade"),
        uf: text(payload, "pagador.uf"),
        cep: text(payload, "pagador.cep"),
    };
    (pagador != Party::default()).then_some(pagador)
}

/// Recover slip construction parameters from an inbound payload
pub fn from_remote(payload: &Value, context: RemoteContext) -> Result<SlipParams> {
    let beneficiario = context
        .beneficiario
        .ok_or(Error::MissingContext("beneficiario"))?;
    let conta = context.conta.ok_or(Error::MissingContext("conta"))?;

    let status = text(payload, "situacao").map(|raw| {
        let status = SlipStatus::from_remote(&raw);
        if status.is_unmapped() {
            tracing::warn!(situacao = %raw, "Unmapped remote status passed through");
        }
        status
    });
    let seu_numero = text(payload, "seuNumero");

    Ok(SlipParams {
        beneficiario,
        conta,
        status,
        nosso_numero: text(payload, "nossoNumero"),
        valor: decimal(payload, "valor")?,
        numero: seu_numero.clone(),
        numero_documento: seu_numero,
        data_vencimento: date(payload, "dataVencimento")?,
        pagador: pagador_from(payload),
    })
}
