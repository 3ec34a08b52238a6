//! Settlement API mapping tests

use boleto_core::{
    api, bank, AccountIdentity, BankVariant, Boleto, Config, Party, PrintType, RemoteContext,
    SlipStatus,
};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;

fn account() -> AccountIdentity {
    AccountIdentity::new("0716", "02", "12345").unwrap()
}

fn slip() -> Boleto {
    let config = Config {
        print_type: Some(PrintType::Normal),
        ..Config::default()
    };
    Boleto::new(bank::sicredi(), account(), &config)
        .with_numero(42)
        .with_valor(dec!(1500.5))
        .with_data_documento(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap())
        .with_data_vencimento(NaiveDate::from_ymd_opt(2023, 6, 30).unwrap())
        .with_especie_doc("DM")
        .with_pagador(
            Party::new("Maria da Silva", "123.456.789-09").with_address(
                "Rua das Flores, 10",
                "Porto Alegre",
                "RS",
                "90000-000",
            ),
        )
}

#[test]
fn test_to_remote_without_guarantor() {
    let payload = slip().to_remote().unwrap();

    assert_eq!(
        payload,
        json!({
            "codigoBeneficiario": "12345",
            "seuNumero": "42",
            "valor": "1500.50",
            "dataVencimento": "2023-06-30",
            "especieDocumento": "DUPLICATA_MERCANTIL_INDICACAO",
            "tipoCobranca": "HIBRIDO",
            "pagador": {
                "tipoPessoa": "PESSOA_FISICA",
                "documento": "12345678909",
                "nome": "Maria da Silva",
                "endereco": "Rua das Flores, 10",
                "cidade": "Porto Alegre",
                "uf": "RS",
                "cep": "90000000"
            }
        })
    );
    let object = payload.as_object().unwrap();
    assert!(!object.contains_key("beneficiarioFinal"));
    assert!(!object.contains_key("informativos"));
    assert!(!object.contains_key("mensagens"));
}

#[test]
fn test_to_remote_with_guarantor_and_messages() {
    let slip = slip()
        .with_especie_doc("XX")
        .with_tipo_cobranca("NORMAL")
        .with_sacador_avalista(
            Party::new("Empresa Avalista LTDA", "12.345.678/0001-90").with_address(
                "Av. Brasil, 500",
                "Curitiba",
                "PR",
                "80000-123",
            ),
        )
        .with_descricao_demonstrativo(vec!["Referente a junho".into(), "".into()])
        .with_instrucoes(vec!["   ".into()]);

    let payload = slip.to_remote().unwrap();

    assert_eq!(payload["especieDocumento"], "OUTROS");
    assert_eq!(payload["tipoCobranca"], "NORMAL");
    assert_eq!(
        payload["beneficiarioFinal"],
        json!({
            "tipoPessoa": "PESSOA_JURIDICA",
            "documento": "12345678000190",
            "nome": "Empresa Avalista LTDA",
            "logradouro": "Av. Brasil, 500",
            "cidade": "Curitiba",
            "uf": "PR",
            "cep": 80000123
        })
    );
    assert_eq!(payload["informativos"], json!(["Referente a junho"]));
    assert!(payload.get("mensagens").is_none());
}

#[test]
fn test_to_remote_never_emits_null() {
    let config = Config::default();
    let slip = Boleto::new(bank::sicredi(), account(), &config)
        .with_data_vencimento(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .with_pagador(Party::new("", "11122233344"));

    let payload = slip.to_remote().unwrap();
    let pagador = payload["pagador"].as_object().unwrap();

    assert!(!pagador.contains_key("nome"));
    assert!(!pagador.contains_key("endereco"));
    assert_eq!(pagador["documento"], "11122233344");
    assert!(payload.get("seuNumero").is_none());
    fn no_nulls(value: &serde_json::Value) -> bool {
        match value {
            serde_json::Value::Null => false,
            serde_json::Value::Object(map) => map.values().all(no_nulls),
            serde_json::Value::Array(items) => items.iter().all(no_nulls),
            _ => true,
        }
    }
    assert!(no_nulls(&payload));
}

#[test]
fn test_import_round_trip() {
    let mut original = slip();
    let issued = original.nosso_numero().unwrap().full();

    let mut inbound = original.to_remote().unwrap();
    inbound["situacao"] = json!("PROTESTADO");
    inbound["nossoNumero"] = json!(issued);

    let context = RemoteContext::new(Party::new("Cooperativa", "12345678000190"), account());
    let params = bank::sicredi().from_remote(&inbound, context).unwrap();
    assert_eq!(params.status, Some(SlipStatus::Protested));
    assert_eq!(params.valor, Some(dec!(1500.50)));

    let mut imported = Boleto::from_params(bank::sicredi(), params, &Config::default()).unwrap();
    assert_eq!(imported.nosso_numero().unwrap().full(), issued);
    assert_eq!(imported.numero(), Some(42));
    assert_eq!(imported.pagador().nome.as_deref(), Some("Maria da Silva"));
    assert_eq!(
        imported.beneficiario().and_then(|b| b.nome.as_deref()),
        Some("Cooperativa")
    );
}

#[test]
fn test_import_without_context_fails() {
    let payload = slip().to_remote().unwrap();
    let err = api::from_remote(&payload, RemoteContext::default()).unwrap_err();
    assert_eq!(err.kind(), boleto_core::ErrorKind::MissingContext);
}

#[test]
fn test_import_rejects_nosso_numero_with_wrong_check_digit() {
    let mut inbound = slip().to_remote().unwrap();
    inbound["nossoNumero"] = json!("232000017");

    let context = RemoteContext::new(Party::new("Cooperativa", "12345678000190"), account());
    let params = bank::sicredi().from_remote(&inbound, context).unwrap();
    let err = Boleto::from_params(bank::sicredi(), params, &Config::default()).unwrap_err();
    assert_eq!(err.kind(), boleto_core::ErrorKind::MalformedInput);
}
