//! Document species (espécie do documento) lookup tables

/// Species reported to the settlement API when a code has no mapping
pub const API_FALLBACK: &str = "OUTROS";

/// Species vocabulary of the settlement API
pub fn api_code(especie: &str) -> &'static str {
    match especie {
        "DMI" | "DM" => "DUPLICATA_MERCANTIL_INDICACAO",
        "DR" => "DUPLICATA_RURAL",
        "NP" => "NOTA_PROMISSORIA",
        "NR" => "NOTA_PROMISSORIA_RURAL",
        "NS" => "NOTA_SEGUROS",
        "RC" => "RECIBO",
        "LC" => "LETRA_CAMBIO",
        "ND" => "NOTA_DEBITO",
        "DSI" => "DUPLICATA_SERVICO_INDICACAO",
        "OS" => "OUTROS",
        "BP" => "BOLETO_PROPOSTA",
        "CC" => "CARTAO_CREDITO",
        "BD" => "BOLETO_DEPOSITO",
        _ => API_FALLBACK,
    }
}

/// CNAB 240 remittance code
pub fn cnab240_code(especie: &str) -> Option<&'static str> {
    match especie {
        "DMI" => Some("03"),
        "DM" => Some("05"),
        "DR" => Some("06"),
        "NP" => Some("12"),
        "NR" => Some("13"),
        "NS" => Some("16"),
        "RC" => Some("17"),
        "LC" => Some("07"),
        "ND" => Some("19"),
        "DSI" | "OS" => Some("99"),
        _ => None,
    }
}

/// CNAB 400 remittance code
pub fn cnab400_code(especie: &str) -> Option<&'static str> {
    match especie {
        "DMI" | "DM" => Some("A"),
        "DR" => Some("B"),
        "NP" => Some("C"),
        "NR" => Some("D"),
        "NS" => Some("E"),
        "RC" => Some("G"),
        "LC" => Some("H"),
        "ND" => Some("I"),
        "DSI" => Some("J"),
        "OS" => Some("K"),
        _ => None,
    }
}
