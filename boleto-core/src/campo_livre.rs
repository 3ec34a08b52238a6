//! Free field (campo livre) codec
//!
//! ```text
//! offset  0      registration flag ('1' registered, '3' unregistered)
//! offset  1      wallet
//! offset  2..11  Nosso Número (8 digits + check digit)
//! offset 11..15  branch
//! offset 15..17  post
//! offset 17..22  client
//! offset 22..24  "10"
//! offset 24      modulo-11 over offsets 0..24
//! ```

use crate::{
    checksum, format, nosso_numero,
    types::{
        AccountIdentity, CampoLivre, CampoLivreParts, Carteira, NossoNumero, CAMPO_LIVRE_LEN,
    },
    Error, Result,
};

const REGISTERED: char = '1';
const UNREGISTERED: char = '3';
const FILLER: &str = "10";

/// Assemble the free field. A Nosso Número whose components do not fit
/// their slots is rejected before anything is assembled.
pub fn encode(
    registered: bool,
    carteira: Carteira,
    nosso_numero: &NossoNumero,
    account: &AccountIdentity,
) -> Result<CampoLivre> {
    nosso_numero::validate(nosso_numero)?;

    let mut field = String::with_capacity(CAMPO_LIVRE_LEN);
    field.push(if registered { REGISTERED } else { UNREGISTERED });
    field.push(carteira.wallet_digit());
    field.push_str(&nosso_numero.full());
    field.push_str(&format::pad(account.branch_code(), 4));
    field.push_str(&format::pad(account.post_code(), 2));
    field.push_str(&format::pad(account.client_code(), 5));
    field.push_str(FILLER);
    let dv = checksum::modulo11(&field)?;
    field.push(char::from(b'0' + dv));

    tracing::debug!(campo_livre = %field, registered, "Encoded campo livre");

    CampoLivre::new(field)
}

/// Split a raw free field into its components.
///
/// The shape, the registration flag, the Nosso Número byte tag (1..=9) and
/// the fixed `10` at offsets 22..24 are checked; use [`verify`] for the
/// trailing digit.
pub fn parse(raw: &str) -> Result<CampoLivreParts> {
    let field = CampoLivre::new(raw)?;
    let s = field.as_str();
    let registered = match &s[0..1] {
        "1" => true,
        "3" => false,
        other => {
            return Err(Error::MalformedInput(format!(
                "unknown registration flag '{}'",
                other
            )))
        }
    };
    if &s[4..5] == "0" {
        return Err(Error::MalformedInput(format!(
            "nosso numero byte tag must be 1..=9 in '{}'",
            s
        )));
    }
    if &s[22..24] != FILLER {
        return Err(Error::MalformedInput(format!(
            "expected '{}' at offsets 22..24, got '{}'",
            FILLER,
            &s[22..24]
        )));
    }

    Ok(CampoLivreParts {
        convenio: None,
        agencia_dv: None,
        conta_corrente_dv: None,
        registered,
        codigo_cliente: s[17..22].to_string(),
        carteira: s[1..2].to_string(),
        nosso_numero: s[2..10].to_string(),
        nosso_numero_dv: s[10..11].to_string(),
        nosso_numero_full: s[2..11].to_string(),
        agencia: s[11..15].to_string(),
        posto: s[15..17].to_string(),
        dv: s[24..25].to_string(),
    })
}

/// Recompute the trailing check digit and compare
pub fn verify(field: &CampoLivre) -> Result<bool> {
    let s = field.as_str();
    let expected = checksum::modulo11(&s[..CAMPO_LIVRE_LEN - 1])?;
    Ok(s.as_bytes()[CAMPO_LIVRE_LEN - 1] == b'0' + expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn account() -> AccountIdentity {
        AccountIdentity::new("0716", "02", "12345").unwrap()
    }

    #[test]
    fn test_encode_example() {
        let nn = nosso_numero::generate(&account(), "23", 2, 1).unwrap();
        let field = encode(true, Carteira::One, &nn, &account()).unwrap();
        assert_eq!(field.as_str(), "1123200001007160212345106");
        assert!(field.as_str().starts_with("11"));
        assert_eq!(&field.as_str()[22..24], "10");
        assert!(verify(&field).unwrap());
    }

    #[test]
    fn test_encode_unregistered_flag() {
        let nn = nosso_numero::generate(&account(), "23", 2, 1).unwrap();
        let field = encode(false, Carteira::Three, &nn, &account()).unwrap();
        assert!(field.as_str().starts_with("33"));
        assert!(verify(&field).unwrap());
    }

    #[test]
    fn test_parse_example() {
        let parts = parse("1123200001007160212345106").unwrap();
        assert!(parts.registered);
        assert_eq!(parts.carteira, "1");
        assert_eq!(parts.nosso_numero, "23200001");
        assert_eq!(parts.nosso_numero_dv, "0");
        assert_eq!(parts.nosso_numero_full, "232000010");
        assert_eq!(parts.agencia, "0716");
        assert_eq!(parts.posto, "02");
        assert_eq!(parts.codigo_cliente, "12345");
        assert_eq!(parts.dv, "6");
        assert_eq!(parts.convenio, None);
        assert_eq!(parts.conta_corrente_dv, None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in [
            "",
            "112320000100716021234510",
            "11232000010071602123451066",
            "1123200001007160212345 06",
        ] {
            assert_eq!(parse(raw).unwrap_err().kind(), ErrorKind::MalformedInput);
        }
        assert_eq!(
            parse("2123200001007160212345106").unwrap_err().kind(),
            ErrorKind::MalformedInput
        );
    }

    #[test]
    fn test_parse_rejects_bad_filler_and_byte() {
        // "10" replaced by "00"
        assert_eq!(
            parse("1123200001007160212345006").unwrap_err().kind(),
            ErrorKind::MalformedInput
        );
        // byte tag 0 in the Nosso Número
        assert_eq!(
            parse("1123000001007160212345106").unwrap_err().kind(),
            ErrorKind::MalformedInput
        );
    }

    #[test]
    fn test_encode_rejects_misshapen_nosso_numero() {
        let valid = nosso_numero::generate(&account(), "23", 2, 1).unwrap();
        let cases = [
            NossoNumero { byte_tag: 12, ..valid.clone() },
            NossoNumero { sequence: "1".into(), ..valid.clone() },
            NossoNumero { sequence: "1234567".into(), ..valid.clone() },
            NossoNumero { issue_year: "3".into(), ..valid.clone() },
        ];
        for nn in cases {
            let err = encode(true, Carteira::One, &nn, &account()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn test_verify_detects_tampering() {
        let field = CampoLivre::new("1123200001007160212345107").unwrap();
        assert!(!verify(&field).unwrap());
    }
}
