//! Nosso Número generation
//!
//! Layout: 2-digit issue year, 1-digit byte tag, 5-digit sequence and a
//! modulo-11 check digit computed over
//! `branch ++ post ++ client ++ year ++ byte ++ sequence`.

use crate::{
    checksum, format,
    types::{AccountIdentity, NossoNumero, MAX_SEQUENCE},
    Error, Result,
};
use chrono::NaiveDate;

/// Validate a byte tag (1..=9)
pub fn validate_byte_tag(byte_tag: u8) -> Result<u8> {
    if !(1..=9).contains(&byte_tag) {
        return Err(Error::InvalidArgument(format!(
            "byte tag must be between 1 and 9, got {}",
            byte_tag
        )));
    }
    Ok(byte_tag)
}

/// Zero-pad a document sequence to five digits
pub fn sequence(document_sequence: u64) -> Result<String> {
    if document_sequence > MAX_SEQUENCE {
        return Err(Error::OutOfRange {
            field: "document sequence",
            value: document_sequence,
            max: MAX_SEQUENCE,
        });
    }
    Ok(format::pad_number(document_sequence, 5))
}

/// Two-digit issue year of a document date
pub fn issue_year(data_documento: NaiveDate) -> String {
    data_documento.format("%y").to_string()
}

/// Check digit for the given components
pub fn check_digit(
    account: &AccountIdentity,
    issue_year: &str,
    byte_tag: u8,
    sequence: &str,
) -> Result<u8> {
    let input = format!(
        "{}{}{}{}{}{}",
        account.branch_code(),
        account.post_code(),
        account.client_code(),
        format::pad(issue_year, 2),
        format::pad_number(u64::from(byte_tag), 1),
        format::pad(sequence, 5),
    );
    checksum::modulo11(&input)
}

/// Generate the Nosso Número for a document
pub fn generate(
    account: &AccountIdentity,
    issue_year: &str,
    byte_tag: u8,
    document_sequence: u64,
) -> Result<NossoNumero> {
    let byte_tag = validate_byte_tag(byte_tag)?;
    let year = issue_year.trim();
    if year.len() != 2 || !format::is_digits(year) {
        return Err(Error::InvalidArgument(format!(
            "issue year must be 2 digits, got '{}'",
            issue_year
        )));
    }
    let sequence = sequence(document_sequence)?;
    let check_digit = check_digit(account, year, byte_tag, &sequence)?;

    tracing::debug!(
        client_code = account.client_code(),
        issue_year = year,
        byte_tag,
        sequence = %sequence,
        check_digit,
        "Generated nosso numero"
    );

    Ok(NossoNumero {
        issue_year: year.to_string(),
        byte_tag,
        sequence,
        check_digit,
    })
}

/// Check that every component fits its slot: 2-digit year, byte 1..=9,
/// 5-digit sequence and a single check digit
pub fn validate(nosso_numero: &NossoNumero) -> Result<()> {
    validate_byte_tag(nosso_numero.byte_tag)?;
    if nosso_numero.issue_year.len() != 2 || !format::is_digits(&nosso_numero.issue_year) {
        return Err(Error::InvalidArgument(format!(
            "issue year must be 2 digits, got '{}'",
            nosso_numero.issue_year
        )));
    }
    if nosso_numero.sequence.len() != 5 || !format::is_digits(&nosso_numero.sequence) {
        return Err(Error::InvalidArgument(format!(
            "sequence must be 5 digits, got '{}'",
            nosso_numero.sequence
        )));
    }
    if nosso_numero.check_digit > 9 {
        return Err(Error::InvalidArgument(format!(
            "check digit must be 0..=9, got {}",
            nosso_numero.check_digit
        )));
    }
    Ok(())
}

/// Split a nine-digit Nosso Número (`232000010`) into its components
pub fn parse(raw: &str) -> Result<NossoNumero> {
    let digits = raw.trim();
    if digits.len() != 9 || !format::is_digits(digits) {
        return Err(Error::MalformedInput(format!(
            "nosso numero must be 9 digits, got '{}'",
            raw
        )));
    }
    let byte_tag = digits.as_bytes()[2] - b'0';
    validate_byte_tag(byte_tag).map_err(|e| Error::MalformedInput(e.to_string()))?;

    Ok(NossoNumero {
        issue_year: digits[0..2].to_string(),
        byte_tag,
        sequence: digits[3..8].to_string(),
        check_digit: digits.as_bytes()[8] - b'0',
    })
}

/// Recompute the check digit of `nosso_numero` and compare
pub fn verify(account: &AccountIdentity, nosso_numero: &NossoNumero) -> Result<bool> {
    let expected = check_digit(
        account,
        &nosso_numero.issue_year,
        nosso_numero.byte_tag,
        &nosso_numero.sequence,
    )?;
    Ok(expected == nosso_numero.check_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn account() -> AccountIdentity {
        AccountIdentity::new("0716", "02", "12345").unwrap()
    }

    #[test]
    fn test_generate_example() {
        let nn = generate(&account(), "23", 2, 1).unwrap();
        assert_eq!(nn.body(), "23200001");
        assert_eq!(nn.check_digit, 0);
        assert_eq!(nn.full(), "232000010");
        assert_eq!(nn.masked(), "23/200001-0");
        assert!(verify(&account(), &nn).unwrap());
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate(&account(), "24", 3, 4711).unwrap();
        let b = generate(&account(), "24", 3, 4711).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sequence_boundaries() {
        assert_eq!(sequence(99_999).unwrap(), "99999");
        let err = generate(&account(), "23", 2, 100_000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_byte_tag_boundaries() {
        assert_eq!(
            generate(&account(), "23", 0, 1).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            generate(&account(), "23", 10, 1).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert!(generate(&account(), "23", 9, 1).is_ok());
    }

    #[test]
    fn test_issue_year() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 17).unwrap();
        assert_eq!(issue_year(date), "23");
        assert!(generate(&account(), "2023", 2, 1).is_err());
    }

    #[test]
    fn test_parse() {
        let nn = parse("232000427").unwrap();
        assert_eq!(nn.issue_year, "23");
        assert_eq!(nn.byte_tag, 2);
        assert_eq!(nn.sequence, "00042");
        assert_eq!(nn.check_digit, 7);
        assert_eq!(nn, generate(&account(), "23", 2, 42).unwrap());

        assert_eq!(parse("23200042").unwrap_err().kind(), ErrorKind::MalformedInput);
        assert_eq!(parse("230000427").unwrap_err().kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_validate_rejects_misshapen_components() {
        let valid = generate(&account(), "23", 2, 1).unwrap();
        assert!(validate(&valid).is_ok());

        let cases = [
            NossoNumero { byte_tag: 12, ..valid.clone() },
            NossoNumero { byte_tag: 0, ..valid.clone() },
            NossoNumero { sequence: "1".into(), ..valid.clone() },
            NossoNumero { issue_year: "2023".into(), ..valid.clone() },
            NossoNumero { check_digit: 10, ..valid.clone() },
        ];
        for nn in cases {
            assert_eq!(validate(&nn).unwrap_err().kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn test_verify_detects_tampering() {
        let mut nn = generate(&account(), "23", 2, 1).unwrap();
        nn.check_digit = (nn.check_digit + 1) % 10;
        assert!(!verify(&account(), &nn).unwrap());
    }
}
