//! Category selection by declared parameter name

use crate::algorithm::AlgorithmCategory;

/// Pick the category for a test from the parameter names it declares
///
/// Categories are tried in the order cipher, MAC, key exchange; the first one
/// whose parameter name is declared wins. Returns `None` when the test
/// declares none of them, in which case no matrix is generated.
pub fn select_category<S: AsRef<str>>(declared: &[S]) -> Option<AlgorithmCategory> {
    AlgorithmCategory::ALL
        .into_iter()
        .find(|category| declared.iter().any(|name| name.as_ref() == category.parameter_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_single() {
        assert_eq!(
            select_category(&["duthost", "enum_dut_ssh_kex"]),
            Some(AlgorithmCategory::KeyExchange)
        );
    }

    #[test]
    fn test_cipher_wins_over_mac() {
        assert_eq!(
            select_category(&["enum_dut_ssh_mac", "enum_dut_ssh_enc_cipher"]),
            Some(AlgorithmCategory::EncryptionCipher)
        );
    }

    #[test]
    fn test_unrecognized_is_noop() {
        assert_eq!(select_category(&["enum_dut_ssh_hostkey"]), None);
        assert_eq!(select_category::<&str>(&[]), None);
    }
}
