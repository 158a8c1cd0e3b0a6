//! Parametrization emitter

use serde::{Deserialize, Serialize};

use crate::algorithm::AlgorithmCategory;
use crate::reconcile::{Expectation, ReconciledParameter};

/// Reason attached to expected-failure cases
pub const EXPECTED_FAILURE_REASON: &str = "supported by DUT but not on the allow-list";

/// One test instantiation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Runner-facing identifier, `<parameter>[<algorithm>]`
    pub id: String,
    /// Algorithm name passed to the test
    pub value: String,
    pub expectation: Expectation,
    /// Why the case is expected to fail, set only for expected failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TestCase {
    pub fn is_expected_failure(&self) -> bool {
        self.expectation == Expectation::ExpectedFailure
    }
}

/// Test cases for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMatrix {
    pub category: AlgorithmCategory,
    /// Parameter name the cases bind to
    pub parameter: String,
    pub cases: Vec<TestCase>,
    /// Allow-listed algorithms the DUT did not advertise
    #[serde(default)]
    pub missing_from_dut: Vec<String>,
    /// The DUT query failed and the matrix was left empty
    #[serde(default)]
    pub degraded: bool,
}

impl TestMatrix {
    /// Matrix with no cases, used when the DUT could not be queried
    pub fn degraded(category: AlgorithmCategory) -> Self {
        Self {
            category,
            parameter: category.parameter_name().to_string(),
            cases: Vec::new(),
            missing_from_dut: Vec::new(),
            degraded: true,
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn expected_failures(&self) -> impl Iterator<Item = &TestCase> {
        self.cases.iter().filter(|c| c.is_expected_failure())
    }
}

/// Build the matrix for `category`, one case per reconciled parameter
pub fn emit(category: AlgorithmCategory, params: Vec<ReconciledParameter>) -> TestMatrix {
    let parameter = category.parameter_name();

    let cases = params
        .into_iter()
        .map(|p| {
            let reason = p
                .is_expected_failure()
                .then(|| EXPECTED_FAILURE_REASON.to_string());
            TestCase {
                id: format!("{}[{}]", parameter, p.name),
                value: p.name,
                expectation: p.expectation,
                reason,
            }
        })
        .collect();

    TestMatrix {
        category,
        parameter: parameter.to_string(),
        cases,
        missing_from_dut: Vec::new(),
        degraded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_marks_expected_failures() {
        let params = vec![
            ReconciledParameter { name: "aes256-ctr".into(), expectation: Expectation::Expected },
            ReconciledParameter { name: "aes128-cbc".into(), expectation: Expectation::ExpectedFailure },
        ];
        let matrix = emit(AlgorithmCategory::EncryptionCipher, params);

        assert_eq!(matrix.parameter, "enum_dut_ssh_enc_cipher");
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.cases[0].id, "enum_dut_ssh_enc_cipher[aes256-ctr]");
        assert_eq!(matrix.cases[0].reason, None);
        assert_eq!(matrix.cases[1].value, "aes128-cbc");
        assert_eq!(matrix.cases[1].reason.as_deref(), Some(EXPECTED_FAILURE_REASON));
        assert_eq!(matrix.expected_failures().count(), 1);
        assert!(!matrix.degraded);
    }

    #[test]
    fn test_json_shape() {
        let params = vec![ReconciledParameter {
            name: "hmac-sha1".into(),
            expectation: Expectation::ExpectedFailure,
        }];
        let json = serde_json::to_value(emit(AlgorithmCategory::MessageAuthenticationCode, params)).unwrap();

        assert_eq!(json["category"], "mac");
        assert_eq!(json["cases"][0]["expectation"], "expected_failure");
        assert_eq!(json["cases"][0]["id"], "enum_dut_ssh_mac[hmac-sha1]");
    }

    #[test]
    fn test_degraded_is_empty() {
        let matrix = TestMatrix::degraded(AlgorithmCategory::KeyExchange);
        assert!(matrix.is_empty());
        assert!(matrix.degraded);
        assert_eq!(matrix.parameter, "enum_dut_ssh_kex");
    }
}
