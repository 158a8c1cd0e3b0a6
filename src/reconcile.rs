//! Allow-list reconciliation
//!
//! Classifies the algorithms a DUT advertises against the allow-list of their
//! category. Names the allow-list does not know are tagged as expected
//! failures and then permitted for the rest of the session.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::{AlgorithmCategory, AllowList};
use crate::config::AllowLists;

/// Whether a test case is expected to pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The algorithm is on the allow-list
    Expected,
    /// The DUT supports an algorithm the allow-list does not name
    ExpectedFailure,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Expected => write!(f, "expected"),
            Expectation::ExpectedFailure => write!(f, "expected_failure"),
        }
    }
}

/// One discovered algorithm and how its test case should be judged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledParameter {
    pub name: String,
    pub expectation: Expectation,
}

impl ReconciledParameter {
    pub fn is_expected_failure(&self) -> bool {
        self.expectation == Expectation::ExpectedFailure
    }
}

/// Classify `supported` against `allow_list`, growing the list with unknown names
///
/// Membership is judged against the list as it stood when the call started,
/// so a name repeated in `supported` gets the same tag each time. The output
/// has the same length and order as `supported`.
pub fn reconcile(supported: &[String], allow_list: &mut AllowList) -> Vec<ReconciledParameter> {
    let known = allow_list.len();
    let mut reconciled = Vec::with_capacity(supported.len());

    for name in supported {
        let permitted = allow_list.as_slice()[..known].iter().any(|n| n == name);
        let expectation = if permitted {
            Expectation::Expected
        } else {
            if allow_list.insert(name.as_str()) {
                debug!("Permitting previously unknown algorithm {} for this session", name);
            }
            Expectation::ExpectedFailure
        };

        reconciled.push(ReconciledParameter {
            name: name.clone(),
            expectation,
        });
    }

    reconciled
}

/// Per-session allow-lists, one per category
///
/// Starts from a copy of the configured lists. Growth is visible to later
/// reconciliations in the same session and never written back.
#[derive(Debug, Clone)]
pub struct ReconciliationContext {
    enc_ciphers: AllowList,
    macs: AllowList,
    kexs: AllowList,
}

impl ReconciliationContext {
    pub fn new(lists: &AllowLists) -> Self {
        Self {
            enc_ciphers: lists.enc_ciphers.clone(),
            macs: lists.macs.clone(),
            kexs: lists.kexs.clone(),
        }
    }

    pub fn allow_list(&self, category: AlgorithmCategory) -> &AllowList {
        match category {
            AlgorithmCategory::EncryptionCipher => &self.enc_ciphers,
            AlgorithmCategory::MessageAuthenticationCode => &self.macs,
            AlgorithmCategory::KeyExchange => &self.kexs,
        }
    }

    fn allow_list_mut(&mut self, category: AlgorithmCategory) -> &mut AllowList {
        match category {
            AlgorithmCategory::EncryptionCipher => &mut self.enc_ciphers,
            AlgorithmCategory::MessageAuthenticationCode => &mut self.macs,
            AlgorithmCategory::KeyExchange => &mut self.kexs,
        }
    }

    /// Reconcile against the list of `category` only
    pub fn reconcile(
        &mut self,
        category: AlgorithmCategory,
        supported: &[String],
    ) -> Vec<ReconciledParameter> {
        reconcile(supported, self.allow_list_mut(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tags_by_membership() {
        let mut allow = AllowList::new(["aes256-ctr"]);
        let result = reconcile(&names(&["aes256-ctr", "aes128-cbc"]), &mut allow);

        assert_eq!(result, vec![
            ReconciledParameter { name: "aes256-ctr".into(), expectation: Expectation::Expected },
            ReconciledParameter { name: "aes128-cbc".into(), expectation: Expectation::ExpectedFailure },
        ]);
        assert_eq!(allow.as_slice(), ["aes256-ctr", "aes128-cbc"]);
    }

    #[test]
    fn test_empty_input() {
        let mut allow = AllowList::new(["aes256-ctr"]);
        assert!(reconcile(&[], &mut allow).is_empty());
        assert_eq!(allow.len(), 1);
    }

    #[test]
    fn test_second_pass_is_all_expected() {
        let mut allow = AllowList::new(["hmac-sha2-256"]);
        let supported = names(&["umac-64@openssh.com", "hmac-sha2-256", "hmac-sha1"]);

        let first = reconcile(&supported, &mut allow);
        assert_eq!(first.iter().filter(|p| p.is_expected_failure()).count(), 2);

        let second = reconcile(&supported, &mut allow);
        assert!(second.iter().all(|p| p.expectation == Expectation::Expected));
    }

    #[test]
    fn test_repeated_name_keeps_its_tag() {
        let mut allow = AllowList::default();
        let result = reconcile(&names(&["x", "x"]), &mut allow);

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(ReconciledParameter::is_expected_failure));
        assert_eq!(allow.as_slice(), ["x"]);
    }

    #[test]
    fn test_allow_list_never_shrinks() {
        let mut allow = AllowList::new(["a", "b", "c"]);
        reconcile(&names(&["d"]), &mut allow);
        assert_eq!(allow.as_slice(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_context_isolates_categories() {
        let lists = AllowLists::default();
        let mut context = ReconciliationContext::new(&lists);

        context.reconcile(AlgorithmCategory::KeyExchange, &names(&["sntrup761x25519-sha512@openssh.com"]));

        assert!(context.allow_list(AlgorithmCategory::KeyExchange).contains("sntrup761x25519-sha512@openssh.com"));
        assert_eq!(context.allow_list(AlgorithmCategory::EncryptionCipher), &lists.enc_ciphers);
        assert_eq!(context.allow_list(AlgorithmCategory::MessageAuthenticationCode), &lists.macs);
        // The configured lists are a template, not session state
        assert!(!lists.kexs.contains("sntrup761x25519-sha512@openssh.com"));
    }
}
