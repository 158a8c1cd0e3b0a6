//! Command output parsing

/// Extract whitespace-delimited algorithm names following `marker`
///
/// Everything up to and including the first occurrence of the marker is
/// discarded. Returns `None` if the marker does not occur.
pub fn parse_algorithm_list(raw: &str, marker: &str) -> Option<Vec<String>> {
    let (_, data) = raw.split_once(marker)?;
    Some(data.split_whitespace().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ansible_output() {
        let raw = "vlab-01 | CHANGED | rc=0 >>\naes128-ctr\naes192-ctr\naes256-ctr\naes256-gcm@openssh.com\n";
        assert_eq!(
            parse_algorithm_list(raw, "rc=0 >>").unwrap(),
            vec!["aes128-ctr", "aes192-ctr", "aes256-ctr", "aes256-gcm@openssh.com"]
        );
    }

    #[test]
    fn test_parse_empty_list() {
        assert_eq!(parse_algorithm_list("vlab-01 | SUCCESS | rc=0 >>\n", "rc=0 >>"), Some(vec![]));
    }

    #[test]
    fn test_parse_splits_on_first_marker_only() {
        let raw = "rc=0 >> a rc=0 >> b";
        assert_eq!(
            parse_algorithm_list(raw, "rc=0 >>").unwrap(),
            vec!["a", "rc=0", ">>", "b"]
        );
    }

    #[test]
    fn test_parse_no_marker() {
        assert_eq!(parse_algorithm_list("FAILED! => {}", "rc=0 >>"), None);
    }
}
