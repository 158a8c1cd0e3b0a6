//! Decap test parameters
//!
//! Mode selection, loopback discovery and the mapping passed to the
//! packet-test harness.

use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

use super::mux::is_dualtor;
use super::DecapOp;
use crate::common::{MatrixError, Result};

/// Queue length bound for the packet-test harness
pub const PTFRUNNER_QLEN: u32 = 1000;

/// At most this many DUTs' FIB files are tested on multi-DUT testbeds
pub const MAX_FIB_INFO_FILES: usize = 3;

/// Harness test class
pub const DECAP_TEST: &str = "IP_decap_test.DecapPacketTest";

/// Harness platform directory
pub const PTF_PLATFORM_DIR: &str = "ptftests";

/// Which outer/inner IP versions are exercised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpVersions {
    pub outer_ipv4: bool,
    pub outer_ipv6: bool,
    pub inner_ipv4: bool,
    pub inner_ipv6: bool,
}

impl Default for IpVersions {
    fn default() -> Self {
        Self {
            outer_ipv4: true,
            outer_ipv6: true,
            inner_ipv4: true,
            inner_ipv6: true,
        }
    }
}

/// TTL and DSCP handling modes (`pipe` or `uniform`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlDscpParams {
    pub ttl: String,
    pub dscp: String,
}

impl TtlDscpParams {
    fn uses_uniform(&self) -> bool {
        self.ttl == "uniform" || self.dscp == "uniform"
    }

    /// Whether a DUT running `os_version` can be tested with these modes
    pub fn is_supported_on(&self, os_version: &str) -> bool {
        !self.uses_uniform() || uniform_mode_supported(os_version)
    }
}

/// `uniform` ttl/dscp mode is only available from the 202012 release on
pub fn uniform_mode_supported(os_version: &str) -> bool {
    !(os_version.contains("201811") || os_version.contains("201911"))
}

/// ECN mode for an ASIC vendor
pub fn ecn_mode(asic_type: &str) -> &'static str {
    match asic_type {
        "mellanox" => "standard",
        _ => "copy_from_outer",
    }
}

/// Time to let mux state settle before sending traffic, dualtor topologies only
pub fn settle_time(topo: &str) -> Option<Duration> {
    is_dualtor(topo).then(|| Duration::from_secs(30))
}

/// Harness log file path, timestamped with `now`
pub fn decap_log_file<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("/tmp/decap.{}.log", now.format("%Y-%m-%d-%H:%M:%S"))
}

/// Loopback0 addresses, one slot per DUT
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopbackAddrs {
    pub lo_ips: Vec<Option<IpAddr>>,
    pub lo_ipv6s: Vec<Option<IpAddr>>,
}

impl LoopbackAddrs {
    /// Take the first IPv4 and first IPv6 address of each DUT's `Loopback0` prefixes
    pub fn from_interfaces<S: AsRef<str>>(per_dut: &[Vec<S>]) -> Result<Self> {
        let mut addrs = Self::default();

        for prefixes in per_dut {
            let mut lo_ip = None;
            let mut lo_ipv6 = None;
            for prefix in prefixes {
                let network: IpNetwork = prefix.as_ref().parse().map_err(|e| {
                    MatrixError::Other(format!("Invalid Loopback0 prefix {}: {}", prefix.as_ref(), e))
                })?;
                match network.ip() {
                    ip @ IpAddr::V4(_) if lo_ip.is_none() => lo_ip = Some(ip),
                    ip @ IpAddr::V6(_) if lo_ipv6.is_none() => lo_ipv6 = Some(ip),
                    _ => {}
                }
            }
            addrs.lo_ips.push(lo_ip);
            addrs.lo_ipv6s.push(lo_ipv6);
        }

        Ok(addrs)
    }
}

/// Substitution variables for the decap configuration template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecapConfigVars {
    pub lo_ip: Option<IpAddr>,
    pub lo_ipv6: Option<IpAddr>,
    pub ttl_mode: String,
    pub dscp_mode: String,
    pub ecn_mode: String,
    pub op: String,
    #[serde(flatten)]
    pub ip_ver: IpVersions,
}

impl DecapConfigVars {
    /// Variables for the DUT at `index`
    pub fn for_dut(
        index: usize,
        ip_ver: IpVersions,
        loopbacks: &LoopbackAddrs,
        modes: &TtlDscpParams,
        ecn_mode: &str,
        op: DecapOp,
    ) -> Self {
        Self {
            lo_ip: loopbacks.lo_ips.get(index).copied().flatten(),
            lo_ipv6: loopbacks.lo_ipv6s.get(index).copied().flatten(),
            ttl_mode: modes.ttl.clone(),
            dscp_mode: modes.dscp.clone(),
            ecn_mode: ecn_mode.to_string(),
            op: op.to_string(),
            ip_ver,
        }
    }
}

/// Module-wide setup facts shared by every decap test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecapSetup {
    pub fib_info_files: Vec<String>,
    pub ignore_ttl: bool,
    pub max_internal_hops: u32,
    pub router_macs: Vec<String>,
    #[serde(flatten)]
    pub ip_ver: IpVersions,
    #[serde(flatten)]
    pub loopbacks: LoopbackAddrs,
}

impl DecapSetup {
    pub fn new(
        is_multi_asic: bool,
        mut fib_info_files: Vec<String>,
        router_macs: Vec<String>,
        ip_ver: IpVersions,
        loopbacks: LoopbackAddrs,
    ) -> Self {
        fib_info_files.truncate(MAX_FIB_INFO_FILES);
        Self {
            fib_info_files,
            ignore_ttl: is_multi_asic,
            max_internal_hops: if is_multi_asic { 3 } else { 0 },
            router_macs,
            ip_ver,
            loopbacks,
        }
    }

    /// Harness parameters for one ttl/dscp combination
    pub fn test_params(&self, modes: &TtlDscpParams, ptf_test_port_map: serde_json::Value) -> DecapTestParams {
        DecapTestParams {
            ip_ver: self.ip_ver,
            lo_ips: self.loopbacks.lo_ips.clone(),
            lo_ipv6s: self.loopbacks.lo_ipv6s.clone(),
            router_macs: self.router_macs.clone(),
            ttl_mode: modes.ttl.clone(),
            dscp_mode: modes.dscp.clone(),
            ignore_ttl: self.ignore_ttl,
            max_internal_hops: self.max_internal_hops,
            fib_info_files: self.fib_info_files.clone(),
            ptf_test_port_map,
        }
    }
}

/// Parameter mapping consumed by the decap packet test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecapTestParams {
    #[serde(flatten)]
    pub ip_ver: IpVersions,
    pub lo_ips: Vec<Option<IpAddr>>,
    pub lo_ipv6s: Vec<Option<IpAddr>>,
    pub router_macs: Vec<String>,
    pub ttl_mode: String,
    pub dscp_mode: String,
    pub ignore_ttl: bool,
    pub max_internal_hops: u32,
    pub fib_info_files: Vec<String>,
    /// Port mapping produced by the harness tooling, passed through untouched
    pub ptf_test_port_map: serde_json::Value,
}

/// One packet-test harness run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PtfInvocation {
    pub test_dir: String,
    pub test: String,
    pub platform_dir: String,
    pub params: DecapTestParams,
    pub qlen: u32,
    pub log_file: String,
}

impl PtfInvocation {
    pub fn decap<Tz: TimeZone>(params: DecapTestParams, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            test_dir: PTF_PLATFORM_DIR.to_string(),
            test: DECAP_TEST.to_string(),
            platform_dir: PTF_PLATFORM_DIR.to_string(),
            params,
            qlen: PTFRUNNER_QLEN,
            log_file: decap_log_file(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn modes(ttl: &str, dscp: &str) -> TtlDscpParams {
        TtlDscpParams { ttl: ttl.to_string(), dscp: dscp.to_string() }
    }

    #[test]
    fn test_uniform_mode_gate() {
        assert!(!modes("uniform", "pipe").is_supported_on("SONiC.201911.210"));
        assert!(!modes("pipe", "uniform").is_supported_on("SONiC.201811.100"));
        assert!(modes("pipe", "pipe").is_supported_on("SONiC.201811.100"));
        assert!(modes("uniform", "uniform").is_supported_on("SONiC.202012.40"));
    }

    #[test]
    fn test_ecn_mode() {
        assert_eq!(ecn_mode("mellanox"), "standard");
        assert_eq!(ecn_mode("broadcom"), "copy_from_outer");
    }

    #[test]
    fn test_settle_time() {
        assert_eq!(settle_time("dualtor-56"), Some(Duration::from_secs(30)));
        assert_eq!(settle_time("t0"), None);
    }

    #[test]
    fn test_log_file_name() {
        let now = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(decap_log_file(&now), "/tmp/decap.2021-03-04-05:06:07.log");
    }

    #[test]
    fn test_loopbacks_first_of_each_family() {
        let per_dut = vec![
            vec!["10.1.0.32/32", "FC00:1::32/128", "10.1.0.33/32"],
            vec!["FC00:1::34/128"],
        ];
        let addrs = LoopbackAddrs::from_interfaces(&per_dut).unwrap();

        assert_eq!(addrs.lo_ips, vec![Some("10.1.0.32".parse::<IpAddr>().unwrap()), None]);
        assert_eq!(addrs.lo_ipv6s, vec![
            Some("fc00:1::32".parse::<IpAddr>().unwrap()),
            Some("fc00:1::34".parse::<IpAddr>().unwrap()),
        ]);
    }

    #[test]
    fn test_loopbacks_reject_garbage() {
        assert!(LoopbackAddrs::from_interfaces(&[vec!["not-an-ip"]]).is_err());
    }

    #[test]
    fn test_setup_multi_asic() {
        let files = (0..5).map(|i| format!("/root/fib_info_dut{}.txt", i)).collect();
        let setup = DecapSetup::new(true, files, vec![], IpVersions::default(), LoopbackAddrs::default());

        assert_eq!(setup.fib_info_files.len(), MAX_FIB_INFO_FILES);
        assert!(setup.ignore_ttl);
        assert_eq!(setup.max_internal_hops, 3);
    }

    #[test]
    fn test_invocation_params_json() {
        let loopbacks = LoopbackAddrs::from_interfaces(&[vec!["10.1.0.32/32"]]).unwrap();
        let setup = DecapSetup::new(
            false,
            vec!["/root/fib_info_dut0.txt".to_string()],
            vec!["52:54:00:df:1c:5e".to_string()],
            IpVersions { outer_ipv6: false, ..Default::default() },
            loopbacks,
        );
        let now = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        let run = PtfInvocation::decap(setup.test_params(&modes("pipe", "uniform"), serde_json::json!({})), &now);
        let json = serde_json::to_value(&run).unwrap();

        assert_eq!(json["qlen"], 1000);
        assert_eq!(json["test"], "IP_decap_test.DecapPacketTest");
        assert_eq!(json["params"]["outer_ipv6"], false);
        assert_eq!(json["params"]["lo_ips"][0], "10.1.0.32");
        assert_eq!(json["params"]["dscp_mode"], "uniform");
        assert_eq!(json["params"]["max_internal_hops"], 0);
    }
}
