//! Testbed definitions
//!
//! Resolves a testbed name to its DUTs and inventory. Two layouts are read:
//! the CSV file whose header line starts with `# conf-name`, and a JSON array
//! of objects using the same column names.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Deserializer};

use crate::common::{MatrixError, Result};

/// One testbed row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestbedEntry {
    /// Testbed name
    #[serde(rename = "conf-name")]
    pub conf_name: String,

    /// Topology name (e.g. `t0`, `dualtor`)
    #[serde(default)]
    pub topo: String,

    /// DUT hostnames, first one is the primary DUT
    #[serde(rename = "dut", deserialize_with = "deserialize_duts")]
    pub duts: Vec<String>,

    /// Inventory file name
    pub inv_name: String,
}

impl TestbedEntry {
    /// The DUT that algorithm queries are sent to
    pub fn primary_dut(&self) -> Result<&str> {
        self.duts.first().map(String::as_str).ok_or_else(|| {
            MatrixError::Testbed(format!("Testbed {} lists no DUT", self.conf_name))
        })
    }
}

/// Accepts either a JSON list or the CSV-style `[a;b]` / `a` string
fn deserialize_duts<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Duts {
        List(Vec<String>),
        Field(String),
    }

    Ok(match Duts::deserialize(deserializer)? {
        Duts::List(list) => list,
        Duts::Field(field) => parse_dut_field(&field),
    })
}

/// Parse the `dut` column: a single host or a bracketed `;`-separated list
pub fn parse_dut_field(field: &str) -> Vec<String> {
    field
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn column<'a>(
    columns: &HashMap<String, usize>,
    fields: &[&'a str],
    name: &str,
    lineno: usize,
) -> Result<&'a str> {
    columns
        .get(name)
        .and_then(|&i| fields.get(i).copied())
        .ok_or_else(|| MatrixError::Testbed(format!("Line {}: missing column {}", lineno, name)))
}

/// All testbeds from one testbed file
#[derive(Debug, Clone, Default)]
pub struct TestbedInfo {
    testbeds: HashMap<String, TestbedEntry>,
}

impl TestbedInfo {
    /// Load a testbed file, picking the format from its extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MatrixError::Testbed(format!("Failed to read testbed file {}: {}", path.display(), e))
        })?;

        debug!("Parsing testbed file {}", path.display());
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_csv(&content),
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Vec<TestbedEntry> = serde_json::from_str(content)?;
        Ok(Self::from_entries(entries))
    }

    /// Parse the CSV layout
    ///
    /// The header row is the first line starting with `# conf-name`; other
    /// lines starting with `#` are comments. Fields are not quoted.
    pub fn from_csv(content: &str) -> Result<Self> {
        let mut columns: Option<HashMap<String, usize>> = None;
        let mut entries = Vec::new();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('#') {
                if columns.is_none() && header.trim_start().starts_with("conf-name") {
                    columns = Some(
                        header
                            .split(',')
                            .enumerate()
                            .map(|(i, name)| (name.trim().to_string(), i))
                            .collect(),
                    );
                }
                continue;
            }

            let columns = columns.as_ref().ok_or_else(|| {
                MatrixError::Testbed("Testbed CSV has no '# conf-name,...' header".to_string())
            })?;
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let lineno = lineno + 1;

            entries.push(TestbedEntry {
                conf_name: column(columns, &fields, "conf-name", lineno)?.to_string(),
                topo: column(columns, &fields, "topo", lineno).unwrap_or_default().to_string(),
                duts: parse_dut_field(column(columns, &fields, "dut", lineno)?),
                inv_name: column(columns, &fields, "inv_name", lineno)?.to_string(),
            });
        }

        Ok(Self::from_entries(entries))
    }

    fn from_entries(entries: Vec<TestbedEntry>) -> Self {
        let testbeds = entries
            .into_iter()
            .map(|entry| (entry.conf_name.clone(), entry))
            .collect();
        Self { testbeds }
    }

    pub fn get(&self, name: &str) -> Option<&TestbedEntry> {
        self.testbeds.get(name)
    }

    /// Look up a testbed, failing if it is not defined
    pub fn require(&self, name: &str) -> Result<&TestbedEntry> {
        self.get(name)
            .ok_or_else(|| MatrixError::Testbed(format!("Testbed {} not found", name)))
    }

    pub fn len(&self) -> usize {
        self.testbeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.testbeds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
# conf-name,group-name,topo,ptf_image_name,ptf,ptf_ip,ptf_ipv6,server,vm_base,dut,inv_name,auto_recover,comment
vms-kvm-t0,vms6-1,t0,docker-ptf,ptf-01,10.250.0.102/24,fec0::ffff:afa:2/64,server_1,VM0100,[vlab-01],veos_vtb,False,Tests virtual switch vm
# vms-kvm-t0-64,vms6-1,t0-64,docker-ptf,ptf-01,10.250.0.102/24,,server_1,VM0100,[vlab-02],veos_vtb,False,disabled
vms-kvm-dual-t0,vms6-4,dualtor,docker-ptf,ptf-04,10.250.0.109/24,,server_1,VM0108,[vlab-05;vlab-06],veos_vtb,False,Dual ToR
str-msn2700-01,mlnx,t1,docker-ptf,ptf-unknown,10.255.0.188/24,,server_2,VM0100,str-msn2700-01,str,True,Tests Mellanox SN2700
";

    #[test]
    fn test_csv_layout() {
        let info = TestbedInfo::from_csv(CSV).unwrap();
        assert_eq!(info.len(), 3);

        let dual = info.require("vms-kvm-dual-t0").unwrap();
        assert_eq!(dual.duts, vec!["vlab-05", "vlab-06"]);
        assert_eq!(dual.primary_dut().unwrap(), "vlab-05");
        assert_eq!(dual.inv_name, "veos_vtb");
        assert_eq!(dual.topo, "dualtor");

        let mlnx = info.require("str-msn2700-01").unwrap();
        assert_eq!(mlnx.duts, vec!["str-msn2700-01"]);

        assert!(info.get("vms-kvm-t0-64").is_none());
    }

    #[test]
    fn test_csv_without_header() {
        assert!(TestbedInfo::from_csv("vms-kvm-t0,vms6-1,t0\n").is_err());
    }

    #[test]
    fn test_json_layout() {
        let info = TestbedInfo::from_json(r#"[
            {"conf-name": "vms-kvm-t0", "topo": "t0", "dut": ["vlab-01"], "inv_name": "veos_vtb"},
            {"conf-name": "vms-kvm-t1", "dut": "[vlab-03]", "inv_name": "veos_vtb"}
        ]"#).unwrap();

        assert_eq!(info.require("vms-kvm-t0").unwrap().primary_dut().unwrap(), "vlab-01");
        assert_eq!(info.require("vms-kvm-t1").unwrap().duts, vec!["vlab-03"]);
        assert!(info.require("vms-kvm-t2").is_err());
    }

    #[test]
    fn test_no_dut() {
        let info = TestbedInfo::from_json(
            r#"[{"conf-name": "empty", "dut": "[]", "inv_name": "lab"}]"#,
        ).unwrap();
        assert!(info.require("empty").unwrap().primary_dut().is_err());
    }
}
