//! swss command sequences

use super::DecapOp;

/// Default decap configuration shipped in the swss container
pub const DEFAULT_IPINIP_CONFIG: &str = "/etc/swss/config.d/ipinip.json";

/// swss container serving an ASIC (`swss` on single-ASIC devices)
pub fn swss_container(asic_id: Option<u32>) -> String {
    match asic_id {
        Some(id) => format!("swss{}", id),
        None => "swss".to_string(),
    }
}

/// Delete the default decap tunnel by replaying its config with `DEL`
pub fn remove_default_cmds(swss: &str) -> Vec<String> {
    vec![
        format!("docker exec {} cp {} /default_ipinip.json", swss, DEFAULT_IPINIP_CONFIG),
        format!(
            "docker exec {} sed -i -e 's/\"OP\": *\"SET\"/\"OP\": \"DEL\"/g' /default_ipinip.json",
            swss
        ),
        format!("docker exec {} swssconfig /default_ipinip.json", swss),
        format!("docker exec {} rm /default_ipinip.json", swss),
    ]
}

pub fn restore_default_cmd(swss: &str) -> String {
    format!("docker exec {} swssconfig {}", swss, DEFAULT_IPINIP_CONFIG)
}

/// Host path the rendered payload for `op` is copied to
pub fn host_conf_path(op: DecapOp) -> String {
    format!("/tmp/decap_conf_{}.json", op)
}

/// Load the rendered payload for `op` into one swss container
pub fn apply_cmds(swss: &str, op: DecapOp) -> Vec<String> {
    vec![
        format!("docker cp {} {}:/decap_conf_{}.json", host_conf_path(op), swss, op),
        format!("docker exec {} swssconfig /decap_conf_{}.json", swss, op),
        format!("docker exec {} rm /decap_conf_{}.json", swss, op),
    ]
}
