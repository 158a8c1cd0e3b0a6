//! Dual-ToR mux side selection
//!
//! On dualtor topologies the mux simulator decides which ToR receives
//! downstream traffic. Other topologies have no mux and skip the call.

use log::{debug, error, info};
use serde::Serialize;
use serde_json::{json, Value};

use crate::common::{MatrixError, Result};

/// Side the mux simulator should make active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MuxSide {
    UpperTor,
    LowerTor,
    Random,
}

/// HTTP reply from the mux simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxResponse {
    pub status: u16,
    pub body: String,
}

/// Mux simulator endpoint, supplied by the harness
pub trait MuxControl {
    fn url(&self) -> &str;

    /// POST `body` as JSON to the simulator
    fn post(&self, body: &Value) -> Result<MuxResponse>;
}

pub fn is_dualtor(topo: &str) -> bool {
    topo.contains("dualtor")
}

/// Make `side` active on every mux cable
///
/// Returns the new mux status of all Y-cables, or `None` when `topo` is not a
/// dualtor topology and nothing was sent.
pub fn set_mux_side<M: MuxControl + ?Sized>(topo: &str, mux: &M, side: MuxSide) -> Result<Option<Value>> {
    if !is_dualtor(topo) {
        debug!("Topology {} has no mux, not setting active side", topo);
        return Ok(None);
    }

    info!("Setting mux active side to {:?} via {}", side, mux.url());
    let response = mux.post(&json!({ "active_side": side }))?;

    if response.status != 200 {
        error!("Mux simulator returned {}: {}", response.status, response.body);
        return Err(MatrixError::Device {
            host: mux.url().to_string(),
            message: format!("Failed to set active side: {}", response.body),
        });
    }

    Ok(Some(serde_json::from_str(&response.body)?))
}

pub fn set_mux_random<M: MuxControl + ?Sized>(topo: &str, mux: &M) -> Result<Option<Value>> {
    set_mux_side(topo, mux, MuxSide::Random)
}
