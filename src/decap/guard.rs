//! Scoped decap configuration
//!
//! Both guards are built before the setup commands run, so a setup that fails
//! halfway is still undone when the guard drops.

use log::{error, info};

use super::commands::{apply_cmds, host_conf_path, remove_default_cmds, restore_default_cmd, swss_container};
use super::params::{DecapConfigVars, IpVersions, LoopbackAddrs, TtlDscpParams};
use super::{DecapOp, DecapRenderer, DeviceHost};
use crate::common::Result;

/// Render and load the test decap configuration on every host
pub fn apply_decap_cfg<H, R>(
    hosts: &[H],
    renderer: &R,
    ip_ver: IpVersions,
    loopbacks: &LoopbackAddrs,
    modes: &TtlDscpParams,
    ecn_mode: &str,
    op: DecapOp,
) -> Result<()>
where
    H: DeviceHost,
    R: DecapRenderer + ?Sized,
{
    let dest = host_conf_path(op);

    for (idx, host) in hosts.iter().enumerate() {
        let vars = DecapConfigVars::for_dut(idx, ip_ver, loopbacks, modes, ecn_mode, op);
        host.copy_content(&renderer.render(&vars)?, &dest)?;

        for asic_id in host.frontend_asic_ids() {
            host.shell_cmds(&apply_cmds(&swss_container(asic_id), op))?;
        }
        host.shell(&format!("rm {}", dest))?;
    }

    Ok(())
}

/// Default decap tunnel removed for the guard's lifetime
pub struct DefaultDecapGuard<'a, H: DeviceHost> {
    hosts: &'a [H],
}

impl<'a, H: DeviceHost> DefaultDecapGuard<'a, H> {
    /// Remove the default decap configuration from every host
    pub fn remove(hosts: &'a [H]) -> Result<Self> {
        let guard = Self { hosts };

        for host in hosts {
            info!("Remove default decap cfg on {}", host.hostname());
            for asic_id in host.frontend_asic_ids() {
                host.shell_cmds(&remove_default_cmds(&swss_container(asic_id)))?;
            }
        }

        Ok(guard)
    }
}

impl<H: DeviceHost> Drop for DefaultDecapGuard<'_, H> {
    fn drop(&mut self) {
        for host in self.hosts {
            info!("Restore default decap cfg on {}", host.hostname());
            for asic_id in host.frontend_asic_ids() {
                if let Err(e) = host.shell(&restore_default_cmd(&swss_container(asic_id))) {
                    error!("Failed to restore default decap cfg on {}: {}", host.hostname(), e);
                }
            }
        }
    }
}

/// Test decap configuration applied (`SET`) for the guard's lifetime, deleted (`DEL`) on drop
pub struct DecapConfigGuard<'a, H: DeviceHost, R: DecapRenderer + ?Sized> {
    hosts: &'a [H],
    renderer: &'a R,
    ip_ver: IpVersions,
    loopbacks: &'a LoopbackAddrs,
    modes: TtlDscpParams,
    ecn_mode: String,
}

impl<'a, H: DeviceHost, R: DecapRenderer + ?Sized> DecapConfigGuard<'a, H, R> {
    pub fn apply(
        hosts: &'a [H],
        renderer: &'a R,
        ip_ver: IpVersions,
        loopbacks: &'a LoopbackAddrs,
        modes: TtlDscpParams,
        ecn_mode: &str,
    ) -> Result<Self> {
        let guard = Self {
            hosts,
            renderer,
            ip_ver,
            loopbacks,
            modes,
            ecn_mode: ecn_mode.to_string(),
        };
        guard.run(DecapOp::Set)?;
        Ok(guard)
    }

    /// TTL and DSCP modes in effect
    pub fn modes(&self) -> &TtlDscpParams {
        &self.modes
    }

    fn run(&self, op: DecapOp) -> Result<()> {
        apply_decap_cfg(
            self.hosts,
            self.renderer,
            self.ip_ver,
            self.loopbacks,
            &self.modes,
            &self.ecn_mode,
            op,
        )
    }
}

impl<H: DeviceHost, R: DecapRenderer + ?Sized> Drop for DecapConfigGuard<'_, H, R> {
    fn drop(&mut self) {
        if let Err(e) = self.run(DecapOp::Del) {
            error!("Failed to remove test decap cfg: {}", e);
        }
    }
}
