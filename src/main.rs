/*!
 * Mount Bridge - Main Entry Point
 *
 * Mounts the configured host directories into an in-memory sandbox:
 * - Loads mounts from BRIDGE_CONFIG or BRIDGE_WORKSPACE_PATH
 * - Reports what was loaded per mount
 * - Optionally lints a script from a mount (first argument: /<mount>/<path>)
 * - Syncs changes back and unmounts on exit
 */

use std::error::Error;
use std::sync::Arc;
use tracing::{info, warn};

use sandbox_mount_bridge::bridge::paths::from_sandbox_path;
use sandbox_mount_bridge::{
    init_tracing, BridgeConfig, CodeAdvisor, LocalHost, MemFS, MountBridge, Severity,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    info!("Mount bridge starting...");

    let config = BridgeConfig::from_env()?;
    if config.mounts.is_empty() {
        warn!("No mounts configured; set BRIDGE_CONFIG or BRIDGE_WORKSPACE_PATH");
    }

    info!(capacity = config.sandbox_capacity, "Initializing sandbox filesystem");
    let sandbox = Arc::new(MemFS::with_capacity(config.sandbox_capacity));
    let mut bridge = MountBridge::new(LocalHost::new(), sandbox);

    for mount in &config.mounts {
        bridge.register(
            &mount.name,
            &mount.local_path,
            mount.mount_type,
            mount.options.clone(),
        )?;
    }

    if !bridge.mount_all().await {
        warn!("Some mount points failed to mount");
    }

    for stats in bridge.cache_stats() {
        info!(
            mount = %stats.name,
            mounted = stats.mounted,
            files = stats.cached_files,
            binary = stats.binary_files,
            bytes = stats.cached_bytes,
            "Mount ready"
        );
    }

    if let Some(script) = std::env::args().nth(1) {
        let (mount, relative_path) = from_sandbox_path(&script)?;
        let content = bridge.read_from_mount(&mount, &relative_path)?;
        if content.is_binary() {
            warn!(script = %script, "Script is binary; skipping advisory scan");
        } else {
            let advisor = CodeAdvisor::python()?;
            let findings = advisor.scan(&content.content);
            for finding in &findings {
                match finding.severity {
                    Severity::Critical => warn!(line = finding.line, snippet = %finding.snippet, "{}", finding.message),
                    _ => info!(line = finding.line, snippet = %finding.snippet, "{}", finding.message),
                }
            }
            info!(script = %script, findings = findings.len(), "Advisory scan complete (not a security check)");
        }
    }

    let results = bridge.sync_all_to_disk(None).await;
    let failed = results.iter().filter(|r| !r.success).count();
    info!(synced = results.len() - failed, failed, "Final sync complete");

    bridge.unmount_all();
    info!("Mount bridge stopped");
    Ok(())
}
