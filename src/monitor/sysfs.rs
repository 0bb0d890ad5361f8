//! Default path monitor for Linux, reading interface state from sysfs.

use crate::config::MonitorConfig;
use crate::monitor::path::{NetworkPath, PathMonitor, PathMonitorFactory, PathStatus, PathUpdateHandler};
use crate::types::InterfaceKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};

const ARPHRD_ETHER: u32 = 1;
const ARPHRD_LOOPBACK: u32 = 772;
const CELLULAR_PREFIXES: [&str; 3] = ["wwan", "rmnet", "ccmni"];

/// Creates [`SysfsPathMonitor`]s from monitor configuration
#[derive(Debug, Clone)]
pub struct SysfsMonitorFactory {
    root: PathBuf,
    poll_interval: Duration,
    constrained: bool,
}

impl SysfsMonitorFactory {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            root: config.sysfs_root.clone(),
            poll_interval: config.poll_interval(),
            constrained: config.constrained,
        }
    }
}

impl Default for SysfsMonitorFactory {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}

impl PathMonitorFactory for SysfsMonitorFactory {
    type Monitor = SysfsPathMonitor;

    fn make_monitor(&self) -> SysfsPathMonitor {
        SysfsPathMonitor::new(self.root.clone(), self.poll_interval, self.constrained)
    }
}

struct PollTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Polls `/sys/class/net` on a tokio task and reports the initial path and every change.
///
/// Must be started from within a tokio runtime.
pub struct SysfsPathMonitor {
    root: PathBuf,
    poll_interval: Duration,
    constrained: bool,
    task: Option<PollTask>,
    used: bool,
}

impl SysfsPathMonitor {
    pub fn new(root: PathBuf, poll_interval: Duration, constrained: bool) -> Self {
        Self {
            root,
            poll_interval,
            constrained,
            task: None,
            used: false,
        }
    }
}

impl PathMonitor for SysfsPathMonitor {
    fn start(&mut self, handler: PathUpdateHandler) {
        if self.used {
            return;
        }
        self.used = true;

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Cannot start sysfs path monitor outside a tokio runtime: {}", e);
                return;
            }
        };

        let root = self.root.clone();
        let poll_interval = self.poll_interval;
        let constrained = self.constrained;
        let (shutdown, mut shutdown_rx) = oneshot::channel();

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last: Option<NetworkPath> = None;

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let path = read_path(&root, constrained).await;
                        if last.as_ref() != Some(&path) {
                            trace!(?path, "Network path changed");
                            handler(path.clone());
                            last = Some(path);
                        }
                    }
                }
            }
            debug!(root = %root.display(), "Sysfs path monitor stopped");
        });

        self.task = Some(PollTask { shutdown, handle });
    }

    fn cancel(&mut self) {
        self.used = true;
        if let Some(task) = self.task.take() {
            let _ = task.shutdown.send(());
            task.handle.abort();
        }
    }
}

impl Drop for SysfsPathMonitor {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Read the current path from a sysfs network class directory
pub async fn read_path(root: &Path, constrained: bool) -> NetworkPath {
    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(root = %root.display(), "Cannot read interface directory: {}", e);
            return NetworkPath::unsatisfied().constrained(constrained);
        }
    };

    let mut interfaces = Vec::new();
    let mut loopback_up = false;

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                debug!("Stopped reading interfaces early: {}", e);
                break;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        let device = entry.path();
        if !device_is_up(&device).await {
            continue;
        }

        match classify_device(&name, &device).await {
            InterfaceKind::Loopback => loopback_up = true,
            kind if !interfaces.contains(&kind) => interfaces.push(kind),
            _ => {}
        }
    }

    interfaces.sort_by_key(|kind| precedence(*kind));

    let status = if interfaces.is_empty() {
        PathStatus::Unsatisfied
    } else {
        PathStatus::Satisfied
    };
    if interfaces.is_empty() && loopback_up {
        interfaces.push(InterfaceKind::Loopback);
    }

    NetworkPath {
        status,
        is_expensive: interfaces.contains(&InterfaceKind::Cellular),
        is_constrained: constrained,
        interfaces,
    }
}

fn precedence(kind: InterfaceKind) -> usize {
    InterfaceKind::PRECEDENCE
        .iter()
        .position(|candidate| *candidate == kind)
        .unwrap_or(InterfaceKind::PRECEDENCE.len())
}

async fn read_attribute(device: &Path, attribute: &str) -> Option<String> {
    tokio::fs::read_to_string(device.join(attribute))
        .await
        .ok()
        .map(|value| value.trim().to_string())
}

async fn device_is_up(device: &Path) -> bool {
    match read_attribute(device, "operstate").await.as_deref() {
        Some("up") => true,
        Some("unknown") => read_attribute(device, "carrier").await.as_deref() == Some("1"),
        _ => false,
    }
}

async fn classify_device(name: &str, device: &Path) -> InterfaceKind {
    let device_type = read_attribute(device, "type")
        .await
        .and_then(|value| value.parse::<u32>().ok());

    if device_type == Some(ARPHRD_LOOPBACK) {
        return InterfaceKind::Loopback;
    }
    if tokio::fs::metadata(device.join("wireless")).await.is_ok()
        || tokio::fs::metadata(device.join("phy80211")).await.is_ok()
    {
        return InterfaceKind::Wifi;
    }
    if CELLULAR_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        return InterfaceKind::Cellular;
    }
    if device_type == Some(ARPHRD_ETHER) {
        return InterfaceKind::WiredEthernet;
    }
    InterfaceKind::Other
}
