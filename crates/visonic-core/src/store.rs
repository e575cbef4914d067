// ── Snapshot store ──
//
// Holds the last panel snapshot and device list. Each refresh builds new
// values and swaps them in atomically, so readers see either the old or
// the new list, never a half-rebuilt one.

use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};

use crate::model::{Device, PanelInfo, PanelSnapshot};

pub struct SnapshotStore {
    panel: ArcSwapOption<PanelSnapshot>,
    devices: ArcSwap<Vec<Device>>,
    info: ArcSwapOption<PanelInfo>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self {
            panel: ArcSwapOption::empty(),
            devices: ArcSwap::from_pointee(Vec::new()),
            info: ArcSwapOption::empty(),
        }
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> Option<Arc<PanelSnapshot>> {
        self.panel.load_full()
    }

    pub fn devices(&self) -> Arc<Vec<Device>> {
        self.devices.load_full()
    }

    pub fn info(&self) -> Option<Arc<PanelInfo>> {
        self.info.load_full()
    }

    pub fn device_by_id(&self, id: &str) -> Option<Device> {
        self.devices.load().iter().find(|d| d.id == id).cloned()
    }

    pub(crate) fn replace_panel(&self, snapshot: PanelSnapshot) {
        self.panel.store(Some(Arc::new(snapshot)));
    }

    pub(crate) fn replace_devices(&self, devices: Vec<Device>) {
        self.devices.store(Arc::new(devices));
    }

    pub(crate) fn replace_info(&self, info: PanelInfo) {
        self.info.store(Some(Arc::new(info)));
    }
}
