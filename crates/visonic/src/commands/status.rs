//! Panel status handler.

use chrono::{DateTime, Utc};
use serde::Serialize;
use visonic_core::{AlarmHub, PanelInfo, PanelSnapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusView {
    panel_id: String,
    info: PanelInfo,
    master_user: Option<bool>,
    session_issued: Option<DateTime<Utc>>,
    snapshot: PanelSnapshot,
}

pub fn handle(hub: &AlarmHub, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = hub.snapshot().ok_or(CliError::NotConnected)?;
    let view = StatusView {
        panel_id: hub.config().panel_id.clone(),
        info: hub.panel_info(),
        master_user: hub.is_master_user(),
        session_issued: hub.session_token_issued(),
        snapshot: (*snapshot).clone(),
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, color),
        |v| v.snapshot.state.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(v: &StatusView, color: bool) -> String {
    let or_dash = |s: &Option<String>| s.clone().unwrap_or_else(|| "-".into());
    let snap = &v.snapshot;
    output::detail_block(&[
        ("Panel", v.panel_id.clone()),
        ("Name", or_dash(&v.info.name)),
        ("Model", or_dash(&v.info.model)),
        ("Serial", or_dash(&v.info.serial)),
        ("State", output::paint_state(&snap.state, color)),
        ("Raw state", snap.raw_state.clone()),
        ("Ready", output::paint_flag(snap.ready, color)),
        ("Active", output::paint_flag(snap.active, color)),
        ("Connected", output::paint_flag(snap.connected, color)),
        (
            "Master user",
            v.master_user
                .map_or_else(|| "-".into(), |m| output::paint_flag(m, color)),
        ),
        (
            "Refreshed",
            snap.last_refresh.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
    ])
}
