use std::path::Path;

use anyhow::{Context, Result};
use bozor_auth::GateConfig;

use crate::output::print_field;

pub fn show(config: &GateConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render config")?;
    print!("{rendered}");
    Ok(())
}

pub fn paths(config_path: &Path, session_path: &Path) {
    let exists = |p: &Path| if p.exists() { "" } else { " (missing)" };
    print_field(
        "Config",
        &format!("{}{}", config_path.display(), exists(config_path)),
    );
    print_field(
        "Session",
        &format!("{}{}", session_path.display(), exists(session_path)),
    );
}
