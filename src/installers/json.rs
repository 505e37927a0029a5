//! Loose JSON config mods.
//!
//! Only a handful of JSON files are legal to redistribute and each has one
//! destination; anything else is rejected rather than guessed at.
//! `options.json` is special: it must already sit under the settings tree.

use tracing::debug;

use crate::errors::InstallError;
use crate::filetree::{FileTree, FILETREE_ROOT};
use crate::installers::InstallContext;
use crate::instructions::{Instructions, LayoutKind};
use crate::layouts;
use crate::paths;

pub fn detect(tree: &FileTree) -> bool {
    tree.dir_with_some_under(FILETREE_ROOT, layouts::is_json_file)
        && !tree.dir_with_some_under(FILETREE_ROOT, layouts::is_init_lua)
}

pub(crate) fn layout(_ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    let jsons = tree.files_under(FILETREE_ROOT, layouts::is_json_file);
    if jsons.is_empty() {
        return Err(InstallError::NoMatch);
    }

    let mut out = Instructions::new(LayoutKind::JsonCanon);
    for json in &jsons {
        if paths::basename_eq(json, layouts::OPTIONS_JSON) {
            if !paths::prefix_of(layouts::JSON_SETTINGS_PREFIX, json) {
                return Err(InstallError::Validation(format!(
                    "{} must be packaged under {}, found at {}",
                    layouts::OPTIONS_JSON,
                    layouts::JSON_SETTINGS_PREFIX,
                    json
                )));
            }
            out.push_copy(json, json);
        } else if let Some(dest) = layouts::known_json_destination(json) {
            out.push_copy(json, dest);
        } else {
            return Err(InstallError::Validation(format!(
                "unrecognized JSON file {json}; only known game configs can be installed"
            )));
        }
    }

    // documentation rides along wherever it was packaged
    for sidecar in tree.files_under(FILETREE_ROOT, layouts::is_sidecar_file) {
        out.push_copy(&sidecar, &sidecar);
    }

    debug!(count = out.len(), "JSON layout");
    Ok(out)
}

pub fn install(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    layout(ctx, tree)
}
