//! Cyber Engine Tweaks mods.
//!
//! Canonical shape: `bin\x64\plugins\cyber_engine_tweaks\mods\<name>\init.lua`
//! plus whatever else the mod ships under its directory. Archive files under
//! the canonical archive prefix ride along verbatim. Archives that also
//! carry Redscript sources are left for the MultiType installer.

use tracing::debug;

use crate::errors::InstallError;
use crate::filetree::{FileTree, FILETREE_ROOT};
use crate::installers::InstallContext;
use crate::instructions::{Instructions, LayoutKind};
use crate::layouts;

/// True when at least one mod directory under the CET prefix directly
/// contains an `init.lua`.
pub(crate) fn has_canon(tree: &FileTree) -> bool {
    !tree
        .find_direct_subdirs_with_some(layouts::CET_MOD_CANONICAL_PREFIX, layouts::is_init_lua)
        .is_empty()
}

pub fn detect(tree: &FileTree) -> bool {
    if tree.dir_with_some_under(FILETREE_ROOT, layouts::is_reds_file) {
        // mixed CET + Redscript content belongs to MultiType
        return false;
    }
    has_canon(tree)
}

/// Canonical CET layout: everything under the CET prefix verbatim, plus
/// absorbed archive files.
pub(crate) fn layout(
    _ctx: &InstallContext,
    tree: &FileTree,
) -> Result<Instructions, InstallError> {
    if !has_canon(tree) {
        return Err(InstallError::NoMatch);
    }

    let mut out = Instructions::new(LayoutKind::CetCanon);
    for file in tree.files_under(layouts::CET_MOD_CANONICAL_PREFIX, |_| true) {
        out.push_copy(&file, &file);
    }
    for file in tree.files_under(layouts::ARCHIVE_CANONICAL_PREFIX, |_| true) {
        out.push_copy(&file, &file);
    }
    debug!(count = out.len(), "CET canonical layout");
    Ok(out)
}

pub fn install(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    layout(ctx, tree)
}
