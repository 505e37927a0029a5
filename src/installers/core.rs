//! Framework redistributables.
//!
//! The frameworks themselves (CET, Redscript, Red4Ext, CSVMerge, TweakXL,
//! WolvenKit CLI) ship as archives too. Each is recognized by a fingerprint
//! file set unique to its redistributable and installed verbatim. These sit
//! at the top of the pipeline so a framework is never misread as a mod.

use tracing::debug;

use crate::errors::InstallError;
use crate::filetree::{FileTree, FILETREE_ROOT};
use crate::installers::{has_all_paths, InstallContext};
use crate::instructions::{Instructions, LayoutKind};
use crate::layouts;
use crate::paths;

fn verbatim(kind: LayoutKind, tree: &FileTree) -> Instructions {
    let files = tree.files_under(FILETREE_ROOT, |_| true);
    debug!(kind = %kind, count = files.len(), "core framework install");
    Instructions::copy_verbatim(kind, &files)
}

pub fn detect_cet(tree: &FileTree) -> bool {
    has_all_paths(tree, layouts::CORE_CET_SIGNATURE)
}

pub fn install_cet(_ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    Ok(verbatim(LayoutKind::CoreCet, tree))
}

pub fn detect_redscript(tree: &FileTree) -> bool {
    has_all_paths(tree, layouts::CORE_REDSCRIPT_SIGNATURE)
}

pub fn install_redscript(
    _ctx: &InstallContext,
    tree: &FileTree,
) -> Result<Instructions, InstallError> {
    Ok(verbatim(LayoutKind::CoreRedscript, tree))
}

pub fn detect_red4ext(tree: &FileTree) -> bool {
    has_all_paths(tree, layouts::CORE_RED4EXT_SIGNATURE)
}

pub fn install_red4ext(
    _ctx: &InstallContext,
    tree: &FileTree,
) -> Result<Instructions, InstallError> {
    Ok(verbatim(LayoutKind::CoreRed4Ext, tree))
}

pub fn detect_csvmerge(tree: &FileTree) -> bool {
    has_all_paths(tree, layouts::CORE_CSVMERGE_SIGNATURE)
}

pub fn install_csvmerge(
    _ctx: &InstallContext,
    tree: &FileTree,
) -> Result<Instructions, InstallError> {
    Ok(verbatim(LayoutKind::CoreCsvMerge, tree))
}

pub fn detect_tweakxl(tree: &FileTree) -> bool {
    has_all_paths(tree, layouts::CORE_TWEAKXL_SIGNATURE)
}

/// TweakXL loads definitions from `r6\tweaks`, which its redistributable
/// does not ship; create it so the framework works out of the box.
pub fn install_tweakxl(
    _ctx: &InstallContext,
    tree: &FileTree,
) -> Result<Instructions, InstallError> {
    let mut out = verbatim(LayoutKind::CoreTweakXl, tree);
    out.push_mkdir(layouts::TWEAK_CANONICAL_PREFIX);
    Ok(out)
}

pub fn detect_wolvenkit(tree: &FileTree) -> bool {
    has_all_paths(tree, layouts::CORE_WOLVENKIT_SIGNATURE)
}

/// WolvenKit CLI is tooling for CSVMerge, not game content; it installs
/// under the CSVMerge tree rather than at the root the archive uses.
pub fn install_wolvenkit(
    _ctx: &InstallContext,
    tree: &FileTree,
) -> Result<Instructions, InstallError> {
    let mut out = Instructions::new(LayoutKind::CoreWolvenKit);
    for file in tree.files_under(FILETREE_ROOT, |_| true) {
        let rel = paths::strip_prefix("WolvenKit CLI", &file).unwrap_or(&file);
        out.push_copy(&file, &paths::join(layouts::CORE_WOLVENKIT_DEST_PREFIX, rel));
    }
    Ok(out)
}
