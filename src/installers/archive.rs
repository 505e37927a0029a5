//! Archive-only mods.
//!
//! Layouts are tried in order: Canon (already under `archive\pc\mod`),
//! Heritage (the pre-1.3 `archive\pc\patch`, rewritten to canonical), and
//! Other (archives anywhere else, moved up by basename; remaining files
//! keep their relative paths under the canonical prefix). The first layout
//! yielding instructions wins, and the chosen layout must account for every
//! file in the archive. A `.xl` manifest anywhere marks the ArchiveXL
//! flavor.
//!
//! When REDmod autoconversion is enabled, a canonical non-XL result is
//! handed to the REDmod engine and rewritten into a generated module.

use tracing::{debug, warn};

use crate::errors::InstallError;
use crate::filetree::{FileTree, FILETREE_ROOT};
use crate::host::NotificationKind;
use crate::installers::{AutoconvertArchives, InstallContext};
use crate::instructions::{Instructions, LayoutKind};
use crate::layouts;
use crate::paths;
use crate::redmod::autoconvert;

pub fn detect(tree: &FileTree) -> bool {
    tree.dir_with_some_under(FILETREE_ROOT, layouts::is_archive_or_xl)
}

fn canon_layout(tree: &FileTree) -> Option<Instructions> {
    let files = tree.files_under(layouts::ARCHIVE_CANONICAL_PREFIX, |_| true);
    if files.is_empty() {
        return None;
    }
    Some(Instructions::copy_verbatim(LayoutKind::ArchiveCanon, &files))
}

fn heritage_layout(tree: &FileTree) -> Option<Instructions> {
    let files = tree.files_under(layouts::ARCHIVE_HERITAGE_PREFIX, |_| true);
    if files.is_empty() {
        return None;
    }
    let mut out = Instructions::new(LayoutKind::ArchiveHeritage);
    for file in &files {
        if let Some(rel) = paths::strip_prefix(layouts::ARCHIVE_HERITAGE_PREFIX, file) {
            out.push_copy(file, &paths::join(layouts::ARCHIVE_CANONICAL_PREFIX, rel));
        }
    }
    Some(out)
}

fn other_layout(ctx: &InstallContext, tree: &FileTree) -> Option<Instructions> {
    let archives = tree.files_under(FILETREE_ROOT, layouts::is_archive_or_xl);
    if archives.is_empty() {
        return None;
    }

    let mut out = Instructions::new(LayoutKind::ArchiveOther);
    let mut parents: Vec<&str> = Vec::new();
    for file in &archives {
        let parent = paths::parent(file).unwrap_or("");
        if !parents.contains(&parent) {
            parents.push(parent);
        }
        let dest = paths::join(layouts::ARCHIVE_CANONICAL_PREFIX, paths::basename(file));
        out.push_copy(file, &dest);
    }

    let mut made_subdirs = false;
    for file in tree.files_under(FILETREE_ROOT, |f| !layouts::is_archive_or_xl(f)) {
        made_subdirs |= file.contains(paths::SEP);
        out.push_copy(&file, &paths::join(layouts::ARCHIVE_CANONICAL_PREFIX, &file));
    }

    if parents.len() > 1 {
        warn!(dirs = parents.len(), "archives consolidated from several directories");
        ctx.host.send_notification(
            NotificationKind::Warning,
            "Archive layout adjusted",
            "Archives from several directories were moved into archive\\pc\\mod; \
             check for duplicates if the mod offered variants.",
        );
    }
    if made_subdirs {
        ctx.host.send_notification(
            NotificationKind::Warning,
            "Archive layout adjusted",
            "Extra files were installed into subdirectories under archive\\pc\\mod.",
        );
    }

    Some(out)
}

pub(crate) fn layout(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    let chosen = canon_layout(tree)
        .or_else(|| heritage_layout(tree))
        .or_else(|| other_layout(ctx, tree));
    let Some(mut out) = chosen else {
        return Err(InstallError::NoMatch);
    };

    if tree.dir_with_some_under(FILETREE_ROOT, layouts::is_xl_file) {
        out.kind = LayoutKind::ArchiveXl;
    }

    if out.copy_count() < tree.len() {
        return Err(InstallError::Structure(format!(
            "only {} of {} files fit the {} archive layout",
            out.copy_count(),
            tree.len(),
            out.kind
        )));
    }

    let conflicts = out.destination_conflicts();
    if !conflicts.is_empty() {
        return Err(InstallError::Structure(format!(
            "several files collapse onto the same destination: {}",
            conflicts.join(", ")
        )));
    }

    debug!(kind = %out.kind, count = out.len(), "archive layout");
    Ok(out)
}

pub fn install(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    let out = layout(ctx, tree)?;
    match (ctx.features.redmod_autoconvert_archives, out.kind) {
        (AutoconvertArchives::Enabled, LayoutKind::ArchiveCanon) => {
            autoconvert::transform(ctx, out)
        }
        (AutoconvertArchives::Enabled, LayoutKind::ArchiveXl) => {
            ctx.host.send_notification(
                NotificationKind::Info,
                "REDmod autoconversion skipped",
                "ArchiveXL mods cannot be converted to REDmod and were installed \
                 as regular archives.",
            );
            Ok(out)
        }
        _ => Ok(out),
    }
}
