//! Red4Ext native plugins.
//!
//! Shapes: Canon (`red4ext\plugins\<modname>\**\*.dll`), Basedir (loose
//! DLLs directly in `red4ext\plugins\`), Modnamed (the archive root is the
//! mod directory itself), Toplevel (loose DLLs at the root). Exactly one
//! shape may be present.
//!
//! Archives carrying a runtime DLL (`coreclr.dll` and friends) or any DLL
//! aimed at `bin\x64` are never Red4Ext mods: the detector refuses them so
//! the pipeline falls through to the fallback installer instead of
//! dead-ending a claimed install.

use tracing::{debug, warn};

use crate::errors::InstallError;
use crate::filetree::{FileTree, FILETREE_ROOT};
use crate::host::DialogSeverity;
use crate::installers::redscript::{ACTION_CANCEL, ACTION_FALLBACK};
use crate::installers::{fallback, InstallContext};
use crate::instructions::{Instructions, LayoutKind};
use crate::layouts;
use crate::paths;

/// Root directories that can never be a mod-named plugin directory.
const KNOWN_TOPLEVEL_DIRS: &[&str] = &[
    "archive", "bin", "csvmerge", "engine", "mods", "r6", "red4ext",
];

pub(crate) fn canon_present(tree: &FileTree) -> bool {
    tree.subdirs_in(layouts::RED4EXT_CANONICAL_PREFIX)
        .iter()
        .any(|dir| tree.dir_with_some_under(dir, layouts::is_dll_file))
}

pub(crate) fn basedir_present(tree: &FileTree) -> bool {
    tree.dir_with_some_in(layouts::RED4EXT_CANONICAL_PREFIX, layouts::is_dll_file)
}

fn modnamed_dirs(tree: &FileTree) -> Vec<String> {
    tree.subdirs_in(FILETREE_ROOT)
        .into_iter()
        .filter(|dir| !KNOWN_TOPLEVEL_DIRS.contains(&paths::basename(dir)))
        .filter(|dir| tree.dir_with_some_under(dir, layouts::is_dll_file))
        .collect()
}

pub(crate) fn modnamed_present(tree: &FileTree) -> bool {
    !modnamed_dirs(tree).is_empty()
}

pub(crate) fn toplevel_present(tree: &FileTree) -> bool {
    tree.dir_with_some_in(FILETREE_ROOT, layouts::is_dll_file)
}

pub(crate) fn any_present(tree: &FileTree) -> bool {
    canon_present(tree) || basedir_present(tree) || modnamed_present(tree) || toplevel_present(tree)
}

/// True when the archive ships a DLL no mod may override, or a DLL whose
/// destination would be the game binary directory.
pub(crate) fn has_forbidden_dll(tree: &FileTree) -> bool {
    let dlls = tree.files_under(FILETREE_ROOT, layouts::is_dll_file);
    dlls.iter().any(|dll| {
        if layouts::is_nonoverridable_dll(dll) {
            warn!(%dll, "archive ships a non-overridable runtime DLL");
            return true;
        }
        if paths::prefix_of(layouts::RED4EXT_FORBIDDEN_DEST_PREFIX, dll) {
            warn!(%dll, "archive aims a DLL at the game binary directory");
            return true;
        }
        false
    })
}

pub fn detect(tree: &FileTree) -> bool {
    any_present(tree) && !has_forbidden_dll(tree)
}

pub(crate) fn layout(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    let present = [
        canon_present(tree),
        basedir_present(tree),
        modnamed_present(tree),
        toplevel_present(tree),
    ];
    let count = present.iter().filter(|&&p| p).count();

    match count {
        0 => Err(InstallError::NoMatch),
        1 if present[0] => {
            let mut out = Instructions::new(LayoutKind::Red4ExtCanon);
            for file in tree.files_under(layouts::RED4EXT_CANONICAL_PREFIX, |_| true) {
                out.push_copy(&file, &file);
            }
            debug!(count = out.len(), "Red4Ext canonical layout");
            Ok(out)
        }
        1 if present[1] => {
            let dest_base = paths::join(
                layouts::RED4EXT_CANONICAL_PREFIX,
                &ctx.synthesized_mod_name(),
            );
            let mut out = Instructions::new(LayoutKind::Red4ExtBasedir);
            for file in tree.files_in(layouts::RED4EXT_CANONICAL_PREFIX, |_| true) {
                out.push_copy(&file, &paths::join(&dest_base, paths::basename(&file)));
            }
            Ok(out)
        }
        1 if present[2] => {
            let mut out = Instructions::new(LayoutKind::Red4ExtModnamed);
            for dir in modnamed_dirs(tree) {
                for file in tree.files_under(&dir, |_| true) {
                    out.push_copy(&file, &paths::join(layouts::RED4EXT_CANONICAL_PREFIX, &file));
                }
            }
            Ok(out)
        }
        1 => {
            let dest_base = paths::join(
                layouts::RED4EXT_CANONICAL_PREFIX,
                &ctx.synthesized_mod_name(),
            );
            let mut out = Instructions::new(LayoutKind::Red4ExtToplevel);
            for file in tree.files_in(FILETREE_ROOT, |_| true) {
                out.push_copy(&file, &paths::join(&dest_base, paths::basename(&file)));
            }
            Ok(out)
        }
        _ => {
            warn!("multiple Red4Ext layouts present, prompting");
            let choice = ctx
                .host
                .show_dialog(
                    DialogSeverity::Warning,
                    "Conflicting Red4Ext Layouts",
                    "This archive mixes several Red4Ext packaging shapes. It can be \
                     installed exactly as packaged, but the plugin loader may not pick \
                     all of it up.",
                    &[ACTION_FALLBACK, ACTION_CANCEL],
                )
                .map_err(|e| InstallError::Io(e.to_string()))?;
            if choice == ACTION_FALLBACK {
                fallback::layout(ctx, tree)
            } else {
                Err(InstallError::Cancelled)
            }
        }
    }
}

pub fn install(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    layout(ctx, tree)
}
