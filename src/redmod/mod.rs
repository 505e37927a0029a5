//! REDmod modules, the game's official mod format.
//!
//! A module directory holds an `info.json` plus subtype directories
//! (`archives`, `customSounds`, `scripts`, `tweaks`). Modules appear in
//! three shapes: Canon (modules under `mods\`), Named (a single module
//! directory at the archive root), and Toplevel (the root itself is the
//! module). Installation validates `info.json` from disk, then runs the
//! per-subtype validators in order and relocates everything under
//! `mods\<info.name>\`.

pub mod autoconvert;
pub mod info;

use tracing::{debug, warn};

use crate::errors::InstallError;
use crate::filetree::{FileTree, FILETREE_ROOT};
use crate::host::NotificationKind;
use crate::installers::InstallContext;
use crate::instructions::{Instructions, LayoutKind};
use crate::layouts;
use crate::paths;

use info::RedmodInfo;

/// A module directory has an `info.json` and at least one recognized
/// subtype directory.
fn is_module_dir(tree: &FileTree, dir: &str) -> bool {
    tree.dir_with_some_in(dir, |f| paths::basename_eq(f, layouts::REDMOD_INFO_FILE))
        && tree
            .subdir_names_in(dir)
            .iter()
            .any(|name| layouts::is_redmod_subtype_dir(name))
}

pub(crate) fn canon_module_dirs(tree: &FileTree) -> Vec<String> {
    tree.subdirs_in(layouts::REDMOD_BASEDIR)
        .into_iter()
        .filter(|dir| is_module_dir(tree, dir))
        .collect()
}

pub(crate) fn detect_canon(tree: &FileTree) -> bool {
    !canon_module_dirs(tree).is_empty()
}

fn named_module_dirs(tree: &FileTree) -> Vec<String> {
    tree.subdirs_in(FILETREE_ROOT)
        .into_iter()
        .filter(|dir| dir != layouts::REDMOD_BASEDIR)
        .filter(|dir| is_module_dir(tree, dir))
        .collect()
}

pub(crate) fn detect_named(tree: &FileTree) -> bool {
    !named_module_dirs(tree).is_empty()
}

pub(crate) fn detect_toplevel(tree: &FileTree) -> bool {
    is_module_dir(tree, FILETREE_ROOT)
}

pub fn detect(tree: &FileTree) -> bool {
    detect_canon(tree) || detect_named(tree) || detect_toplevel(tree)
}

/// Canonical-only layout, used when REDmod participates in a MultiType
/// composite.
pub(crate) fn canon_layout(
    ctx: &InstallContext,
    tree: &FileTree,
) -> Result<Instructions, InstallError> {
    let dirs = canon_module_dirs(tree);
    if dirs.is_empty() {
        return Err(InstallError::NoMatch);
    }
    install_modules(ctx, tree, LayoutKind::RedmodCanon, &dirs)
}

pub fn install(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    let canon = canon_module_dirs(tree);
    if !canon.is_empty() {
        return install_modules(ctx, tree, LayoutKind::RedmodCanon, &canon);
    }
    let named = named_module_dirs(tree);
    if !named.is_empty() {
        return install_modules(ctx, tree, LayoutKind::RedmodNamed, &named);
    }
    if detect_toplevel(tree) {
        return install_modules(
            ctx,
            tree,
            LayoutKind::RedmodToplevel,
            &[FILETREE_ROOT.to_string()],
        );
    }
    Err(InstallError::NoMatch)
}

fn install_modules(
    ctx: &InstallContext,
    tree: &FileTree,
    kind: LayoutKind,
    module_dirs: &[String],
) -> Result<Instructions, InstallError> {
    let mut out = Instructions::new(kind);
    for dir in module_dirs {
        install_module(ctx, tree, dir, &mut out)?;
    }
    // the script compiler needs this directory to exist at deploy time
    out.push_mkdir(layouts::REDMOD_MODDED_SCRIPTS_DIR);
    debug!(kind = %kind, modules = module_dirs.len(), count = out.len(), "REDmod layout");
    Ok(out)
}

fn install_module(
    ctx: &InstallContext,
    tree: &FileTree,
    module_dir: &str,
    out: &mut Instructions,
) -> Result<(), InstallError> {
    let info_files = tree.files_in(module_dir, |f| {
        paths::basename_eq(f, layouts::REDMOD_INFO_FILE)
    });
    let Some(info_path) = info_files.first() else {
        return Err(InstallError::Structure(format!(
            "REDmod module {module_dir} has no {}",
            layouts::REDMOD_INFO_FILE
        )));
    };

    let bytes = ctx
        .read_staged(info_path)
        .map_err(|e| InstallError::Io(format!("{info_path}: {e}")))?;
    let info = RedmodInfo::parse_and_validate(&bytes)?;
    let dest_base = paths::join(layouts::REDMOD_BASEDIR, &info.name);

    let mut claimed: Vec<String> = vec![info_path.clone()];
    out.push_copy(info_path, &paths::join(&dest_base, layouts::REDMOD_INFO_FILE));

    // archives
    let archives_dir = paths::join(module_dir, layouts::REDMOD_ARCHIVES_DIR);
    let archive_files = tree.files_under(&archives_dir, layouts::is_archive_or_xl);
    let mut nested = false;
    let mut archive_count = 0usize;
    for file in &archive_files {
        let Some(rel) = paths::strip_prefix(&archives_dir, file) else {
            continue;
        };
        nested |= rel.contains(paths::SEP);
        if layouts::is_archive_file(file) {
            archive_count += 1;
        }
        let dest_dir = paths::join(&dest_base, layouts::REDMOD_ARCHIVES_DIR);
        out.push_copy(file, &paths::join(&dest_dir, rel));
        claimed.push(file.clone());
    }
    if nested {
        warn!(module = module_dir, "archives nested below the archives directory");
        ctx.host.send_notification(
            NotificationKind::Warning,
            "REDmod archives nested",
            "REDmod expects archives directly in the archives directory; nested \
             files were kept but may not load.",
        );
    }
    if archive_count > 1 {
        ctx.host.send_notification(
            NotificationKind::Warning,
            "Multiple REDmod archives",
            "The module ships more than one .archive; load order between them \
             is undefined.",
        );
    }

    // customSounds, cross-checked against the declaration
    let sounds_dir = paths::join(module_dir, layouts::REDMOD_SOUNDS_DIR);
    let sound_files = tree.files_under(&sounds_dir, layouts::is_audio_file);
    if info.declares_real_sounds() && sound_files.is_empty() {
        return Err(InstallError::Validation(format!(
            "info.json for {} declares custom sounds but the module ships none",
            info.name
        )));
    }
    if !info.declares_sounds() && !sound_files.is_empty() {
        return Err(InstallError::Validation(format!(
            "module {} ships sound files that info.json does not declare",
            info.name
        )));
    }
    for file in &sound_files {
        if let Some(rel) = paths::strip_prefix(&sounds_dir, file) {
            let dest_dir = paths::join(&dest_base, layouts::REDMOD_SOUNDS_DIR);
            out.push_copy(file, &paths::join(&dest_dir, rel));
            claimed.push(file.clone());
        }
    }

    // scripts must stay inside the compiler's known roots
    let scripts_dir = paths::join(module_dir, layouts::REDMOD_SCRIPTS_DIR);
    for file in tree.files_under(&scripts_dir, |_| true) {
        let Some(rel) = paths::strip_prefix(&scripts_dir, &file) else {
            continue;
        };
        let root = paths::first_segment(rel);
        if rel == root || !layouts::REDMOD_SCRIPTS_VALID_SUBDIRS.contains(&root) {
            return Err(InstallError::Validation(format!(
                "script file {file} is outside the supported script roots ({})",
                layouts::REDMOD_SCRIPTS_VALID_SUBDIRS.join(", ")
            )));
        }
        let dest_dir = paths::join(&dest_base, layouts::REDMOD_SCRIPTS_DIR);
        out.push_copy(&file, &paths::join(&dest_dir, rel));
        claimed.push(file.clone());
    }

    // tweaks have a single legal root
    let tweaks_dir = paths::join(module_dir, layouts::REDMOD_TWEAKS_DIR);
    for file in tree.files_under(&tweaks_dir, |_| true) {
        let Some(rel) = paths::strip_prefix(&tweaks_dir, &file) else {
            continue;
        };
        let root = paths::first_segment(rel);
        if rel == root || root != layouts::REDMOD_TWEAKS_VALID_SUBDIR {
            return Err(InstallError::Validation(format!(
                "tweak file {file} is outside the {} root",
                layouts::REDMOD_TWEAKS_VALID_SUBDIR
            )));
        }
        let dest_dir = paths::join(&dest_base, layouts::REDMOD_TWEAKS_DIR);
        out.push_copy(&file, &paths::join(&dest_dir, rel));
        claimed.push(file.clone());
    }

    // everything else in the module rides along verbatim
    for file in tree.files_under(module_dir, |_| true) {
        if claimed.contains(&file) {
            continue;
        }
        if let Some(rel) = paths::strip_prefix(module_dir, &file) {
            out.push_copy(&file, &paths::join(&dest_base, rel));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;
    use crate::installers::testutil;
    use std::path::PathBuf;

    const INFO_JSON: &[u8] = br#"{"name":"MyMod","version":{"v":"1.0"}}"#;

    fn staged(rel: &str) -> PathBuf {
        PathBuf::from("/staging/MyMod.installing").join(rel.replace('\\', "/"))
    }

    #[test]
    fn test_detect_canon() {
        let tree = FileTree::from_paths(&[
            "mods\\MyMod\\info.json",
            "mods\\MyMod\\archives\\a.archive",
        ]);
        assert!(detect_canon(&tree));
        assert!(detect(&tree));
    }

    #[test]
    fn test_detect_requires_subtype_dir() {
        let tree = FileTree::from_paths(&["mods\\MyMod\\info.json"]);
        assert!(!detect(&tree));
    }

    #[test]
    fn test_detect_named_and_toplevel() {
        let named = FileTree::from_paths(&[
            "MyMod\\info.json",
            "MyMod\\archives\\a.archive",
        ]);
        assert!(detect_named(&named));

        let toplevel = FileTree::from_paths(&["info.json", "archives\\a.archive"]);
        assert!(detect_toplevel(&toplevel));
    }

    #[test]
    fn test_canon_install() {
        let host = MockHost::new().with_file(staged("mods\\MyMod\\info.json"), INFO_JSON);
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\MyMod\\info.json",
            "mods\\MyMod\\archives\\a.archive",
        ]);
        let result = install(&ctx, &tree).unwrap();
        assert_eq!(result.kind, LayoutKind::RedmodCanon);
        assert!(result.instructions.iter().any(|i| {
            i.source() == Some("mods\\MyMod\\info.json")
                && i.destination() == "mods\\MyMod\\info.json"
        }));
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "mods\\MyMod\\archives\\a.archive"
        }));
        assert!(result.instructions.iter().any(|i| {
            matches!(i, crate::instructions::Instruction::Mkdir { destination }
                if destination == "r6\\cache\\modded")
        }));
    }

    #[test]
    fn test_destination_follows_info_name() {
        // directory name and info.json name disagree; info.json wins
        let host = MockHost::new().with_file(
            staged("mods\\WrongName\\info.json"),
            br#"{"name":"RealName","version":{"v":"2.0"}}"#,
        );
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\WrongName\\info.json",
            "mods\\WrongName\\archives\\a.archive",
        ]);
        let result = install(&ctx, &tree).unwrap();
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "mods\\RealName\\archives\\a.archive"
        }));
    }

    #[test]
    fn test_unreadable_info_is_io_error() {
        let host = MockHost::new();
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\MyMod\\info.json",
            "mods\\MyMod\\archives\\a.archive",
        ]);
        assert!(matches!(install(&ctx, &tree), Err(InstallError::Io(_))));
    }

    #[test]
    fn test_declared_sounds_must_be_present() {
        let host = MockHost::new().with_file(
            staged("mods\\M\\info.json"),
            br#"{"name":"M","version":{"v":"1"},"customSounds":[{"type":"mod_sfx_2d","file":"x.wav"}]}"#,
        );
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\M\\info.json",
            "mods\\M\\archives\\a.archive",
        ]);
        assert!(matches!(
            install(&ctx, &tree),
            Err(InstallError::Validation(_))
        ));
    }

    #[test]
    fn test_undeclared_sounds_reject() {
        let host = MockHost::new().with_file(staged("mods\\M\\info.json"), br#"{"name":"M","version":{"v":"1"}}"#);
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\M\\info.json",
            "mods\\M\\customSounds\\boom.wav",
        ]);
        assert!(matches!(
            install(&ctx, &tree),
            Err(InstallError::Validation(_))
        ));
    }

    #[test]
    fn test_declared_and_present_sounds_install() {
        let host = MockHost::new().with_file(
            staged("mods\\M\\info.json"),
            br#"{"name":"M","version":{"v":"1"},"customSounds":[{"type":"mod_sfx_2d","file":"boom.wav"}]}"#,
        );
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\M\\info.json",
            "mods\\M\\customSounds\\boom.wav",
        ]);
        let result = install(&ctx, &tree).unwrap();
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "mods\\M\\customSounds\\boom.wav"
        }));
    }

    #[test]
    fn test_scripts_outside_whitelist_reject() {
        let host = MockHost::new().with_file(staged("mods\\M\\info.json"), br#"{"name":"M","version":{"v":"1"}}"#);
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\M\\info.json",
            "mods\\M\\scripts\\rogue\\hack.reds",
        ]);
        assert!(matches!(
            install(&ctx, &tree),
            Err(InstallError::Validation(_))
        ));
    }

    #[test]
    fn test_scripts_in_whitelist_install() {
        let host = MockHost::new().with_file(staged("mods\\M\\info.json"), br#"{"name":"M","version":{"v":"1"}}"#);
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\M\\info.json",
            "mods\\M\\scripts\\cyberpunk\\ai\\fix.reds",
        ]);
        let result = install(&ctx, &tree).unwrap();
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "mods\\M\\scripts\\cyberpunk\\ai\\fix.reds"
        }));
    }

    #[test]
    fn test_tweaks_outside_base_reject() {
        let host = MockHost::new().with_file(staged("mods\\M\\info.json"), br#"{"name":"M","version":{"v":"1"}}"#);
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\M\\info.json",
            "mods\\M\\tweaks\\custom\\prices.tweak",
        ]);
        assert!(matches!(
            install(&ctx, &tree),
            Err(InstallError::Validation(_))
        ));
    }

    #[test]
    fn test_extra_files_relocate_verbatim() {
        let host = MockHost::new().with_file(staged("mods\\M\\info.json"), br#"{"name":"M","version":{"v":"1"}}"#);
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\M\\info.json",
            "mods\\M\\archives\\a.archive",
            "mods\\M\\README.md",
            "mods\\M\\extras\\screenshot.png",
        ]);
        let result = install(&ctx, &tree).unwrap();
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "mods\\M\\README.md"
        }));
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "mods\\M\\extras\\screenshot.png"
        }));
    }

    #[test]
    fn test_nested_archives_warn_but_install() {
        let host = MockHost::new().with_file(staged("mods\\M\\info.json"), br#"{"name":"M","version":{"v":"1"}}"#);
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "mods\\M\\info.json",
            "mods\\M\\archives\\nested\\a.archive",
        ]);
        let result = install(&ctx, &tree).unwrap();
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "mods\\M\\archives\\nested\\a.archive"
        }));
        assert!(host.notification_count() >= 1);
    }
}
