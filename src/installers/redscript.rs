//! Redscript mods.
//!
//! Three packaging shapes exist in the wild:
//! - Canon: `r6\scripts\<modname>\**\*.reds`
//! - Basedir: loose `.reds` directly under `r6\scripts\`
//! - Toplevel: loose `.reds` at the archive root
//!
//! Basedir and Toplevel are mis-packs; their files are relocated under
//! `r6\scripts\<synthesized name>\`. Exactly one shape may be present; when
//! several are, the user chooses between a verbatim fallback install and
//! cancelling. Archive files ride along verbatim in every shape.

use tracing::{debug, warn};

use crate::errors::InstallError;
use crate::filetree::{FileTree, FILETREE_ROOT};
use crate::host::DialogSeverity;
use crate::installers::{fallback, InstallContext};
use crate::instructions::{Instructions, LayoutKind};
use crate::layouts;
use crate::paths;

pub(crate) const ACTION_FALLBACK: &str = "Install as-is";
pub(crate) const ACTION_CANCEL: &str = "Cancel";

pub(crate) fn canon_present(tree: &FileTree) -> bool {
    tree.subdirs_in(layouts::REDS_CANONICAL_PREFIX)
        .iter()
        .any(|dir| tree.dir_with_some_under(dir, layouts::is_reds_file))
}

pub(crate) fn basedir_present(tree: &FileTree) -> bool {
    tree.dir_with_some_in(layouts::REDS_CANONICAL_PREFIX, layouts::is_reds_file)
}

pub(crate) fn toplevel_present(tree: &FileTree) -> bool {
    tree.dir_with_some_in(FILETREE_ROOT, layouts::is_reds_file)
}

pub(crate) fn any_present(tree: &FileTree) -> bool {
    canon_present(tree) || basedir_present(tree) || toplevel_present(tree)
}

pub fn detect(tree: &FileTree) -> bool {
    any_present(tree)
}

fn absorb_archives(out: &mut Instructions, tree: &FileTree) {
    for file in tree.files_under(layouts::ARCHIVE_CANONICAL_PREFIX, |_| true) {
        out.push_copy(&file, &file);
    }
}

pub(crate) fn layout(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    let present = [
        canon_present(tree),
        basedir_present(tree),
        toplevel_present(tree),
    ];
    let count = present.iter().filter(|&&p| p).count();

    match count {
        0 => Err(InstallError::NoMatch),
        1 if present[0] => {
            let mut out = Instructions::new(LayoutKind::RedscriptCanon);
            for file in tree.files_under(layouts::REDS_CANONICAL_PREFIX, |_| true) {
                out.push_copy(&file, &file);
            }
            absorb_archives(&mut out, tree);
            debug!(count = out.len(), "Redscript canonical layout");
            Ok(out)
        }
        1 if present[1] => {
            let mod_name = ctx.synthesized_mod_name();
            let dest_base = paths::join(layouts::REDS_CANONICAL_PREFIX, &mod_name);
            let mut out = Instructions::new(LayoutKind::RedscriptBasedir);
            for file in tree.files_in(layouts::REDS_CANONICAL_PREFIX, |_| true) {
                let dest = paths::join(&dest_base, paths::basename(&file));
                out.push_copy(&file, &dest);
            }
            absorb_archives(&mut out, tree);
            debug!(%mod_name, "Redscript basedir layout relocated");
            Ok(out)
        }
        1 => {
            let mod_name = ctx.synthesized_mod_name();
            let dest_base = paths::join(layouts::REDS_CANONICAL_PREFIX, &mod_name);
            let mut out = Instructions::new(LayoutKind::RedscriptToplevel);
            for file in tree.files_in(FILETREE_ROOT, |_| true) {
                let dest = paths::join(&dest_base, paths::basename(&file));
                out.push_copy(&file, &dest);
            }
            absorb_archives(&mut out, tree);
            debug!(%mod_name, "Redscript toplevel layout relocated");
            Ok(out)
        }
        _ => {
            warn!("multiple Redscript layouts present, prompting");
            let choice = ctx
                .host
                .show_dialog(
                    DialogSeverity::Warning,
                    "Conflicting Redscript Layouts",
                    "This archive mixes canonical, basedir, and/or toplevel Redscript \
                     layouts. It can be installed exactly as packaged, but the game may \
                     not load all of it.",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;
    use crate::installers::testutil;

    #[test]
    fn test_detect_all_shapes() {
        assert!(detect(&FileTree::from_paths(&["r6\\scripts\\Foo\\main.reds"])));
        assert!(detect(&FileTree::from_paths(&["r6\\scripts\\loose.reds"])));
        assert!(detect(&FileTree::from_paths(&["loose.reds"])));
        assert!(!detect(&FileTree::from_paths(&["archive\\pc\\mod\\a.archive"])));
    }

    #[test]
    fn test_canon_copies_verbatim() {
        let host = MockHost::new();
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&[
            "r6\\scripts\\Foo\\main.reds",
            "r6\\scripts\\Foo\\deep\\util.reds",
        ]);
        let result = install(&ctx, &tree).unwrap();
        assert_eq!(result.kind, LayoutKind::RedscriptCanon);
        assert_eq!(result.len(), 2);
        for inst in &result.instructions {
            assert_eq!(inst.source(), Some(inst.destination()));
        }
    }

    #[test]
    fn test_basedir_relocates_under_synthesized_name() {
        let host = MockHost::new();
        let ctx = testutil::ctx(&host); // staging dir: MyMod.installing
        let tree = FileTree::from_paths(&[
            "r6\\scripts\\Foo.reds",
            "archive\\pc\\mod\\Foo.archive",
        ]);
        let result = install(&ctx, &tree).unwrap();
        assert_eq!(result.kind, LayoutKind::RedscriptBasedir);
        assert!(result.instructions.iter().any(|i| {
            i.source() == Some("r6\\scripts\\Foo.reds")
                && i.destination() == "r6\\scripts\\MyMod\\Foo.reds"
        }));
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "archive\\pc\\mod\\Foo.archive"
        }));
    }

    #[test]
    fn test_toplevel_relocates_root_files() {
        let host = MockHost::new();
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&["Loose.reds", "readme.txt"]);
        let result = install(&ctx, &tree).unwrap();
        assert_eq!(result.kind, LayoutKind::RedscriptToplevel);
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "r6\\scripts\\MyMod\\Loose.reds"
        }));
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "r6\\scripts\\MyMod\\readme.txt"
        }));
    }

    #[test]
    fn test_conflict_prompts_and_cancels() {
        let host = MockHost::new().with_dialog_answer(ACTION_CANCEL);
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&["r6\\scripts\\Foo\\main.reds", "loose.reds"]);
        let result = install(&ctx, &tree);
        assert_eq!(result, Err(InstallError::Cancelled));
        assert_eq!(host.dialog_count(), 1);
    }

    #[test]
    fn test_conflict_falls_back_verbatim() {
        let host = MockHost::new().with_dialog_answer(ACTION_FALLBACK);
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&["r6\\scripts\\Foo\\main.reds", "loose.reds"]);
        let result = install(&ctx, &tree).unwrap();
        assert_eq!(result.kind, LayoutKind::Fallback);
        assert_eq!(result.len(), 2);
    }
}
