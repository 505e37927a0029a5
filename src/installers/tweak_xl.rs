//! TweakXL tweak definitions.
//!
//! Canon: anything under `r6\tweaks\`. Basedir: loose `.tweak`/`.yaml`
//! files at the archive root, relocated into `r6\tweaks\`.

use tracing::{debug, warn};

use crate::errors::InstallError;
use crate::filetree::{FileTree, FILETREE_ROOT};
use crate::host::DialogSeverity;
use crate::installers::redscript::{ACTION_CANCEL, ACTION_FALLBACK};
use crate::installers::{fallback, InstallContext};
use crate::instructions::{Instructions, LayoutKind};
use crate::layouts;
use crate::paths;

pub(crate) fn canon_present(tree: &FileTree) -> bool {
    tree.dir_with_some_under(layouts::TWEAK_CANONICAL_PREFIX, |_| true)
}

pub(crate) fn basedir_present(tree: &FileTree) -> bool {
    tree.dir_with_some_in(FILETREE_ROOT, layouts::is_tweak_file)
}

pub(crate) fn any_present(tree: &FileTree) -> bool {
    canon_present(tree) || basedir_present(tree)
}

pub fn detect(tree: &FileTree) -> bool {
    any_present(tree)
}

pub(crate) fn layout(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    match (canon_present(tree), basedir_present(tree)) {
        (false, false) => Err(InstallError::NoMatch),
        (true, false) => {
            let mut out = Instructions::new(LayoutKind::TweakXlCanon);
            for file in tree.files_under(layouts::TWEAK_CANONICAL_PREFIX, |_| true) {
                out.push_copy(&file, &file);
            }
            debug!(count = out.len(), "TweakXL canonical layout");
            Ok(out)
        }
        (false, true) => {
            let mut out = Instructions::new(LayoutKind::TweakXlBasedir);
            for file in tree.files_in(FILETREE_ROOT, layouts::is_tweak_file) {
                let dest = paths::join(layouts::TWEAK_CANONICAL_PREFIX, paths::basename(&file));
                out.push_copy(&file, &dest);
            }
            Ok(out)
        }
        (true, true) => {
            warn!("multiple TweakXL layouts present, prompting");
            let choice = ctx
                .host
                .show_dialog(
                    DialogSeverity::Warning,
                    "Conflicting TweakXL Layouts",
                    "This archive has tweaks both under r6\\tweaks and loose at the \
                     root. It can be installed exactly as packaged.",
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
    fn test_detect() {
        assert!(detect(&FileTree::from_paths(&["r6\\tweaks\\mymod\\prices.yaml"])));
        assert!(detect(&FileTree::from_paths(&["prices.tweak"])));
        assert!(!detect(&FileTree::from_paths(&["archive\\pc\\mod\\a.archive"])));
    }

    #[test]
    fn test_canon_verbatim() {
        let host = MockHost::new();
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&["r6\\tweaks\\mymod\\prices.yaml"]);
        let result = install(&ctx, &tree).unwrap();
        assert_eq!(result.kind, LayoutKind::TweakXlCanon);
        assert_eq!(
            result.instructions[0].destination(),
            "r6\\tweaks\\mymod\\prices.yaml"
        );
    }

    #[test]
    fn test_basedir_relocates() {
        let host = MockHost::new();
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&["prices.tweak", "readme.txt"]);
        let result = install(&ctx, &tree).unwrap();
        assert_eq!(result.kind, LayoutKind::TweakXlBasedir);
        assert_eq!(result.len(), 1);
        assert_eq!(result.instructions[0].destination(), "r6\\tweaks\\prices.tweak");
    }

    #[test]
    fn test_conflict_prompts() {
        let host = MockHost::new().with_dialog_answer(ACTION_CANCEL);
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&["r6\\tweaks\\a.yaml", "b.tweak"]);
        assert_eq!(install(&ctx, &tree), Err(InstallError::Cancelled));
    }
}
