//! Last-resort installer.
//!
//! Claims everything, installs 1:1, and always tells the user the archive
//! was not structurally recognized so they know to check the result.

use tracing::info;

use crate::errors::InstallError;
use crate::filetree::{FileTree, FILETREE_ROOT};
use crate::host::NotificationKind;
use crate::installers::InstallContext;
use crate::instructions::{Instructions, LayoutKind};

pub fn detect(_tree: &FileTree) -> bool {
    true
}

pub(crate) fn layout(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    let files = tree.files_under(FILETREE_ROOT, |_| true);
    info!(count = files.len(), "fallback install, copying as packaged");
    ctx.host.send_notification(
        NotificationKind::Info,
        "Mod installed as packaged",
        "The archive layout was not recognized; files were copied exactly as \
         packaged. The game may not pick all of them up.",
    );
    Ok(Instructions::copy_verbatim(LayoutKind::Fallback, &files))
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
    fn test_always_detects() {
        assert!(detect(&FileTree::from_paths::<&str>(&[])));
        assert!(detect(&FileTree::from_paths(&["whatever.bin"])));
    }

    #[test]
    fn test_verbatim_with_notification() {
        let host = MockHost::new();
        let ctx = testutil::ctx(&host);
        let tree = FileTree::from_paths(&["a.bin", "deep\\b.bin"]);
        let result = install(&ctx, &tree).unwrap();
        assert_eq!(result.kind, LayoutKind::Fallback);
        assert_eq!(result.len(), 2);
        assert_eq!(host.notification_count(), 1);
    }
}
