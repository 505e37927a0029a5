//! Ordered installer registry.
//!
//! The pipeline owns a fixed, priority-ordered array of installer
//! descriptors built once at startup. Selection is a fold with
//! short-circuit: the first detector that claims the tree wins, and the
//! fallback at the end guarantees there always is one. Once an installer
//! has claimed an archive its install function is authoritative; failures
//! are surfaced to the user, never retried with a later installer.

use tracing::{debug, info};

use crate::errors::InstallError;
use crate::filetree::FileTree;
use crate::host::DialogSeverity;
use crate::installers::{
    archive, cet, core, fallback, ini, json, multitype, red4ext, redscript, tweak_xl,
    InstallContext, InstallerDescriptor, InstallerType,
};
use crate::instructions::Instructions;
use crate::redmod;

/// First priority handed out; the registry stays well under 100.
pub const PRIORITY_START: u32 = 30;

pub struct Pipeline {
    installers: Vec<InstallerDescriptor>,
}

impl Pipeline {
    /// Builds the registry in its fixed order. Framework redistributables
    /// come first so they are never misread as ordinary mods; the
    /// fallback comes last and claims everything.
    pub fn new() -> Self {
        type Entry = (
            &'static str,
            InstallerType,
            crate::installers::DetectFn,
            crate::installers::InstallFn,
        );
        let entries: Vec<Entry> = vec![
            ("core-cet", InstallerType::CoreCet, core::detect_cet, core::install_cet),
            (
                "core-redscript",
                InstallerType::CoreRedscript,
                core::detect_redscript,
                core::install_redscript,
            ),
            (
                "core-red4ext",
                InstallerType::CoreRed4Ext,
                core::detect_red4ext,
                core::install_red4ext,
            ),
            (
                "core-csvmerge",
                InstallerType::CoreCsvMerge,
                core::detect_csvmerge,
                core::install_csvmerge,
            ),
            (
                "core-tweakxl",
                InstallerType::CoreTweakXl,
                core::detect_tweakxl,
                core::install_tweakxl,
            ),
            (
                "core-wolvenkit-cli",
                InstallerType::CoreWolvenKit,
                core::detect_wolvenkit,
                core::install_wolvenkit,
            ),
            ("redmod", InstallerType::Redmod, redmod::detect, redmod::install),
            (
                "multitype",
                InstallerType::MultiType,
                multitype::detect,
                multitype::install,
            ),
            ("red4ext", InstallerType::Red4Ext, red4ext::detect, red4ext::install),
            (
                "redscript",
                InstallerType::Redscript,
                redscript::detect,
                redscript::install,
            ),
            ("cet", InstallerType::Cet, cet::detect, cet::install),
            ("tweakxl", InstallerType::TweakXl, tweak_xl::detect, tweak_xl::install),
            ("ini", InstallerType::Ini, ini::detect, ini::install),
            (
                "archive-only",
                InstallerType::ArchiveOnly,
                archive::detect,
                archive::install,
            ),
            ("json", InstallerType::Json, json::detect, json::install),
            ("fallback", InstallerType::Fallback, fallback::detect, fallback::install),
        ];

        let installers = entries
            .into_iter()
            .enumerate()
            .map(|(idx, (id, installer_type, detect, install))| InstallerDescriptor {
                id,
                installer_type,
                priority: PRIORITY_START + idx as u32,
                detect,
                install,
            })
            .collect();

        Self { installers }
    }

    pub fn installers(&self) -> &[InstallerDescriptor] {
        &self.installers
    }

    /// First installer whose detector claims the tree. The fallback
    /// guarantees a match.
    pub fn select(&self, tree: &FileTree) -> &InstallerDescriptor {
        self.installers
            .iter()
            .find(|d| (d.detect)(tree))
            .unwrap_or_else(|| &self.installers[self.installers.len() - 1])
    }

    /// Runs the selected installer. Structure, validation, conflict and
    /// I/O failures are surfaced to the user before being returned; a
    /// cancellation is the user's own choice and is returned quietly.
    pub fn install(
        &self,
        ctx: &InstallContext,
        tree: &FileTree,
    ) -> Result<Instructions, InstallError> {
        let installer = self.select(tree);
        info!(
            id = installer.id,
            installer = %installer.installer_type,
            files = tree.len(),
            "installer claimed archive"
        );

        match (installer.install)(ctx, tree) {
            Ok(mut out) => {
                out.dedup();
                debug!(kind = %out.kind, count = out.len(), "instructions ready");
                Ok(out)
            }
            Err(InstallError::Cancelled) => Err(InstallError::Cancelled),
            Err(err) => {
                let _ = ctx.host.show_dialog(
                    DialogSeverity::Error,
                    err.title(),
                    &err.to_string(),
                    &["Ok"],
                );
                Err(err)
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
