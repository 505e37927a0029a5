//! Layout detectors and installers, one module per mod kind.
//!
//! Every installer exposes the same two functions: `detect` is a pure
//! predicate on the file tree, `install` turns a claimed tree into an
//! instruction set (or a typed failure). The pipeline runs them in a fixed
//! priority order; MultiType composes the per-kind layout functions when an
//! archive mixes several kinds.

pub mod archive;
pub mod cet;
pub mod core;
pub mod fallback;
pub mod ini;
pub mod json;
pub mod multitype;
pub mod red4ext;
pub mod redscript;
pub mod tweak_xl;

use std::path::PathBuf;

use anyhow::Result;

use crate::errors::InstallError;
use crate::filetree::FileTree;
use crate::host::HostApi;
use crate::instructions::Instructions;
use crate::paths;

/// Whether archive-only mods are rewritten into REDmod modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoconvertArchives {
    Enabled,
    #[default]
    Disabled,
}

/// Host-supplied feature flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Features {
    pub redmod_autoconvert_archives: AutoconvertArchives,
}

/// What the host knows about the mod being installed.
#[derive(Debug, Clone)]
pub struct ModInfo {
    pub name: String,
    pub version: String,
}

/// Everything an install function may consult beyond the tree itself.
pub struct InstallContext<'a> {
    pub host: &'a dyn HostApi,
    pub mod_info: ModInfo,
    /// Where the host unpacked the archive. Also the source of the
    /// synthesized mod name for relocated layouts.
    pub staging_dir: PathBuf,
    pub features: Features,
}

impl<'a> InstallContext<'a> {
    /// Mod name derived from the staging directory basename.
    pub fn synthesized_mod_name(&self) -> String {
        paths::synthesize_mod_name(&self.staging_dir)
    }

    /// Reads one staged file by its archive-relative path.
    pub fn read_staged(&self, relative: &str) -> Result<Vec<u8>> {
        let on_disk = self.staging_dir.join(paths::to_native(relative));
        self.host.read_file(&on_disk)
    }
}

/// Pure tree predicate: does this installer claim the archive?
pub type DetectFn = fn(&FileTree) -> bool;

/// Turns a claimed tree into instructions.
pub type InstallFn = fn(&InstallContext, &FileTree) -> Result<Instructions, InstallError>;

/// Coarse installer identity, one per pipeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallerType {
    CoreCet,
    CoreRedscript,
    CoreRed4Ext,
    CoreCsvMerge,
    CoreTweakXl,
    CoreWolvenKit,
    Redmod,
    MultiType,
    Red4Ext,
    Redscript,
    Cet,
    TweakXl,
    Ini,
    ArchiveOnly,
    Json,
    Fallback,
}

impl InstallerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallerType::CoreCet => "core-cet",
            InstallerType::CoreRedscript => "core-redscript",
            InstallerType::CoreRed4Ext => "core-red4ext",
            InstallerType::CoreCsvMerge => "core-csvmerge",
            InstallerType::CoreTweakXl => "core-tweakxl",
            InstallerType::CoreWolvenKit => "core-wolvenkit-cli",
            InstallerType::Redmod => "redmod",
            InstallerType::MultiType => "multitype",
            InstallerType::Red4Ext => "red4ext",
            InstallerType::Redscript => "redscript",
            InstallerType::Cet => "cet",
            InstallerType::TweakXl => "tweakxl",
            InstallerType::Ini => "ini",
            InstallerType::ArchiveOnly => "archive-only",
            InstallerType::Json => "json",
            InstallerType::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for InstallerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in the pipeline's ordered registry.
#[derive(Clone)]
pub struct InstallerDescriptor {
    pub id: &'static str,
    pub installer_type: InstallerType,
    pub priority: u32,
    pub detect: DetectFn,
    pub install: InstallFn,
}

impl std::fmt::Debug for InstallerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallerDescriptor")
            .field("id", &self.id)
            .field("installer_type", &self.installer_type)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Returns true when every path in `signature` exists in the tree.
pub(crate) fn has_all_paths(tree: &FileTree, signature: &[&str]) -> bool {
    signature
        .iter()
        .all(|path| tree.source_paths().binary_search(&path.to_string()).is_ok())
}
