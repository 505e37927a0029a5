//! chromed - Cyberpunk 2077 mod installer core.
//!
//! Classifies the contents of an unpacked mod archive and plans the
//! file-copy instructions that put it where the game loads it from.
//! The host mod manager applies the instructions; this crate never
//! mutates the game directory itself.

pub mod api;
pub mod errors;
pub mod filetree;
pub mod host;
pub mod installers;
pub mod instructions;
pub mod layouts;
pub mod paths;
pub mod pipeline;
pub mod redmod;

// Re-export commonly used types
pub use api::{install, test_supported, InstallResult, SupportedResult};
pub use errors::InstallError;
pub use filetree::{FileTree, FILETREE_ROOT};
pub use host::{DialogSeverity, HostApi, NotificationKind, StagingHost};
pub use installers::{AutoconvertArchives, Features, InstallContext, InstallerType, ModInfo};
pub use instructions::{Instruction, Instructions, LayoutKind};
pub use pipeline::Pipeline;
