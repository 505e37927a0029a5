//! Host-facing call surface.
//!
//! The embedding mod manager talks to the core through two calls:
//! `test_supported` (can anything here install this file set?) and
//! `install` (produce the instruction plan). Both are thin adapters over
//! [`Pipeline`]; the game id gate lives here so the pipeline itself stays
//! game-agnostic.

use serde::Serialize;
use tracing::debug;

use crate::errors::InstallError;
use crate::filetree::FileTree;
use crate::installers::InstallContext;
use crate::instructions::Instruction;
use crate::layouts;
use crate::pipeline::Pipeline;

/// Wire result of `test_supported`.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedResult {
    pub supported: bool,
    #[serde(rename = "requiredFiles")]
    pub required_files: Vec<String>,
}

/// Wire result of `install`.
#[derive(Debug, Clone, Serialize)]
pub struct InstallResult {
    pub instructions: Vec<Instruction>,
}

/// True iff this core handles the game and some installer claims the
/// file set. The fallback makes the second half a given, so in practice
/// this gates on the game id.
pub fn test_supported(pipeline: &Pipeline, files: &[String], game_id: &str) -> SupportedResult {
    if !game_id.eq_ignore_ascii_case(layouts::GAME_ID) {
        return SupportedResult {
            supported: false,
            required_files: Vec::new(),
        };
    }
    let tree = FileTree::from_paths(files);
    let installer = pipeline.select(&tree);
    debug!(id = installer.id, "test_supported matched installer");
    SupportedResult {
        supported: true,
        required_files: Vec::new(),
    }
}

/// Produces the instruction plan for a claimed file set.
pub fn install(
    pipeline: &Pipeline,
    ctx: &InstallContext,
    files: &[String],
) -> Result<InstallResult, InstallError> {
    let tree = FileTree::from_paths(files);
    pipeline.install(ctx, &tree).map(|out| InstallResult {
        instructions: out.instructions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;
    use crate::installers::testutil;

    #[test]
    fn test_wrong_game_is_unsupported() {
        let pipeline = Pipeline::new();
        let files = vec!["archive\\pc\\mod\\a.archive".to_string()];
        assert!(!test_supported(&pipeline, &files, "witcher3").supported);
        assert!(test_supported(&pipeline, &files, "cyberpunk2077").supported);
        assert!(test_supported(&pipeline, &files, "Cyberpunk2077").supported);
    }

    #[test]
    fn test_install_produces_wire_instructions() {
        let pipeline = Pipeline::new();
        let host = MockHost::new();
        let ctx = testutil::ctx(&host);
        let files = vec!["archive\\pc\\mod\\a.archive".to_string()];
        let result = install(&pipeline, &ctx, &files).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["instructions"][0]["type"], "copy");
        assert_eq!(
            json["instructions"][0]["destination"],
            "archive\\pc\\mod\\a.archive"
        );
    }
}
