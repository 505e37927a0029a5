//! Rewrites a canonical archive-only mod into a REDmod module.
//!
//! The game only sequences load order for REDmod modules, so an
//! archive-only mod can opt into that by being repackaged: a synthesized
//! `info.json`, archives moved under `mods\<name>\archives\`, and the
//! marker suffix on the name so converted modules are recognizable.

use tracing::info;

use crate::errors::InstallError;
use crate::host::NotificationKind;
use crate::installers::InstallContext;
use crate::instructions::{Instruction, Instructions, LayoutKind};
use crate::layouts;
use crate::paths;
use crate::redmod::info::RedmodInfo;

/// Transforms a canonical archive instruction set into a generated REDmod
/// module. The caller guarantees `archive.kind` is the canonical non-XL
/// layout.
pub(crate) fn transform(
    ctx: &InstallContext,
    archive: Instructions,
) -> Result<Instructions, InstallError> {
    let tagged = format!(
        "{}{}",
        ctx.mod_info.name,
        layouts::REDMOD_AUTOCONVERT_SUFFIX
    );
    let dest_base = paths::join(layouts::REDMOD_BASEDIR, &tagged);
    let archives_base = paths::join(&dest_base, layouts::REDMOD_ARCHIVES_DIR);

    let mut out = Instructions::new(LayoutKind::RedmodTransformedArchive);
    let generated = RedmodInfo::generated(&tagged, &ctx.mod_info.version);
    out.push_generated(
        generated.to_json_bytes()?,
        &paths::join(&dest_base, layouts::REDMOD_INFO_FILE),
    );

    let mut nested = false;
    for inst in archive.instructions {
        match inst {
            Instruction::Copy {
                source,
                destination,
            } => {
                let Some(rel) =
                    paths::strip_prefix(layouts::ARCHIVE_CANONICAL_PREFIX, &destination)
                else {
                    return Err(InstallError::Structure(format!(
                        "cannot convert non-canonical archive destination {destination}"
                    )));
                };
                nested |= rel.contains(paths::SEP);
                out.push_copy(&source, &paths::join(&archives_base, rel));
            }
            other => out.instructions.push(other),
        }
    }
    if nested {
        ctx.host.send_notification(
            NotificationKind::Warning,
            "REDmod archives nested",
            "REDmod expects archives directly in the archives directory; nested \
             files were kept but may not load.",
        );
    }

    out.push_mkdir(layouts::REDMOD_MODDED_SCRIPTS_DIR);

    info!(mod_name = %ctx.mod_info.name, module = %tagged, "archive mod autoconverted");
    ctx.host.send_notification(
        NotificationKind::Info,
        "Mod converted to REDmod",
        &format!(
            "{} was repackaged as REDmod module {tagged} so the game can \
             sequence its load order.",
            ctx.mod_info.name
        ),
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;
    use crate::installers::testutil;

    #[test]
    fn test_transform_rewrites_destinations() {
        let host = MockHost::new();
        let ctx = testutil::ctx(&host); // mod name: TestMod, version 1.0
        let mut archive = Instructions::new(LayoutKind::ArchiveCanon);
        archive.push_copy("archive\\pc\\mod\\X.archive", "archive\\pc\\mod\\X.archive");

        let result = transform(&ctx, archive).unwrap();
        assert_eq!(result.kind, LayoutKind::RedmodTransformedArchive);
        assert!(result.instructions.iter().any(|i| {
            matches!(i, Instruction::GenerateFile { destination, .. }
                if destination == "mods\\TestMod_autoconverted\\info.json")
        }));
        assert!(result.instructions.iter().any(|i| {
            i.destination() == "mods\\TestMod_autoconverted\\archives\\X.archive"
        }));
        assert!(result.instructions.iter().any(|i| {
            matches!(i, Instruction::Mkdir { destination }
                if destination == "r6\\cache\\modded")
        }));
        assert_eq!(host.notification_count(), 1);
    }

    #[test]
    fn test_generated_info_carries_tagged_name() {
        let host = MockHost::new();
        let ctx = testutil::ctx(&host);
        let mut archive = Instructions::new(LayoutKind::ArchiveCanon);
        archive.push_copy("archive\\pc\\mod\\X.archive", "archive\\pc\\mod\\X.archive");

        let result = transform(&ctx, archive).unwrap();
        let data = result
            .instructions
            .iter()
            .find_map(|i| match i {
                Instruction::GenerateFile { data, .. } => Some(data.clone()),
                _ => None,
            })
            .unwrap();
        let info = RedmodInfo::parse_and_validate(&data).unwrap();
        assert_eq!(info.name, "TestMod_autoconverted");
        assert_eq!(info.version.v, "1.0");
    }

    #[test]
    fn test_non_canonical_destination_rejects() {
        let host = MockHost::new();
        let ctx = testutil::ctx(&host);
        let mut archive = Instructions::new(LayoutKind::ArchiveCanon);
        archive.push_copy("elsewhere\\X.archive", "elsewhere\\X.archive");
        assert!(matches!(
            transform(&ctx, archive),
            Err(InstallError::Structure(_))
        ));
    }
}
