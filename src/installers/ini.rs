//! Loose INI mods and Reshade presets.
//!
//! Detection is a pure tree predicate; classifying normal-vs-Reshade needs
//! the first INI's bytes, so that single read happens in `install` through
//! the host, never in `detect`. Reshade presets open with a section header
//! or comment line; engine config tweaks do not.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::errors::InstallError;
use crate::filetree::{FileTree, FILETREE_ROOT};
use crate::installers::InstallContext;
use crate::instructions::{Instructions, LayoutKind};
use crate::layouts;
use crate::paths;

static RESHADE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\[#].+").expect("static regex"));

fn mod_inis(tree: &FileTree) -> Vec<String> {
    tree.files_under(FILETREE_ROOT, |f| {
        layouts::is_ini_file(f)
            && !layouts::is_cet_global_ini(f)
            && !layouts::under_reshade_shaders(f)
    })
}

pub fn detect(tree: &FileTree) -> bool {
    if mod_inis(tree).is_empty() {
        return false;
    }
    // CET configs, Redscript sources and archives each have their own
    // installer; the reserved CET global marks a CET (or core) package.
    if tree.dir_with_some_under(FILETREE_ROOT, layouts::is_init_lua)
        || tree.dir_with_some_under(FILETREE_ROOT, layouts::is_reds_file)
        || tree.dir_with_some_under(FILETREE_ROOT, layouts::is_archive_or_xl)
        || tree.dir_with_some_under(FILETREE_ROOT, layouts::is_cet_global_ini)
    {
        return false;
    }
    true
}

/// Destination for a shader payload file: everything after the
/// `reshade-shaders` segment, re-rooted under `bin\x64\reshade-shaders`.
fn shader_destination(file: &str) -> Option<String> {
    let segments: Vec<&str> = file.split(paths::SEP).collect();
    let idx = segments
        .iter()
        .position(|seg| seg.eq_ignore_ascii_case(layouts::RESHADE_SHADERS_DIR))?;
    let rel = segments[idx + 1..].join("\\");
    let base = paths::join(
        layouts::RESHADE_MOD_CANONICAL_PREFIX,
        layouts::RESHADE_SHADERS_DIR,
    );
    Some(paths::join(&base, &rel))
}

pub(crate) fn layout(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    let inis = mod_inis(tree);
    let Some(first) = inis.first() else {
        return Err(InstallError::NoMatch);
    };

    let bytes = ctx
        .read_staged(first)
        .map_err(|e| InstallError::Io(format!("{first}: {e}")))?;
    let head = String::from_utf8_lossy(&bytes);
    let reshade = RESHADE_HEADER.is_match(head.trim_start_matches('\u{feff}'));
    debug!(probe = %first, reshade, "classified INI mod");

    if reshade {
        let mut out = Instructions::new(LayoutKind::IniReshade);
        for ini in &inis {
            let dest = paths::join(
                layouts::RESHADE_MOD_CANONICAL_PREFIX,
                paths::basename(ini),
            );
            out.push_copy(ini, &dest);
        }
        for file in tree.files_under(FILETREE_ROOT, layouts::under_reshade_shaders) {
            if let Some(dest) = shader_destination(&file) {
                out.push_copy(&file, &dest);
            }
        }
        Ok(out)
    } else {
        let mut out = Instructions::new(LayoutKind::Ini);
        for ini in &inis {
            let dest = paths::join(
                layouts::INI_MOD_CANONICAL_PREFIX,
                paths::basename(ini),
            );
            out.push_copy(ini, &dest);
        }
        Ok(out)
    }
}

pub fn install(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    layout(ctx, tree)
}
