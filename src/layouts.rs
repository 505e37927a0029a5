//! Canonical layout constants for every supported mod kind.
//!
//! These tables are the single source of truth for where Cyberpunk 2077
//! expects mod content on disk. Prefixes are in normalized backslash form
//! and are bit-exact contracts with the game and its frameworks.

use crate::paths;

/// Game identifier the host passes to `test_supported`.
pub const GAME_ID: &str = "cyberpunk2077";

// --- Cyber Engine Tweaks -------------------------------------------------

/// Directory that holds one subdirectory per CET mod.
pub const CET_MOD_CANONICAL_PREFIX: &str = "bin\\x64\\plugins\\cyber_engine_tweaks\\mods";

/// Entry point every CET mod must ship.
pub const CET_INIT_FILE: &str = "init.lua";

/// CET's own configuration. Reserved; never a mod file.
pub const CET_GLOBAL_INI: &str = "bin\\x64\\global.ini";

// --- Redscript -----------------------------------------------------------

/// Directory that holds one subdirectory per Redscript mod.
pub const REDS_CANONICAL_PREFIX: &str = "r6\\scripts";

/// Redscript source extension.
pub const REDS_EXT: &str = ".reds";

// --- Red4Ext -------------------------------------------------------------

/// Directory that holds one subdirectory per Red4Ext plugin.
pub const RED4EXT_CANONICAL_PREFIX: &str = "red4ext\\plugins";

/// Native plugin extension.
pub const DLL_EXT: &str = ".dll";

/// DLLs that ship with the game's .NET runtime. A mod overriding any of
/// these would corrupt the runtime, so their presence disqualifies an
/// archive from Red4Ext handling entirely.
pub const RED4EXT_NONOVERRIDABLE_DLLS: &[&str] = &[
    "clrcompression.dll",
    "clrjit.dll",
    "coreclr.dll",
    "mscordaccore.dll",
];

/// No mod-supplied DLL may land under the game binary directory.
pub const RED4EXT_FORBIDDEN_DEST_PREFIX: &str = "bin\\x64";

// --- Archives ------------------------------------------------------------

/// Where the game loads loose mod archives from.
pub const ARCHIVE_CANONICAL_PREFIX: &str = "archive\\pc\\mod";

/// Pre-1.3 archive location. Still seen in old packages; rewritten to the
/// canonical prefix on install.
pub const ARCHIVE_HERITAGE_PREFIX: &str = "archive\\pc\\patch";

/// Game archive extension.
pub const ARCHIVE_EXT: &str = ".archive";

/// ArchiveXL extension manifest.
pub const ARCHIVE_XL_EXT: &str = ".xl";

/// Everything the archive installer claims.
pub const ARCHIVE_EXTS: &[&str] = &[ARCHIVE_EXT, ARCHIVE_XL_EXT];

// --- TweakXL -------------------------------------------------------------

/// Where TweakXL loads tweak definitions from.
pub const TWEAK_CANONICAL_PREFIX: &str = "r6\\tweaks";

/// Tweak definition extensions TweakXL accepts.
pub const TWEAK_EXTS: &[&str] = &[".tweak", ".yaml", ".yml"];

// --- INI / Reshade -------------------------------------------------------

pub const INI_EXT: &str = ".ini";

/// Destination for engine configuration overrides.
pub const INI_MOD_CANONICAL_PREFIX: &str = "engine\\config\\platform\\pc";

/// Reshade presets sit next to the game binary.
pub const RESHADE_MOD_CANONICAL_PREFIX: &str = "bin\\x64";

/// Shader payload directory shipped by Reshade presets.
pub const RESHADE_SHADERS_DIR: &str = "reshade-shaders";

// --- JSON ----------------------------------------------------------------

pub const JSON_EXT: &str = ".json";

/// Loose JSON configs the community redistributes, keyed by basename,
/// mapped to their one legal destination.
pub const KNOWN_JSON_FILES: &[(&str, &str)] = &[
    ("giweights.json", "engine\\config\\giweights.json"),
    ("bumpersSettings.json", "r6\\config\\bumpersSettings.json"),
];

/// `options.json` is only valid somewhere under this prefix.
pub const JSON_SETTINGS_PREFIX: &str = "r6\\config\\settings";

pub const OPTIONS_JSON: &str = "options.json";

/// Documentation files allowed to ride along with a JSON mod, in place.
pub const JSON_SIDECAR_EXTS: &[&str] = &[".txt", ".md"];

// --- REDmod --------------------------------------------------------------

/// Root directory of the official REDmod format.
pub const REDMOD_BASEDIR: &str = "mods";

/// Per-module metadata file.
pub const REDMOD_INFO_FILE: &str = "info.json";

/// Subtype directories a REDmod module may contain.
pub const REDMOD_SUBTYPE_DIRS: &[&str] = &["archives", "customSounds", "scripts", "tweaks"];

pub const REDMOD_ARCHIVES_DIR: &str = "archives";
pub const REDMOD_SOUNDS_DIR: &str = "customSounds";
pub const REDMOD_SCRIPTS_DIR: &str = "scripts";
pub const REDMOD_TWEAKS_DIR: &str = "tweaks";

/// Script roots the REDmod compiler mirrors from `tools\redmod\scripts`.
pub const REDMOD_SCRIPTS_VALID_SUBDIRS: &[&str] = &["core", "cyberpunk"];

/// The single tweak root REDmod deploys.
pub const REDMOD_TWEAKS_VALID_SUBDIR: &str = "base";

/// Sound file extensions accepted under `customSounds`.
pub const REDMOD_AUDIO_EXTS: &[&str] = &[".wav", ".mp3", ".ogg"];

/// Sound entries of this type declare an override without shipping audio.
pub const REDMOD_SOUND_SKIP_TYPE: &str = "mod_skip";

/// The script compiler output directory; created so deployment finds it.
pub const REDMOD_MODDED_SCRIPTS_DIR: &str = "r6\\cache\\modded";

/// Appended to a mod's name when an archive mod is rewritten into REDmod
/// form, so the converted module is distinguishable from a native one.
pub const REDMOD_AUTOCONVERT_SUFFIX: &str = "_autoconverted";

// --- Framework redistributables ------------------------------------------

/// Fingerprint file sets for the framework installers themselves. A match
/// requires every listed file to be present, which keeps ordinary mods
/// (that may reuse one of these names) from matching.
pub const CORE_CET_SIGNATURE: &[&str] = &[
    "bin\\x64\\global.ini",
    "bin\\x64\\version.dll",
    "bin\\x64\\plugins\\cyber_engine_tweaks.asi",
];

pub const CORE_REDSCRIPT_SIGNATURE: &[&str] = &[
    "engine\\config\\base\\scripts.ini",
    "engine\\tools\\scc.exe",
];

pub const CORE_RED4EXT_SIGNATURE: &[&str] = &[
    "bin\\x64\\winmm.dll",
    "red4ext\\RED4ext.dll",
];

pub const CORE_CSVMERGE_SIGNATURE: &[&str] = &[
    "csvmerge\\CSVMerge.cmd",
    "csvmerge\\mods\\Basegame_AMM_Prep.xl",
];

pub const CORE_TWEAKXL_SIGNATURE: &[&str] = &[
    "red4ext\\plugins\\TweakXL\\TweakXL.dll",
];

pub const CORE_WOLVENKIT_SIGNATURE: &[&str] = &[
    "WolvenKit CLI\\WolvenKit.CLI.exe",
];

/// WolvenKit CLI exists to serve CSVMerge and installs under it.
pub const CORE_WOLVENKIT_DEST_PREFIX: &str = "csvmerge\\wolvenkitcli";

// --- Predicates ----------------------------------------------------------

/// Returns true for `.archive` files.
pub fn is_archive_file(path: &str) -> bool {
    paths::ext_eq(path, ARCHIVE_EXT)
}

/// Returns true for ArchiveXL `.xl` manifests.
pub fn is_xl_file(path: &str) -> bool {
    paths::ext_eq(path, ARCHIVE_XL_EXT)
}

/// Returns true for `.archive` or `.xl` files.
pub fn is_archive_or_xl(path: &str) -> bool {
    paths::ext_in(path, ARCHIVE_EXTS)
}

/// Returns true for Redscript sources.
pub fn is_reds_file(path: &str) -> bool {
    paths::ext_eq(path, REDS_EXT)
}

/// Returns true for native DLLs.
pub fn is_dll_file(path: &str) -> bool {
    paths::ext_eq(path, DLL_EXT)
}

/// Returns true for a CET entry point.
pub fn is_init_lua(path: &str) -> bool {
    paths::basename_eq(path, CET_INIT_FILE)
}

/// Returns true for tweak definition files.
pub fn is_tweak_file(path: &str) -> bool {
    paths::ext_in(path, TWEAK_EXTS)
}

pub fn is_ini_file(path: &str) -> bool {
    paths::ext_eq(path, INI_EXT)
}

pub fn is_json_file(path: &str) -> bool {
    paths::ext_eq(path, JSON_EXT)
}

/// Returns true for documentation sidecars (`.txt`, `.md`).
pub fn is_sidecar_file(path: &str) -> bool {
    paths::ext_in(path, JSON_SIDECAR_EXTS)
}

/// Returns true for sound files REDmod accepts.
pub fn is_audio_file(path: &str) -> bool {
    paths::ext_in(path, REDMOD_AUDIO_EXTS)
}

/// Returns true if the DLL basename belongs to the game's .NET runtime.
pub fn is_nonoverridable_dll(path: &str) -> bool {
    let lower = paths::basename(path).to_lowercase();
    RED4EXT_NONOVERRIDABLE_DLLS.iter().any(|&dll| lower == dll)
}

/// Looks up the canonical destination for a known loose JSON basename.
pub fn known_json_destination(path: &str) -> Option<&'static str> {
    let name = paths::basename(path);
    KNOWN_JSON_FILES
        .iter()
        .find(|(known, _)| name.eq_ignore_ascii_case(known))
        .map(|&(_, dest)| dest)
}

/// Returns true for the reserved CET global configuration path.
pub fn is_cet_global_ini(path: &str) -> bool {
    path.eq_ignore_ascii_case(CET_GLOBAL_INI)
}

/// Returns true if the path sits under a `reshade-shaders` directory.
pub fn under_reshade_shaders(path: &str) -> bool {
    path.split(paths::SEP)
        .any(|seg| seg.eq_ignore_ascii_case(RESHADE_SHADERS_DIR))
}

/// Returns true if the directory basename is a recognized REDmod subtype.
pub fn is_redmod_subtype_dir(name: &str) -> bool {
    REDMOD_SUBTYPE_DIRS.iter().any(|&d| name == d)
}
