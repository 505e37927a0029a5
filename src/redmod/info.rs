//! REDmod `info.json` model.
//!
//! Every REDmod module carries an `info.json` describing the mod name,
//! version, and optionally the custom sound events it overrides. The file
//! is schema-validated before any instruction is emitted; autoconversion
//! also generates one for rewritten archive mods.

use serde::{Deserialize, Serialize};

use crate::errors::InstallError;
use crate::layouts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModVersion {
    pub v: String,
}

/// One custom sound event declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSound {
    #[serde(rename = "type")]
    pub sound_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl CustomSound {
    /// `mod_skip` entries silence an event without shipping audio.
    pub fn is_skip(&self) -> bool {
        self.sound_type == layouts::REDMOD_SOUND_SKIP_TYPE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedmodInfo {
    pub name: String,
    pub version: ModVersion,
    #[serde(rename = "customSounds", default, skip_serializing_if = "Option::is_none")]
    pub custom_sounds: Option<Vec<CustomSound>>,
}

impl RedmodInfo {
    /// Parses and schema-validates `info.json` bytes.
    pub fn parse_and_validate(bytes: &[u8]) -> Result<Self, InstallError> {
        let info: RedmodInfo = serde_json::from_slice(bytes)
            .map_err(|e| InstallError::Validation(format!("info.json does not parse: {e}")))?;
        if info.name.trim().is_empty() {
            return Err(InstallError::Validation(
                "info.json is missing a mod name".into(),
            ));
        }
        if info.version.v.trim().is_empty() {
            return Err(InstallError::Validation(
                "info.json is missing a version".into(),
            ));
        }
        if let Some(sounds) = &info.custom_sounds {
            if sounds.iter().any(|s| s.sound_type.trim().is_empty()) {
                return Err(InstallError::Validation(
                    "info.json declares a custom sound without a type".into(),
                ));
            }
        }
        Ok(info)
    }

    /// True when any custom sounds are declared at all.
    pub fn declares_sounds(&self) -> bool {
        self.custom_sounds
            .as_ref()
            .is_some_and(|sounds| !sounds.is_empty())
    }

    /// True when a declared sound actually requires shipped audio.
    pub fn declares_real_sounds(&self) -> bool {
        self.custom_sounds
            .as_ref()
            .is_some_and(|sounds| sounds.iter().any(|s| !s.is_skip()))
    }

    /// Metadata for a module synthesized from an archive mod.
    pub fn generated(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: ModVersion {
                v: version.to_string(),
            },
            custom_sounds: None,
        }
    }

    /// Serializes for a `generatefile` instruction.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, InstallError> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| InstallError::Structure(format!("could not generate info.json: {e}")))
    }
}
