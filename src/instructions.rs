//! Instruction model shared with the host mod manager.
//!
//! The core never touches the disk layout itself; it emits a list of
//! instructions the host applies. The serialized form is a stable wire
//! contract: `{"type":"copy",...}`, `{"type":"generatefile",...}`,
//! `{"type":"mkdir",...}`, with destinations relative to the game root.

use serde::{Deserialize, Serialize};

/// A single step the host must perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Instruction {
    /// Copy a staged source file to a destination under the game root.
    Copy { source: String, destination: String },
    /// Write generated bytes to a destination under the game root.
    #[serde(rename = "generatefile")]
    GenerateFile { data: Vec<u8>, destination: String },
    /// Create a directory under the game root.
    Mkdir { destination: String },
}

impl Instruction {
    /// The destination path of any instruction variant.
    pub fn destination(&self) -> &str {
        match self {
            Instruction::Copy { destination, .. } => destination,
            Instruction::GenerateFile { destination, .. } => destination,
            Instruction::Mkdir { destination } => destination,
        }
    }

    /// The staged source path, for copy instructions.
    pub fn source(&self) -> Option<&str> {
        match self {
            Instruction::Copy { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// The layout a detector recognized. Drives destination policy and is
/// reported back to the host for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    CetCanon,
    RedscriptCanon,
    RedscriptBasedir,
    RedscriptToplevel,
    Red4ExtCanon,
    Red4ExtBasedir,
    Red4ExtModnamed,
    Red4ExtToplevel,
    ArchiveCanon,
    ArchiveHeritage,
    ArchiveOther,
    ArchiveXl,
    IniReshade,
    Ini,
    JsonCanon,
    TweakXlCanon,
    TweakXlBasedir,
    RedmodCanon,
    RedmodNamed,
    RedmodToplevel,
    RedmodTransformedArchive,
    CoreCet,
    CoreRedscript,
    CoreRed4Ext,
    CoreCsvMerge,
    CoreTweakXl,
    CoreWolvenKit,
    MultiType,
    Fallback,
}

impl LayoutKind {
    /// Dotted diagnostic name, mirroring how the host logs layouts.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::CetCanon => "CET.Canon",
            LayoutKind::RedscriptCanon => "Redscript.Canon",
            LayoutKind::RedscriptBasedir => "Redscript.Basedir",
            LayoutKind::RedscriptToplevel => "Redscript.Toplevel",
            LayoutKind::Red4ExtCanon => "Red4Ext.Canon",
            LayoutKind::Red4ExtBasedir => "Red4Ext.Basedir",
            LayoutKind::Red4ExtModnamed => "Red4Ext.Modnamed",
            LayoutKind::Red4ExtToplevel => "Red4Ext.Toplevel",
            LayoutKind::ArchiveCanon => "Archive.Canon",
            LayoutKind::ArchiveHeritage => "Archive.Heritage",
            LayoutKind::ArchiveOther => "Archive.Other",
            LayoutKind::ArchiveXl => "Archive.XL",
            LayoutKind::IniReshade => "INI.Reshade",
            LayoutKind::Ini => "INI.Ini",
            LayoutKind::JsonCanon => "JSON.Canon",
            LayoutKind::TweakXlCanon => "TweakXL.Canon",
            LayoutKind::TweakXlBasedir => "TweakXL.Basedir",
            LayoutKind::RedmodCanon => "REDmod.Canon",
            LayoutKind::RedmodNamed => "REDmod.Named",
            LayoutKind::RedmodToplevel => "REDmod.Toplevel",
            LayoutKind::RedmodTransformedArchive => "REDmodTransformed.Archive",
            LayoutKind::CoreCet => "Core.CET",
            LayoutKind::CoreRedscript => "Core.Redscript",
            LayoutKind::CoreRed4Ext => "Core.Red4Ext",
            LayoutKind::CoreCsvMerge => "Core.CSVMerge",
            LayoutKind::CoreTweakXl => "Core.TweakXL",
            LayoutKind::CoreWolvenKit => "Core.WolvenKitCLI",
            LayoutKind::MultiType => "MultiType",
            LayoutKind::Fallback => "Fallback",
        }
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The result of a successful layout: the recognized kind plus the ordered
/// instruction list for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructions {
    pub kind: LayoutKind,
    pub instructions: Vec<Instruction>,
}

impl Instructions {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            instructions: Vec::new(),
        }
    }

    /// Builds a 1:1 verbatim copy set for the given source paths.
    pub fn copy_verbatim<S: AsRef<str>>(kind: LayoutKind, sources: &[S]) -> Self {
        let mut out = Self::new(kind);
        for src in sources {
            out.push_copy(src.as_ref(), src.as_ref());
        }
        out
    }

    pub fn push_copy(&mut self, source: &str, destination: &str) {
        self.instructions.push(Instruction::Copy {
            source: source.to_string(),
            destination: destination.to_string(),
        });
    }

    pub fn push_generated(&mut self, data: Vec<u8>, destination: &str) {
        self.instructions.push(Instruction::GenerateFile {
            data,
            destination: destination.to_string(),
        });
    }

    pub fn push_mkdir(&mut self, destination: &str) {
        self.instructions.push(Instruction::Mkdir {
            destination: destination.to_string(),
        });
    }

    /// Appends another instruction set, keeping this set's kind.
    pub fn absorb(&mut self, other: Instructions) {
        self.instructions.extend(other.instructions);
    }

    /// Removes exact duplicates, preserving first-occurrence order.
    pub fn dedup(&mut self) {
        let mut seen = Vec::new();
        self.instructions.retain(|inst| {
            if seen.contains(inst) {
                false
            } else {
                seen.push(inst.clone());
                true
            }
        });
    }

    /// Destinations written by more than one distinct instruction. A
    /// non-empty result means the layouts that were merged disagree.
    pub fn destination_conflicts(&self) -> Vec<String> {
        let mut conflicts = Vec::new();
        for (i, a) in self.instructions.iter().enumerate() {
            for b in &self.instructions[i + 1..] {
                if a.destination() == b.destination() && a != b {
                    let dest = a.destination().to_string();
                    if !conflicts.contains(&dest) {
                        conflicts.push(dest);
                    }
                }
            }
        }
        conflicts
    }

    /// Number of input files covered by copy instructions.
    pub fn copy_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::Copy { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_copy() {
        let inst = Instruction::Copy {
            source: "a\\b.archive".into(),
            destination: "archive\\pc\\mod\\b.archive".into(),
        };
        let json = serde_json::to_value(&inst).unwrap();
        assert_eq!(json["type"], "copy");
        assert_eq!(json["source"], "a\\b.archive");
        assert_eq!(json["destination"], "archive\\pc\\mod\\b.archive");
    }

    #[test]
    fn test_wire_format_generatefile() {
        let inst = Instruction::GenerateFile {
            data: b"{}".to_vec(),
            destination: "mods\\X\\info.json".into(),
        };
        let json = serde_json::to_value(&inst).unwrap();
        assert_eq!(json["type"], "generatefile");
        assert_eq!(json["destination"], "mods\\X\\info.json");
    }

    #[test]
    fn test_wire_format_mkdir_roundtrip() {
        let inst = Instruction::Mkdir {
            destination: "r6\\cache\\modded".into(),
        };
        let json = serde_json::to_string(&inst).unwrap();
        let back: Instruction = serde_json::from_str(&json).unwrap();
        assert_eq!(inst, back);
    }

    #[test]
    fn test_copy_verbatim() {
        let set = Instructions::copy_verbatim(LayoutKind::Fallback, &["a.txt", "b\\c.txt"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.instructions[0].source(), Some("a.txt"));
        assert_eq!(set.instructions[0].destination(), "a.txt");
    }

    #[test]
    fn test_dedup_keeps_order() {
        let mut set = Instructions::new(LayoutKind::MultiType);
        set.push_copy("a", "x");
        set.push_copy("b", "y");
        set.push_copy("a", "x");
        set.dedup();
        assert_eq!(set.len(), 2);
        assert_eq!(set.instructions[0].destination(), "x");
        assert_eq!(set.instructions[1].destination(), "y");
    }

    #[test]
    fn test_destination_conflicts() {
        let mut set = Instructions::new(LayoutKind::MultiType);
        set.push_copy("a", "x");
        set.push_copy("b", "x");
        set.push_copy("c", "y");
        assert_eq!(set.destination_conflicts(), vec!["x"]);

        let mut clean = Instructions::new(LayoutKind::MultiType);
        clean.push_copy("a", "x");
        clean.push_copy("a", "x");
        assert!(clean.destination_conflicts().is_empty());
    }

    #[test]
    fn test_layout_kind_display() {
        assert_eq!(LayoutKind::CetCanon.to_string(), "CET.Canon");
        assert_eq!(
            LayoutKind::RedmodTransformedArchive.to_string(),
            "REDmodTransformed.Archive"
        );
    }
}
