//! Composite archives mixing several mod kinds.
//!
//! Big overhaul mods often ship CET scripts, Redscript sources, Red4Ext
//! plugins, tweaks and archives in one package. Each contributing kind's
//! layout function runs against the same tree; the instruction sets are
//! unioned and deduplicated. REDmod participates only in its canonical
//! shape. A destination claimed by two different sources fails the
//! install.

use tracing::debug;

use crate::errors::InstallError;
use crate::filetree::FileTree;
use crate::installers::{cet, red4ext, redscript, tweak_xl, InstallContext};
use crate::instructions::{Instructions, LayoutKind};
use crate::layouts;
use crate::redmod;

struct Members {
    cet: bool,
    redscript: bool,
    red4ext: bool,
    tweak_xl: bool,
    redmod_canon: bool,
    archive: bool,
}

impl Members {
    fn of(tree: &FileTree) -> Self {
        Self {
            cet: cet::has_canon(tree),
            redscript: redscript::any_present(tree),
            red4ext: red4ext::any_present(tree) && !red4ext::has_forbidden_dll(tree),
            tweak_xl: tweak_xl::any_present(tree),
            redmod_canon: redmod::detect_canon(tree),
            archive: tree
                .dir_with_some_under(layouts::ARCHIVE_CANONICAL_PREFIX, layouts::is_archive_or_xl),
        }
    }

    fn framework_count(&self) -> usize {
        [
            self.cet,
            self.redscript,
            self.red4ext,
            self.tweak_xl,
            self.redmod_canon,
        ]
        .iter()
        .filter(|&&p| p)
        .count()
    }

    /// A composite is either two frameworks at once, or one framework plus
    /// archives it would not absorb on its own (CET and Redscript absorb
    /// canonical archives themselves; those pairs stay with their own
    /// installers).
    fn is_composite(&self) -> bool {
        self.framework_count() >= 2
            || (self.framework_count() == 1 && self.archive && !self.cet && !self.redscript)
    }
}

pub fn detect(tree: &FileTree) -> bool {
    Members::of(tree).is_composite()
}

pub fn install(ctx: &InstallContext, tree: &FileTree) -> Result<Instructions, InstallError> {
    let members = Members::of(tree);
    if !members.is_composite() {
        return Err(InstallError::NoMatch);
    }

    let mut out = Instructions::new(LayoutKind::MultiType);
    if members.cet {
        out.absorb(cet::layout(ctx, tree)?);
    }
    if members.redscript {
        out.absorb(redscript::layout(ctx, tree)?);
    }
    if members.red4ext {
        out.absorb(red4ext::layout(ctx, tree)?);
    }
    if members.tweak_xl {
        out.absorb(tweak_xl::layout(ctx, tree)?);
    }
    if members.redmod_canon {
        out.absorb(redmod::canon_layout(ctx, tree)?);
    }
    if members.archive && !members.cet && !members.redscript {
        // CET and Redscript absorb canonical archives themselves
        for file in tree.files_under(layouts::ARCHIVE_CANONICAL_PREFIX, |_| true) {
            out.push_copy(&file, &file);
        }
    }

    out.dedup();
    let conflicts = out.destination_conflicts();
    if !conflicts.is_empty() {
        return Err(InstallError::Conflict(format!(
            "the combined mod types write different files to: {}",
            conflicts.join(", ")
        )));
    }

    debug!(count = out.len(), "multitype layout");
    Ok(out)
}
