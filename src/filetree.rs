//! Read-only file tree over an unpacked archive's relative paths.
//!
//! Detectors ask the same subtree questions over and over (does this
//! directory exist, which children hold a matching file, what lives under a
//! prefix), so the path list is loaded once into an arena trie keyed by
//! path segments. Nodes are directories; files are stored as full
//! normalized paths on their parent node. The tree is never mutated after
//! construction and all query results are deterministic for a given input
//! set regardless of input order.

use std::collections::HashMap;

use crate::paths;

/// Path of the root directory node. Always present, even for an empty tree.
pub const FILETREE_ROOT: &str = "";

#[derive(Debug)]
struct Node {
    /// Full normalized directory path ("" for the root).
    path: String,
    /// Arena indices of child directories, sorted by path.
    children: Vec<usize>,
    /// Full paths of files directly in this directory, sorted.
    files: Vec<String>,
}

/// Immutable view over a set of archive-relative paths.
#[derive(Debug)]
pub struct FileTree {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    files: Vec<String>,
}

impl FileTree {
    /// Builds a tree from raw path strings.
    ///
    /// Paths are normalized to backslash form; entries ending in a
    /// separator are directory markers and create a node without a file.
    /// Ancestor directories are created as needed. Duplicates collapse.
    pub fn from_paths<S: AsRef<str>>(raw_paths: &[S]) -> Self {
        let mut tree = FileTree {
            nodes: vec![Node {
                path: String::new(),
                children: Vec::new(),
                files: Vec::new(),
            }],
            index: HashMap::from([(String::new(), 0)]),
            files: Vec::new(),
        };

        let mut dirs: Vec<String> = Vec::new();
        let mut files: Vec<String> = Vec::new();
        for raw in raw_paths {
            let normalized = paths::normalize(raw.as_ref());
            if normalized.is_empty() {
                continue;
            }
            if paths::is_dir_marker(raw.as_ref()) {
                dirs.push(normalized);
            } else {
                files.push(normalized);
            }
        }
        dirs.sort();
        dirs.dedup();
        files.sort();
        files.dedup();

        for dir in &dirs {
            tree.ensure_dir(dir);
        }
        for file in &files {
            let node = match paths::parent(file) {
                Some(dir) => tree.ensure_dir(dir),
                None => 0,
            };
            tree.nodes[node].files.push(file.clone());
            tree.files.push(file.clone());
        }

        tree
    }

    /// Walks `dir` segment by segment, creating missing nodes, and returns
    /// the arena index of the final node.
    fn ensure_dir(&mut self, dir: &str) -> usize {
        if dir.is_empty() {
            return 0;
        }
        if let Some(&idx) = self.index.get(dir) {
            return idx;
        }
        let mut current = 0usize;
        let mut walked = String::new();
        for segment in dir.split(paths::SEP) {
            walked = paths::join(&walked, segment);
            current = match self.index.get(&walked) {
                Some(&idx) => idx,
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(Node {
                        path: walked.clone(),
                        children: Vec::new(),
                        files: Vec::new(),
                    });
                    let parent = current;
                    self.nodes[parent].children.push(idx);
                    self.index.insert(walked.clone(), idx);
                    idx
                }
            };
        }
        current
    }

    fn node(&self, dir: &str) -> Option<&Node> {
        self.index.get(dir).map(|&idx| &self.nodes[idx])
    }

    /// Returns true if the directory node exists (even with no files).
    pub fn dir_in_tree(&self, dir: &str) -> bool {
        self.index.contains_key(dir)
    }

    /// Files directly in `dir` matching the predicate.
    pub fn files_in<F>(&self, dir: &str, pred: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        match self.node(dir) {
            Some(node) => node.files.iter().filter(|f| pred(f)).cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Files anywhere at or under `dir` matching the predicate.
    /// Directory markers never appear here; only real files do.
    pub fn files_under<F>(&self, dir: &str, pred: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut out = Vec::new();
        let Some(&start) = self.index.get(dir) else {
            return out;
        };
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            out.extend(node.files.iter().filter(|f| pred(f)).cloned());
            stack.extend(node.children.iter().rev());
        }
        out.sort();
        out
    }

    /// Full paths of the immediate child directories of `dir`.
    pub fn subdirs_in(&self, dir: &str) -> Vec<String> {
        match self.node(dir) {
            Some(node) => node
                .children
                .iter()
                .map(|&idx| self.nodes[idx].path.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Basenames of the immediate child directories of `dir`.
    pub fn subdir_names_in(&self, dir: &str) -> Vec<String> {
        self.subdirs_in(dir)
            .iter()
            .map(|p| paths::basename(p).to_string())
            .collect()
    }

    /// Immediate children of `dir` that directly contain at least one
    /// matching file.
    pub fn find_direct_subdirs_with_some<F>(&self, dir: &str, pred: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        match self.node(dir) {
            Some(node) => node
                .children
                .iter()
                .map(|&idx| &self.nodes[idx])
                .filter(|child| child.files.iter().any(|f| pred(f)))
                .map(|child| child.path.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Strict descendant directories of `dir` that directly contain at
    /// least one matching file.
    pub fn find_all_subdirs_with_some<F>(&self, dir: &str, pred: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut out = Vec::new();
        let Some(&start) = self.index.get(dir) else {
            return out;
        };
        let mut stack: Vec<usize> = self.nodes[start].children.clone();
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.files.iter().any(|f| pred(f)) {
                out.push(node.path.clone());
            }
            stack.extend(&node.children);
        }
        out.sort();
        out
    }

    /// Returns true if `dir` directly contains a matching file.
    pub fn dir_with_some_in<F>(&self, dir: &str, pred: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        self.node(dir)
            .map(|node| node.files.iter().any(|f| pred(f)))
            .unwrap_or(false)
    }

    /// Returns true if any file at or under `dir` matches.
    pub fn dir_with_some_under<F>(&self, dir: &str, pred: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        let Some(&start) = self.index.get(dir) else {
            return false;
        };
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.files.iter().any(|f| pred(f)) {
                return true;
            }
            stack.extend(&node.children);
        }
        false
    }

    /// All file paths in the tree, sorted.
    pub fn source_paths(&self) -> &[String] {
        &self.files
    }

    /// Number of files (directory markers excluded).
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the tree holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::ext_eq;

    fn tree() -> FileTree {
        FileTree::from_paths(&[
            "readme.txt",
            "archive\\pc\\mod\\foo.archive",
            "archive\\pc\\mod\\bar.archive",
            "r6\\scripts\\MyMod\\main.reds",
            "r6\\scripts\\MyMod\\sub\\util.reds",
            "empty\\dir\\",
        ])
    }

    #[test]
    fn test_root_always_exists() {
        let empty = FileTree::from_paths::<&str>(&[]);
        assert!(empty.dir_in_tree(FILETREE_ROOT));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_dir_in_tree() {
        let t = tree();
        assert!(t.dir_in_tree("archive\\pc\\mod"));
        assert!(t.dir_in_tree("archive\\pc"));
        assert!(t.dir_in_tree("empty\\dir"));
        assert!(!t.dir_in_tree("archive\\pc\\patch"));
    }

    #[test]
    fn test_files_in_is_direct_only() {
        let t = tree();
        let direct = t.files_in("r6\\scripts\\MyMod", |f| ext_eq(f, ".reds"));
        assert_eq!(direct, vec!["r6\\scripts\\MyMod\\main.reds"]);
    }

    #[test]
    fn test_files_under_is_recursive() {
        let t = tree();
        let all = t.files_under("r6\\scripts", |f| ext_eq(f, ".reds"));
        assert_eq!(
            all,
            vec![
                "r6\\scripts\\MyMod\\main.reds",
                "r6\\scripts\\MyMod\\sub\\util.reds"
            ]
        );
    }

    #[test]
    fn test_files_under_root() {
        let t = tree();
        assert_eq!(t.files_under(FILETREE_ROOT, |_| true).len(), 5);
    }

    #[test]
    fn test_subdir_queries() {
        let t = tree();
        let mut names = t.subdir_names_in(FILETREE_ROOT);
        names.sort();
        assert_eq!(names, vec!["archive", "empty", "r6"]);
        assert_eq!(t.subdirs_in("r6"), vec!["r6\\scripts"]);
    }

    #[test]
    fn test_find_direct_subdirs_with_some() {
        let t = tree();
        let hits = t.find_direct_subdirs_with_some("r6\\scripts", |f| ext_eq(f, ".reds"));
        assert_eq!(hits, vec!["r6\\scripts\\MyMod"]);
        // main.reds is one level down, not directly in r6
        let none = t.find_direct_subdirs_with_some("r6", |f| ext_eq(f, ".reds"));
        assert!(none.is_empty());
    }

    #[test]
    fn test_find_all_subdirs_with_some() {
        let t = tree();
        let hits = t.find_all_subdirs_with_some(FILETREE_ROOT, |f| ext_eq(f, ".reds"));
        assert_eq!(
            hits,
            vec!["r6\\scripts\\MyMod", "r6\\scripts\\MyMod\\sub"]
        );
    }

    #[test]
    fn test_existence_checks() {
        let t = tree();
        assert!(t.dir_with_some_in("archive\\pc\\mod", |f| ext_eq(f, ".archive")));
        assert!(!t.dir_with_some_in("archive\\pc", |f| ext_eq(f, ".archive")));
        assert!(t.dir_with_some_under("archive", |f| ext_eq(f, ".archive")));
        assert!(!t.dir_with_some_under("empty", |_| true));
    }

    #[test]
    fn test_source_paths_sorted_and_deduped() {
        let a = FileTree::from_paths(&["b.txt", "a.txt", "a.txt", "dir/c.txt"]);
        assert_eq!(a.source_paths(), &["a.txt", "b.txt", "dir\\c.txt"]);
        // construction is a pure function of the path set
        let b = FileTree::from_paths(&["dir\\c.txt", "a.txt", "b.txt"]);
        assert_eq!(a.source_paths(), b.source_paths());
    }

    #[test]
    fn test_forward_slash_input() {
        let t = FileTree::from_paths(&["bin/x64/plugins/cyber_engine_tweaks/mods/M/init.lua"]);
        assert!(t.dir_in_tree("bin\\x64\\plugins\\cyber_engine_tweaks\\mods\\M"));
    }
}
