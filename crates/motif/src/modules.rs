//! Module cache for the `import` system.
//!
//! A dotted module name `a.b.c` resolves to the file `a/b/c.lang` under the
//! cache's root directory (the current working directory by default). The
//! cache is keyed by resolved path. A slot is marked in-progress before a
//! module body runs so that a cyclic import short-circuits instead of
//! recursing; the evaluator reports the cycle and substitutes null.

use std::path::PathBuf;

use ahash::AHashMap;

use crate::value::Value;

/// One cache slot.
#[derive(Debug, Clone)]
pub(crate) enum CacheEntry {
    /// The module's body is currently evaluating (cycle sentinel).
    Loading,
    /// The finished module value.
    Loaded(Value),
}

/// Path-keyed cache of loaded modules.
#[derive(Debug)]
pub struct ModuleCache {
    root: PathBuf,
    entries: AHashMap<String, CacheEntry>,
}

impl ModuleCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("."),
            entries: AHashMap::new(),
        }
    }

    /// Changes the directory dotted module names resolve against.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
    }

    /// Maps a dotted module name to its file path.
    #[must_use]
    pub fn resolve(&self, dotted: &str) -> String {
        let relative: PathBuf = dotted.split('.').collect();
        let mut path = self.root.join(relative);
        path.set_extension("lang");
        path.to_string_lossy().into_owned()
    }

    pub(crate) fn get(&self, path: &str) -> Option<CacheEntry> {
        self.entries.get(path).cloned()
    }

    pub(crate) fn mark_loading(&mut self, path: &str) {
        self.entries.insert(path.to_owned(), CacheEntry::Loading);
    }

    pub(crate) fn finish(&mut self, path: &str, module: Value) {
        self.entries.insert(path.to_owned(), CacheEntry::Loaded(module));
    }

    /// Drops the in-progress sentinel after a failed load so a later import
    /// retries.
    pub(crate) fn abandon(&mut self, path: &str) {
        self.entries.remove(path);
    }
}

impl Default for ModuleCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A module's name: its file basename with any `.lang` extension stripped.
pub(crate) fn module_name(path: &str) -> String {
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    base.strip_suffix(".lang").unwrap_or(base).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_names_resolve_to_lang_paths() {
        let cache = ModuleCache::new();
        let path = cache.resolve("a.b.c");
        assert!(path.ends_with("c.lang"), "got {path}");
        assert!(path.contains('a') && path.contains('b'));
    }

    #[test]
    fn module_names_strip_extension() {
        assert_eq!(module_name("lib/util.lang"), "util");
        assert_eq!(module_name("plain"), "plain");
    }
}
