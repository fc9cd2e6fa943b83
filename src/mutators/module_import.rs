use crate::adapter::{self, Edit};
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

/// Plausible stand-ins per importable root module.
const MODULE_REPLACEMENTS: &[(&str, &[&str])] = &[
    ("os", &["sys", "pathlib", "shutil"]),
    ("sys", &["os", "platform", "argparse"]),
    ("math", &["numpy", "cmath", "statistics"]),
    ("random", &["numpy.random", "secrets"]),
    ("datetime", &["time", "calendar", "arrow"]),
    ("json", &["pickle", "yaml", "xml"]),
    ("re", &["fnmatch", "string", "regex"]),
    ("collections", &["itertools", "heapq", "bisect"]),
    ("subprocess", &["os", "multiprocessing", "asyncio"]),
    ("logging", &["loguru", "structlog", "syslog"]),
];

pub fn replacements_for(root: &str) -> Option<&'static [&'static str]> {
    MODULE_REPLACEMENTS
        .iter()
        .find(|(from, _)| *from == root)
        .map(|(_, to)| *to)
}

/// One import of a table-listed module.
#[derive(Debug, Clone)]
pub struct ImportSite {
    pub stmt_start: usize,
    pub stmt_end: usize,
    /// Byte offset of the statement's line start, for whole-line removal.
    pub line_start: usize,
    pub line: usize,
    /// Root module name (first dotted segment).
    pub root: String,
    /// Dotted module path as written.
    pub full_module: String,
    pub module_start: usize,
    pub module_end: usize,
    /// Name the import binds in scope; `None` for from-imports, which bind
    /// members rather than the module.
    pub alias: Option<String>,
    pub is_from: bool,
    /// Imported member names of a from-import, for record reconstruction.
    pub names: Vec<String>,
    /// `as` name of a plain import, if any.
    pub asname: Option<String>,
}

/// Structural mutator: swaps an imported module for a related one (renaming
/// the bound alias's usage sites along with it) or removes the import
/// statement entirely.
#[derive(Debug, Default)]
pub struct ModuleMutator {
    pub state: MutatorState,
}

impl ModuleMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["ModuleReplace", "ModuleRemove"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(code: &str) -> Vec<ImportSite> {
        let Some(tree) = adapter::parse(code) else {
            return Vec::new();
        };
        let mut sites = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            match node.kind() {
                "import_statement" => {
                    let count = node.named_child_count();
                    for i in 0..count {
                        let Some(child) = node.named_child(i) else { continue };
                        let (module_node, asname) = match child.kind() {
                            "dotted_name" => (child, None),
                            "aliased_import" => {
                                let Some(name) = child.child_by_field_name("name") else {
                                    continue;
                                };
                                let alias = child
                                    .child_by_field_name("alias")
                                    .map(|a| adapter::node_text(a, code).to_string());
                                (name, alias)
                            }
                            _ => continue,
                        };
                        let full = adapter::node_text(module_node, code).to_string();
                        let root = full.split('.').next().unwrap_or(&full).to_string();
                        if replacements_for(&root).is_none() {
                            continue;
                        }
                        let alias = Some(asname.clone().unwrap_or_else(|| root.clone()));
                        sites.push(ImportSite {
                            stmt_start: node.start_byte(),
                            stmt_end: node.end_byte(),
                            line_start: node.start_byte() - node.start_position().column,
                            line: node.start_position().row,
                            root,
                            full_module: full,
                            module_start: module_node.start_byte(),
                            module_end: module_node.end_byte(),
                            alias,
                            is_from: false,
                            names: Vec::new(),
                            asname,
                        });
                    }
                }
                "import_from_statement" => {
                    let Some(module_node) = node.child_by_field_name("module_name") else {
                        return;
                    };
                    if module_node.kind() != "dotted_name" {
                        return;
                    }
                    let full = adapter::node_text(module_node, code).to_string();
                    let root = full.split('.').next().unwrap_or(&full).to_string();
                    if replacements_for(&root).is_none() {
                        return;
                    }
                    let mut cursor = node.walk();
                    let names: Vec<String> = node
                        .children_by_field_name("name", &mut cursor)
                        .map(|n| adapter::node_text(n, code).to_string())
                        .collect();
                    sites.push(ImportSite {
                        stmt_start: node.start_byte(),
                        stmt_end: node.end_byte(),
                        line_start: node.start_byte() - node.start_position().column,
                        line: node.start_position().row,
                        root,
                        full_module: full,
                        module_start: module_node.start_byte(),
                        module_end: module_node.end_byte(),
                        alias: None,
                        is_from: true,
                        names,
                        asname: None,
                    });
                }
                _ => {}
            }
        });
        sites
    }

    pub fn apply_replace(
        &mut self,
        code: &str,
        site: &ImportSite,
        new_module: &str,
    ) -> Result<Applied, MutateError> {
        let new_base = new_module.split('.').next().unwrap_or(new_module);
        let mut edits = Vec::new();

        let (original_stmt, mutated_stmt) = if site.is_from {
            // Only the module token changes; from-imports bind members, not
            // the module itself.
            let new_path = site.full_module.replacen(&site.root, new_base, 1);
            edits.push(Edit::new(site.module_start, site.module_end, new_path.clone()));
            (
                format!("from {} import {}", site.full_module, site.names.join(", ")),
                format!("from {} import {}", new_path, site.names.join(", ")),
            )
        } else {
            let new_path = site.full_module.replacen(&site.root, new_module, 1);
            edits.push(Edit::new(site.module_start, site.module_end, new_path.clone()));
            let suffix = site.asname.as_ref().map(|a| format!(" as {a}")).unwrap_or_default();
            (
                format!("import {}{}", site.full_module, suffix),
                format!("import {}{}", new_path, suffix),
            )
        };

        if let Some(alias) = &site.alias {
            edits.extend(collect_alias_usages(code, alias, site).into_iter().map(
                |(start, end)| Edit::new(start, end, new_base),
            ));
        }

        let mutated = adapter::render(code, &edits);
        let record = MutationRecord::new(
            "ModuleMutator",
            "ModuleReplace",
            site.line + 1,
            original_stmt,
            mutated_stmt,
            format!("Replaced module {} with {}", site.root, new_module),
        );
        self.state.store(record.clone());
        Ok(Applied { code: mutated, record })
    }

    pub fn apply_remove(&mut self, code: &str, site: &ImportSite) -> Result<Applied, MutateError> {
        let original_stmt = code[site.stmt_start..site.stmt_end].to_string();
        // Drop the whole line including its newline.
        let line_end = code[site.stmt_end..]
            .find('\n')
            .map(|i| site.stmt_end + i + 1)
            .unwrap_or(code.len());
        let mutated = adapter::render(code, &[Edit::new(site.line_start, line_end, "")]);

        let record = MutationRecord::new(
            "ModuleMutator",
            "ModuleRemove",
            site.line + 1,
            original_stmt,
            "",
            format!("Removed import of {}", site.root),
        );
        self.state.store(record.clone());
        Ok(Applied { code: mutated, record })
    }

    pub fn mutate(&mut self, code: &str, rng: &mut fastrand::Rng) -> MutateResult {
        let sites = Self::collect(code);
        if sites.is_empty() {
            return Ok(Outcome::NoSite);
        }
        let site = sites[rng.usize(..sites.len())].clone();
        let mutate_type = Self::MUTATE_TYPES[rng.usize(..Self::MUTATE_TYPES.len())];
        let applied = match mutate_type {
            "ModuleReplace" => {
                let candidates = replacements_for(&site.root)
                    .ok_or_else(|| MutateError::new(format!("no replacements for {}", site.root)))?;
                let new_module = candidates[rng.usize(..candidates.len())];
                self.apply_replace(code, &site, new_module)?
            }
            _ => self.apply_remove(code, &site)?,
        };
        Ok(Outcome::Applied(applied))
    }
}

/// Identifier occurrences of the import's bound alias outside the import
/// statement itself, skipping attribute and keyword-argument name positions.
fn collect_alias_usages(code: &str, alias: &str, site: &ImportSite) -> Vec<(usize, usize)> {
    let Some(tree) = adapter::parse(code) else {
        return Vec::new();
    };
    let mut usages = Vec::new();
    adapter::walk(tree.root_node(), &mut |node| {
        if node.kind() != "identifier" {
            return;
        }
        if node.start_byte() >= site.stmt_start && node.end_byte() <= site.stmt_end {
            return;
        }
        if adapter::node_text(node, code) != alias {
            return;
        }
        if let Some(parent) = node.parent() {
            if parent.kind() == "attribute" {
                if let Some(attr) = parent.child_by_field_name("attribute") {
                    if attr.id() == node.id() {
                        return;
                    }
                }
            }
            if parent.kind() == "keyword_argument" {
                if let Some(name) = parent.child_by_field_name("name") {
                    if name.id() == node.id() {
                        return;
                    }
                }
            }
        }
        usages.push((node.start_byte(), node.end_byte()));
    });
    usages
}
