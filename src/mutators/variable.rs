use crate::adapter::{self, Edit};
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;
use crate::sampling;
use crate::validator;

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const PYTHON_BUILTINS: &[&str] = &[
    "abs", "all", "any", "ascii", "bin", "bool", "bytearray", "bytes", "callable", "chr",
    "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod", "enumerate",
    "eval", "exec", "filter", "float", "format", "frozenset", "getattr", "globals", "hasattr",
    "hash", "help", "hex", "id", "input", "int", "isinstance", "issubclass", "iter", "len",
    "list", "locals", "map", "max", "memoryview", "min", "next", "object", "oct", "open",
    "ord", "pow", "print", "property", "range", "repr", "reversed", "round", "set", "setattr",
    "slice", "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars", "zip",
    "ArithmeticError", "AttributeError", "BaseException", "Exception", "IndexError",
    "IOError", "KeyError", "KeyboardInterrupt", "NotImplementedError", "OSError",
    "RuntimeError", "StopIteration", "TypeError", "ValueError", "ZeroDivisionError",
];

const RENEW_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// One load/store occurrence of a renameable variable.
#[derive(Debug, Clone)]
pub struct VarSite {
    pub name: String,
    pub start_byte: usize,
    pub end_byte: usize,
    pub line: usize,
}

/// Structural mutator: renames one variable occurrence, either to a freshly
/// suffixed name or to another variable picked by string similarity (closer
/// names are likelier stand-ins, which makes convincing typo bugs).
#[derive(Debug, Default)]
pub struct VariableNameMutator {
    pub state: MutatorState,
}

impl VariableNameMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["VRenew", "VReplace"];
    /// VRenew is rare; most mutations substitute an existing name.
    pub const TYPE_RATES: [f64; 2] = [0.1, 0.9];

    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the occurrence sites plus the distinct variable names seen,
    /// in first-occurrence order.
    pub fn collect(code: &str) -> (Vec<VarSite>, Vec<String>) {
        let Some(tree) = adapter::parse(code) else {
            return (Vec::new(), Vec::new());
        };

        // First pass: names that are never variables here.
        let mut defined = Vec::new();
        let mut import_ranges = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| match node.kind() {
            "function_definition" | "class_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    defined.push(adapter::node_text(name, code).to_string());
                }
            }
            "import_statement" | "import_from_statement" => {
                import_ranges.push((node.start_byte(), node.end_byte()));
            }
            _ => {}
        });
        let mut imported = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            if node.kind() == "identifier"
                && import_ranges
                    .iter()
                    .any(|(s, e)| node.start_byte() >= *s && node.end_byte() <= *e)
            {
                imported.push(adapter::node_text(node, code).to_string());
            }
        });

        let excluded = |name: &str| {
            PYTHON_KEYWORDS.contains(&name)
                || PYTHON_BUILTINS.contains(&name)
                || defined.iter().any(|d| d == name)
                || imported.iter().any(|i| i == name)
        };

        let mut sites = Vec::new();
        let mut names: Vec<String> = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            if node.kind() != "identifier" {
                return;
            }
            if import_ranges
                .iter()
                .any(|(s, e)| node.start_byte() >= *s && node.end_byte() <= *e)
            {
                return;
            }
            if is_non_variable_position(node) {
                return;
            }
            let name = adapter::node_text(node, code);
            if excluded(name) {
                return;
            }
            sites.push(VarSite {
                name: name.to_string(),
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
                line: node.start_position().row,
            });
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        });
        (sites, names)
    }

    pub fn apply(
        &mut self,
        code: &str,
        site: &VarSite,
        mutate_type: &str,
        new_name: &str,
    ) -> Result<Applied, MutateError> {
        if !Self::MUTATE_TYPES.contains(&mutate_type) {
            return Err(MutateError::new(format!("unknown variable mutate type: {mutate_type}")));
        }
        let mutated =
            adapter::render(code, &[Edit::new(site.start_byte, site.end_byte, new_name)]);

        let record = MutationRecord::new(
            "VariableNameMutator",
            mutate_type,
            site.line + 1,
            site.name.clone(),
            new_name,
            format!("Renamed '{}' to '{}'", site.name, new_name),
        );
        self.state.store(record.clone());
        Ok(Applied { code: mutated, record })
    }

    pub fn mutate(&mut self, code: &str, rng: &mut fastrand::Rng) -> MutateResult {
        let (sites, names) = Self::collect(code);
        if sites.is_empty() {
            return Ok(Outcome::NoSite);
        }
        let site = sites[rng.usize(..sites.len())].clone();
        let type_idx = sampling::weighted_index(rng, &Self::TYPE_RATES).unwrap_or(1);
        let mutate_type = Self::MUTATE_TYPES[type_idx];

        let new_name = match mutate_type {
            "VRenew" => renew_name(&site.name, rng),
            _ => {
                let candidates: Vec<&String> =
                    names.iter().filter(|n| **n != site.name).collect();
                weighted_replacement(&site.name, &candidates, rng)
            }
        };
        Ok(Outcome::Applied(self.apply(code, &site, mutate_type, &new_name)?))
    }
}

/// Append one random alphanumeric character.
pub fn renew_name(old: &str, rng: &mut fastrand::Rng) -> String {
    let ch = RENEW_CHARS[rng.usize(..RENEW_CHARS.len())] as char;
    format!("{old}{ch}")
}

/// Pick a replacement weighted by character-level similarity to the old
/// name; falls back to a fresh suffix when there is nothing to pick from.
pub fn weighted_replacement(
    old: &str,
    candidates: &[&String],
    rng: &mut fastrand::Rng,
) -> String {
    if candidates.is_empty() {
        return renew_name(old, rng);
    }
    let weights: Vec<f64> =
        candidates.iter().map(|c| validator::similarity(old, c.as_str())).collect();
    match sampling::weighted_index(rng, &weights) {
        Some(i) => candidates[i].clone(),
        None => renew_name(old, rng),
    }
}

/// Positions where an identifier is not a load/store of a variable: a
/// definition name, an attribute name, a keyword-argument name, or a
/// parameter declaration.
fn is_non_variable_position(node: tree_sitter::Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    let is_field = |field: &str| {
        parent
            .child_by_field_name(field)
            .map(|n| n.id() == node.id())
            .unwrap_or(false)
    };
    match parent.kind() {
        "function_definition" | "class_definition" => is_field("name"),
        "attribute" => is_field("attribute"),
        "keyword_argument" => is_field("name"),
        "parameters" | "lambda_parameters" => true,
        "default_parameter" | "typed_default_parameter" => is_field("name"),
        "typed_parameter" => parent
            .named_child(0)
            .map(|n| n.id() == node.id())
            .unwrap_or(false),
        _ => false,
    }
}
