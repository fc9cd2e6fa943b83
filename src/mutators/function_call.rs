use crate::adapter::{self, Edit};
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

/// Near-miss callee swaps: each entry maps a builtin to plausible stand-ins.
const FUNCTION_REPLACEMENTS: &[(&str, &[&str])] = &[
    ("min", &["max", "sum", "abs"]),
    ("max", &["min", "abs", "sum"]),
    ("len", &["sum"]),
    ("sorted", &["reversed"]),
    ("abs", &["round"]),
];

pub fn replacements_for(name: &str) -> Option<&'static [&'static str]> {
    FUNCTION_REPLACEMENTS
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
}

/// One call site whose callee identifier is in the replacement table.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub name: String,
    pub name_start: usize,
    pub name_end: usize,
    pub line: usize,
}

/// Structural mutator: renames one table-listed call site to a related
/// builtin, e.g. `min(...)` becomes `max(...)`.
#[derive(Debug, Default)]
pub struct FunctionMutator {
    pub state: MutatorState,
}

impl FunctionMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["FunctionReplace"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(code: &str) -> Vec<CallSite> {
        let Some(tree) = adapter::parse(code) else {
            return Vec::new();
        };
        let mut sites = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            if node.kind() != "call" {
                return;
            }
            let Some(func) = node.child_by_field_name("function") else {
                return;
            };
            if func.kind() != "identifier" {
                return;
            }
            let name = adapter::node_text(func, code);
            if replacements_for(name).is_some() {
                sites.push(CallSite {
                    name: name.to_string(),
                    name_start: func.start_byte(),
                    name_end: func.end_byte(),
                    line: node.start_position().row,
                });
            }
        });
        sites
    }

    pub fn apply(
        &mut self,
        code: &str,
        site: &CallSite,
        new_name: &str,
    ) -> Result<Applied, MutateError> {
        let edit = Edit::new(site.name_start, site.name_end, new_name);
        let mutated = adapter::render(code, &[edit]);

        let record = MutationRecord::new(
            "FunctionMutator",
            "FunctionReplace",
            site.line + 1,
            format!("{}(...)", site.name),
            format!("{}(...)", new_name),
            format!("Replaced function call {}() with {}()", site.name, new_name),
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
        let candidates = replacements_for(&site.name)
            .ok_or_else(|| MutateError::new(format!("no replacements for {}", site.name)))?;
        let new_name = candidates[rng.usize(..candidates.len())];
        Ok(Outcome::Applied(self.apply(code, &site, new_name)?))
    }
}
