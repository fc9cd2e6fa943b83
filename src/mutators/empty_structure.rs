use crate::adapter::{self, Edit};
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    List,
    Dict,
    Set,
}

impl StructureKind {
    pub fn literal(&self) -> &'static str {
        match self {
            StructureKind::List => "[]",
            StructureKind::Dict => "{}",
            StructureKind::Set => "set()",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StructureKind::List => "List",
            StructureKind::Dict => "Dict",
            StructureKind::Set => "Set",
        }
    }

    pub fn alternatives(&self) -> [StructureKind; 2] {
        match self {
            StructureKind::List => [StructureKind::Dict, StructureKind::Set],
            StructureKind::Dict => [StructureKind::List, StructureKind::Set],
            StructureKind::Set => [StructureKind::List, StructureKind::Dict],
        }
    }
}

/// An assignment initializing an empty list, dict, or `set()`.
#[derive(Debug, Clone, Copy)]
pub struct EmptyInitSite {
    pub assign_start: usize,
    pub assign_end: usize,
    pub value_start: usize,
    pub value_end: usize,
    pub line: usize,
    pub kind: StructureKind,
}

/// Structural mutator: swaps the kind of an empty-structure initializer.
#[derive(Debug, Default)]
pub struct EmptyStructureMutator {
    pub state: MutatorState,
}

impl EmptyStructureMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["EmptyInitSwap"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(code: &str) -> Vec<EmptyInitSite> {
        let Some(tree) = adapter::parse(code) else {
            return Vec::new();
        };
        let mut sites = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            if node.kind() != "assignment" {
                return;
            }
            let Some(value) = node.child_by_field_name("right") else {
                return;
            };
            let kind = match value.kind() {
                "list" if value.named_child_count() == 0 => StructureKind::List,
                "dictionary" if value.named_child_count() == 0 => StructureKind::Dict,
                "call" => {
                    let is_empty_set = value
                        .child_by_field_name("function")
                        .map(|f| {
                            f.kind() == "identifier" && adapter::node_text(f, code) == "set"
                        })
                        .unwrap_or(false)
                        && value
                            .child_by_field_name("arguments")
                            .map(|a| a.named_child_count() == 0)
                            .unwrap_or(false);
                    if !is_empty_set {
                        return;
                    }
                    StructureKind::Set
                }
                _ => return,
            };
            sites.push(EmptyInitSite {
                assign_start: node.start_byte(),
                assign_end: node.end_byte(),
                value_start: value.start_byte(),
                value_end: value.end_byte(),
                line: node.start_position().row,
                kind,
            });
        });
        sites
    }

    pub fn apply(
        &mut self,
        code: &str,
        site: &EmptyInitSite,
        new_kind: StructureKind,
    ) -> Result<Applied, MutateError> {
        if new_kind == site.kind {
            return Err(MutateError::new("empty-structure swap needs a different kind"));
        }
        let original_assign = code[site.assign_start..site.assign_end].to_string();
        let rel = Edit::new(
            site.value_start - site.assign_start,
            site.value_end - site.assign_start,
            new_kind.literal(),
        );
        let mutated_assign = adapter::render(&original_assign, &[rel]);
        let mutated = adapter::render(
            code,
            &[Edit::new(site.value_start, site.value_end, new_kind.literal())],
        );

        let record = MutationRecord::new(
            "EmptyStructureMutator",
            "EmptyInitSwap",
            site.line + 1,
            original_assign,
            mutated_assign,
            format!("Changed {} to {}", site.kind.name(), new_kind.name()),
        );
        self.state.store(record.clone());
        Ok(Applied { code: mutated, record })
    }

    pub fn mutate(&mut self, code: &str, rng: &mut fastrand::Rng) -> MutateResult {
        let sites = Self::collect(code);
        if sites.is_empty() {
            return Ok(Outcome::NoSite);
        }
        let site = sites[rng.usize(..sites.len())];
        let options = site.kind.alternatives();
        let new_kind = options[rng.usize(..options.len())];
        Ok(Outcome::Applied(self.apply(code, &site, new_kind)?))
    }
}
