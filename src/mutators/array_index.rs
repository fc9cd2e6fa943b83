use crate::adapter::{self, Edit};
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexShape {
    IntLiteral,
    Name,
    Compound,
}

/// A subscript whose index is an integer, a bare name, or a binary
/// expression. Slices are not candidates.
#[derive(Debug, Clone, Copy)]
pub struct IndexSite {
    pub sub_start: usize,
    pub sub_end: usize,
    pub idx_start: usize,
    pub idx_end: usize,
    pub line: usize,
    pub shape: IndexShape,
}

/// Structural mutator: nudges a subscript index off by a small amount.
#[derive(Debug, Default)]
pub struct ArrayMutator {
    pub state: MutatorState,
}

impl ArrayMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["IndexIncrement", "IndexDecrement"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(code: &str) -> Vec<IndexSite> {
        let Some(tree) = adapter::parse(code) else {
            return Vec::new();
        };
        let mut sites = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            if node.kind() != "subscript" {
                return;
            }
            let Some(idx) = node.child_by_field_name("subscript") else {
                return;
            };
            let shape = match idx.kind() {
                "integer" => IndexShape::IntLiteral,
                "identifier" => IndexShape::Name,
                "binary_operator" => IndexShape::Compound,
                _ => return,
            };
            sites.push(IndexSite {
                sub_start: node.start_byte(),
                sub_end: node.end_byte(),
                idx_start: idx.start_byte(),
                idx_end: idx.end_byte(),
                line: node.start_position().row,
                shape,
            });
        });
        sites
    }

    /// `delta` only applies to integer-literal indices; name and compound
    /// indices gain a `± 1` term.
    pub fn apply(
        &mut self,
        code: &str,
        site: &IndexSite,
        mutate_type: &str,
        delta: i64,
    ) -> Result<Applied, MutateError> {
        let positive = match mutate_type {
            "IndexIncrement" => true,
            "IndexDecrement" => false,
            other => {
                return Err(MutateError::new(format!("unknown index mutate type: {other}")));
            }
        };

        let idx_text = &code[site.idx_start..site.idx_end];
        let replacement = match site.shape {
            IndexShape::IntLiteral => match idx_text.parse::<i64>() {
                Ok(v) => {
                    let shifted = if positive { v + delta } else { v - delta };
                    shifted.to_string()
                }
                Err(_) => shifted_expr(idx_text, positive),
            },
            IndexShape::Name | IndexShape::Compound => shifted_expr(idx_text, positive),
        };

        let original_sub = code[site.sub_start..site.sub_end].to_string();
        let rel = Edit::new(
            site.idx_start - site.sub_start,
            site.idx_end - site.sub_start,
            replacement.clone(),
        );
        let mutated_sub = adapter::render(&original_sub, &[rel]);
        let mutated =
            adapter::render(code, &[Edit::new(site.idx_start, site.idx_end, replacement.clone())]);

        let record = MutationRecord::new(
            "ArrayMutator",
            mutate_type,
            site.line + 1,
            original_sub,
            mutated_sub,
            format!("Array index mutated: {} -> {}", idx_text, replacement),
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
        let mutate_type = Self::MUTATE_TYPES[rng.usize(..Self::MUTATE_TYPES.len())];
        let delta = rng.i64(1..=3);
        Ok(Outcome::Applied(self.apply(code, &site, mutate_type, delta)?))
    }
}

fn shifted_expr(expr: &str, positive: bool) -> String {
    if positive {
        format!("{} + 1", expr)
    } else {
        format!("{} - 1", expr)
    }
}
