use crate::adapter;
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

/// A block-introducing header whose line carries a colon after the
/// construct's starting column.
#[derive(Debug, Clone, Copy)]
pub struct ColonSite {
    pub line: usize,
    pub colon_pos: usize,
}

/// Lexical mutator: removes the colon from a `def`/`if`/`for` header or
/// swaps it for a semicolon. Discovery walks the tree to find headers, the
/// rewrite happens on raw line text.
#[derive(Debug, Default)]
pub struct ColonMutator {
    pub state: MutatorState,
}

impl ColonMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["CRemove", "CReplace"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(code: &str) -> Vec<ColonSite> {
        let Some(tree) = adapter::parse(code) else {
            return Vec::new();
        };
        let lines = adapter::lines(code);
        let mut sites = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            if matches!(node.kind(), "function_definition" | "if_statement" | "for_statement") {
                let row = node.start_position().row;
                let col = node.start_position().column;
                if let Some(line) = lines.get(row) {
                    if col <= line.len() {
                        if let Some(offset) = line[col..].find(':') {
                            sites.push(ColonSite { line: row, colon_pos: col + offset });
                        }
                    }
                }
            }
        });
        sites
    }

    pub fn apply(
        &mut self,
        code: &str,
        site: &ColonSite,
        mutate_type: &str,
    ) -> Result<Applied, MutateError> {
        let mut lines: Vec<String> = adapter::lines(code).iter().map(|s| s.to_string()).collect();
        let original_line = lines[site.line].clone();

        let desc = match mutate_type {
            "CRemove" => {
                lines[site.line].remove(site.colon_pos);
                format!("Removed colon at line {}", site.line + 1)
            }
            "CReplace" => {
                lines[site.line].replace_range(site.colon_pos..site.colon_pos + 1, ";");
                format!("Replaced colon with semicolon at line {}", site.line + 1)
            }
            other => {
                return Err(MutateError::new(format!("unknown colon mutate type: {other}")));
            }
        };

        let record = MutationRecord::new(
            "ColonMutator",
            mutate_type,
            site.line + 1,
            original_line,
            lines[site.line].clone(),
            desc,
        );
        self.state.store(record.clone());
        Ok(Applied { code: lines.join("\n"), record })
    }

    pub fn mutate(&mut self, code: &str, rng: &mut fastrand::Rng) -> MutateResult {
        let sites = Self::collect(code);
        if sites.is_empty() {
            return Ok(Outcome::NoSite);
        }
        let site = sites[rng.usize(..sites.len())];
        let mutate_type = Self::MUTATE_TYPES[rng.usize(..Self::MUTATE_TYPES.len())];
        Ok(Outcome::Applied(self.apply(code, &site, mutate_type)?))
    }
}
