use crate::adapter::{self, Edit};
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

const FLOW_KEYWORDS: [&str; 3] = ["break", "continue", "pass"];

/// A `break`/`continue`/`pass` statement.
#[derive(Debug, Clone)]
pub struct FlowSite {
    pub start_byte: usize,
    pub end_byte: usize,
    pub line: usize,
    pub keyword: &'static str,
}

/// Structural mutator: swaps one control-flow keyword for a different member
/// of the break/continue/pass triple.
#[derive(Debug, Default)]
pub struct ControlFlowMutator {
    pub state: MutatorState,
}

impl ControlFlowMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["FlowKeywordSwap"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(code: &str) -> Vec<FlowSite> {
        let Some(tree) = adapter::parse(code) else {
            return Vec::new();
        };
        let mut sites = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            let keyword = match node.kind() {
                "break_statement" => "break",
                "continue_statement" => "continue",
                "pass_statement" => "pass",
                _ => return,
            };
            sites.push(FlowSite {
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
                line: node.start_position().row,
                keyword,
            });
        });
        sites
    }

    pub fn apply(
        &mut self,
        code: &str,
        site: &FlowSite,
        new_keyword: &str,
    ) -> Result<Applied, MutateError> {
        if !FLOW_KEYWORDS.contains(&new_keyword) || new_keyword == site.keyword {
            return Err(MutateError::new(format!(
                "cannot swap {} for {}",
                site.keyword, new_keyword
            )));
        }
        let mutated =
            adapter::render(code, &[Edit::new(site.start_byte, site.end_byte, new_keyword)]);

        let record = MutationRecord::new(
            "ControlFlowMutator",
            "FlowKeywordSwap",
            site.line + 1,
            site.keyword,
            new_keyword,
            format!("Changed {} to {}", site.keyword, new_keyword),
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
        let others: Vec<&str> =
            FLOW_KEYWORDS.iter().filter(|k| **k != site.keyword).copied().collect();
        let new_keyword = others[rng.usize(..others.len())];
        Ok(Outcome::Applied(self.apply(code, &site, new_keyword)?))
    }
}
