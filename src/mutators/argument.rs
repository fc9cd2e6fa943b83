use crate::adapter::{self, Edit};
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

/// One removable argument. The surviving argument spans are captured so the
/// rewrite can re-render the list without reparsing.
#[derive(Debug, Clone)]
pub struct ArgSite {
    pub call_start: usize,
    pub call_end: usize,
    pub list_start: usize,
    pub list_end: usize,
    pub line: usize,
    /// Spans of every argument in source order.
    pub arg_spans: Vec<(usize, usize)>,
    /// Index into `arg_spans` of the argument this site removes.
    pub remove_idx: usize,
    pub is_keyword: bool,
}

/// Structural mutator: drops one positional or keyword argument from a call.
#[derive(Debug, Default)]
pub struct ArgMutator {
    pub state: MutatorState,
}

impl ArgMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["RemoveArg", "RemoveKwarg"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(code: &str) -> Vec<ArgSite> {
        let Some(tree) = adapter::parse(code) else {
            return Vec::new();
        };
        let mut sites = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            if node.kind() != "call" {
                return;
            }
            let Some(arg_list) = node.child_by_field_name("arguments") else {
                return;
            };
            if arg_list.kind() != "argument_list" {
                return;
            }
            let mut spans = Vec::new();
            let mut keyword_flags = Vec::new();
            let count = arg_list.named_child_count();
            for i in 0..count {
                if let Some(arg) = arg_list.named_child(i) {
                    if arg.kind() == "comment" {
                        continue;
                    }
                    spans.push((arg.start_byte(), arg.end_byte()));
                    keyword_flags.push(arg.kind() == "keyword_argument");
                }
            }
            for (i, is_keyword) in keyword_flags.iter().enumerate() {
                sites.push(ArgSite {
                    call_start: node.start_byte(),
                    call_end: node.end_byte(),
                    list_start: arg_list.start_byte(),
                    list_end: arg_list.end_byte(),
                    line: node.start_position().row,
                    arg_spans: spans.clone(),
                    remove_idx: i,
                    is_keyword: *is_keyword,
                });
            }
        });
        sites
    }

    pub fn apply(&mut self, code: &str, site: &ArgSite) -> Result<Applied, MutateError> {
        let removed = site
            .arg_spans
            .get(site.remove_idx)
            .map(|(s, e)| code[*s..*e].to_string())
            .ok_or_else(|| MutateError::new("argument index out of range"))?;

        let surviving: Vec<&str> = site
            .arg_spans
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != site.remove_idx)
            .map(|(_, (s, e))| &code[*s..*e])
            .collect();
        let new_list = format!("({})", surviving.join(", "));

        let original_call = code[site.call_start..site.call_end].to_string();
        let mutated_call = format!(
            "{}{}",
            &code[site.call_start..site.list_start],
            new_list,
        );
        let mutated =
            adapter::render(code, &[Edit::new(site.list_start, site.list_end, new_list)]);

        let (mutate_type, what) =
            if site.is_keyword { ("RemoveKwarg", "kwarg") } else { ("RemoveArg", "arg") };
        let record = MutationRecord::new(
            "ArgMutator",
            mutate_type,
            site.line + 1,
            original_call,
            mutated_call,
            format!("Removed {}: {}", what, removed),
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
        Ok(Outcome::Applied(self.apply(code, &site)?))
    }
}
