use crate::adapter;
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

/// Lexical mutator: shifts the first indented line by four columns either
/// way, which reliably trips the indentation-sensitive grammar.
#[derive(Debug, Default)]
pub struct IndentMutator {
    pub state: MutatorState,
}

impl IndentMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["IAdd_space", "IRemove_space"];

    pub fn new() -> Self {
        Self::default()
    }

    /// At most one site: the first non-blank line that starts with
    /// whitespace.
    pub fn collect(code: &str) -> Vec<usize> {
        for (i, line) in adapter::lines(code).iter().enumerate() {
            if !line.trim().is_empty() && line.starts_with([' ', '\t']) {
                return vec![i];
            }
        }
        Vec::new()
    }

    pub fn apply(
        &mut self,
        code: &str,
        line_idx: usize,
        mutate_type: &str,
    ) -> Result<Applied, MutateError> {
        let mut lines: Vec<String> = adapter::lines(code).iter().map(|s| s.to_string()).collect();
        let original_line = lines[line_idx].clone();
        let stripped = original_line.trim_start();
        let indent = original_line.chars().count() - stripped.chars().count();

        let (new_indent, desc) = match mutate_type {
            "IAdd_space" => (indent + 4, format!("Added 4 spaces at line {}", line_idx + 1)),
            "IRemove_space" => {
                (indent.saturating_sub(4), format!("Removed 4 spaces at line {}", line_idx + 1))
            }
            other => {
                return Err(MutateError::new(format!("unknown indent mutate type: {other}")));
            }
        };
        lines[line_idx] = format!("{}{}", " ".repeat(new_indent), stripped);

        let record = MutationRecord::new(
            "IndentMutator",
            mutate_type,
            line_idx + 1,
            original_line,
            lines[line_idx].clone(),
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
        let mutate_type = Self::MUTATE_TYPES[rng.usize(..Self::MUTATE_TYPES.len())];
        Ok(Outcome::Applied(self.apply(code, sites[0], mutate_type)?))
    }
}
