use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance entry for one applied mutation. Built once per successful step
/// and never edited afterwards; the snippets are the text of the affected
/// region at the moment the rewrite happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub mutator_type: String,
    pub mutate_type: String,
    pub line_num: usize,
    pub original_code: String,
    pub mutated_code: String,
    pub description: String,
}

impl MutationRecord {
    pub fn new(
        mutator_type: &str,
        mutate_type: &str,
        line_num: usize,
        original_code: impl Into<String>,
        mutated_code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        MutationRecord {
            mutator_type: mutator_type.to_string(),
            mutate_type: mutate_type.to_string(),
            line_num,
            original_code: original_code.into(),
            mutated_code: mutated_code.into(),
            description: description.into(),
        }
    }
}

/// The stringified form persisted in `*_info_*.json`. Downstream dataset
/// loaders parse this template verbatim; do not reword it.
impl fmt::Display for MutationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mutator: {}\nMutate type: {}\nLine: {}\nOriginal: {}\nMutated: {}\nDescription: {}",
            self.mutator_type,
            self.mutate_type,
            self.line_num,
            self.original_code,
            self.mutated_code,
            self.description,
        )
    }
}
