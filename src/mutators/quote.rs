use crate::adapter;
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

/// The first line carrying a quote character.
#[derive(Debug, Clone, Copy)]
pub struct QuoteSite {
    pub line: usize,
    /// Byte offset of the earliest quote character on the line.
    pub quote_pos: usize,
    /// Whether the line has any single quotes; gates `QSingle_to_double`.
    pub has_single: bool,
}

/// Lexical mutator: flips quote style on a line or deletes a quote to leave
/// a string unterminated.
#[derive(Debug, Default)]
pub struct QuoteMutator {
    pub state: MutatorState,
}

impl QuoteMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["QSingle_to_double", "QUnterminated"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(code: &str) -> Vec<QuoteSite> {
        for (i, line) in adapter::lines(code).iter().enumerate() {
            let double = line.find('"');
            let single = line.find('\'');
            let quote_pos = match (double, single) {
                (Some(d), Some(s)) => Some(d.min(s)),
                (Some(d), None) => Some(d),
                (None, Some(s)) => Some(s),
                (None, None) => None,
            };
            if let Some(pos) = quote_pos {
                return vec![QuoteSite { line: i, quote_pos: pos, has_single: single.is_some() }];
            }
        }
        Vec::new()
    }

    pub fn apply(
        &mut self,
        code: &str,
        site: &QuoteSite,
        mutate_type: &str,
    ) -> Result<Applied, MutateError> {
        let mut lines: Vec<String> = adapter::lines(code).iter().map(|s| s.to_string()).collect();
        let original_line = lines[site.line].clone();

        let desc = match mutate_type {
            "QSingle_to_double" => {
                lines[site.line] = original_line.replace('\'', "\"");
                format!("Changed single to double quotes at line {}", site.line + 1)
            }
            "QUnterminated" => {
                lines[site.line].remove(site.quote_pos);
                format!("Removed opening quote at line {}", site.line + 1)
            }
            other => {
                return Err(MutateError::new(format!("unknown quote mutate type: {other}")));
            }
        };

        let record = MutationRecord::new(
            "QuoteMutator",
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
        let site = sites[0];
        // Quote-style conversion only changes the text when the line has a
        // single quote to convert.
        let mutate_type = if site.has_single && rng.bool() {
            "QSingle_to_double"
        } else {
            "QUnterminated"
        };
        Ok(Outcome::Applied(self.apply(code, &site, mutate_type)?))
    }
}
