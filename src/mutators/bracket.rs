use crate::adapter;
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

const OPENERS: [char; 3] = ['(', '[', '{'];

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// A matched bracket pair on a single line. Positions are byte offsets
/// within the line; brackets are ASCII so single-byte arithmetic is safe.
#[derive(Debug, Clone, Copy)]
pub struct BracketSite {
    pub line: usize,
    pub open_pos: usize,
    pub close_pos: usize,
    pub open_char: char,
}

/// Lexical mutator: breaks matched `()[]{}` pairs. Output is expected to
/// stop parsing for every subtype except the rare benign `BReplace`.
#[derive(Debug, Default)]
pub struct BracketMutator {
    pub state: MutatorState,
}

impl BracketMutator {
    pub const MUTATE_TYPES: &'static [&'static str] =
        &["BDelete_start", "BDelete_end", "BAdd_extra", "BReplace"];

    pub fn new() -> Self {
        Self::default()
    }

    /// Stack scan per line; pairs never span lines.
    pub fn collect(code: &str) -> Vec<BracketSite> {
        let mut sites = Vec::new();
        for (line_idx, line) in adapter::lines(code).iter().enumerate() {
            let mut stack: Vec<(char, usize)> = Vec::new();
            for (pos, ch) in line.char_indices() {
                if OPENERS.contains(&ch) {
                    stack.push((ch, pos));
                } else if ch == ')' || ch == ']' || ch == '}' {
                    if let Some(&(open, open_pos)) = stack.last() {
                        if closer_for(open) == ch {
                            stack.pop();
                            sites.push(BracketSite {
                                line: line_idx,
                                open_pos,
                                close_pos: pos,
                                open_char: open,
                            });
                        }
                    }
                }
            }
        }
        sites
    }

    /// `extra` is the opener used by `BAdd_extra` and `BReplace`; the other
    /// subtypes ignore it.
    pub fn apply(
        &mut self,
        code: &str,
        site: &BracketSite,
        mutate_type: &str,
        extra: char,
    ) -> Result<Applied, MutateError> {
        let mut lines: Vec<String> = adapter::lines(code).iter().map(|s| s.to_string()).collect();
        let original_line = lines[site.line].clone();

        let desc = match mutate_type {
            "BDelete_start" => {
                lines[site.line].remove(site.open_pos);
                format!("Deleted opening bracket at line {}", site.line + 1)
            }
            "BDelete_end" => {
                lines[site.line].remove(site.close_pos);
                format!("Deleted closing bracket at line {}", site.line + 1)
            }
            "BAdd_extra" => {
                lines[site.line].insert(site.open_pos, extra);
                format!("Added extra opening {} at line {}", extra, site.line + 1)
            }
            "BReplace" => {
                let close = closer_for(extra);
                lines[site.line]
                    .replace_range(site.close_pos..site.close_pos + 1, &close.to_string());
                lines[site.line]
                    .replace_range(site.open_pos..site.open_pos + 1, &extra.to_string());
                format!("Replaced brackets with {}{} at line {}", extra, close, site.line + 1)
            }
            other => {
                return Err(MutateError::new(format!("unknown bracket mutate type: {other}")));
            }
        };

        let record = MutationRecord::new(
            "BracketMutator",
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
        // BReplace must swap to a DIFFERENT pair type; BAdd_extra may insert
        // any (possibly mismatched) opener.
        let extra = if mutate_type == "BReplace" {
            let others: Vec<char> =
                OPENERS.iter().filter(|c| **c != site.open_char).copied().collect();
            others[rng.usize(..others.len())]
        } else {
            OPENERS[rng.usize(..OPENERS.len())]
        };
        Ok(Outcome::Applied(self.apply(code, &site, mutate_type, extra)?))
    }
}
