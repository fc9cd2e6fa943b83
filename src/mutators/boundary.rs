use crate::adapter::{self, Edit};
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

/// One argument of a `range(...)` call driving a for loop.
#[derive(Debug, Clone, Copy)]
pub struct RangeArg {
    pub start_byte: usize,
    pub end_byte: usize,
    pub is_int_literal: bool,
}

/// A `for ... in range(...)` loop header.
#[derive(Debug, Clone)]
pub struct RangeSite {
    pub call_start: usize,
    pub call_end: usize,
    pub line: usize,
    pub args: Vec<RangeArg>,
}

impl RangeSite {
    /// Subtypes valid for this call's arity. A single argument IS the stop,
    /// so only the stop subtypes apply to it.
    pub fn available_types(&self) -> &'static [&'static str] {
        match self.args.len() {
            0 => &[],
            1 => &["RangeStopInc", "RangeStopDec"],
            2 => &["RangeStopInc", "RangeStopDec", "RangeStartInc", "RangeStartDec"],
            _ => BoundaryMutator::MUTATE_TYPES,
        }
    }
}

/// Structural mutator: shifts a range-driven loop's start, stop or step by a
/// small delta, producing off-by-N iteration counts.
#[derive(Debug, Default)]
pub struct BoundaryMutator {
    pub state: MutatorState,
}

impl BoundaryMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &[
        "RangeStopInc",
        "RangeStopDec",
        "RangeStartInc",
        "RangeStartDec",
        "RangeStepInc",
        "RangeStepDec",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(code: &str) -> Vec<RangeSite> {
        let Some(tree) = adapter::parse(code) else {
            return Vec::new();
        };
        let mut sites = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            if node.kind() != "for_statement" {
                return;
            }
            let Some(iter) = node.child_by_field_name("right") else {
                return;
            };
            if iter.kind() != "call" {
                return;
            }
            let Some(func) = iter.child_by_field_name("function") else {
                return;
            };
            if func.kind() != "identifier" || adapter::node_text(func, code) != "range" {
                return;
            }
            let Some(arg_list) = iter.child_by_field_name("arguments") else {
                return;
            };
            let mut args = Vec::new();
            let count = arg_list.named_child_count();
            for i in 0..count {
                if let Some(arg) = arg_list.named_child(i) {
                    if arg.kind() == "keyword_argument" || arg.kind() == "comment" {
                        continue;
                    }
                    args.push(RangeArg {
                        start_byte: arg.start_byte(),
                        end_byte: arg.end_byte(),
                        is_int_literal: arg.kind() == "integer",
                    });
                }
            }
            if args.is_empty() {
                return;
            }
            sites.push(RangeSite {
                call_start: iter.start_byte(),
                call_end: iter.end_byte(),
                line: node.start_position().row,
                args,
            });
        });
        sites
    }

    pub fn apply(
        &mut self,
        code: &str,
        site: &RangeSite,
        mutate_type: &str,
        delta: i64,
    ) -> Result<Applied, MutateError> {
        let arg_idx = match mutate_type {
            "RangeStopInc" | "RangeStopDec" => {
                if site.args.len() == 1 {
                    0
                } else {
                    1
                }
            }
            "RangeStartInc" | "RangeStartDec" => 0,
            "RangeStepInc" | "RangeStepDec" => 2,
            other => {
                return Err(MutateError::new(format!("unknown boundary mutate type: {other}")));
            }
        };
        let arg = *site
            .args
            .get(arg_idx)
            .ok_or_else(|| MutateError::new(format!("{mutate_type} needs argument {arg_idx}")))?;
        let positive = mutate_type.ends_with("Inc");

        let arg_text = &code[arg.start_byte..arg.end_byte];
        let replacement = if arg.is_int_literal {
            match arg_text.parse::<i64>() {
                Ok(v) => {
                    let shifted = if positive { v + delta } else { v - delta };
                    shifted.to_string()
                }
                // Underscored or radix-prefixed literals: wrap instead.
                Err(_) => wrap_shift(arg_text, positive, delta),
            }
        } else {
            wrap_shift(arg_text, positive, delta)
        };

        let original_call = code[site.call_start..site.call_end].to_string();
        let rel = Edit::new(
            arg.start_byte - site.call_start,
            arg.end_byte - site.call_start,
            replacement.clone(),
        );
        let mutated_call = adapter::render(&original_call, &[rel]);
        let mutated =
            adapter::render(code, &[Edit::new(arg.start_byte, arg.end_byte, replacement)]);

        let record = MutationRecord::new(
            "BoundaryMutator",
            mutate_type,
            site.line + 1,
            original_call,
            mutated_call,
            format!("{} {}", mutate_type, delta),
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
        let available = site.available_types();
        if available.is_empty() {
            return Ok(Outcome::NoSite);
        }
        let mutate_type = available[rng.usize(..available.len())];
        let delta = rng.i64(1..=3);
        Ok(Outcome::Applied(self.apply(code, &site, mutate_type, delta)?))
    }
}

fn wrap_shift(expr: &str, positive: bool, delta: i64) -> String {
    if positive {
        format!("{} + {}", expr, delta)
    } else {
        format!("{} - {}", expr, delta)
    }
}
