use crate::adapter::{self, Edit};
use crate::mutators::operator::{alternates, CMP_OPS};
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

/// Shape of an `if`/`while` condition, captured at collection time.
#[derive(Debug, Clone)]
pub struct ConditionSite {
    pub line: usize,
    pub cond_start: usize,
    pub cond_end: usize,
    /// Comparison operator tokens inside a comparison condition.
    pub cmp_ops: Vec<(String, usize, usize)>,
    /// `and`/`or` token of a boolean condition plus its operand spans.
    pub bool_op: Option<(String, usize, usize)>,
    pub operands: Vec<(usize, usize)>,
}

impl ConditionSite {
    /// Subtypes compatible with this condition's shape.
    pub fn available_types(&self) -> Vec<&'static str> {
        let mut types = Vec::new();
        if !self.cmp_ops.is_empty() {
            types.push("CompareSubs");
            if self.cmp_ops.len() == 1
                && matches!(self.cmp_ops[0].0.as_str(), "<" | "<=" | ">" | ">=")
            {
                types.push("BoundaryAdjust");
            }
        }
        if self.bool_op.is_some() {
            types.push("LogicOpReverse");
            types.push("PartialCondition");
        }
        types.push("ConditionNegate");
        types
    }
}

/// A concrete condition rewrite; selection parameters are explicit so tests
/// can force a subtype.
#[derive(Debug, Clone)]
pub enum ConditionOp<'a> {
    CompareSubs { new_op: &'a str },
    LogicOpReverse,
    ConditionNegate,
    BoundaryAdjust,
    PartialCondition { keep_left: bool },
}

impl ConditionOp<'_> {
    pub fn mutate_type(&self) -> &'static str {
        match self {
            ConditionOp::CompareSubs { .. } => "CompareSubs",
            ConditionOp::LogicOpReverse => "LogicOpReverse",
            ConditionOp::ConditionNegate => "ConditionNegate",
            ConditionOp::BoundaryAdjust => "BoundaryAdjust",
            ConditionOp::PartialCondition { .. } => "PartialCondition",
        }
    }
}

/// Structural mutator for branch and loop conditions: operator substitution,
/// and/or reversal, negation wrapping, boundary tightening, or collapsing a
/// boolean expression to one operand.
#[derive(Debug, Default)]
pub struct ConditionMutator {
    pub state: MutatorState,
}

impl ConditionMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &[
        "CompareSubs",
        "LogicOpReverse",
        "ConditionNegate",
        "BoundaryAdjust",
        "PartialCondition",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Every `if`/`while` condition is a site; negation applies to any shape.
    pub fn collect(code: &str) -> Vec<ConditionSite> {
        let Some(tree) = adapter::parse(code) else {
            return Vec::new();
        };
        let mut sites = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| {
            if !matches!(node.kind(), "if_statement" | "elif_clause" | "while_statement") {
                return;
            }
            let Some(cond) = node.child_by_field_name("condition") else {
                return;
            };

            let mut cmp_ops = Vec::new();
            if cond.kind() == "comparison_operator" {
                let count = cond.child_count();
                for i in 0..count {
                    if let Some(child) = cond.child(i) {
                        if CMP_OPS.contains(&child.kind()) {
                            cmp_ops.push((
                                child.kind().to_string(),
                                child.start_byte(),
                                child.end_byte(),
                            ));
                        }
                    }
                }
            }

            let mut bool_op = None;
            let mut operands = Vec::new();
            if cond.kind() == "boolean_operator" {
                if let Some(op) = cond.child_by_field_name("operator") {
                    bool_op = Some((op.kind().to_string(), op.start_byte(), op.end_byte()));
                }
                if let Some(left) = cond.child_by_field_name("left") {
                    operands.push((left.start_byte(), left.end_byte()));
                }
                if let Some(right) = cond.child_by_field_name("right") {
                    operands.push((right.start_byte(), right.end_byte()));
                }
            }

            sites.push(ConditionSite {
                line: node.start_position().row,
                cond_start: cond.start_byte(),
                cond_end: cond.end_byte(),
                cmp_ops,
                bool_op,
                operands,
            });
        });
        sites
    }

    pub fn apply(
        &mut self,
        code: &str,
        site: &ConditionSite,
        op: &ConditionOp<'_>,
    ) -> Result<Applied, MutateError> {
        let original_cond = code[site.cond_start..site.cond_end].to_string();

        let edit = match op {
            ConditionOp::CompareSubs { new_op } => {
                let (_, start, end) = site
                    .cmp_ops
                    .first()
                    .ok_or_else(|| MutateError::new("CompareSubs on a non-comparison condition"))?;
                Edit::new(*start, *end, *new_op)
            }
            ConditionOp::LogicOpReverse => {
                let (word, start, end) = site
                    .bool_op
                    .as_ref()
                    .ok_or_else(|| MutateError::new("LogicOpReverse on a non-boolean condition"))?;
                let flipped = if word == "and" { "or" } else { "and" };
                Edit::new(*start, *end, flipped)
            }
            ConditionOp::ConditionNegate => {
                Edit::new(site.cond_start, site.cond_end, format!("not ({})", original_cond))
            }
            ConditionOp::BoundaryAdjust => {
                let (word, start, end) = site
                    .cmp_ops
                    .first()
                    .ok_or_else(|| MutateError::new("BoundaryAdjust on a non-comparison condition"))?;
                let adjusted = match word.as_str() {
                    "<" => "<=",
                    "<=" => "<",
                    ">" => ">=",
                    ">=" => ">",
                    other => {
                        return Err(MutateError::new(format!(
                            "BoundaryAdjust on non-relational operator {other}"
                        )));
                    }
                };
                Edit::new(*start, *end, adjusted)
            }
            ConditionOp::PartialCondition { keep_left } => {
                let idx = if *keep_left { 0 } else { site.operands.len().saturating_sub(1) };
                let (start, end) = *site
                    .operands
                    .get(idx)
                    .ok_or_else(|| MutateError::new("PartialCondition without operands"))?;
                Edit::new(site.cond_start, site.cond_end, code[start..end].to_string())
            }
        };

        // Re-render just the condition span for the record before splicing
        // the full source.
        let rel = Edit::new(edit.start_byte - site.cond_start, edit.end_byte - site.cond_start,
            edit.replacement.clone());
        let mutated_cond = adapter::render(&original_cond, &[rel]);
        let mutated = adapter::render(code, &[edit]);

        let mutate_type = op.mutate_type();
        let record = MutationRecord::new(
            "ConditionMutator",
            mutate_type,
            site.line + 1,
            original_cond.clone(),
            mutated_cond.clone(),
            format!("{}: {} -> {}", mutate_type, original_cond, mutated_cond),
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
        let op = match available[rng.usize(..available.len())] {
            "CompareSubs" => {
                let options = alternates(&site.cmp_ops[0].0);
                if options.is_empty() {
                    return Err(MutateError::new(format!(
                        "no alternates for comparison {}",
                        site.cmp_ops[0].0
                    )));
                }
                ConditionOp::CompareSubs { new_op: options[rng.usize(..options.len())] }
            }
            "LogicOpReverse" => ConditionOp::LogicOpReverse,
            "BoundaryAdjust" => ConditionOp::BoundaryAdjust,
            "PartialCondition" => ConditionOp::PartialCondition { keep_left: rng.bool() },
            _ => ConditionOp::ConditionNegate,
        };
        Ok(Outcome::Applied(self.apply(code, &site, &op)?))
    }
}
