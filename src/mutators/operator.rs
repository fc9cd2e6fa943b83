use crate::adapter::{self, Edit};
use crate::mutators::{Applied, MutateError, MutateResult, MutatorState, Outcome};
use crate::record::MutationRecord;

pub const BIN_OPS: &[&str] = &["+", "-", "*", "/", "//", "%", "**"];
pub const CMP_OPS: &[&str] = &["==", "!=", "<", "<=", ">", ">="];

/// Python AST operator names; records and descriptions use these.
pub fn op_name(op: &str) -> &'static str {
    match op {
        "+" => "Add",
        "-" => "Sub",
        "*" => "Mult",
        "/" => "Div",
        "//" => "FloorDiv",
        "%" => "Mod",
        "**" => "Pow",
        "==" => "Eq",
        "!=" => "NotEq",
        "<" => "Lt",
        "<=" => "LtE",
        ">" => "Gt",
        ">=" => "GtE",
        _ => "Unknown",
    }
}

/// Every other operator in the same class.
pub fn alternates(op: &str) -> &'static [&'static str] {
    match op {
        "+" => &["-", "*", "/", "//", "%", "**"],
        "-" => &["+", "*", "/", "//", "%", "**"],
        "*" => &["+", "-", "/", "//", "%", "**"],
        "/" => &["+", "-", "*", "//", "%", "**"],
        "//" => &["+", "-", "*", "/", "%", "**"],
        "%" => &["+", "-", "*", "/", "//", "**"],
        "**" => &["+", "-", "*", "/", "//", "%"],
        "==" => &["!=", "<", "<=", ">", ">="],
        "!=" => &["==", "<", "<=", ">", ">="],
        "<" => &["==", "!=", "<=", ">", ">="],
        "<=" => &["==", "!=", "<", ">", ">="],
        ">" => &["==", "!=", "<", "<=", ">="],
        ">=" => &["==", "!=", "<", "<=", ">"],
        _ => &[],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    Binary,
    Comparison,
}

/// One operator token inside a binary or comparison expression. The
/// expression span is kept so records show the whole affected expression.
#[derive(Debug, Clone)]
pub struct OperatorSite {
    pub class: OpClass,
    pub op: String,
    pub op_start: usize,
    pub op_end: usize,
    pub expr_start: usize,
    pub expr_end: usize,
    pub line: usize,
}

/// Structural mutator: swaps one arithmetic or comparison operator for a
/// different member of its class.
#[derive(Debug, Default)]
pub struct OperatorMutator {
    pub state: MutatorState,
}

impl OperatorMutator {
    pub const MUTATE_TYPES: &'static [&'static str] = &["BinOpSubs", "CompareSubs"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(code: &str) -> Vec<OperatorSite> {
        let Some(tree) = adapter::parse(code) else {
            return Vec::new();
        };
        let mut sites = Vec::new();
        adapter::walk(tree.root_node(), &mut |node| match node.kind() {
            "binary_operator" => {
                if let Some(op) = node.child_by_field_name("operator") {
                    if BIN_OPS.contains(&op.kind()) {
                        sites.push(OperatorSite {
                            class: OpClass::Binary,
                            op: op.kind().to_string(),
                            op_start: op.start_byte(),
                            op_end: op.end_byte(),
                            expr_start: node.start_byte(),
                            expr_end: node.end_byte(),
                            line: node.start_position().row,
                        });
                    }
                }
            }
            "comparison_operator" => {
                // Chained comparisons carry several operator tokens; each is
                // its own site.
                let count = node.child_count();
                for i in 0..count {
                    if let Some(child) = node.child(i) {
                        if CMP_OPS.contains(&child.kind()) {
                            sites.push(OperatorSite {
                                class: OpClass::Comparison,
                                op: child.kind().to_string(),
                                op_start: child.start_byte(),
                                op_end: child.end_byte(),
                                expr_start: node.start_byte(),
                                expr_end: node.end_byte(),
                                line: node.start_position().row,
                            });
                        }
                    }
                }
            }
            _ => {}
        });
        sites
    }

    pub fn apply(
        &mut self,
        code: &str,
        site: &OperatorSite,
        new_op: &str,
    ) -> Result<Applied, MutateError> {
        let expr = &code[site.expr_start..site.expr_end];
        let rel_start = site.op_start - site.expr_start;
        let rel_end = site.op_end - site.expr_start;
        let mutated_expr = format!("{}{}{}", &expr[..rel_start], new_op, &expr[rel_end..]);

        let mutated = adapter::render(code, &[Edit::new(site.op_start, site.op_end, new_op)]);
        let (mutate_type, context) = match site.class {
            OpClass::Binary => ("BinOpSubs", "binary operation"),
            OpClass::Comparison => ("CompareSubs", "comparison"),
        };

        let record = MutationRecord::new(
            "OperatorMutator",
            mutate_type,
            site.line + 1,
            expr,
            mutated_expr,
            format!("Replaced {} with {} in {}", op_name(&site.op), op_name(new_op), context),
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
        let options = alternates(&site.op);
        if options.is_empty() {
            return Err(MutateError::new(format!("no alternates for operator {}", site.op)));
        }
        let new_op = options[rng.usize(..options.len())];
        Ok(Outcome::Applied(self.apply(code, &site, new_op)?))
    }
}
