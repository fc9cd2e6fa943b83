pub mod argument;
pub mod array_index;
pub mod boundary;
pub mod bracket;
pub mod colon;
pub mod condition;
pub mod control_flow;
pub mod empty_structure;
pub mod function_call;
pub mod indent;
pub mod module_import;
pub mod operator;
pub mod quote;
pub mod variable;

use crate::record::MutationRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed roster of mutator kinds. Behavior is dispatched by matching on the
/// variant, never by runtime type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutatorKind {
    Bracket,
    Colon,
    FunctionCall,
    Indent,
    Module,
    Operator,
    Quote,
    Variable,
    Condition,
    Boundary,
    ArrayIndex,
    Argument,
    ControlFlow,
    EmptyStructure,
}

impl MutatorKind {
    /// Roster order; the static rate table in `config` is parallel to this.
    pub const ALL: [MutatorKind; 14] = [
        MutatorKind::Bracket,
        MutatorKind::Colon,
        MutatorKind::FunctionCall,
        MutatorKind::Indent,
        MutatorKind::Module,
        MutatorKind::Operator,
        MutatorKind::Quote,
        MutatorKind::Variable,
        MutatorKind::Condition,
        MutatorKind::Boundary,
        MutatorKind::ArrayIndex,
        MutatorKind::Argument,
        MutatorKind::ControlFlow,
        MutatorKind::EmptyStructure,
    ];

    /// The label stamped into mutation records and info JSON.
    pub fn label(&self) -> &'static str {
        match self {
            MutatorKind::Bracket => "BracketMutator",
            MutatorKind::Colon => "ColonMutator",
            MutatorKind::FunctionCall => "FunctionMutator",
            MutatorKind::Indent => "IndentMutator",
            MutatorKind::Module => "ModuleMutator",
            MutatorKind::Operator => "OperatorMutator",
            MutatorKind::Quote => "QuoteMutator",
            MutatorKind::Variable => "VariableNameMutator",
            MutatorKind::Condition => "ConditionMutator",
            MutatorKind::Boundary => "BoundaryMutator",
            MutatorKind::ArrayIndex => "ArrayMutator",
            MutatorKind::Argument => "ArgMutator",
            MutatorKind::ControlFlow => "ControlFlowMutator",
            MutatorKind::EmptyStructure => "EmptyStructureMutator",
        }
    }

    /// Position in `ALL`, used to index the parallel rate table.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }

    /// Parse a CLI-friendly short name.
    pub fn from_name(name: &str) -> Option<MutatorKind> {
        match name {
            "bracket" => Some(MutatorKind::Bracket),
            "colon" => Some(MutatorKind::Colon),
            "function" => Some(MutatorKind::FunctionCall),
            "indent" => Some(MutatorKind::Indent),
            "module" => Some(MutatorKind::Module),
            "operator" => Some(MutatorKind::Operator),
            "quote" => Some(MutatorKind::Quote),
            "variable" => Some(MutatorKind::Variable),
            "condition" => Some(MutatorKind::Condition),
            "boundary" => Some(MutatorKind::Boundary),
            "array" => Some(MutatorKind::ArrayIndex),
            "arg" => Some(MutatorKind::Argument),
            "controlflow" => Some(MutatorKind::ControlFlow),
            "emptystructure" => Some(MutatorKind::EmptyStructure),
            _ => None,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            MutatorKind::Bracket => "bracket",
            MutatorKind::Colon => "colon",
            MutatorKind::FunctionCall => "function",
            MutatorKind::Indent => "indent",
            MutatorKind::Module => "module",
            MutatorKind::Operator => "operator",
            MutatorKind::Quote => "quote",
            MutatorKind::Variable => "variable",
            MutatorKind::Condition => "condition",
            MutatorKind::Boundary => "boundary",
            MutatorKind::ArrayIndex => "array",
            MutatorKind::Argument => "arg",
            MutatorKind::ControlFlow => "controlflow",
            MutatorKind::EmptyStructure => "emptystructure",
        }
    }
}

/// Validity class: lexical mutators rewrite raw line text and may break
/// parseability; structural mutators rewrite the tree and must not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Lexical,
    Structural,
}

/// Per-mutator state surviving between `mutate` and the orchestrator's
/// `init` reset. Candidate sites are NOT part of this: they are collected
/// fresh on every call and dropped when the call returns.
#[derive(Debug, Default)]
pub struct MutatorState {
    pub successful: bool,
    pub record: Option<MutationRecord>,
}

impl MutatorState {
    pub fn reset(&mut self) {
        self.successful = false;
        self.record = None;
    }

    pub fn store(&mut self, record: MutationRecord) {
        self.successful = true;
        self.record = Some(record);
    }
}

/// A rewrite that actually happened: the full mutated source plus its record.
#[derive(Debug, Clone)]
pub struct Applied {
    pub code: String,
    pub record: MutationRecord,
}

/// Outcome of a `mutate` call that did not hit a fatal error.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// No eligible site (including unparseable input for structural
    /// mutators); the caller keeps its code unchanged.
    NoSite,
    Applied(Applied),
}

/// A broken invariant during rewrite. The orchestrator catches this and
/// terminates the remaining steps of the current sample.
#[derive(Debug, Clone)]
pub struct MutateError {
    pub message: String,
}

impl MutateError {
    pub fn new(message: impl Into<String>) -> Self {
        MutateError { message: message.into() }
    }
}

impl fmt::Display for MutateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MutateError {}

pub type MutateResult = Result<Outcome, MutateError>;

/// One variant per mutator kind, each carrying its own state struct.
pub enum Mutator {
    Bracket(bracket::BracketMutator),
    Colon(colon::ColonMutator),
    FunctionCall(function_call::FunctionMutator),
    Indent(indent::IndentMutator),
    Module(module_import::ModuleMutator),
    Operator(operator::OperatorMutator),
    Quote(quote::QuoteMutator),
    Variable(variable::VariableNameMutator),
    Condition(condition::ConditionMutator),
    Boundary(boundary::BoundaryMutator),
    ArrayIndex(array_index::ArrayMutator),
    Argument(argument::ArgMutator),
    ControlFlow(control_flow::ControlFlowMutator),
    EmptyStructure(empty_structure::EmptyStructureMutator),
}

impl Mutator {
    pub fn new(kind: MutatorKind) -> Mutator {
        match kind {
            MutatorKind::Bracket => Mutator::Bracket(bracket::BracketMutator::new()),
            MutatorKind::Colon => Mutator::Colon(colon::ColonMutator::new()),
            MutatorKind::FunctionCall => {
                Mutator::FunctionCall(function_call::FunctionMutator::new())
            }
            MutatorKind::Indent => Mutator::Indent(indent::IndentMutator::new()),
            MutatorKind::Module => Mutator::Module(module_import::ModuleMutator::new()),
            MutatorKind::Operator => Mutator::Operator(operator::OperatorMutator::new()),
            MutatorKind::Quote => Mutator::Quote(quote::QuoteMutator::new()),
            MutatorKind::Variable => Mutator::Variable(variable::VariableNameMutator::new()),
            MutatorKind::Condition => Mutator::Condition(condition::ConditionMutator::new()),
            MutatorKind::Boundary => Mutator::Boundary(boundary::BoundaryMutator::new()),
            MutatorKind::ArrayIndex => Mutator::ArrayIndex(array_index::ArrayMutator::new()),
            MutatorKind::Argument => Mutator::Argument(argument::ArgMutator::new()),
            MutatorKind::ControlFlow => {
                Mutator::ControlFlow(control_flow::ControlFlowMutator::new())
            }
            MutatorKind::EmptyStructure => {
                Mutator::EmptyStructure(empty_structure::EmptyStructureMutator::new())
            }
        }
    }

    pub fn kind(&self) -> MutatorKind {
        match self {
            Mutator::Bracket(_) => MutatorKind::Bracket,
            Mutator::Colon(_) => MutatorKind::Colon,
            Mutator::FunctionCall(_) => MutatorKind::FunctionCall,
            Mutator::Indent(_) => MutatorKind::Indent,
            Mutator::Module(_) => MutatorKind::Module,
            Mutator::Operator(_) => MutatorKind::Operator,
            Mutator::Quote(_) => MutatorKind::Quote,
            Mutator::Variable(_) => MutatorKind::Variable,
            Mutator::Condition(_) => MutatorKind::Condition,
            Mutator::Boundary(_) => MutatorKind::Boundary,
            Mutator::ArrayIndex(_) => MutatorKind::ArrayIndex,
            Mutator::Argument(_) => MutatorKind::Argument,
            Mutator::ControlFlow(_) => MutatorKind::ControlFlow,
            Mutator::EmptyStructure(_) => MutatorKind::EmptyStructure,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().label()
    }

    pub fn family(&self) -> Family {
        match self {
            Mutator::Bracket(_)
            | Mutator::Colon(_)
            | Mutator::Indent(_)
            | Mutator::Quote(_) => Family::Lexical,
            _ => Family::Structural,
        }
    }

    /// Subtype labels this mutator can stamp into records.
    pub fn mutate_types(&self) -> &'static [&'static str] {
        match self {
            Mutator::Bracket(_) => bracket::BracketMutator::MUTATE_TYPES,
            Mutator::Colon(_) => colon::ColonMutator::MUTATE_TYPES,
            Mutator::FunctionCall(_) => function_call::FunctionMutator::MUTATE_TYPES,
            Mutator::Indent(_) => indent::IndentMutator::MUTATE_TYPES,
            Mutator::Module(_) => module_import::ModuleMutator::MUTATE_TYPES,
            Mutator::Operator(_) => operator::OperatorMutator::MUTATE_TYPES,
            Mutator::Quote(_) => quote::QuoteMutator::MUTATE_TYPES,
            Mutator::Variable(_) => variable::VariableNameMutator::MUTATE_TYPES,
            Mutator::Condition(_) => condition::ConditionMutator::MUTATE_TYPES,
            Mutator::Boundary(_) => boundary::BoundaryMutator::MUTATE_TYPES,
            Mutator::ArrayIndex(_) => array_index::ArrayMutator::MUTATE_TYPES,
            Mutator::Argument(_) => argument::ArgMutator::MUTATE_TYPES,
            Mutator::ControlFlow(_) => control_flow::ControlFlowMutator::MUTATE_TYPES,
            Mutator::EmptyStructure(_) => empty_structure::EmptyStructureMutator::MUTATE_TYPES,
        }
    }

    /// Applicability probe. Defined as "the site collection `mutate` uses is
    /// non-empty", so the probe can never disagree with mutation discovery.
    pub fn can_mutate(&self, code: &str) -> bool {
        match self {
            Mutator::Bracket(_) => !bracket::BracketMutator::collect(code).is_empty(),
            Mutator::Colon(_) => !colon::ColonMutator::collect(code).is_empty(),
            Mutator::FunctionCall(_) => !function_call::FunctionMutator::collect(code).is_empty(),
            Mutator::Indent(_) => !indent::IndentMutator::collect(code).is_empty(),
            Mutator::Module(_) => !module_import::ModuleMutator::collect(code).is_empty(),
            Mutator::Operator(_) => !operator::OperatorMutator::collect(code).is_empty(),
            Mutator::Quote(_) => !quote::QuoteMutator::collect(code).is_empty(),
            Mutator::Variable(_) => !variable::VariableNameMutator::collect(code).0.is_empty(),
            Mutator::Condition(_) => !condition::ConditionMutator::collect(code).is_empty(),
            Mutator::Boundary(_) => !boundary::BoundaryMutator::collect(code).is_empty(),
            Mutator::ArrayIndex(_) => !array_index::ArrayMutator::collect(code).is_empty(),
            Mutator::Argument(_) => !argument::ArgMutator::collect(code).is_empty(),
            Mutator::ControlFlow(_) => !control_flow::ControlFlowMutator::collect(code).is_empty(),
            Mutator::EmptyStructure(_) => {
                !empty_structure::EmptyStructureMutator::collect(code).is_empty()
            }
        }
    }

    pub fn mutate(&mut self, code: &str, rng: &mut fastrand::Rng) -> MutateResult {
        match self {
            Mutator::Bracket(m) => m.mutate(code, rng),
            Mutator::Colon(m) => m.mutate(code, rng),
            Mutator::FunctionCall(m) => m.mutate(code, rng),
            Mutator::Indent(m) => m.mutate(code, rng),
            Mutator::Module(m) => m.mutate(code, rng),
            Mutator::Operator(m) => m.mutate(code, rng),
            Mutator::Quote(m) => m.mutate(code, rng),
            Mutator::Variable(m) => m.mutate(code, rng),
            Mutator::Condition(m) => m.mutate(code, rng),
            Mutator::Boundary(m) => m.mutate(code, rng),
            Mutator::ArrayIndex(m) => m.mutate(code, rng),
            Mutator::Argument(m) => m.mutate(code, rng),
            Mutator::ControlFlow(m) => m.mutate(code, rng),
            Mutator::EmptyStructure(m) => m.mutate(code, rng),
        }
    }

    fn state(&self) -> &MutatorState {
        match self {
            Mutator::Bracket(m) => &m.state,
            Mutator::Colon(m) => &m.state,
            Mutator::FunctionCall(m) => &m.state,
            Mutator::Indent(m) => &m.state,
            Mutator::Module(m) => &m.state,
            Mutator::Operator(m) => &m.state,
            Mutator::Quote(m) => &m.state,
            Mutator::Variable(m) => &m.state,
            Mutator::Condition(m) => &m.state,
            Mutator::Boundary(m) => &m.state,
            Mutator::ArrayIndex(m) => &m.state,
            Mutator::Argument(m) => &m.state,
            Mutator::ControlFlow(m) => &m.state,
            Mutator::EmptyStructure(m) => &m.state,
        }
    }

    fn state_mut(&mut self) -> &mut MutatorState {
        match self {
            Mutator::Bracket(m) => &mut m.state,
            Mutator::Colon(m) => &mut m.state,
            Mutator::FunctionCall(m) => &mut m.state,
            Mutator::Indent(m) => &mut m.state,
            Mutator::Module(m) => &mut m.state,
            Mutator::Operator(m) => &mut m.state,
            Mutator::Quote(m) => &mut m.state,
            Mutator::Variable(m) => &mut m.state,
            Mutator::Condition(m) => &mut m.state,
            Mutator::Boundary(m) => &mut m.state,
            Mutator::ArrayIndex(m) => &mut m.state,
            Mutator::Argument(m) => &mut m.state,
            Mutator::ControlFlow(m) => &mut m.state,
            Mutator::EmptyStructure(m) => &mut m.state,
        }
    }

    /// Reset `successful` and the record buffer. Mutators are reused across
    /// many pipeline invocations; the orchestrator calls this after consuming
    /// a record.
    pub fn init(&mut self) {
        self.state_mut().reset();
    }

    pub fn successful(&self) -> bool {
        self.state().successful
    }

    pub fn last_record(&self) -> Option<&MutationRecord> {
        self.state().record.as_ref()
    }
}

/// The full mutator roster in rate-table order.
pub fn roster() -> Vec<Mutator> {
    MutatorKind::ALL.iter().map(|k| Mutator::new(*k)).collect()
}
