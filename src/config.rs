use crate::mutators::MutatorKind;
use serde::{Deserialize, Serialize};

/// Knobs for the mutation pipeline. The two rate tables drive the weighted
/// schedule: `mutation_rates` is parallel to `MutatorKind::ALL` and gives
/// each mutator's per-step weight; `times_rates[t]` weights attempting `t`
/// mutation steps. The slack `1 - sum(mutation_rates)` is the per-step
/// no-op weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Variants generated per input program.
    pub mutation_size: usize,
    pub mutation_rates: Vec<f64>,
    pub times_rates: Vec<f64>,
    /// Keep only samples the validator accepts (guaranteed-invalid mutants).
    pub validate: bool,
    /// Fixed rng seed; `None` draws one and reports it.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            mutation_size: 10,
            mutation_rates: vec![
                0.005, // bracket
                0.005, // colon
                0.080, // function
                0.005, // indent
                0.040, // module
                0.180, // operator
                0.005, // quote
                0.180, // variable
                0.180, // condition
                0.120, // boundary
                0.120, // array
                0.030, // arg
                0.010, // controlflow
                0.020, // emptystructure
                // total 0.98
            ],
            times_rates: vec![
                0.01, 0.04, 0.06, 0.09, 0.13, 0.17, 0.17, 0.13, 0.09, 0.06, 0.04, 0.01,
            ],
            validate: false,
            seed: None,
        }
    }
}

impl PipelineConfig {
    pub fn rate_for(&self, kind: MutatorKind) -> f64 {
        self.mutation_rates.get(kind.index()).copied().unwrap_or(0.0)
    }

    /// Weight of the "do nothing" step choice.
    pub fn noop_weight(&self) -> f64 {
        (1.0 - self.mutation_rates.iter().sum::<f64>()).max(0.0)
    }
}
