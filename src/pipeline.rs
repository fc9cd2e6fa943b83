use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::mutators::{self, Mutator, MutatorKind, Outcome};
use crate::sampling;
use crate::validator;

/// One successful step's provenance as persisted in the info JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepInfo {
    pub mutated_info: String,
    pub mutator_type: String,
}

/// Per-sample mutation bookkeeping. Key names are the downstream loader's
/// contract: `times` counts successful steps, `realTimes` counts steps that
/// actually ran before any fatal error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationInfo {
    #[serde(rename = "expectedTimes")]
    pub expected_times: usize,
    pub times: usize,
    #[serde(rename = "realTimes")]
    pub real_times: usize,
    #[serde(rename = "single_Info")]
    pub single_info: Vec<StepInfo>,
}

/// One generated variant: mutated source plus its full provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub mutated_code: String,
    pub info: MutationInfo,
}

/// The randomized schedule for one sample: how many steps were requested and
/// which mutator (or no-op) each step drew.
#[derive(Debug, Clone)]
pub struct MutationPlan {
    pub requested: usize,
    pub steps: Vec<Option<MutatorKind>>,
}

/// Summary of a dataset generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub seed: u64,
    pub files: usize,
    pub samples_written: usize,
    pub samples_rejected: usize,
}

/// Orchestrates the mutator roster over input programs. Mutators are
/// constructed once and reused across every sample; the rng is the single
/// randomness source for the whole run.
pub struct Pipeline {
    config: PipelineConfig,
    mutators: Vec<Mutator>,
    rng: fastrand::Rng,
    seed: u64,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
        Pipeline {
            mutators: mutators::roster(),
            rng: fastrand::Rng::with_seed(seed),
            seed,
            config,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Indices (into the roster) of mutators applicable to this program.
    pub fn active_set(&self, code: &str) -> Vec<usize> {
        self.mutators
            .iter()
            .enumerate()
            .filter(|(_, m)| m.can_mutate(code))
            .map(|(i, _)| i)
            .collect()
    }

    /// Draw a step count from the truncated times table, then draw that many
    /// mutator choices (with replacement) from the active set plus no-op.
    pub fn build_plan(&mut self, active: &[usize]) -> MutationPlan {
        if active.is_empty() {
            return MutationPlan { requested: 0, steps: Vec::new() };
        }
        let cap = self.config.times_rates.len().min(active.len());
        let requested =
            sampling::weighted_index(&mut self.rng, &self.config.times_rates[..cap]).unwrap_or(0);

        let mut weights: Vec<f64> =
            active.iter().map(|&i| self.config.mutation_rates.get(i).copied().unwrap_or(0.0)).collect();
        weights.push(self.config.noop_weight());
        let noop_idx = weights.len() - 1;

        let steps = (0..requested)
            .map(|_| {
                let pick =
                    sampling::weighted_index(&mut self.rng, &weights).unwrap_or(noop_idx);
                if pick == noop_idx {
                    None
                } else {
                    Some(self.mutators[active[pick]].kind())
                }
            })
            .collect();
        MutationPlan { requested, steps }
    }

    /// Run a plan's steps sequentially, each on the previous step's output.
    /// A fatal step error ends the sequence early; output and provenance of
    /// the steps already applied are kept.
    pub fn run_plan(&mut self, code: &str, plan: &MutationPlan) -> Sample {
        let mut current = code.to_string();
        let mut single_info = Vec::new();
        let mut attempted = 0;

        for step in &plan.steps {
            attempted += 1;
            let Some(kind) = step else {
                continue;
            };
            let idx = kind.index();
            match self.mutators[idx].mutate(&current, &mut self.rng) {
                Ok(Outcome::Applied(applied)) => {
                    current = applied.code;
                    single_info.push(StepInfo {
                        mutated_info: applied.record.to_string(),
                        mutator_type: kind.label().to_string(),
                    });
                    self.mutators[idx].init();
                }
                Ok(Outcome::NoSite) => {
                    // Counted as attempted; the probe passed on an earlier
                    // version of the code, and a prior step may have consumed
                    // every site since.
                }
                Err(_) => break,
            }
        }

        let times = single_info.len();
        Sample {
            mutated_code: current,
            info: MutationInfo {
                expected_times: plan.requested,
                times,
                real_times: attempted,
                single_info,
            },
        }
    }

    pub fn generate_sample(&mut self, code: &str) -> Sample {
        let active = self.active_set(code);
        let plan = self.build_plan(&active);
        self.run_plan(code, &plan)
    }

    pub fn generate_samples(&mut self, code: &str, count: usize) -> Vec<Sample> {
        (0..count).map(|_| self.generate_sample(code)).collect()
    }

    /// Generate and persist variants for every `.py` file in `input_dir`.
    /// Artifacts per input `name` and surviving variant `i`:
    /// `name_err_{i}.py` (mutated source) and `name_info_{i}.json`
    /// (mutation provenance). Only filesystem failures abort.
    pub fn generate_dataset(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<GenerateReport, String> {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| format!("Failed to create {}: {}", output_dir.display(), e))?;

        let mut inputs: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| format!("Failed to read {}: {}", input_dir.display(), e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| crate::is_python_file(path))
            .collect();
        // Directory iteration order is platform-dependent; sort so a fixed
        // seed reproduces the run.
        inputs.sort();

        let mut report = GenerateReport {
            seed: self.seed,
            files: 0,
            samples_written: 0,
            samples_rejected: 0,
        };

        for path in inputs {
            let source = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "input.py".to_string());
            report.files += 1;

            let samples = self.generate_samples(&source, self.config.mutation_size);
            let kept: Vec<Sample> = if self.config.validate {
                let before = samples.len();
                let kept: Vec<Sample> = samples
                    .into_iter()
                    .filter(|s| validator::is_acceptable(&s.mutated_code, &source))
                    .collect();
                report.samples_rejected += before - kept.len();
                kept
            } else {
                samples
            };

            for (i, sample) in kept.iter().enumerate() {
                let err_path = output_dir.join(format!("{}_err_{}.py", name, i));
                std::fs::write(&err_path, &sample.mutated_code)
                    .map_err(|e| format!("Failed to write {}: {}", err_path.display(), e))?;

                let info_path = output_dir.join(format!("{}_info_{}.json", name, i));
                let json = serde_json::to_string_pretty(&sample.info)
                    .map_err(|e| format!("Failed to serialize {}: {}", info_path.display(), e))?;
                std::fs::write(&info_path, json)
                    .map_err(|e| format!("Failed to write {}: {}", info_path.display(), e))?;
                report.samples_written += 1;
            }
        }

        Ok(report)
    }
}
