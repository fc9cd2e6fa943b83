use faultgen::adapter;
use faultgen::config::PipelineConfig;
use faultgen::mutators::MutatorKind;
use faultgen::pipeline::{MutationInfo, MutationPlan, Pipeline};
use faultgen::sampling;

const PROGRAM: &str = r#"import os

def summarize(values):
    total = 0
    seen = []
    for i in range(0, 10, 2):
        if values[i] > total and i < 8:
            total = total + values[i]
        else:
            continue
    lo = min(values)
    print(os.linesep, lo, total)
    return total
"#;

fn seeded(seed: u64) -> Pipeline {
    Pipeline::new(PipelineConfig { seed: Some(seed), ..PipelineConfig::default() })
}

#[test]
fn config_defaults_leave_two_percent_noop_slack() {
    let config = PipelineConfig::default();
    assert_eq!(config.mutation_rates.len(), MutatorKind::ALL.len());
    assert!((config.noop_weight() - 0.02).abs() < 1e-9);
    assert!((config.rate_for(MutatorKind::Bracket) - 0.005).abs() < 1e-12);
    assert!((config.rate_for(MutatorKind::Operator) - 0.18).abs() < 1e-12);
    assert_eq!(config.mutation_size, 10);
}

#[test]
fn active_set_filters_by_applicability() {
    let pipeline = seeded(1);
    let active = pipeline.active_set(PROGRAM);
    assert!(active.contains(&MutatorKind::Operator.index()));
    assert!(active.contains(&MutatorKind::Variable.index()));
    assert!(active.contains(&MutatorKind::Condition.index()));
    assert!(active.contains(&MutatorKind::Boundary.index()));
    assert!(active.contains(&MutatorKind::Module.index()));

    // A bare literal activates nothing.
    assert!(seeded(1).active_set("42\n").is_empty());
}

#[test]
fn build_plan_respects_the_truncated_times_table() {
    let mut pipeline = seeded(3);
    let active = pipeline.active_set(PROGRAM);
    let cap = pipeline.config().times_rates.len().min(active.len());
    for _ in 0..50 {
        let plan = pipeline.build_plan(&active);
        assert!(plan.requested < cap);
        assert_eq!(plan.steps.len(), plan.requested);
        for step in &plan.steps {
            if let Some(kind) = step {
                assert!(active.contains(&kind.index()));
            }
        }
    }
}

#[test]
fn build_plan_on_empty_active_set_requests_nothing() {
    let mut pipeline = seeded(4);
    let plan = pipeline.build_plan(&[]);
    assert_eq!(plan.requested, 0);
    assert!(plan.steps.is_empty());
}

#[test]
fn sample_counters_hold_the_pipeline_invariant() {
    let mut pipeline = seeded(42);
    for sample in pipeline.generate_samples(PROGRAM, 30) {
        let info = &sample.info;
        assert_eq!(info.times, info.single_info.len());
        assert!(info.times <= info.real_times);
        assert!(info.real_times <= info.expected_times);
    }
}

#[test]
fn inactive_program_yields_unmodified_copies() {
    let mut pipeline = seeded(9);
    let samples = pipeline.generate_samples("42\n", 5);
    assert_eq!(samples.len(), 5);
    for sample in samples {
        assert_eq!(sample.mutated_code, "42\n");
        assert_eq!(sample.info.expected_times, 0);
        assert_eq!(sample.info.times, 0);
        assert_eq!(sample.info.real_times, 0);
        assert!(sample.info.single_info.is_empty());
    }
}

#[test]
fn successful_steps_log_the_stringified_record() {
    let mut pipeline = seeded(1234);
    let mut saw_step = false;
    for sample in pipeline.generate_samples(PROGRAM, 40) {
        for step in &sample.info.single_info {
            saw_step = true;
            assert!(step.mutated_info.starts_with("Mutator: "));
            assert!(step.mutated_info.contains("\nMutate type: "));
            assert!(step.mutated_info.contains("\nLine: "));
            assert!(step.mutated_info.contains("\nDescription: "));
            assert!(step.mutated_info.contains(&format!("Mutator: {}", step.mutator_type)));
        }
    }
    assert!(saw_step, "40 samples produced no successful step");
}

#[test]
fn seeded_runs_are_reproducible() {
    let samples_a = seeded(777).generate_samples(PROGRAM, 10);
    let samples_b = seeded(777).generate_samples(PROGRAM, 10);
    assert_eq!(samples_a.len(), samples_b.len());
    for (a, b) in samples_a.iter().zip(samples_b.iter()) {
        assert_eq!(a.mutated_code, b.mutated_code);
        assert_eq!(
            serde_json::to_string(&a.info).unwrap(),
            serde_json::to_string(&b.info).unwrap()
        );
    }
}

#[test]
fn pipeline_reports_its_seed() {
    assert_eq!(seeded(99).seed(), 99);
}

#[test]
fn info_json_uses_the_loader_key_names() {
    let mut pipeline = seeded(55);
    let sample = pipeline.generate_sample(PROGRAM);
    let json = serde_json::to_string(&sample.info).unwrap();
    assert!(json.contains("\"expectedTimes\":"));
    assert!(json.contains("\"times\":"));
    assert!(json.contains("\"realTimes\":"));
    assert!(json.contains("\"single_Info\":"));

    let back: MutationInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(back.expected_times, sample.info.expected_times);
}

#[test]
fn generate_dataset_persists_err_and_info_artifacts() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("alpha.py"), PROGRAM).unwrap();
    std::fs::write(input.path().join("beta.py"), "x = min(1, 2)\nprint(x)\n").unwrap();
    std::fs::write(input.path().join("notes.txt"), "not python").unwrap();

    let config = PipelineConfig { mutation_size: 3, seed: Some(21), ..PipelineConfig::default() };
    let mut pipeline = Pipeline::new(config);
    let report = pipeline.generate_dataset(input.path(), output.path()).unwrap();

    assert_eq!(report.files, 2);
    assert_eq!(report.samples_written, 6);
    assert_eq!(report.samples_rejected, 0);

    for name in ["alpha.py", "beta.py"] {
        for i in 0..3 {
            let err_path = output.path().join(format!("{name}_err_{i}.py"));
            let info_path = output.path().join(format!("{name}_info_{i}.json"));
            assert!(err_path.exists(), "missing {}", err_path.display());
            assert!(info_path.exists(), "missing {}", info_path.display());

            let info: MutationInfo =
                serde_json::from_str(&std::fs::read_to_string(&info_path).unwrap()).unwrap();
            assert_eq!(info.times, info.single_info.len());
            assert!(info.times <= info.real_times);
            assert!(info.real_times <= info.expected_times);
        }
    }
}

#[test]
fn generate_dataset_with_validation_keeps_only_invalid_mutants() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("prog.py"), PROGRAM).unwrap();

    let config = PipelineConfig {
        mutation_size: 8,
        seed: Some(13),
        validate: true,
        ..PipelineConfig::default()
    };
    let mut pipeline = Pipeline::new(config);
    let report = pipeline.generate_dataset(input.path(), output.path()).unwrap();

    assert_eq!(report.samples_written + report.samples_rejected, 8);
    for i in 0.. {
        let err_path = output.path().join(format!("prog.py_err_{i}.py"));
        if !err_path.exists() {
            assert_eq!(i, report.samples_written);
            break;
        }
        let mutated = std::fs::read_to_string(&err_path).unwrap();
        assert!(!adapter::parses(&mutated), "validated sample {} still parses", i);
    }
}

#[test]
fn run_plan_counts_noop_placeholders_as_attempted() {
    let mut pipeline = seeded(8);
    let plan = MutationPlan {
        requested: 3,
        steps: vec![Some(MutatorKind::Operator), None, Some(MutatorKind::Bracket)],
    };
    let sample = pipeline.run_plan(PROGRAM, &plan);
    assert_eq!(sample.info.expected_times, 3);
    assert_eq!(sample.info.real_times, 3);
    // Operator and bracket both have sites; only the no-op contributes
    // nothing.
    assert_eq!(sample.info.times, 2);
    assert_eq!(sample.info.single_info.len(), 2);
}

#[test]
fn run_plan_counts_silent_no_ops_as_attempted_not_successful() {
    let mut pipeline = seeded(8);
    let plan = MutationPlan { requested: 1, steps: vec![Some(MutatorKind::Boundary)] };
    // No range loop anywhere, so the boundary step finds no site.
    let sample = pipeline.run_plan("x = a + b\n", &plan);
    assert_eq!(sample.info.expected_times, 1);
    assert_eq!(sample.info.real_times, 1);
    assert_eq!(sample.info.times, 0);
    assert_eq!(sample.mutated_code, "x = a + b\n");
}

#[test]
fn weighted_index_respects_zero_weights() {
    let mut rng = fastrand::Rng::with_seed(17);
    for _ in 0..100 {
        let pick = sampling::weighted_index(&mut rng, &[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(pick, 1);
    }
}

#[test]
fn weighted_index_handles_degenerate_inputs() {
    let mut rng = fastrand::Rng::with_seed(17);
    assert_eq!(sampling::weighted_index(&mut rng, &[]), None);
    // All-zero weights fall back to a uniform draw.
    let pick = sampling::weighted_index(&mut rng, &[0.0, 0.0]).unwrap();
    assert!(pick < 2);
}

#[test]
fn weighted_index_covers_positive_entries() {
    let mut rng = fastrand::Rng::with_seed(29);
    let mut seen = [false; 3];
    for _ in 0..200 {
        let pick = sampling::weighted_index(&mut rng, &[0.2, 0.3, 0.5]).unwrap();
        seen[pick] = true;
    }
    assert_eq!(seen, [true, true, true]);
}

#[test]
fn generate_dataset_errors_on_missing_input_dir() {
    let output = tempfile::tempdir().unwrap();
    let mut pipeline = seeded(2);
    let missing = output.path().join("does-not-exist");
    assert!(pipeline.generate_dataset(&missing, output.path()).is_err());
}
