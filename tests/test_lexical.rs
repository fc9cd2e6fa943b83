use faultgen::adapter;
use faultgen::mutators::bracket::BracketMutator;
use faultgen::mutators::colon::ColonMutator;
use faultgen::mutators::indent::IndentMutator;
use faultgen::mutators::quote::QuoteMutator;
use faultgen::mutators::{Mutator, MutatorKind, Outcome};

// --- Bracket ---

#[test]
fn bracket_collects_matched_pairs_per_line() {
    let sites = BracketMutator::collect("print(x)\n");
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].line, 0);
    assert_eq!(sites[0].open_pos, 5);
    assert_eq!(sites[0].close_pos, 7);
}

#[test]
fn bracket_collects_nested_pairs() {
    let sites = BracketMutator::collect("x = d[keys[0]]\n");
    assert_eq!(sites.len(), 2);
    // Inner pair matches first during the stack scan.
    assert_eq!(sites[0].open_pos, 10);
    assert_eq!(sites[1].open_pos, 5);
}

#[test]
fn bracket_delete_end_breaks_parsing() {
    let code = "print(x)\n";
    let sites = BracketMutator::collect(code);
    let mut mutator = BracketMutator::new();
    let applied = mutator.apply(code, &sites[0], "BDelete_end", '(').unwrap();
    assert_eq!(applied.code, "print(x\n");
    assert!(!adapter::parses(&applied.code));
    assert_eq!(applied.record.mutate_type, "BDelete_end");
    assert_eq!(applied.record.line_num, 1);
    assert_eq!(applied.record.original_code, "print(x)");
    assert_eq!(applied.record.mutated_code, "print(x");
    assert!(mutator.state.successful);
}

#[test]
fn bracket_delete_start() {
    let code = "print(x)\n";
    let sites = BracketMutator::collect(code);
    let mut mutator = BracketMutator::new();
    let applied = mutator.apply(code, &sites[0], "BDelete_start", '(').unwrap();
    assert_eq!(applied.code, "printx)\n");
}

#[test]
fn bracket_add_extra_inserts_before_opener() {
    let code = "print(x)\n";
    let sites = BracketMutator::collect(code);
    let mut mutator = BracketMutator::new();
    let applied = mutator.apply(code, &sites[0], "BAdd_extra", '[').unwrap();
    assert_eq!(applied.code, "print[(x)\n");
}

#[test]
fn bracket_replace_swaps_pair_type() {
    let code = "print(x)\n";
    let sites = BracketMutator::collect(code);
    let mut mutator = BracketMutator::new();
    let applied = mutator.apply(code, &sites[0], "BReplace", '{').unwrap();
    assert_eq!(applied.code, "print{x}\n");
}

#[test]
fn bracket_no_site_leaves_state_untouched() {
    let mut mutator = Mutator::new(MutatorKind::Bracket);
    assert!(!mutator.can_mutate("x = 1\n"));
    let mut rng = fastrand::Rng::with_seed(1);
    match mutator.mutate("x = 1\n", &mut rng).unwrap() {
        Outcome::NoSite => {}
        Outcome::Applied(_) => panic!("expected no site"),
    }
    assert!(!mutator.successful());
    assert!(mutator.last_record().is_none());
}

#[test]
fn bracket_mutate_changes_text() {
    let code = "values = [1, 2]\n";
    let mut mutator = Mutator::new(MutatorKind::Bracket);
    assert!(mutator.can_mutate(code));
    let mut rng = fastrand::Rng::with_seed(7);
    match mutator.mutate(code, &mut rng).unwrap() {
        Outcome::Applied(applied) => {
            assert_ne!(applied.code, code);
            assert!(mutator.successful());
        }
        Outcome::NoSite => panic!("expected a site"),
    }
}

// --- Colon ---

#[test]
fn colon_collects_block_headers() {
    let code = "def add(a, b):\n    if a > b:\n        return a\n    return b\n";
    let sites = ColonMutator::collect(code);
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].line, 0);
    assert_eq!(sites[0].colon_pos, 13);
    assert_eq!(sites[1].line, 1);
}

#[test]
fn colon_remove_breaks_parsing() {
    let code = "def add(a, b):\n    return a + b\n";
    let sites = ColonMutator::collect(code);
    let mut mutator = ColonMutator::new();
    let applied = mutator.apply(code, &sites[0], "CRemove").unwrap();
    assert_eq!(applied.code, "def add(a, b)\n    return a + b\n");
    assert!(!adapter::parses(&applied.code));
    assert_eq!(applied.record.description, "Removed colon at line 1");
}

#[test]
fn colon_replace_uses_semicolon() {
    let code = "for i in items:\n    pass\n";
    let sites = ColonMutator::collect(code);
    let mut mutator = ColonMutator::new();
    let applied = mutator.apply(code, &sites[0], "CReplace").unwrap();
    assert_eq!(applied.code, "for i in items;\n    pass\n");
}

#[test]
fn colon_requires_parseable_input() {
    // The header search walks the tree, so unparseable input has no sites.
    assert!(ColonMutator::collect("def broken(:\n").is_empty());
}

// --- Indent ---

#[test]
fn indent_finds_first_indented_line() {
    let code = "def f():\n    x = 1\n    return x\n";
    assert_eq!(IndentMutator::collect(code), vec![1]);
}

#[test]
fn indent_add_four_spaces() {
    let code = "def f():\n    return 1\n";
    let mut mutator = IndentMutator::new();
    let applied = mutator.apply(code, 1, "IAdd_space").unwrap();
    assert_eq!(applied.code, "def f():\n        return 1\n");
    assert_eq!(applied.record.line_num, 2);
}

#[test]
fn indent_remove_four_spaces_saturates() {
    let code = "def f():\n  return 1\n";
    let mut mutator = IndentMutator::new();
    let applied = mutator.apply(code, 1, "IRemove_space").unwrap();
    assert_eq!(applied.code, "def f():\nreturn 1\n");
    assert!(!adapter::parses(&applied.code));
}

#[test]
fn indent_skips_fully_flat_files() {
    assert!(IndentMutator::collect("x = 1\ny = 2\n").is_empty());
}

// --- Quote ---

#[test]
fn quote_finds_earliest_quote_on_first_quoted_line() {
    let code = "x = 1\nname = 'a' + \"b\"\n";
    let sites = QuoteMutator::collect(code);
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].line, 1);
    assert_eq!(sites[0].quote_pos, 7);
    assert!(sites[0].has_single);
}

#[test]
fn quote_single_to_double_converts_whole_line() {
    let code = "msg = 'hi' + 'there'\n";
    let sites = QuoteMutator::collect(code);
    let mut mutator = QuoteMutator::new();
    let applied = mutator.apply(code, &sites[0], "QSingle_to_double").unwrap();
    assert_eq!(applied.code, "msg = \"hi\" + \"there\"\n");
}

#[test]
fn quote_unterminated_drops_first_quote() {
    let code = "msg = \"hello\"\n";
    let sites = QuoteMutator::collect(code);
    let mut mutator = QuoteMutator::new();
    let applied = mutator.apply(code, &sites[0], "QUnterminated").unwrap();
    assert_eq!(applied.code, "msg = hello\"\n");
    assert!(!adapter::parses(&applied.code));
}

#[test]
fn quote_mutate_never_returns_input_unchanged() {
    // A double-quote-only line must not draw the single-to-double subtype.
    let code = "msg = \"hello\"\n";
    let mut mutator = QuoteMutator::new();
    for seed in 0..20 {
        let mut rng = fastrand::Rng::with_seed(seed);
        match mutator.mutate(code, &mut rng).unwrap() {
            Outcome::Applied(applied) => assert_ne!(applied.code, code),
            Outcome::NoSite => panic!("expected a site"),
        }
    }
}

// --- Shared contract ---

#[test]
fn lexical_mutators_report_their_subtypes() {
    assert_eq!(
        Mutator::new(MutatorKind::Bracket).mutate_types(),
        &["BDelete_start", "BDelete_end", "BAdd_extra", "BReplace"]
    );
    assert_eq!(Mutator::new(MutatorKind::Colon).mutate_types(), &["CRemove", "CReplace"]);
    assert_eq!(Mutator::new(MutatorKind::Indent).mutate_types(), &["IAdd_space", "IRemove_space"]);
    assert_eq!(
        Mutator::new(MutatorKind::Quote).mutate_types(),
        &["QSingle_to_double", "QUnterminated"]
    );
}

#[test]
fn init_resets_state_and_is_idempotent() {
    let code = "print(x)\n";
    let mut mutator = Mutator::new(MutatorKind::Bracket);
    let mut rng = fastrand::Rng::with_seed(3);
    let outcome = mutator.mutate(code, &mut rng).unwrap();
    assert!(matches!(outcome, Outcome::Applied(_)));
    assert!(mutator.successful());
    assert!(mutator.last_record().is_some());

    mutator.init();
    assert!(!mutator.successful());
    assert!(mutator.last_record().is_none());

    mutator.init();
    assert!(!mutator.successful());
    assert!(mutator.last_record().is_none());
}
