use faultgen::record::MutationRecord;

#[test]
fn display_uses_the_fixed_template() {
    let record = MutationRecord::new(
        "OperatorMutator",
        "CompareSubs",
        3,
        "a>b",
        "a>=b",
        "Replaced Gt with GtE in comparison",
    );
    assert_eq!(
        record.to_string(),
        "Mutator: OperatorMutator\n\
         Mutate type: CompareSubs\n\
         Line: 3\n\
         Original: a>b\n\
         Mutated: a>=b\n\
         Description: Replaced Gt with GtE in comparison"
    );
}

#[test]
fn display_keeps_multiline_snippets_verbatim() {
    let record = MutationRecord::new(
        "BracketMutator",
        "BDelete_end",
        1,
        "print(x)",
        "print(x",
        "Deleted closing bracket at line 1",
    );
    let text = record.to_string();
    assert!(text.starts_with("Mutator: BracketMutator\n"));
    assert!(text.contains("Original: print(x)\n"));
    assert!(text.contains("Mutated: print(x\n"));
}

#[test]
fn serializes_and_round_trips() {
    let record = MutationRecord::new(
        "ArrayMutator",
        "IndexIncrement",
        7,
        "[1,2,3][0]",
        "[1,2,3][2]",
        "Array index mutated: 0 -> 2",
    );
    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"mutator_type\":\"ArrayMutator\""));
    assert!(json.contains("\"line_num\":7"));
    let back: MutationRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
