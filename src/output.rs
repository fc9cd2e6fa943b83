use console::Style;

use crate::pipeline::GenerateReport;
use crate::record::MutationRecord;

pub fn print_error(msg: &str) {
    let style = Style::new().red().bold();
    eprintln!("{} {}", style.apply_to("✗"), msg);
}

pub fn print_success(msg: &str) {
    let style = Style::new().green().bold();
    println!("{} {}", style.apply_to("✓"), msg);
}

pub fn print_probe(file: &str, results: &[(&'static str, bool)]) {
    println!("{}", file);
    for (label, can) in results {
        if *can {
            let yes = Style::new().green();
            println!("  {} {}", yes.apply_to("+"), label);
        } else {
            let no = Style::new().dim();
            println!("  {} {}", no.apply_to("-"), no.apply_to(label));
        }
    }
}

pub fn print_generate_report(report: &GenerateReport) {
    let style = Style::new().green().bold();
    println!(
        "{} {} files, {} samples written (seed {})",
        style.apply_to("✓"),
        report.files,
        report.samples_written,
        report.seed,
    );
    if report.samples_rejected > 0 {
        let dim = Style::new().dim();
        println!(
            "  {} {} samples rejected by the validator",
            dim.apply_to("·"),
            report.samples_rejected,
        );
    }
}

pub fn print_sample(record: &MutationRecord, mutated: &str) {
    let head = Style::new().cyan().bold();
    let op_style = Style::new().magenta();
    let dim = Style::new().dim();
    println!(
        "{} {} at line {}: {} {} {}",
        head.apply_to(format!("[{}]", record.mutator_type)),
        record.mutate_type,
        record.line_num,
        op_style.apply_to(&record.original_code),
        dim.apply_to("->"),
        op_style.apply_to(&record.mutated_code),
    );
    println!("  {}", dim.apply_to(&record.description));
    println!();
    println!("{}", mutated);
}
