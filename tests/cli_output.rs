// tests/cli_output.rs
use rexpect::spawn;
use std::fs;

const REPORT_CSV: &str = "code,service,subCountStart,subCountEnd,revenue\n\
                          A1,Tv,10,15,$1000.00\n\
                          B2,Radio,8,4,$350.00\n";

fn revchonk(args: &str) -> String {
    format!("{} {}", env!("CARGO_BIN_EXE_revchonk"), args)
}

#[test]
fn csv_report_prints_totals_and_views() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.csv");
    fs::write(&input, REPORT_CSV).unwrap();

    let mut p = spawn(&revchonk(&format!("{} --top 1", input.display())), Some(10000)).unwrap();
    p.exp_string("Total revenue:     1,350.00").unwrap();
    p.exp_string("Total subscribers: 19").unwrap();
    p.exp_string("Summary by Service:").unwrap();
    p.exp_string("Top decliners:").unwrap();
    p.exp_string("B2").unwrap();
    p.exp_eof().unwrap();
}

#[test]
fn export_flag_writes_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, REPORT_CSV).unwrap();

    let mut p = spawn(
        &revchonk(&format!("{} --export {}", input.display(), output.display())),
        Some(10000),
    )
    .unwrap();
    p.exp_string("Exported table to").unwrap();
    p.exp_eof().unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("Code,Service,Start Subs,End Subs,Change,Revenue,Net Adds\n"));
    assert!(written.contains("A1,Tv,10,15,5,1000.00,5"));
}

#[test]
fn unmatched_text_points_at_raw_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("letter.csv");
    fs::write(&input, "note\n").unwrap();

    let mut p = spawn(&revchonk(&input.display().to_string()), Some(10000)).unwrap();
    p.exp_string("No rows detected").unwrap();
    p.exp_string("--raw-text").unwrap();
    p.exp_eof().unwrap();
}

#[test]
fn corrupt_pdf_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.pdf");
    fs::write(&input, b"%PDF-1.4 truncated").unwrap();

    let mut p = spawn(&revchonk(&input.display().to_string()), Some(10000)).unwrap();
    p.exp_string("Failed to process").unwrap();
    p.exp_string("unreadable").unwrap();
    p.exp_eof().unwrap();
}

#[test]
fn help_describes_every_flag() {
    let mut p = spawn(&revchonk("--help"), Some(10000)).unwrap();
    p.exp_string("--raw-text").unwrap();
    p.exp_string("Debug logging").unwrap();
    p.exp_eof().unwrap();
}
