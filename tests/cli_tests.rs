//! Command-line behavior of the `vcf2dtc` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE_VCF: &str = "##fileformat=VCFv4.2\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n\
chr1\t100\t.\tA\tG\t50\tPASS\t.\tGT:FT\t0/1:LowGQ\n\
chr1\t500\t.\tC\tT\t99\tPASS\t.\tGT\t1/1\n\
chr1\t900\t.\tG\tA\t99\tPASS\t.\tGT\t0/1\n\
chrUn_KN707904v1\t10\t.\tA\tG\t50\tPASS\t.\tGT\t0/1\n";

const PANEL_VCF: &str = "##fileformat=VCFv4.2\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
1\t500\trs123\tC\tT\t.\t.\t.\n";

fn vcf2dtc() -> Command {
    Command::cargo_bin("vcf2dtc").unwrap()
}

/// Lay out `<root>/vcf/NA12878.vcf` and `<root>/panel.vcf`
fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("vcf")).unwrap();
    fs::write(dir.path().join("vcf/NA12878.vcf"), SAMPLE_VCF).unwrap();
    fs::write(dir.path().join("panel.vcf"), PANEL_VCF).unwrap();
    dir
}

fn run_args(root: &Path) -> Vec<String> {
    vec![
        "run".to_string(),
        root.join("vcf").display().to_string(),
        root.join("out").display().to_string(),
        "GRCh38".to_string(),
        "NA12878.vcf".to_string(),
        "--dbsnp".to_string(),
        root.join("panel.vcf").display().to_string(),
    ]
}

#[test]
fn test_run_writes_genotype_file() {
    let dir = setup();

    vcf2dtc()
        .args(run_args(dir.path()))
        .assert()
        .success()
        .stdout(predicate::str::contains("reconcile: kept=0 updated=1 dropped=1"))
        .stdout(predicate::str::contains("NA12878.23andme.txt"));

    let output = fs::read_to_string(dir.path().join("out/NA12878.23andme.txt")).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[0].starts_with("# This data file generated by vcf2dtc at: "));
    assert_eq!(lines[1], "# rsid\tchromosome\tposition\tgenotype");
    assert_eq!(&lines[2..], &["rs123\t1\t500\tTT"]);
    assert!(!dir.path().join("out/NA12878_modified_format.vcf").exists());
}

#[test]
fn test_run_keeps_intermediates() {
    let dir = setup();

    vcf2dtc()
        .args(run_args(dir.path()))
        .arg("--keep-intermediates")
        .assert()
        .success();

    for name in [
        "NA12878_modified_format.vcf",
        "NA12878_modified_format_hardfiltered.vcf",
        "NA12878.rsid_checked.vcf",
    ] {
        assert!(dir.path().join("out").join(name).is_file(), "{name} missing");
    }
}

#[test]
fn test_run_json_report() {
    let dir = setup();

    let assert = vcf2dtc()
        .arg("--format")
        .arg("json")
        .args(run_args(dir.path()))
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let stages = json["stages"].as_array().unwrap();
    assert_eq!(stages.len(), 4);
    assert_eq!(stages[0]["stage"], "normalize");
    assert_eq!(stages[0]["dropped_contig"], 1);
    assert_eq!(stages[3]["stage"], "emit");
    assert_eq!(stages[3]["written"], 1);
    assert_eq!(json["malformed"], 0);
}

#[test]
fn test_run_tsv_report() {
    let dir = setup();

    vcf2dtc()
        .args(["--format", "tsv"])
        .args(run_args(dir.path()))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("stage\tcounter\tvalue\n"))
        .stdout(predicate::str::contains("hard_filter\tpassed\t2\n"));
}

#[test]
fn test_invalid_genome_build_is_rejected() {
    let dir = setup();
    let mut args = run_args(dir.path());
    args[3] = "hg19".to_string();

    vcf2dtc()
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'hg19'"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_arguments_are_rejected() {
    vcf2dtc()
        .args(["run", "/data/vcf", "/data/out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_input_fails_with_path() {
    let dir = setup();
    let mut args = run_args(dir.path());
    args[4] = "absent.vcf".to_string();

    vcf2dtc()
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.vcf"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_default_database_fails() {
    let dir = setup();

    vcf2dtc()
        .arg("run")
        .arg(dir.path().join("vcf"))
        .arg(dir.path().join("out"))
        .arg("GRCh37")
        .arg("NA12878.vcf")
        .arg("--dbsnp-dir")
        .arg(dir.path().join("dbSNP"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Homo_sapiens_assembly19.dbsnplatest.vcf.gz",
        ));
}

#[test]
fn test_single_stage_commands_chain() {
    let dir = setup();
    let root = dir.path();
    let input = root.join("vcf/NA12878.vcf");
    let normalized = root.join("normalized.vcf");
    let filtered = root.join("filtered.vcf");
    let annotated = root.join("annotated.vcf");
    let genotypes = root.join("genotypes.txt");

    vcf2dtc()
        .arg("normalize")
        .arg(&input)
        .arg("-o")
        .arg(&normalized)
        .assert()
        .success()
        .stdout(predicate::str::contains("normalize: seen=4 retained=3"));

    vcf2dtc()
        .arg("hard-filter")
        .arg(&normalized)
        .arg("-o")
        .arg(&filtered)
        .assert()
        .success()
        .stdout(predicate::str::contains("hard_filter: processed=3 passed=2"));

    vcf2dtc()
        .arg("annotate-rsids")
        .arg(&filtered)
        .arg("--dbsnp")
        .arg(root.join("panel.vcf"))
        .arg("-o")
        .arg(&annotated)
        .assert()
        .success();

    vcf2dtc()
        .arg("emit")
        .arg(&annotated)
        .arg("-o")
        .arg(&genotypes)
        .assert()
        .success()
        .stdout(predicate::str::contains("emit: written=1 no_calls=0"));

    let chained = fs::read_to_string(&genotypes).unwrap();
    assert!(chained.ends_with("rs123\t1\t500\tTT\n"));
}

#[test]
fn test_single_stage_missing_input() {
    let dir = TempDir::new().unwrap();

    vcf2dtc()
        .arg("normalize")
        .arg(dir.path().join("absent.vcf"))
        .arg("-o")
        .arg(dir.path().join("out.vcf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));

    assert!(!dir.path().join("out.vcf").exists());
}
