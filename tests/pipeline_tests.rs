//! End-to-end pipeline behavior through the library API.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

use vcf2dtc::database::{self, DatabaseEntry, MemoryDatabase};
use vcf2dtc::pipeline::{
    DtcWriter, FilterNormalizer, HardFilter, Pipeline, RsidReconciler, StageSummary, VcfWriter,
};
use vcf2dtc::{GenomeBuild, PipelineConfig, PipelineError};

const HEADER: &str = "##fileformat=VCFv4.2\n\
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
##FORMAT=<ID=FT,Number=1,Type=String,Description=\"Sample filter\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA12878\n";

fn write_vcf(dir: &Path, name: &str, records: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut text = HEADER.to_string();
    for record in records {
        text.push_str(record);
        text.push('\n');
    }
    fs::write(&path, text).unwrap();
    path
}

fn data_rows(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn normalize(input: &Path, output: &Path) {
    let mut sink = VcfWriter::create(output).unwrap();
    Pipeline::new()
        .stage(FilterNormalizer::new())
        .run_path(input, &mut sink)
        .unwrap();
}

#[test]
fn test_normalizer_output_is_byte_identical_on_rerun() {
    let dir = TempDir::new().unwrap();
    let input = write_vcf(
        dir.path(),
        "in.vcf",
        &[
            "chr1\t100\t.\tA\tG\t50\tPASS\t.\tGT:FT\t0/1:LowGQ",
            "chr7\t200\t.\tC\tT\t50\tPASS\t.\tGT\t0/1",
            "chrX\t300\t.\tG\tA\t50\tq10\t.\tGT:FT\t1:LowGQ",
            "chrY\t400\t.\tT\tC\t50\tPASS\t.\tGT\t1",
            "chrM\t500\t.\tA\tG\t50\tPASS\t.\tGT\t1",
            "chrUn_KN707904v1\t600\t.\tA\tG\t50\tPASS\t.\tGT\t0/1",
        ],
    );

    let once = dir.path().join("once.vcf");
    let twice = dir.path().join("twice.vcf");
    normalize(&input, &once);
    normalize(&once, &twice);

    assert_eq!(fs::read(&once).unwrap(), fs::read(&twice).unwrap());
    assert_eq!(
        data_rows(&once),
        vec![
            "1\t100\t.\tA\tG\t50\tLowGQ\t.\tGT:FT\t0/1:LowGQ",
            "7\t200\t.\tC\tT\t50\tPASS\t.\tGT\t0/1",
            "23\t300\t.\tG\tA\t50\tq10;LowGQ\t.\tGT:FT\t1:LowGQ",
            "24\t400\t.\tT\tC\t50\tPASS\t.\tGT\t1",
            "25\t500\t.\tA\tG\t50\tPASS\t.\tGT\t1",
        ]
    );
}

#[test]
fn test_hard_filter_output_is_a_pass_only_subset() {
    let dir = TempDir::new().unwrap();
    let input = write_vcf(
        dir.path(),
        "in.vcf",
        &[
            "chr1\t100\t.\tA\tG\t50\tPASS\t.\tGT:FT\t0/1:LowGQ",
            "chr1\t200\t.\tC\tT\t50\tPASS\t.\tGT\t0/1",
            "chr2\t300\t.\tG\tA\t50\tq10\t.\tGT\t0/1",
        ],
    );
    let normalized = dir.path().join("normalized.vcf");
    normalize(&input, &normalized);

    let filtered = dir.path().join("filtered.vcf");
    let mut sink = VcfWriter::create(&filtered).unwrap();
    Pipeline::new()
        .stage(HardFilter::new())
        .run_path(&normalized, &mut sink)
        .unwrap();

    let before = data_rows(&normalized);
    let after = data_rows(&filtered);
    assert_eq!(after, vec!["1\t200\t.\tC\tT\t50\tPASS\t.\tGT\t0/1"]);
    assert!(after.iter().all(|row| before.contains(row)));
    assert!(after.iter().all(|row| row.split('\t').nth(6) == Some("PASS")));
}

#[test]
fn test_low_quality_record_never_reaches_output() {
    let dir = TempDir::new().unwrap();
    let input = write_vcf(
        dir.path(),
        "in.vcf",
        &["chr1\t100\t.\tA\tG\t50\tPASS\t.\tGT:FT\t0/1:LowGQ"],
    );
    let db = MemoryDatabase::from_entries([DatabaseEntry {
        chromosome: "1".to_string(),
        position: 100,
        reference: "A".to_string(),
        alternates: vec!["G".to_string()],
        id: Some("rs42".to_string()),
    }]);

    let output = dir.path().join("out.txt");
    let mut sink = DtcWriter::create(&output).unwrap();
    let report = Pipeline::new()
        .stage(FilterNormalizer::new())
        .stage(HardFilter::new())
        .stage(RsidReconciler::new(Box::new(db)))
        .run_path(&input, &mut sink)
        .unwrap();

    assert!(data_rows(&output).is_empty());
    assert_eq!(
        report.stages.last().map(StageSummary::counts),
        Some(vec![("written", 0), ("no_calls", 0)])
    );
}

#[test]
fn test_reconciled_record_becomes_a_genotype_row() {
    let dir = TempDir::new().unwrap();
    let input = write_vcf(
        dir.path(),
        "in.vcf",
        &[
            "1\t500\t.\tC\tT\t99\tPASS\t.\tGT\t1/1",
            "1\t501\t.\tG\tA\t99\tPASS\t.\tGT\t0/1",
        ],
    );
    let dbsnp = dir.path().join("panel.vcf");
    fs::write(
        &dbsnp,
        "##fileformat=VCFv4.2\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
1\t500\trs123\tC\tT\t.\t.\t.\n\
1\t501\trs124\tG\tC\t.\t.\t.\n",
    )
    .unwrap();

    let rsid_checked = dir.path().join("checked.vcf");
    let output = dir.path().join("out.txt");
    let mut sink = DtcWriter::create(&output).unwrap();
    Pipeline::new()
        .stage(FilterNormalizer::new())
        .stage(HardFilter::new())
        .stage(RsidReconciler::new(database::open(&dbsnp).unwrap()))
        .tap(VcfWriter::create(&rsid_checked).unwrap())
        .run_path(&input, &mut sink)
        .unwrap();

    assert_eq!(data_rows(&output), vec!["rs123\t1\t500\tTT"]);
    assert!(data_rows(&rsid_checked)
        .iter()
        .all(|row| row.split('\t').nth(2) != Some(".")));
}

#[test]
fn test_gzipped_input_is_read_transparently() {
    let dir = TempDir::new().unwrap();
    let input_dir = dir.path().join("vcf");
    fs::create_dir_all(&input_dir).unwrap();

    let mut encoder = GzEncoder::new(
        fs::File::create(input_dir.join("NA12878.vcf.gz")).unwrap(),
        Compression::default(),
    );
    encoder.write_all(HEADER.as_bytes()).unwrap();
    encoder
        .write_all(b"chr2\t1000\trs77\tT\tTA\t60\tPASS\t.\tGT\t0/1\n")
        .unwrap();
    encoder.finish().unwrap();

    let dbsnp = dir.path().join("panel.vcf");
    fs::write(&dbsnp, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n").unwrap();

    let config = PipelineConfig::new(
        &input_dir,
        &dir.path().join("out"),
        GenomeBuild::Grch37,
        "NA12878.vcf.gz",
    )
    .unwrap()
    .with_dbsnp(dbsnp);
    config.run().unwrap();

    assert!(config.output_path().ends_with("NA12878.23andme.txt"));
    assert_eq!(data_rows(&config.output_path()), vec!["rs77\t2\t1000\tDI"]);
}

#[test]
fn test_bgzipped_database_requires_an_index() {
    let dir = TempDir::new().unwrap();
    let input_dir = dir.path().join("vcf");
    fs::create_dir_all(&input_dir).unwrap();
    write_vcf(&input_dir, "sample.vcf", &["1\t1\t.\tA\tG\t.\tPASS\t.\tGT\t0/1"]);

    let dbsnp_dir = dir.path().join("dbSNP");
    fs::create_dir_all(&dbsnp_dir).unwrap();
    fs::write(dbsnp_dir.join(GenomeBuild::Grch38.dbsnp_filename()), b"").unwrap();

    let config = PipelineConfig::new(
        &input_dir,
        &dir.path().join("out"),
        GenomeBuild::Grch38,
        "sample.vcf",
    )
    .unwrap()
    .with_dbsnp_dir(&dbsnp_dir);

    let err = config.run().unwrap_err();
    assert!(matches!(err, PipelineError::Database(_)));
    assert!(err.to_string().contains(".tbi"));
    assert!(!config.output_path().exists());
}
