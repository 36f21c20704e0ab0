//! Record set export.
//!
//! Writes a run's records as JSON and CSV, an email-only CSV and a Markdown
//! summary. `records-latest.json` always holds the full merged set so the next
//! run can continue from it.

use crate::error::Result;
use crate::record::{Record, RunResult, SocialPlatform};
use repscout_core::{ExportFormat, Timestamp};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stem of the files holding the most recent merged set.
const LATEST: &str = "records-latest";

const CSV_HEADER: [&str; 17] = [
    "id",
    "firstName",
    "lastName",
    "email",
    "phone",
    "company",
    "city",
    "state",
    "zipCode",
    "profileUrl",
    "personalWebsite",
    "facebook",
    "instagram",
    "linkedin",
    "twitter",
    "scrapedAt",
    "source",
];

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

/// Records as CSV with a header row.
pub fn to_csv(records: &[Record]) -> Result<String> {
    let mut writer = csv_writer();
    writer.write_record(CSV_HEADER)?;
    for r in records {
        let social = |p: SocialPlatform| r.social_links.get(&p).map_or("", String::as_str);
        let scraped_at = r.scraped_at.to_rfc3339();
        writer.write_record([
            r.id.as_str(),
            r.first_name.as_str(),
            r.last_name.as_str(),
            r.email.as_deref().unwrap_or_default(),
            r.phone.as_deref().unwrap_or_default(),
            r.company.as_str(),
            r.city.as_deref().unwrap_or_default(),
            r.state.as_deref().unwrap_or_default(),
            r.zip_code.as_deref().unwrap_or_default(),
            r.profile_url.as_deref().unwrap_or_default(),
            r.personal_website.as_deref().unwrap_or_default(),
            social(SocialPlatform::Facebook),
            social(SocialPlatform::Instagram),
            social(SocialPlatform::Linkedin),
            social(SocialPlatform::Twitter),
            scraped_at.as_str(),
            r.source.as_str(),
        ])?;
    }
    finish(writer)
}

/// `email,name,company` rows for records that carry an email.
pub fn to_emails_csv(records: &[Record]) -> Result<String> {
    let mut writer = csv_writer();
    writer.write_record(["email", "name", "company"])?;
    for r in records {
        if let Some(email) = r.email.as_deref() {
            writer.write_record([email, r.full_name().as_str(), r.company.as_str()])?;
        }
    }
    finish(writer)
}

/// Markdown summary over a batch of runs.
#[must_use]
pub fn summary_report(results: &[RunResult], generated_at: &Timestamp) -> String {
    let total_records: usize = results.iter().map(|r| r.records_found).sum();
    let total_emails: usize = results.iter().map(|r| r.emails_found).sum();
    let succeeded = results.iter().filter(|r| r.success).count();
    #[allow(clippy::cast_precision_loss)]
    let success_rate = if results.is_empty() {
        0.0
    } else {
        succeeded as f64 / results.len() as f64 * 100.0
    };

    let mut by_target: Vec<&RunResult> = results.iter().collect();
    by_target.sort_by(|a, b| b.emails_found.cmp(&a.emails_found));

    let mut report = String::new();
    let _ = writeln!(report, "# Repscout Collection Report");
    let _ = writeln!(report, "Generated: {generated_at}");
    let _ = writeln!(report);
    let _ = writeln!(report, "## Summary");
    let _ = writeln!(report, "- Total Records Found: {total_records}");
    let _ = writeln!(report, "- Total Emails Collected: {total_emails}");
    let _ = writeln!(report, "- Success Rate: {success_rate:.1}%");
    let _ = writeln!(report);
    let _ = writeln!(report, "## Results by Target");
    for r in by_target {
        let _ = writeln!(
            report,
            "- **{}**: {} records, {} emails",
            r.target, r.records_found, r.emails_found
        );
    }
    let _ = writeln!(report);
    let _ = writeln!(report, "## Errors");
    let errors: Vec<&String> = results.iter().flat_map(|r| &r.errors).collect();
    if errors.is_empty() {
        let _ = writeln!(report, "None");
    } else {
        for e in errors {
            let _ = writeln!(report, "- {e}");
        }
    }
    report
}

/// Append `new` records to `existing`, skipping known emails (case-insensitive)
/// and known ids. Returns how many were added.
pub fn merge_records(existing: &mut Vec<Record>, new: &[Record]) -> usize {
    let mut emails: HashSet<String> = existing.iter().filter_map(Record::email_key).collect();
    let mut ids: HashSet<_> = existing.iter().map(|r| r.id.clone()).collect();

    let before = existing.len();
    for record in new {
        let email = record.email_key();
        if email.as_ref().is_some_and(|e| emails.contains(e)) {
            continue;
        }
        // Records carrying an email are identified by it alone
        if email.is_none() && ids.contains(&record.id) {
            continue;
        }
        if let Some(email) = email {
            emails.insert(email);
        }
        ids.insert(record.id.clone());
        existing.push(record.clone());
    }
    existing.len() - before
}

/// Files written by one export.
#[derive(Debug, Clone, Default)]
pub struct ExportedFiles {
    /// Every path written, in write order
    pub paths: Vec<PathBuf>,
}

/// Writes record sets into an output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
    format: ExportFormat,
}

impl Exporter {
    /// Exporter writing `format` into `dir`.
    pub fn new(dir: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The merged set from the previous export; empty when there is none.
    pub fn load_latest(&self) -> Result<Vec<Record>> {
        let path = self.dir.join(format!("{LATEST}.json"));
        if !path.exists() {
            debug!(path = %path.display(), "no previous record set");
            return Ok(Vec::new());
        }
        let records: Vec<Record> = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        info!(path = %path.display(), records = records.len(), "loaded previous record set");
        Ok(records)
    }

    /// Write the full record set and the run summary, stamped with `stamp`.
    pub fn export(
        &self,
        records: &[Record],
        results: &[RunResult],
        stamp: &Timestamp,
    ) -> Result<ExportedFiles> {
        std::fs::create_dir_all(&self.dir)?;
        let tag = stamp.file_stamp();
        let mut files = ExportedFiles::default();

        let json = serde_json::to_string_pretty(records)?;
        if self.format.includes_json() {
            files.paths.push(self.write(&format!("records-{tag}.json"), &json)?);
        }
        // Always kept for the next incremental run
        files.paths.push(self.write(&format!("{LATEST}.json"), &json)?);
        if self.format.includes_csv() {
            let csv = to_csv(records)?;
            files.paths.push(self.write(&format!("records-{tag}.csv"), &csv)?);
            files.paths.push(self.write(&format!("{LATEST}.csv"), &csv)?);
        }
        files
            .paths
            .push(self.write(&format!("records-{tag}-emails.csv"), &to_emails_csv(records)?)?);
        files
            .paths
            .push(self.write(&format!("report-{tag}.md"), &summary_report(results, stamp))?);

        info!(
            dir = %self.dir.display(),
            records = records.len(),
            files = files.paths.len(),
            "export written"
        );
        Ok(files)
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.join(name);
        std::fs::write(&path, contents)?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote file");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CandidateRecord;
    use repscout_targets::TargetRegistry;
    use std::time::Duration;
    use tempfile::TempDir;

    fn record(first: &str, last: &str, email: Option<&str>) -> Record {
        let registry = TargetRegistry::builtin().expect("builtin catalog");
        let mut candidate = CandidateRecord {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            email: email.map(str::to_string),
            city: Some("Austin".to_string()),
            ..CandidateRecord::default()
        };
        candidate
            .social_links
            .insert(SocialPlatform::Instagram, "https://instagram.com/x".to_string());
        Record::from_candidate(candidate, registry.find_by_slug("avon").expect("avon present"))
    }

    #[test]
    fn test_to_csv() {
        let csv = to_csv(&[record("Jane", "Doe, Jr", Some("jane@gmail.com"))]).expect("write csv");
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER.join(",").as_str()));
        let row = lines.next().expect("data row");
        assert!(row.contains(",Jane,\"Doe, Jr\",jane@gmail.com,,Avon,Austin,"));
        assert!(row.contains(",,https://instagram.com/x,,,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_to_csv_reads_back_with_seventeen_columns() {
        let mut tricky = record("Jane", "say \"hi\"", Some("jane@gmail.com"));
        tricky.city = Some("two\nlines".to_string());
        let csv = to_csv(&[tricky]).expect("write csv");

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().expect("header row").clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADER.to_vec());
        let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>().expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 17);
        assert_eq!(&rows[0][2], "say \"hi\"");
        assert_eq!(&rows[0][6], "two\nlines");
        assert_eq!(&rows[0][12], "https://instagram.com/x");
    }

    #[test]
    fn test_to_emails_csv() {
        let csv = to_emails_csv(&[
            record("Jane", "Doe", Some("jane@gmail.com")),
            record("Bo", "", None),
        ])
        .expect("write csv");
        assert_eq!(csv, "email,name,company\njane@gmail.com,Jane Doe,Avon\n");
    }

    #[test]
    fn test_summary_report() {
        let results = vec![
            RunResult::new(
                "Avon",
                true,
                vec![record("Jane", "Doe", Some("jane@gmail.com"))],
                vec![],
                Duration::from_secs(1),
            ),
            RunResult::new(
                "Tupperware",
                true,
                vec![
                    record("A", "A", Some("a@gmail.com")),
                    record("B", "B", Some("b@gmail.com")),
                ],
                vec![],
                Duration::from_secs(1),
            ),
            RunResult::new(
                "Scentsy",
                false,
                vec![],
                vec!["[Scentsy] Failed to load locator".to_string()],
                Duration::from_secs(1),
            ),
        ];
        let report = summary_report(&results, &Timestamp::now());
        assert!(report.contains("- Total Records Found: 3"));
        assert!(report.contains("- Total Emails Collected: 3"));
        assert!(report.contains("- Success Rate: 66.7%"));
        let tupperware = report.find("**Tupperware**").expect("tupperware line");
        let avon = report.find("**Avon**").expect("avon line");
        assert!(tupperware < avon);
        assert!(report.contains("- [Scentsy] Failed to load locator"));

        let empty = summary_report(&[], &Timestamp::now());
        assert!(empty.contains("- Success Rate: 0.0%"));
        assert!(empty.contains("## Errors\nNone"));
    }

    #[test]
    fn test_merge_records() {
        let mut existing = vec![record("Jane", "Doe", Some("jane@gmail.com")), record("Bo", "Lee", None)];
        let added = merge_records(
            &mut existing,
            &[
                record("Janet", "Doe", Some("JANE@gmail.com")),
                record("Bo", "Lee", None),
                record("Bo", "Lee", Some("bo@gmail.com")),
                record("Cy", "Ng", None),
            ],
        );
        assert_eq!(added, 2);
        assert_eq!(existing.len(), 4);
    }

    #[test]
    fn test_export_and_reload() {
        let dir = TempDir::new().expect("temp dir");
        let exporter = Exporter::new(dir.path().join("out"), ExportFormat::Both);
        assert!(exporter.load_latest().expect("load empty").is_empty());

        let records = vec![record("Jane", "Doe", Some("jane@gmail.com"))];
        let stamp = Timestamp::now();
        let files = exporter.export(&records, &[], &stamp).expect("export");
        assert_eq!(files.paths.len(), 6);
        for path in &files.paths {
            assert!(path.exists(), "{} missing", path.display());
        }
        let tag = stamp.file_stamp();
        assert!(dir.path().join("out").join(format!("report-{tag}.md")).exists());
        assert!(dir.path().join("out").join(format!("records-{tag}-emails.csv")).exists());

        let reloaded = exporter.load_latest().expect("reload");
        assert_eq!(reloaded, records);
    }

    #[test]
    fn test_export_json_only() {
        let dir = TempDir::new().expect("temp dir");
        let exporter = Exporter::new(dir.path(), ExportFormat::Json);
        let files = exporter.export(&[], &[], &Timestamp::now()).expect("export");
        assert_eq!(files.paths.len(), 4);
        assert!(!dir.path().join("records-latest.csv").exists());
    }

    #[test]
    fn test_export_csv_only_keeps_latest_json() {
        let dir = TempDir::new().expect("temp dir");
        let exporter = Exporter::new(dir.path(), ExportFormat::Csv);
        let records = vec![record("Jane", "Doe", Some("jane@gmail.com"))];
        let files = exporter.export(&records, &[], &Timestamp::now()).expect("export");
        assert_eq!(files.paths.len(), 5);
        assert_eq!(exporter.load_latest().expect("reload").len(), 1);
    }
}
