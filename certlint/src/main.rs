//! certlint: Command-line linter for X.509 certificates.

use anyhow::{Context, Result};
use certlint_lib::{
    display_text, is_pem, parse_pem_chain, pem_to_der, to_json, Certificate, LintOptions,
    LintReport, Linter, Severity, DEFAULT_MAX_DEPTH,
};
use clap::Parser;
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "certlint",
    version,
    about = "Lint X.509 certificates against RFC 5280 and CA/Browser Forum requirements",
    long_about = "certlint checks the DER encoding of each certificate, decides what kind of\n\
                  certificate it is (EV, OV, DV, PS, CS, CA, ...) and applies the rules\n\
                  for that kind. Findings are reported with a syslog-style severity.\n\n\
                  Files may hold one DER certificate or any number of PEM certificates.\n\
                  Directories are scanned for .pem, .der, .crt and .cer files. With no\n\
                  paths the certificate is read from stdin.",
    after_help = "EXIT STATUS:\n\
                  \n  0  every certificate passed --errlevel\
                  \n  1  at least one finding was more severe than --errlevel\
                  \n\nEXAMPLES:\n\
                  \n  certlint cert.pem\
                  \n  certlint --issuer intermediate.pem --expired leaf.pem\
                  \n  certlint --json -r ./certs\
                  \n  certlint --errlevel error --failures-only bundle.pem\
                  \n  cat cert.der | certlint --der"
)]
struct Cli {
    /// Certificate files or directories. Reads from stdin if omitted.
    paths: Vec<PathBuf>,
    /// PEM file with one or more issuing CA certificates
    #[arg(long, value_name = "FILE")]
    issuer: Option<PathBuf>,
    /// Also lint certificates that have already expired
    #[arg(long)]
    expired: bool,
    /// Highest severity that still passes
    #[arg(long, value_name = "LEVEL", default_value = "warning", value_parser = parse_severity)]
    errlevel: Severity,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
    /// Only print certificates that fail --errlevel
    #[arg(long)]
    failures_only: bool,
    /// Recurse into subdirectories
    #[arg(short, long)]
    recurse: bool,
    /// Maximum ASN.1 nesting depth to descend into
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Force DER input parsing (default: auto-detect)
    #[arg(long, conflicts_with = "pem")]
    der: bool,
    /// Force PEM input parsing (default: auto-detect)
    #[arg(long)]
    pem: bool,
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// How to interpret input bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Auto,
    Der,
    Pem,
}

fn parse_severity(s: &str) -> std::result::Result<Severity, String> {
    s.parse()
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Maximum file size for certificate inputs (10 MiB).
const MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            let meta = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat file: {}", path.display()))?;
            if meta.len() > MAX_INPUT_BYTES {
                anyhow::bail!(
                    "File too large ({} bytes, max {} bytes): {}",
                    meta.len(),
                    MAX_INPUT_BYTES,
                    path.display()
                );
            }
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .take(MAX_INPUT_BYTES)
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn load_issuers(path: &Path) -> Result<Vec<Certificate>> {
    let data = read_input(Some(path))?;
    let issuers = parse_pem_chain(&data)
        .with_context(|| format!("Failed to load issuers from {}", path.display()))?;
    info!(count = issuers.len(), path = %path.display(), "loaded issuer certificates");
    Ok(issuers)
}

/// Check if a path has a certificate file extension.
fn is_cert_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("pem") || ext.eq_ignore_ascii_case("der")
            || ext.eq_ignore_ascii_case("crt") || ext.eq_ignore_ascii_case("cer")
    )
}

/// Find all certificate files in a directory, sorted.
fn find_cert_files(dir: &Path, recurse: bool) -> Vec<PathBuf> {
    let walker = if recurse {
        walkdir::WalkDir::new(dir)
    } else {
        walkdir::WalkDir::new(dir).max_depth(1)
    };
    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_cert_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Expand directories into the certificate files they contain.
fn collect_inputs(paths: &[PathBuf], recurse: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(find_cert_files(path, recurse));
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Lint the certificates in `input`. One report per certificate.
fn lint_input(
    linter: &Linter,
    input: &[u8],
    format: InputFormat,
    issuers: &[Certificate],
) -> Vec<LintReport> {
    match format {
        InputFormat::Der => vec![linter.lint_der_with_issuers(input, issuers)],
        InputFormat::Pem if !is_pem(input) => match pem_to_der(input) {
            Ok(der) => vec![linter.lint_der_with_issuers(&der, issuers)],
            Err(e) => vec![LintReport::failed(e.to_string())],
        },
        InputFormat::Pem | InputFormat::Auto => linter.lint_bytes(input, issuers),
    }
}

fn lint_path(
    linter: &Linter,
    path: Option<&Path>,
    format: InputFormat,
    issuers: &[Certificate],
) -> Vec<LintReport> {
    let label = path.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
    let reports = match read_input(path) {
        Ok(data) => lint_input(linter, &data, format, issuers),
        Err(e) => vec![LintReport::failed(format!("{:#}", e))],
    };
    debug!(source = %label, certificates = reports.len(), "linted input");
    reports
        .into_iter()
        .map(|r| r.with_source(label.clone()))
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = if cli.der {
        InputFormat::Der
    } else if cli.pem {
        InputFormat::Pem
    } else {
        InputFormat::Auto
    };

    let issuers = match &cli.issuer {
        Some(path) => load_issuers(path)?,
        None => Vec::new(),
    };

    let linter = Linter::default().with_options(LintOptions {
        max_depth: cli.max_depth,
        check_expired: cli.expired,
        at_time: None,
    });

    let reports: Vec<LintReport> = if cli.paths.is_empty() {
        lint_path(&linter, None, format, &issuers)
    } else {
        let files = collect_inputs(&cli.paths, cli.recurse);
        if files.is_empty() {
            anyhow::bail!("No certificate files found");
        }
        files
            .par_iter()
            .map(|f| lint_path(&linter, Some(f.as_path()), format, &issuers))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    };

    let failures = reports
        .iter()
        .filter(|r| !r.passes(cli.errlevel))
        .count();
    let shown: Vec<LintReport> = reports
        .into_iter()
        .filter(|r| !cli.failures_only || !r.passes(cli.errlevel))
        .collect();

    if cli.json {
        println!("{}", to_json(&shown)?);
    } else {
        for report in &shown {
            print!("{}", display_text(report));
        }
    }

    if failures > 0 {
        debug!(failures, "certificates above the error level");
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn is_cert_file_extensions() {
        assert!(is_cert_file(Path::new("cert.pem")));
        assert!(is_cert_file(Path::new("cert.DER")));
        assert!(is_cert_file(Path::new("cert.crt")));
        assert!(is_cert_file(Path::new("cert.cer")));
        assert!(!is_cert_file(Path::new("cert.key")));
        assert!(!is_cert_file(Path::new("cert")));
    }

    #[test]
    fn find_cert_files_respects_recursion() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.pem"), b"x").unwrap();
        fs::write(tmp.path().join("a.der"), b"x").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/c.crt"), b"x").unwrap();

        let flat = find_cert_files(tmp.path(), false);
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.der", "b.pem"]);

        assert_eq!(find_cert_files(tmp.path(), true).len(), 3);
    }

    #[test]
    fn collect_inputs_keeps_explicit_files() {
        let tmp = tempfile::tempdir().unwrap();
        let explicit = tmp.path().join("leaf.txt");
        fs::write(&explicit, b"x").unwrap();
        fs::write(tmp.path().join("ca.pem"), b"x").unwrap();

        let inputs = collect_inputs(&[explicit.clone(), tmp.path().to_path_buf()], false);
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0], explicit);
    }

    #[test]
    fn read_input_rejects_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.pem");
        assert!(read_input(Some(missing.as_path())).is_err());
    }

    #[test]
    fn lint_path_reports_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("garbage.der");
        fs::write(&path, [0x30, 0x03, 0x02, 0x01]).unwrap();

        let reports = lint_path(&Linter::default(), Some(path.as_path()), InputFormat::Auto, &[]);
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].passes(Severity::Warning));
        assert_eq!(reports[0].source.as_deref(), Some(path.display().to_string().as_str()));
    }

    #[test]
    fn forced_pem_on_der_input_fails() {
        let reports = lint_input(&Linter::default(), &[0x30, 0x00], InputFormat::Pem, &[]);
        assert_eq!(reports.len(), 1);
        assert!(reports[0].findings.is_error());
        assert!(reports[0].cert_type.is_none());
    }

    #[test]
    fn parse_severity_levels() {
        assert_eq!(parse_severity("error").unwrap(), Severity::Error);
        assert_eq!(parse_severity("warn").unwrap(), Severity::Warning);
        assert!(parse_severity("fatal").is_err());
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "certlint",
            "--errlevel",
            "error",
            "--expired",
            "-r",
            "-vv",
            "certs",
        ])
        .unwrap();
        assert_eq!(cli.errlevel, Severity::Error);
        assert!(cli.expired && cli.recurse);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.max_depth, DEFAULT_MAX_DEPTH);
        assert!(Cli::try_parse_from(["certlint", "--der", "--pem"]).is_err());
    }
}
