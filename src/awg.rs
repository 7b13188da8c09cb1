use log::{debug, info, warn};

use awg_website::RenderError;
use snafu::{prelude::*, ErrorCompat, Snafu};

use std::error::Error as StdError;
use std::fs;
use std::io::Write;
use text_diff::print_diff;

use crate::awg::snapshot_reader::*;

pub mod snapshot_reader;

#[derive(Debug, Snafu)]
pub enum AwgError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the snapshot {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error opening the reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing the data file to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error rendering the data file"))]
    Rendering { source: RenderError },

    #[snafu(display("Difference detected between the rendered file and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AwgResult<T> = Result<T, AwgError>;

fn write_output(out: &Option<String>, content: &str) -> AwgResult<()> {
    match out.as_deref() {
        None | Some("") | Some("stdout") => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(content.as_bytes())
                .context(WritingOutputSnafu { path: "stdout" })?;
            handle
                .flush()
                .context(WritingOutputSnafu { path: "stdout" })?;
        }
        Some(path) => {
            fs::write(path, content).context(WritingOutputSnafu { path })?;
            info!("run_render: data file written to {:?}", path);
        }
    }
    Ok(())
}

/// Renders the data file of a snapshot.
///
/// The result goes to `out` (a file path, `stdout` or nothing for the standard
/// output). If a reference file is given, the result must be identical to it.
pub fn run_render(
    input: String,
    out: Option<String>,
    reference: Option<String>,
) -> AwgResult<String> {
    ensure_whatever!(!input.is_empty(), "No snapshot given");
    let snapshot = read_snapshot(&input)?;
    debug!("run_render: snapshot: {:?}", snapshot);
    let result = snapshot.into_election_result();

    let rendered = result.render().context(RenderingSnafu {})?;

    write_output(&out, &rendered)?;

    // The reference file, if provided for comparison
    if let Some(reference_p) = reference {
        let reference_str =
            fs::read_to_string(&reference_p).context(OpeningReferenceSnafu {
                path: reference_p.as_str(),
            })?;
        if reference_str != rendered {
            warn!("Found differences with the reference file {:?}", reference_p);
            print_diff(reference_str.as_str(), rendered.as_str(), "\n");
            return ReferenceMismatchSnafu { path: reference_p }.fail();
        }
        info!("run_render: identical to the reference {:?}", reference_p);
    }

    Ok(rendered)
}

/// Prints an error and its backtrace, if any, to the standard error.
pub fn report_error(e: &AwgError) {
    eprintln!("An error occured: {}", e);
    let mut source = StdError::source(e);
    while let Some(s) = source {
        eprintln!("  caused by: {}", s);
        source = StdError::source(s);
    }
    if let Some(bt) = ErrorCompat::backtrace(e) {
        eprintln!("trace: {}", bt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_path(lpath: &str) -> String {
        format!("{}/{}", env!("CARGO_MANIFEST_DIR"), lpath)
    }

    fn scratch_file(name: &str, content: &str) -> String {
        let p = std::env::temp_dir().join(format!("awgweb_{}_{}", std::process::id(), name));
        fs::write(&p, content).unwrap();
        p.to_string_lossy().to_string()
    }

    #[test]
    fn rethwisch_2018() {
        let _ = env_logger::builder().is_test(true).try_init();
        let res = run_render(
            test_path("test_data/rethwisch_2018.json"),
            Some(scratch_file("rethwisch_2018.php", "")),
            Some(test_path("awg_website/test_data/rethwisch_2018.php")),
        );
        if let Err(e) = &res {
            report_error(e);
        }
        let rendered = res.unwrap();
        assert!(rendered.starts_with("<?php\nfunction data_2018_get_meta() {"));
    }

    #[test]
    fn reference_mismatch() {
        let reference = scratch_file("mismatch.php", "<?php\n");
        let out = scratch_file("mismatch_out.php", "");
        let res = run_render(
            test_path("test_data/rethwisch_2018.json"),
            Some(out),
            Some(reference),
        );
        assert!(matches!(res, Err(AwgError::ReferenceMismatch { .. })));
    }

    #[test]
    fn output_file() {
        let out = scratch_file("out.php", "");
        let rendered = run_render(
            test_path("test_data/rethwisch_2018.json"),
            Some(out.clone()),
            None,
        )
        .unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), rendered);
    }

    #[test]
    fn unknown_candidate() {
        let input = scratch_file(
            "unknown.json",
            r#"{
                "election": { "date": "2018-05-06", "numberOfPostalBallots": 0, "numberOfInvalidBallots": 0 },
                "pollingStations": [ { "name": "Klein Boden", "votes": [["nobody", 1]] } ],
                "nominations": [],
                "parties": []
            }"#,
        );
        let out = scratch_file("unknown_out.php", "");
        let res = run_render(input, Some(out), None);
        assert!(matches!(
            res,
            Err(AwgError::Rendering {
                source: RenderError::UnknownCandidate { .. }
            })
        ));
    }

    #[test]
    fn empty_input() {
        let res = run_render(String::new(), None, None);
        assert!(matches!(res, Err(AwgError::Whatever { .. })));
    }

    #[test]
    fn malformed_snapshot() {
        let input = scratch_file("malformed.json", "{\"election\": 3}");
        let res = run_render(input, None, None);
        assert!(matches!(res, Err(AwgError::ParsingJson { .. })));
    }
}
