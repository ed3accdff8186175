//! Report results back to the runner.
//!
//! Outputs land in the file named by `$GITHUB_OUTPUT`; failures are raised
//! through [workflow commands] on stdout, which the runner scans for.
//!
//! [workflow commands]:
//!     <https://docs.github.com/en/actions/using-workflows/workflow-commands-for-github-actions>

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Publish a step output under `name`, making it available to later steps as
/// `steps.<step>.outputs.<name>`.
pub fn set_output(name: &str, value: &str) -> io::Result<()> {
    match std::env::var("GITHUB_OUTPUT").ok().filter(|p| !p.is_empty()) {
        Some(path) => append_output(Path::new(&path), name, value),
        // Runners old enough to lack the output file still understand the
        // deprecated command form.
        None => {
            println!("::set-output name={}::{}", name, escape_data(value));
            Ok(())
        }
    }
}

fn append_output(path: &Path, name: &str, value: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}={}", name, value)
}

/// Mark the step as failed with a message. The runner annotates the run with
/// the message and fails the job once the process exits non-zero.
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Command data must have `%`, CR and LF escaped, in that order, so the
/// runner can recover the original text.
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
