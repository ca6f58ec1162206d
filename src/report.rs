use std::io::{self, Write};

use crate::common::{RunConfig, DATE_FORMAT};

const BANNER: &str = "****************************************************";

/// Prints the run summary when the run is verbose; otherwise writes nothing.
pub fn report<W: Write>(config: &RunConfig, record_count: usize, mut out: W) -> io::Result<()> {
    if !config.verbose {
        return Ok(());
    }

    writeln!(out, "\n{}", BANNER)?;
    writeln!(out, "\n     File name created: {}", config.output_file.display())?;
    writeln!(out, "     Number of records: {}", record_count)?;
    writeln!(
        out,
        "     For Date Range: {} TO {}\n",
        config.window.start_date.format(DATE_FORMAT),
        config.window.end_date.format(DATE_FORMAT)
    )?;
    writeln!(out, "{}\n", BANNER)?;

    out.flush()
}
