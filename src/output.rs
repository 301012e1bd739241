//! This module is in charge of outputting the final results to the standard
//! output and to disk

use crate::{
    config::Configuration,
    numeric::Float,
    resacc::Counter,
    resfin::FinalResults,
    Result,
};

use eyre::WrapErr;
use time::{format_description, OffsetDateTime};

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

/// Number of significant digits in file output
const SIG_DIGITS: usize = (Float::DIGITS - 1) as usize;

/// Output the results to the console and to disk
///
/// Two files are written to `directory`: `<analysis>_cutflow.dat` holds the
/// cutflow checkpoints in declaration order, and `<analysis>_signal.dat`
/// holds the signal regions in registration order.
///
pub fn dump_results(
    directory: &Path,
    cfg: &Configuration,
    results: &FinalResults,
    elapsed_time: Duration,
) -> Result<[PathBuf; 2]> {
    results.print();

    let timestamp = timestamp(OffsetDateTime::now_utc())?;

    let name = cfg.analysis.name();
    let cutflow_path = directory.join(format!("{name}_cutflow.dat"));
    let signal_path = directory.join(format!("{name}_signal.dat"));
    for (path, entries) in [
        (&cutflow_path, results.cutflow()),
        (&signal_path, results.regions()),
    ] {
        let write = || -> io::Result<()> {
            let mut file = BufWriter::new(File::create(path)?);
            write_table(&mut file, &timestamp, cfg, results, entries, elapsed_time)?;
            file.flush()
        };
        write().wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Results written");
    }
    Ok([cutflow_path, signal_path])
}

/// Write a header describing the run, then one line per counter
fn write_table(
    file: &mut impl Write,
    timestamp: &str,
    cfg: &Configuration,
    results: &FinalResults,
    entries: &[(String, Counter)],
    elapsed_time: Duration,
) -> io::Result<()> {
    writeln_3p(file, timestamp)?;
    writeln_3p(file, ("Analysis", cfg.analysis.name()))?;
    writeln_3p(file, ("Number of events", cfg.num_events))?;
    writeln_3p(file, ("Random seed", cfg.seed as usize))?;
    writeln_3p(file, ("Sum of weights", results.processed().sum_w))?;
    writeln_3p(file, ("Elapsed time (s)", elapsed_time.as_secs_f64() as Float))?;
    writeln_3p(file, "---------------------------------------------")?;
    writeln!(
        file,
        "{:<50} {:>10} {:>16} {:>16} {:>16}",
        "Name", "N", "Sum_W", "Sum_W2", "Acc"
    )?;
    for (name, counter) in entries {
        writeln!(
            file,
            "{:<50} {:>10} {:>16} {:>16} {:>16}",
            name,
            counter.events,
            engineering(counter.sum_w, SIG_DIGITS),
            engineering(counter.sum_w2, SIG_DIGITS),
            engineering(results.acceptance(counter), SIG_DIGITS),
        )?;
    }
    Ok(())
}

/// Text output facility for the header of result files
fn writeln_3p(file: &mut impl Write, data: impl Write3p) -> io::Result<()> {
    write!(file, " ")?;
    data.write(file)?;
    writeln!(file)
}

/// Trait implemented by things which can be printed in result file headers
trait Write3p: Sized {
    /// Write down `self` to the output file
    fn write(self, file: &mut impl Write) -> io::Result<()>;
}

impl Write3p for &str {
    // Strings work in the usual way
    fn write(self, file: &mut impl Write) -> io::Result<()> {
        write!(file, "{}", self)
    }
}

impl Write3p for usize {
    // Integers work in the usual way too
    fn write(self, file: &mut impl Write) -> io::Result<()> {
        write!(file, "{}", self)
    }
}

impl Write3p for Float {
    // Close approximation of printf's %g
    fn write(self, file: &mut impl Write) -> io::Result<()> {
        write!(file, "{}", engineering(self, SIG_DIGITS))
    }
}

impl<T: Write3p> Write3p for (&str, T) {
    // Key-value output that uses fixed-size columns for better readability
    fn write(self, file: &mut impl Write) -> io::Result<()> {
        write!(file, "{:<31}: ", self.0)?;
        self.1.write(file)
    }
}

/// Format a floating-point number using "engineering" notation
///
/// Analogous to the %g format of the C printf function, this method switches
/// between naive and scientific notation for floating-point numbers when the
/// number being printed becomes so small that printing leading zeroes could end
/// up larger than the scientific notation, or so large that we would be forced
/// to print more significant digits than requested.
///
fn engineering(x: Float, sig_digits: usize) -> String {
    let mut precision = sig_digits - 1;
    if x == 0. {
        // Zero is special because you can't take its log
        "0".to_owned()
    } else {
        // Otherwise, use log to evaluate order of magnitude
        let log_x = x.abs().log10();
        if log_x >= -3. && log_x <= (sig_digits as Float) {
            // Print using naive notation
            //
            // Since Rust's precision controls number of digits after the
            // decimal point, we must adjust it depending on magnitude in order
            // to operate at a constant number of significant digits.
            precision = (precision as isize - log_x.trunc() as isize).max(0) as usize;

            // Numbers smaller than 1 must get one extra digit since the leading
            // zero does not count as a significant digit.
            if log_x < 0. {
                precision += 1
            }

            // People don't normally expect trailing zeros or decimal point in
            // naive notation, but be careful with integer numbers...
            let str_with_zeros = format!("{:.1$}", x, precision);
            if str_with_zeros.contains('.') {
                str_with_zeros
                    .trim_end_matches('0')
                    .trim_end_matches('.')
                    .to_owned()
            } else {
                str_with_zeros
            }
        } else {
            // Print using scientific notation
            format!("{:.1$e}", x, precision)
        }
    }
}

/// Format a date in the style of the output file headers
fn timestamp(date: OffsetDateTime) -> Result<String> {
    let format = format_description::parse_borrowed::<1>(
        "[day]-[month repr:short]-[year repr:last_two]   [hour]:[minute]:[second]",
    )?;
    Ok(date.format(&format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engineering_notation() {
        assert_eq!(engineering(0., 6), "0");
        assert_eq!(engineering(1., 6), "1");
        assert_eq!(engineering(0.25, 6), "0.25");
        assert_eq!(engineering(-1234.5, 6), "-1234.5");
        assert_eq!(engineering(1.5e-7, 3), "1.50e-7");
        assert_eq!(engineering(2.5e12, 3), "2.50e12");
    }

    #[test]
    fn header_timestamp() {
        let date = OffsetDateTime::from_unix_timestamp(1_394_582_400).unwrap();
        assert_eq!(timestamp(date).unwrap(), "12-Mar-14   00:00:00");
    }

    #[test]
    fn table_layout() {
        let results = FinalResults::new(
            Counter {
                events: 4,
                sum_w: 4.,
                sum_w2: 4.,
            },
            vec![(
                "01_Initial".to_owned(),
                Counter {
                    events: 2,
                    sum_w: 2.,
                    sum_w2: 2.,
                },
            )],
            Vec::new(),
        );
        let cfg = Configuration::parse("4\n1\natlas_higg_2013_03\n.true.\n0\n50\n").unwrap();
        let mut buffer = Vec::new();
        write_table(&mut buffer, "now", &cfg, &results, results.cutflow(), Duration::ZERO).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], " now");
        assert!(lines[1].starts_with(" Analysis") && lines[1].ends_with(": atlas_higg_2013_03"));
        let row: Vec<_> = lines.last().unwrap().split_whitespace().collect();
        assert_eq!(row, ["01_Initial", "2", "2", "2", "0.5"]);
    }
}
