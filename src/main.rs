use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

use ip2loc::GeoDb;
use logtweak::extract::DEFAULT_SEPARATOR;
use logtweak::input::FileOrStdin;
use logtweak::window::{DEFAULT_BEGIN, DEFAULT_END};
use logtweak::{cli, ExtractorBuilder, Outcome, Preset, Schema, Transformer, Window};

/// Normalize web server access logs: keep the records of a time window,
/// geolocate their client address and print them in a fixed shape.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Input field separator, used when no regexp extracts the fields
    #[clap(long, value_name = "SEP", default_value = DEFAULT_SEPARATOR)]
    ifs: String,

    /// Output field separator
    #[clap(long, value_name = "SEP", default_value = DEFAULT_SEPARATOR)]
    ofs: String,

    /// IP location database (CSV: from,to,code,name)
    #[clap(
        long,
        value_name = "FILE",
        value_hint = clap::ValueHint::FilePath,
        default_value = "/etc/ip2location.csv",
        env = "IPLOC_DB"
    )]
    ipdb: Utf8PathBuf,

    /// Drop lines matching this regexp (repeatable)
    #[clap(long, value_name = "RE")]
    skip: Vec<String>,

    /// First day to keep (YYYY-MM-DD, UTC)
    #[clap(long, value_name = "DATE", default_value = DEFAULT_BEGIN)]
    begin: String,

    /// Last day to keep (YYYY-MM-DD, UTC)
    #[clap(long, value_name = "DATE", default_value = DEFAULT_END)]
    end: String,

    /// Extract fields with the capture groups of this regexp instead of splitting
    #[clap(long, value_name = "RE")]
    ire: Option<String>,

    /// Comma separated names of the input fields
    #[clap(long, value_name = "COLS")]
    cols: Option<String>,

    /// Read OpenBSD httpd(8) logs in the forwarded style
    #[clap(long, conflicts_with = "ire")]
    openbsd_httpd_fw: bool,

    /// Input file(s) to process. Leave empty or use "-" to read from stdin
    #[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    input: Vec<Utf8PathBuf>,
}

fn main() -> ExitCode {
    cli::init_logging();
    cli::exit_code(run(Args::parse()))
}

fn run(mut args: Args) -> Result<()> {
    if args.input.is_empty() {
        args.input.push(Utf8PathBuf::from("-"));
    }

    let preset = Preset::OpenbsdHttpdFw;

    let mut builder = ExtractorBuilder::new();
    builder.separator(&args.ifs).output_separator(&args.ofs);
    if args.openbsd_httpd_fw {
        builder
            .pattern(preset.input_pattern())
            .skips(preset.skip_patterns());
    } else if let Some(re) = &args.ire {
        builder.pattern(re);
    }
    builder.skips(&args.skip);
    let extractor = builder.build()?;

    let schema = match &args.cols {
        Some(cols) => Schema::parse(cols),
        None => Schema::new(preset.input_columns().iter().copied()),
    };
    let window = Window::from_dates(&args.begin, &args.end)?;
    let db = GeoDb::open(&args.ipdb).context("cannot load IP location database")?;

    tracing::debug!(
        columns = schema.columns().len(),
        ranges = db.len(),
        begin = %window.begin(),
        end = %window.end(),
        "configuration loaded"
    );

    let transformer = Transformer::new(extractor, schema, window, db)?;
    let mut out = io::BufWriter::with_capacity(65536, io::stdout());

    for path in args.input {
        let input = FileOrStdin::from_path(path);
        input.reader()?.for_each_line(|number, line| {
            match transformer.process(line) {
                Ok(Outcome::Record(record)) => record.write(&mut out, &args.ofs)?,
                Ok(Outcome::Skipped | Outcome::Dropped) => {}
                Err(err) if err.is_schema() => {
                    tracing::error!(input = %input, line = number, error = %err, "schema mismatch");
                }
                Err(err) => {
                    tracing::warn!(input = %input, line = number, error = %err, "dropping line");
                }
            }
            Ok(())
        })?;
        out.flush()?;
    }

    Ok(())
}
