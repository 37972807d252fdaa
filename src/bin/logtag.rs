use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

use logtweak::extract::DEFAULT_SEPARATOR;
use logtweak::input::FileOrStdin;
use logtweak::tag::DEFAULT_TAG_SEPARATOR;
use logtweak::{cli, load_rules, output, Preset, Schema, Tagger};

/// Tag log records with the rules of a JSON rule file. The tags of the
/// matching rules are appended to each record as one more field.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Input field separator
    #[clap(long, value_name = "SEP", default_value = DEFAULT_SEPARATOR)]
    ifs: String,

    /// Output field separator
    #[clap(long, value_name = "SEP", default_value = DEFAULT_SEPARATOR)]
    ofs: String,

    /// Comma separated names of the input fields
    #[clap(long, value_name = "COLS", default_value = "")]
    cols: String,

    /// Separator between the tags of a record
    #[clap(long, value_name = "SEP", default_value = DEFAULT_TAG_SEPARATOR)]
    ts: String,

    /// JSON rule file. Without one every tag field is empty
    #[clap(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    rules: Option<Utf8PathBuf>,

    /// Read the output of `logtweak --openbsd-httpd-fw`
    #[clap(long, conflicts_with = "cols")]
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
    anyhow::ensure!(!args.ifs.is_empty(), "input field separator is empty");

    let schema = if args.openbsd_httpd_fw {
        Schema::new(Preset::OpenbsdHttpdFw.output_columns().iter().copied())
    } else {
        Schema::parse(&args.cols)
    };
    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => Vec::new(),
    };

    tracing::debug!(columns = schema.columns().len(), rules = rules.len(), "configuration loaded");

    let tagger = Tagger::new(schema, rules, &args.ts);
    let mut out = io::BufWriter::with_capacity(65536, io::stdout());

    for path in args.input {
        let input = FileOrStdin::from_path(path);
        input.reader()?.for_each_line(|number, line| {
            let fields = line.split(args.ifs.as_str()).map(str::to_owned).collect();
            match tagger.tag(fields) {
                Ok(tagged) => output::write_fields(&mut out, &tagged, &args.ofs)?,
                Err(err) => {
                    tracing::error!(input = %input, line = number, error = %err, "schema mismatch");
                }
            }
            Ok(())
        })?;
        out.flush()?;
    }

    Ok(())
}
