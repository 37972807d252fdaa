use anyhow::{Context, Error, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use ip2loc::{decode, encode, GeoDb, UNKNOWN_COUNTRY};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// IP location database (ip2location CSV)
    #[clap(
        long,
        value_name = "FILE",
        default_value = "/etc/ip2location.csv",
        env = "IPLOC_DB",
        value_hint = clap::ValueHint::FilePath
    )]
    ipdb: Utf8PathBuf,

    /// Print the two-letter country code instead of the country name
    #[clap(short, long)]
    code: bool,

    /// Addresses are given in their integer form; print each one in
    /// dotted-decimal before its country
    #[clap(short, long)]
    numeric: bool,

    /// IPv4 addresses to localize
    #[clap(value_name = "IP")]
    ips: Vec<String>,
}

/// Check if the error chain contains a broken pipe error.
fn is_broken_pipe(err: &Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    let err = match run(Args::parse()) {
        Ok(()) => return ExitCode::SUCCESS,
        Err(err) => err,
    };

    if is_broken_pipe(&err) {
        return ExitCode::SUCCESS;
    }

    if std::env::var("RUST_BACKTRACE").is_ok_and(|v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        let _ = writeln!(io::stderr(), "error: {:?}", err);
    } else {
        let _ = writeln!(io::stderr(), "error: {:#}", err);
    }

    ExitCode::FAILURE
}

fn run(args: Args) -> Result<()> {
    let db = GeoDb::open(&args.ipdb).context("cannot load IP location database")?;
    let mut out = io::BufWriter::new(io::stdout().lock());

    for ip in &args.ips {
        let number = if args.numeric {
            ip.parse::<u32>().map_err(|_| ip2loc::Error::Format {
                address: ip.clone(),
            })
        } else {
            encode(ip)
        };

        let n = match number {
            Ok(n) => n,
            Err(err) => {
                tracing::warn!(ip = %ip, error = %err, "cannot localize");
                continue;
            }
        };

        let range = db.locate(n);
        let country = if args.code {
            range.map_or("-", |range| range.country_code.as_str())
        } else {
            range.map_or(UNKNOWN_COUNTRY, |range| range.country_name.as_str())
        };

        if args.numeric {
            writeln!(out, "{}\t{}", decode(n), country)?;
        } else {
            writeln!(out, "{}", country)?;
        }
    }

    out.flush()?;
    Ok(())
}
