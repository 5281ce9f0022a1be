extern crate wallcal as lib;

use chrono::{Datelike, Local};
use flexi_logger::{FileSpec, Logger};
use lib::render::{write_output, OutputFormat};
use std::path::{Path, PathBuf};
use structopt::clap::AppSettings;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "wallcal",
    author = "reedts <j.reedts@gmail.com>",
    about = "Lays out a multi-month wall calendar as a printable table.",
    setting = AppSettings::AllowNegativeNumbers
)]
pub struct Args {
    #[structopt(short = "y", long = "year", help = "year of the first month [default: current]")]
    pub year: Option<i32>,

    #[structopt(
        short = "m",
        long = "month",
        help = "first month, 1-12 [default: current]"
    )]
    pub month: Option<u32>,

    #[structopt(
        short = "n",
        long = "months",
        help = "number of months to lay out [default: 12]"
    )]
    pub months: Option<i64>,

    #[structopt(
        short = "o",
        long = "output",
        help = "output file, '-' for stdout [default: calendar.xml]",
        parse(from_os_str)
    )]
    pub output: Option<PathBuf>,

    #[structopt(short = "f", long = "format", help = "output format: word-xml or text")]
    pub format: Option<OutputFormat>,

    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    std::panic::set_hook(Box::new(move |info| {
        eprintln!("wallcal ran into a fatal error!");
        eprintln!(
            "Consider filing an issue with a log file and the backtrace below at {}",
            env!("CARGO_PKG_REPOSITORY")
        );

        eprintln!("{}", info);
        eprintln!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let today = Local::now();
    let year = args.year.unwrap_or_else(|| today.year());
    let month = args.month.unwrap_or_else(|| today.month());
    let months = args.months.unwrap_or(config.months);
    let format = args.format.unwrap_or(config.format);
    let output = args.output.unwrap_or_else(|| config.output.clone());

    let layout = lib::generate_layout(year, month, months).map_err(|e| {
        log::error!("{}", e);
        e
    })?;

    let document = format.renderer(&config.style).render(&layout)?;
    write_output(&output, &document)?;

    if output != Path::new("-") {
        println!("Generated: {}", output.display());
    }

    Ok(())
}
