extern crate almanac as lib;

use flexi_logger::{FileSpec, Logger};
use lib::clock::{Clock, FixedClock, SystemClock};
use lib::cmds::Cmd;
use lib::config::{load_suitable_config, parse_iso_date, CalendarOptions};
use lib::ctrl::{CalendarController, Control, DisplayMode};
use lib::locale::Catalog;
use lib::render::TextRenderer;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "alm",
    author = "reedts <j.reedts@gmail.com>",
    about = "Almanac - print and browse month calendars."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(short = "d", long = "date", help = "first month to show (YYYY-MM)")]
    pub date: Option<String>,

    #[structopt(short = "m", long = "months", help = "number of months to show")]
    pub months: Option<i64>,

    #[structopt(short = "w", long = "week-start", help = "sunday or monday")]
    pub week_start: Option<String>,

    #[structopt(short = "l", long = "lang", help = "language of month and weekday names")]
    pub language: Option<String>,

    #[structopt(short = "t", long = "theme", help = "builtin theme or theme file name")]
    pub theme: Option<String>,

    #[structopt(short = "n", long = "week-numbers", help = "show ISO week numbers")]
    pub week_numbers: bool,

    #[structopt(long = "today", help = "pretend today is this date (YYYY-MM-DD)")]
    pub today: Option<String>,

    #[structopt(long = "color", help = "colorize output with ANSI escapes")]
    pub color: bool,

    #[structopt(short = "i", long = "interactive", help = "read commands from stdin")]
    pub interactive: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> lib::Result<CalendarOptions> {
        let (year, month) = match &self.date {
            Some(date) => {
                let (year, month) = lib::command::parse_year_month(date)?;
                (Some(year), Some(month))
            }
            None => (None, None),
        };

        Ok(CalendarOptions {
            year,
            month,
            months: self.months,
            week_start: self.week_start.clone(),
            language: self.language.clone(),
            theme: self.theme.clone(),
            show_week_numbers: self.week_numbers.then(|| true),
            ..Default::default()
        })
    }
}

fn print_current(ctrl: &CalendarController, renderer: &TextRenderer) {
    let text = match ctrl.mode() {
        DisplayMode::Days => renderer.render(ctrl.view()),
        DisplayMode::Months => renderer.render_year(&ctrl.year_view()),
        DisplayMode::Years(_) => match ctrl.year_range_view() {
            Some(view) => renderer.render_years(&view),
            None => renderer.render(ctrl.view()),
        },
    };
    println!("{}", text);
}

fn run_interactive(ctrl: &mut CalendarController, renderer: &TextRenderer) -> io::Result<()> {
    let stdin = io::stdin();
    print_current(ctrl, renderer);

    loop {
        print!(": ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        match lib::command::parse(&line).and_then(|cmd| ctrl.send_cmd(&cmd)) {
            Ok(Cmd::Exit) => return Ok(()),
            Ok(Cmd::Noop) => print_current(ctrl, renderer),
            Ok(cmd) => log::debug!("Unhandled command {:?}", cmd),
            Err(e) => {
                log::warn!("{}", e);
                eprintln!("{}", e);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(|info| {
        println!("Almanac ran into a fatal error!");
        println!("Consider filing an issue with a log file and the backtrace below.");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let clock: Box<dyn Clock> = match &args.today {
        Some(date) => Box::new(FixedClock(parse_iso_date(date)?)),
        None => Box::new(SystemClock),
    };

    let options = load_suitable_config(args.configfile.as_deref())?.overlay(args.options()?);
    let mut ctrl = CalendarController::from_options(&options, clock.as_ref(), Catalog::new())?;
    let renderer = TextRenderer::new(args.color);

    if args.interactive {
        run_interactive(&mut ctrl, &renderer)?;
    } else {
        print_current(&ctrl, &renderer);
    }

    Ok(())
}
