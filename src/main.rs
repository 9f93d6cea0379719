mod app;
mod calendar;
mod config;
mod details;
mod event;
mod eventlist;
mod export;
mod form;
mod help;
mod season;
mod storage;
mod store;
mod theme;
mod toast;
mod validate;
use crate::app::App;
use crate::calendar::MonthGrid;
use crate::config::{init_logging, Config};
use crate::export::{Exporter, PrintSnapshot};
use crate::season::{Season, YearMonth};
use crate::storage::FileStorage;
use crate::store::EventStore;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{OffsetDateTime, UtcOffset};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Export(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    data_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    month: Option<YearMonth>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        let mut export = false;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('d') | Arg::Long("data-dir") => {
                    opts.data_dir = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('o') | Arg::Long("export-dir") => {
                    opts.export_dir = Some(PathBuf::from(parser.value()?));
                }
                Arg::Value(value) if !export && opts.month.is_none() && value == "export" => {
                    export = true;
                }
                Arg::Value(value) if opts.month.is_none() => {
                    opts.month = Some(value.parse::<YearMonth>()?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        if export {
            Ok(Command::Export(opts))
        } else {
            Ok(Command::Run(opts))
        }
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                let config = opts.resolve()?;
                init_logging(&config.log_path());
                // The local offset can only be read safely before any other
                // threads exist.
                let offset = local_offset();
                let today = OffsetDateTime::now_utc().to_offset(offset).date();
                let storage = FileStorage::new(config.data_dir.clone());
                let (store, warning) = EventStore::load(storage);
                let season = config.start.map_or_else(Season::new, Season::starting_at);
                log::info!("Starting at {}", season.current());
                let app = App::new(
                    store,
                    season,
                    Exporter::new(config.export_dir),
                    today,
                    offset,
                )
                .load_warning(warning);
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    app.run(terminal).context("failed to run calendar")
                })
            }
            Command::Export(opts) => {
                let config = opts.resolve()?;
                init_logging(&config.log_path());
                let offset = local_offset();
                let today = OffsetDateTime::now_utc().to_offset(offset).date();
                let storage = FileStorage::new(config.data_dir.clone());
                let (store, warning) = EventStore::load(storage);
                if let Some(w) = warning {
                    eprintln!("Warning: {w}");
                }
                let month = config.start.map_or_else(Season::new, Season::starting_at).current();
                let grid = MonthGrid::build(month, store.events());
                let events = store
                    .events_in_month(month)
                    .into_iter()
                    .cloned()
                    .collect();
                let snapshot = PrintSnapshot::new(grid, events);
                let path = Exporter::new(config.export_dir)
                    .export(Some(&snapshot), today)
                    .with_context(|| format!("failed to export {month}"))?;
                println!("{}", path.display());
                Ok(())
            }
            Command::Help => {
                println!("Usage: sassowitz [<options>] [YYYY-MM]");
                println!("       sassowitz [<options>] export [YYYY-MM]");
                println!();
                println!("Plan weekend family events from May to October 2025");
                println!();
                println!("The \"export\" command writes the given month (default: May 2025) to a");
                println!("PDF in the export directory and prints its path.");
                println!();
                println!("Options:");
                println!("  -d DIR, --data-dir DIR");
                println!("                    Store events and the log file in DIR");
                println!("  -o DIR, --export-dir DIR");
                println!("                    Write PDF exports to DIR");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                println!();
                println!("Set SASSOWITZ_LOG to control logging (default: info).");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl Options {
    fn resolve(self) -> anyhow::Result<Config> {
        Config::resolve(self.data_dir, self.export_dir, self.month)
            .context("failed to determine configuration")
    }
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or_else(|e| {
        log::warn!("Could not determine local UTC offset, using UTC: {e}");
        UtcOffset::UTC
    })
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
