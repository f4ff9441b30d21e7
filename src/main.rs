//! termcore - feed a byte stream through an emulated terminal
//!
//! Reads what a program would write to its terminal, interprets it and
//! prints the notifications raised plus the final screen. Also answers
//! single capability queries against a termcap file.
//!
//! ```text
//! printf '\033[2;3Hhi\033[6n' | termcore --size 20x5
//! termcore --termcap /etc/termcap --query vt100 co
//! ```

use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use termcore::core::term::{Modes, Notification};
use termcore::{CapValue, Capability, Config, Session, TermcapDb, TermcapError};

/// Exit code for an unknown terminal type in `--query`
const EXIT_NOT_FOUND: i32 = 2;

/// Read size for the input stream
const CHUNK: usize = 4096;

#[derive(Debug, Default, PartialEq)]
struct Args {
    input: Option<PathBuf>,
    term: Option<String>,
    termcap: Option<PathBuf>,
    size: Option<(u16, u16)>,
    config: Option<PathBuf>,
    query: Option<(String, String)>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(Args),
    Help,
    Version,
}

fn print_version() {
    println!("termcore {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    print_version();
    eprintln!();
    eprintln!("Usage: termcore [OPTIONS]");
    eprintln!();
    eprintln!("Reads terminal output from stdin and prints what it does.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -i, --input <FILE>        Read from FILE instead of stdin");
    eprintln!("  -t, --term <NAME>         Terminal type to emulate");
    eprintln!("      --termcap <FILE>      Capability database");
    eprintln!("      --size <COLSxROWS>    Screen size (default 80x24)");
    eprintln!("      --config <FILE>       Config file (default ~/.termcore/config.toml)");
    eprintln!("  -q, --query <TERM> <CAP>  Print one capability and exit");
    eprintln!("  -v, --version             Show version");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Exit codes: 0 success, 1 usage or I/O error, 2 unknown terminal type");
}

fn parse_size(text: &str) -> Result<(u16, u16), String> {
    let (cols, rows) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Invalid size {}, expected COLSxROWS", text))?;
    let cols: u16 = cols.parse().map_err(|_| format!("Invalid column count {}", cols))?;
    let rows: u16 = rows.parse().map_err(|_| format!("Invalid row count {}", rows))?;
    if cols == 0 || rows == 0 {
        return Err(format!("Invalid size {}", text));
    }
    Ok((cols, rows))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut args = args.into_iter();
    let mut parsed = Args::default();

    fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
        args.next()
            .ok_or_else(|| format!("Missing argument for {}", flag))
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--version" => return Ok(Command::Version),
            "-i" | "--input" => parsed.input = Some(value(&mut args, &arg)?.into()),
            "-t" | "--term" => parsed.term = Some(value(&mut args, &arg)?),
            "--termcap" => parsed.termcap = Some(value(&mut args, &arg)?.into()),
            "--size" => parsed.size = Some(parse_size(&value(&mut args, &arg)?)?),
            "--config" => parsed.config = Some(value(&mut args, &arg)?.into()),
            "-q" | "--query" => {
                let term = value(&mut args, &arg)?;
                let cap = value(&mut args, &arg)?;
                parsed.query = Some((term, cap));
            }
            other => return Err(format!("Unknown argument: {}. Use -h for help.", other)),
        }
    }

    Ok(Command::Run(parsed))
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = FmtSubscriber::builder().with_env_filter(filter);

    let log_file = config.log_file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    // Logging must never break the tool
    match log_file {
        Some(file) => {
            let subscriber = builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .finish();
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        None => {
            let subscriber = builder.with_writer(io::stderr).finish();
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
    }
}

fn escape_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(char::from)
        .collect()
}

fn describe_capability(cap: &Capability) -> String {
    match cap {
        Capability::NotPresent => "not present".to_string(),
        Capability::Present(CapValue::Flag) => "flag".to_string(),
        Capability::Present(CapValue::Number(n)) => format!("number {}", n),
        Capability::Present(CapValue::Str(s)) => escape_bytes(s),
    }
}

fn describe_notification(notification: &Notification) -> String {
    match notification {
        Notification::Reply(response) => format!("reply {}", escape_bytes(&response.to_bytes())),
        other => format!("{:?}", other),
    }
}

fn open_database(config: &Config) -> anyhow::Result<Option<Arc<TermcapDb>>> {
    match &config.termcap {
        Some(path) => {
            let db = TermcapDb::load(path)
                .with_context(|| format!("Failed to load capabilities from {}", path.display()))?;
            Ok(Some(Arc::new(db)))
        }
        None => Ok(None),
    }
}

fn run_query(config: &Config, term: &str, cap: &str) -> anyhow::Result<()> {
    let Some(db) = open_database(config)? else {
        bail!("No capability database; use --termcap or set termcap in the config file");
    };
    match db.query(term, cap) {
        Ok(value) => {
            println!("{}", describe_capability(&value));
            Ok(())
        }
        Err(TermcapError::NotFound(name)) => {
            eprintln!("Unknown terminal type: {}", name);
            std::process::exit(EXIT_NOT_FOUND);
        }
        Err(e) => Err(e.into()),
    }
}

fn run_stream(config: &Config, input: Option<&PathBuf>) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let mut session = Session::with_limits(
        config.cols,
        config.rows,
        &config.term,
        db,
        config.scanner.limits(),
    );

    let mut reader: Box<dyn Read> = match input {
        Some(path) => Box::new(
            fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let mut buffer = vec![0u8; CHUNK];
    loop {
        let n = reader.read(&mut buffer).context("Failed to read input")?;
        if n == 0 {
            break;
        }
        for notification in session.feed_bytes(&buffer[..n]) {
            println!("{}", describe_notification(&notification));
        }
    }

    let state = &session.state;
    println!("cursor {};{}", state.cursor.row + 1, state.cursor.col + 1);
    println!(
        "margins {};{}",
        state.scroll_region.0 + 1,
        state.scroll_region.1 + 1
    );
    println!("modes {:?}", state.modes);
    if !state.title.is_empty() {
        println!("title {}", state.title);
    }
    if state.modes.contains(Modes::PRINTER_SESSION) {
        println!("printer session active");
    }
    println!("----");
    println!("{}", state.screen_text());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = match parse_args(env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Command::Version) => {
            print_version();
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(),
    };
    if let Some(term) = args.term {
        config.term = term;
    }
    if let Some(path) = args.termcap {
        config.termcap = Some(path);
    }
    if let Some((cols, rows)) = args.size {
        config.cols = cols;
        config.rows = rows;
    }

    init_logging(&config);
    info!("termcore starting, emulating {}", config.term);

    match &args.query {
        Some((term, cap)) => run_query(&config, term, cap),
        None => run_stream(&config, args.input.as_ref()),
    }
}
