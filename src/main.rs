use std::io::Write;

use color_eyre::Result;
use tokio_util::sync::CancellationToken;

use hansard_stream::client::HansardClient;
use hansard_stream::config::ClientConfig;
use hansard_stream::models::{DebateRequest, DebateResult};
use hansard_stream::resolve::ResolverMode;
use hansard_stream::session::SessionOutcome;
use hansard_stream::traits::SessionObserver;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Usage: hansard-stream --date <date> [options]

Stream one full debate from the Hansard backend to stdout.

Options:
  --date <date>        Sitting date, e.g. '1st July 2025' (required)
  --topic <topic>      Debate topic filter
  --speaker <speaker>  Speaker filter
  --url <base-url>     Backend base URL (or HANSARD_API_BASE)
  --lenient            Keep streaming past unparseable final payloads
  --version            Print version and exit
  --help               Print this help and exit
";

/// Parsed command-line options.
#[derive(Debug, Clone, Default, PartialEq)]
struct CliOptions {
    date: String,
    topic: String,
    speaker: String,
    url: Option<String>,
    lenient: bool,
    show_version: bool,
    show_help: bool,
}

/// Parse command-line arguments.
fn parse_args<I>(args: I) -> Result<CliOptions, String>
where
    I: Iterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--date" | "-d" => {
                options.date = args.next().ok_or("--date requires a value")?;
            }
            "--topic" | "-t" => {
                options.topic = args.next().ok_or("--topic requires a value")?;
            }
            "--speaker" | "-s" => {
                options.speaker = args.next().ok_or("--speaker requires a value")?;
            }
            "--url" => {
                options.url = Some(args.next().ok_or("--url requires a value")?);
            }
            "--lenient" => options.lenient = true,
            "--version" | "-V" => options.show_version = true,
            "--help" | "-h" => options.show_help = true,
            other => return Err(format!("unknown argument: {}", other)),
        }
    }

    Ok(options)
}

/// Observer that prints the document as it grows and the final result as
/// JSON when the session resolves.
#[derive(Default)]
struct ConsoleObserver {
    printed: usize,
}

impl SessionObserver for ConsoleObserver {
    fn on_update(&mut self, cumulative: &str) {
        // The previous document is always a prefix of the new one, so only
        // the appended suffix needs printing.
        let appended = &cumulative[self.printed..];
        print!("{}", appended);
        let _ = std::io::stdout().flush();
        self.printed = cumulative.len();
    }

    fn on_final(&mut self, result: DebateResult) {
        if self.printed > 0 {
            println!();
        }
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(err) => eprintln!("failed to render result: {}", err),
        }
    }

    fn on_error(&mut self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn on_complete(&mut self) {
        tracing::debug!("session complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = match parse_args(std::env::args()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            std::process::exit(2);
        }
    };

    if options.show_version {
        println!("hansard-stream {}", VERSION);
        return Ok(());
    }
    if options.show_help {
        print!("{}", USAGE);
        return Ok(());
    }
    if options.date.is_empty() {
        eprintln!("--date is required\n\n{}", USAGE);
        std::process::exit(2);
    }

    let mut config = match options.url {
        Some(url) => ClientConfig::from_env().with_base_url(url),
        None => ClientConfig::from_env(),
    };
    if options.lenient {
        config = config.with_resolver_mode(ResolverMode::Lenient);
    }

    let client = HansardClient::with_config(config);
    let request = DebateRequest::new(options.date)
        .with_topic(options.topic)
        .with_speaker(options.speaker);

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("cancellation requested");
            ctrl_c_token.cancel();
        }
    });

    let mut observer = ConsoleObserver::default();
    let outcome = client
        .stream_full_debate(request, &mut observer, cancel)
        .await;

    match outcome {
        SessionOutcome::Completed => Ok(()),
        SessionOutcome::Aborted => {
            eprintln!("aborted");
            Ok(())
        }
        SessionOutcome::Errored => std::process::exit(1),
    }
}
