use anyhow::Context;
use clap::Parser;
use console::LogSink;
use log::info;
use sirstream::render::SharedView;
use sirstream::stream::probe_health;
use sirstream::telemetry::SessionMetrics;
use sirstream::{HttpConnector, SessionConfig, SessionController, SessionHandle};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::commands::{parse_command, OperatorCommand, HELP};
use workflow::config::{resolve, ConfigOverrides};

mod console;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Operator console for the live SIR simulation stream")]
struct Args {
    /// Load a session config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Server base URL, e.g. http://localhost:8080
    #[arg(long)]
    base_url: Option<String>,
    /// Number of stats samples kept for charting
    #[arg(long)]
    history: Option<usize>,
    /// Handshake timeout in milliseconds
    #[arg(long)]
    connect_timeout_ms: Option<u64>,
    /// Issue `start` as soon as the console is up
    #[arg(long, default_value_t = false)]
    autostart: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let overrides = ConfigOverrides {
        base_url: args.base_url,
        history_capacity: args.history,
        connect_timeout_ms: args.connect_timeout_ms,
    };
    let config = resolve(args.config.as_deref(), &overrides)?;

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for the session actor")?;
    runtime.block_on(run_console(config, args.autostart))
}

async fn run_console(config: SessionConfig, autostart: bool) -> anyhow::Result<()> {
    let view = SharedView::new();
    let connector = HttpConnector::new(&config).context("building HTTP client")?;
    let controller = SessionController::from_config(&config, connector, LogSink::new(view.sink()))
        .context("validating initial parameters")?;
    let metrics = controller.metrics();
    let (handle, commands) = SessionHandle::channel();
    let actor = tokio::spawn(controller.run(commands));

    println!("[CONSOLE] streaming from {}", config.stream_url());
    println!("{HELP}");
    if autostart {
        handle.start();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            interrupted = signal::ctrl_c() => {
                interrupted.context("awaiting Ctrl+C")?;
                info!("interrupt received, tearing the session down");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading operator input")? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(OperatorCommand::Session(command)) => {
                        handle.send(command);
                    }
                    Ok(OperatorCommand::Status) => print_status(&view, &metrics),
                    Ok(OperatorCommand::Ping) => match probe_health(&config).await {
                        Ok(banner) => println!("[PING] {}", banner.trim()),
                        Err(err) => println!("[PING] {}", err),
                    },
                    Ok(OperatorCommand::Help) => println!("{HELP}"),
                    Ok(OperatorCommand::Quit) => break,
                    Ok(OperatorCommand::Empty) => {}
                    Err(err) => println!("[CONSOLE] {err}"),
                }
            }
        }
    }

    handle.shutdown();
    actor.await.context("joining session actor")?;
    Ok(())
}

fn print_status(view: &SharedView, metrics: &SessionMetrics) {
    let view = view.snapshot();
    let counters = metrics.snapshot();
    let step = view
        .frame
        .as_ref()
        .map(|frame| frame.step.to_string())
        .unwrap_or_else(|| "n/a".into());
    println!(
        "[STATUS] {} | step {} | history {} | updates {} | skipped {} | transport errors {} | connections {}",
        view.state,
        step,
        view.history.len(),
        counters.updates_applied,
        counters.messages_skipped,
        counters.transport_errors,
        counters.connections_opened
    );
}
