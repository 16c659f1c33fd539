//! hashroute-sim
//!
//! Drives a [`Router`] from a TOML settings file and an optional navigation
//! script, printing every dispatch result as one JSON line.
//!
//! # Script Format
//!
//! ```text
//! # comment (a `#` starting a word)
//! navigate <verb> <route> [delay_ms]
//! back [delay_ms]
//! go <steps> [delay_ms]
//! wait <ms>
//! start | pause | resume | end
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use hashroute::config::watcher::ConfigWatcher;
use hashroute::config::{load_settings, ListenerBindings, ListenerOptions, RouteConfig, Settings};
use hashroute::observability::{logging, metrics};
use hashroute::{handler, MatchResult, Router, Verb};

#[derive(Parser)]
#[command(name = "hashroute-sim")]
#[command(about = "Replay navigation scripts against a client-side router", long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, default_value = "settings.toml")]
    config: PathBuf,

    /// Navigation script to replay after start
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Keep running and apply settings changes until interrupted
    #[arg(short, long)]
    watch: bool,

    /// Print a Prometheus metrics snapshot on exit
    #[arg(short, long)]
    metrics: bool,
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Navigate { verb: Verb, route: String, delay: Option<Duration> },
    Back { delay: Option<Duration> },
    Go { steps: i64, delay: Option<Duration> },
    Wait(Duration),
    Start,
    Pause,
    Resume,
    End,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = load_settings(&cli.config)?;
    logging::init_logging(&settings.observability.log_level);

    tracing::info!(
        config = %cli.config.display(),
        virtual_root = %settings.router.virtual_root,
        hash_mode = settings.router.hash_mode,
        routes = settings.routes.len(),
        "hashroute-sim starting"
    );

    let prometheus = if cli.metrics || settings.observability.metrics_enabled {
        metrics::init_metrics()
    } else {
        None
    };

    let router = Router::builder().settings(&settings).build();
    router.set_sink(
        Arc::new(|event: &str, result: MatchResult| print_result(event, &result)),
        None,
    );
    register_routes(&router, &settings.routes);

    match &cli.script {
        Some(path) => run_script(&router, path).await?,
        None => {
            router.start();
        }
    }

    if cli.watch {
        watch(&router, &cli.config).await?;
    }

    if let Some(handle) = prometheus {
        println!("{}", handle.render());
    }

    tracing::info!("Simulation complete");
    Ok(())
}

fn register_routes(router: &Router, routes: &[RouteConfig]) {
    for route in routes {
        let label = route.name.clone().unwrap_or_else(|| route.pattern.clone());
        let added = router.register(
            &route.verb,
            Some(&route.pattern),
            vec![handler(move |req, res, next| {
                tracing::info!(
                    handler = %label,
                    route = %req.route,
                    params = ?req.params,
                    status = res.status_code,
                    "Handler executed"
                );
                next.run(req, res);
            })],
        );
        if !added {
            tracing::warn!(verb = %route.verb, pattern = %route.pattern, "Route not registered");
        }
    }
}

fn print_result(event: &str, result: &MatchResult) {
    let (req, res) = result.run();
    let line = serde_json::json!({
        "event": event,
        "result": result,
        "request": req,
        "status": res.status_code,
    });
    println!("{}", line);
}

async fn run_script(router: &Router, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let script = tokio::fs::read_to_string(path).await?;
    let commands = parse_script(&script)?;
    tracing::info!(script = %path.display(), commands = commands.len(), "Replaying script");

    router.start();
    for command in commands {
        tracing::debug!(?command, "Script command");
        match command {
            Command::Navigate { verb, route, delay } => {
                if !router.navigate(&route, verb, None, delay) {
                    tracing::warn!(route = %route, "Navigation ignored, router not enabled");
                }
            }
            Command::Back { delay } => router.go_history(None, delay),
            Command::Go { steps, delay } => router.go_history(Some(steps), delay),
            Command::Wait(duration) => tokio::time::sleep(duration).await,
            Command::Start => {
                router.start();
            }
            Command::Pause => router.pause(),
            Command::Resume => router.resume(),
            Command::End => router.end(),
        }
    }
    Ok(())
}

fn parse_script(script: &str) -> Result<Vec<Command>, String> {
    script
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, strip_comment(line)))
        .filter(|(_, line)| !line.is_empty())
        .map(|(n, line)| parse_command(line).map_err(|e| format!("line {}: {}", n, e)))
        .collect()
}

/// Comments start at a `#` that begins a word, so `/#/home` survives.
fn strip_comment(line: &str) -> &str {
    let line = line.trim();
    if line.starts_with('#') {
        return "";
    }
    match line.find(" #") {
        Some(index) => line[..index].trim_end(),
        None => line,
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let delay = |index: usize| -> Result<Option<Duration>, String> {
        words
            .get(index)
            .map(|ms| parse_millis(ms))
            .transpose()
    };

    match words.as_slice() {
        ["navigate", verb, route, ..] => Ok(Command::Navigate {
            verb: verb.parse().map_err(|e| format!("{}", e))?,
            route: route.to_string(),
            delay: delay(3)?,
        }),
        ["back", ..] => Ok(Command::Back { delay: delay(1)? }),
        ["go", steps, ..] => Ok(Command::Go {
            steps: steps
                .parse()
                .map_err(|_| format!("invalid step count '{}'", steps))?,
            delay: delay(2)?,
        }),
        ["wait", ms] => Ok(Command::Wait(parse_millis(ms)?)),
        ["start"] => Ok(Command::Start),
        ["pause"] => Ok(Command::Pause),
        ["resume"] => Ok(Command::Resume),
        ["end"] => Ok(Command::End),
        _ => Err(format!("unrecognized command '{}'", line)),
    }
}

fn parse_millis(value: &str) -> Result<Duration, String> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| format!("invalid delay '{}'", value))
}

async fn watch(router: &Router, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (watcher, mut updates) = ConfigWatcher::new(path);
    let _watcher = watcher.run()?;

    loop {
        tokio::select! {
            Some(settings) = updates.recv() => apply_settings(router, settings),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping watcher");
                break;
            }
        }
    }
    Ok(())
}

fn apply_settings(router: &Router, settings: Settings) {
    if let Err(errors) = router.set_config(settings.router) {
        for error in errors {
            tracing::error!(error = %error, "Rejected router configuration");
        }
        return;
    }
    router.configure(rebind(settings.listener));
}

fn rebind(bindings: ListenerBindings) -> ListenerOptions {
    ListenerOptions {
        request: Some(bindings.request),
        click: Some(bindings.click),
        orientation: Some(bindings.orientation),
        back_button_selector: Some(bindings.back_button_selector),
        dispatch_event: Some(bindings.dispatch_event),
    }
}
