use selkie::{Bounds, Edge, Graph, Node, Outcome, Phase, Simulation, SimulationOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(selkie::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<selkie::Error> for CliError {
    fn from(value: selkie::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Frames,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    limit: Option<usize>,
}

/// The JSON run descriptor: graph, region, and an optional options bundle.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Descriptor {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
    width: f64,
    height: f64,
    #[serde(default)]
    options: SimulationOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOut {
    positions: BTreeMap<String, selkie::Point>,
    outcome: Option<Outcome>,
    steps: usize,
    alpha: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameOut {
    step: usize,
    alpha: f64,
    positions: BTreeMap<String, selkie::Point>,
}

fn usage() -> &'static str {
    "selkie-cli\n\
\n\
USAGE:\n\
  selkie-cli layout [--pretty] [<path>|-]\n\
  selkie-cli frames [--limit <n>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON descriptor: {nodes, edges, width, height, options?}.\n\
  - layout runs the simulation to rest and prints the settled positions.\n\
  - frames prints one JSON line of positions per step, stopping at rest\n\
    or after <n> frames.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "frames" => args.command = Command::Frames,
            "--pretty" => args.pretty = true,
            "--limit" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let n = n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?;
                if n == 0 {
                    return Err(CliError::Usage(usage()));
                }
                args.limit = Some(n);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                while it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn build_simulation(text: &str) -> Result<Simulation, CliError> {
    let descriptor: Descriptor = serde_json::from_str(text)?;
    let graph = Graph {
        nodes: descriptor.nodes,
        edges: descriptor.edges,
    };
    let bounds = Bounds::new(descriptor.width, descriptor.height);
    Ok(Simulation::new(&graph, bounds, descriptor.options)?)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let mut sim = build_simulation(&text)?;

    match args.command {
        Command::Layout => {
            sim.run();
            write_json(
                &LayoutOut {
                    positions: sim.positions(),
                    outcome: sim.outcome(),
                    steps: sim.steps(),
                    alpha: sim.alpha(),
                },
                args.pretty,
            )
        }
        Command::Frames => {
            let mut frames = 0usize;
            while sim.phase() == Phase::Running {
                if args.limit.is_some_and(|n| frames >= n) {
                    break;
                }
                sim.step();
                frames += 1;
                write_json(
                    &FrameOut {
                        step: sim.steps(),
                        alpha: sim.alpha(),
                        positions: sim.positions(),
                    },
                    false,
                )?;
            }
            Ok(())
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
