use std::io::Read;
use std::time::{Duration, Instant};

use anyhow::{bail, ensure, Context, Result};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use npuzzle_solver::solve::astar;
use npuzzle_solver::{canonical_goal, Outcome, PuzzleState, SearchLimits};

const USAGE: &str = "\
Usage: npuzzle [OPTIONS] [FILE]

Reads a board from FILE (or stdin if absent or `-`): a line with the size N,
then N lines of N labels, 0 being the blank.

Options:
    --goal FILE            Solve towards the board in FILE instead of the canonical goal
    --max-expansions N     Give up after expanding N states
    --timeout SECS         Give up after SECS seconds
    --replay               Print the board after every move
    --quiet                No progress or board output on stderr
";

#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    goal: Option<String>,
    max_expansions: Option<usize>,
    timeout: Option<Duration>,
    replay: bool,
    quiet: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut ret = Self::default();
        while let Some(arg) = args.next() {
            let mut value = || {
                args.next()
                    .with_context(|| format!("Missing value for {arg}"))
            };
            match arg.as_str() {
                "-h" | "--help" => {
                    print!("{USAGE}");
                    std::process::exit(0);
                }
                "--goal" => ret.goal = Some(value()?),
                "--max-expansions" => {
                    let n = value()?;
                    let n = n
                        .parse::<usize>()
                        .with_context(|| format!("Invalid count: {n:?}"))?;
                    ret.max_expansions = Some(n);
                }
                "--timeout" => {
                    let secs = value()?;
                    let timeout = secs
                        .parse::<f64>()
                        .ok()
                        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                        .with_context(|| format!("Invalid timeout: {secs:?}"))?;
                    ret.timeout = Some(timeout);
                }
                "--replay" => ret.replay = true,
                "--quiet" => ret.quiet = true,
                _ if arg.starts_with("--") => bail!("Unknown option {arg}\n\n{USAGE}"),
                _ => {
                    ensure!(ret.input.is_none(), "Multiple input files\n\n{USAGE}");
                    ret.input = Some(arg.clone());
                }
            }
        }
        Ok(ret)
    }
}

fn deadline_after(timeout: Option<Duration>) -> Result<Option<Instant>> {
    timeout
        .map(|timeout| {
            Instant::now()
                .checked_add(timeout)
                .with_context(|| format!("Timeout too large: {timeout:?}"))
        })
        .transpose()
}

fn read_board(path: Option<&str>) -> Result<PuzzleState> {
    let data = match path {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?
        }
    };
    Ok(data.parse::<PuzzleState>()?)
}

fn main() -> Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;
    let term = Term::stderr();

    let start = read_board(args.input.as_deref()).context("Failed to parse the board")?;
    let goal = match &args.goal {
        Some(path) => {
            read_board(Some(path.as_str())).context("Failed to parse the goal board")?
        }
        None => canonical_goal(start.size())?,
    };
    ensure!(
        goal.size() == start.size(),
        "Goal size {} does not match board size {}",
        goal.size(),
        start.size(),
    );

    if !args.quiet {
        term.write_line(&format!("{}\n{start}\n", style("Initial State:").bold()))?;
        term.write_line(&format!("{}\n{goal}\n", style("Goal State:").bold()))?;
    }

    let limits = SearchLimits {
        max_expansions: args.max_expansions,
        deadline: deadline_after(args.timeout)?,
    };

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(ProgressStyle::with_template(
        "{spinner} [{elapsed}] {human_pos} states expanded ({per_sec})",
    )?);
    pb.enable_steady_tick(Duration::from_millis(100));
    let outcome = astar(&start, &goal, &limits, || pb.inc(1));
    pb.finish_and_clear();

    match outcome {
        Outcome::Solved { moves, expanded } => {
            if !args.quiet {
                term.write_line(&format!(
                    "{} {} moves, {expanded} states expanded",
                    style("Solved:").green().bold(),
                    moves.len(),
                ))?;
            }
            let mut state = start;
            for &dir in &moves {
                println!("{dir}");
                if args.replay {
                    state = state.apply_move(dir)?;
                    println!("{state}\n");
                }
            }
        }
        Outcome::NoSolution { expanded } => {
            if !args.quiet {
                term.write_line(&format!(
                    "{} frontier exhausted after {expanded} states",
                    style("Unsolvable:").red().bold(),
                ))?;
            }
            println!("No solution");
            std::process::exit(1);
        }
        Outcome::Aborted { expanded } => {
            bail!("Search aborted after expanding {expanded} states");
        }
    }

    Ok(())
}
