use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use npuzzle_solver::{Direction, PuzzleState};

pub const SEPARATOR: &str = "================\n";
pub const TEST_DIR: &str = "tests";
pub const EXTENSION: &str = "puzzle";

/// The part of a case file above the first separator, trimmed.
pub fn case_input(content: &str) -> &str {
    content
        .split_once(SEPARATOR)
        .map_or(content, |(input, _)| input)
        .trim()
}

#[allow(unused)]
pub fn parse_moves(line: &str) -> Result<Vec<Direction>> {
    line.chars()
        .map(|ch| {
            Ok(match ch {
                'U' => Direction::Up,
                'D' => Direction::Down,
                'L' => Direction::Left,
                'R' => Direction::Right,
                _ => bail!("Invalid move: {ch:?}"),
            })
        })
        .collect()
}

#[allow(unused)]
pub fn fmt_moves(moves: &[Direction]) -> String {
    moves
        .iter()
        .map(|dir| match dir {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        })
        .collect()
}

/// Apply `moves` in order, calling `on_move` with every intermediate board.
pub fn replay(
    start: &PuzzleState,
    moves: &[Direction],
    mut on_move: impl FnMut(Direction, &PuzzleState),
) -> Result<PuzzleState> {
    let mut state = start.clone();
    for (&dir, i) in moves.iter().zip(1..) {
        state = state
            .apply_move(dir)
            .with_context(|| format!("Failed to perform move {i} {dir}"))?;
        on_move(dir, &state);
    }
    Ok(state)
}

fn collect_cases(subdir: &str) -> Vec<(String, PathBuf)> {
    let mut cases = std::fs::read_dir(Path::new(TEST_DIR).join(subdir))
        .unwrap()
        .filter_map(|ent| {
            let path = ent.unwrap().path();
            if path.extension().map_or(true, |ext| ext != EXTENSION) {
                return None;
            }
            let name = path.file_stem().unwrap().to_str().unwrap().to_owned();
            Some((name, path))
        })
        .collect::<Vec<_>>();
    cases.sort();
    cases
}

/// Run `f` over every `*.puzzle` case under `tests/{subdir}` and compare its output with the
/// whole file. `UPDATE_EXPECT=1` rewrites mismatching files instead of failing.
pub fn run_tests(subdir: &str, mut f: impl FnMut(&str) -> Result<String>) {
    let cases = collect_cases(subdir);
    assert!(!cases.is_empty(), "No cases under {TEST_DIR}/{subdir}");
    let do_update_tests = std::env::var("UPDATE_EXPECT").map_or(false, |v| v == "1");

    let mut failed = Vec::new();
    for (name, path) in &cases {
        eprint!("{name}: ");
        let content = std::fs::read_to_string(path).unwrap();
        match f(&content) {
            Ok(got) if got == content => eprintln!("\x1B[32mOK\x1B[0m"),
            Ok(got) if do_update_tests => {
                std::fs::write(path, got).unwrap();
                eprintln!("\x1B[33mUpdated\x1B[0m");
            }
            Ok(got) => {
                eprintln!("\x1B[31mMISMATCH\x1B[0m\n{got}");
                failed.push(name);
            }
            Err(err) => {
                eprintln!("\x1B[31mFAILED\x1B[0m\n{err:?}");
                failed.push(name);
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("{}/{} cases failed: {failed:?}", failed.len(), cases.len());
        std::process::exit(1);
    }
}
