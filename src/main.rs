//! Gomoku AI Engine CLI
//!
//! `gomoku move` picks a move for a board read from a file or stdin.
//! `gomoku demo` runs the engine through a few fixed scenarios.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use gomoku::{AIEngine, Board, Difficulty, EngineConfig, MoveResult, Pos, Stone};

#[derive(Parser)]
#[command(name = "gomoku", version, about = "Five-in-a-row search engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Choose a move for a board read from BOARD_FILE or stdin
    Move(MoveArgs),
    /// Run canned scenarios
    Demo {
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
    },
}

#[derive(Args)]
struct MoveArgs {
    /// 15 rows of `.`, `X`/`B` and `O`/`W`; stdin when omitted
    board: Option<PathBuf>,
    #[arg(long, value_enum)]
    side: Side,
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,
    #[arg(long)]
    depth: Option<i32>,
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(long)]
    only_three: bool,
    #[arg(long)]
    only_four: bool,
    /// TOML file with engine settings; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Black,
    White,
}

impl From<Side> for Stone {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Stone::Black,
            Side::White => Stone::White,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Move(args) => run_move(args),
        Command::Demo { difficulty } => {
            run_demo(difficulty);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn read_board(path: Option<&Path>) -> Result<Board> {
    let text = match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading board {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("reading board from stdin")?;
            text
        }
    };
    text.parse::<Board>().context("parsing board")
}

fn run_move(args: MoveArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if args.depth.is_some() {
        config.depth = args.depth;
    }
    if args.timeout_ms.is_some() {
        config.timeout_ms = args.timeout_ms;
    }
    config.only_three |= args.only_three;
    config.only_four |= args.only_four;

    let board = read_board(args.board.as_deref())?;
    let side = Stone::from(args.side);
    let mut engine = AIEngine::with_config(config);
    let result = engine.get_move(&board, side).context("choosing move")?;

    print!("{board}");
    print_result(side, &result);
    Ok(())
}

fn print_result(side: Stone, result: &MoveResult) {
    match result.best_move {
        Some(m) => println!("  {side:?} plays: ({}, {})", m.row, m.col),
        None => println!("  {side:?} has no move"),
    }
    println!("  Search type: {:?}", result.search_type);
    println!("  Score: {}", result.score);
    println!("  Depth: {}", result.depth);
    println!("  Nodes: {} (cache hits {})", result.nodes, result.cache_hits);
    println!(
        "  Cache hit rate: {:.1}%  First-move cutoffs: {:.1}%",
        result.cache_hit_rate, result.first_move_rate
    );
    if !result.pv.is_empty() {
        let line: Vec<String> = result.pv.iter().map(ToString::to_string).collect();
        println!("  PV: {}", line.join(" "));
    }
    println!("  Time: {}ms", result.time_ms);
}

fn run_demo(difficulty: Difficulty) {
    println!("===========================================");
    println!("       Gomoku AI Engine v{}", env!("CARGO_PKG_VERSION"));
    println!("===========================================\n");

    let mut engine = AIEngine::with_difficulty(difficulty);

    println!("--- Test 1: Empty Board ---");
    scenario(&mut engine, &[], Stone::Black, &[Pos::new(7, 7)]);

    println!("\n--- Test 2: Find Winning Move ---");
    let four = [
        (7, 2, Stone::White),
        (7, 3, Stone::Black),
        (7, 4, Stone::Black),
        (7, 5, Stone::Black),
        (7, 6, Stone::Black),
    ];
    scenario(&mut engine, &four, Stone::Black, &[Pos::new(7, 7)]);

    println!("\n--- Test 3: Block Opponent Win ---");
    let threat = [
        (7, 2, Stone::Black),
        (7, 3, Stone::White),
        (7, 4, Stone::White),
        (7, 5, Stone::White),
        (7, 6, Stone::White),
    ];
    scenario(&mut engine, &threat, Stone::Black, &[Pos::new(7, 7)]);

    println!("\n--- Test 4: Open Four ---");
    let open = [
        (7, 7, Stone::Black),
        (7, 8, Stone::Black),
        (7, 9, Stone::Black),
        (7, 10, Stone::Black),
        (3, 3, Stone::White),
        (11, 11, Stone::White),
        (3, 11, Stone::White),
    ];
    scenario(&mut engine, &open, Stone::White, &[Pos::new(7, 6), Pos::new(7, 11)]);

    println!("\n--- Test 5: Fork Defense ---");
    let fork = [
        (7, 6, Stone::White),
        (7, 7, Stone::White),
        (5, 8, Stone::White),
        (6, 8, Stone::White),
        (12, 2, Stone::Black),
    ];
    scenario(&mut engine, &fork, Stone::Black, &[Pos::new(7, 8)]);

    println!("\n--- Test 6: Midgame Search ---");
    let midgame = [
        (7, 7, Stone::Black),
        (7, 8, Stone::White),
        (8, 8, Stone::Black),
        (6, 6, Stone::White),
        (8, 6, Stone::Black),
        (9, 9, Stone::White),
    ];
    scenario(&mut engine, &midgame, Stone::Black, &[]);

    println!("\n===========================================");
    println!("          All Scenarios Completed!");
    println!("===========================================");
}

/// Play one position; an empty `expected` accepts any legal move
fn scenario(engine: &mut AIEngine, stones: &[(u8, u8, Stone)], side: Stone, expected: &[Pos]) {
    let mut board = Board::new();
    for &(r, c, stone) in stones {
        board.place_stone(Pos::new(r, c), stone);
    }
    engine.clear_cache();

    let result = match engine.get_move(&board, side) {
        Ok(result) => result,
        Err(err) => {
            println!("  Result: FAIL - {err}");
            return;
        }
    };
    print_result(side, &result);

    let verdict = match result.best_move {
        None => "FAIL - No move found",
        Some(m) if !board.is_empty(m) => "FAIL - Occupied cell",
        Some(m) if expected.is_empty() || expected.contains(&m) => "PASS",
        Some(_) => "FAIL - Wrong move",
    };
    println!("  Result: {verdict}");
}
