use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;
use uuid::Uuid;

use jigsweeper::core::constants::{ENV_SEED, ENV_TIERS_FILE, GUEST_USERNAME};
use jigsweeper::minesweeper::{GameStatus, HintOutcome, RevealOutcome};
use jigsweeper::progression::{JsonFileStore, MemoryStore, ProgressStore};
use jigsweeper::tiers::{default_tiers, load_tiers};
use jigsweeper::utils::build_info;
use jigsweeper::{Result, SessionEvent, SessionManager};

#[derive(Debug, Default)]
struct Options {
    tiers: Option<PathBuf>,
    seed: Option<u64>,
    player: Option<String>,
}

fn print_help() {
    println!("Jigsweeper - minesweeper levels that earn jigsaw pieces\n");
    println!("Usage: jigsweeper [options]\n");
    println!("Options:");
    println!("  --tiers <path>  Load level tiers from a JSON file");
    println!("  --seed <n>      Seed the board generator");
    println!("  --player <id>   Save progress under this player id");
    println!("  --version       Show version information");
    println!("  --help          Show this help message");
}

fn print_commands() {
    println!("Commands:");
    println!("  levels          List levels and progress");
    println!("  play <L> <S>    Start sub-level S (1-based) of level L");
    println!("  r <row> <col>   Reveal a cell (chords on an open number)");
    println!("  f <row> <col>   Toggle a flag");
    println!("  h               Use a hint on the next reveal");
    println!("  show            Print the board");
    println!("  puzzle <L>      Mark level L's jigsaw as assembled");
    println!("  quit            Leave");
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut options = Options::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--tiers" => options.tiers = Some(PathBuf::from(expect_value(&mut iter, "--tiers"))),
            "--seed" => {
                let raw = expect_value(&mut iter, "--seed");
                options.seed = Some(raw.parse().unwrap_or_else(|_| {
                    eprintln!("--seed expects a number, got {}", raw);
                    std::process::exit(1);
                }));
            }
            "--player" => options.player = Some(expect_value(&mut iter, "--player")),
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run 'jigsweeper --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    if options.tiers.is_none() {
        options.tiers = env::var_os(ENV_TIERS_FILE).map(PathBuf::from);
    }
    if options.seed.is_none() {
        if let Ok(raw) = env::var(ENV_SEED) {
            match raw.parse() {
                Ok(seed) => options.seed = Some(seed),
                Err(_) => warn!("Ignoring {}={}: not a number", ENV_SEED, raw),
            }
        }
    }
    options
}

fn expect_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> String {
    iter.next().unwrap_or_else(|| {
        eprintln!("{} expects a value", flag);
        std::process::exit(1);
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let options = parse_args();

    let tiers = match &options.tiers {
        Some(path) => load_tiers(path)?,
        None => default_tiers(),
    };
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Named players persist to disk; guests play in memory under a throwaway id
    let (store, player_id, username) = match &options.player {
        Some(id) => (
            Box::new(JsonFileStore::from_env()?) as Box<dyn ProgressStore>,
            id.clone(),
            id.clone(),
        ),
        None => (
            Box::new(MemoryStore::new()) as Box<dyn ProgressStore>,
            Uuid::new_v4().to_string(),
            GUEST_USERNAME.to_string(),
        ),
    };

    let mut manager = SessionManager::for_player(tiers, store, &player_id, &username, rng)?;
    println!("Welcome, {}.", manager.progress().username);
    print_commands();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.first() == Some(&"quit") {
            break;
        }
        if let Err(e) = run_command(&mut manager, &words) {
            println!("{}", e);
        }
        for event in manager.take_events() {
            announce(&event);
        }
    }
    Ok(())
}

fn run_command(manager: &mut SessionManager, words: &[&str]) -> Result<()> {
    match words {
        [] => {}
        ["levels"] => print_levels(manager),
        ["play", level, sub] => {
            let (Some(level), Some(sub)) = (parse_num::<u32>(level), parse_num::<usize>(sub)) else {
                println!("usage: play <level> <sub-level>");
                return Ok(());
            };
            if sub == 0 {
                println!("sub-levels are numbered from 1");
                return Ok(());
            }
            manager.start_sub_level(level, sub - 1)?;
            print_board(manager);
        }
        ["r", row, col] => {
            let Some((row, col)) = parse_cell(row, col) else {
                println!("usage: r <row> <col>");
                return Ok(());
            };
            match manager.reveal(row, col)? {
                RevealOutcome::MineHit { errors } => println!("Boom! {} error(s) so far.", errors),
                RevealOutcome::HintFlagged => println!("The hint found a mine and flagged it."),
                RevealOutcome::HintRejected => println!("Pick a covered cell for the hint."),
                _ => {}
            }
            print_board(manager);
        }
        ["f", row, col] => {
            let Some((row, col)) = parse_cell(row, col) else {
                println!("usage: f <row> <col>");
                return Ok(());
            };
            if manager.toggle_flag(row, col)? {
                print_board(manager);
            }
        }
        ["h"] => match manager.use_hint()? {
            HintOutcome::Armed { remaining } => {
                println!("Hint ready for your next reveal ({} left).", remaining)
            }
            HintOutcome::AlreadyArmed => println!("A hint is already waiting."),
            HintOutcome::Exhausted => println!("No hints left for this sub-level."),
            HintOutcome::Unavailable => println!("The sub-level is over."),
        },
        ["show"] => print_board(manager),
        ["puzzle", level] => {
            let Some(level) = parse_num::<u32>(level) else {
                println!("usage: puzzle <level>");
                return Ok(());
            };
            if manager.complete_puzzle(level)? {
                println!("Level {} unlocked!", level + 1);
            }
        }
        _ => print_commands(),
    }
    Ok(())
}

fn parse_num<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.parse().ok()
}

fn parse_cell(row: &str, col: &str) -> Option<(usize, usize)> {
    Some((parse_num(row)?, parse_num(col)?))
}

fn print_levels(manager: &SessionManager) {
    let progress = manager.progress();
    for tier in manager.tiers() {
        let lock = if progress.is_level_unlocked(tier.id) {
            ""
        } else {
            " (locked)"
        };
        let (owned, total) = progress.puzzle_progress(tier);
        println!(
            "{} {}{}: {}/{} sub-levels, {}/{} pieces, {}x{} grid",
            tier.id,
            tier.name,
            lock,
            progress.completed_sub_levels(tier.id),
            tier.sub_level_count,
            owned,
            total,
            tier.grid_size,
            tier.grid_size
        );
    }
}

fn print_board(manager: &SessionManager) {
    let Some(snapshot) = manager.snapshot() else {
        println!("No sub-level in play. Try 'play 1 1'.");
        return;
    };
    print!("{}", snapshot.render());
    let state = match snapshot.status {
        GameStatus::Unstarted | GameStatus::InProgress => "playing",
        GameStatus::Won => "won",
        GameStatus::Lost => "lost",
    };
    println!(
        "[{}] mines left {} | errors {}/{} | hints {}{}",
        state,
        snapshot.mines_remaining,
        snapshot.errors_made,
        snapshot.errors_allowed,
        snapshot.hints_remaining,
        if snapshot.hint_armed { " (armed)" } else { "" }
    );
}

fn announce(event: &SessionEvent) {
    match event {
        SessionEvent::Won {
            level,
            sub_level,
            first_completion,
            piece,
        } => {
            println!("Level {} sub-level {} cleared!", level, sub_level + 1);
            match (first_completion, piece) {
                (true, Some(piece)) => println!("You earned jigsaw piece {}.", piece),
                (true, None) => println!("Every piece of this puzzle is already yours."),
                (false, _) => println!("Replay complete. No new piece."),
            }
        }
        SessionEvent::Lost { level, sub_level } => {
            println!("Level {} sub-level {} lost. Try again!", level, sub_level + 1)
        }
    }
}
