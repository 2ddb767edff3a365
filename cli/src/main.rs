use std::io::{self, BufRead, Write};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use sweeper_core::{Cell, CellIndex, GameConfig, RevealOutcome, Session};
use sweeper_records::RecordBook;

mod logging;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    fn config(self) -> GameConfig {
        let (height, width, mines) = match self {
            Self::Beginner => (8, 10, 10),
            Self::Intermediate => (14, 18, 40),
            Self::Expert => (20, 24, 99),
        };
        GameConfig::new_unchecked(height, width, mines)
    }
}

#[derive(Parser, Debug)]
#[command(name = "sweeper", about = "Play minesweeper in the terminal")]
struct Args {
    /// Preset board shape; explicit dimensions below override its fields
    #[arg(long, value_enum, default_value = "beginner")]
    difficulty: Difficulty,
    #[arg(long)]
    height: Option<u8>,
    #[arg(long)]
    width: Option<u8>,
    #[arg(long)]
    mines: Option<u16>,
    /// Fixed board seed, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn board_config(args: &Args) -> Result<GameConfig> {
    let preset = args.difficulty.config();
    if args.height.is_none() && args.width.is_none() && args.mines.is_none() {
        return Ok(preset);
    }
    let height = args.height.unwrap_or(preset.height);
    let width = args.width.unwrap_or(preset.width);
    let mines = args.mines.unwrap_or(preset.mines);
    Ok(GameConfig::new(height, width, mines)?)
}

fn entropy_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command {
    Reveal(CellIndex),
    Flag(CellIndex),
    Reset,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let command = match (words.next()?, words.next()) {
        ("q", None) => Command::Quit,
        ("r", None) => Command::Reset,
        ("f", Some(index)) => Command::Flag(index.parse().ok()?),
        (index, None) => Command::Reveal(index.parse().ok()?),
        _ => return None,
    };
    if words.next().is_some() {
        return None;
    }
    Some(command)
}

fn cell_glyph(cell: Cell) -> char {
    match cell {
        Cell::Hidden => '#',
        Cell::Flagged => 'F',
        Cell::Mine => '*',
        Cell::Revealed(0) => '.',
        Cell::Revealed(count) => char::from_digit(count as u32, 10).unwrap_or('?'),
    }
}

fn render(session: &Session, out: &mut impl Write) -> io::Result<()> {
    let (height, width) = session.size();
    let snapshot = session.snapshot();
    for row in 0..height {
        let start = row as usize * width as usize;
        let glyphs: String = snapshot[start..start + width as usize]
            .iter()
            .map(|&cell| cell_glyph(cell))
            .collect();
        writeln!(out, "{:>4}  {}", start, glyphs)?;
    }
    writeln!(
        out,
        "mines left: {}, revealed: {}/{}",
        session.mines_left(),
        session.revealed_count(),
        session.config().safe_cells()
    )
}

fn show_rankings(records: &RecordBook, size_key: &str, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "records for {size_key}:")?;
    for ranking in records.rankings(size_key) {
        writeln!(out, "{:>4}. {}s", ranking.rank, ranking.secs)?;
    }
    Ok(())
}

fn play(config: GameConfig, seed: u64, records: &mut RecordBook) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();
    let mut session = Session::new(config, seed);
    let mut started: Option<Instant> = None;

    render(&session, &mut out)?;
    writeln!(
        out,
        "reveal with a cell index, `f <index>` to flag, `r` to reset, `q` to quit"
    )?;

    for line in stdin.lock().lines() {
        let line = line?;
        let Some(command) = parse_command(&line) else {
            writeln!(out, "unrecognized input: {line}")?;
            continue;
        };

        match command {
            Command::Quit => break,
            Command::Reset => {
                session.reset();
                started = None;
            }
            Command::Flag(index) => match session.toggle_flag_index(index) {
                Ok(()) => {}
                Err(err) => writeln!(out, "{err}")?,
            },
            Command::Reveal(index) => match session.reveal_index(index) {
                Ok(outcome) => {
                    // the elapsed counter is observational only, the engine
                    // never sees it
                    let timer = *started.get_or_insert_with(Instant::now);
                    match outcome {
                        RevealOutcome::Continue => {}
                        RevealOutcome::Exploded => {
                            render(&session, &mut out)?;
                            writeln!(out, "You failed... `r` to play again, `q` to quit")?;
                        }
                        RevealOutcome::Won => {
                            let secs = timer.elapsed().as_secs() as u32;
                            let size_key = config.size_key();
                            records.add(&size_key, secs);
                            render(&session, &mut out)?;
                            writeln!(out, "You succeeded!! cleared in {secs}s")?;
                            show_rankings(records, &size_key, &mut out)?;
                            writeln!(out, "`r` to play again, `q` to quit")?;
                        }
                    }
                }
                Err(err) => writeln!(out, "{err}")?,
            },
        }

        if !session.is_finished() {
            render(&session, &mut out)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbosity.log_level_filter());

    let config = board_config(&args)?;
    let seed = args.seed.unwrap_or_else(entropy_seed);
    log::debug!(
        "starting {}x{} board with {} mines, seed {}",
        config.height,
        config.width,
        config.mines,
        seed
    );

    let mut records = RecordBook::new();
    play(config, seed, &mut records)
}
