//! # Delverogue Main Entry Point
//!
//! Parses arguments, initializes logging and runs either the interactive
//! terminal game loop or the autoexplore bot through the environment wrapper.

use clap::Parser;
use delverogue::{
    AutoexploreState, Engine, EngineConfig, EnvConfig, InputHandler, Player, PlayerInput,
    RewardTable, RogueEnv, RogueResult, TextDisplay, HELP,
};
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Command line arguments for Delverogue.
#[derive(Parser, Debug)]
#[command(name = "delverogue")]
#[command(about = "A small turn-based dungeon crawl, playable and trainable")]
#[command(version)]
struct Args {
    /// Random seed for level generation. Without it every game is seeded from the clock
    #[arg(short, long)]
    seed: Option<u64>,

    /// Engine configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reward table used in autoplay mode (JSON)
    #[arg(long)]
    rewards: Option<PathBuf>,

    /// Let the autoexplore bot play
    #[arg(long)]
    autoplay: bool,

    /// Number of episodes the bot plays
    #[arg(long, default_value_t = 1)]
    episodes: u32,

    /// Delay between bot moves in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Show the whole map instead of only explored tiles
    #[arg(long)]
    perfect_info: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = initialize_logging(&args.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting Delverogue v{}", delverogue::VERSION);

    let result = if args.autoplay {
        run_autoplay(&args)
    } else {
        run_interactive(&args)
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> RogueResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        let filter = tracing_subscriber::EnvFilter::try_new(log_level)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .try_init()
            .map_err(|e| delverogue::RogueError::InvalidState(e.to_string()))?;
    }

    Ok(())
}

fn load_engine_config(args: &Args) -> RogueResult<EngineConfig> {
    match &args.config {
        Some(path) => {
            info!("Loading engine configuration from {}", path.display());
            EngineConfig::load(path)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn new_engine(args: &Args, config: &EngineConfig) -> RogueResult<Engine> {
    Engine::with_config(
        Player::new(),
        args.seed.unwrap_or(0),
        args.seed.is_some(),
        config.clone(),
    )
}

/// Reads commands from stdin and plays until quit.
fn run_interactive(args: &Args) -> RogueResult<()> {
    let config = load_engine_config(args)?;
    let mut engine = new_engine(args, &config)?;
    let input_handler = InputHandler::new();
    let mut display = TextDisplay::new(args.perfect_info);
    let mut bot = AutoexploreState::new();
    bot.toggle();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", HELP);
    print!("{}", display.render(&engine));
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let inputs = match input_handler.parse_line(&line?) {
            Ok(inputs) => inputs,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        for input in inputs {
            match input {
                PlayerInput::Quit => return Ok(()),
                PlayerInput::Help => println!("{}", HELP),
                PlayerInput::NewGame => {
                    engine = new_engine(args, &config)?;
                    display.messages.clear();
                    display.add_message("A new dungeon awaits".to_string());
                }
                PlayerInput::ToggleAutoplay => {
                    let enabled = bot.toggle();
                    display.add_message(format!("Autoplay {}", if enabled { "on" } else { "off" }));
                }
                PlayerInput::Move(direction) => {
                    let result = engine.step(direction)?;
                    display.record_events(&result.events);
                }
                PlayerInput::Action(index) => {
                    let result = engine.step_index(index)?;
                    display.record_events(&result.events);
                }
            }
        }

        // With autoplay on, the bot runs to the next exit or the end of the episode
        while let Some(direction) = bot.next_direction(&engine) {
            let result = engine.step(direction)?;
            display.record_events(&result.events);
            if result.exit_taken || result.is_terminal() {
                break;
            }
        }

        print!("{}", display.render(&engine));
        stdout.flush()?;
    }

    Ok(())
}

/// Plays episodes with the autoexplore bot through the environment and
/// reports the returns.
fn run_autoplay(args: &Args) -> RogueResult<()> {
    let engine_config = load_engine_config(args)?;
    let rewards = match &args.rewards {
        Some(path) => RewardTable::load(path)?,
        None => RewardTable::default(),
    };
    let env_config = EnvConfig {
        seed: args.seed.unwrap_or(0),
        fixed_seed: args.seed.is_some(),
        perfect_info: args.perfect_info,
    };

    let mut env = RogueEnv::with_engine_config(env_config, rewards, engine_config)?;
    let mut bot = AutoexploreState::new();
    let mut display = TextDisplay::new(args.perfect_info);

    for episode in 1..=args.episodes {
        #[cfg(feature = "dev-tools")]
        let _span = tracing::info_span!("episode", number = episode).entered();

        if episode > 1 {
            env.reset()?;
        }
        let mut total = 0.0;

        while let Some(direction) = bot.next_direction(env.engine()) {
            let outcome = env.step(direction.index())?;
            total += outcome.reward;
            display.record_events(&outcome.tick.events);

            if args.delay_ms > 0 {
                print!("{}", display.render(env.engine()));
                thread::sleep(Duration::from_millis(args.delay_ms));
            }
            if outcome.done {
                break;
            }
        }

        let info = env.info();
        println!(
            "Episode {}: return {:.1}, ticks {}, depth {}, exits {}, kills {}, potions {}",
            episode,
            total,
            info.ticks,
            info.depth,
            info.exits_taken,
            info.enemies_killed,
            info.potions_taken
        );
    }

    Ok(())
}
