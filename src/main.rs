//! Coin Combat - headless duel runner
//!
//! Loads a pattern table, sets up a player and an enemy fighter for the
//! configured roles and plays the duel to the end. The greedy selector
//! stands in for the player; drained events are printed as text or JSON lines.

use coin_combat::combat::{
    ActiveSkillKind, Character, CombatEvent, CombatSession, Fighter, GreedySelector, PatternSelector,
    SkillCommand, StepOutcome,
};
use coin_combat::core::{load_config, CombatConfig, Result, Role, Side};
use coin_combat::patterns::load_pattern_table;

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Headless Coin Combat duel
#[derive(Parser, Debug)]
#[command(name = "coin-combat")]
#[command(about = "Play a coin-pattern duel between two AI-driven fighters")]
struct Args {
    /// Pattern table (TOML)
    #[arg(long, default_value = "data/patterns.toml")]
    patterns: PathBuf,

    /// Combat config (TOML, `[combat]` table)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs; overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Force-end as a loss after this many turns
    #[arg(long, default_value_t = 100)]
    max_turns: u32,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct DuelSummary {
    player_won: bool,
    turns: u32,
    player_health: u32,
    enemy_health: u32,
    seed: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coin_combat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = ?e.kind(), "{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<DuelSummary> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CombatConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let table = load_pattern_table(&args.patterns)?;
    tracing::info!(
        patterns = %args.patterns.display(),
        roles = table.roles().count(),
        "Pattern table loaded"
    );

    let player = fighter_for_role(&config.player_role, "Hero");
    let enemy = fighter_for_role(&config.enemy_role, "Foe");
    let seed = config.seed;

    let mut session = CombatSession::builder()
        .config(config)
        .player(player)
        .enemy(enemy)
        .pattern_table(table)
        .ai(GreedySelector::default())
        .build()?;

    let mut brain = GreedySelector::default();
    let mut outcome = session.start()?;
    print_events(&mut session, args.json);

    while outcome == StepOutcome::AwaitingPlayer {
        if session.turn_state().turn_number > args.max_turns {
            tracing::warn!(max_turns = args.max_turns, "Turn limit reached");
            session.force_end(false)?;
            print_events(&mut session, args.json);
            break;
        }

        if session.matched_patterns().is_empty() {
            try_skill(&mut session);
        }

        let choice = brain.select_pattern(
            session.player(),
            session.enemy(),
            session.matched_patterns(),
        );
        outcome = match choice {
            Some(id) => session.submit_player_pattern(&id)?,
            None => session.pass_turn()?,
        };
        print_events(&mut session, args.json);
    }

    let summary = DuelSummary {
        player_won: session.winner() == Some(Side::Player),
        turns: session.turn_state().turn_number,
        player_health: session.player().current_health(),
        enemy_health: session.enemy().current_health(),
        seed,
    };

    if args.json {
        match serde_json::to_string(&summary) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!(error = %e, "Failed to serialize summary"),
        }
    } else {
        println!();
        println!("Duel Result");
        println!("===========");
        println!("Winner: {}", if summary.player_won { "player" } else { "enemy" });
        println!("Turns: {}", summary.turns);
        println!(
            "Health: player {} / enemy {}",
            summary.player_health, summary.enemy_health
        );
        if let Some(seed) = summary.seed {
            println!("Seed: {}", seed);
        }
    }

    Ok(summary)
}

/// Stock stats per role; unknown roles get middling numbers
fn fighter_for_role(role: &Role, name: &str) -> Fighter {
    let name = format!("{} the {}", name, role);
    match role.as_str() {
        "knight" => Fighter::new(name, role.as_str(), 60, 6).with_skill(ActiveSkillKind::FlipOne, 2),
        "rogue" => Fighter::new(name, role.as_str(), 45, 7).with_skill(ActiveSkillKind::RethrowAll, 3),
        "slime" => Fighter::new(name, role.as_str(), 50, 4),
        "goblin" => Fighter::new(name, role.as_str(), 35, 5).with_skill(ActiveSkillKind::SwapTwo, 2),
        _ => Fighter::new(name, role.as_str(), 50, 5),
    }
}

/// Spend the skill on a turn with nothing matched
fn try_skill(session: &mut CombatSession<Fighter>) {
    let Ok(skill) = session.request_active_skill() else {
        return;
    };
    let command = match skill.kind {
        ActiveSkillKind::RethrowAll => SkillCommand::RethrowAll,
        ActiveSkillKind::FlipOne => SkillCommand::FlipOne { index: 0 },
        ActiveSkillKind::LockOne => SkillCommand::LockOne { index: 0 },
        ActiveSkillKind::SwapTwo => SkillCommand::SwapTwo {
            first: 0,
            second: session.coins().len().saturating_sub(1),
        },
    };
    if let Err(e) = session.use_active_skill(command) {
        tracing::debug!(error = %e, "Skill not used");
    }
}

fn print_events(session: &mut CombatSession<Fighter>, json: bool) {
    for event in session.drain_events() {
        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!(error = %e, "Failed to serialize event"),
            }
        } else {
            print_event(&event);
        }
    }
}

fn print_event(event: &CombatEvent) {
    match event {
        CombatEvent::TurnChanged { .. } | CombatEvent::CombatStarted { .. } => {
            println!();
            println!("== {} ==", event.describe());
        }
        _ => println!("  {}", event.describe()),
    }
}
