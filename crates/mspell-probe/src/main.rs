//! spellprobe: show what a monster would cast
//!
//! Sets up an arena with the player and one caster, then prints the
//! caster's current spell odds, a pick histogram or the log of real casts.

use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use mspell_arena::Arena;
use mspell_core::cast::{
    CastContext, CastOutcome, MonsterTargetAi, RandomAi, SpellAi, StagedAi, cast_at_player,
};
use mspell_core::color::strip_markup;
use mspell_core::geom::Point;
use mspell_core::options::SpellOptions;
use mspell_core::spell::Resist;
use mspell_core::wizard::probe;
use mspell_core::world::{Actors, MonsterId};
use mspell_core::GameRng;
use mspell_data::LoadMode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AiKind {
    /// Full tactical selection
    Staged,
    /// Reduced filters used between monsters
    Monster,
    /// Uniform pick
    Random,
}

/// Monster spell probe
#[derive(Parser, Debug)]
#[command(name = "spellprobe")]
#[command(version, about = "Show a monster's spell odds against the player", long_about = None)]
struct Args {
    /// Species name, e.g. "mage" or "Zeus, Lord of Olympus"
    #[arg(short = 'r', long = "race")]
    race: Option<String>,

    /// List the spellcasting species and exit
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// RNG seed
    #[arg(short = 's', long = "seed", default_value_t = 1)]
    seed: u64,

    /// Distance between the caster and the player
    #[arg(short = 'd', long = "distance", default_value_t = 5)]
    distance: i32,

    /// Caster hit points as a percentage of maximum
    #[arg(long = "hp", default_value_t = 100)]
    hp: i32,

    /// Put a wall between the caster and the player
    #[arg(short = 'w', long = "wall")]
    wall: bool,

    /// Player resistance, e.g. `fire=50`; may be repeated
    #[arg(long = "resist", value_name = "ELEMENT=PCT")]
    resists: Vec<String>,

    /// Draw this many spells and print how often each came up
    #[arg(short = 't', long = "trials")]
    trials: Option<u32>,

    /// Actually cast this many times and print the messages
    #[arg(short = 'c', long = "cast")]
    casts: Option<u32>,

    /// Selection engine
    #[arg(long = "ai", value_enum, default_value_t = AiKind::Staged)]
    ai: AiKind,

    /// Engine option, e.g. `smart_learn` or `max_range=12`; may be repeated
    #[arg(short = 'o', long = "option")]
    options: Vec<String>,

    /// Read engine options from a file
    #[arg(long = "options-file")]
    options_file: Option<PathBuf>,

    /// Skip species whose spell lines do not parse instead of failing
    #[arg(long = "lenient")]
    lenient: bool,

    /// Print JSON instead of a table
    #[arg(long = "json")]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("spellprobe: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mode = if args.lenient {
        LoadMode::Lenient
    } else {
        LoadMode::Strict
    };
    let bestiary = mspell_data::load(mode)?;
    for err in &bestiary.errors {
        eprintln!("warning: {err}");
    }

    if args.list {
        for race in bestiary.casters() {
            let freq = race.spells.as_ref().map_or(0, |s| s.freq);
            println!("{:<36} {:>3} {:>3}%", race.name, race.level, freq);
        }
        return Ok(());
    }

    let Some(name) = &args.race else {
        return Err("no species given (use --race or --list)".into());
    };
    let race = bestiary
        .by_name(name)
        .ok_or_else(|| format!("unknown species '{name}'"))?
        .id;

    let options = load_options(args)?;
    let ai: Box<dyn SpellAi> = match args.ai {
        AiKind::Staged => Box::new(StagedAi::new(options.clone())),
        AiKind::Monster => Box::new(MonsterTargetAi::new(options.clone())),
        AiKind::Random => Box::new(RandomAi),
    };

    let mut arena = Arena::new(args.distance.max(1) + 20, 21, bestiary.into_races(), args.seed);
    let player = Point::new(10, 10);
    arena.player.pos = player;
    for entry in &args.resists {
        let (res, pct) = parse_resist(entry)?;
        arena.player.resists.set(res, 1, pct);
    }
    let caster_pos = player.offset(args.distance.max(1), 0);
    let between = player.offset((args.distance / 2).max(1), 0);
    if args.wall && between != caster_pos {
        arena.grid.set_wall(between, true);
    }
    let caster = arena
        .spawn(race, caster_pos)
        .ok_or("could not place the caster")?;
    if let Some(mon) = arena.monster_mut(caster) {
        mon.hp = (mon.max_hp * args.hp.clamp(1, 100) / 100).max(1);
    }

    let mut rng = GameRng::new(args.seed);
    if let Some(casts) = args.casts {
        return cast_loop(&mut arena, &mut rng, &options, ai.as_ref(), caster, casts);
    }
    if let Some(trials) = args.trials {
        return histogram(&arena, &mut rng, ai.as_ref(), caster, trials, args.json);
    }

    let Some(report) = probe(&arena, &mut rng, ai.as_ref(), caster) else {
        println!("{name} has nothing to cast.");
        return Ok(());
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn load_options(args: &Args) -> Result<SpellOptions, Box<dyn Error>> {
    let mut options = match &args.options_file {
        Some(path) => SpellOptions::load_from_file(path)?,
        None => SpellOptions::default(),
    };
    for opt in &args.options {
        options.parse_option(opt)?;
    }
    tracing::debug!(options = %options.to_config_string(), "engine options");
    Ok(options)
}

fn parse_resist(entry: &str) -> Result<(Resist, i32), Box<dyn Error>> {
    let (name, pct) = entry
        .split_once('=')
        .ok_or_else(|| format!("bad resistance '{entry}', expected ELEMENT=PCT"))?;
    let res = Resist::iter()
        .find(|r| r.to_string().eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| format!("unknown element '{name}'"))?;
    Ok((res, pct.trim().parse()?))
}

fn histogram(
    arena: &Arena,
    rng: &mut GameRng,
    ai: &dyn SpellAi,
    caster: MonsterId,
    trials: u32,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for _ in 0..trials {
        let Some(mut cast) = CastContext::at_player(arena, caster) else {
            break;
        };
        let name = match ai.choose(arena, rng, &mut cast) {
            Some(spell) => strip_markup(&spell.name()),
            None => "(nothing)".to_string(),
        };
        *counts.entry(name).or_insert(0) += 1;
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }
    let mut rows: Vec<_> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (name, n) in rows {
        let permille = u64::from(n) * 1000 / u64::from(trials.max(1));
        println!("{:>3}.{}% {:>7} {name}", permille / 10, permille % 10, n);
    }
    Ok(())
}

fn cast_loop(
    arena: &mut Arena,
    rng: &mut GameRng,
    options: &SpellOptions,
    ai: &dyn SpellAi,
    caster: MonsterId,
    casts: u32,
) -> Result<(), Box<dyn Error>> {
    for turn in 1..=casts {
        let outcome = cast_at_player(arena, rng, options, caster, ai);
        for line in arena.take_messages() {
            println!("{turn:>4}: {}", strip_markup(&line));
        }
        match outcome {
            CastOutcome::Cast(id) => tracing::debug!(turn, ?id, "cast"),
            other => println!("{turn:>4}: ({other:?})"),
        }
        if arena.player.dead {
            println!("You die.");
            break;
        }
    }
    println!("HP {}/{}", arena.player.hp, arena.player.max_hp);
    Ok(())
}
