// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{crate_version, Parser, Subcommand};
use duration_string::DurationString;
use haptic_feedback::config::{self, Effect, Haptics};
use haptic_feedback::dispatcher::DispatchError;
use haptic_feedback::looping::LoopingEffect;
use haptic_feedback::pattern::{Pattern, SegmentKind};
use haptic_feedback::presets::{FeedbackKind, IntensityLevels, PresetLibrary};
use haptic_feedback::query::PatternRequest;
use serde_json::json;
use tracing_subscriber::EnvFilter;

const TICK: Duration = Duration::from_millis(10);

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Curve-driven haptic feedback."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encodes an effect's curve into a vibration pattern.
    Encode {
        /// The path to the effect file.
        effect_path: String,
        /// Print the pattern as JSON.
        #[arg(short, long)]
        json: bool,
    },
    /// Prints the remote-trigger query string for an effect.
    Query {
        /// The path to the effect file.
        effect_path: String,
    },
    /// Decodes a remote-trigger query string into a pattern.
    Decode {
        /// The query string, e.g. t=0.1&a=0:0.5:0.
        query: String,
        /// Print the pattern as JSON.
        #[arg(short, long)]
        json: bool,
    },
    /// Lists the feedback presets.
    Presets {
        /// A haptics config whose intensity levels override the defaults.
        #[arg(short, long)]
        config_path: Option<String>,
        /// Print the presets as JSON.
        #[arg(short, long)]
        json: bool,
    },
    /// Triggers a feedback kind on the configured device.
    Trigger {
        /// The path to the haptics config.
        config_path: String,
        /// The feedback kind to trigger.
        #[arg(value_enum)]
        kind: FeedbackKind,
    },
    /// Plays an effect on the configured device.
    Play {
        /// The path to the haptics config.
        config_path: String,
        /// The path to the effect file.
        effect_path: String,
        /// How long to keep a looping effect going, e.g. 2s.
        #[arg(short = 'f', long = "for")]
        play_for: Option<String>,
    },
}

fn print_pattern(pattern: &Pattern, as_json: bool) -> Result<(), Box<dyn Error>> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(pattern)?);
    } else {
        println!("Pattern: {}", pattern);
        if pattern.is_silent() {
            println!("(silent)");
            return Ok(());
        }
        for segment in pattern.segments().filter(|segment| segment.duration_ms > 0) {
            match segment.kind {
                SegmentKind::Wait => println!("- wait {}ms", segment.duration_ms),
                SegmentKind::Vibrate => println!(
                    "- vibrate {}ms at {}",
                    segment.duration_ms, segment.amplitude
                ),
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { effect_path, json } => {
            let effect = Effect::deserialize(&PathBuf::from(effect_path))?;
            print_pattern(&effect.pattern()?, json)?;
        }
        Commands::Query { effect_path } => {
            let effect = Effect::deserialize(&PathBuf::from(effect_path))?;
            println!("{}", effect.request()?);
        }
        Commands::Decode { query, json } => {
            let request = PatternRequest::parse(&query)?;
            print_pattern(&request.to_pattern()?, json)?;
        }
        Commands::Presets { config_path, json } => {
            let levels = match config_path {
                Some(config_path) => Haptics::deserialize(&PathBuf::from(config_path))?.levels()?,
                None => IntensityLevels::default(),
            };
            let presets = PresetLibrary::new(levels);

            if json {
                let presets: Vec<serde_json::Value> = presets
                    .iter()
                    .map(|(kind, pattern)| json!({ "kind": kind, "pattern": pattern }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&presets)?);
                return Ok(());
            }

            println!("Presets:");
            for (kind, pattern) in presets.iter() {
                println!(
                    "- {}: {:?} / {:?}",
                    kind,
                    pattern.durations(),
                    pattern.amplitudes()
                );
            }
        }
        Commands::Trigger { config_path, kind } => {
            let (dispatcher, fallback) = config::init_dispatcher(&PathBuf::from(config_path))?;
            dispatcher.trigger(kind, fallback)?;
            println!("Triggered {} on {}.", kind, dispatcher.device());
            if let Some(pattern) = dispatcher.presets().get(kind) {
                print_pattern(pattern, false)?;
            }
        }
        Commands::Play {
            config_path,
            effect_path,
            play_for,
        } => {
            let (dispatcher, fallback) = config::init_dispatcher(&PathBuf::from(config_path))?;
            let effect = Effect::deserialize(&PathBuf::from(effect_path))?;
            let play_for: Option<Duration> = match play_for {
                Some(play_for) => Some(DurationString::from_string(play_for)?.into()),
                None => None,
            };
            let fallback = fallback || effect.fallback_to_plain_vibrate();

            let mut looping = LoopingEffect::new(
                effect.pattern()?,
                Duration::try_from_secs_f64(effect.period()).unwrap_or_default(),
                effect.looping(),
                fallback,
            );
            let start = Instant::now();
            if !effect.looping() {
                // Replays block on iOS.
                let handle = dispatcher.spawn_replay(looping.pattern().clone(), fallback);
                handle.join().map_err(|_| DispatchError::ReplayPanicked)??;
                spin_sleep::sleep(looping.period().saturating_sub(start.elapsed()));
                println!("Played {} on {}.", effect.name(), dispatcher.device());
                return Ok(());
            }

            let play_for = play_for.unwrap_or(looping.period());
            looping.play(&dispatcher, start)?;
            loop {
                let now = Instant::now();
                if now.duration_since(start) >= play_for {
                    looping.stop_immediately(&dispatcher)?;
                    break;
                }
                looping.update(&dispatcher, now)?;
                spin_sleep::sleep(TICK);
            }
            dispatcher.release()?;
            println!("Played {} on {}.", effect.name(), dispatcher.device());
        }
    }

    Ok(())
}
