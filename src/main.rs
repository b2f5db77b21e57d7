use std::time::Duration;

use anyhow::{bail, Context};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use dungeon_runner::config::load_startup_config;
use dungeon_runner::input::ScriptedInput;
use dungeon_runner::{Session, SessionPlugin};

const TICK_HZ: f64 = 60.0;

struct CliArgs {
    seed: Option<u64>,
    frames: u64,
    script: ScriptedInput,
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs {
        seed: None,
        frames: 600,
        script: ScriptedInput::RightJump { every: 45 },
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .with_context(|| format!("{arg} expects a value"))
        };
        match arg.as_str() {
            "--seed" => out.seed = Some(value()?.parse().context("--seed must be an integer")?),
            "--frames" => {
                out.frames = value()?.parse().context("--frames must be an integer")?
            }
            "--script" => {
                let name = value()?;
                out.script = ScriptedInput::parse(name)
                    .with_context(|| format!("unknown script '{name}' (idle, right-jump)"))?;
            }
            other => bail!("unknown argument '{other}'"),
        }
    }
    if out.frames == 0 {
        bail!("--frames must be at least 1");
    }
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args)?;

    let mut config = load_startup_config();
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.validate().context("startup config")?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin::default())
        .insert_resource(config)
        .insert_resource(cli.script)
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / TICK_HZ,
        )))
        .add_plugins(SessionPlugin);
    app.finish();
    app.cleanup();

    info!("[DungeonRunner] Running {} headless frames", cli.frames);
    while app
        .world()
        .get_resource::<Session>()
        .map_or(0, |s| s.frame())
        < cli.frames
    {
        app.update();
        if app.world().get_resource::<Session>().is_none() {
            bail!("session failed to start; see log for details");
        }
    }

    let session = app.world().resource::<Session>();
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}
