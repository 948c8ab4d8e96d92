//! Plastic Ocean headless runner
//!
//! Plays one stage without a renderer: the in-memory placement stands in
//! for the AR engine and a scripted player taps a free refuse every
//! second.
//!
//! Usage: plastic-ocean [--stage N] [--seed S] [--config PATH] [--secs T]

use std::env;
use std::process::ExitCode;

use plastic_ocean::consts::FRAME_DT;
use plastic_ocean::sim::{Refuse, RefuseState};
use plastic_ocean::{HeadlessPlacement, Scene, SceneCatalog, SimulationConfig, SoundLog};

/// Seconds between scripted taps
const TAP_INTERVAL: f32 = 1.0;

struct Args {
    stage: Option<usize>,
    seed: Option<u64>,
    config: Option<String>,
    secs: f32,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        stage: None,
        seed: None,
        config: None,
        secs: 180.0,
    };
    let mut it = env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--stage" => args.stage = Some(value()?.parse().map_err(|e| format!("--stage: {e}"))?),
            "--seed" => args.seed = Some(value()?.parse().map_err(|e| format!("--seed: {e}"))?),
            "--config" => args.config = Some(value()?),
            "--secs" => args.secs = value()?.parse().map_err(|e| format!("--secs: {e}"))?,
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(args)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Usage: plastic-ocean [--stage N] [--seed S] [--config PATH] [--secs T]");
            return ExitCode::FAILURE;
        }
    };

    let mut config = match &args.config {
        Some(path) => match SimulationConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let catalog = SceneCatalog::standard();
    let stage = args.stage.unwrap_or_else(|| catalog.stage_index_for(0));
    log::info!("Plastic Ocean headless run: stage {stage}, seed {}", config.seed);

    let mut scene = Scene::new(catalog, config, HeadlessPlacement::new(), SoundLog::new());
    if let Err(e) = scene.prepare(stage) {
        log::error!("Could not prepare stage {stage}: {e}");
        return ExitCode::FAILURE;
    }
    scene.start_session();

    let ticks = (args.secs / FRAME_DT).ceil() as u64;
    let mut since_tap = 0.0;
    let mut cleaned_at = None;
    for i in 0..ticks {
        scene.placement_mut().advance(FRAME_DT);
        scene.tick(FRAME_DT);

        since_tap += FRAME_DT;
        if since_tap >= TAP_INTERVAL {
            since_tap = 0.0;
            let target = scene
                .refuses()
                .iter()
                .find(|r| r.state() == RefuseState::Free)
                .and_then(|r| r.entity());
            if let Some(entity) = target {
                scene.tapped(entity);
            }
        }

        if cleaned_at.is_none() && scene.is_cleaned() {
            cleaned_at = Some(i as f32 * FRAME_DT);
        }
        if cleaned_at.is_some() && !scene.is_showing_cleaned_banner() {
            break;
        }
    }
    scene.stop_session();

    let count = |state| Refuse::count(scene.refuses(), state);
    log::info!(
        "Collected {}, carried off by fish {}, still free {}",
        scene.collected_refuse_count(),
        count(RefuseState::Disappear) + count(RefuseState::Trapped),
        scene.free_refuse_count()
    );

    match cleaned_at {
        Some(t) => {
            log::info!("Stage cleaned after {t:.1}s");
            ExitCode::SUCCESS
        }
        None => {
            log::warn!("Stage not cleaned within {}s", args.secs);
            ExitCode::FAILURE
        }
    }
}
