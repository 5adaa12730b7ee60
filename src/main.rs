//! TommyJumper entry point
//!
//! Headless native driver: plays one run at a fixed timestep (optionally on
//! autopilot) and prints the submission payload for the final result.
//!
//! Usage: `tommy-jumper [SETTINGS_JSON] [DEVICE]`

#[cfg(not(target_arch = "wasm32"))]
fn load_settings() -> tommy_jumper::Settings {
    use std::path::Path;
    use tommy_jumper::Settings;

    let mut args = std::env::args().skip(1);
    let mut settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)).unwrap_or_else(|e| {
            log::warn!("Could not load settings ({}), using defaults", e);
            Settings::default()
        }),
        None => Settings::default(),
    };
    if let Some(device) = args.next() {
        if let Err(e) = settings.set_device(&device) {
            log::warn!("{}; keeping {}", e, settings.device.as_str());
        }
    }
    settings
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tommy_jumper::sim::{TickInput, tick};
    use tommy_jumper::{HighScores, ScoreSubmission};

    env_logger::init();
    log::info!("TommyJumper (headless) starting...");

    let settings = load_settings();
    let mut state = settings.new_game();
    state.start();

    let dt = settings.frame_dt();
    let input = TickInput {
        idle_mode: settings.autopilot,
        ..Default::default()
    };
    let report_every = u64::from(settings.frame_rate.max(1)) * 10;

    let mut steps = 0u64;
    while !state.is_over() {
        if settings.max_steps.is_some_and(|max| steps >= max) {
            log::info!("Step limit {} reached, ending run", steps);
            state.end_run();
            break;
        }
        tick(&mut state, &input, dt);
        steps += 1;

        if steps % report_every == 0 {
            let hud = state.hud();
            log::debug!(
                "t={}s score={} level={} platforms={}",
                hud.elapsed_seconds,
                hud.score,
                hud.level,
                state.platforms.len()
            );
        }
    }

    let Some(result) = state.final_result else {
        log::warn!("Run ended without a final result");
        return;
    };

    let mut scores = HighScores::new();
    if let Some(rank) = scores.add("", &result) {
        log::info!("Local rank: #{}", rank);
    }

    match serde_json::to_string_pretty(&ScoreSubmission::new("", &result)) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Could not encode result: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm
}
