//! Asteroids Survival entry point
//!
//! Runs the simulation headless with a simple autopilot at the controls.
//! Usage: `asteroids-survival [seed] [frames]`. Settings and the profile are
//! kept in `$ASTEROIDS_DATA_DIR` (default: the current directory).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use asteroids_survival::platform::{AutoDialogs, LogToasts};
    use asteroids_survival::renderer::draw_list;
    use asteroids_survival::{FileScoreStore, Session, Settings};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = parse_arg(args.next(), "seed", 42u64);
    let frames = parse_arg(args.next(), "frames", 3600u64);

    let data_dir = std::env::var_os("ASTEROIDS_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let settings = Settings::load(&data_dir.join("settings.json"));
    let store = FileScoreStore::open(data_dir.join("profile.json"));

    log::info!("Asteroids Survival (headless) starting, seed {} for {} frames", seed, frames);

    let mut session = Session::new(seed, settings, store);
    let mut dialogs = AutoDialogs::default();
    let mut toasts = LogToasts;
    let mut drawn = 0usize;

    for frame in 0..frames {
        session.frame(&autopilot(frame), &mut dialogs, &mut toasts);
        let state = session.state();
        drawn = draw_list(state, &state.settings.viewport()).len();
        if session.is_finished() {
            break;
        }
    }

    let state = session.state();
    println!("\nRun summary (seed {})", seed);
    println!("  frames simulated : {}", state.time_ticks);
    println!("  rounds played    : {}", state.round);
    println!("  entities alive   : {}", state.entities.len());
    println!("  last frame draws : {}", drawn);
    if let Some(player) = state.player() {
        println!("  score remaining  : {:.1}", player.score);
        println!("  round best       : {:.1}", player.highest_this_round);
    }
    println!("  best score ever  : {:.1}", session.store().profile().best_score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_arg<T: std::str::FromStr>(arg: Option<String>, name: &str, default: T) -> T {
    match arg {
        None => default,
        Some(text) => text.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring bad {} argument '{}'", name, text);
            default
        }),
    }
}

/// Keeps turning, taps the trigger and gives a short burst of thrust now and then
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(frame: u64) -> Vec<asteroids_survival::sim::InputEvent> {
    use asteroids_survival::sim::{InputEvent, Key};

    let mut input = Vec::new();
    if frame % 60 == 0 {
        input.push(InputEvent::Pressed(Key::RotateRight));
    }
    match frame % 15 {
        0 => input.push(InputEvent::Pressed(Key::Fire)),
        1 => input.push(InputEvent::Released(Key::Fire)),
        _ => {}
    }
    match frame % 240 {
        0 => input.push(InputEvent::Pressed(Key::Thrust)),
        20 => input.push(InputEvent::Released(Key::Thrust)),
        _ => {}
    }
    input
}
