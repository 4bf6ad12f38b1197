use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::time::Duration;
use train_tracker::{TrackerConfig, TrackerPlugin};

const CONFIG_PATH: &str = "resources/tracker.toml";
const FRAME_TIME: Duration = Duration::from_millis(50);

#[derive(Resource)]
struct RunLimit(f64);

fn main() -> AppExit {
    let config = match TrackerConfig::load_or_default(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load {}: {}", CONFIG_PATH, err);
            return AppExit::error();
        }
    };

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(FRAME_TIME)),
        LogPlugin::default(),
    ));
    if let Some(limit) = config.run_for_seconds {
        app.insert_resource(RunLimit(limit)).add_systems(Update, exit_after_limit);
    }
    app.add_plugins(TrackerPlugin::new(config)).run()
}

fn exit_after_limit(time: Res<Time<Real>>, limit: Res<RunLimit>, mut exit: MessageWriter<AppExit>) {
    if time.elapsed_secs_f64() >= limit.0 {
        info!("Run limit of {}s reached", limit.0);
        exit.write(AppExit::Success);
    }
}
