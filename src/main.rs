//! 变形数字时钟主入口

use embassy_executor::Spawner;
use log::{error, info, warn};
use static_cell::StaticCell;

use morphing_clock::{
    common::error::{AppError, Result},
    driver::{
        display::DefaultCanvas,
        network, signal,
        storage::DefaultConfigStorage,
        time_source::SystemClock,
    },
    service::ConfigService,
    tasks::{ClockContext, clock_task, control_task, override_task},
};

const DEFAULT_CONFIG_PATH: &str = "morphing-clock.json";

static CONTEXT: StaticCell<ClockContext<DefaultCanvas>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Morphing clock starting");

    match run(spawner).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            error!("Fatal error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(spawner: Spawner) -> Result<()> {
    // 必须在创建任何线程（包括定时器驱动线程）之前屏蔽终止信号
    let signals = signal::block_termination_signals()?;

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    info!("Using configuration file {}", config_path);

    let mut config_service = ConfigService::new(DefaultConfigStorage::new(&config_path));
    let config = config_service.load_or_default();

    let canvas = DefaultCanvas::new(&config.matrix, config.color.effective_brightness())?;
    let ctx: &'static ClockContext<DefaultCanvas> =
        CONTEXT.init(ClockContext::new(config.clone()));

    let socket = network::bind(&config.network.bind_address, config.network.override_port)?;
    network::spawn_override_listener(socket, &ctx.frames)?;

    if let Some(port) = config.network.control_port {
        let socket = network::bind(&config.network.bind_address, port)?;
        network::spawn_control_listener(socket, &ctx.controls)?;
        spawned("control", spawner.spawn(control_task(ctx)))?;
    }

    signal::spawn_signal_watcher(signals, &ctx.shutdown)?;

    spawned("clock", spawner.spawn(clock_task(ctx, SystemClock)))?;
    spawned("override", spawner.spawn(override_task(ctx)))?;

    ctx.handoff.launch(canvas);

    ctx.finished.wait().await;

    if let Err(e) = config_service.save_config(&ctx.config.snapshot()) {
        warn!("Failed to save configuration: {}", e);
    }
    info!("Morphing clock stopped");
    Ok(())
}

fn spawned(
    name: &str,
    result: core::result::Result<(), embassy_executor::SpawnError>,
) -> Result<()> {
    result.map_err(|e| {
        error!("Failed to spawn {} task: {:?}", name, e);
        AppError::TaskSpawn(format!("{}: {:?}", name, e))
    })
}
