// src/tasks/clock_task.rs
use core::convert::Infallible;

use embassy_futures::select::{Either3, select3};
use embassy_time::{Duration, Instant, Timer};
use log::{debug, info, warn};

use crate::{
    driver::{
        display::{DefaultCanvas, MatrixCanvas},
        time_source::{SystemClock, TimeSource, until_next_minute},
    },
    service::scheduler::{ClockScheduler, TickOutcome},
    tasks::ClockContext,
};

/// 时钟循环
///
/// 等待协调器交来画布后从空白开始运行，直到收到停止请求，
/// 随后交回画布并等待下一次启动。
pub async fn run_clock<C, T>(ctx: &ClockContext<C>, time: &T) -> Infallible
where
    C: MatrixCanvas + Send,
    T: TimeSource,
{
    loop {
        let mut canvas = ctx.handoff.wait_launch().await;
        info!("Clock loop launched");

        let mut scheduler = ClockScheduler::new(&ctx.config.snapshot(), canvas.size());
        run_until_stopped(&mut scheduler, &mut canvas, ctx, time).await;

        ctx.handoff.acknowledge(canvas);
        info!("Clock loop stopped");
    }
}

async fn run_until_stopped<C, T>(
    scheduler: &mut ClockScheduler,
    canvas: &mut C,
    ctx: &ClockContext<C>,
    time: &T,
) where
    C: MatrixCanvas + Send,
    T: TimeSource,
{
    let stop = || ctx.handoff.stop_requested();

    loop {
        if stop() {
            return;
        }

        match time.now().and_then(|now| scheduler.read(&now)) {
            Ok(reading) => {
                debug!("Clock tick: {:?}", reading.digits);
                if scheduler.tick(&reading, canvas, &ctx.config, &stop).await
                    == TickOutcome::Stopped
                {
                    return;
                }
            }
            Err(e) => warn!("Skipping clock tick: {}", e),
        }

        let wait = match time.now() {
            Ok(now) => until_next_minute(&now),
            Err(e) => {
                warn!("Failed to read time, retrying in a minute: {}", e);
                Duration::from_secs(60)
            }
        };
        let deadline = Instant::now() + wait;

        loop {
            match select3(
                Timer::at(deadline),
                ctx.handoff.wait_stop(),
                ctx.redraw.wait(),
            )
            .await
            {
                Either3::First(()) => break,
                Either3::Second(()) => return,
                Either3::Third(()) => {
                    debug!("Redrawing clock with updated color");
                    scheduler.present(canvas, &ctx.config);
                }
            }
        }
    }
}

#[embassy_executor::task]
pub async fn clock_task(ctx: &'static ClockContext<DefaultCanvas>, time: SystemClock) {
    info!("Clock task started");
    match run_clock(ctx, &time).await {}
}
