// src/tasks/override_task.rs
use embassy_futures::select::{Either, Either3, select, select3};
use embassy_time::Timer;
use log::{error, info, warn};

use crate::{
    codec::Bitmap,
    driver::display::{DefaultCanvas, MatrixCanvas},
    tasks::ClockContext,
};

/// 外部画面期间的面板亮度
pub const OVERRIDE_BRIGHTNESS: u8 = 100;

enum Wake {
    Frame(Bitmap),
    Quiet,
    Shutdown,
}

/// 外部画面协调器
///
/// 收到第一帧外部画面时停止时钟循环并接管画布，此后每帧直接画到画布上。
/// 超过 `override_return` 没有新画面时恢复亮度并重新启动时钟。
/// 收到终止信号时取回画布，清空并关闭后返回。
pub async fn run_override<C>(ctx: &ClockContext<C>) -> C
where
    C: MatrixCanvas + Send,
{
    let mut held: Option<C> = None;

    loop {
        let wake = if held.is_some() {
            let quiet = Timer::after(ctx.config.snapshot().timing.override_return());
            match select3(ctx.frames.receive(), quiet, ctx.shutdown.wait()).await {
                Either3::First(bitmap) => Wake::Frame(bitmap),
                Either3::Second(()) => Wake::Quiet,
                Either3::Third(()) => Wake::Shutdown,
            }
        } else {
            match select(ctx.frames.receive(), ctx.shutdown.wait()).await {
                Either::First(bitmap) => Wake::Frame(bitmap),
                Either::Second(()) => Wake::Shutdown,
            }
        };

        match wake {
            Wake::Frame(bitmap) => {
                if held.is_none() {
                    info!("Override session started, stopping clock");
                    let mut canvas = ctx.handoff.request_stop().await;
                    canvas.set_brightness(OVERRIDE_BRIGHTNESS);
                    canvas.clear();
                    held = Some(canvas);
                }
                let Some(canvas) = held.as_mut() else {
                    continue;
                };
                draw_bitmap(canvas, &bitmap);
                if let Err(e) = canvas.present() {
                    warn!("Failed to present override frame: {}", e);
                }
            }
            Wake::Quiet => {
                if let Some(mut canvas) = held.take() {
                    canvas.set_brightness(ctx.config.color().effective_brightness());
                    ctx.handoff.launch(canvas);
                    info!("Override session ended, clock resumed");
                }
            }
            Wake::Shutdown => {
                info!("Shutting down display");
                let mut canvas = match held.take() {
                    Some(canvas) => canvas,
                    None => ctx.handoff.request_stop().await,
                };
                canvas.clear();
                if let Err(e) = canvas.present() {
                    warn!("Failed to blank display: {}", e);
                }
                if let Err(e) = canvas.close() {
                    error!("Failed to close display: {}", e);
                }
                return canvas;
            }
        }
    }
}

/// 把外部画面按偏移画到画布上，超出画布的部分被裁掉
pub fn draw_bitmap<C: MatrixCanvas>(canvas: &mut C, bitmap: &Bitmap) {
    for (point, color) in bitmap.placed_pixels() {
        canvas.set_pixel(point, color);
    }
}

#[embassy_executor::task]
pub async fn override_task(ctx: &'static ClockContext<DefaultCanvas>) {
    info!("Override task started");
    run_override(ctx).await;
    ctx.finished.signal(());
}
