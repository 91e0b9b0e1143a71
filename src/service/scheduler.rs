// src/service/scheduler.rs

//! 时钟调度
//!
//! 每分钟读一次时间，逐个把值发生变化的字位变形到新值。字位按
//! 分钟个位、分钟十位、小时个位、小时十位的顺序依次动画，一个字位
//! 完成后下一个才开始。每一帧之后检查停止请求。

use embassy_time::{Duration, Timer};
use embedded_graphics::geometry::Size;
use jiff::Zoned;
use log::{debug, warn};

use crate::{
    common::{SharedConfig, config::ClockConfig, error::Result},
    digit::{Colon, Digit, Glyph, SegmentGeometry},
    driver::{display::MatrixCanvas, time_source::ClockReading},
    render::{Composer, Layout, Slot},
};

/// 字位顺序与 [`ClockReading::digits`] 一致
const DIGIT_SLOTS: [Slot; 4] = [
    Slot::HourTens,
    Slot::HourOnes,
    Slot::MinuteTens,
    Slot::MinuteOnes,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Completed,
    /// 收到停止请求，在帧间退出
    Stopped,
}

/// 一轮时钟运行的全部状态
///
/// 每次启动时钟循环都新建一个，字位从空白开始。
pub struct ClockScheduler {
    digits: [Digit; 4],
    colon: Colon,
    colon_drawn: bool,
    composer: Composer,
    time_format: String,
    leading_zero: bool,
    frame_interval: Duration,
}

impl ClockScheduler {
    pub fn new(config: &ClockConfig, size: Size) -> Self {
        let geometry = SegmentGeometry::new(config.layout.segment_length);
        let layout = Layout::new(config.layout.origin(), geometry);
        Self {
            digits: core::array::from_fn(|_| Digit::new(geometry)),
            colon: Colon::new(geometry),
            colon_drawn: false,
            composer: Composer::new(layout, size),
            time_format: config.layout.time_format.clone(),
            leading_zero: config.layout.leading_zero,
            frame_interval: config.timing.frame_interval(),
        }
    }

    pub fn values(&self) -> [Glyph; 4] {
        core::array::from_fn(|i| self.digits[i].value())
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn read(&self, time: &Zoned) -> Result<ClockReading> {
        ClockReading::from_zoned(time, &self.time_format, self.leading_zero)
    }

    /// 把显示推进到 `reading`
    pub async fn tick<C: MatrixCanvas>(
        &mut self,
        reading: &ClockReading,
        canvas: &mut C,
        config: &SharedConfig,
        stop: &impl Fn() -> bool,
    ) -> TickOutcome {
        for index in [3, 2] {
            if self.animate(index, reading.digits[index], canvas, config, stop).await
                == TickOutcome::Stopped
            {
                return TickOutcome::Stopped;
            }
        }

        if !self.colon_drawn {
            self.colon.draw();
            self.composer.stamp(Slot::Colon, self.colon.surface());
            self.colon_drawn = true;
            Timer::after(self.frame_interval).await;
            if stop() {
                return TickOutcome::Stopped;
            }
        }

        for index in [1, 0] {
            if self.animate(index, reading.digits[index], canvas, config, stop).await
                == TickOutcome::Stopped
            {
                return TickOutcome::Stopped;
            }
        }
        TickOutcome::Completed
    }

    async fn animate<C: MatrixCanvas>(
        &mut self,
        index: usize,
        target: Glyph,
        canvas: &mut C,
        config: &SharedConfig,
        stop: &impl Fn() -> bool,
    ) -> TickOutcome {
        if self.digits[index].value() == target {
            return TickOutcome::Completed;
        }
        debug!(
            "Morphing {:?}: {} -> {}",
            DIGIT_SLOTS[index],
            self.digits[index].value(),
            target
        );

        loop {
            let done = self.digits[index].morph(target);
            self.composer
                .stamp(DIGIT_SLOTS[index], self.digits[index].surface());
            self.present(canvas, config);
            Timer::after(self.frame_interval).await;

            if done {
                return TickOutcome::Completed;
            }
            if stop() {
                return TickOutcome::Stopped;
            }
        }
    }

    /// 用最新的颜色重新显示当前草图
    pub fn present<C: MatrixCanvas>(&mut self, canvas: &mut C, config: &SharedConfig) {
        if let Err(e) = self.composer.present(canvas, config.color()) {
            warn!("Failed to present clock frame: {}", e);
        }
    }
}
