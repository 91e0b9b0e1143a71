// src/tasks/control_task.rs
use core::convert::Infallible;

use log::{debug, info};
use serde::Deserialize;

use crate::{
    common::{
        config::ColorConfig,
        error::{AppError, Result},
    },
    driver::display::DefaultCanvas,
    tasks::ClockContext,
};

/// 远程控制事件（开关、亮度、饱和度、色相）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    Power(bool),
    /// 0-100
    Brightness(u8),
    /// 0-100
    Saturation(f32),
    /// 0-360
    Hue(f32),
}

impl ControlEvent {
    /// 把事件写入颜色配置，超出范围的值被截断
    pub fn apply(self, color: &mut ColorConfig) {
        match self {
            ControlEvent::Power(on) => color.power = on,
            ControlEvent::Brightness(value) => color.brightness = value.min(100),
            ControlEvent::Saturation(value) => color.saturation = value.clamp(0.0, 100.0),
            ControlEvent::Hue(value) => color.hue = value.clamp(0.0, 360.0),
        }
    }
}

/// 控制数据报，例如 `{"power":false}` 或 `{"hue":120.0,"saturation":50.0}`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ControlMessage {
    power: Option<bool>,
    brightness: Option<f64>,
    saturation: Option<f64>,
    hue: Option<f64>,
}

/// 解析控制数据报
pub fn parse_control(data: &[u8]) -> Result<Vec<ControlEvent>> {
    let message: ControlMessage =
        serde_json::from_slice(data).map_err(|e| AppError::ConfigError(e.to_string()))?;

    let mut events = Vec::new();
    if let Some(on) = message.power {
        events.push(ControlEvent::Power(on));
    }
    if let Some(value) = message.brightness {
        events.push(ControlEvent::Brightness(value.round().clamp(0.0, 100.0) as u8));
    }
    if let Some(value) = message.saturation {
        events.push(ControlEvent::Saturation(value as f32));
    }
    if let Some(value) = message.hue {
        events.push(ControlEvent::Hue(value as f32));
    }
    Ok(events)
}

/// 处理远程控制事件：更新配置并请求时钟重画
pub async fn run_control<C: Send>(ctx: &ClockContext<C>) -> Infallible {
    loop {
        let event = ctx.controls.receive().await;
        info!("Control event: {:?}", event);
        let color = ctx.config.update(|config| {
            event.apply(&mut config.color);
            config.color
        });
        debug!("Color now {:?}", color);
        ctx.redraw.signal(());
    }
}

#[embassy_executor::task]
pub async fn control_task(ctx: &'static ClockContext<DefaultCanvas>) {
    info!("Control task started");
    match run_control(ctx).await {}
}
