// src/common/config.rs
use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embassy_time::Duration;
use embedded_graphics::geometry::{Point, Size};
use serde::{Deserialize, Serialize};

/// 时钟配置
///
/// 启动时从配置文件加载，正常退出时写回。运行期间只有颜色相关字段
/// （电源、亮度、色相、饱和度）会被远程控制修改。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub color: ColorConfig,
    pub layout: LayoutConfig,
    pub timing: TimingConfig,
    pub network: NetworkConfig,
    pub matrix: MatrixConfig,
}

/// 颜色配置（HSV + 电源）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub power: bool,
    /// 色相 0-360
    pub hue: f32,
    /// 饱和度 0-100
    pub saturation: f32,
    /// 亮度 0-100
    pub brightness: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// 最左侧数字的原点，可以为负数（把小时十位裁掉一部分）
    pub origin_x: i32,
    pub origin_y: i32,
    /// 数码段长度（像素）
    pub segment_length: u32,
    /// 小时十位为0时是否显示
    pub leading_zero: bool,
    /// jiff strftime 格式，输出必须是 `HH:MM`
    pub time_format: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// 动画帧间隔（毫秒）
    pub frame_interval_ms: u64,
    /// 外部画面停止推送后回到时钟的等待时间（毫秒）
    pub override_return_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub bind_address: String,
    /// 外部画面（PPM数据报）端口
    pub override_port: u16,
    /// 远程控制（JSON数据报）端口，None 表示不启用
    pub control_port: Option<u16>,
}

/// LED 点阵参数，交给显示驱动使用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub rows: u32,
    pub cols: u32,
    pub chain_length: u32,
    pub parallel: u32,
    pub hardware_mapping: String,
    pub show_refresh: bool,
    pub inverse_colors: bool,
    pub disable_hardware_pulsing: bool,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            power: true,
            hue: 240.0,
            saturation: 100.0,
            brightness: 30,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: -6,
            origin_y: 1,
            segment_length: 6,
            leading_zero: false,
            time_format: "%I:%M".to_string(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 30,
            override_return_ms: 30_000,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            override_port: 1337,
            control_port: None,
        }
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            rows: 16,
            cols: 32,
            chain_length: 1,
            parallel: 1,
            hardware_mapping: "regular".to_string(),
            show_refresh: false,
            inverse_colors: false,
            disable_hardware_pulsing: false,
        }
    }
}

impl LayoutConfig {
    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }
}

impl TimingConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn override_return(&self) -> Duration {
        Duration::from_millis(self.override_return_ms)
    }
}

impl MatrixConfig {
    /// 整个点阵的像素尺寸（级联的面板横向拼接，并行的面板纵向拼接）
    pub fn size(&self) -> Size {
        Size::new(
            self.cols * self.chain_length.max(1),
            self.rows * self.parallel.max(1),
        )
    }
}

impl ColorConfig {
    /// 实际下发给显示驱动的亮度
    pub fn effective_brightness(&self) -> u8 {
        if self.power { self.brightness } else { 0 }
    }
}

/// 跨任务共享的配置句柄
///
/// 渲染路径每帧取一次快照，远程控制直接修改，后写者生效。
pub struct SharedConfig {
    inner: Mutex<CriticalSectionRawMutex, RefCell<ClockConfig>>,
}

impl SharedConfig {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(config)),
        }
    }

    pub fn snapshot(&self) -> ClockConfig {
        self.inner.lock(|cell| cell.borrow().clone())
    }

    pub fn color(&self) -> ColorConfig {
        self.inner.lock(|cell| cell.borrow().color)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ClockConfig) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ClockConfig =
            serde_json::from_str(r#"{"color":{"hue":120.0},"layout":{"leading_zero":true}}"#)
                .unwrap();

        assert_eq!(config.color.hue, 120.0);
        assert_eq!(config.color.brightness, 30);
        assert!(config.layout.leading_zero);
        assert_eq!(config.layout.segment_length, 6);
        assert_eq!(config.network.override_port, 1337);
    }

    #[test]
    fn test_matrix_size_accounts_for_chain_and_parallel() {
        let matrix = MatrixConfig {
            chain_length: 2,
            parallel: 3,
            ..MatrixConfig::default()
        };
        assert_eq!(matrix.size(), Size::new(64, 48));
    }

    #[test]
    fn test_power_off_forces_zero_brightness() {
        let color = ColorConfig {
            power: false,
            ..ColorConfig::default()
        };
        assert_eq!(color.effective_brightness(), 0);
        assert_eq!(ColorConfig::default().effective_brightness(), 30);
    }

    #[test]
    fn test_shared_config_update_is_visible_in_snapshot() {
        let shared = SharedConfig::new(ClockConfig::default());
        shared.update(|c| c.color.saturation = 0.0);
        assert_eq!(shared.snapshot().color.saturation, 0.0);
        assert_eq!(shared.color().saturation, 0.0);
    }
}
