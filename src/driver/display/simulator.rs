// src/driver/display/simulator.rs
use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::{Rgb888, RgbColor},
};
use log::{debug, info, trace};

use super::MatrixCanvas;
use crate::common::{
    config::MatrixConfig,
    error::{AppError, Result},
};

/// 模拟器画布
///
/// 在内存中保存后台缓冲区和当前显示的一帧，每次显示时以ASCII形式
/// 输出到trace日志。
pub struct SimulatorCanvas {
    size: Size,
    back: Vec<Rgb888>,
    shown: Vec<Rgb888>,
    brightness: u8,
    presented: u64,
    closed: bool,
}

impl SimulatorCanvas {
    pub fn new(matrix: &MatrixConfig, brightness: u8) -> Result<Self> {
        let size = matrix.size();
        if size.width == 0 || size.height == 0 {
            return Err(AppError::DisplayInit(format!(
                "invalid matrix geometry {}x{}",
                size.width, size.height
            )));
        }

        info!(
            "Initializing simulator canvas {}x{} (mapping {}, chain {}, parallel {})",
            size.width, size.height, matrix.hardware_mapping, matrix.chain_length, matrix.parallel
        );
        if matrix.show_refresh || matrix.inverse_colors || matrix.disable_hardware_pulsing {
            debug!(
                "Ignoring hardware options: show_refresh={}, inverse_colors={}, disable_hardware_pulsing={}",
                matrix.show_refresh, matrix.inverse_colors, matrix.disable_hardware_pulsing
            );
        }

        let pixels = (size.width * size.height) as usize;
        Ok(Self {
            size,
            back: vec![Rgb888::BLACK; pixels],
            shown: vec![Rgb888::BLACK; pixels],
            brightness: brightness.min(100),
            presented: 0,
            closed: false,
        })
    }

    fn index(&self, point: Point) -> Option<usize> {
        if point.x < 0
            || point.y < 0
            || point.x >= self.size.width as i32
            || point.y >= self.size.height as i32
        {
            return None;
        }
        Some(point.y as usize * self.size.width as usize + point.x as usize)
    }

    /// 当前显示中的像素
    pub fn shown_pixel(&self, point: Point) -> Rgb888 {
        self.index(point)
            .map(|i| self.shown[i])
            .unwrap_or(Rgb888::BLACK)
    }

    /// 已显示的帧数
    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// 当前显示帧的ASCII表示，点亮的像素为 `#`
    pub fn ascii(&self) -> String {
        let mut out = String::with_capacity(self.shown.len() + self.size.height as usize);
        for row in self.shown.chunks(self.size.width as usize) {
            out.extend(row.iter().map(|c| if *c == Rgb888::BLACK { '.' } else { '#' }));
            out.push('\n');
        }
        out
    }
}

impl MatrixCanvas for SimulatorCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn set_pixel(&mut self, point: Point, color: Rgb888) {
        if let Some(i) = self.index(point) {
            self.back[i] = color;
        }
    }

    fn clear(&mut self) {
        self.back.fill(Rgb888::BLACK);
    }

    fn present(&mut self) -> Result<()> {
        if self.closed {
            return Err(AppError::DisplayUpdateFailed);
        }
        self.shown.copy_from_slice(&self.back);
        self.presented += 1;
        if log::log_enabled!(log::Level::Trace) {
            trace!(
                "Frame #{} (brightness {}):\n{}",
                self.presented,
                self.brightness,
                self.ascii()
            );
        }
        Ok(())
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness.min(100);
        debug!("Canvas brightness set to {}", self.brightness);
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        info!("Simulator canvas closed after {} frames", self.presented);
        Ok(())
    }
}
