// src/driver/display/mod.rs

/// LED点阵显示驱动模块
///
/// 本模块定义了点阵画布的通用接口，以及内置的模拟器实现
use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::Rgb888,
};

use crate::common::error::Result;

mod simulator;

pub use simulator::SimulatorCanvas;

/// 默认的画布实现
pub type DefaultCanvas = SimulatorCanvas;

/// 点阵画布trait
///
/// 像素先写入后台缓冲区，调用 `present` 后才显示出来。
/// 时钟循环与外部画面之间通过交接协议转移画布的所有权，
/// 任何时刻只有一方持有它。
pub trait MatrixCanvas {
    /// 画布的像素尺寸
    fn size(&self) -> Size;

    /// 设置后台缓冲区中的像素，越界坐标被忽略
    fn set_pixel(&mut self, point: Point, color: Rgb888);

    /// 清空后台缓冲区
    fn clear(&mut self);

    /// 显示后台缓冲区的内容（缓冲区内容保留）
    ///
    /// # 返回值
    /// - `Result<()>`: 显示结果
    fn present(&mut self) -> Result<()>;

    /// 设置面板亮度（0-100）
    fn set_brightness(&mut self, brightness: u8);

    fn brightness(&self) -> u8;

    /// 关闭画布，释放硬件
    fn close(&mut self) -> Result<()>;
}
