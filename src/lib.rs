//! 变形数字LED点阵时钟
//!
//! 四个七段数字加一个冒号，数字变化时逐帧变形；外部通过UDP推送的
//! 画面可以暂时接管点阵，安静一段时间后时钟自动恢复。

pub mod codec;
pub mod common;
pub mod digit;
pub mod driver;
pub mod graphics;
pub mod render;
pub mod service;
pub mod tasks;
