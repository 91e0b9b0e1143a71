// src/common/mod.rs

/// 公共模块定义
///
/// 本模块定义了时钟程序的公共类型：配置、错误处理以及跨任务同步原语
pub mod config;
pub mod error;

pub use config::{ClockConfig, ColorConfig, SharedConfig};
pub use error::{AppError, Result};

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel, signal::Signal};

/// 全局信号类型别名
///
/// 网络线程与执行器之间需要跨线程唤醒，统一使用CriticalSectionRawMutex
pub type GlobalSignal<T> = Signal<CriticalSectionRawMutex, T>;

/// 全局通道类型别名
///
/// 外部画面在解码后经过此通道交给覆盖任务，容量很小，
/// 接收端忙时网络线程会阻塞等待
pub type GlobalChannel<T> = Channel<CriticalSectionRawMutex, T, 4>;
