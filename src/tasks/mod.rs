// src/tasks/mod.rs

//! 执行器任务与任务间的共享上下文
//!
//! 时钟循环与外部画面协调器轮流持有画布。画布本身通过 [`Handoff`]
//! 在两者之间移交，任何时刻只有一方可以写它。

pub mod clock_task;
pub mod control_task;
pub mod override_task;

pub use clock_task::{clock_task, run_clock};
pub use control_task::{ControlEvent, control_task, run_control};
pub use override_task::{override_task, run_override};

use embassy_sync::{channel::Channel, signal::Signal};

use crate::{
    codec::Bitmap,
    common::{ClockConfig, GlobalChannel, GlobalSignal, SharedConfig},
};

/// 画布交接协议
///
/// 协调器一侧：`launch` 把画布交给时钟循环，`request_stop` 请求停止并
/// 等待时钟循环把画布交回。时钟一侧：`wait_launch` 取得画布，在帧间
/// 检查 `stop_requested`，最后用 `acknowledge` 交回画布。
pub struct Handoff<S> {
    start: GlobalSignal<S>,
    stop: GlobalSignal<()>,
    stopped: GlobalSignal<S>,
}

impl<S: Send> Handoff<S> {
    pub const fn new() -> Self {
        Self {
            start: Signal::new(),
            stop: Signal::new(),
            stopped: Signal::new(),
        }
    }

    /// 把画布交给时钟循环并启动它
    pub fn launch(&self, surface: S) {
        self.start.signal(surface);
    }

    /// 请求时钟循环停止，返回它交回的画布
    pub async fn request_stop(&self) -> S {
        self.stop.signal(());
        self.stopped.wait().await
    }

    pub async fn wait_launch(&self) -> S {
        self.start.wait().await
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.signaled()
    }

    pub async fn wait_stop(&self) {
        self.stop.wait().await
    }

    /// 时钟循环已经停止，交回画布
    pub fn acknowledge(&self, surface: S) {
        self.stop.reset();
        self.stopped.signal(surface);
    }
}

impl<S: Send> Default for Handoff<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// 各任务共享的上下文
pub struct ClockContext<S> {
    pub config: SharedConfig,
    pub handoff: Handoff<S>,
    /// 颜色或电源变化后请求时钟重画
    pub redraw: GlobalSignal<()>,
    /// 收到终止信号
    pub shutdown: GlobalSignal<()>,
    /// 画布已清空并关闭，可以退出进程
    pub finished: GlobalSignal<()>,
    /// 解码后的外部画面
    pub frames: GlobalChannel<Bitmap>,
    /// 远程控制事件
    pub controls: GlobalChannel<ControlEvent>,
}

impl<S: Send> ClockContext<S> {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            config: SharedConfig::new(config),
            handoff: Handoff::new(),
            redraw: Signal::new(),
            shutdown: Signal::new(),
            finished: Signal::new(),
            frames: Channel::new(),
            controls: Channel::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::{block_on, join::join};

    use super::*;

    #[test]
    fn test_stop_before_clock_starts_is_not_lost() {
        let handoff: Handoff<u32> = Handoff::new();
        handoff.launch(7);

        let (returned, ()) = block_on(join(handoff.request_stop(), async {
            let surface = handoff.wait_launch().await;
            assert!(handoff.stop_requested());
            handoff.acknowledge(surface);
        }));

        assert_eq!(returned, 7);
        assert!(!handoff.stop_requested());
    }

    #[test]
    fn test_relaunch_after_acknowledge() {
        let handoff: Handoff<u32> = Handoff::new();
        handoff.launch(1);

        let (returned, ()) = block_on(join(handoff.request_stop(), async {
            let surface = handoff.wait_launch().await;
            handoff.wait_stop().await;
            handoff.acknowledge(surface + 1);
        }));
        assert_eq!(returned, 2);

        // 协调器取回画布后重新启动，新一轮不会看到旧的停止请求
        handoff.launch(returned);
        assert_eq!(block_on(handoff.wait_launch()), 2);
        assert!(!handoff.stop_requested());
    }
}
