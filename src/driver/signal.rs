// src/driver/signal.rs

//! 终止信号处理
//!
//! 在主线程中屏蔽 SIGINT/SIGTERM（之后创建的线程继承屏蔽字），
//! 由专门的线程用 sigwait 同步等待信号并通知执行器。

use std::thread::{self, JoinHandle};

use log::{error, info, warn};

use crate::common::{
    GlobalSignal,
    error::{AppError, Result},
};

/// 被屏蔽的终止信号集合
#[derive(Clone, Copy)]
pub struct TerminationSignals {
    set: libc::sigset_t,
}

/// 屏蔽 SIGINT 与 SIGTERM，必须在创建其它线程之前调用
pub fn block_termination_signals() -> Result<TerminationSignals> {
    // SAFETY: sigset_t 是普通数据，由 sigemptyset 初始化后才使用
    let set = unsafe {
        let mut set: libc::sigset_t = core::mem::zeroed();
        libc::sigemptyset(&mut set);
        libc::sigaddset(&mut set, libc::SIGINT);
        libc::sigaddset(&mut set, libc::SIGTERM);
        set
    };

    // SAFETY: set 已初始化，不需要旧的屏蔽字
    let rc = unsafe { libc::pthread_sigmask(libc::SIG_BLOCK, &set, core::ptr::null_mut()) };
    if rc != 0 {
        return Err(AppError::SignalError(format!("pthread_sigmask failed: {}", rc)));
    }
    Ok(TerminationSignals { set })
}

/// 启动信号等待线程
///
/// 第一次收到信号时通知 `shutdown`，第二次直接退出进程。
pub fn spawn_signal_watcher(
    signals: TerminationSignals,
    shutdown: &'static GlobalSignal<()>,
) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("signal-watcher".to_string())
        .spawn(move || {
            let mut received = 0;
            loop {
                let mut signal: libc::c_int = 0;
                // SAFETY: set 在 block_termination_signals 中初始化
                let rc = unsafe { libc::sigwait(&signals.set, &mut signal) };
                if rc != 0 {
                    error!("sigwait failed: {}", rc);
                    return;
                }

                received += 1;
                if received > 1 {
                    warn!("Received signal {} again, exiting immediately", signal);
                    std::process::exit(1);
                }
                info!("Received signal {}, shutting down", signal);
                shutdown.signal(());
            }
        })
        .map_err(|e| AppError::SignalError(format!("spawn signal watcher: {}", e)))
}
