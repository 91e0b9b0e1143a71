// src/driver/network/mod.rs

//! UDP 监听线程
//!
//! 套接字读写是阻塞的，放在独立的系统线程中运行，结果通过
//! embassy-sync 通道交给执行器上的任务。单个数据报的错误只记录日志，
//! 传输层的致命错误会结束监听线程。

use std::io::{self, ErrorKind};
use std::net::{SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};

use crate::{
    codec::Bitmap,
    common::{
        GlobalChannel,
        error::{AppError, Result},
    },
    tasks::{ControlEvent, control_task::parse_control},
};

/// UDP 数据报的最大长度
const MAX_DATAGRAM: usize = 65_535;

/// 可以忽略并继续接收的套接字错误
pub fn is_recoverable(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Interrupted
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionRefused
    )
}

pub fn bind(address: &str, port: u16) -> Result<UdpSocket> {
    let socket = UdpSocket::bind((address, port))
        .map_err(|e| AppError::NetworkError(format!("bind {}:{}: {}", address, port, e)))?;
    info!("Listening on udp://{}:{}", address, port);
    Ok(socket)
}

/// 启动外部画面监听线程
pub fn spawn_override_listener(
    socket: UdpSocket,
    frames: &'static GlobalChannel<Bitmap>,
) -> Result<JoinHandle<()>> {
    spawn_listener("override-listener", socket, move |data, peer| {
        match Bitmap::decode(data) {
            Ok(bitmap) => {
                debug!(
                    "Frame {}x{} at {:?} from {}",
                    bitmap.width, bitmap.height, bitmap.offset, peer
                );
                embassy_futures::block_on(frames.send(bitmap));
            }
            Err(e) => warn!("Dropping datagram from {}: {}", peer, e),
        }
    })
}

/// 启动远程控制监听线程
pub fn spawn_control_listener(
    socket: UdpSocket,
    controls: &'static GlobalChannel<ControlEvent>,
) -> Result<JoinHandle<()>> {
    spawn_listener("control-listener", socket, move |data, peer| {
        match parse_control(data) {
            Ok(events) => {
                for event in events {
                    embassy_futures::block_on(controls.send(event));
                }
            }
            Err(e) => warn!("Ignoring control message from {}: {}", peer, e),
        }
    })
}

fn spawn_listener<F>(name: &str, socket: UdpSocket, handle: F) -> Result<JoinHandle<()>>
where
    F: FnMut(&[u8], SocketAddr) + Send + 'static,
{
    let thread_name = name.to_string();
    thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            if let Err(e) = receive_loop(&socket, handle) {
                error!("{} stopped: {}", thread_name, e);
            }
        })
        .map_err(|e| AppError::NetworkError(format!("spawn {}: {}", name, e)))
}

/// 接收数据报直到出现不可恢复的错误
pub fn receive_loop<F>(socket: &UdpSocket, mut handle: F) -> io::Result<()>
where
    F: FnMut(&[u8], SocketAddr),
{
    let mut buffer = vec![0u8; MAX_DATAGRAM];
    loop {
        match socket.recv_from(&mut buffer) {
            Ok((len, peer)) => handle(&buffer[..len], peer),
            Err(e) if is_recoverable(e.kind()) => {
                debug!("Recoverable socket error: {}", e);
            }
            Err(e) => return Err(e),
        }
    }
}
