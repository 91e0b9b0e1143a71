// src/driver/storage/mod.rs

use crate::common::error::Result;

/// 配置存储 trait，以整块字节读写配置
pub trait ConfigStorage {
    /// 读取整个配置数据块，不存在时返回 `None`
    fn read_config_block(&mut self) -> Result<Option<Vec<u8>>>;

    /// 写入整个配置数据块
    fn write_config_block(&mut self, data: &[u8]) -> Result<()>;

    /// 擦除配置
    fn erase_config(&mut self) -> Result<()>;
}

mod file;
pub use file::FileConfigStorage;

pub type DefaultConfigStorage = FileConfigStorage;
