// src/codec/ppm.rs

//! 外部画面解码
//!
//! 数据报的内容是二进制 netpbm 图像（`P6`，maxval 不超过255）。
//! 画面的偏移量可以写在头部注释 `#FT: x y z` 中，也可以作为
//! 像素数据之后的 `x y z` 尾注，两者都有时以尾注为准。

use embedded_graphics::{geometry::Point, pixelcolor::Rgb888};

use crate::common::error::{AppError, Result};

/// 解码后的外部画面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb888>,
    /// 画面左上角在画布上的位置
    pub offset: Point,
    /// 图层（只记录，不参与合成）
    pub layer: i32,
}

impl Bitmap {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = HeaderReader { data, pos: 0, offset: None };

        if !data.starts_with(b"P6") {
            return Err(AppError::Decode("not a binary PPM (P6) image"));
        }
        reader.pos = 2;

        let width = reader.number()?;
        let height = reader.number()?;
        let maxval = reader.number()?;
        if width == 0 || height == 0 {
            return Err(AppError::Decode("empty image"));
        }
        if maxval == 0 || maxval > 255 {
            return Err(AppError::Decode("maxval must be within 1..=255"));
        }

        // 头部与像素数据之间恰好一个空白字符
        match data.get(reader.pos) {
            Some(b) if b.is_ascii_whitespace() => reader.pos += 1,
            _ => return Err(AppError::Decode("missing separator before pixel data")),
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or(AppError::Decode("image dimensions overflow"))?;
        let end = reader
            .pos
            .checked_add(len)
            .ok_or(AppError::Decode("image dimensions overflow"))?;
        let body = data
            .get(reader.pos..end)
            .ok_or(AppError::Decode("truncated pixel data"))?;

        let scale = |v: u8| (u32::from(v.min(maxval as u8)) * 255 / maxval) as u8;
        let pixels = body
            .chunks_exact(3)
            .map(|rgb| Rgb888::new(scale(rgb[0]), scale(rgb[1]), scale(rgb[2])))
            .collect();

        let footer = parse_offset(&data[end..]);
        let (x, y, layer) = footer.or(reader.offset).unwrap_or((0, 0, 0));

        Ok(Self {
            width,
            height,
            pixels,
            offset: Point::new(x, y),
            layer,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// 按画布坐标遍历所有像素
    pub fn placed_pixels(&self) -> impl Iterator<Item = (Point, Rgb888)> + '_ {
        let width = self.width as usize;
        self.pixels.iter().enumerate().map(move |(i, color)| {
            let local = Point::new((i % width) as i32, (i / width) as i32);
            (self.offset + local, *color)
        })
    }
}

struct HeaderReader<'a> {
    data: &'a [u8],
    pos: usize,
    offset: Option<(i32, i32, i32)>,
}

impl HeaderReader<'_> {
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self
                .data
                .get(self.pos)
                .is_some_and(|b| b.is_ascii_whitespace())
            {
                self.pos += 1;
            }
            if self.data.get(self.pos) != Some(&b'#') {
                return;
            }

            let end = self.data[self.pos..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|n| self.pos + n)
                .unwrap_or(self.data.len());
            let comment = &self.data[self.pos + 1..end];
            if let Some(rest) = comment.strip_prefix(b"FT:") {
                self.offset = parse_offset(rest).or(self.offset);
            }
            self.pos = end;
        }
    }

    fn number(&mut self) -> Result<u32> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while self.data.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        core::str::from_utf8(&self.data[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(AppError::Decode("malformed header number"))
    }
}

/// 解析 `x y [z]`，格式不对时返回 `None`
fn parse_offset(text: &[u8]) -> Option<(i32, i32, i32)> {
    let text = core::str::from_utf8(text).ok()?;
    let values: Vec<i32> = text
        .split_whitespace()
        .map(str::parse)
        .collect::<core::result::Result<_, _>>()
        .ok()?;
    match values.as_slice() {
        [x, y] => Some((*x, *y, 0)),
        [x, y, z] => Some((*x, *y, *z)),
        _ => None,
    }
}
