// src/render/composer.rs

//! 合成与着色
//!
//! 五个元素（数字、数字、冒号、数字、数字）按布局拷贝进整屏草图，
//! 显示时统一乘以配置的颜色后写入画布。

use embedded_graphics::geometry::{Point, Size};

use crate::{
    common::{config::ColorConfig, error::Result},
    digit::{Colon, SegmentGeometry},
    driver::display::MatrixCanvas,
    graphics::{
        MonoBuffer,
        color::{hsv_to_rgb, mask_color, tint},
    },
};

/// 屏幕上的五个位置，从左到右
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    HourTens,
    HourOnes,
    Colon,
    MinuteTens,
    MinuteOnes,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::HourTens,
        Slot::HourOnes,
        Slot::Colon,
        Slot::MinuteTens,
        Slot::MinuteOnes,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// 元素布局
///
/// 每个元素的左上角是前一个元素的左上角加上它的宽度再加1像素间隔，
/// y坐标相同。小时十位隐藏时不重新排版。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    origins: [Point; 5],
}

impl Layout {
    pub fn new(origin: Point, geometry: SegmentGeometry) -> Self {
        let digit_width = geometry.digit_size().width as i32;
        let mut origins = [origin; 5];
        let mut x = origin.x;
        for (slot, entry) in Slot::ALL.iter().zip(origins.iter_mut()) {
            entry.x = x;
            let width = match slot {
                Slot::Colon => Colon::WIDTH as i32,
                _ => digit_width,
            };
            x += width + 1;
        }
        Self { origins }
    }

    pub fn origin(&self, slot: Slot) -> Point {
        self.origins[slot.index()]
    }
}

/// 合成器，独占整屏草图
pub struct Composer {
    layout: Layout,
    sketch: MonoBuffer,
    applied_brightness: Option<u8>,
}

impl Composer {
    pub fn new(layout: Layout, size: Size) -> Self {
        Self {
            layout,
            sketch: MonoBuffer::new(size),
            applied_brightness: None,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn sketch(&self) -> &MonoBuffer {
        &self.sketch
    }

    /// 把元素的绘制面覆盖到它在草图中的位置
    pub fn stamp(&mut self, slot: Slot, surface: &MonoBuffer) {
        self.sketch.blit(surface, self.layout.origin(slot));
    }

    /// 着色后写入画布并显示
    ///
    /// 亮度与上次下发的不同时先更新画布亮度。电源关闭时只把亮度降到0，
    /// 不写像素也不显示。
    pub fn present<C: MatrixCanvas>(&mut self, canvas: &mut C, color: ColorConfig) -> Result<()> {
        let brightness = color.effective_brightness();
        if self.applied_brightness != Some(brightness) {
            canvas.set_brightness(brightness);
            self.applied_brightness = Some(brightness);
        }
        if !color.power {
            return Ok(());
        }

        let tint_color = hsv_to_rgb(color.hue, color.saturation, color.brightness);
        for (y, row) in self.sketch.rows().enumerate() {
            for (x, pixel) in row.iter().enumerate() {
                canvas.set_pixel(
                    Point::new(x as i32, y as i32),
                    tint(mask_color(*pixel), tint_color),
                );
            }
        }
        canvas.present()
    }
}
