//! 单色帧缓冲区（每像素点亮/熄灭）

use core::convert::Infallible;

use embedded_graphics::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    primitives::{PointsIter, Rectangle},
};

/// 单色帧缓冲区
///
/// 数字、冒号的绘制面以及合成用的整屏草图都是这种缓冲区。
/// 只记录点亮与否，颜色在输出时统一着色。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoBuffer {
    size: Size,
    pixels: Vec<BinaryColor>,
}

impl MonoBuffer {
    /// 创建新的缓冲区，初始全部熄灭
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![BinaryColor::Off; (size.width * size.height) as usize],
        }
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (point.x, point.y);
        if x < 0 || y < 0 || x >= self.size.width as i32 || y >= self.size.height as i32 {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }

    /// 读取像素，越界视为熄灭
    pub fn pixel(&self, point: Point) -> BinaryColor {
        self.index(point)
            .map(|i| self.pixels[i])
            .unwrap_or(BinaryColor::Off)
    }

    /// 设置像素，越界的坐标直接忽略
    pub fn set_pixel(&mut self, point: Point, color: BinaryColor) {
        if let Some(i) = self.index(point) {
            self.pixels[i] = color;
        }
    }

    /// 清除缓冲区（全部熄灭）
    pub fn reset(&mut self) {
        self.pixels.fill(BinaryColor::Off);
    }

    /// 把另一块缓冲区原样覆盖到 `origin` 处，超出本缓冲区的部分被裁掉
    pub fn blit(&mut self, source: &MonoBuffer, origin: Point) {
        for point in source.bounding_box().points() {
            self.set_pixel(origin + point, source.pixel(point));
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[BinaryColor]> {
        self.pixels.chunks(self.size.width.max(1) as usize)
    }

    /// 所有点亮像素的坐标
    pub fn lit_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.bounding_box()
            .points()
            .filter(|p| self.pixel(*p) == BinaryColor::On)
    }

    pub fn is_region_lit(&self, region: &Rectangle) -> bool {
        region.points().all(|p| self.pixel(p) == BinaryColor::On)
    }
}

impl OriginDimensions for MonoBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for MonoBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        for point in area.points() {
            self.set_pixel(point, color);
        }
        Ok(())
    }
}
