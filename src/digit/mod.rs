// src/digit/mod.rs

//! 七段数字字位
//!
//! 每个字位拥有一块单色绘制面，可以瞬间画出某个数字，
//! 也可以逐帧变形到新的数字。

pub mod morph;
pub mod segment;

use embedded_graphics::{
    draw_target::DrawTarget, geometry::Point, pixelcolor::BinaryColor, primitives::Rectangle,
};
use enumset::EnumSet;

use crate::graphics::MonoBuffer;

pub use morph::{Rows, Transition, ZeroFrom};
pub use segment::{Glyph, Numeral, Segment, SegmentGeometry};

/// 字位绘制面
///
/// 绘图原语使用以左下角为原点的字位坐标，矩形与线段都包含两端，
/// 超出绘制面的部分被裁掉。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSurface {
    geometry: SegmentGeometry,
    buffer: MonoBuffer,
}

impl GlyphSurface {
    pub fn new(geometry: SegmentGeometry, width: u32) -> Self {
        let mut size = geometry.digit_size();
        size.width = width;
        Self {
            geometry,
            buffer: MonoBuffer::new(size),
        }
    }

    pub fn segment_length(&self) -> i32 {
        self.geometry.segment_length()
    }

    pub fn buffer(&self) -> &MonoBuffer {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.reset();
    }

    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, lit: bool) {
        let area = Rectangle::with_corners(
            self.geometry.to_buffer(Point::new(x1, y1)),
            self.geometry.to_buffer(Point::new(x2, y2)),
        );
        let Ok(()) = self.buffer.fill_solid(&area, BinaryColor::from(lit));
    }

    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, lit: bool) {
        self.line(x, y, x + w, y + h, lit);
    }

    pub fn point(&mut self, x: i32, y: i32, lit: bool) {
        self.line(x, y, x, y, lit);
    }

    /// 第 `x` 列上一整条竖段高度的像素
    pub fn column(&mut self, x: i32, rows: Rows, lit: bool) {
        let s = self.segment_length();
        match rows {
            Rows::Lower => self.line(x, 1, x, s, lit),
            Rows::Upper => self.line(x, 2 * s + 1, x, s + 2, lit),
        }
    }

    pub fn light_segment(&mut self, segment: Segment) {
        let (a, b) = self.geometry.endpoints(segment);
        self.line(a.x, a.y, b.x, b.y, true);
    }

    /// 完整点亮的段
    pub fn lit_segments(&self) -> EnumSet<Segment> {
        EnumSet::<Segment>::all()
            .iter()
            .filter(|segment| {
                self.buffer
                    .is_region_lit(&self.geometry.segment_area(*segment))
            })
            .collect()
    }
}

/// 一个数字字位
#[derive(Debug, Clone)]
pub struct Digit {
    surface: GlyphSurface,
    value: Glyph,
    frame: i32,
    /// 正在进行的变形的目标
    pending: Option<Numeral>,
}

impl Digit {
    /// 新建字位，初始为空白
    pub fn new(geometry: SegmentGeometry) -> Self {
        Self {
            surface: GlyphSurface::new(geometry, geometry.digit_size().width),
            value: Glyph::Blank,
            frame: 0,
            pending: None,
        }
    }

    pub fn value(&self) -> Glyph {
        self.value
    }

    pub fn frame(&self) -> i32 {
        self.frame
    }

    pub fn surface(&self) -> &MonoBuffer {
        self.surface.buffer()
    }

    pub fn lit_segments(&self) -> EnumSet<Segment> {
        self.surface.lit_segments()
    }

    /// 瞬间画出 `glyph`：黑底上只点亮对应的段
    pub fn draw(&mut self, glyph: Glyph) {
        self.surface.clear();
        for segment in glyph.segments() {
            self.surface.light_segment(segment);
        }
        self.value = glyph;
        self.frame = 0;
        self.pending = None;
    }

    /// 向 `target` 推进一帧，返回变形是否完成
    ///
    /// 原来是空白或目标是空白时直接重画并报告完成。帧数用尽后的那次调用
    /// 把绘制面校正为目标的静态字形，并更新当前值。
    pub fn morph(&mut self, target: Glyph) -> bool {
        let (from, to) = match (self.value, target) {
            (Glyph::Numeral(from), Glyph::Numeral(to)) if from != to => (from, to),
            _ => {
                self.draw(target);
                return true;
            }
        };

        if self.pending != Some(to) {
            self.pending = Some(to);
            self.frame = 0;
        }

        let transition = Transition::between(from, to);
        if self.frame < transition.frame_count(self.surface.segment_length()) {
            transition.paint(self.frame, &mut self.surface);
            self.frame += 1;
            false
        } else {
            self.draw(target);
            true
        }
    }
}

/// 冒号：两个 2×2 的点，只画一次
#[derive(Debug, Clone)]
pub struct Colon {
    surface: GlyphSurface,
}

impl Colon {
    pub const WIDTH: u32 = 2;

    pub fn new(geometry: SegmentGeometry) -> Self {
        Self {
            surface: GlyphSurface::new(geometry, Self::WIDTH),
        }
    }

    pub fn draw(&mut self) {
        let s = self.surface.segment_length();
        self.surface.clear();
        self.surface.rect(0, s + 3, 1, 1, true);
        self.surface.rect(0, s - 2, 1, 1, true);
    }

    pub fn surface(&self) -> &MonoBuffer {
        self.surface.buffer()
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::geometry::{OriginDimensions, Size};

    use super::*;

    fn numeral(v: u8) -> Glyph {
        Glyph::Numeral(Numeral::new(v).unwrap())
    }

    #[test]
    fn test_draw_lights_exactly_the_table() {
        let mut digit = Digit::new(SegmentGeometry::new(6));
        for n in Numeral::all() {
            digit.draw(n.into());
            assert_eq!(digit.lit_segments(), n.segments(), "digit {}", n.value());

            let lit = digit.surface().lit_points().count();
            let expected: usize = n.segments().len() * 6;
            assert_eq!(lit, expected, "no stray pixels for {}", n.value());
        }
    }

    #[test]
    fn test_draw_is_idempotent() {
        let mut once = Digit::new(SegmentGeometry::new(5));
        once.draw(numeral(8));

        let mut twice = Digit::new(SegmentGeometry::new(5));
        twice.draw(numeral(8));
        twice.draw(numeral(8));

        assert_eq!(once.surface(), twice.surface());
    }

    #[test]
    fn test_draw_blank_clears() {
        let mut digit = Digit::new(SegmentGeometry::new(6));
        digit.draw(numeral(8));
        digit.draw(Glyph::Blank);
        assert_eq!(digit.surface().lit_points().count(), 0);
        assert_eq!(digit.value(), Glyph::Blank);
    }

    #[test]
    fn test_morph_from_blank_is_instant_draw() {
        let mut morphed = Digit::new(SegmentGeometry::new(6));
        morphed.draw(Glyph::Blank);
        assert!(morphed.morph(numeral(7)));

        let mut drawn = Digit::new(SegmentGeometry::new(6));
        drawn.draw(numeral(7));

        assert_eq!(morphed.surface(), drawn.surface());
        assert_eq!(morphed.value(), numeral(7));
        assert_eq!(morphed.frame(), 0);
    }

    #[test]
    fn test_morph_to_blank_completes_at_once() {
        let mut digit = Digit::new(SegmentGeometry::new(6));
        digit.draw(numeral(3));
        assert!(digit.morph(Glyph::Blank));
        assert_eq!(digit.surface().lit_points().count(), 0);
    }

    #[test]
    fn test_changing_target_mid_morph_restarts() {
        let mut digit = Digit::new(SegmentGeometry::new(6));
        digit.draw(numeral(4));
        digit.morph(numeral(5));
        digit.morph(numeral(5));
        assert_eq!(digit.frame(), 2);

        digit.morph(numeral(6));
        assert_eq!(digit.frame(), 1);
    }

    #[test]
    fn test_surface_geometry() {
        let digit = Digit::new(SegmentGeometry::new(6));
        assert_eq!(digit.surface().size(), Size::new(8, 15));

        let colon = Colon::new(SegmentGeometry::new(6));
        assert_eq!(colon.surface().size(), Size::new(2, 15));
    }

    #[test]
    fn test_colon_has_two_square_dots() {
        let mut colon = Colon::new(SegmentGeometry::new(6));
        colon.draw();

        let lit: Vec<Point> = colon.surface().lit_points().collect();
        assert_eq!(lit.len(), 8);

        // 上方的点占据字位坐标 y=9..=10，即缓冲区第4、5行
        let upper = Rectangle::new(Point::new(0, 4), Size::new(2, 2));
        let lower = Rectangle::new(Point::new(0, 9), Size::new(2, 2));
        assert!(colon.surface().is_region_lit(&upper));
        assert!(colon.surface().is_region_lit(&lower));
    }
}
