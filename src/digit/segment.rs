// src/digit/segment.rs

//! 七段数码管的段定义与几何

use enumset::{EnumSet, EnumSetType, enum_set};

use embedded_graphics::{
    geometry::{Point, Size},
    primitives::Rectangle,
};

/// 数码段
///
/// A 顶，B 右上，C 右下，D 底，E 左下，F 左上，G 中间
#[derive(Debug, EnumSetType)]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// 每个数字需要点亮的段
pub const DIGIT_SEGMENTS: [EnumSet<Segment>; 10] = [
    enum_set!(Segment::A | Segment::B | Segment::C | Segment::D | Segment::E | Segment::F),
    enum_set!(Segment::B | Segment::C),
    enum_set!(Segment::A | Segment::B | Segment::D | Segment::E | Segment::G),
    enum_set!(Segment::A | Segment::B | Segment::C | Segment::D | Segment::G),
    enum_set!(Segment::B | Segment::C | Segment::F | Segment::G),
    enum_set!(Segment::A | Segment::C | Segment::D | Segment::F | Segment::G),
    enum_set!(Segment::A | Segment::C | Segment::D | Segment::E | Segment::F | Segment::G),
    enum_set!(Segment::A | Segment::B | Segment::C),
    enum_set!(
        Segment::A | Segment::B | Segment::C | Segment::D | Segment::E | Segment::F | Segment::G
    ),
    enum_set!(Segment::A | Segment::B | Segment::C | Segment::D | Segment::F | Segment::G),
];

/// 0-9 之间的数字
///
/// 只能通过 [`Numeral::new`] 构造，超出范围的值在调度器边界就被拒绝
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Numeral(u8);

impl Numeral {
    pub const ZERO: Numeral = Numeral(0);

    pub const fn new(value: u8) -> Option<Self> {
        if value <= 9 { Some(Self(value)) } else { None }
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).and_then(|d| Self::new(d as u8))
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn segments(self) -> EnumSet<Segment> {
        DIGIT_SEGMENTS[self.0 as usize]
    }

    pub fn all() -> impl Iterator<Item = Numeral> {
        (0..=9).map(Numeral)
    }
}

/// 一个字位上显示的内容：空白或数字
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    Blank,
    Numeral(Numeral),
}

impl Glyph {
    pub fn segments(self) -> EnumSet<Segment> {
        match self {
            Glyph::Blank => EnumSet::empty(),
            Glyph::Numeral(n) => n.segments(),
        }
    }
}

impl From<Numeral> for Glyph {
    fn from(n: Numeral) -> Self {
        Glyph::Numeral(n)
    }
}

impl core::fmt::Display for Glyph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Glyph::Blank => write!(f, "_"),
            Glyph::Numeral(n) => write!(f, "{}", n.value()),
        }
    }
}

/// 段几何
///
/// 坐标系以字位左下角为原点，y 轴向上。宽 `len + 2`，高 `2 * len + 3`：
/// 三条横段各占一行，两条竖段之间留出拐角像素。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentGeometry {
    len: i32,
}

impl SegmentGeometry {
    pub const fn new(segment_length: u32) -> Self {
        Self {
            len: segment_length as i32,
        }
    }

    pub const fn segment_length(&self) -> i32 {
        self.len
    }

    pub const fn digit_size(&self) -> Size {
        Size::new(self.len as u32 + 2, 2 * self.len as u32 + 3)
    }

    /// 段两端的像素（含端点）
    pub const fn endpoints(&self, segment: Segment) -> (Point, Point) {
        let s = self.len;
        match segment {
            Segment::A => (Point::new(1, 2 * s + 2), Point::new(s, 2 * s + 2)),
            Segment::B => (Point::new(s + 1, 2 * s + 1), Point::new(s + 1, s + 2)),
            Segment::C => (Point::new(s + 1, 1), Point::new(s + 1, s)),
            Segment::D => (Point::new(1, 0), Point::new(s, 0)),
            Segment::E => (Point::new(0, 1), Point::new(0, s)),
            Segment::F => (Point::new(0, 2 * s + 1), Point::new(0, s + 2)),
            Segment::G => (Point::new(1, s + 1), Point::new(s, s + 1)),
        }
    }

    /// 字位坐标转换为缓冲区坐标（缓冲区第0行在顶部）
    pub const fn to_buffer(&self, point: Point) -> Point {
        Point::new(point.x, self.digit_size().height as i32 - 1 - point.y)
    }

    /// 段在缓冲区坐标中占据的矩形
    pub fn segment_area(&self, segment: Segment) -> Rectangle {
        let (a, b) = self.endpoints(segment);
        Rectangle::with_corners(self.to_buffer(a), self.to_buffer(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_two_digits_share_segments() {
        for a in 0..10 {
            for b in (a + 1)..10 {
                assert_ne!(DIGIT_SEGMENTS[a], DIGIT_SEGMENTS[b], "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_numeral_range() {
        assert_eq!(Numeral::new(9).map(Numeral::value), Some(9));
        assert_eq!(Numeral::new(10), None);
        assert_eq!(Numeral::from_char('7').map(Numeral::value), Some(7));
        assert_eq!(Numeral::from_char('x'), None);
        assert_eq!(Numeral::all().count(), 10);
    }

    #[test]
    fn test_digit_size() {
        assert_eq!(SegmentGeometry::new(6).digit_size(), Size::new(8, 15));
        assert_eq!(SegmentGeometry::new(4).digit_size(), Size::new(6, 11));
    }

    #[test]
    fn test_segments_do_not_overlap() {
        let geometry = SegmentGeometry::new(5);
        let segments: Vec<Segment> = EnumSet::<Segment>::all().iter().collect();
        for (i, a) in segments.iter().enumerate() {
            for b in &segments[i + 1..] {
                let overlap = geometry
                    .segment_area(*a)
                    .intersection(&geometry.segment_area(*b));
                assert!(overlap.is_zero_sized(), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_top_segment_is_first_buffer_row() {
        let geometry = SegmentGeometry::new(6);
        let area = geometry.segment_area(Segment::A);
        assert_eq!(area.top_left, Point::new(1, 0));
        assert_eq!(area.size, Size::new(6, 1));

        let bottom = geometry.segment_area(Segment::D);
        assert_eq!(bottom.top_left, Point::new(1, 14));
    }
}
