//! 数字变形动画
//!
//! 按目标数字选择过渡方式，每种过渡是关于帧号的纯函数：
//! 给定帧号和段长，画出这一帧需要改变的像素。

use super::{GlyphSurface, segment::Numeral};

/// 变成 0 时依赖来源数字的几种编排
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZeroFrom {
    One,
    Two,
    Five,
    Nine,
    /// 没有专门编排的来源：保持原样，最后一帧后切换到 0
    Other,
}

/// 过渡描述：帧数 + 每帧的绘制指令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    ToZero(ZeroFrom),
    ToOne,
    ToTwo,
    ToThree,
    ToFour,
    ToFive,
    ToSix,
    ToSeven,
    ToEight,
    ToNine,
}

impl Transition {
    pub fn between(from: Numeral, to: Numeral) -> Self {
        match to.value() {
            0 => Transition::ToZero(match from.value() {
                1 => ZeroFrom::One,
                2 => ZeroFrom::Two,
                5 => ZeroFrom::Five,
                9 => ZeroFrom::Nine,
                _ => ZeroFrom::Other,
            }),
            1 => Transition::ToOne,
            2 => Transition::ToTwo,
            3 => Transition::ToThree,
            4 => Transition::ToFour,
            5 => Transition::ToFive,
            6 => Transition::ToSix,
            7 => Transition::ToSeven,
            8 => Transition::ToEight,
            _ => Transition::ToNine,
        }
    }

    /// 绘制帧数，之后的一次调用报告完成
    pub fn frame_count(self, s: i32) -> i32 {
        match self {
            Transition::ToFour | Transition::ToFive => s,
            Transition::ToOne | Transition::ToSeven | Transition::ToNine => s + 2,
            Transition::ToZero(_)
            | Transition::ToTwo
            | Transition::ToThree
            | Transition::ToSix
            | Transition::ToEight => s + 1,
        }
    }

    /// 画出第 `f` 帧（`0 <= f < frame_count`）
    pub fn paint(self, f: i32, surface: &mut GlyphSurface) {
        let s = surface.segment_length();
        match self {
            Transition::ToOne => {
                slide_right(surface, f, Rows::Lower);
                slide_right(surface, f, Rows::Upper);
                surface.point(1 + f, 2 * s + 2, false);
                surface.point(1 + f, 0, false);
                surface.point(1 + f, s + 1, false);
            }
            Transition::ToTwo => {
                if f < s {
                    surface.point(s - f, 2 * s + 2, true);
                    surface.point(s - f, s + 1, true);
                    surface.point(s - f, 0, true);
                }
                surface.column(s + 1 - f, Rows::Lower, false);
                surface.column(s - f, Rows::Lower, true);
            }
            Transition::ToThree => {
                surface.column(f, Rows::Lower, false);
                surface.column(1 + f, Rows::Lower, true);
            }
            Transition::ToFour => {
                surface.point(s - f, 2 * s + 2, false);
                surface.point(0, 2 * s + 1 - f, true);
                surface.point(1 + f, 0, false);
            }
            Transition::ToFive => {
                surface.point(s + 1, s + 2 + f, false);
                surface.point(s - f, 2 * s + 2, true);
                surface.point(s - f, 0, true);
            }
            Transition::ToSix => {
                surface.column(s - f, Rows::Lower, true);
                if f > 0 {
                    surface.column(s - f + 1, Rows::Lower, false);
                }
            }
            Transition::ToSeven => {
                slide_right(surface, f, Rows::Upper);
                slide_right(surface, f, Rows::Lower);
                surface.point(1 + f, 0, false);
                surface.point(1 + f, s + 1, false);
            }
            Transition::ToEight => {
                slide_left(surface, f, Rows::Upper);
                slide_left(surface, f, Rows::Lower);
                if f < s {
                    surface.point(s - f, 0, true);
                    surface.point(s - f, s + 1, true);
                }
            }
            Transition::ToNine => slide_right(surface, f, Rows::Lower),
            Transition::ToZero(from) => paint_zero(from, f, surface),
        }
    }
}

fn paint_zero(from: ZeroFrom, f: i32, surface: &mut GlyphSurface) {
    let s = surface.segment_length();
    match from {
        ZeroFrom::One => {
            slide_left(surface, f, Rows::Upper);
            slide_left(surface, f, Rows::Lower);
            if f < s {
                surface.point(s - f, 2 * s + 2, true);
                surface.point(s - f, 0, true);
            }
        }
        ZeroFrom::Two => {
            slide_left(surface, f, Rows::Upper);
            surface.point(1 + f, s + 1, false);
            if f < s {
                surface.point(s + 1, s + 1 - f, true);
            }
        }
        ZeroFrom::Five => {
            if f < s {
                if f > 0 {
                    surface.column(1 + f, Rows::Upper, false);
                }
                surface.column(2 + f, Rows::Upper, true);
            }
            close_middle(surface, f);
        }
        ZeroFrom::Nine => close_middle(surface, f),
        ZeroFrom::Other => {}
    }
}

/// 竖段所在的半区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rows {
    /// y 在 `1..=s`
    Lower,
    /// y 在 `s+2..=2s+1`
    Upper,
}

/// 左侧竖段整列右移一格
fn slide_right(surface: &mut GlyphSurface, f: i32, rows: Rows) {
    surface.column(f - 1, rows, false);
    surface.column(f, rows, true);
}

/// 右侧竖段的复制品整列左移一格
fn slide_left(surface: &mut GlyphSurface, f: i32, rows: Rows) {
    let s = surface.segment_length();
    surface.column(s - f, rows, true);
    if f > 0 {
        surface.column(s - f + 1, rows, false);
    }
}

/// 中横段从右往左熄灭，同时左下竖段自上而下长出
fn close_middle(surface: &mut GlyphSurface, f: i32) {
    let s = surface.segment_length();
    if f < s {
        surface.point(s - f, s + 1, false);
        surface.point(0, s - f, true);
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::{geometry::Point, pixelcolor::BinaryColor};

    use super::*;
    use crate::digit::{Digit, Glyph, segment::SegmentGeometry};

    fn numeral(v: u8) -> Numeral {
        Numeral::new(v).unwrap()
    }

    /// 连续驱动变形直到完成，返回调用次数
    fn run_to_completion(digit: &mut Digit, to: Numeral) -> i32 {
        let mut calls = 0;
        loop {
            calls += 1;
            if digit.morph(Glyph::Numeral(to)) {
                return calls;
            }
            assert!(calls < 100, "morph did not terminate");
        }
    }

    #[test]
    fn test_destination_selects_transition() {
        assert_eq!(Transition::between(numeral(0), numeral(1)), Transition::ToOne);
        assert_eq!(Transition::between(numeral(8), numeral(1)), Transition::ToOne);
        assert_eq!(
            Transition::between(numeral(5), numeral(0)),
            Transition::ToZero(ZeroFrom::Five)
        );
        assert_eq!(
            Transition::between(numeral(3), numeral(0)),
            Transition::ToZero(ZeroFrom::Other)
        );
    }

    #[test]
    fn test_frame_budget_matches_closed_form() {
        let s = 6;
        let expected = [
            (Transition::ToZero(ZeroFrom::Nine), s + 1),
            (Transition::ToOne, s + 2),
            (Transition::ToTwo, s + 1),
            (Transition::ToThree, s + 1),
            (Transition::ToFour, s),
            (Transition::ToFive, s),
            (Transition::ToSix, s + 1),
            (Transition::ToSeven, s + 2),
            (Transition::ToEight, s + 1),
            (Transition::ToNine, s + 2),
        ];
        for (transition, frames) in expected {
            assert_eq!(transition.frame_count(s), frames, "{:?}", transition);
        }
    }

    #[test]
    fn test_every_pair_terminates_on_target_glyph() {
        for len in [3, 4, 6, 9] {
            let geometry = SegmentGeometry::new(len);
            for from in Numeral::all() {
                for to in Numeral::all().filter(|to| *to != from) {
                    let mut digit = Digit::new(geometry);
                    digit.draw(Glyph::Numeral(from));

                    let budget = Transition::between(from, to).frame_count(len as i32);
                    let calls = run_to_completion(&mut digit, to);

                    assert_eq!(calls, budget + 1, "{} -> {} at len {}", from.value(), to.value(), len);
                    assert_eq!(digit.value(), Glyph::Numeral(to));
                    assert_eq!(digit.lit_segments(), to.segments());

                    let mut reference = Digit::new(geometry);
                    reference.draw(Glyph::Numeral(to));
                    assert_eq!(digit.surface(), reference.surface());
                }
            }
        }
    }

    #[test]
    fn test_value_changes_only_on_completion() {
        let mut digit = Digit::new(SegmentGeometry::new(6));
        digit.draw(Glyph::Numeral(numeral(4)));

        assert!(!digit.morph(Glyph::Numeral(numeral(5))));
        assert_eq!(digit.value(), Glyph::Numeral(numeral(4)));
        assert_eq!(digit.frame(), 1);

        run_to_completion(&mut digit, numeral(5));
        assert_eq!(digit.value(), Glyph::Numeral(numeral(5)));
        assert_eq!(digit.frame(), 0);
    }

    /// 这些编排在最后一帧就已经和静态字形完全一致
    #[test]
    fn test_counting_choreographies_land_exactly() {
        for (from, to) in [(0, 1), (1, 2), (5, 0), (9, 0), (3, 4), (4, 5), (6, 7), (8, 9)] {
            let geometry = SegmentGeometry::new(6);
            let mut digit = Digit::new(geometry);
            digit.draw(Glyph::Numeral(numeral(from)));

            let frames = Transition::between(numeral(from), numeral(to)).frame_count(6);
            for _ in 0..frames {
                assert!(!digit.morph(Glyph::Numeral(numeral(to))));
            }

            assert_eq!(
                digit.lit_segments(),
                numeral(to).segments(),
                "{} -> {}",
                from,
                to
            );
        }
    }

    #[test]
    fn test_one_slides_left_column_across() {
        let mut digit = Digit::new(SegmentGeometry::new(6));
        digit.draw(Glyph::Numeral(numeral(0)));

        // 第一帧：左侧竖段仍在第0列，顶端第1列的像素被擦除
        digit.morph(Glyph::Numeral(numeral(1)));
        let surface = digit.surface();
        let geometry = SegmentGeometry::new(6);
        assert_eq!(
            surface.pixel(geometry.to_buffer(Point::new(0, 3))),
            BinaryColor::On
        );
        assert_eq!(
            surface.pixel(geometry.to_buffer(Point::new(1, 14))),
            BinaryColor::Off
        );

        // 第二帧：竖段移到第1列
        digit.morph(Glyph::Numeral(numeral(1)));
        let surface = digit.surface();
        assert_eq!(
            surface.pixel(geometry.to_buffer(Point::new(0, 3))),
            BinaryColor::Off
        );
        assert_eq!(
            surface.pixel(geometry.to_buffer(Point::new(1, 3))),
            BinaryColor::On
        );
    }
}
