//! 颜色换算与着色

use embedded_graphics::pixelcolor::{BinaryColor, Rgb888, RgbColor};

/// HSV 转 RGB
///
/// - `hue`: 0-360
/// - `saturation`: 0-100
/// - `value`: 0-100
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: u8) -> Rgb888 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let v = (f32::from(value) / 100.0).clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |f: f32| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb888::new(channel(r), channel(g), channel(b))
}

/// 按通道相乘：`stored * tint / 255`
pub fn tint(stored: Rgb888, tint: Rgb888) -> Rgb888 {
    let mul = |a: u8, b: u8| (u16::from(a) * u16::from(b) / 255) as u8;
    Rgb888::new(
        mul(stored.r(), tint.r()),
        mul(stored.g(), tint.g()),
        mul(stored.b(), tint.b()),
    )
}

/// 单色缓冲区中的像素：点亮为白色，熄灭为黑色
pub fn mask_color(pixel: BinaryColor) -> Rgb888 {
    match pixel {
        BinaryColor::On => Rgb888::WHITE,
        BinaryColor::Off => Rgb888::BLACK,
    }
}
