use image::{Rgba, RgbaImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub fn blank_image(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Fill a `size` x `size` square with its top-left corner at `(x, y)`
pub fn draw_square(image: &mut RgbaImage, x: u32, y: u32, size: u32, color: Rgba<u8>) {
    draw_filled_rect_mut(image, Rect::at(x as i32, y as i32).of_size(size, size), color);
}

/// Black canvas with white squares given as `(x, y, size)`
pub fn squares_image(width: u32, height: u32, squares: &[(u32, u32, u32)]) -> RgbaImage {
    let mut image = blank_image(width, height, BLACK);
    for &(x, y, size) in squares {
        draw_square(&mut image, x, y, size, WHITE);
    }
    image
}
