#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for LED Defence adapters.
//!
//! Frames are drawn onto a [`DisplaySurface`], a pixel matrix that silently
//! ignores writes outside its bounds. [`PixelGrid`] is the in-memory surface
//! used by the command line adapter; hardware adapters implement the trait
//! for their own panels.

mod scene;

pub use scene::{render, Scene};

use anyhow::Result as AnyResult;
use led_defence_core::rasterize_line;
use std::{error::Error, fmt, io, time::Duration};

/// RGB color of a single LED.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel intensity.
    pub red: u8,
    /// Green channel intensity.
    pub green: u8,
    /// Blue channel intensity.
    pub blue: u8,
}

impl Color {
    /// Fully dark LED.
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    /// Creates a color from byte RGB values.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the color with each channel raised by the provided amounts.
    #[must_use]
    pub const fn tint(self, red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: self.red.saturating_add(red),
            green: self.green.saturating_add(green),
            blue: self.blue.saturating_add(blue),
        }
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::from_rgb(red, green, blue)
    }
}

/// Pixel matrix frames are drawn onto.
///
/// Coordinates are signed so callers may draw shapes that straddle an edge;
/// only the visible part lands on the surface.
pub trait DisplaySurface {
    /// Number of pixel columns.
    fn width(&self) -> u32;

    /// Number of pixel rows.
    fn height(&self) -> u32;

    /// Sets one pixel, ignoring coordinates outside the surface.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Reads one pixel, or `None` outside the surface.
    fn pixel(&self, x: i32, y: i32) -> Option<Color>;

    /// Fills an axis-aligned rectangle whose top-left corner is `(x, y)`.
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        for dy in 0..height {
            for dx in 0..width {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Draws a line including both endpoints.
    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: Color) {
        for (x, y) in rasterize_line(from, to) {
            self.set_pixel(x, y, color);
        }
    }

    /// Draws a one pixel circle outline with the midpoint algorithm.
    fn draw_circle(&mut self, center: (i32, i32), radius: i32, color: Color) {
        let (cx, cy) = center;
        let (mut x, mut y, mut error) = (radius, 0, 0);
        while x >= y {
            for (dx, dy) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                self.set_pixel(cx + dx, cy + dy, color);
            }

            if error <= 0 {
                y += 1;
                error += 2 * y + 1;
            }
            if error > 0 {
                x -= 1;
                error -= 2 * x + 1;
            }
        }
    }
}

/// In-memory display surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelGrid {
    /// Creates a dark grid with the provided dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::EmptySurface { width, height });
        }

        Ok(Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        })
    }

    /// Darkens every pixel.
    pub fn clear(&mut self) {
        self.pixels.fill(Color::BLACK);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|x| *x < self.width)?;
        let y = u32::try_from(y).ok().filter(|y| *y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Writes the grid as a binary PPM (P6) image.
    pub fn write_ppm<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&[color.red, color.green, color.blue]);
        }
        writer.write_all(&bytes)
    }
}

impl DisplaySurface for PixelGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = color;
        }
    }

    fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|index| self.pixels[index])
    }
}

/// Destination for finished frames.
pub trait FrameSink {
    /// Presents one frame captured after `elapsed` simulated time.
    fn present(&mut self, frame: &PixelGrid, elapsed: Duration) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering surfaces.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Surfaces need at least one pixel in each direction.
    EmptySurface {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySurface { width, height } => {
                write!(f, "display surface must not be empty (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rejects_empty_dimensions_without_panicking() {
        let error = PixelGrid::new(0, 32).expect_err("zero width must be rejected");

        assert_eq!(
            error,
            RenderingError::EmptySurface {
                width: 0,
                height: 32
            }
        );
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut grid = PixelGrid::new(4, 3).expect("valid grid");
        let red = Color::from_rgb(255, 0, 0);

        grid.set_pixel(-1, 0, red);
        grid.set_pixel(4, 0, red);
        grid.set_pixel(0, 3, red);
        grid.fill_rect(2, 1, 5, 5, red);

        assert_eq!(grid.pixel(-1, 0), None);
        assert_eq!(grid.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(grid.pixel(3, 2), Some(red));
        let lit = (0..3)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .filter(|&(x, y)| grid.pixel(x, y) == Some(red))
            .count();
        assert_eq!(lit, 4);
    }

    #[test]
    fn lines_include_both_endpoints() {
        let mut grid = PixelGrid::new(8, 8).expect("valid grid");
        let white = Color::from_rgb(255, 255, 255);

        grid.draw_line((1, 1), (5, 3), white);

        assert_eq!(grid.pixel(1, 1), Some(white));
        assert_eq!(grid.pixel(5, 3), Some(white));
    }

    #[test]
    fn circle_touches_its_cardinal_points() {
        let mut grid = PixelGrid::new(16, 16).expect("valid grid");
        let green = Color::from_rgb(0, 80, 0);

        grid.draw_circle((8, 8), 5, green);

        for (x, y) in [(13, 8), (3, 8), (8, 13), (8, 3)] {
            assert_eq!(grid.pixel(x, y), Some(green), "({x}, {y})");
        }
        assert_eq!(grid.pixel(8, 8), Some(Color::BLACK));
    }

    #[test]
    fn ppm_export_has_header_and_rgb_payload() {
        let mut grid = PixelGrid::new(2, 1).expect("valid grid");
        grid.set_pixel(1, 0, Color::from_rgb(1, 2, 3));

        let mut bytes = Vec::new();
        grid.write_ppm(&mut bytes).expect("write to memory");

        let header = b"P6\n2 1\n255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(&bytes[header.len()..], &[0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn tint_saturates_each_channel() {
        let base = Color::from_rgb(250, 10, 245);

        assert_eq!(base.tint(3, 5, 15), Color::from_rgb(253, 15, 255));
    }
}
