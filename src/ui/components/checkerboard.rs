// SPDX-License-Identifier: MPL-2.0
//! Checkerboard shown behind images with transparency.

use iced::widget::{canvas, Canvas};
use iced::{mouse, Color, Length, Point, Rectangle, Renderer, Size, Theme};

const TILE_SIZE: f32 = 16.0;
const LIGHT_TILE: Color = Color::from_rgb(0.85, 0.85, 0.85);
const DARK_TILE: Color = Color::from_rgb(0.75, 0.75, 0.75);

#[derive(Debug, Clone, Copy, Default)]
pub struct Checkerboard;

impl<Message> canvas::Program<Message> for Checkerboard {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), LIGHT_TILE);

        let (cols, rows) = tile_counts(bounds.size());
        for row in 0..rows {
            for col in 0..cols {
                if (row + col) % 2 == 0 {
                    continue;
                }
                #[allow(clippy::cast_precision_loss)]
                let origin = Point::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE);
                frame.fill_rectangle(origin, Size::new(TILE_SIZE, TILE_SIZE), DARK_TILE);
            }
        }

        vec![frame.into_geometry()]
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tile_counts(size: Size) -> (u32, u32) {
    let cols = (size.width / TILE_SIZE).ceil().max(1.0) as u32;
    let rows = (size.height / TILE_SIZE).ceil().max(1.0) as u32;
    (cols, rows)
}

/// A checkerboard canvas of exactly `size`, to sit under an image in a stack.
pub fn sized<Message>(size: Size) -> Canvas<Checkerboard, Message> {
    Canvas::new(Checkerboard)
        .width(Length::Fixed(size.width))
        .height(Length::Fixed(size.height))
}

const _: () = {
    assert!(TILE_SIZE > 0.0);
};
