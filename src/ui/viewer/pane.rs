// SPDX-License-Identifier: MPL-2.0
//! Viewer pane that renders the installed item inside a two-axis scrollable,
//! centered when smaller than the available space.

use crate::source::{AnimatedItem, GraphicsItem};
use crate::ui::components::checkerboard;
use crate::ui::state::ZoomState;
use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{container, image, responsive, Container, Image, Scrollable, Stack, Svg, Text};
use iced::{
    alignment::{Horizontal, Vertical},
    Border, Color, Element, Length, Padding, Size, Theme,
};

const OUTLINE_WIDTH: f32 = 1.0;
const OUTLINE_COLOR: Color = Color::from_rgb(0.2, 0.45, 0.9);

pub struct ViewModel<'a> {
    pub item: Option<&'a GraphicsItem>,
    /// Cached handle of the animation frame to paint.
    pub frame: Option<&'a image::Handle>,
    pub zoom: &'a ZoomState,
    pub show_background: bool,
    pub show_outline: bool,
}

pub fn view<'a, Message: 'a>(model: ViewModel<'a>) -> Element<'a, Message> {
    let Some(item) = model.item else {
        return Container::new(Text::new("No image"))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center)
            .into();
    };

    responsive(move |available: Size| view_inner(&model, item, available)).into()
}

fn calculate_centering_padding(media_size: Size, available: Size) -> Padding {
    let horizontal = ((available.width - media_size.width) / 2.0).max(0.0);
    let vertical = ((available.height - media_size.height) / 2.0).max(0.0);

    Padding {
        top: vertical,
        right: horizontal,
        bottom: vertical,
        left: horizontal,
    }
}

fn view_inner<'a, Message: 'a>(
    model: &ViewModel<'a>,
    item: &'a GraphicsItem,
    available: Size,
) -> Element<'a, Message> {
    let zoom = model.zoom.effective(item.size(), Some(available));
    let image_size: Size = item.size().into();
    let scaled = Size::new(
        (image_size.width * zoom.as_factor()).max(1.0),
        (image_size.height * zoom.as_factor()).max(1.0),
    );

    let content: Element<'a, Message> = match item {
        GraphicsItem::Vector(vector) => Svg::new(vector.handle().clone())
            .width(Length::Fixed(scaled.width))
            .height(Length::Fixed(scaled.height))
            .into(),
        GraphicsItem::Animated(_) => match model.frame {
            Some(handle) => Image::new(handle.clone())
                .filter_method(AnimatedItem::filter_method(zoom.as_factor()))
                .width(Length::Fixed(scaled.width))
                .height(Length::Fixed(scaled.height))
                .into(),
            None => Text::new("").into(),
        },
        GraphicsItem::Static(still) => Image::new(still.handle().clone())
            .filter_method(still.filter_method())
            .width(Length::Fixed(scaled.width))
            .height(Length::Fixed(scaled.height))
            .into(),
    };

    let content: Element<'a, Message> = if model.show_background {
        Stack::new()
            .push(checkerboard::sized(scaled))
            .push(content)
            .into()
    } else {
        content
    };

    let show_outline = model.show_outline;
    let framed = Container::new(content).style(move |_theme: &Theme| outline_style(show_outline));

    let centered = Container::new(framed).padding(calculate_centering_padding(scaled, available));

    Scrollable::new(centered)
        .width(Length::Fill)
        .height(Length::Fill)
        .direction(Direction::Both {
            vertical: Scrollbar::default(),
            horizontal: Scrollbar::default(),
        })
        .into()
}

fn outline_style(show_outline: bool) -> container::Style {
    if !show_outline {
        return container::Style::default();
    }
    container::Style {
        border: Border {
            color: OUTLINE_COLOR,
            width: OUTLINE_WIDTH,
            radius: 0.0.into(),
        },
        ..Default::default()
    }
}
