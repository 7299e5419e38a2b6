// SPDX-License-Identifier: MPL-2.0
//! Viewer toolbar: zoom buttons, fit-to-screen, background and outline
//! toggles, and play/pause for animations.

use crate::ui::state::zoom::{format_number, ZoomPercent};
use iced::{
    alignment::Vertical,
    widget::{button, checkbox, Row, Space, Text},
    Element, Length,
};

#[derive(Clone, Copy)]
pub struct ViewContext {
    pub zoom: ZoomPercent,
    pub fit_to_window: bool,
    pub show_background: bool,
    pub show_outline: bool,
    /// `Some(paused)` while an animation is shown.
    pub playback: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    ZoomIn,
    ZoomOut,
    OriginalSize,
    FitToScreen,
    ToggleBackground,
    ToggleOutline,
    TogglePlayPause,
}

pub fn view<'a>(ctx: ViewContext) -> Element<'a, Message> {
    let zoom_out_button = button(Text::new("−"))
        .on_press_maybe((!ctx.zoom.is_min()).then_some(Message::ZoomOut))
        .padding([6, 12]);

    let zoom_label = Text::new(format!("{}%", format_number(ctx.zoom.value())))
        .width(Length::Fixed(60.0));

    let zoom_in_button = button(Text::new("+"))
        .on_press_maybe((!ctx.zoom.is_max()).then_some(Message::ZoomIn))
        .padding([6, 12]);

    let original_button = button(Text::new("1:1"))
        .on_press(Message::OriginalSize)
        .padding([6, 12]);

    let fit_button = button(Text::new("Fit"))
        .on_press_maybe((!ctx.fit_to_window).then_some(Message::FitToScreen))
        .padding([6, 12]);

    let background_toggle = checkbox(ctx.show_background)
        .label("Background")
        .on_toggle(|_| Message::ToggleBackground);

    let outline_toggle = checkbox(ctx.show_outline)
        .label("Outline")
        .on_toggle(|_| Message::ToggleOutline);

    let mut row = Row::new()
        .spacing(10)
        .padding(8)
        .align_y(Vertical::Center)
        .push(zoom_out_button)
        .push(zoom_label)
        .push(zoom_in_button)
        .push(original_button)
        .push(fit_button)
        .push(Space::new().width(Length::Fixed(16.0)))
        .push(background_toggle)
        .push(outline_toggle);

    if let Some(paused) = ctx.playback {
        let label = if paused { "Play" } else { "Pause" };
        row = row.push(
            button(Text::new(label))
                .on_press(Message::TogglePlayPause)
                .padding([6, 12]),
        );
    }

    row.into()
}
