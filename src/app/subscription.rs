// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.

use super::Message;
use iced::{event, time, window, Subscription};
use std::time::Duration;

/// Forwards window resizes so fit-to-window follows the window.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, _status, _window_id| match event {
        event::Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
        _ => None,
    })
}

/// Ticks at the animation rate while something plays, at `poll_interval`
/// while only the file watcher needs draining, and not at all otherwise.
pub fn create_tick_subscription(
    playing: bool,
    watching: bool,
    frame_tick: Duration,
    poll_interval: Duration,
) -> Subscription<Message> {
    if playing {
        time::every(frame_tick).map(Message::Tick)
    } else if watching {
        time::every(poll_interval).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
