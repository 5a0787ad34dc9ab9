// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Routes native window events (file drops, drag hover, close requests)
//! to top-level messages, and drives the periodic tick while
//! notifications are visible.

use super::{Message, Screen};
use iced::{event, time, Subscription};

/// Creates the window event subscription.
///
/// File drop and hover events are only meaningful on the Scanner screen;
/// close requests are handled everywhere.
pub fn create_event_subscription(screen: Screen) -> Subscription<Message> {
    match screen {
        Screen::Scanner => event::listen_with(|event, _status, window_id| match event {
            event::Event::Window(iced::window::Event::CloseRequested) => {
                Some(Message::WindowCloseRequested(window_id))
            }
            event::Event::Window(iced::window::Event::FileDropped(path)) => {
                Some(Message::FileDropped(path))
            }
            event::Event::Window(iced::window::Event::FileHovered(_)) => {
                Some(Message::DropHoverChanged(true))
            }
            event::Event::Window(iced::window::Event::FilesHoveredLeft) => {
                Some(Message::DropHoverChanged(false))
            }
            _ => None,
        }),
        Screen::Settings | Screen::About => {
            event::listen_with(|event, _status, window_id| match event {
                event::Event::Window(iced::window::Event::CloseRequested) => {
                    Some(Message::WindowCloseRequested(window_id))
                }
                _ => None,
            })
        }
    }
}

/// Creates a periodic tick subscription for notification auto-dismiss.
pub fn create_tick_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(std::time::Duration::from_millis(100)).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
