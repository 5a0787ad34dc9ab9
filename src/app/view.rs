// SPDX-License-Identifier: MPL-2.0
//! Top-level view composition: navbar, active screen, toast overlay.

use super::{EngineStatus, Message, Screen};
use crate::i18n::fluent::I18n;
use crate::ui::notifications::{self, Toast};
use crate::ui::{about, navbar, scanner, settings};
use iced::widget::{Column, Stack};
use iced::{Element, Length};

/// Borrowed state needed to render one frame.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub screen: Screen,
    pub settings: &'a settings::State,
    pub scanner: &'a scanner::State,
    pub engine_status: &'a EngineStatus,
    pub notifications: &'a notifications::Manager,
}

/// Renders the application.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let screen_content: Element<'_, Message> = match ctx.screen {
        Screen::Scanner => {
            scanner::view(ctx.scanner, ctx.i18n, ctx.engine_status).map(Message::Scanner)
        }
        Screen::Settings => settings::view(ctx.settings, ctx.i18n).map(Message::Settings),
        Screen::About => about::view(ctx.i18n),
    };

    let page = Column::new()
        .push(navbar::view(ctx.i18n, ctx.screen).map(Message::Navbar))
        .push(screen_content)
        .width(Length::Fill)
        .height(Length::Fill);

    Stack::new()
        .push(page)
        .push(Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification))
        .into()
}
