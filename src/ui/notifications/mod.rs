// SPDX-License-Identifier: MPL-2.0
//! Toast notification system for user feedback.
//!
//! Non-intrusive toasts inform the user about outcomes (collection counts,
//! engine download results, config problems) without blocking interaction.
//!
//! - Toast duration: ~3s for success/info, ~5s for warnings, manual
//!   dismiss for errors
//! - Max visible toasts: 3 (others are queued)
//! - Position: bottom-right corner

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, Severity};
pub use toast::Toast;
