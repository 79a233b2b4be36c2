//! Floating assistant window.

use crate::chat::markdown::{self, Block, Span};
use crate::chat::{ChatMessage, ChatSession};
use crate::ui::theme;
use eframe::egui;
use riskatlas_core::types::{ChatRole, Country};

#[derive(Default)]
pub struct ChatPanelState {
    pub session: ChatSession,
    pub open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    Send,
    Clear,
}

/// Shows the toggle button and, when open, the chat window.
pub fn show(
    ctx: &egui::Context,
    state: &mut ChatPanelState,
    context_country: Option<&Country>,
) -> Option<ChatAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("chat_toggle"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-24.0, -36.0))
        .show(ctx, |ui| {
            let icon = if state.open { "✖" } else { "💬" };
            let button = egui::Button::new(egui::RichText::new(icon).size(22.0))
                .fill(theme::BLUE)
                .corner_radius(24.0)
                .min_size(egui::vec2(48.0, 48.0));
            if ui.add(button).on_hover_text("RiskAtlas AI").clicked() {
                state.open = !state.open;
            }
        });

    if !state.open {
        return None;
    }

    egui::Window::new("RiskAtlas AI")
        .id(egui::Id::new("chat_window"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-24.0, -96.0))
        .fixed_size(egui::vec2(360.0, 460.0))
        .collapsible(false)
        .title_bar(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("🤖").size(20.0));
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new("RiskAtlas AI").strong());
                    let subtitle = match context_country {
                        Some(country) => format!("context: {} ({})", country.name, country.id),
                        None => "no country selected".to_string(),
                    };
                    ui.label(egui::RichText::new(subtitle).small().color(theme::MUTED));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("🗑").on_hover_text("Clear chat").clicked() {
                        action = Some(ChatAction::Clear);
                    }
                });
            });
            ui.separator();

            let input_height = 64.0;
            egui::ScrollArea::vertical()
                .id_salt("chat_transcript")
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .max_height(ui.available_height() - input_height)
                .show(ui, |ui| {
                    for message in &state.session.messages {
                        message_bubble(ui, message);
                        ui.add_space(6.0);
                    }
                    if state.session.is_pending() {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(egui::RichText::new("Thinking...").color(theme::MUTED));
                        });
                    }
                });

            ui.separator();
            let input_id = ui.make_persistent_id("chat_input");
            let enter_pressed = ui.memory(|m| m.has_focus(input_id))
                && ui.input_mut(|i| {
                    !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
                });

            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut state.session.input)
                        .id(input_id)
                        .hint_text("Ask about trade risk...")
                        .desired_rows(2)
                        .desired_width(ui.available_width() - 48.0)
                        .return_key(Some(egui::KeyboardShortcut::new(
                            egui::Modifiers::SHIFT,
                            egui::Key::Enter,
                        ))),
                );
                let can_send =
                    !state.session.is_pending() && !state.session.input.trim().is_empty();
                let send = ui.add_enabled(can_send, egui::Button::new("➤"));
                if (send.clicked() || enter_pressed) && can_send {
                    action = Some(ChatAction::Send);
                }
            });
            ui.label(
                egui::RichText::new("Enter to send, Shift+Enter for a new line")
                    .small()
                    .color(theme::MUTED),
            );
        });

    action
}

fn message_bubble(ui: &mut egui::Ui, message: &ChatMessage) {
    let is_user = message.role == ChatRole::User;
    let layout = if is_user {
        egui::Layout::right_to_left(egui::Align::Min)
    } else {
        egui::Layout::left_to_right(egui::Align::Min)
    };

    ui.with_layout(layout, |ui| {
        let fill = if is_user { theme::BLUE } else { theme::CARD_FILL };
        egui::Frame::new()
            .fill(fill)
            .corner_radius(10.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(280.0);
                ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                    render_markdown(ui, &message.content);
                });
            });
    });
}

fn render_markdown(ui: &mut egui::Ui, text: &str) {
    for block in markdown::parse(text) {
        match block {
            Block::Blank => ui.add_space(6.0),
            Block::Paragraph(spans) => {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    render_spans(ui, &spans);
                });
            }
            Block::Bullet(spans) => {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    ui.label("  • ");
                    render_spans(ui, &spans);
                });
            }
        }
    }
}

fn render_spans(ui: &mut egui::Ui, spans: &[Span]) {
    for span in spans {
        let text = match span {
            Span::Text(text) => egui::RichText::new(text),
            Span::Bold(text) => egui::RichText::new(text).strong().color(egui::Color32::WHITE),
            Span::Italic(text) => egui::RichText::new(text).italics(),
            Span::Code(text) => egui::RichText::new(text).code(),
        };
        ui.label(text);
    }
}
