//! Staff notifications through the Telegram Bot API.
//!
//! Messages use the HTML parse mode; every interpolated value goes through
//! [`escape_html`] so customer input cannot break the markup.

use crate::config::Config;
use crate::models::{ContactMessage, Priority, RepairRequest, TicketStatus};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

const DESCRIPTION_LIMIT: usize = 200;
const CONTACT_MESSAGE_LIMIT: usize = 300;
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Escape the three characters Telegram's HTML mode treats specially.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Cut `text` to at most `max` characters, marking the cut with "...".
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn priority_emoji(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🟠",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

fn status_emoji(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Submitted => "🆕",
        TicketStatus::InProgress => "⚙️",
        TicketStatus::Diagnosed => "🔍",
        TicketStatus::PendingPickup => "📦",
        TicketStatus::Completed => "✅",
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        escape_html(value)
    }
}

pub fn format_new_ticket(request: &RepairRequest, at: DateTime<Utc>) -> String {
    let draft = &request.draft;
    let description = if draft.description.trim().is_empty() {
        "No description provided".to_string()
    } else {
        escape_html(&truncate(&draft.description, DESCRIPTION_LIMIT))
    };
    let pickup = draft.pickup_time.map(|slot| slot.as_str()).unwrap_or("Flexible");

    format!(
        "🛠️ <b>New Repair Request - FixNet</b>\n\n\
         📱 <b>Device:</b> {} {}\n\
         🔧 <b>Issue:</b> {}\n\
         📝 <b>Category:</b> {}\n\n\
         👤 <b>Customer:</b> {}\n\
         📞 <b>Phone:</b> {}\n\
         📧 <b>Email:</b> {}\n\n\
         🎫 <b>Ticket ID:</b> <code>{}</code>\n\
         {} <b>Priority:</b> {}\n\
         📍 <b>Pickup:</b> {}\n\n\
         ⏰ <b>Created:</b> {}\n\n\
         💬 <b>Description:</b>\n<i>{}</i>",
        or_na(&draft.device_brand),
        or_na(&draft.device_model),
        or_na(&draft.specific_issue),
        or_na(&draft.issue_category),
        or_na(&draft.customer_name),
        or_na(&draft.customer_phone),
        or_na(&draft.customer_email),
        escape_html(&request.ticket_id),
        priority_emoji(request.priority),
        request.priority,
        pickup,
        timestamp(at),
        description,
    )
}

pub fn format_status_change(
    ticket_id: &str,
    old: TicketStatus,
    new: TicketStatus,
    customer_name: &str,
    at: DateTime<Utc>,
) -> String {
    format!(
        "📄 <b>Ticket Status Update - FixNet</b>\n\n\
         🎫 <b>Ticket ID:</b> <code>{}</code>\n\
         👤 <b>Customer:</b> {}\n\n\
         {} <b>From:</b> {}\n\
         {} <b>To:</b> {}\n\n\
         ⏰ <b>Updated:</b> {}",
        escape_html(ticket_id),
        or_na(customer_name),
        status_emoji(old),
        old,
        status_emoji(new),
        new,
        timestamp(at),
    )
}

pub fn format_contact_message(message: &ContactMessage) -> String {
    let body = if message.message.trim().is_empty() {
        "No message provided".to_string()
    } else {
        escape_html(&truncate(&message.message, CONTACT_MESSAGE_LIMIT))
    };

    format!(
        "📨 <b>New Contact Message - FixNet</b>\n\n\
         👤 <b>Name:</b> {}\n\
         📧 <b>Email:</b> {}\n\
         📋 <b>Subject:</b> {}\n\n\
         💬 <b>Message:</b>\n<i>{}</i>\n\n\
         ⏰ <b>Received:</b> {}",
        or_na(&message.name),
        or_na(&message.email),
        or_na(&message.subject),
        body,
        timestamp(message.created_at),
    )
}

/// Sends notifications to one staff chat.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(SEND_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// `None` unless both the bot token and the chat ID are configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let (token, chat_id) = config.telegram_credentials()?;
        Some(Self::new(&config.telegram_api_url, token, chat_id))
    }

    pub async fn notify_new_ticket(&self, request: &RepairRequest) -> Result<()> {
        self.send_message(&format_new_ticket(request, Utc::now()))
            .await
            .context(format!("Failed to announce ticket {}", request.ticket_id))?;
        info!("Announced new ticket {} to staff", request.ticket_id);
        Ok(())
    }

    pub async fn notify_status_change(
        &self,
        ticket_id: &str,
        old: TicketStatus,
        new: TicketStatus,
        customer_name: &str,
    ) -> Result<()> {
        let text = format_status_change(ticket_id, old, new, customer_name, Utc::now());
        self.send_message(&text)
            .await
            .context(format!("Failed to announce status change of {}", ticket_id))
    }

    pub async fn notify_contact_message(&self, message: &ContactMessage) -> Result<()> {
        self.send_message(&format_contact_message(message))
            .await
            .context("Failed to announce contact message")
    }

    /// Send an HTML message to the configured chat
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);

        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Telegram API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API error ({}): {}", status, body);
        }

        Ok(())
    }
}
