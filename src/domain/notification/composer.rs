//! Message composition for approval requests and decision broadcasts.
//!
//! Output is Telegram MarkdownV2. Every piece of user or model text goes
//! through [`escape_text`]; only fixed labels are written raw.

use std::borrow::Cow;

use super::markdown::{escape, escape_text, link};
use super::DecisionKeyboard;
use crate::domain::approval::{
    Application, ApprovalStatus, COMMENT_LABEL, COMPANY_LABEL, FILE_LABEL, RESPONSIBLE_LABEL,
};
use crate::domain::document::DocumentCategory;
use crate::domain::foundation::Timestamp;
use crate::domain::verdict::AnalysisVerdict;

/// Summary shown when the analysis did not provide one.
pub const DEFAULT_SUMMARY: &str = "Анализ завершен";

/// Telegram rejects message text longer than this.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Caps applied to user and model text while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Limits {
    /// Characters kept from each free-text value.
    text: usize,
    /// Entries kept from each list.
    items: usize,
}

impl Limits {
    const UNBOUNDED: Limits = Limits {
        text: usize::MAX,
        items: usize::MAX,
    };
    const FLOOR: Limits = Limits { text: 48, items: 0 };

    fn tighter(self) -> Limits {
        Limits {
            text: (self.text.min(1600) / 2).max(Self::FLOOR.text),
            items: if self.items > 8 { 8 } else { self.items / 2 },
        }
    }
}

/// Renders with progressively tighter limits until the text fits.
fn fit(render: impl Fn(Limits) -> String) -> String {
    let mut limits = Limits::UNBOUNDED;
    loop {
        let text = render(limits);
        if text.chars().count() <= MAX_MESSAGE_CHARS || limits == Limits::FLOOR {
            return text;
        }
        limits = limits.tighter();
    }
}

/// Keeps at most `max` characters, marking the cut with an ellipsis.
fn clip(text: &str, max: usize) -> Cow<'_, str> {
    if text.chars().count() <= max {
        return Cow::Borrowed(text);
    }
    let mut clipped: String = text.chars().take(max.saturating_sub(1)).collect();
    clipped.push('…');
    Cow::Owned(clipped)
}

/// A rendered message, optionally with buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub text: String,
    pub keyboard: Option<DecisionKeyboard>,
}

/// Everything a decision broadcast needs.
///
/// Built from an [`Application`] for human decisions, or directly for
/// auto-approvals, which never create one.
#[derive(Debug, Clone)]
pub struct DecisionNotice<'a> {
    pub company_name: &'a str,
    pub responsible: &'a str,
    pub filename: &'a str,
    pub analysis: &'a AnalysisVerdict,
    pub comment: Option<&'a str>,
    pub download_url: Option<&'a str>,
    pub outcome: ApprovalStatus,
    pub decided_by: &'a str,
    pub decided_at: Timestamp,
    /// True for unattended approvals; adds the analysis block.
    pub automatic: bool,
}

impl<'a> DecisionNotice<'a> {
    /// Returns `None` while the application is still pending.
    pub fn from_application(app: &'a Application) -> Option<Self> {
        if !app.is_decided() {
            return None;
        }
        Some(Self {
            company_name: app.company_name(),
            responsible: app.responsible(),
            filename: app.filename(),
            analysis: app.analysis(),
            comment: app.comment(),
            download_url: app.download_url(),
            outcome: app.status(),
            decided_by: app.decided_by().unwrap_or_default(),
            decided_at: app.decided_at().unwrap_or_else(|| app.created_at()),
            automatic: false,
        })
    }

    fn category(&self) -> DocumentCategory {
        DocumentCategory::classify(self.analysis, self.filename)
    }
}

/// Approval request card with decision buttons.
pub fn compose_approval_request(app: &Application) -> ComposedMessage {
    ComposedMessage {
        text: fit(|limits| request_text(app, limits)),
        keyboard: Some(DecisionKeyboard::for_request(app.short_id(), app.download_url())),
    }
}

fn request_text(app: &Application, limits: Limits) -> String {
    let category = app.category();
    let analysis = app.analysis();

    let mut blocks = vec![
        format!("🔔 *Требуется согласование {}*", category.label_genitive()),
        [
            field_line("📋", COMPANY_LABEL, app.company_name(), limits),
            field_line("👤", RESPONSIBLE_LABEL, app.responsible(), limits),
            field_line("📅", "Дата:", &app.created_at().to_display_string(), limits),
            field_line("📄", FILE_LABEL, app.filename(), limits),
        ]
        .join("\n"),
        format!(
            "*Заключение AI:*\n{}",
            escape_text(&clip(summary_or_default(analysis), limits.text))
        ),
    ];
    blocks.extend(list_block("Ключевые моменты:", &analysis.key_points, limits));
    blocks.extend(list_block("Критические замечания:", &analysis.critical_issues, limits));
    blocks.extend(comment_block(app.comment(), limits));

    blocks.join("\n\n")
}

/// Decision broadcast, also used to replace the request card.
pub fn compose_decision(notice: &DecisionNotice<'_>) -> ComposedMessage {
    ComposedMessage {
        text: fit(|limits| decision_text(notice, limits)),
        keyboard: None,
    }
}

fn decision_text(notice: &DecisionNotice<'_>, limits: Limits) -> String {
    let category = notice.category();

    let mut blocks = vec![
        decision_heading(category, notice.outcome, notice.automatic),
        [
            field_line("📋", COMPANY_LABEL, notice.company_name, limits),
            field_line("👤", RESPONSIBLE_LABEL, notice.responsible, limits),
            field_line("📄", FILE_LABEL, notice.filename, limits),
            format!("📑 *Тип документа:* {}", escape(category.label())),
        ]
        .join("\n"),
        [
            format!("*Решение:* {}", decision_label(notice.outcome)),
            format!("*Кем:* {}", escape_text(&clip(notice.decided_by, limits.text))),
            format!("*Время решения:* {}", escape(&notice.decided_at.to_display_string())),
        ]
        .join("\n"),
    ];

    if notice.automatic {
        if let Some(summary) = non_empty(notice.analysis.summary.as_deref()) {
            blocks.push(format!("*Заключение AI:*\n{}", escape_text(&clip(summary, limits.text))));
        }
        blocks.extend(list_block("Ключевые моменты:", &notice.analysis.key_points, limits));
        blocks.extend(list_block("Критические замечания:", &notice.analysis.critical_issues, limits));
    }

    blocks.extend(comment_block(notice.comment, limits));

    if let Some(url) = non_empty(notice.download_url) {
        blocks.push(format!("📥 {}", link("Скачать документ", url)));
    }

    blocks.join("\n\n")
}

/// Short toast text for the callback acknowledgment.
pub fn decision_ack(category: DocumentCategory, outcome: ApprovalStatus) -> String {
    match outcome {
        ApprovalStatus::Approved => format!("✅ {} {}!", category.label(), category.approved_word()),
        ApprovalStatus::Rejected => format!("❌ {} {}", category.label(), category.rejected_word()),
        ApprovalStatus::SentToLawyers => {
            format!("⚖️ {} {}", category.label(), category.escalated_word())
        }
        ApprovalStatus::PendingApproval => "⏳ Ожидает решения".to_string(),
    }
}

/// Toast for a callback on an application that was already decided.
pub fn already_decided_ack(outcome: ApprovalStatus, decided_by: Option<&str>) -> String {
    match decided_by {
        Some(actor) => format!("ℹ️ Решение уже принято: {} ({})", decision_label(outcome), actor),
        None => format!("ℹ️ Решение уже принято: {}", decision_label(outcome)),
    }
}

pub const STALE_ACK: &str = "⌛ Заявка устарела или не найдена";
pub const UNKNOWN_ACTION_ACK: &str = "Неизвестная команда";
pub const MALFORMED_ACK: &str = "Неверный формат команды";

fn decision_heading(category: DocumentCategory, outcome: ApprovalStatus, automatic: bool) -> String {
    let label = category.label();
    match (outcome, automatic) {
        (ApprovalStatus::Approved, true) => {
            format!("🤖 *{} {} автоматически*", label, category.approved_word())
        }
        (ApprovalStatus::Approved, false) => format!("✅ *{} {}*", label, category.approved_word()),
        (ApprovalStatus::Rejected, _) => format!("❌ *{} {}*", label, category.rejected_word()),
        (ApprovalStatus::SentToLawyers, _) => {
            format!("⚖️ *{} {}*", label, category.escalated_word())
        }
        (ApprovalStatus::PendingApproval, _) => "⏳ *Ожидает решения*".to_string(),
    }
}

fn decision_label(outcome: ApprovalStatus) -> &'static str {
    match outcome {
        ApprovalStatus::Approved => "✅ СОГЛАСОВАНО",
        ApprovalStatus::Rejected => "❌ ОТКЛОНЕНО",
        ApprovalStatus::SentToLawyers => "⚖️ НАПРАВЛЕНО ЮРИСТАМ",
        ApprovalStatus::PendingApproval => "⏳ ОЖИДАЕТ",
    }
}

fn field_line(icon: &str, label: &str, value: &str, limits: Limits) -> String {
    format!("{} *{}* {}", icon, label, escape_text(&clip(value, limits.text)))
}

fn summary_or_default(analysis: &AnalysisVerdict) -> &str {
    non_empty(analysis.summary.as_deref()).unwrap_or(DEFAULT_SUMMARY)
}

fn list_block(title: &str, items: &[String], limits: Limits) -> Option<String> {
    let present: Vec<&str> = items.iter().map(|i| i.trim()).filter(|i| !i.is_empty()).collect();
    if present.is_empty() {
        return None;
    }
    let mut lines: Vec<String> = present
        .iter()
        .take(limits.items)
        .map(|i| format!("• {}", escape_text(&clip(i, limits.text))))
        .collect();
    let omitted = present.len() - lines.len();
    if omitted > 0 {
        lines.push(escape(&format!("… (+{})", omitted)));
    }
    Some(format!("*{}*\n{}", title, lines.join("\n")))
}

fn comment_block(comment: Option<&str>, limits: Limits) -> Option<String> {
    non_empty(comment).map(|c| format!("*{}*\n{}", COMMENT_LABEL, escape_text(&clip(c, limits.text))))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
