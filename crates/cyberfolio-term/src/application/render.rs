//! Panels and boot screens as styled ratatui lines.

use std::collections::HashMap;

use cyberfolio_core::boot::{MEMORY_TEST_SIZE, POST_BANNER};
use cyberfolio_core::content::portfolio;
use cyberfolio_core::{Block, BootLine, BootPhase, Card, Panel, Tone};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::domain::services::{AppState, PreviewState};

pub const PROMPT_USER: &str = "root@portfolio";
const MEMORY_BAR_WIDTH: usize = 32;

const GREEN: Color = Color::Green;
const DIM: Color = Color::Gray;

fn tone_style(tone: Tone) -> Style {
    let color = match tone {
        Tone::Neutral => DIM,
        Tone::Success => Color::Green,
        Tone::Caution => Color::Yellow,
        Tone::Warning => Color::LightRed,
        Tone::Danger => Color::Red,
    };
    return Style::default().fg(color).add_modifier(Modifier::BOLD);
}

fn card_lines(card: &Card, indent: &str) -> Vec<Line<'static>> {
    let mut lines = vec![];

    let mut title = vec![Span::raw(indent.to_string())];
    if let Some(icon) = &card.icon {
        title.push(Span::raw(format!("{} ", icon)));
    }
    title.push(Span::styled(
        card.title.clone(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));
    if let Some(badge) = &card.badge {
        title.push(Span::raw(" "));
        title.push(Span::styled(format!("[{}]", badge.label), tone_style(badge.tone)));
    }
    lines.push(Line::from(title));

    if let Some(subtitle) = &card.subtitle {
        lines.push(Line::styled(
            format!("{}   {}", indent, subtitle),
            Style::default().fg(Color::White),
        ));
    }
    if let Some(period) = &card.period {
        lines.push(Line::styled(format!("{}   {}", indent, period), Style::default().fg(DIM)));
    }
    if let Some(link) = &card.link {
        lines.push(Line::styled(
            format!("{}   {}", indent, link),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        ));
    }
    for body in &card.body {
        lines.push(Line::from(vec![
            Span::styled(format!("{}     ▹ ", indent), Style::default().fg(GREEN)),
            Span::styled(body.clone(), Style::default().fg(Color::White)),
        ]));
    }

    return lines;
}

/// Styled lines for a panel. Link-preview placeholders are replaced by whatever
/// `previews` holds for them.
pub fn panel_lines(
    panel: &Panel,
    previews: &HashMap<String, PreviewState>,
    indent: &str,
) -> Vec<Line<'static>> {
    let mut lines = vec![];

    for block in &panel.blocks {
        match block {
            Block::Heading(text) => lines.push(Line::styled(
                format!("{}{}", indent, text),
                Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
            )),
            Block::Text(text) => lines.push(Line::styled(
                format!("{}{}", indent, text),
                Style::default().fg(Color::White),
            )),
            Block::Bullet(text) => lines.push(Line::from(vec![
                Span::styled(format!("{}  ▹ ", indent), Style::default().fg(GREEN)),
                Span::styled(text.clone(), Style::default().fg(Color::White)),
            ])),
            Block::Field { label, value } => lines.push(Line::from(vec![
                Span::styled(format!("{}{}: ", indent, label), Style::default().fg(GREEN)),
                Span::styled(value.clone(), Style::default().fg(Color::White)),
            ])),
            Block::Tags { label, items } => {
                let mut spans = vec![Span::raw(indent.to_string())];
                if let Some(label) = label {
                    spans.push(Span::styled(format!("{}: ", label), Style::default().fg(GREEN)));
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::raw(" "));
                    }
                    spans.push(Span::styled(
                        format!("[{}]", item),
                        Style::default().fg(Color::Cyan),
                    ));
                }
                lines.push(Line::from(spans));
            }
            Block::Card(card) => lines.extend(card_lines(card, indent)),
            Block::Notice(text) => lines.push(Line::styled(
                format!("{}▶ {}", indent, text),
                Style::default().fg(GREEN).add_modifier(Modifier::ITALIC),
            )),
            Block::LinkPreview(url) => match previews.get(url) {
                Some(PreviewState::Ready(preview)) => {
                    lines.extend(panel_lines(preview, previews, indent));
                }
                _ => lines.push(Line::styled(
                    format!("{}⟳ Loading preview of {}", indent, url),
                    Style::default().fg(DIM).add_modifier(Modifier::DIM),
                )),
            },
            Block::Error(text) => lines.push(Line::styled(
                format!("{}{}", indent, text),
                Style::default().fg(Color::Red),
            )),
            Block::Footer(text) => lines.push(Line::styled(
                format!("{}{}", indent, text),
                Style::default().fg(DIM).add_modifier(Modifier::ITALIC),
            )),
        }
    }

    return lines;
}

pub fn prompt_spans(command: &str) -> Vec<Span<'static>> {
    return vec![
        Span::styled(PROMPT_USER, Style::default().fg(GREEN)),
        Span::styled(":", Style::default().fg(Color::White)),
        Span::styled("~", Style::default().fg(Color::Blue)),
        Span::styled("$ ", Style::default().fg(Color::White)),
        Span::styled(command.to_string(), Style::default().fg(Color::White)),
    ];
}

/// Scrollback: the welcome banner over an empty history, then each command with its
/// output.
pub fn history_lines(app_state: &AppState) -> Vec<Line<'static>> {
    let mut lines = vec![];

    if app_state.history.is_empty() {
        lines.extend(panel_lines(&portfolio::welcome_banner(), &app_state.previews, ""));
    }

    for entry in &app_state.history {
        lines.push(Line::raw(""));
        lines.push(Line::from(prompt_spans(&entry.command)));
        lines.extend(panel_lines(&entry.output, &app_state.previews, "  "));
    }

    return lines;
}

fn memory_bar(app_state: &AppState, memory_test_ticks: u64) -> String {
    let filled = if memory_test_ticks == 0 {
        MEMORY_BAR_WIDTH
    } else {
        let ratio = app_state.phase_ticks.min(memory_test_ticks) as f64 / memory_test_ticks as f64;
        (ratio * MEMORY_BAR_WIDTH as f64).round() as usize
    };
    return format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(MEMORY_BAR_WIDTH - filled)
    );
}

fn revealed_lines(lines: &[BootLine]) -> Vec<Line<'static>> {
    return lines
        .iter()
        .flat_map(|line| line.text.lines())
        .map(|text| Line::styled(text.to_string(), Style::default().fg(GREEN)))
        .collect();
}

/// The screen for the current boot phase. `memory_test_ticks` is how many UI ticks
/// the memory test lasts, for the progress bar.
pub fn boot_lines(app_state: &AppState, memory_test_ticks: u64) -> Vec<Line<'static>> {
    let mut lines = match app_state.boot_phase {
        BootPhase::PrePost | BootPhase::Done => vec![],
        BootPhase::Post => POST_BANNER
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let color = if i + 1 == POST_BANNER.len() {
                    Color::White
                } else {
                    Color::Cyan
                };
                return Line::styled(text.to_string(), Style::default().fg(color));
            })
            .collect(),
        BootPhase::MemoryTest => vec![
            Line::styled("Memory Test:", Style::default().fg(Color::White)),
            Line::styled(
                format!("Testing: {}", MEMORY_TEST_SIZE),
                Style::default().fg(Color::White),
            ),
            Line::styled(
                memory_bar(app_state, memory_test_ticks),
                Style::default().fg(GREEN),
            ),
        ],
        BootPhase::BootLine(_) => revealed_lines(app_state.boot_phase.revealed(&app_state.boot_lines)),
    };

    let cursor = if app_state.cursor_visible() { "█" } else { " " };
    lines.push(Line::styled(cursor, Style::default().fg(Color::White)));

    return lines;
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyberfolio_core::{HistoryLine, BOOT_LINES};

    fn text_of(lines: &[Line]) -> Vec<String> {
        return lines
            .iter()
            .map(|line| {
                return line
                    .spans
                    .iter()
                    .map(|span| span.content.to_string())
                    .collect::<String>();
            })
            .collect();
    }

    #[test]
    fn test_welcome_banner_only_over_empty_history() {
        let mut app_state = AppState::new(BOOT_LINES.to_vec());
        let text = text_of(&history_lines(&app_state));
        assert_eq!(text, vec![portfolio::WELCOME_TITLE, portfolio::WELCOME_HINT]);

        app_state.history.push(HistoryLine {
            command: "Help".to_string(),
            output: portfolio::not_found(),
        });
        let text = text_of(&history_lines(&app_state));
        assert_eq!(text[1], "root@portfolio:~$ Help");
        assert!(!text.contains(&portfolio::WELCOME_TITLE.to_string()));
    }

    #[test]
    fn test_link_preview_placeholder_resolves() {
        let panel = Panel::new().link_preview("https://defendis.ai");
        let mut previews = HashMap::new();

        let loading = text_of(&panel_lines(&panel, &previews, ""));
        assert_eq!(loading, vec!["⟳ Loading preview of https://defendis.ai"]);

        previews.insert(
            "https://defendis.ai".to_string(),
            PreviewState::Ready(Panel::new().error("Failed to load preview")),
        );
        let ready = text_of(&panel_lines(&panel, &previews, ""));
        assert_eq!(ready, vec!["Failed to load preview"]);
    }

    #[test]
    fn test_boot_screens() {
        let mut app_state = AppState::new(BOOT_LINES.to_vec());
        assert_eq!(text_of(&boot_lines(&app_state, 15)), vec!["█"]);

        app_state.handle_boot_phase(BootPhase::Post);
        let post = text_of(&boot_lines(&app_state, 15));
        assert_eq!(post.len(), POST_BANNER.len() + 1);

        app_state.handle_boot_phase(BootPhase::MemoryTest);
        let memory = text_of(&boot_lines(&app_state, 15));
        assert_eq!(memory[1], format!("Testing: {}", MEMORY_TEST_SIZE));
        assert!(memory[2].starts_with("[░"));

        for _ in 0..20 {
            app_state.tick();
        }
        let memory = text_of(&boot_lines(&app_state, 15));
        assert!(!memory[2].contains('░'));

        app_state.handle_boot_phase(BootPhase::BootLine(1));
        let revealed = text_of(&boot_lines(&app_state, 15));
        assert_eq!(revealed[0], BOOT_LINES[0].text);
        assert_eq!(revealed[1], BOOT_LINES[1].text);
        assert_eq!(revealed.len(), 3);
    }
}
