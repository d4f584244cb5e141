//! Render functions

use super::controller::Controller;
use super::state::{AppMode, NoticeKind, Screen, SetupField};
use super::AppOptions;
use crate::layout::{centered_rect, question_panes, ScreenLayout};
use crate::theme::Theme;
use mx_core::question::{DomainFilter, Question};
use mx_core::session::{Feedback, Mode, SessionState, SessionView};
use mx_core::timer::format_remaining;
use ratatui::{prelude::*, widgets::*};

pub(crate) fn draw(frame: &mut Frame, controller: &Controller, options: &AppOptions) {
    let area = frame.area();
    let layout = ScreenLayout::split(area);
    let view = controller.session().view();
    let theme = &options.theme;

    render_header(frame, layout.header, &view, theme);
    match controller.screen() {
        Screen::Setup => render_setup(frame, layout.body, controller, theme),
        Screen::Quiz => render_quiz(frame, layout.body, controller, options),
        Screen::Results => render_results(frame, layout.body, controller, theme),
    }
    render_status_bar(frame, layout.status, controller, theme);

    if controller.state.mode == AppMode::Help {
        render_help(frame, area, theme);
    }
}

/// Header text: product, mode, progress, countdown
fn header_text(view: &SessionView) -> String {
    let mut parts = vec![" mockexam".to_string(), view.mode.label().to_string()];
    if view.review_round > 0 {
        parts.push(format!("Review round {}", view.review_round));
    }
    if !view.progress_label.is_empty() {
        parts.push(format!("Answered {}", view.progress_label));
    }
    if let Some(timer) = &view.timer_label {
        parts.push(timer.clone());
    }
    parts.join(" | ")
}

fn render_header(frame: &mut Frame, area: Rect, view: &SessionView, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(header_text(view)).style(theme.bar().add_modifier(Modifier::BOLD)),
        area,
    );
}

fn domain_label(domain: &DomainFilter) -> String {
    match domain {
        DomainFilter::All => "All domains".to_string(),
        DomainFilter::Only(name) => name.clone(),
    }
}

fn render_setup(frame: &mut Frame, area: Rect, controller: &Controller, theme: &Theme) {
    let session = controller.session();
    let setup = session.setup();
    let bank = session.bank();

    let mut lines = vec![
        Line::from(Span::styled(
            "New quiz",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "Bank: {} questions in {} domains",
                bank.len(),
                bank.domains().len()
            ),
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
    ];

    for field in SetupField::ALL {
        let value = match field {
            SetupField::Mode => setup.mode.label().to_string(),
            SetupField::Domain => format!(
                "{} ({} available)",
                domain_label(&setup.domain),
                controller.pool_size()
            ),
            SetupField::Count => setup.count.to_string(),
            SetupField::Minutes if setup.mode == Mode::Exam => {
                setup.effective_exam_minutes().to_string()
            }
            SetupField::Minutes => format!("{} (exam only)", setup.effective_exam_minutes()),
        };
        let focused = field == controller.state.setup_field;
        let marker = if focused { "›" } else { " " };
        let style = if focused {
            theme.cursor()
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(format!(" {} ", marker)),
            Span::styled(format!("{:<14}", field.label()), style),
            Span::styled(format!(" ◀ {} ▶", value), style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑/↓ select field   ←/→ change   Enter start   ? help   q quit",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Setup ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.focus_border)),
        ),
        area,
    );
}

/// Style for a choice row given what has been revealed
fn choice_style(
    theme: &Theme,
    index: usize,
    question: &Question,
    selected: Option<usize>,
    revealed: bool,
) -> Style {
    if revealed && question.is_correct(index) {
        Style::default().fg(theme.correct)
    } else if revealed && selected == Some(index) {
        Style::default().fg(theme.incorrect)
    } else if selected == Some(index) {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_quiz(frame: &mut Frame, area: Rect, controller: &Controller, options: &AppOptions) {
    let session = controller.session();
    let theme = &options.theme;
    let Some(question) = session.current_question() else {
        frame.render_widget(
            Paragraph::new("No question to display").block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let feedback = session.visible_feedback(&question.id);
    let (question_area, feedback_area) = question_panes(area, feedback.is_some());
    let selected = session.answer_for(&question.id);

    let mut lines = Vec::new();
    if options.show_badges {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}]", question.domain),
                Style::default().fg(theme.info),
            ),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", question.difficulty),
                Style::default().fg(theme.muted),
            ),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        question.question.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for (index, choice) in question.choices.iter().enumerate() {
        let cursor = index == controller.state.choice_cursor;
        let mark = if selected == Some(index) { "●" } else { "○" };
        let mut style = choice_style(theme, index, question, selected, feedback.is_some());
        if cursor {
            style = style.patch(theme.cursor());
        }
        lines.push(Line::from(vec![
            Span::raw(if cursor { " › " } else { "   " }),
            Span::styled(format!("{} {}. {}", mark, index + 1, choice), style),
        ]));
    }

    let bookmarked = controller.bookmarks().contains(&question.id);
    let view = session.view();
    let title = format!(
        " Question {} of {}{} ",
        view.position + 1,
        view.total,
        if bookmarked { " ★" } else { "" }
    );
    let border = if bookmarked {
        theme.bookmark
    } else {
        theme.focus_border
    };
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        ),
        question_area,
    );

    if let (Some(feedback), Some(feedback_area)) = (feedback, feedback_area) {
        render_feedback(
            frame,
            feedback_area,
            &feedback,
            controller.state.show_explanation,
            theme,
        );
    }
}

fn feedback_lines(feedback: &Feedback, show_explanation: bool, theme: &Theme) -> Vec<Line<'static>> {
    let verdict = match feedback.is_correct {
        Some(true) => Span::styled("✓ Correct", Style::default().fg(theme.correct)),
        Some(false) => Span::styled("✗ Incorrect", Style::default().fg(theme.incorrect)),
        None => Span::styled("– Not answered", Style::default().fg(theme.warning)),
    };
    let mut lines = vec![
        Line::from(verdict.bold()),
        Line::from(format!("Your answer:    {}", feedback.selected_label())),
        Line::from(format!("Correct answer: {}", feedback.correct)),
        Line::from(""),
    ];
    if show_explanation {
        lines.push(Line::from(feedback.explanation.clone()));
    } else {
        lines.push(Line::from(Span::styled(
            "Press e for the explanation",
            Style::default().fg(theme.muted),
        )));
    }
    lines
}

fn render_feedback(
    frame: &mut Frame,
    area: Rect,
    feedback: &Feedback,
    show_explanation: bool,
    theme: &Theme,
) {
    frame.render_widget(
        Paragraph::new(feedback_lines(feedback, show_explanation, theme))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(" Feedback ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.unfocus_border)),
            ),
        area,
    );
}

fn render_results(frame: &mut Frame, area: Rect, controller: &Controller, theme: &Theme) {
    let session = controller.session();
    let Some(card) = session.scorecard() else {
        return;
    };

    let mut summary = vec![Line::from(Span::styled(
        card.summary(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    let mut details = format!(
        "{} correct, {} incorrect, {} unanswered",
        card.correct,
        card.incorrect_count() - card.unanswered,
        card.unanswered
    );
    if let Some(secs) = card.elapsed_secs {
        let used = format_remaining(chrono::Duration::seconds(secs));
        details.push_str(&format!("   Time used {}", used));
    }
    summary.push(Line::from(Span::styled(details, Style::default().fg(theme.muted))));

    let rows: Vec<ListItem> = card
        .results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let (mark, color) = match (result.is_correct, result.selected) {
                (true, _) => ("✓", theme.correct),
                (false, Some(_)) => ("✗", theme.incorrect),
                (false, None) => ("–", theme.warning),
            };
            let text = session
                .bank()
                .get(&result.question_id)
                .map(|q| q.question.as_str())
                .unwrap_or_default();
            let star = if controller.bookmarks().contains(&result.question_id) {
                " ★"
            } else {
                ""
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", mark), Style::default().fg(color)),
                Span::raw(format!("{:>2}. {}{}", i + 1, text, star)),
            ]))
        })
        .collect();

    let selected_feedback = card
        .results
        .get(controller.state.review_cursor)
        .and_then(|r| session.feedback(&r.question_id).ok());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(8),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(summary).block(
            Block::default()
                .title(" Results ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.focus_border)),
        ),
        chunks[0],
    );

    let mut list_state = ListState::default().with_selected(Some(controller.state.review_cursor));
    frame.render_stateful_widget(
        List::new(rows)
            .highlight_style(theme.cursor())
            .block(
                Block::default()
                    .title(" Review (r retry incorrect, R new quiz) ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.unfocus_border)),
            ),
        chunks[1],
        &mut list_state,
    );

    if let Some(feedback) = selected_feedback {
        render_feedback(
            frame,
            chunks[2],
            &feedback,
            controller.state.show_explanation,
            theme,
        );
    }
}

/// Default hint shown when no notice is pending
fn screen_hint(view: &SessionView) -> String {
    let mut parts: Vec<&str> = Vec::new();
    match view.state {
        SessionState::Idle | SessionState::Configuring => {
            parts.extend(["Enter start", "? help", "q quit"]);
        }
        SessionState::InProgress => {
            parts.extend(["1-9/Enter answer", "←/→ move"]);
            if view.instant_feedback {
                parts.push("e explain");
            }
            if view.show_submit {
                parts.push("s submit");
            } else if view.can_finish {
                parts.push("s finish");
            }
            parts.extend(["b bookmark", "R reset", "? help"]);
        }
        SessionState::Graded => {
            parts.extend(["↑/↓ review", "e explain"]);
            if view.show_retry {
                parts.push("r retry incorrect");
            }
            parts.extend(["R new quiz", "q quit"]);
        }
    }
    format!(" {}", parts.join(" | "))
}

fn render_status_bar(frame: &mut Frame, area: Rect, controller: &Controller, theme: &Theme) {
    let (text, style) = match &controller.state.message {
        Some(notice) => {
            let fg = match notice.kind {
                NoticeKind::Info => theme.bar_fg,
                NoticeKind::Success => theme.correct,
                NoticeKind::Warning => theme.warning,
                NoticeKind::Error => theme.incorrect,
            };
            (format!(" {}", notice.text), theme.bar().fg(fg))
        }
        None => (screen_hint(&controller.session().view()), theme.bar()),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let heading = Style::default().fg(theme.warning);
    let text = vec![
        Line::from(Span::styled(
            "mockexam - Practice and exam quizzes",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Setup", heading)),
        Line::from("  ↑/↓ j/k     Select field"),
        Line::from("  ←/→ h/l     Change value"),
        Line::from("  Enter       Start quiz"),
        Line::from(""),
        Line::from(Span::styled("Quiz", heading)),
        Line::from("  ↑/↓ j/k     Move choice cursor"),
        Line::from("  Enter, 1-9  Select answer"),
        Line::from("  ←/→ h/l     Previous/Next question"),
        Line::from("  s           Submit (exam) or finish"),
        Line::from("  e           Show explanation"),
        Line::from("  b           Toggle bookmark"),
        Line::from(""),
        Line::from(Span::styled("Results", heading)),
        Line::from("  r           Retry incorrect questions"),
        Line::from("  R           Reset to a new quiz"),
        Line::from(""),
        Line::from(Span::styled("Other", heading)),
        Line::from("  q           Quit"),
        Line::from("  ?           Show this help"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(theme.muted),
        )),
    ];

    let help_area = centered_rect(50, 80, area);
    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.focus_border)),
        ),
        help_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::controller;
    use crate::input::Action;
    use ratatui::backend::TestBackend;

    fn screen_text(controller: &Controller) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let options = AppOptions::default();
        terminal
            .draw(|frame| draw(frame, controller, &options))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_header_text() {
        let mut c = controller();
        assert_eq!(header_text(&c.session().view()), " mockexam | Practice");

        c.handle(Action::Right);
        c.handle(Action::Confirm);
        let header = header_text(&c.session().view());
        assert!(header.starts_with(" mockexam | Exam | Answered 0 / 3"));
        assert!(header.ends_with("Remaining 60:00"));
    }

    #[test]
    fn test_setup_screen() {
        let c = controller();
        let text = screen_text(&c);
        assert!(text.contains("Setup"));
        assert!(text.contains("All domains (3 available)"));
        assert!(text.contains("60 (exam only)"));
    }

    #[test]
    fn test_quiz_screen_shows_badges_and_feedback() {
        let mut c = controller();
        c.handle(Action::Confirm);
        let text = screen_text(&c);
        assert!(text.contains("Question 1 of 3"));
        assert!(text.contains("[basic]") || text.contains("[advanced]"));
        assert!(!text.contains("Feedback"));

        c.handle(Action::Choose(0));
        let text = screen_text(&c);
        assert!(text.contains("Feedback"));
        assert!(text.contains("Correct answer:"));
    }

    #[test]
    fn test_results_screen() {
        let mut c = controller();
        c.handle(Action::Confirm);
        c.handle(Action::Submit);
        let text = screen_text(&c);
        assert!(text.contains("Score: 0 / 3 (0%)"));
        assert!(text.contains("0 correct, 0 incorrect, 3 unanswered"));
    }

    #[test]
    fn test_help_overlay() {
        let mut c = controller();
        c.handle(Action::Help);
        assert!(screen_text(&c).contains("Retry incorrect questions"));
    }

    #[test]
    fn test_status_hint_follows_view() {
        let mut c = controller();
        assert_eq!(screen_hint(&c.session().view()), " Enter start | ? help | q quit");

        c.handle(Action::Right);
        c.handle(Action::Confirm);
        let hint = screen_hint(&c.session().view());
        assert!(hint.contains("s submit"));
        assert!(!hint.contains("e explain"));
        assert!(!hint.contains("retry"));

        c.handle(Action::Submit);
        let hint = screen_hint(&c.session().view());
        assert!(hint.contains("r retry incorrect"));
        assert!(!hint.contains("s submit"));

        c.handle(Action::Retry);
        let hint = screen_hint(&c.session().view());
        assert!(hint.contains("e explain"));
        assert!(hint.contains("s finish"));
    }

    #[test]
    fn test_results_time_used() {
        let mut c = controller();
        c.handle(Action::Right);
        c.handle(Action::Confirm);
        c.handle(Action::Submit);
        assert!(screen_text(&c).contains("Time used 0:00"));
    }
}
