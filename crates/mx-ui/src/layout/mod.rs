//! Layout management

use ratatui::prelude::*;

/// Areas of every screen: header bar, body and status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub body: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    /// Split the terminal area into header, body and status rows
    pub fn split(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);
        Self {
            header: chunks[0],
            body: chunks[1],
            status: chunks[2],
        }
    }
}

/// Split the quiz body into the question pane and the feedback pane
///
/// The feedback pane is only reserved when there is something to show.
pub fn question_panes(body: Rect, with_feedback: bool) -> (Rect, Option<Rect>) {
    if !with_feedback {
        return (body, None);
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(body);
    (chunks[0], Some(chunks[1]))
}

/// Rectangle centered in `r` taking the given percentages
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_layout() {
        let layout = ScreenLayout::split(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.body.height, 22);
        assert_eq!(layout.status.y, 23);
    }

    #[test]
    fn test_question_panes() {
        let body = Rect::new(0, 1, 80, 20);
        assert_eq!(question_panes(body, false), (body, None));

        let (question, feedback) = question_panes(body, true);
        let feedback = feedback.unwrap();
        assert_eq!(question.height + feedback.height, 20);
        assert_eq!(feedback.y, question.y + question.height);
    }

    #[test]
    fn test_centered_rect_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(50, 70, parent);
        assert_eq!(popup.width, 50);
        assert!(popup.x >= 20 && popup.x + popup.width <= 80);
        assert!(popup.y + popup.height <= 50);
    }
}
