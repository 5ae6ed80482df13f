// Prediction panel: outcome probabilities, predicted result and score, the
// two market lines, and the server's formatted analysis.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use matchday_core::model::PredictionResult;
use matchday_core::protocol::Panel;

use super::{panel_block, render_status, status_line};
use crate::tui::ViewState;

/// Width of the probability bars, in cells.
const BAR_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = match &state.prediction_fixture {
        Some(fixture) => format!("Prediction - {fixture}"),
        None => "Prediction".to_string(),
    };
    let block = panel_block(title, false);

    let prediction = match &state.prediction {
        Panel::Ready(p) => p,
        other => {
            if let Some(line) = status_line(other, "Press Enter on a match for a prediction.") {
                render_status(frame, area, block, line);
            }
            return;
        }
    };

    let paragraph = Paragraph::new(prediction_lines(prediction))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub fn prediction_lines(p: &PredictionResult) -> Vec<Line<'static>> {
    let home = p.home_team.clone().unwrap_or_else(|| "Home".to_string());
    let away = p.away_team.clone().unwrap_or_else(|| "Away".to_string());
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    if let Some(league) = &p.league_display {
        lines.push(Line::from(Span::styled(
            league.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(probability_line(&home, p.home_win_prob, Color::Green));
    lines.push(probability_line("Draw", p.draw_prob, Color::Yellow));
    lines.push(probability_line(&away, p.away_win_prob, Color::Red));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::raw("Result: "),
        Span::styled(p.result_label().to_string(), bold),
        Span::raw("  Score: "),
        Span::styled(p.predicted_score.clone(), bold),
    ]));
    lines.push(Line::from(format!("Goals 2.5: {}", p.over_2_5)));
    lines.push(Line::from(format!("Both teams score: {}", p.both_teams_score)));

    if !p.formatted_analysis.trim().is_empty() {
        lines.push(Line::default());
        lines.extend(
            p.formatted_analysis
                .lines()
                .map(|l| Line::from(l.to_string())),
        );
    }
    lines
}

/// "ARS   52.3% ██████████"
fn probability_line(label: &str, percent: f64, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label:<6} {percent:>5.1}% ")),
        Span::styled(bar(percent), Style::default().fg(color)),
    ])
}

pub fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn prediction() -> PredictionResult {
        PredictionResult {
            home_team: Some("ARS".into()),
            away_team: Some("LEE".into()),
            league_display: Some("England Virtual League".into()),
            home_win_prob: 52.3,
            draw_prob: 25.1,
            away_win_prob: 22.6,
            predicted_result: "1".into(),
            predicted_score: "2:1".into(),
            over_2_5: "Over".into(),
            both_teams_score: "Yes".into(),
            formatted_analysis: "Mathematical Prediction Analysis\nForm favours ARS".into(),
        }
    }

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(state: &ViewState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(50, 20)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn bar_scales_and_clamps() {
        assert_eq!(bar(50.0).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(0.0), "");
        assert_eq!(bar(140.0).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn lines_cover_every_field() {
        let out = text(&prediction_lines(&prediction()));
        assert!(out.contains("England Virtual League"));
        assert!(out.contains("ARS     52.3%"));
        assert!(out.contains("Draw    25.1%"));
        assert!(out.contains("Result: Home win  Score: 2:1"));
        assert!(out.contains("Goals 2.5: Over"));
        assert!(out.contains("Both teams score: Yes"));
        assert!(out.ends_with("Form favours ARS"));
    }

    #[test]
    fn unavailable_is_not_an_error() {
        let mut state = ViewState::default();
        state.prediction_fixture = Some("ARS vs LEE".into());
        state.prediction =
            Panel::Empty("Prediction unavailable - insufficient historical data.".into());
        let out = draw(&state);
        assert!(out.contains("Prediction - ARS vs LEE"));
        assert!(out.contains("insufficient"));
    }

    #[test]
    fn ready_prediction_renders() {
        let mut state = ViewState::default();
        state.prediction = Panel::Ready(prediction());
        assert!(draw(&state).contains("Score: 2:1"));
    }
}
