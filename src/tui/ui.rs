//! UI rendering for the front panel.

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::cpu::{CpuState, Word, MEMORY_SIZE};
use super::app::ConsoleApp;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &ConsoleApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(56)])
        .split(frame.area());

    // Left side: registers and state
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(chunks[0]);

    draw_registers(frame, left_chunks[0], app);
    draw_state(frame, left_chunks[1], app);
    draw_status(frame, left_chunks[2], app);
    draw_help(frame, left_chunks[3]);

    // Right side: the memory grid
    draw_memory(frame, chunks[1], app);
}

/// Draw the register panel: accumulator, instruction pointer, output.
fn draw_registers(frame: &mut Frame, area: Rect, app: &ConsoleApp) {
    let content = vec![
        Line::from(vec![
            Span::raw("Accumulator "),
            Span::styled(fmt_accumulator(app.cpu.accumulator), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::raw("IP          "),
            Span::styled(
                format!("[ {:02}]", app.cpu.ip),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![
            Span::raw("Output      "),
            Span::styled(fmt_output(app.cpu.output), Style::default().fg(Color::White)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("Cycles      "),
            Span::styled(format!("{}", app.cpu.cycles), Style::default().fg(Color::Cyan)),
        ]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .title(" CARDIAC ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    frame.render_widget(paragraph, area);
}

/// Draw the run state with the keys that apply to it.
fn draw_state(frame: &mut Frame, area: Rect, app: &ConsoleApp) {
    let (label, hint, color) = match app.cpu.state {
        CpuState::Running => ("Running", "(p)ause", Color::Green),
        CpuState::Halted => ("Halted", "(r)eset (h)ard (s)tep", Color::Red),
        CpuState::Paused => ("Paused", "(r)esume (s)tep", Color::Yellow),
        CpuState::Step => ("Stepping", "", Color::Yellow),
    };

    let content = vec![
        Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .title(" State ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(paragraph, area);
}

/// Draw the transient status message, if one is showing.
fn draw_status(frame: &mut Frame, area: Rect, app: &ConsoleApp) {
    let text = app.status.current().unwrap_or("");
    let status = Paragraph::new(text)
        .style(Style::default().fg(Color::White))
        .block(Block::default().title(" Status ").borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw the help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("p: pause  r: resume"),
        Line::from("s: step   h: hard reset"),
        Line::from("F6: dump memory"),
        Line::from("F7: restore memory"),
        Line::from("q: quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().title(" Help ").borders(Borders::ALL));

    frame.render_widget(help, area);
}

/// Draw the 100-word memory grid, four columns of 25 cells, with the
/// instruction pointer's cell highlighted.
fn draw_memory(frame: &mut Frame, area: Rect, app: &ConsoleApp) {
    let words = app.cpu.mem.words();
    let ip = app.cpu.ip as usize;

    let rows: Vec<Line> = (0..MEMORY_SIZE / 4)
        .map(|row| {
            let mut spans = Vec::with_capacity(8);
            for col in 0..4 {
                let addr = col * 25 + row;
                let cell = format!("{:02} {}", addr, fmt_word(words[addr]));

                let style = if addr == ip {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else if words[addr] != 0 {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };

                spans.push(Span::styled(cell, style));
                if col < 3 {
                    spans.push(Span::raw("  "));
                }
            }
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(rows).block(
        Block::default()
            .title(" Memory ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );

    frame.render_widget(paragraph, area);
}

/// Format a three-digit memory word, sign slot first: `[ 197]`, `[-040]`.
fn fmt_word(w: Word) -> String {
    if w < 0 {
        format!("[-{:03}]", w.unsigned_abs())
    } else {
        format!("[ {:03}]", w)
    }
}

/// Format the four-digit accumulator: `[ 0040]`, `[-1600]`.
fn fmt_accumulator(a: Word) -> String {
    if a < 0 {
        format!("[-{:04}]", a.unsigned_abs())
    } else {
        format!("[ {:04}]", a)
    }
}

/// Format the output register; blank until an OUT has run.
fn fmt_output(out: Option<Word>) -> String {
    match out {
        Some(v) => fmt_word(v),
        None => "[    ]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_formatting() {
        assert_eq!(fmt_word(197), "[ 197]");
        assert_eq!(fmt_word(-40), "[-040]");
        assert_eq!(fmt_word(0), "[ 000]");
    }

    #[test]
    fn test_accumulator_formatting() {
        assert_eq!(fmt_accumulator(40), "[ 0040]");
        assert_eq!(fmt_accumulator(-1600), "[-1600]");
    }

    #[test]
    fn test_output_formatting() {
        assert_eq!(fmt_output(None), "[    ]");
        assert_eq!(fmt_output(Some(-600)), "[-600]");
    }
}
