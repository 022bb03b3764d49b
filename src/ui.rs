use crate::app::{App, Focus, MapState};
use crate::braille::BrailleCanvas;
use crate::countries;
use crate::map::Projection;
use crate::plane::PLANE_GLYPH;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

const SPINNER: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];

/// Render the UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if app.splash_active() {
        render_splash(frame, app, area);
        return;
    }

    // Map takes two thirds, list one third, status bar a single row
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(67), Constraint::Percentage(33)])
        .split(rows[0]);

    render_map(frame, app, panels[0]);
    render_list(frame, app, panels[1]);
    render_status_bar(frame, app, rows[1]);
    render_flight(frame, app);
}

fn render_splash(frame: &mut Frame, app: &App, area: Rect) {
    let spinner = SPINNER[(app.frame() / 4) as usize % SPINNER.len()];
    let text = Line::from(vec![
        Span::styled(spinner.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(" travel-map", Style::default().add_modifier(Modifier::BOLD)),
    ]);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), vertical[1]);
}

fn render_map(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Map;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
        .title(Span::styled(
            " World Map ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.map_area = inner;

    match &app.map {
        MapState::Loading => {
            let text = Paragraph::new("Loading map data…")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(text, centered_lines(inner, 1));
        }
        MapState::Failed(message) => {
            let text = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(text, centered_lines(inner, 3));
        }
        MapState::Ready(renderer) => {
            // Braille gives 2x4 resolution per character
            let mut canvas = BrailleCanvas::new(inner.width as usize, inner.height as usize);
            let proj = Projection::world(canvas.pixel_width(), canvas.pixel_height());
            renderer.render(&mut canvas, &proj, |name| app.selection.contains(name), app.fill_color());
            canvas.paint(inner, frame.buffer_mut());
        }
    }
}

fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::List;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
        .title(Span::styled(
            " Countries ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    // Search line, placeholder when empty
    let search = if app.list.search().is_empty() && !focused {
        Line::from(Span::styled("Search countries...", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(vec![
            Span::styled("/", Style::default().fg(Color::DarkGray)),
            Span::raw(app.list.search().to_string()),
            Span::styled(
                if focused { "▏" } else { "" },
                Style::default().fg(Color::Cyan),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(search), sections[0]);

    // Running selected/total count
    let count = format!("{}/{}", app.selection.len(), countries::ALL.len());
    frame.render_widget(
        Paragraph::new(count)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right),
        sections[1],
    );

    app.list_rows_area = sections[2];

    let fill = app.fill_color();
    let items: Vec<ListItem> = app
        .list
        .filtered()
        .iter()
        .map(|&name| {
            let selected = app.selection.contains(name);
            let checkbox = if selected { "[x] " } else { "[ ] " };
            let style = if selected {
                Style::default().fg(fill).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(checkbox, style),
                Span::styled(name, style),
            ]))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
    );
    frame.render_stateful_widget(list, sections[2], app.list.state_mut());
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Line::from(vec![
        Span::styled(" Tab", Style::default().fg(Color::Yellow)),
        Span::styled(":switch ", Style::default().fg(Color::DarkGray)),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::styled(":move ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::styled(":toggle ", Style::default().fg(Color::DarkGray)),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::styled(":color ", Style::default().fg(Color::DarkGray)),
        Span::styled("██", Style::default().fg(app.fill_color())),
        Span::styled(" e", Style::default().fg(Color::Yellow)),
        Span::styled(":export ", Style::default().fg(Color::DarkGray)),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::styled(":quit", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}

/// Vertically centered strip of a panel, for short messages.
fn centered_lines(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let y = area.y + (area.height - height) / 2;
    Rect::new(area.x, y, area.width, height)
}

fn render_flight(frame: &mut Frame, app: &App) {
    let Some(flight) = &app.flight else { return };
    let (x, y) = flight.position();
    let area = frame.area();
    if x >= 0 && y >= 0 && (x as u16) < area.width && (y as u16) < area.height {
        frame.buffer_mut()[(x as u16, y as u16)]
            .set_char(PLANE_GLYPH)
            .set_fg(Color::White);
    }
}
