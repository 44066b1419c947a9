//! TUI rendering logic for the movie browser.

use moviedeck_api::links::{google_search_url, poster_url, youtube_trailer_url};
use moviedeck_api::tmdb::MovieDetails;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Tabs, Wrap};

use super::state::{
    BrowserState, InputMode, ListSource, LoadState, MSG_NO_OVERVIEW, MSG_NO_RESULTS, Route,
    format_rating,
};

/// Placeholder shown in an empty search box.
const SEARCH_PLACEHOLDER: &str =
    "Search for any movie (e.g., 'Avengers', 'Star Wars', 'Batman')...";

/// Hint shown under the search box.
const SEARCH_HINT: &str = "Press Enter to search or wait for results to appear automatically";

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // nav
            Constraint::Min(5),    // content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_nav(frame, chunks[0], state);
    match state.route {
        Route::Home => draw_home(frame, chunks[1]),
        Route::Movies => draw_movies(frame, chunks[1], state),
        Route::Movie(_) => draw_detail(frame, chunks[1], state),
    }
    draw_footer(frame, chunks[2], state);
}

/// Draws the navigation tabs.
fn draw_nav(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let selected = match state.route {
        Route::Home => 0,
        Route::Movies | Route::Movie(_) => 1,
    };
    let tabs = Tabs::new(vec!["1 Home", "2 Movies"])
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(" Movie App "))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

/// Draws the welcome screen.
fn draw_home(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to Movie App",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[ Enter: Browse Movies ]",
            Style::default().fg(Color::Yellow),
        )),
    ];
    let home = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(home, area);
}

/// Draws the search box and the movie list.
#[allow(clippy::indexing_slicing)]
fn draw_movies(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box
            Constraint::Length(1), // hint
            Constraint::Min(3),    // list
        ])
        .split(area);

    draw_search_box(frame, chunks[0], state);
    if !state.query.is_empty() {
        let hint = Paragraph::new(SEARCH_HINT).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, chunks[1]);
    }

    // border (2) + header row with its margin (2)
    state.page_size = usize::from(chunks[2].height.saturating_sub(4)).max(1);
    draw_movie_list(frame, chunks[2], state);
}

/// Draws the search input.
fn draw_search_box(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let editing = state.input_mode == InputMode::Search;
    let (text, style) = if state.query.is_empty() && !editing {
        (
            String::from(SEARCH_PLACEHOLDER),
            Style::default().fg(Color::DarkGray),
        )
    } else if editing {
        (format!("{}_", state.query), Style::default().fg(Color::Yellow))
    } else {
        (state.query.clone(), Style::default())
    };

    let search = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, area);
}

/// Draws the movie list block for the current load state.
fn draw_movie_list(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", state.list_heading()))
        .border_style(Style::default().fg(Color::Cyan));

    let message = match &state.list {
        LoadState::Idle => Some(Line::from("")),
        LoadState::Loading => Some(Line::from("Loading...")),
        LoadState::Failed(msg) => Some(error_line(*msg)),
        LoadState::Ready(movies) if movies.is_empty() => Some(match &state.list_source {
            ListSource::Search(_) => error_line(MSG_NO_RESULTS),
            ListSource::Popular => Line::from(""),
        }),
        LoadState::Ready(_) => None,
    };
    if let Some(line) = message {
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let header = Row::new(vec!["Title", "Year", "Rating"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .movies()
        .iter()
        .map(|m| {
            Row::new(vec![
                m.title.clone(),
                m.year()
                    .map_or_else(|| String::from("--"), String::from),
                format!("\u{2b50} {}", format_rating(m.vote_average)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(30),
        Constraint::Length(6),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.list_table_state);
}

/// Red error text.
fn error_line(msg: &'static str) -> Line<'static> {
    Line::from(Span::styled(msg, Style::default().fg(Color::Red)))
}

/// Draws the detail view.
fn draw_detail(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = match &state.detail {
        LoadState::Idle => Vec::new(),
        LoadState::Loading => vec![Line::from("Loading...")],
        LoadState::Failed(msg) => vec![error_line(*msg)],
        LoadState::Ready(details) => detail_lines(details, &state.image_size),
    };

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(detail, area);
}

/// Labeled `key: value` line.
fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

/// Lines of the detail view for loaded details.
fn detail_lines(details: &MovieDetails, image_size: &str) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        details.title.clone(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))];
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(Span::styled(
            String::from(tagline),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(""));
    lines.push(field(
        "Release Date",
        details.release_date.clone().unwrap_or_default(),
    ));
    lines.push(field("Rating", format_rating(details.vote_average)));
    if let Some(runtime) = details.runtime.filter(|r| *r > 0) {
        lines.push(field("Runtime", format!("{runtime} min")));
    }
    if !details.genres.is_empty() {
        let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        lines.push(field("Genres", genres.join(", ")));
    }
    lines.push(field(
        "Overview",
        String::from(details.overview_text().unwrap_or(MSG_NO_OVERVIEW)),
    ));
    lines.push(Line::from(""));
    lines.push(field(
        "Poster",
        poster_url(details.poster_path.as_deref(), image_size),
    ));
    let year = details.year();
    if let Ok(url) = google_search_url(&details.title, year) {
        lines.push(field("Google", String::from(url)));
    }
    if let Ok(url) = youtube_trailer_url(&details.title, year) {
        lines.push(field("Trailer", String::from(url)));
    }
    lines
}

/// Draws the footer with key hints and the status message.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let hints = match (state.route, state.input_mode) {
        (Route::Movies, InputMode::Search) => {
            "Type to search | Enter: search now | Esc: done"
        }
        (Route::Home, _) => "Enter: browse  2: movies  q: quit",
        (Route::Movies, InputMode::Normal) => {
            "\u{2191}\u{2193}/j/k: move  PgUp/PgDn: page  Enter: details  /: search  g: google  t: trailer  p: poster  q: quit"
        }
        (Route::Movie(_), _) => {
            "Esc/b: back  f: favorite  g: google  t: trailer  p: poster  q: quit"
        }
    };

    let mut spans = vec![Span::raw(hints)];
    if let Some(status) = &state.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            status.clone(),
            Style::default().fg(Color::Green),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Renders `state` on an off-screen terminal and returns the screen text.
#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub fn render_to_string(state: &mut BrowserState, width: u16, height: u16) -> String {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| draw(frame, state)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
