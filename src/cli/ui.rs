use super::app::{ActiveView, App, Screen};
use super::form::{Field, ProductForm};
use nexstock::core::{MutationKey, Record, Value};
use nexstock::domain::format_money;
use nexstock::{FetchStatus, InventorySummary, MutationStatus, ProductStatus, TableView, ThemeMode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState, Tabs},
};

struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    muted: Color,
    danger: Color,
    success: Color,
}

impl Palette {
    fn for_theme(theme: ThemeMode) -> Self {
        if theme.is_dark() {
            Self {
                fg: Color::Gray,
                bg: Color::Black,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                danger: Color::LightRed,
                success: Color::LightGreen,
            }
        } else {
            Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::Gray,
                danger: Color::Red,
                success: Color::Green,
            }
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme);
    f.render_widget(Block::default().style(palette.base()), f.area());

    if app.screen == Screen::Login {
        draw_login(f, app, &palette);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Min(1),    // screen body
            Constraint::Length(1), // notice
            Constraint::Length(1), // key help
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0], &palette);
    match &app.view {
        Some(ActiveView::Overview(view)) => draw_overview(f, view, chunks[1], &palette),
        Some(ActiveView::Products(view)) => draw_table_screen(f, app, view, chunks[1], &palette),
        Some(ActiveView::Orders(view)) => draw_table_screen(f, app, view, chunks[1], &palette),
        Some(ActiveView::Customers(view)) => draw_table_screen(f, app, view, chunks[1], &palette),
        None => {}
    }
    draw_notice(f, app, chunks[2], &palette);
    draw_help(f, app, chunks[3], &palette);

    if let Some(form) = &app.form {
        draw_form(f, form, &palette);
    }
    if let Some((_, name)) = &app.confirm_delete {
        draw_confirm(f, name, &palette);
    }
}

fn draw_login(f: &mut Frame, app: &App, palette: &Palette) {
    let area = centered_rect(50, 9, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" NexStock ")
        .title_style(palette.title())
        .style(palette.base());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new("Sign in with your email address"),
        rows[0],
    );
    f.render_widget(&app.login, rows[1]);
    if let Some(error) = &app.login_error {
        f.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(palette.danger)),
            rows[2],
        );
    }
    f.render_widget(
        Paragraph::new("Enter: sign in   Esc: quit").style(Style::default().fg(palette.muted)),
        rows[3],
    );
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let user = app.session.user().unwrap_or("guest");
    let tabs = Tabs::new(Screen::TABS.iter().map(|s| s.title()))
        .select(app.screen.tab_index().unwrap_or(0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" NexStock · {} · {} theme ", user, app.theme))
                .title_style(palette.title()),
        )
        .highlight_style(palette.title().add_modifier(Modifier::UNDERLINED));
    f.render_widget(tabs, area);
}

fn draw_overview(f: &mut Frame, view: &TableView<nexstock::Product>, area: Rect, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(area);

    if let Some(banner) = fetch_banner(&view.fetch_status().unwrap_or_default(), "products", palette) {
        f.render_widget(banner, chunks[0]);
        return;
    }

    let products = view.collection().unwrap_or_default();
    let summary = InventorySummary::from_products(&products);
    let cards = [
        ("Products", summary.product_count.to_string()),
        ("Units in stock", summary.total_units.to_string()),
        (
            "Inventory value",
            format_money(&Value::Float(summary.inventory_value)),
        ),
        ("Needs restock", summary.attention_count().to_string()),
    ];
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[0]);
    for ((label, figure), slot) in cards.iter().zip(slots.iter()) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(figure.clone(), palette.title())),
            Line::from(Span::styled(*label, Style::default().fg(palette.muted))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(card, *slot);
    }

    let attention: Vec<ListItem> = products
        .iter()
        .filter(|p| p.status != ProductStatus::InStock)
        .map(|p| {
            let color = match p.status {
                ProductStatus::OutOfStock => palette.danger,
                _ => palette.accent,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<14}", p.status.label()), Style::default().fg(color)),
                Span::raw(format!("{} ({} left)", p.name, p.stock)),
            ]))
        })
        .collect();
    let list = List::new(attention).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(
                " Low / out of stock: {} low, {} out ",
                summary.low_stock, summary.out_of_stock
            )),
    );
    f.render_widget(list, chunks[1]);
}

fn fetch_banner<'a>(status: &FetchStatus, resource: &str, palette: &Palette) -> Option<Paragraph<'a>> {
    match status {
        FetchStatus::Idle | FetchStatus::Loading => Some(
            Paragraph::new(format!("Loading {resource}…"))
                .style(Style::default().fg(palette.muted))
                .block(Block::default().borders(Borders::ALL)),
        ),
        FetchStatus::Error(message) => Some(
            Paragraph::new(vec![
                Line::from(format!("Could not load {resource}: {message}")),
                Line::from("Press 'r' to retry."),
            ])
            .style(Style::default().fg(palette.danger))
            .block(Block::default().borders(Borders::ALL).title(" Error ")),
        ),
        FetchStatus::Success => None,
    }
}

fn draw_table_screen<R: Record>(
    f: &mut Frame,
    app: &App,
    view: &TableView<R>,
    area: Rect,
    palette: &Palette,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search
            Constraint::Min(3),    // table
            Constraint::Length(1), // page summary
        ])
        .split(area);

    let mut search = app.search.clone();
    if app.search_focused {
        if let Some(block) = search.block().cloned() {
            search.set_block(block.border_style(Style::default().fg(palette.accent)));
        }
    }
    f.render_widget(&search, chunks[0]);

    let status = view.fetch_status().unwrap_or_default();
    // a reload keeps the old rows on screen; only the first load blanks it
    let has_rows = view.collection_len().unwrap_or(0) > 0;
    if !has_rows || status.error().is_some() {
        if let Some(banner) = fetch_banner(&status, R::RESOURCE, palette) {
            f.render_widget(banner, chunks[1]);
            return;
        }
    }

    let page = match view.derived_page() {
        Ok(page) => page,
        Err(err) => {
            f.render_widget(
                Paragraph::new(err.to_string()).style(Style::default().fg(palette.danger)),
                chunks[1],
            );
            return;
        }
    };
    let query = view.query().unwrap_or_default();
    let columns = view.columns().columns();

    let header = Row::new(std::iter::once(Cell::from(" ")).chain(columns.iter().enumerate().map(
        |(i, col)| {
            let arrow = match &query.sort_key {
                Some(key) if key == col.key && query.sort_direction.is_descending() => " ▼",
                Some(key) if key == col.key => " ▲",
                _ => "",
            };
            Cell::from(format!("{} {}{}", i + 1, col.label, arrow))
        },
    )))
    .style(palette.title());

    let rows: Vec<Row> = page
        .rows
        .iter()
        .map(|record| {
            let status = view
                .mutation_status(&MutationKey::Record(record.id()))
                .unwrap_or_default();
            let (marker, style) = match status {
                MutationStatus::Pending => ("…", Style::default().fg(palette.muted)),
                MutationStatus::Failed(_) => ("!", Style::default().fg(palette.danger)),
                _ => (" ", Style::default()),
            };
            Row::new(
                std::iter::once(Cell::from(marker))
                    .chain(columns.iter().map(|col| Cell::from(col.cell(record)))),
            )
            .style(style)
        })
        .collect();

    let widths = std::iter::once(Constraint::Length(1))
        .chain(columns.iter().map(|_| Constraint::Fill(1)));
    let title = if status.is_loading() {
        format!(" {} (refreshing…) ", app.screen.title())
    } else {
        format!(" {} ", app.screen.title())
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    if page.is_empty() {
        let message = if page.total_len == 0 {
            "No records yet."
        } else {
            "No results match your search."
        };
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted))
            .block(Block::default().borders(Borders::ALL).title(format!(" {} ", app.screen.title())));
        f.render_widget(empty, chunks[1]);
    } else {
        let mut state = TableState::default();
        state.select(Some(app.selected.min(page.row_count() - 1)));
        f.render_stateful_widget(table, chunks[1], &mut state);
    }

    let nav = format!(
        "{}{}{}",
        if page.has_previous() { "◀ " } else { "  " },
        page.summary(),
        if page.has_next() { " ▶" } else { "" },
    );
    f.render_widget(
        Paragraph::new(nav).alignment(Alignment::Right),
        chunks[2],
    );
}

fn draw_notice(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let Some(notice) = &app.notice else {
        return;
    };
    let color = if notice.is_error {
        palette.danger
    } else {
        palette.success
    };
    f.render_widget(
        Paragraph::new(notice.text.as_str()).style(Style::default().fg(color)),
        area,
    );
}

fn draw_help(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let help = if app.search_focused {
        "typing filters after a pause · Enter: apply now · Esc: leave search"
    } else {
        match app.view {
            Some(ActiveView::Products(_)) => {
                "Tab: switch · /: search · 1-6: sort · ←/→: page · a: add · e: edit · d: delete · r: reload · t: theme · L: logout · q: quit"
            }
            Some(ActiveView::Overview(_)) => "Tab: switch · r: reload · t: theme · L: logout · q: quit",
            _ => "Tab: switch · /: search · 1-9: sort · ←/→: page · r: reload · t: theme · L: logout · q: quit",
        }
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(palette.muted)),
        area,
    );
}

fn draw_form(f: &mut Frame, form: &ProductForm<'_>, palette: &Palette) {
    let area = centered_rect(60, 21, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(form.title())
        .title_style(palette.title())
        .style(palette.base());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(3); Field::ALL.len()];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in Field::ALL.into_iter().enumerate() {
        let border = if form.errors.message_for(field.key()).is_some() {
            Style::default().fg(palette.danger)
        } else if form.focused() == field {
            Style::default().fg(palette.accent)
        } else {
            Style::default()
        };
        let block = form.block(field).border_style(border);
        match form.textarea(field) {
            Some(textarea) => {
                let mut textarea = textarea.clone();
                textarea.set_block(block);
                if form.focused() != field {
                    textarea.set_cursor_style(Style::default());
                }
                f.render_widget(&textarea, rows[i]);
            }
            None => {
                let status = Paragraph::new(format!("◀ {} ▶", form.status)).block(block);
                f.render_widget(status, rows[i]);
            }
        }
    }

    let footer = Field::ALL.len();
    if let Some(failure) = &form.failure {
        f.render_widget(
            Paragraph::new(failure.as_str()).style(Style::default().fg(palette.danger)),
            rows[footer],
        );
    } else if form.submitting {
        f.render_widget(
            Paragraph::new("Saving…").style(Style::default().fg(palette.muted)),
            rows[footer],
        );
    }
    f.render_widget(
        Paragraph::new("Tab/↑↓: field · Enter: save · Esc: cancel")
            .style(Style::default().fg(palette.muted)),
        rows[footer + 1],
    );
}

fn draw_confirm(f: &mut Frame, name: &str, palette: &Palette) {
    let area = centered_rect(50, 5, f.area());
    f.render_widget(Clear, area);
    let dialog = Paragraph::new(vec![
        Line::from(format!("Delete \"{name}\"? This cannot be undone.")),
        Line::from(Span::styled(
            "y: delete · any other key: cancel",
            Style::default().fg(palette.muted),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm ")
            .border_style(Style::default().fg(palette.danger))
            .style(palette.base()),
    );
    f.render_widget(dialog, area);
}

/// Rect of `width` columns and `height` rows centred in `outer`, clipped to it.
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - width) / 2,
        outer.y + (outer.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_clips() {
        let outer = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(20, 4, outer), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(80, 40, outer), outer);
    }
}
