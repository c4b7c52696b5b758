use nexstock::core::{DashboardError, RecordId, Result, ValidationError};
use nexstock::{Product, ProductDraft, ProductStatus};
use ratatui::widgets::{Block, Borders};
use tui_textarea::{Input, Key, TextArea};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Category,
    Price,
    Stock,
    Status,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Self::Name,
        Self::Category,
        Self::Price,
        Self::Stock,
        Self::Status,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::Status => "status",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => " Product Name ",
            Self::Category => " Category ",
            Self::Price => " Price ($) ",
            Self::Stock => " Stock ",
            Self::Status => " Status (←/→) ",
        }
    }
}

/// Add/edit product modal.
pub struct ProductForm<'a> {
    /// `None` when adding
    pub editing: Option<RecordId>,
    pub name: TextArea<'a>,
    pub category: TextArea<'a>,
    pub price: TextArea<'a>,
    pub stock: TextArea<'a>,
    pub status: ProductStatus,
    pub focus: usize,
    pub errors: ValidationError,
    pub failure: Option<String>,
    pub submitting: bool,
}

impl<'a> ProductForm<'a> {
    pub fn add() -> Self {
        Self::with_draft(None, &ProductDraft::default())
    }

    pub fn edit(product: &Product) -> Self {
        Self::with_draft(Some(product.id.clone()), &ProductDraft::from_product(product))
    }

    fn with_draft(editing: Option<RecordId>, draft: &ProductDraft) -> Self {
        let numbers = editing.is_some();
        Self {
            editing,
            name: Self::input(&draft.name, "Ex: Wireless Mouse"),
            category: Self::input(&draft.category, "Ex: Electronics"),
            price: Self::input(if numbers { draft.price.to_string() } else { String::new() }, "0.00"),
            stock: Self::input(if numbers { draft.stock.to_string() } else { String::new() }, "0"),
            status: draft.status,
            focus: 0,
            errors: ValidationError::new(),
            failure: None,
            submitting: false,
        }
    }

    fn input(text: impl Into<String>, placeholder: &str) -> TextArea<'a> {
        let mut textarea = TextArea::new(vec![text.into()]);
        textarea.set_placeholder_text(placeholder);
        textarea.move_cursor(tui_textarea::CursorMove::End);
        textarea
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            " Edit Product "
        } else {
            " Add New Product "
        }
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    pub fn textarea(&self, field: Field) -> Option<&TextArea<'a>> {
        match field {
            Field::Name => Some(&self.name),
            Field::Category => Some(&self.category),
            Field::Price => Some(&self.price),
            Field::Stock => Some(&self.stock),
            Field::Status => None,
        }
    }

    fn textarea_mut(&mut self, field: Field) -> Option<&mut TextArea<'a>> {
        match field {
            Field::Name => Some(&mut self.name),
            Field::Category => Some(&mut self.category),
            Field::Price => Some(&mut self.price),
            Field::Stock => Some(&mut self.stock),
            Field::Status => None,
        }
    }

    /// Feeds a key to the focused field. Newlines are swallowed, every field
    /// is single-line.
    pub fn input_key(&mut self, input: Input) {
        if self.focused() == Field::Status {
            match input.key {
                Key::Left => self.status = self.status.previous(),
                Key::Right | Key::Char(' ') => self.status = self.status.next(),
                _ => {}
            }
            return;
        }
        if matches!(input.key, Key::Enter) || (input.ctrl && input.key == Key::Char('m')) {
            return;
        }
        let field = self.focused();
        if let Some(textarea) = self.textarea_mut(field) {
            textarea.input(input);
        }
    }

    fn text(textarea: &TextArea<'_>) -> String {
        textarea.lines().join("")
    }

    /// Validates the current input. Field errors are kept on the form for display.
    pub fn draft(&mut self) -> Result<ProductDraft> {
        let result = ProductDraft::from_form(
            &Self::text(&self.name),
            &Self::text(&self.category),
            &Self::text(&self.price),
            &Self::text(&self.stock),
            self.status,
        );
        match &result {
            Err(DashboardError::Validation(errors)) => self.errors = errors.clone(),
            _ => self.errors = ValidationError::new(),
        }
        result
    }

    /// Bordered block for a field, red with the message when it failed validation.
    pub fn block(&self, field: Field) -> Block<'static> {
        let title = match self.errors.message_for(field.key()) {
            Some(message) => format!("{}- {} ", field.label(), message),
            None => field.label().to_string(),
        };
        Block::default().borders(Borders::ALL).title(title)
    }
}
