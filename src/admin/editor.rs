//! Editor state machine: Closed -> Editing -> Closed.
//!
//! The product held while editing is an owned clone; the catalog only changes
//! on a successful save.

use thiserror::Error;

use crate::catalog::{CatalogError, CatalogStore, Category, Document, TourPackage};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("No product is open for editing")]
    NotEditing,

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTab {
    #[default]
    Basic,
    Content,
}

impl EditorTab {
    pub fn as_str(self) -> &'static str {
        match self {
            EditorTab::Basic => "basic",
            EditorTab::Content => "content",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "basic" => Some(EditorTab::Basic),
            "content" => Some(EditorTab::Content),
            _ => None,
        }
    }
}

/// Values from the "Basic" tab form.
#[derive(Debug, Clone, Default)]
pub struct BasicFields {
    pub title: String,
    pub location: String,
    pub price: f64,
    pub rating: f64,
    pub reviews: u32,
    pub discount: Option<f64>,
    pub category: Option<Category>,
    pub description: String,
    pub image_url: String,
    /// Comma-separated.
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub product: TourPackage,
    pub tab: EditorTab,
    pub preview: bool,
    pub is_new: bool,
}

impl EditSession {
    fn new(product: TourPackage, is_new: bool) -> Self {
        Self {
            product,
            tab: EditorTab::Basic,
            preview: false,
            is_new,
        }
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.product.content_blocks
    }

    pub fn apply_basic(&mut self, fields: BasicFields) {
        let product = &mut self.product;
        product.title = fields.title.trim().to_string();
        product.location = fields.location.trim().to_string();
        product.price = fields.price;
        product.rating = fields.rating;
        product.reviews = fields.reviews;
        product.discount = fields.discount;
        product.category = fields.category;
        product.description = Some(fields.description.trim().to_string());
        product.image_url = fields.image_url.trim().to_string();
        product.tags = parse_tags(&fields.tags);
    }

    pub fn set_cover_image(&mut self, reference: String) {
        self.product.image_url = reference;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditorState {
    #[default]
    Closed,
    Editing(EditSession),
}

impl EditorState {
    /// Open an independent copy of a stored package.
    pub fn open_existing(&mut self, catalog: &CatalogStore, id: &str) -> Result<(), EditorError> {
        let product = catalog
            .get_by_id(id)?
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        *self = EditorState::Editing(EditSession::new(product, false));
        Ok(())
    }

    /// Open a fresh package with placeholder values.
    pub fn open_new(&mut self) {
        *self = EditorState::Editing(EditSession::new(new_package(), true));
    }

    /// Abandon the edit.
    pub fn close(&mut self) {
        *self = EditorState::Closed;
    }

    pub fn session(&self) -> Option<&EditSession> {
        match self {
            EditorState::Editing(session) => Some(session),
            EditorState::Closed => None,
        }
    }

    pub fn session_mut(&mut self) -> Result<&mut EditSession, EditorError> {
        match self {
            EditorState::Editing(session) => Ok(session),
            EditorState::Closed => Err(EditorError::NotEditing),
        }
    }

    /// Validate and persist. Closes the editor only when the write succeeded;
    /// on any failure the in-progress edit is kept as is.
    pub fn save(&mut self, catalog: &CatalogStore) -> Result<TourPackage, EditorError> {
        let session = self.session_mut()?;
        validate(&session.product)?;
        catalog.upsert(&session.product)?;
        let saved = session.product.clone();
        tracing::info!("Saved package {} ({})", saved.id, saved.title);
        self.close();
        Ok(saved)
    }
}

pub fn validate(product: &TourPackage) -> Result<(), EditorError> {
    if product.id.trim().is_empty() {
        return Err(EditorError::Validation("Package id is required".into()));
    }
    if product.title.trim().is_empty() {
        return Err(EditorError::Validation("Title is required".into()));
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(EditorError::Validation(
            "Price must be zero or more".into(),
        ));
    }
    if !(0.0..=5.0).contains(&product.rating) {
        return Err(EditorError::Validation(
            "Rating must be between 0 and 5".into(),
        ));
    }
    if let Some(discount) = product.discount {
        if !(0.0..=100.0).contains(&discount) {
            return Err(EditorError::Validation(
                "Discount must be between 0 and 100".into(),
            ));
        }
    }
    Ok(())
}

pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Placeholder package for "Add New". The id is the creation time in epoch
/// milliseconds.
pub fn new_package() -> TourPackage {
    TourPackage {
        id: chrono::Utc::now().timestamp_millis().to_string(),
        title: "New Travel Story".to_string(),
        location: "Seoul".to_string(),
        price: 50.0,
        rating: 5.0,
        reviews: 0,
        image_url: "https://picsum.photos/800/600".to_string(),
        tags: Vec::new(),
        discount: None,
        category: Some(Category::General),
        description: Some(String::new()),
        content_blocks: Document::default(),
    }
}
