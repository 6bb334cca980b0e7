//! Product page rendering shared by the public page and the admin preview.
//!
//! `product_view` is the only entry point. The `preview` flag changes the
//! booking panel and nothing else; the rendered document is the same value in
//! both modes.

use askama::Template;

use crate::catalog::{BlockBody, ContentBlock, TourPackage};

const DEFAULT_IMAGE_ALT: &str = "Tour image";

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBlock {
    Heading(String),
    /// One entry per embedded line of the source paragraph. Blank lines are
    /// kept as empty entries so gaps between lines survive.
    Paragraph(Vec<String>),
    Figure {
        src: String,
        alt: String,
        caption: Option<String>,
    },
}

impl RenderedBlock {
    pub fn is_heading(&self) -> bool {
        matches!(self, RenderedBlock::Heading(_))
    }

    pub fn is_paragraph(&self) -> bool {
        matches!(self, RenderedBlock::Paragraph(_))
    }

    pub fn is_figure(&self) -> bool {
        matches!(self, RenderedBlock::Figure { .. })
    }

    pub fn text(&self) -> &str {
        match self {
            RenderedBlock::Heading(text) => text,
            _ => "",
        }
    }

    pub fn lines(&self) -> &[String] {
        match self {
            RenderedBlock::Paragraph(lines) => lines,
            _ => &[],
        }
    }

    pub fn src(&self) -> &str {
        match self {
            RenderedBlock::Figure { src, .. } => src,
            _ => "",
        }
    }

    pub fn alt(&self) -> &str {
        match self {
            RenderedBlock::Figure { alt, .. } => alt,
            _ => "",
        }
    }

    pub fn caption(&self) -> Option<&str> {
        match self {
            RenderedBlock::Figure { caption, .. } => caption.as_deref(),
            _ => None,
        }
    }
}

/// Everything visible on the product page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub title: String,
    pub location: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub category_badge: String,
    pub rating: String,
    pub reviews: u32,
    pub description: Option<String>,
    pub price: String,
    pub list_price: Option<String>,
    pub blocks: Vec<RenderedBlock>,
}

/// The commit-affecting part of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingAction {
    pub enabled: bool,
    pub label: &'static str,
    pub show_payment_note: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub document: RenderedDocument,
    pub booking: BookingAction,
    pub preview: bool,
}

/// Transform blocks in order. Unsupported blocks are dropped.
pub fn render_blocks(blocks: &[ContentBlock]) -> Vec<RenderedBlock> {
    blocks
        .iter()
        .filter_map(|block| match &block.body {
            BlockBody::Header { value } => Some(RenderedBlock::Heading(value.clone())),
            BlockBody::Paragraph { value } => Some(RenderedBlock::Paragraph(
                value
                    .lines()
                    .map(str::trim_end)
                    .map(str::to_string)
                    .collect(),
            )),
            BlockBody::Image { value, caption } => {
                let caption = caption.clone().filter(|c| !c.is_empty());
                Some(RenderedBlock::Figure {
                    src: value.clone(),
                    alt: caption
                        .clone()
                        .unwrap_or_else(|| DEFAULT_IMAGE_ALT.to_string()),
                    caption,
                })
            }
            BlockBody::Unsupported => None,
        })
        .collect()
}

pub fn product_view(package: &TourPackage, preview: bool) -> ProductView {
    let document = RenderedDocument {
        title: package.title.clone(),
        location: package.location.clone(),
        image_url: package.image_url.clone(),
        tags: package.tags.clone(),
        category_badge: package.category_badge().to_string(),
        rating: format!("{}", package.rating),
        reviews: package.reviews,
        description: package.description.clone().filter(|d| !d.is_empty()),
        price: package.price_label(),
        list_price: package.list_price(),
        blocks: render_blocks(package.content_blocks.blocks()),
    };

    let booking = if preview {
        BookingAction {
            enabled: false,
            label: "Booking Disabled (Preview)",
            show_payment_note: false,
        }
    } else {
        BookingAction {
            enabled: true,
            label: "Check Availability",
            show_payment_note: true,
        }
    };

    ProductView {
        document,
        booking,
        preview,
    }
}

/// Document section of the product page on its own.
#[derive(Template)]
#[template(path = "components/product_document.html")]
pub struct ProductDocumentTemplate<'a> {
    pub view: &'a ProductView,
}

/// Full product detail: document plus booking panel.
#[derive(Template)]
#[template(path = "components/product_detail.html")]
pub struct ProductDetailTemplate<'a> {
    pub view: &'a ProductView,
}
