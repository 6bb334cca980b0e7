use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::document::Document;

/// Fixed set of catalog themes. A package without a category is shown as
/// "General" but is not matched by the `general` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Beauty,
    Nightlife,
    Religious,
    Dmz,
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::General,
        Category::Beauty,
        Category::Nightlife,
        Category::Religious,
        Category::Dmz,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Beauty => "beauty",
            Category::Nightlife => "nightlife",
            Category::Religious => "religious",
            Category::Dmz => "dmz",
            Category::General => "general",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Heading used on the category listing page.
    pub fn title(self) -> &'static str {
        match self {
            Category::Beauty => "Beauty & Wellness",
            Category::Nightlife => "Safe Nightlife",
            Category::Religious => "Religious Freedom",
            Category::Dmz => "DMZ Tours",
            Category::General => "General Tours",
        }
    }

    /// Label used in the admin category picker.
    pub fn admin_label(self) -> &'static str {
        match self {
            Category::General => "General / Uncategorized",
            other => other.title(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry. Serialized with the camelCase keys of the stored
/// collection; optional fields are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourPackage {
    pub id: String,
    pub title: String,
    pub location: String,
    pub price: f64,
    pub rating: f64,
    pub reviews: u32,
    pub image_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Document::is_empty")]
    pub content_blocks: Document,
}

impl TourPackage {
    /// Badge text for the category; absent shows as "General".
    pub fn category_badge(&self) -> &str {
        self.category.map(Category::as_str).unwrap_or("General")
    }

    /// Pre-discount price, rounded to whole units, when a discount is set.
    pub fn list_price(&self) -> Option<String> {
        self.discount
            .filter(|d| *d > 0.0)
            .map(|d| format!("{:.0}", self.price * (1.0 + d / 100.0)))
    }

    pub fn price_label(&self) -> String {
        format!("{}", self.price)
    }

    pub fn discount_label(&self) -> Option<String> {
        self.discount.filter(|d| *d > 0.0).map(|d| format!("{}", d))
    }

    /// Whole stars shown on cards.
    pub fn star_count(&self) -> usize {
        self.rating.clamp(0.0, 5.0).floor() as usize
    }

    pub fn filled_stars(&self) -> String {
        "\u{2605}".repeat(self.star_count())
    }

    pub fn empty_stars(&self) -> String {
        "\u{2606}".repeat(5 - self.star_count())
    }

    pub fn primary_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or("")
    }

    pub fn tags_csv(&self) -> String {
        self.tags.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::document::BlockBody;

    fn sample() -> TourPackage {
        TourPackage {
            id: "7".into(),
            title: "Busan Food Walk".into(),
            location: "Busan".into(),
            price: 40.0,
            rating: 4.5,
            reviews: 12,
            image_url: "https://example.com/a.jpg".into(),
            tags: vec!["Food".into()],
            discount: Some(20.0),
            category: None,
            description: None,
            content_blocks: Document::default(),
        }
    }

    #[test]
    fn serializes_with_camel_case_and_omits_absent_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["imageUrl"], "https://example.com/a.jpg");
        assert!(json.get("category").is_none());
        assert!(json.get("description").is_none());
        assert!(json.get("contentBlocks").is_none());
        assert_eq!(json["discount"], 20.0);
    }

    #[test]
    fn parses_stored_record_with_blocks() {
        let json = r#"{
            "id": "2", "title": "DMZ", "location": "Paju", "price": 52,
            "rating": 4.9, "reviews": 3200, "imageUrl": "x", "tags": ["History"],
            "category": "dmz",
            "contentBlocks": [
                {"id": "d1", "type": "header", "value": "Why this tour?"},
                {"id": "d3", "type": "image", "value": "y", "caption": "The DMZ Fence"}
            ]
        }"#;
        let pkg: TourPackage = serde_json::from_str(json).unwrap();
        assert_eq!(pkg.category, Some(Category::Dmz));
        assert_eq!(pkg.content_blocks.len(), 2);
        match &pkg.content_blocks.blocks()[1].body {
            BlockBody::Image { caption, .. } => {
                assert_eq!(caption.as_deref(), Some("The DMZ Fence"))
            }
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn list_price_rounds_to_whole_units() {
        let pkg = sample();
        assert_eq!(pkg.list_price().as_deref(), Some("48"));
        let mut plain = sample();
        plain.discount = None;
        assert!(plain.list_price().is_none());
    }

    #[test]
    fn absent_category_shows_as_general_badge() {
        let pkg = sample();
        assert_eq!(pkg.category_badge(), "General");
        let mut tagged = sample();
        tagged.category = Some(Category::Beauty);
        assert_eq!(tagged.category_badge(), "beauty");
    }

    #[test]
    fn star_count_floors_rating() {
        assert_eq!(sample().star_count(), 4);
        assert_eq!(sample().filled_stars().chars().count(), 4);
        assert_eq!(sample().empty_stars().chars().count(), 1);
    }

    #[test]
    fn category_parse_round_trips_known_values() {
        for c in Category::ALL {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
        assert_eq!(Category::parse("all"), None);
    }
}
