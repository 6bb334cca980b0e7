use crate::catalog::document::{BlockBody, ContentBlock, Document};
use crate::catalog::models::{Category, TourPackage};

fn block(id: &str, body: BlockBody) -> ContentBlock {
    ContentBlock {
        id: id.to_string(),
        body,
    }
}

fn header(id: &str, value: &str) -> ContentBlock {
    block(
        id,
        BlockBody::Header {
            value: value.to_string(),
        },
    )
}

fn paragraph(id: &str, value: &str) -> ContentBlock {
    block(
        id,
        BlockBody::Paragraph {
            value: value.to_string(),
        },
    )
}

fn image(id: &str, value: &str, caption: &str) -> ContentBlock {
    block(
        id,
        BlockBody::Image {
            value: value.to_string(),
            caption: Some(caption.to_string()),
        },
    )
}

#[allow(clippy::too_many_arguments)]
fn package(
    id: &str,
    title: &str,
    location: &str,
    price: f64,
    rating: f64,
    reviews: u32,
    image_url: &str,
    tags: &[&str],
    category: Category,
) -> TourPackage {
    TourPackage {
        id: id.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        price,
        rating,
        reviews,
        image_url: image_url.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        discount: None,
        category: Some(category),
        description: None,
        content_blocks: Document::default(),
    }
}

const DMZ_IMAGE: &str = "https://images.unsplash.com/photo-1596426463945-8463e2601264?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80";

/// The reference catalog written on first access to an empty store.
pub fn default_packages() -> Vec<TourPackage> {
    let mut nami = package(
        "1",
        "Nami Island & Garden of Morning Calm Day Trip from Seoul",
        "Gyeonggi-do",
        45.0,
        4.8,
        1240,
        "https://picsum.photos/800/600?random=1",
        &["Nature", "Day Trip"],
        Category::General,
    );
    nami.discount = Some(15.0);
    nami.description = Some(
        "Escape the city and immerse yourself in the natural beauty of Nami Island and the Garden of Morning Calm."
            .to_string(),
    );
    nami.content_blocks = Document::new(vec![
        header("b1", "Tour Highlights"),
        paragraph(
            "b2",
            "Visit Nami Island, famous for its tree-lined avenues and as the filming location for the classic K-drama \"Winter Sonata\". Afterwards, explore the Garden of Morning Calm, a 30,000-square-meter arboretum hosted in a unique Korean garden style.",
        ),
        image(
            "b3",
            "https://picsum.photos/800/400?random=10",
            "Beautiful tree-lined path at Nami Island",
        ),
        header("b4", "Itinerary"),
        paragraph(
            "b5",
            "08:00 AM - Depart from Hongik Univ. Station\n09:30 AM - Arrive at Nami Island\n13:00 PM - Lunch (Dakgalbi recommended)\n14:30 PM - Garden of Morning Calm\n17:00 PM - Return to Seoul",
        ),
    ]);

    let mut dmz = package(
        "2",
        "DMZ Tour: 3rd Tunnel & Suspension Bridge (No Shopping)",
        "Paju",
        52.0,
        4.9,
        3200,
        DMZ_IMAGE,
        &["History", "Best Seller"],
        Category::Dmz,
    );
    dmz.description = Some(
        "The most popular DMZ tour without forced shopping stops. See the reality of the divided nation."
            .to_string(),
    );
    dmz.content_blocks = Document::new(vec![
        header("d1", "Why this tour?"),
        paragraph(
            "d2",
            "Unlike other low-cost tours, this package strictly prohibits forced shopping centers (Ginseng/Amethyst shops). You will spend more time at the actual historical sites.",
        ),
        image("d3", DMZ_IMAGE, "The DMZ Fence"),
    ]);

    let mut everland = package(
        "3",
        "Everland Theme Park Discount Ticket (QR Code Entry)",
        "Yongin",
        38.0,
        4.7,
        5800,
        "https://picsum.photos/400/300?random=3",
        &["Theme Park", "Family"],
        Category::General,
    );
    everland.discount = Some(30.0);

    vec![
        nami,
        dmz,
        everland,
        package(
            "4",
            "Han River E-Land Dinner Cruise with Live Jazz",
            "Seoul",
            65.0,
            4.6,
            890,
            "https://picsum.photos/400/300?random=4",
            &["Romance", "Night View"],
            Category::Nightlife,
        ),
        package(
            "5",
            "K-Beauty Facial & Spa Treatment in Gangnam",
            "Seoul",
            120.0,
            4.9,
            150,
            "https://images.unsplash.com/photo-1570172619644-dfd03ed5d881?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&q=80",
            &["Wellness", "Relaxation"],
            Category::Beauty,
        ),
        package(
            "6",
            "Temple Stay Experience: Finding Inner Peace",
            "Gyeongju",
            80.0,
            4.8,
            420,
            "https://images.unsplash.com/photo-1583486334584-c946f3a39df9?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&q=80",
            &["Culture", "Spiritual"],
            Category::Religious,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_entries_with_unique_ids() {
        let packages = default_packages();
        let ids: Vec<&str> = packages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn every_category_but_general_has_one_entry() {
        let packages = default_packages();
        for category in [
            Category::Beauty,
            Category::Nightlife,
            Category::Religious,
            Category::Dmz,
        ] {
            let count = packages
                .iter()
                .filter(|p| p.category == Some(category))
                .count();
            assert_eq!(count, 1, "{}", category);
        }
    }
}
