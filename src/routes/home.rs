use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::auth::User;
use crate::catalog::{Category, TourPackage};
use crate::error::AppResult;
use crate::extractors::MaybeUser;
use crate::state::AppState;

/// Theme tile on the home page, linking to a category listing.
pub struct Theme {
    pub category: Category,
    pub image_url: &'static str,
}

impl Theme {
    pub fn id(&self) -> &'static str {
        self.category.as_str()
    }

    pub fn name(&self) -> &'static str {
        self.category.title()
    }
}

pub const THEMES: [Theme; 4] = [
    Theme {
        category: Category::Beauty,
        image_url: "https://images.unsplash.com/photo-1570172619644-dfd03ed5d881?auto=format&fit=crop&w=800&q=80",
    },
    Theme {
        category: Category::Nightlife,
        image_url: "https://images.unsplash.com/photo-1538485399081-7191377e8241?auto=format&fit=crop&w=800&q=80",
    },
    Theme {
        category: Category::Religious,
        image_url: "https://images.unsplash.com/photo-1583486334584-c946f3a39df9?auto=format&fit=crop&w=800&q=80",
    },
    Theme {
        category: Category::Dmz,
        image_url: "https://images.unsplash.com/photo-1596426463945-8463e2601264?auto=format&fit=crop&w=800&q=80",
    },
];

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub user: Option<User>,
    pub themes: &'static [Theme],
    pub promotion: Vec<TourPackage>,
    pub trending: Vec<TourPackage>,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// Newest four packages, newest first.
pub fn trending(products: &[TourPackage]) -> Vec<TourPackage> {
    products.iter().rev().take(4).cloned().collect()
}

pub async fn index(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Html<HomeTemplate>> {
    let products = state.catalog.list()?;
    let trending = trending(&products);

    Ok(Html(HomeTemplate {
        user,
        themes: &THEMES,
        promotion: products,
        trending,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::default_packages;

    #[test]
    fn trending_is_last_four_reversed() {
        let ids: Vec<String> = trending(&default_packages())
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["6", "5", "4", "3"]);
    }

    #[test]
    fn trending_handles_short_catalogs() {
        let mut few = default_packages();
        few.truncate(2);
        assert_eq!(trending(&few).len(), 2);
        assert!(trending(&[]).is_empty());
    }

    #[test]
    fn themes_cover_the_four_named_categories() {
        let ids: Vec<&str> = THEMES.iter().map(Theme::id).collect();
        assert_eq!(ids, vec!["beauty", "nightlife", "religious", "dmz"]);
        assert_eq!(THEMES[3].name(), "DMZ Tours");
    }
}
