use askama::Template;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;

use crate::auth::User;
use crate::catalog::{Category, TourPackage};
use crate::error::AppResult;
use crate::extractors::MaybeUser;
use crate::render::{self, ProductView};
use crate::routes::home::Html;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/category.html")]
pub struct CategoryTemplate {
    pub user: Option<User>,
    pub title: String,
    pub products: Vec<TourPackage>,
}

#[derive(Template)]
#[template(path = "pages/product.html")]
pub struct ProductTemplate {
    pub user: Option<User>,
    pub view: ProductView,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/category/{id}", get(category))
        .route("/product/{id}", get(product))
}

/// Display title for a category id. Unknown ids are shown capitalised.
pub fn category_title(id: &str) -> String {
    if let Some(category) = Category::parse(id) {
        return category.title().to_string();
    }
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn category(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Html<CategoryTemplate>> {
    let products = state.catalog.list_by_category(&id)?;
    Ok(Html(CategoryTemplate {
        user,
        title: category_title(&id),
        products,
    }))
}

pub async fn product(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(package) = state.catalog.get_by_id(&id)? else {
        tracing::debug!("Unknown product {}, redirecting home", id);
        return Ok(Redirect::to("/").into_response());
    };

    let view = render::product_view(&package, false);
    Ok(Html(ProductTemplate { user, view }).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_use_their_titles() {
        assert_eq!(category_title("beauty"), "Beauty & Wellness");
        assert_eq!(category_title("general"), "General Tours");
    }

    #[test]
    fn unknown_categories_are_capitalised() {
        assert_eq!(category_title("food"), "Food");
        assert_eq!(category_title(""), "");
    }
}
