//! Movie catalog models and query types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Movie catalog record
///
/// Read-only from the user-collection subsystem; only the admin create
/// path mutates the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub genres: Vec<String>,
    pub release_year: String,
    pub maturity_rating: String,
    pub duration: String,
    #[serde(rename = "cast")]
    pub cast_members: Vec<String>,
    pub trending: bool,
    pub popularity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<DateTime<Utc>>,
}

/// Catalog category filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Trending,
    New,
    Popular,
    Top10,
}

impl Category {
    /// Parse a category query parameter; unknown values mean "no filter"
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "trending" => Some(Category::Trending),
            "new" => Some(Category::New),
            "popular" => Some(Category::Popular),
            "top10" => Some(Category::Top10),
            _ => None,
        }
    }
}

/// Raw query parameters for the catalog endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieQuery {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub search: Option<String>,
}

/// Normalized catalog query, shared by the store and fallback paths
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub category: Option<Category>,
    pub genre: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl CatalogQuery {
    /// Normalize raw query parameters
    ///
    /// Pages are 1-based, the limit is clamped to 1..=100, and the top10
    /// category caps the window at 10 items.
    pub fn from_params(params: &MovieQuery) -> Self {
        let category = params.category.as_deref().and_then(Category::parse);
        let page = params.page.unwrap_or(1).max(1);
        let mut limit = params.limit.unwrap_or(20).clamp(1, 100);
        if category == Some(Category::Top10) {
            limit = limit.min(10);
        }

        CatalogQuery {
            category,
            genre: params.genre.clone().filter(|g| !g.is_empty()),
            search: params.search.clone().filter(|s| !s.is_empty()),
            page,
            limit,
        }
    }

    /// Number of rows skipped by the requested page
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

/// Pagination block attached to catalog responses
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

impl Pagination {
    /// Build pagination info; `pages` is the total count rounded up
    pub fn new(total: i64, page: u32, limit: u32) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            ((total + limit as i64 - 1) / limit as i64) as u32
        };

        Pagination {
            total,
            page,
            limit,
            pages,
        }
    }
}

/// Response for the catalog listing endpoint
#[derive(Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

/// Request for the admin movie create endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub release_year: Option<String>,
    pub maturity_rating: Option<String>,
    pub duration: Option<String>,
    #[serde(rename = "cast")]
    pub cast_members: Option<Vec<String>>,
    pub popularity: Option<i32>,
    pub trending: Option<bool>,
    pub release_date: Option<DateTime<Utc>>,
}

/// Validated movie create payload
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub genres: Vec<String>,
    pub release_year: String,
    pub maturity_rating: String,
    pub duration: String,
    pub cast_members: Vec<String>,
    pub popularity: i32,
    pub trending: bool,
    pub release_date: Option<DateTime<Utc>>,
}

impl CreateMovieRequest {
    /// Check required fields and apply defaults
    pub fn validate(self) -> Result<NewMovie, String> {
        fn required<T>(value: Option<T>, field: &str) -> Result<T, String> {
            value.ok_or_else(|| format!("Missing required field: {}", field))
        }

        let title = required(self.title.filter(|s| !s.is_empty()), "title")?;
        let description = required(self.description.filter(|s| !s.is_empty()), "description")?;
        let thumbnail_url = required(self.thumbnail_url.filter(|s| !s.is_empty()), "thumbnailUrl")?;
        let video_url = required(self.video_url.filter(|s| !s.is_empty()), "videoUrl")?;
        let genres = required(self.genres.filter(|g| !g.is_empty()), "genres")?;
        let release_year = required(self.release_year.filter(|s| !s.is_empty()), "releaseYear")?;
        let maturity_rating = required(
            self.maturity_rating.filter(|s| !s.is_empty()),
            "maturityRating",
        )?;
        let duration = required(self.duration.filter(|s| !s.is_empty()), "duration")?;

        Ok(NewMovie {
            title,
            description,
            thumbnail_url,
            video_url,
            genres,
            release_year,
            maturity_rating,
            duration,
            cast_members: self.cast_members.unwrap_or_default(),
            popularity: self.popularity.unwrap_or(50),
            trending: self.trending.unwrap_or(false),
            release_date: self.release_date,
        })
    }
}
