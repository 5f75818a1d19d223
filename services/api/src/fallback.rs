//! Static reference data served when the store is unreachable
//!
//! Read paths (catalog, watchlist list, profile list) degrade to this data
//! with a `fallback: true` marker instead of surfacing a store failure.
//! This is the single source of fallback content; no route embeds its own
//! copies. The in-memory catalog filter applies the same predicates as the
//! store query.

use chrono::Utc;
use uuid::Uuid;

use crate::models::movie::{CatalogQuery, Category, Movie};
use crate::models::profile::{DEFAULT_AVATAR, Profile};

/// Provider of substitute records for degraded read paths
pub struct ReferenceData {
    catalog: Vec<Movie>,
}

impl ReferenceData {
    pub fn new() -> Self {
        ReferenceData {
            catalog: static_catalog(),
        }
    }

    /// The full static catalog
    pub fn catalog(&self) -> &[Movie] {
        &self.catalog
    }

    /// Substitute watchlist content
    pub fn watchlist(&self) -> Vec<Movie> {
        // The Shawshank Redemption, then Inception
        vec![self.catalog[7].clone(), self.catalog[0].clone()]
    }

    /// Substitute profile set for a user
    pub fn profiles(&self, user_id: Uuid) -> Vec<Profile> {
        let now = Utc::now();
        vec![
            Profile {
                id: Uuid::from_u128(1),
                user_id,
                name: "Main Profile".to_string(),
                avatar: DEFAULT_AVATAR.to_string(),
                is_kid: false,
                created_at: now,
                updated_at: now,
            },
            Profile {
                id: Uuid::from_u128(2),
                user_id,
                name: "Kids".to_string(),
                avatar: DEFAULT_AVATAR.to_string(),
                is_kid: true,
                created_at: now,
                updated_at: now,
            },
        ]
    }

    /// Filter and paginate the static catalog with the store-path predicates
    ///
    /// The `new` category is a no-op here: the static records carry no
    /// release date, and an empty fallback would defeat its purpose.
    pub fn search(&self, query: &CatalogQuery) -> (Vec<Movie>, i64) {
        let mut movies: Vec<Movie> = self.catalog.clone();

        match query.category {
            Some(Category::Trending) => movies.retain(|m| m.trending),
            Some(Category::Popular) => movies.retain(|m| m.popularity > 70),
            Some(Category::Top10) => {
                movies.retain(|m| m.popularity > 85);
                movies.sort_by(|a, b| b.popularity.cmp(&a.popularity));
            }
            Some(Category::New) | None => {}
        }

        if let Some(genre) = &query.genre {
            movies.retain(|m| m.genres.iter().any(|g| g.eq_ignore_ascii_case(genre)));
        }

        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            movies.retain(|m| {
                m.title.to_lowercase().contains(&needle)
                    || m.description.to_lowercase().contains(&needle)
                    || m.cast_members
                        .iter()
                        .any(|c| c.to_lowercase().contains(&needle))
            });
        }

        let total = movies.len() as i64;
        let movies = movies
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        (movies, total)
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::too_many_arguments)]
fn movie(
    id: u128,
    title: &str,
    description: &str,
    thumbnail_url: &str,
    video_url: &str,
    genres: &[&str],
    release_year: &str,
    maturity_rating: &str,
    duration: &str,
    cast: &[&str],
    trending: bool,
    popularity: i32,
) -> Movie {
    Movie {
        id: Uuid::from_u128(id),
        title: title.to_string(),
        description: description.to_string(),
        thumbnail_url: thumbnail_url.to_string(),
        video_url: video_url.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        release_year: release_year.to_string(),
        maturity_rating: maturity_rating.to_string(),
        duration: duration.to_string(),
        cast_members: cast.iter().map(|c| c.to_string()).collect(),
        trending,
        popularity,
        release_date: None,
    }
}

fn static_catalog() -> Vec<Movie> {
    vec![
        movie(
            1,
            "Inception",
            "A thief who steals corporate secrets through dream-sharing technology is given the task of planting an idea into the mind of a C.E.O.",
            "https://image.tmdb.org/t/p/w500/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
            &["Action", "Sci-Fi", "Thriller"],
            "2010",
            "PG-13",
            "2h 28m",
            &["Leonardo DiCaprio", "Joseph Gordon-Levitt"],
            true,
            95,
        ),
        movie(
            2,
            "The Dark Knight",
            "When the menace known as the Joker wreaks havoc on Gotham City, Batman must accept one of the greatest psychological tests of his ability to fight injustice.",
            "https://image.tmdb.org/t/p/w500/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
            &["Action", "Crime", "Drama"],
            "2008",
            "PG-13",
            "2h 32m",
            &["Christian Bale", "Heath Ledger"],
            true,
            94,
        ),
        movie(
            3,
            "Interstellar",
            "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival.",
            "https://image.tmdb.org/t/p/w500/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/TearsOfSteel.mp4",
            &["Adventure", "Drama", "Sci-Fi"],
            "2014",
            "PG-13",
            "2h 49m",
            &["Matthew McConaughey", "Anne Hathaway"],
            true,
            93,
        ),
        movie(
            4,
            "Dune",
            "Feature adaptation of Frank Herbert's science fiction novel about the son of a noble family trying to avenge his father's death.",
            "https://image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/Sintel.mp4",
            &["Action", "Adventure", "Drama"],
            "2021",
            "PG-13",
            "2h 35m",
            &["Timothée Chalamet", "Rebecca Ferguson"],
            true,
            92,
        ),
        movie(
            5,
            "The Matrix",
            "A computer hacker learns about the true nature of reality and his role in the war against its controllers.",
            "https://image.tmdb.org/t/p/w500/dXNAPwY7VrqMAo51EKhhCJfaGb5.jpg",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
            &["Action", "Sci-Fi"],
            "1999",
            "R",
            "2h 16m",
            &["Keanu Reeves", "Laurence Fishburne"],
            true,
            91,
        ),
        movie(
            6,
            "Avatar",
            "A paraplegic Marine dispatched to the moon Pandora on a unique mission becomes torn between following his orders and protecting the world he feels is his home.",
            "https://image.tmdb.org/t/p/w500/jRXYjXNq0Cs2TcJjLkki24MLp7u.jpg",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
            &["Action", "Adventure", "Fantasy"],
            "2009",
            "PG-13",
            "2h 42m",
            &["Sam Worthington", "Zoe Saldana"],
            false,
            89,
        ),
        movie(
            7,
            "Pulp Fiction",
            "The lives of two mob hitmen, a boxer, a gangster and his wife, and a pair of diner bandits intertwine in four tales of violence and redemption.",
            "https://image.tmdb.org/t/p/w500/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/TearsOfSteel.mp4",
            &["Crime", "Drama"],
            "1994",
            "R",
            "2h 34m",
            &["John Travolta", "Uma Thurman"],
            false,
            85,
        ),
        movie(
            8,
            "The Shawshank Redemption",
            "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
            "https://image.tmdb.org/t/p/w500/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/Sintel.mp4",
            &["Drama"],
            "1994",
            "R",
            "2h 22m",
            &["Tim Robbins", "Morgan Freeman"],
            false,
            88,
        ),
        movie(
            9,
            "The Godfather",
            "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.",
            "https://image.tmdb.org/t/p/w500/3bhkrj58Vtu7enYsRolD1fZdja1.jpg",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
            &["Crime", "Drama"],
            "1972",
            "R",
            "2h 55m",
            &["Marlon Brando", "Al Pacino"],
            false,
            87,
        ),
        movie(
            10,
            "Fight Club",
            "An insomniac office worker and a devil-may-care soapmaker form an underground fight club that evolves into something much, much more.",
            "https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
            &["Drama"],
            "1999",
            "R",
            "2h 19m",
            &["Brad Pitt", "Edward Norton"],
            false,
            86,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::MovieQuery;

    fn query(params: MovieQuery) -> CatalogQuery {
        CatalogQuery::from_params(&params)
    }

    #[test]
    fn test_catalog_is_non_empty() {
        let data = ReferenceData::new();
        assert_eq!(data.catalog().len(), 10);
    }

    #[test]
    fn test_unfiltered_search_pages() {
        let data = ReferenceData::new();

        let (page_one, total) = data.search(&query(MovieQuery {
            limit: Some(3),
            ..Default::default()
        }));
        let (page_two, _) = data.search(&query(MovieQuery {
            limit: Some(3),
            page: Some(2),
            ..Default::default()
        }));

        assert_eq!(total, 10);
        assert_eq!(page_one.len(), 3);
        assert_eq!(page_two.len(), 3);
        assert_ne!(page_one[0].id, page_two[0].id);
    }

    #[test]
    fn test_trending_filter() {
        let data = ReferenceData::new();
        let (movies, total) = data.search(&query(MovieQuery {
            category: Some("trending".to_string()),
            limit: Some(5),
            ..Default::default()
        }));

        assert_eq!(total, 5);
        assert_eq!(movies.len(), 5);
        assert!(movies.iter().all(|m| m.trending));
    }

    #[test]
    fn test_top10_sorted_and_capped() {
        let data = ReferenceData::new();
        let (movies, _) = data.search(&query(MovieQuery {
            category: Some("top10".to_string()),
            limit: Some(50),
            ..Default::default()
        }));

        assert!(movies.len() <= 10);
        assert!(movies.iter().all(|m| m.popularity > 85));
        assert!(movies.windows(2).all(|w| w[0].popularity >= w[1].popularity));
    }

    #[test]
    fn test_search_matches_cast() {
        let data = ReferenceData::new();
        let (movies, _) = data.search(&query(MovieQuery {
            search: Some("freeman".to_string()),
            ..Default::default()
        }));

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "The Shawshank Redemption");
    }

    #[test]
    fn test_genre_filter_ignores_case() {
        let data = ReferenceData::new();
        let (movies, _) = data.search(&query(MovieQuery {
            genre: Some("sci-fi".to_string()),
            ..Default::default()
        }));

        assert!(!movies.is_empty());
        assert!(
            movies
                .iter()
                .all(|m| m.genres.iter().any(|g| g.eq_ignore_ascii_case("sci-fi")))
        );
    }

    #[test]
    fn test_watchlist_draws_from_catalog() {
        let data = ReferenceData::new();
        let watchlist = data.watchlist();

        assert_eq!(watchlist.len(), 2);
        assert_eq!(watchlist[0].title, "The Shawshank Redemption");
        assert_eq!(watchlist[1].title, "Inception");
    }

    #[test]
    fn test_profiles_shape() {
        let data = ReferenceData::new();
        let user_id = Uuid::new_v4();
        let profiles = data.profiles(user_id);

        assert_eq!(profiles.len(), 2);
        assert!(profiles.iter().all(|p| p.user_id == user_id));
        assert!(!profiles[0].is_kid);
        assert!(profiles[1].is_kid);
    }
}
