//! Types for metadata provider responses.

use serde::{Deserialize, Serialize};

/// A movie from a metadata search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    /// External (TMDB) movie ID.
    pub id: u32,
    /// Movie title.
    pub title: String,
    /// Original title (in original language).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Overview/synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Poster path (relative to the provider's image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

impl MovieSummary {
    /// Release year parsed out of the release date.
    pub fn year(&self) -> Option<i32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }
}

/// Full movie details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    /// External (TMDB) movie ID.
    pub id: u32,
    /// Movie title.
    pub title: String,
    /// Original title (in original language).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    /// Overview/synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Poster path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Genre names.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
    /// Number of votes behind the average.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u32>,
    /// IMDB identifier, when the provider knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
}

impl MovieDetails {
    /// Release year parsed out of the release date.
    pub fn year(&self) -> Option<i32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_year() {
        let movie = MovieSummary {
            id: 603,
            title: "The Matrix".to_string(),
            original_title: None,
            release_date: Some("1999-03-30".to_string()),
            overview: None,
            poster_path: None,
        };
        assert_eq!(movie.year(), Some(1999));
    }

    #[test]
    fn test_summary_year_missing_or_malformed() {
        let mut movie = MovieSummary {
            id: 603,
            title: "The Matrix".to_string(),
            original_title: None,
            release_date: None,
            overview: None,
            poster_path: None,
        };
        assert_eq!(movie.year(), None);

        movie.release_date = Some("unknown".to_string());
        assert_eq!(movie.year(), None);
    }
}
