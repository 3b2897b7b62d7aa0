use serde::{Deserialize, Serialize};

/// Runtime assumed when a catalog hit is picked, since search results
/// carry no per-episode duration we can rely on.
pub const DEFAULT_EPISODE_MINUTES: u32 = 24;

/// Envelope of `GET /anime` on Jikan v4.
#[derive(Debug, Deserialize)]
pub struct AnimeSearchResponse {
    #[serde(default)]
    pub data: Vec<AnimeEntry>,
}

/// The subset of a Jikan anime entry we read.
#[derive(Debug, Deserialize, Clone)]
pub struct AnimeEntry {
    pub mal_id: u32,
    pub title: String,
    pub episodes: Option<u32>,
    pub images: Option<AnimeImages>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnimeImages {
    pub jpg: Option<ImageSet>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageSet {
    pub image_url: Option<String>,
}

/// One autocomplete hit.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Suggestion {
    pub mal_id: u32,
    pub title: String,
    pub episodes: Option<u32>,
    pub image_url: Option<String>,
}

impl From<AnimeEntry> for Suggestion {
    fn from(entry: AnimeEntry) -> Self {
        let image_url = entry
            .images
            .and_then(|images| images.jpg)
            .and_then(|jpg| jpg.image_url);
        Self {
            mal_id: entry.mal_id,
            title: entry.title,
            episodes: entry.episodes,
            image_url,
        }
    }
}

/// Calculator inputs as the user has filled them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub name: String,
    pub episodes: i64,
    pub duration_per_episode: i64,
    pub image_url: Option<String>,
}

impl Suggestion {
    /// Fill the form from a picked hit. The episode count and default
    /// runtime are only taken when the catalog knows the episode count.
    pub fn apply_to_form(&self, form: &mut FormInput) {
        form.name = self.title.clone();
        form.image_url = self.image_url.clone();
        if let Some(episodes) = self.episodes {
            form.episodes = i64::from(episodes);
            form.duration_per_episode = i64::from(DEFAULT_EPISODE_MINUTES);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_search_response() {
        let json = json!({
            "pagination": { "has_next_page": false },
            "data": [
                {
                    "mal_id": 5114,
                    "title": "Fullmetal Alchemist: Brotherhood",
                    "episodes": 64,
                    "images": { "jpg": { "image_url": "https://cdn.example/fma.jpg" } },
                    "score": 9.1
                },
                {
                    "mal_id": 21,
                    "title": "One Piece",
                    "episodes": null,
                    "images": { "jpg": { "image_url": null } }
                }
            ]
        });

        let response: AnimeSearchResponse = serde_json::from_value(json).unwrap();
        let hits: Vec<Suggestion> = response.data.into_iter().map(Suggestion::from).collect();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].episodes, Some(64));
        assert_eq!(hits[0].image_url.as_deref(), Some("https://cdn.example/fma.jpg"));
        assert_eq!(hits[1].episodes, None);
        assert_eq!(hits[1].image_url, None);
    }

    #[test]
    fn test_missing_data_is_empty() {
        let response: AnimeSearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_apply_to_form_with_episodes() {
        let hit = Suggestion {
            mal_id: 5114,
            title: "Fullmetal Alchemist: Brotherhood".to_string(),
            episodes: Some(64),
            image_url: Some("img".to_string()),
        };
        let mut form = FormInput::default();
        hit.apply_to_form(&mut form);

        assert_eq!(form.name, "Fullmetal Alchemist: Brotherhood");
        assert_eq!(form.episodes, 64);
        assert_eq!(form.duration_per_episode, 24);
        assert_eq!(form.image_url.as_deref(), Some("img"));
    }

    #[test]
    fn test_apply_to_form_without_episodes_keeps_counts() {
        let hit = Suggestion {
            mal_id: 21,
            title: "One Piece".to_string(),
            episodes: None,
            image_url: None,
        };
        let mut form = FormInput {
            name: "one p".to_string(),
            episodes: 3,
            duration_per_episode: 20,
            image_url: None,
        };
        hit.apply_to_form(&mut form);

        assert_eq!(form.name, "One Piece");
        assert_eq!(form.episodes, 3);
        assert_eq!(form.duration_per_episode, 20);
    }
}
