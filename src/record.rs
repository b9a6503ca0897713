use serde::{Deserialize, Serialize};

/// Identifier assigned by the record store. Stores may hand out strings or numbers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum ArtworkId {
    Integer(i64),
    Text(String),
}

impl std::fmt::Display for ArtworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtworkId::Integer(id) => write!(f, "{id}"),
            ArtworkId::Text(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ArtworkRecord {
    pub id: ArtworkId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_data: String,
}

/// A record as sent to the store, before it has an id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewArtwork {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub tags: Vec<String>,
    pub image_data: String,
}

impl NewArtwork {
    pub fn with_id(self, id: ArtworkId) -> ArtworkRecord {
        ArtworkRecord {
            id,
            title: self.title,
            description: self.description,
            artist: self.artist,
            tags: self.tags,
            image_data: self.image_data,
        }
    }
}

/// Uncommitted field values of the uploader. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDraft {
    pub title: String,
    pub description: String,
    pub artist: String,
    pub tags_raw: String,
    pub image_data: String,
}

impl UploadDraft {
    pub fn is_submittable(&self) -> bool {
        !self.title.is_empty() && !self.image_data.is_empty()
    }

    pub fn to_new_artwork(&self) -> NewArtwork {
        NewArtwork {
            title: self.title.clone(),
            description: non_empty(&self.description),
            artist: non_empty(&self.artist),
            tags: parse_tags(&self.tags_raw),
            image_data: self.image_data.clone(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_owned())
}

/// Splits comma separated tags, trimming each one and dropping blanks.
/// Order is kept and duplicates stay.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_trims_and_drops_blanks() {
        assert_eq!(
            parse_tags(" pottery, , hand-made ,ceramic"),
            vec!["pottery", "hand-made", "ceramic"]
        );
    }

    #[test]
    fn test_parse_tags_keeps_duplicates() {
        assert_eq!(parse_tags("a, b, a"), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_parse_tags_empty_input() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" ,  ,").is_empty());
    }

    #[test]
    fn test_parse_tags_inner_whitespace_kept() {
        assert_eq!(parse_tags("blue glaze,  raku "), vec!["blue glaze", "raku"]);
    }

    #[test]
    fn test_new_artwork_omits_blank_optionals() {
        let draft = UploadDraft {
            title: "Blue Vase".into(),
            image_data: "data:image/png;base64,AAAA".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(draft.to_new_artwork()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Blue Vase",
                "tags": [],
                "image_data": "data:image/png;base64,AAAA",
            })
        );
    }

    #[test]
    fn test_new_artwork_carries_optionals() {
        let draft = UploadDraft {
            title: "Jug".into(),
            description: "Salt-fired".into(),
            artist: "M. Leach".into(),
            tags_raw: "jug".into(),
            image_data: "data:image/jpeg;base64,/9j/".into(),
        };
        let artwork = draft.to_new_artwork();
        assert_eq!(artwork.description.as_deref(), Some("Salt-fired"));
        assert_eq!(artwork.artist.as_deref(), Some("M. Leach"));
        assert_eq!(artwork.tags, vec!["jug"]);
    }

    #[test]
    fn test_submittable_requires_title_and_image() {
        let mut draft = UploadDraft::default();
        assert!(!draft.is_submittable());
        draft.title = "Bowl".into();
        assert!(!draft.is_submittable());
        draft.image_data = "data:image/png;base64,".into();
        assert!(draft.is_submittable());
        draft.title.clear();
        assert!(!draft.is_submittable());
    }

    #[test]
    fn test_record_accepts_numeric_and_text_ids() {
        let records: Vec<ArtworkRecord> = serde_json::from_value(serde_json::json!([
            { "id": 7, "title": "Plate", "tags": ["slip"], "image_data": "data:," },
            { "id": "6553f1", "title": "Cup", "image_data": "data:," },
        ]))
        .unwrap();
        assert_eq!(records[0].id, ArtworkId::Integer(7));
        assert_eq!(records[1].id.to_string(), "6553f1");
        assert!(records[1].tags.is_empty());
        assert_eq!(records[1].artist, None);
    }
}
