//! Generated preview content

use serde::{Deserialize, Serialize};

/// A recommendation returned instead of free text (e.g. a nearby specialist)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCard {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Body of a generated preview
///
/// On the wire this is either a JSON string or a JSON array of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentBody {
    Text(String),
    Cards(Vec<RecommendationCard>),
}

impl ContentBody {
    /// Returns true for a text body
    pub fn is_text(&self) -> bool {
        matches!(self, ContentBody::Text(_))
    }

    /// Returns the text, if this is a text body
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBody::Text(text) => Some(text),
            ContentBody::Cards(_) => None,
        }
    }

    /// Returns the cards, if this is a card list
    pub fn cards(&self) -> Option<&[RecommendationCard]> {
        match self {
            ContentBody::Cards(cards) => Some(cards),
            ContentBody::Text(_) => None,
        }
    }
}

/// The preview artifact produced for a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// Label such as "Email Draft" or "Nearby Specialists"
    #[serde(rename = "type")]
    pub content_type: String,
    /// Text blob or card list
    pub content: ContentBody,
}

impl GeneratedContent {
    /// Creates a text preview
    pub fn text(content_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            content: ContentBody::Text(text.into()),
        }
    }

    /// Creates a card-list preview
    pub fn cards(content_type: impl Into<String>, cards: Vec<RecommendationCard>) -> Self {
        Self {
            content_type: content_type.into(),
            content: ContentBody::Cards(cards),
        }
    }

    /// Returns true when the preview gets an editable text buffer
    pub fn is_editable(&self) -> bool {
        self.content.is_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_content() {
        let json = r#"{"type": "Email", "content": "Dear Dr Smith"}"#;
        let content: GeneratedContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.content_type, "Email");
        assert_eq!(content.content.as_text(), Some("Dear Dr Smith"));
        assert!(content.is_editable());
    }

    #[test]
    fn test_decode_card_content() {
        let json = r#"{
            "type": "Nearby Specialists",
            "content": [
                {"title": "Melbourne Heart Group", "description": "Cardiology", "link": "https://example.com/mhg"},
                {"title": "Eastern Cardiology", "description": "Cardiac rehab"}
            ]
        }"#;
        let content: GeneratedContent = serde_json::from_str(json).unwrap();
        let cards = content.content.cards().unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].link, None);
        assert!(!content.is_editable());
    }

    #[test]
    fn test_card_without_link_omits_field() {
        let card = RecommendationCard {
            title: "Clinic".to_string(),
            description: "Physio".to_string(),
            link: None,
        };
        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("link").is_none());
    }

    #[test]
    fn test_object_content_is_rejected() {
        let json = r#"{"type": "Order", "content": {"test_name": "FBC"}}"#;
        assert!(serde_json::from_str::<GeneratedContent>(json).is_err());
    }
}
