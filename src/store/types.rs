//! Evidence store record types.

use serde::{Deserialize, Serialize};

/// A research subject. Names are stored as given; matching is
/// case-insensitive substring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subject {
    /// Row id.
    pub id: i64,
    /// Subject name as first recorded.
    pub name: String,
    /// Known aliases, free text.
    pub aliases: Option<String>,
    /// Free-form researcher notes.
    pub notes: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-touched timestamp.
    pub updated_at: String,
}

/// A discovered account linked to a subject.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    /// Row id.
    pub id: i64,
    /// Owning subject.
    pub subject_id: i64,
    /// Lowercase platform tag.
    pub platform: String,
    /// Username on the platform.
    pub username: String,
    /// Canonical profile URL.
    pub profile_url: Option<String>,
    /// Display name, when known.
    pub display_name: Option<String>,
    /// Bio text, when known.
    pub bio: Option<String>,
    /// Follower count as the platform reports it, free text.
    pub followers: Option<String>,
    /// Whether the platform marks the account verified.
    pub verified: bool,
    /// Free-form researcher notes.
    pub notes: Option<String>,
    /// RFC 3339 discovery timestamp.
    pub discovered_at: String,
}

/// A recorded fact about a subject.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fact {
    /// Row id.
    pub id: i64,
    /// Owning subject.
    pub subject_id: i64,
    /// Fact category.
    pub category: FactCategory,
    /// The fact itself.
    pub content: String,
    /// Where the fact came from. Facts without a source stay visibly
    /// unsourced in the dossier.
    pub source_url: Option<String>,
    /// Researcher's confidence in the fact.
    pub confidence: Confidence,
    /// RFC 3339 recording timestamp.
    pub recorded_at: String,
}

/// Fixed fact taxonomy. Dossier sections follow this declaration order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FactCategory {
    /// Personal details.
    Personal,
    /// Career and employment.
    Professional,
    /// Schools and degrees.
    Education,
    /// Emails, phones, handles.
    Contact,
    /// Places lived or worked.
    Location,
    /// Hobbies and topics.
    Interests,
    /// Known associates.
    Connections,
    /// Everything else.
    Other,
}

impl FactCategory {
    /// All categories in dossier section order.
    pub const ALL: [Self; 8] = [
        Self::Personal,
        Self::Professional,
        Self::Education,
        Self::Contact,
        Self::Location,
        Self::Interests,
        Self::Connections,
        Self::Other,
    ];

    /// Lowercase tag used in storage and tool input.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Professional => "professional",
            Self::Education => "education",
            Self::Contact => "contact",
            Self::Location => "location",
            Self::Interests => "interests",
            Self::Connections => "connections",
            Self::Other => "other",
        }
    }

    /// Parse a tag, case-insensitively. Unknown tags are rejected rather
    /// than folded into `Other` so callers get told about typos.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let wanted = tag.trim().to_lowercase();
        Self::ALL.iter().copied().find(|c| c.as_str() == wanted)
    }

    /// Comma-joined tag list, for error messages.
    #[must_use]
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Capitalized section heading for dossier output.
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Professional => "Professional",
            Self::Education => "Education",
            Self::Contact => "Contact",
            Self::Location => "Location",
            Self::Interests => "Interests",
            Self::Connections => "Connections",
            Self::Other => "Other",
        }
    }
}

/// Researcher confidence in a fact. Ordering is semantic, not lexical:
/// high outranks medium outranks low.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    /// Unverified or single weak source.
    Low,
    /// Plausible, single decent source.
    #[default]
    Medium,
    /// Corroborated or self-reported by the subject.
    High,
}

impl Confidence {
    /// Lowercase tag used in storage and tool input.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a tag, case-insensitively.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Sort rank, highest confidence first.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in FactCategory::ALL {
            assert_eq!(FactCategory::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_category_rejects_unknown() {
        assert_eq!(FactCategory::parse("astrology"), None);
        assert_eq!(FactCategory::parse("  PERSONAL "), Some(FactCategory::Personal));
    }

    #[test]
    fn test_confidence_rank_order() {
        assert!(Confidence::High.rank() < Confidence::Medium.rank());
        assert!(Confidence::Medium.rank() < Confidence::Low.rank());
    }

    #[test]
    fn test_confidence_default_is_medium() {
        assert_eq!(Confidence::default(), Confidence::Medium);
    }
}
