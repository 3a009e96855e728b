//! Expense categories
//!
//! The category set is fixed. Stored values that don't match a known id
//! resolve to [`Category::Other`] rather than failing, so older or hand-edited
//! data still loads and groups somewhere sensible.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Health,
    Education,
    Shopping,
    Services,
    #[default]
    Other,
}

impl Category {
    /// Every category, in menu order
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Health,
        Category::Education,
        Category::Shopping,
        Category::Services,
        Category::Other,
    ];

    /// Stable identifier used in storage and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Education => "education",
            Self::Shopping => "shopping",
            Self::Services => "services",
            Self::Other => "other",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Shopping => "Shopping",
            Self::Services => "Services",
            Self::Other => "Other",
        }
    }

    /// Hex colour for charts
    pub fn color(&self) -> &'static str {
        match self {
            Self::Food => "#e74c3c",
            Self::Transport => "#3498db",
            Self::Entertainment => "#9b59b6",
            Self::Health => "#27ae60",
            Self::Education => "#f39c12",
            Self::Shopping => "#e67e22",
            Self::Services => "#34495e",
            Self::Other => "#95a5a6",
        }
    }

    /// Resolve a stored value, falling back to `Other`
    pub fn resolve(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Other)
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let category = match key.as_str() {
            "food" | "alimentacion" | "alimentación" => Self::Food,
            "transport" | "transporte" => Self::Transport,
            "entertainment" | "entretenimiento" => Self::Entertainment,
            "health" | "salud" => Self::Health,
            "education" | "educacion" | "educación" => Self::Education,
            "shopping" | "compras" => Self::Shopping,
            "services" | "servicios" => Self::Services,
            "other" | "otros" => Self::Other,
            _ => return Err(UnknownCategory(s.to_string())),
        };
        Ok(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Category::resolve).unwrap_or_default())
    }
}

/// Returned when text names no known category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = Category::ALL.iter().map(|c| c.id()).collect();
        write!(
            f,
            "Unknown category '{}'. Expected one of: {}",
            self.0,
            ids.join(", ")
        )
    }
}

impl std::error::Error for UnknownCategory {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_and_legacy_ids() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(" Transport ".parse::<Category>().unwrap(), Category::Transport);
        assert_eq!("alimentacion".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("otros".parse::<Category>().unwrap(), Category::Other);
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_resolve_falls_back_to_other() {
        assert_eq!(Category::resolve("mystery"), Category::Other);
        assert_eq!(Category::resolve(""), Category::Other);
        assert_eq!(Category::resolve("health"), Category::Health);
    }

    #[test]
    fn test_serde_uses_ids_and_is_lenient() {
        assert_eq!(serde_json::to_string(&Category::Shopping).unwrap(), "\"shopping\"");
        let unknown: Category = serde_json::from_str("\"crypto\"").unwrap();
        assert_eq!(unknown, Category::Other);
        let null: Category = serde_json::from_str("null").unwrap();
        assert_eq!(null, Category::Other);
    }

    #[test]
    fn test_every_category_has_label_and_unique_id() {
        let mut ids: Vec<&str> = Category::ALL.iter().map(|c| c.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), Category::ALL.len());
        assert!(Category::ALL.iter().all(|c| !c.label().is_empty()));
    }
}
