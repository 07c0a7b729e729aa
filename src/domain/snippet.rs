use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::common::{impl_entity, merge, new_entity_id, present, EntityId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SnippetLanguage {
    Javascript,
    Typescript,
    Python,
    Java,
    Csharp,
    Php,
    Ruby,
    Go,
    Rust,
    Swift,
    Kotlin,
    Html,
    Css,
    Scss,
    Sql,
    Bash,
    Powershell,
    Json,
    Yaml,
    Xml,
    Markdown,
    Text,
    Prompt,
}

/// A saved piece of code or prompt text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub language: SnippetLanguage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl_entity!(Snippet);

impl Snippet {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        language: SnippetLanguage,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_entity_id(),
            title: title.into(),
            content: content.into(),
            language,
            description: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            is_favorite: None,
        }
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite.unwrap_or(false)
    }

    /// Sample collection written on first use.
    pub fn samples() -> Vec<Snippet> {
        let stamp = |day: u32, hour: u32, minute: u32| {
            Utc.with_ymd_and_hms(2025, 1, day, hour, minute, 0)
                .single()
                .unwrap_or_default()
        };
        let sample = |id: &str,
                      title: &str,
                      language: SnippetLanguage,
                      description: &str,
                      tags: &[&str],
                      content: &str,
                      created: DateTime<Utc>,
                      favorite: bool| Snippet {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            language,
            description: Some(description.into()),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            created_at: created,
            updated_at: created,
            is_favorite: favorite.then_some(true),
        };

        vec![
            sample(
                "1",
                "React useState Hook",
                SnippetLanguage::Javascript,
                "Basic React useState hook example with counter",
                &["react", "hooks", "state", "counter"],
                "const [count, setCount] = useState(0);\n\
                 return <button onClick={() => setCount(count + 1)}>{count}</button>;",
                stamp(15, 10, 30),
                true,
            ),
            sample(
                "2",
                "Python List Comprehension",
                SnippetLanguage::Python,
                "Python list comprehension examples with conditions",
                &["python", "list-comprehension", "loops", "functional"],
                "squares = [x**2 for x in range(10)]\n\
                 even_squares = [x**2 for x in range(10) if x % 2 == 0]",
                stamp(14, 14, 22),
                false,
            ),
            sample(
                "3",
                "SQL Join Query",
                SnippetLanguage::Sql,
                "SQL query to get users with their latest posts",
                &["sql", "join", "query", "database"],
                "SELECT u.id, u.username, p.title\n\
                 FROM users u\n\
                 INNER JOIN posts p ON u.id = p.user_id\n\
                 ORDER BY p.created_at DESC\n\
                 LIMIT 10;",
                stamp(13, 9, 15),
                false,
            ),
            sample(
                "4",
                "Git Workflow Commands",
                SnippetLanguage::Bash,
                "Common Git workflow commands for feature development",
                &["git", "workflow", "version-control", "commands"],
                "git checkout -b feature/new-feature\n\
                 git commit -am \"Add new feature implementation\"\n\
                 git push -u origin feature/new-feature",
                stamp(12, 16, 45),
                false,
            ),
            sample(
                "5",
                "AI Prompt: Code Review",
                SnippetLanguage::Prompt,
                "AI prompt template for comprehensive code review",
                &["ai", "prompt", "code-review", "quality"],
                "Please review the following code for bugs, conventions, security,\n\
                 performance, maintainability and missing tests.\n\n\
                 [PASTE YOUR CODE HERE]",
                stamp(8, 17, 55),
                true,
            ),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<SnippetLanguage>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub is_favorite: Option<Option<bool>>,
}

impl SnippetPatch {
    pub fn apply(self, target: &mut Snippet) {
        merge(&mut target.title, self.title);
        merge(&mut target.content, self.content);
        merge(&mut target.language, self.language);
        merge(&mut target.description, self.description);
        merge(&mut target.tags, self.tags);
        merge(&mut target.is_favorite, self.is_favorite);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_have_unique_ids_and_two_favorites() {
        let samples = Snippet::samples();
        let mut ids: Vec<_> = samples.iter().map(|s| s.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), samples.len());
        assert_eq!(samples.iter().filter(|s| s.is_favorite()).count(), 2);
    }

    #[test]
    fn favorite_flag_is_omitted_when_unset() {
        let snippet = Snippet::samples().remove(1);
        let json = serde_json::to_value(&snippet).unwrap();
        assert!(json.get("isFavorite").is_none());
        assert_eq!(json["language"], "python");
    }
}
