use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

/// What kind of material an item catalogues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Assignment,
    LectureNotes,
    Tutorial,
    Reference,
    AudioRecording,
    VideoTutorial,
    Paper,
    Textbook,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Assignment,
        Category::LectureNotes,
        Category::Tutorial,
        Category::Reference,
        Category::AudioRecording,
        Category::VideoTutorial,
        Category::Paper,
        Category::Textbook,
        Category::Other,
    ];

    /// Stable kebab-case key, used on the command line and as an import tag.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Assignment => "assignment",
            Category::LectureNotes => "lecture-notes",
            Category::Tutorial => "tutorial",
            Category::Reference => "reference",
            Category::AudioRecording => "audio-recording",
            Category::VideoTutorial => "video-tutorial",
            Category::Paper => "paper",
            Category::Textbook => "textbook",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Assignment => "Assignment",
            Category::LectureNotes => "Lecture Notes",
            Category::Tutorial => "Tutorial",
            Category::Reference => "Reference",
            Category::AudioRecording => "Audio Recording",
            Category::VideoTutorial => "Video Tutorial",
            Category::Paper => "Paper/Article",
            Category::Textbook => "Textbook",
            Category::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Classification derived from an item's file path. Never stored
/// independently of the path it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Text,
    Markdown,
    Pdf,
    Audio,
    Video,
    Unknown,
}

impl FileKind {
    pub fn from_path(path: Option<&str>) -> FileKind {
        let Some(path) = path else {
            return FileKind::Unknown;
        };
        let lower = path.to_lowercase();
        let ends_with_any =
            |suffixes: &[&str]| suffixes.iter().any(|suffix| lower.ends_with(suffix));

        if ends_with_any(&[".txt", ".rtf"]) {
            FileKind::Text
        } else if lower.ends_with(".md") {
            FileKind::Markdown
        } else if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else if ends_with_any(&[".mp3", ".wav", ".m4a", ".ogg", ".aac", ".flac"]) {
            FileKind::Audio
        } else if ends_with_any(&[".mp4", ".avi", ".mov", ".mkv", ".m4v", ".webm"]) {
            FileKind::Video
        } else {
            FileKind::Unknown
        }
    }
}

/// A catalogued entry in the library.
///
/// Identity and creation time are fixed at construction. Every other field
/// is reachable only through setters that keep the entry's own invariants:
/// the rating stays clamped to 1..=5, tags are stored lowercase and
/// trimmed, and the file kind is re-derived whenever the path changes.
/// Outside the crate, mutation happens only inside
/// [`Library::edit_item`](crate::library::Library::edit_item).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    id: Uuid,
    title: String,
    category: Category,
    tags: BTreeSet<String>,
    rating: u8,
    created_at: DateTime<Utc>,
    file_path: Option<String>,
    media_url: Option<String>,
    file_kind: FileKind,
}

impl Item {
    pub fn new(title: impl Into<String>, category: Category, file_path: Option<String>) -> Self {
        let file_path = file_path.filter(|p| !p.trim().is_empty());
        let file_kind = FileKind::from_path(file_path.as_deref());
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            category,
            tags: BTreeSet::new(),
            rating: 3,
            created_at: Utc::now(),
            file_path,
            media_url: None,
            file_kind,
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.add_tag(tag);
        self
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.set_rating(rating);
        self
    }

    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn add_tag(&mut self, tag: &str) {
        let tag = normalize_tag(tag);
        if !tag.is_empty() {
            self.tags.insert(tag);
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.remove(&normalize_tag(tag));
    }

    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.clear();
        for tag in tags {
            self.add_tag(tag.as_ref());
        }
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn set_rating(&mut self, rating: u8) {
        self.rating = rating.clamp(1, 5);
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: Option<String>) {
        self.file_path = path.filter(|p| !p.trim().is_empty());
        self.file_kind = FileKind::from_path(self.file_path.as_deref());
    }

    pub fn media_url(&self) -> Option<&str> {
        self.media_url.as_deref()
    }

    pub fn set_media_url(&mut self, url: Option<String>) {
        self.media_url = url.filter(|u| !u.trim().is_empty());
    }

    pub fn file_kind(&self) -> FileKind {
        self.file_kind
    }

    /// Everything the keyword index knows this item by: title tokens, the
    /// tag set, and tokens of the file-name component of the path.
    pub fn keywords(&self) -> BTreeSet<String> {
        let mut keywords = tokenize(&self.title);
        keywords.extend(self.tags.iter().cloned());
        if let Some(path) = self.file_path.as_deref() {
            if let Some(file_name) = Path::new(path).file_name() {
                keywords.extend(tokenize(&file_name.to_string_lossy()));
            }
        }
        keywords
    }

    /// Copies the mutable fields of `before` back onto this item. Identity
    /// and creation time are never touched; ignores a snapshot of some
    /// other item.
    pub(crate) fn restore_from(&mut self, before: &Item) {
        if before.id != self.id {
            return;
        }
        self.title = before.title.clone();
        self.category = before.category;
        self.tags = before.tags.clone();
        self.rating = before.rating.clamp(1, 5);
        self.file_path = before.file_path.clone();
        self.media_url = before.media_url.clone();
        self.file_kind = FileKind::from_path(self.file_path.as_deref());
    }
}

/// Task scheduling class. Feeds the urgency multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn multiplier(&self) -> f64 {
        match self {
            Priority::Urgent => 2.0,
            Priority::High => 1.5,
            Priority::Medium => 1.0,
            Priority::Low => 0.5,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

/// A follow-up chore attached to an item. Deleting the owning item deletes
/// its tasks with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    id: Uuid,
    item_id: Uuid,
    description: String,
    deadline: DateTime<Utc>,
    priority: Priority,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        item_id: Uuid,
        description: impl Into<String>,
        deadline: DateTime<Utc>,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            description: description.into(),
            deadline,
            priority,
            completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn item_id(&self) -> Uuid {
        self.item_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn set_deadline(&mut self, deadline: DateTime<Utc>) {
        self.deadline = deadline;
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_overdue(&self) -> bool {
        !self.completed && Utc::now() > self.deadline
    }

    /// Scheduling score, computed fresh on every call because it moves with
    /// the wall clock. Overdue tasks sit in the highest tier; far-off
    /// deadlines decay towards zero.
    pub fn urgency(&self) -> f64 {
        self.urgency_at(Utc::now())
    }

    pub(crate) fn urgency_at(&self, now: DateTime<Utc>) -> f64 {
        let hours = self.deadline.signed_duration_since(now).num_hours();

        let tier = if hours < 0 {
            1000.0
        } else if hours < 24 {
            500.0
        } else if hours < 72 {
            300.0
        } else if hours < 168 {
            150.0
        } else {
            100.0 / (hours as f64 / 24.0)
        };

        tier * self.priority.multiplier()
    }
}

pub(crate) fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Lowercase, split on runs of non-alphanumeric characters, keep tokens
/// longer than two characters.
pub(crate) fn tokenize(value: &str) -> BTreeSet<String> {
    value
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn rating_is_clamped_on_every_write() {
        let mut item = Item::new("Notes", Category::LectureNotes, None);
        assert_eq!(item.rating(), 3);

        item.set_rating(0);
        assert_eq!(item.rating(), 1);
        item.set_rating(9);
        assert_eq!(item.rating(), 5);
    }

    #[test]
    fn tags_are_normalized_and_blank_tags_rejected() {
        let mut item = Item::new("Notes", Category::LectureNotes, None);
        item.add_tag("  Algebra ");
        item.add_tag("ALGEBRA");
        item.add_tag("   ");

        assert_eq!(item.tags().len(), 1);
        assert!(item.tags().contains("algebra"));

        item.remove_tag(" Algebra");
        assert!(item.tags().is_empty());
    }

    #[test]
    fn file_kind_tracks_the_path() {
        let mut item = Item::new(
            "Lecture",
            Category::LectureNotes,
            Some("/notes/week1.md".into()),
        );
        assert_eq!(item.file_kind(), FileKind::Markdown);

        item.set_file_path(Some("/recordings/week1.mp3".into()));
        assert_eq!(item.file_kind(), FileKind::Audio);

        item.set_file_path(Some("   ".into()));
        assert_eq!(item.file_path(), None);
        assert_eq!(item.file_kind(), FileKind::Unknown);
    }

    #[test]
    fn tokenize_drops_short_tokens_and_punctuation() {
        let tokens = tokenize("Lecture 1: Intro to Graphs!");
        assert!(tokens.contains("lecture"));
        assert!(tokens.contains("intro"));
        assert!(tokens.contains("graphs"));
        assert!(!tokens.contains("1"));
        assert!(!tokens.contains("to"));
    }

    #[test]
    fn keywords_cover_title_tags_and_file_name() {
        let item = Item::new(
            "Week One",
            Category::LectureNotes,
            Some("/data/graph-theory.pdf".into()),
        )
        .with_tag("notes");

        let keywords = item.keywords();
        assert!(keywords.contains("week"));
        assert!(keywords.contains("one"));
        assert!(keywords.contains("notes"));
        assert!(keywords.contains("graph"));
        assert!(keywords.contains("theory"));
        assert!(keywords.contains("pdf"));
    }

    #[test]
    fn restore_from_keeps_identity_and_creation_time() {
        let mut item = Item::new("Before", Category::Paper, None).with_rating(2);
        let snapshot = item.clone();

        item.set_title("After");
        item.set_rating(5);
        item.set_file_path(Some("/papers/after.pdf".into()));

        item.restore_from(&snapshot);
        assert_eq!(item.id(), snapshot.id());
        assert_eq!(item.created_at(), snapshot.created_at());
        assert_eq!(item.title(), "Before");
        assert_eq!(item.rating(), 2);
        assert_eq!(item.file_path(), None);
        assert_eq!(item.file_kind(), FileKind::Unknown);
    }

    #[test]
    fn restore_from_ignores_a_foreign_snapshot() {
        let mut item = Item::new("Mine", Category::Other, None);
        let foreign = Item::new("Theirs", Category::Other, None);
        item.restore_from(&foreign);
        assert_eq!(item.title(), "Mine");
    }

    #[test]
    fn urgency_tiers() {
        let now = Utc::now();
        let item_id = Uuid::new_v4();
        let at = |hours: i64| now + Duration::hours(hours);

        let overdue = Task::new(item_id, "t", now - Duration::hours(1), Priority::Medium);
        assert_eq!(overdue.urgency_at(now), 1000.0);

        let soon = Task::new(item_id, "t", at(12), Priority::Medium);
        assert_eq!(soon.urgency_at(now), 500.0);

        let this_week = Task::new(item_id, "t", at(48), Priority::Medium);
        assert_eq!(this_week.urgency_at(now), 300.0);

        let next_week = Task::new(item_id, "t", at(100), Priority::Medium);
        assert_eq!(next_week.urgency_at(now), 150.0);

        let far = Task::new(item_id, "t", at(240), Priority::Medium);
        assert!((far.urgency_at(now) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn priority_scales_urgency() {
        let now = Utc::now();
        let item_id = Uuid::new_v4();
        let deadline = now + chrono::Duration::hours(12);

        let low = Task::new(item_id, "t", deadline, Priority::Low);
        let urgent = Task::new(item_id, "t", deadline, Priority::Urgent);
        assert_eq!(low.urgency_at(now), 250.0);
        assert_eq!(urgent.urgency_at(now), 1000.0);
        assert!(urgent.urgency_at(now) >= low.urgency_at(now));
    }

    #[test]
    fn overdue_beats_distant_deadlines() {
        let now = Utc::now();
        let item_id = Uuid::new_v4();

        let overdue = Task::new(
            item_id,
            "t",
            now - chrono::Duration::hours(1),
            Priority::Low,
        );
        let distant = Task::new(
            item_id,
            "t",
            now + chrono::Duration::hours(200),
            Priority::Urgent,
        );

        // 1000 * 0.5 = 500 against roughly (100 / (200/24)) * 2 = 24.
        assert!(overdue.urgency_at(now) > distant.urgency_at(now));
    }

    #[test]
    fn category_round_trips_through_its_key() {
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>().unwrap(), category);
        }
        assert!("surfing".parse::<Category>().is_err());
    }
}
