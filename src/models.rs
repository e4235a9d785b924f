use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============ Difficulty Breakdown ============

/// Difficulty buckets used by the upstream problem catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    School,
    Basic,
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::School,
        Difficulty::Basic,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
    ];

    /// Case-insensitive match of an upstream label ("Easy", "MEDIUM", ...).
    /// Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "school" => Some(Difficulty::School),
            "basic" => Some(Difficulty::Basic),
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::School => "school",
            Difficulty::Basic => "basic",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Solved-problem counts per difficulty. Always carries all five keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemBreakdown {
    #[serde(default)]
    pub school: u64,
    #[serde(default)]
    pub basic: u64,
    #[serde(default)]
    pub easy: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub hard: u64,
}

impl ProblemBreakdown {
    pub fn get(&self, difficulty: Difficulty) -> u64 {
        match difficulty {
            Difficulty::School => self.school,
            Difficulty::Basic => self.basic,
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Adds to a bucket; upstream may split one difficulty across case variants.
    pub fn add(&mut self, difficulty: Difficulty, count: u64) {
        let slot = match difficulty {
            Difficulty::School => &mut self.school,
            Difficulty::Basic => &mut self.basic,
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        };
        *slot += count;
    }

    pub fn total(&self) -> u64 {
        Difficulty::ALL.iter().map(|d| self.get(*d)).sum()
    }
}

/// Outcome of the submissions API call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakdownResult {
    pub breakdown: ProblemBreakdown,
    /// Top-level `count` reported by the API, when present.
    pub total_count: Option<u64>,
    pub success: bool,
}

impl BreakdownResult {
    /// Zeroed breakdown flagged as unavailable.
    pub fn failed() -> Self {
        Self::default()
    }
}

// ============ Profile Record ============

/// Sentinel written in place of a missing institute rank.
pub const RANK_NOT_AVAILABLE: &str = "N/A";

/// Canonical profile returned by `GET /gfg/{username}`.
///
/// Every field has a default so the record is always fully populated. Text
/// fields use the empty string for "not found"; `institute_rank` serialises
/// as `"N/A"` when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileRecord {
    pub username: String,
    pub profile_url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub created_date: String,
    #[serde(default, with = "rank_or_sentinel")]
    #[schema(value_type = Object)]
    pub institute_rank: Option<u64>,
    #[serde(default)]
    pub overall_coding_score: u64,
    #[serde(default)]
    pub monthly_coding_score: u64,
    #[serde(default)]
    pub total_problems_solved: u64,
    #[serde(default)]
    pub pod_solved_current_streak: u64,
    #[serde(default)]
    pub pod_solved_longest_streak: u64,
    #[serde(default)]
    pub pod_solved_global_longest_streak: u64,
    #[serde(default)]
    pub pod_correct_submissions_count: u64,
    #[serde(default, alias = "campus_ambassador")]
    pub is_campus_ambassador: bool,
    #[serde(default)]
    pub problems_solved_breakdown: ProblemBreakdown,
    #[serde(default)]
    pub html_fetch_success: bool,
    #[serde(default)]
    pub api_fetch_success: bool,
}

impl ProfileRecord {
    /// Fully defaulted record for `username`; both success flags false.
    pub fn empty(username: &str, profile_url: String) -> Self {
        Self {
            username: username.to_string(),
            profile_url,
            ..Self::default()
        }
    }

    /// A profile with no name and nothing solved is treated as non-existent.
    pub fn is_not_found(&self) -> bool {
        self.name.is_empty() && self.total_problems_solved == 0
    }
}

/// `Option<u64>` on the wire as a number or the `"N/A"` sentinel.
mod rank_or_sentinel {
    use super::RANK_NOT_AVAILABLE;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(rank) => serializer.serialize_u64(*rank),
            None => serializer.serialize_str(RANK_NOT_AVAILABLE),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRank {
        Number(u64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<RawRank> = Option::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawRank::Number(rank)) => Some(rank),
            Some(RawRank::Text(text)) => text.trim().parse().ok(),
            None => None,
        })
    }
}
