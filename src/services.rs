use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::extractor::{has_true_flag, FieldPattern};
use crate::locator;
use crate::models::{BreakdownResult, Difficulty, ProblemBreakdown, ProfileRecord};
use reqwest::header::{ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::LazyLock;
use std::time::Duration;

/// Every field read from the profile page, compiled once.
struct ProfileFields {
    name: FieldPattern,
    profile_image_url: FieldPattern,
    institution: FieldPattern,
    organization: FieldPattern,
    designation: FieldPattern,
    school: FieldPattern,
    created_date: FieldPattern,
    institute_rank: FieldPattern,
    overall_coding_score: FieldPattern,
    monthly_coding_score: FieldPattern,
    total_problems_solved: FieldPattern,
    pod_solved_current_streak: FieldPattern,
    pod_solved_longest_streak: FieldPattern,
    pod_solved_global_longest_streak: FieldPattern,
    pod_correct_submissions_count: FieldPattern,
}

static PROFILE_FIELDS: LazyLock<ProfileFields> = LazyLock::new(|| ProfileFields {
    name: FieldPattern::text("name"),
    profile_image_url: FieldPattern::text("profile_image_url"),
    institution: FieldPattern::optional_text("institute_name"),
    organization: FieldPattern::optional_text("organization_name"),
    designation: FieldPattern::optional_text("designation"),
    school: FieldPattern::optional_text("school"),
    created_date: FieldPattern::optional_text("created_date"),
    institute_rank: FieldPattern::integer("institute_rank"),
    overall_coding_score: FieldPattern::integer("score"),
    monthly_coding_score: FieldPattern::integer("monthly_score"),
    total_problems_solved: FieldPattern::integer("total_problems_solved"),
    pod_solved_current_streak: FieldPattern::integer("pod_solved_current_streak"),
    pod_solved_longest_streak: FieldPattern::integer("pod_solved_longest_streak"),
    pod_solved_global_longest_streak: FieldPattern::integer("pod_solved_global_longest_streak"),
    pod_correct_submissions_count: FieldPattern::integer("pod_correct_submissions_count"),
});

const CAMPUS_AMBASSADOR_KEY: &str = "is_campus_ambassador";

/// Builds the public profile URL for `username`. The name is used verbatim.
pub fn profile_url(base_url: &str, username: &str) -> String {
    format!(
        "{}/profile/{}?tab=activity",
        base_url.trim_end_matches('/'),
        username
    )
}

/// Pulls every profile field out of a fetched page.
///
/// Pure function over the document; `html_fetch_success` is left to the caller.
pub fn parse_profile_html(username: &str, profile_url: String, html: &str) -> ProfileRecord {
    let fields = &*PROFILE_FIELDS;
    let (window, anchor) = locator::locate_with_anchor(html);
    tracing::debug!(
        "Profile window for {}: {:?} anchor, {} of {} bytes",
        username,
        anchor,
        window.len(),
        html.len()
    );

    let mut record = ProfileRecord {
        username: username.to_string(),
        profile_url,
        name: fields.name.extract_text(window),
        profile_image_url: fields.profile_image_url.extract_text(window),
        institution: fields.institution.extract_text(window),
        organization: fields.organization.extract_text(window),
        designation: fields.designation.extract_text(window),
        school: fields.school.extract_text(window),
        created_date: fields.created_date.extract_text(window),
        institute_rank: fields.institute_rank.find(window).map(|v| v.as_integer()),
        overall_coding_score: fields.overall_coding_score.extract_int(window),
        monthly_coding_score: fields.monthly_coding_score.extract_int(window),
        total_problems_solved: fields.total_problems_solved.extract_int(window),
        pod_solved_current_streak: fields.pod_solved_current_streak.extract_int(window),
        pod_solved_longest_streak: fields.pod_solved_longest_streak.extract_int(window),
        pod_solved_global_longest_streak: fields
            .pod_solved_global_longest_streak
            .extract_int(window),
        pod_correct_submissions_count: fields.pod_correct_submissions_count.extract_int(window),
        is_campus_ambassador: has_true_flag(window, CAMPUS_AMBASSADOR_KEY),
        ..ProfileRecord::default()
    };

    // Last-chance plain JSON pass, only when nothing identifying was found.
    // Scoped to the window: unrelated JSON-LD or nav data elsewhere in the
    // page must not turn a missing user into a profile.
    if record.total_problems_solved == 0
        && record.overall_coding_score == 0
        && record.name.is_empty()
    {
        if let Some(value) = fields.overall_coding_score.find_plain(window) {
            record.overall_coding_score = value.as_integer();
        }
        if let Some(value) = fields.total_problems_solved.find_plain(window) {
            record.total_problems_solved = value.as_integer();
        }
        if let Some(value) = fields.name.find_plain(window) {
            record.name = value.into_text();
        }
    }

    record
}

/// Counts solved problems per difficulty from a submissions API body.
///
/// `result` must be an object; each entry may be an array of submissions or
/// an object keyed by submission id. Unknown difficulty labels are skipped.
pub fn parse_breakdown(body: &Value) -> Result<BreakdownResult, AppError> {
    let result = body
        .get("result")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            AppError::ExternalApiError("Submissions response missing 'result' object".to_string())
        })?;

    let mut breakdown = ProblemBreakdown::default();
    for (label, submissions) in result {
        let Some(difficulty) = Difficulty::from_label(label) else {
            tracing::debug!("Ignoring unknown difficulty label '{}'", label);
            continue;
        };
        let count = match submissions {
            Value::Array(items) => items.len(),
            Value::Object(items) => items.len(),
            _ => 0,
        };
        breakdown.add(difficulty, count as u64);
    }

    let total_count = match body.get("count") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    Ok(BreakdownResult {
        breakdown,
        total_count,
        success: true,
    })
}

/// Client for the server-rendered profile page.
#[derive(Clone)]
pub struct ProfilePageService {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl ProfilePageService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.profile_timeout_secs))
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create profile page client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.gfg_base_url.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    pub fn profile_url(&self, username: &str) -> String {
        profile_url(&self.base_url, username)
    }

    /// Fetches and parses the profile page. Never fails: transport errors and
    /// non-2xx statuses yield a defaulted record with `html_fetch_success = false`.
    pub async fn fetch_profile(&self, username: &str) -> ProfileRecord {
        let url = self.profile_url(username);
        match self.fetch_html(&url).await {
            Ok(html) => {
                let mut record = parse_profile_html(username, url, &html);
                record.html_fetch_success = true;
                tracing::info!(
                    "Profile page parsed for {}: name_found={}, total_solved={}",
                    username,
                    !record.name.is_empty(),
                    record.total_problems_solved
                );
                record
            }
            Err(e) => {
                tracing::warn!("Profile page fetch failed for {}: {}", username, e);
                ProfileRecord::empty(username, url)
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, AppError> {
        tracing::debug!("Fetching profile page: {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .context("Profile page request failed")?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Profile page returned status {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .context("Failed to read profile page body")
    }
}

/// Client for the per-difficulty submissions API.
#[derive(Clone)]
pub struct SubmissionsApiService {
    client: Client,
    api_url: String,
    origin: String,
    referer: String,
}

impl SubmissionsApiService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.submissions_timeout_secs))
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create submissions client: {}", e))
            })?;

        Ok(Self {
            client,
            api_url: config.submissions_api_url.clone(),
            origin: config.upstream_origin(),
            referer: config.upstream_referer(),
        })
    }

    /// Fetches the difficulty breakdown. Never fails: any error yields a
    /// zeroed breakdown with `success = false`.
    pub async fn fetch_breakdown(&self, username: &str) -> BreakdownResult {
        match self.request_breakdown(username).await {
            Ok(result) => {
                tracing::info!(
                    "Submissions API returned {} solved for {} (count={:?})",
                    result.breakdown.total(),
                    username,
                    result.total_count
                );
                result
            }
            Err(e) => {
                tracing::warn!("Submissions API failed for {}: {}", username, e);
                BreakdownResult::failed()
            }
        }
    }

    async fn request_breakdown(&self, username: &str) -> Result<BreakdownResult, AppError> {
        let body = json!({
            "handle": username,
            "requestType": "",
            "year": "",
            "month": ""
        });

        let response = self
            .client
            .post(&self.api_url)
            .header(ORIGIN, &self.origin)
            .header(REFERER, &self.referer)
            .json(&body)
            .send()
            .await
            .context("Submissions API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Submissions API returned status {}: {}",
                status, error_text
            )));
        }

        let data: Value = response
            .json()
            .await
            .context("Failed to parse submissions response")?;

        parse_breakdown(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM_PAGE: &str = r#"<script>self.__next_f.push([1,"{\"userData\":{\"message\":\"ok\",\"data\":{\"name\":\"Alice A\",\"profile_image_url\":\"https://img/alice.png\",\"institute_name\":\"State University\",\"organization_name\":\"\",\"designation\":\"Student\",\"school\":\"\",\"score\":99,\"monthly_score\":12,\"total_problems_solved\":57,\"institute_rank\":8,\"pod_solved_current_streak\":3,\"pod_solved_longest_streak\":10,\"pod_solved_global_longest_streak\":40,\"pod_correct_submissions_count\":21,\"is_campus_ambassador\":true,\"created_date\":\"2021-04-01 10:00:00\"}}}"])</script>"#;

    #[test]
    fn test_profile_url_uses_username_verbatim() {
        assert_eq!(
            profile_url("https://www.geeksforgeeks.org/", "alice"),
            "https://www.geeksforgeeks.org/profile/alice?tab=activity"
        );
    }

    #[test]
    fn test_parse_stream_encoded_page() {
        let record = parse_profile_html("alice", "u".to_string(), STREAM_PAGE);
        assert_eq!(record.username, "alice");
        assert_eq!(record.name, "Alice A");
        assert_eq!(record.profile_image_url, "https://img/alice.png");
        assert_eq!(record.institution, "State University");
        assert_eq!(record.organization, "");
        assert_eq!(record.designation, "Student");
        assert_eq!(record.overall_coding_score, 99);
        assert_eq!(record.monthly_coding_score, 12);
        assert_eq!(record.total_problems_solved, 57);
        assert_eq!(record.institute_rank, Some(8));
        assert_eq!(record.pod_solved_current_streak, 3);
        assert_eq!(record.pod_solved_longest_streak, 10);
        assert_eq!(record.pod_solved_global_longest_streak, 40);
        assert_eq!(record.pod_correct_submissions_count, 21);
        assert!(record.is_campus_ambassador);
        assert_eq!(record.created_date, "2021-04-01 10:00:00");
        assert!(!record.html_fetch_success);
    }

    #[test]
    fn test_parse_plain_embedded_page() {
        let html = r#"<script id="__NEXT_DATA__">{"props":{"userData":{"data":{"name":"Bob","score":5,"total_problems_solved":2}},"error":null}}</script>"#;
        let record = parse_profile_html("bob", "u".to_string(), html);
        assert_eq!(record.name, "Bob");
        assert_eq!(record.overall_coding_score, 5);
        assert_eq!(record.total_problems_solved, 2);
        assert_eq!(record.institute_rank, None);
        assert!(!record.is_campus_ambassador);
    }

    #[test]
    fn test_missing_user_ignores_unrelated_json_outside_window() {
        // The keyword window ends long before the page's JSON-LD block.
        let html = format!(
            r#"<script>self.__next_f.push([1,"{{\"userData\":{{\"message\":\"User not found\",\"data\":null}}}}"])</script>{}<script type="application/ld+json">{{"@type":"Organization","name":"GeeksforGeeks","score":5}}</script>"#,
            " ".repeat(6000)
        );
        let record = parse_profile_html("ghost", "u".to_string(), &html);
        assert_eq!(record.name, "");
        assert_eq!(record.overall_coding_score, 0);
        assert_eq!(record.total_problems_solved, 0);
        assert!(record.is_not_found());
    }

    #[test]
    fn test_plain_record_inside_keyword_window() {
        let html = r#"userData = {"name":"Carol","total_problems_solved":11,"score":30}"#;
        let record = parse_profile_html("carol", "u".to_string(), html);
        assert_eq!(record.name, "Carol");
        assert_eq!(record.total_problems_solved, 11);
        assert_eq!(record.overall_coding_score, 30);
    }

    #[test]
    fn test_nested_escaping_reads_flag_with_other_fields() {
        let html = r#"userData:{\\\"name\\\":\\\"Alice A\\\",\\\"score\\\":99,\\\"is_campus_ambassador\\\":true}"#;
        let record = parse_profile_html("alice", "u".to_string(), html);
        assert_eq!(record.name, "Alice A");
        assert_eq!(record.overall_coding_score, 99);
        assert!(record.is_campus_ambassador);
    }

    #[test]
    fn test_parse_breakdown_sums_case_variants() {
        let body = json!({"result": {"Easy": [1, 2], "easy": [3], "EASY": {"9": {}}}});
        let result = parse_breakdown(&body).unwrap();
        assert_eq!(result.breakdown.easy, 4);
        assert_eq!(result.breakdown.total(), 4);
    }

    #[test]
    fn test_page_without_data_is_all_defaults() {
        let record = parse_profile_html("ghost", "u".to_string(), "<html></html>");
        assert_eq!(record, ProfileRecord::empty("ghost", "u".to_string()));
    }

    #[test]
    fn test_parse_breakdown_arrays_and_objects() {
        let body = json!({
            "status": "success",
            "result": {
                "Easy": [{"slug": "a"}, {"slug": "b"}],
                "Medium": {"101": {"slug": "c"}},
                "Expert": [1, 2, 3]
            },
            "count": 3
        });
        let result = parse_breakdown(&body).unwrap();
        assert!(result.success);
        assert_eq!(result.breakdown.easy, 2);
        assert_eq!(result.breakdown.medium, 1);
        assert_eq!(result.breakdown.hard, 0);
        assert_eq!(result.total_count, Some(3));
    }

    #[test]
    fn test_parse_breakdown_string_count_and_missing_count() {
        let body = json!({"result": {}, "count": "17"});
        assert_eq!(parse_breakdown(&body).unwrap().total_count, Some(17));

        let body = json!({"result": {"Hard": []}});
        let result = parse_breakdown(&body).unwrap();
        assert_eq!(result.total_count, None);
        assert_eq!(result.breakdown, ProblemBreakdown::default());
    }

    #[test]
    fn test_parse_breakdown_rejects_missing_result() {
        assert!(parse_breakdown(&json!({"message": "no user"})).is_err());
        assert!(parse_breakdown(&json!({"result": []})).is_err());
    }

    #[tokio::test]
    async fn test_service_creation() {
        let config = Config::default();
        assert!(ProfilePageService::new(&config).is_ok());
        assert!(SubmissionsApiService::new(&config).is_ok());
    }
}
