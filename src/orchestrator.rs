//! Concurrent fetch of both upstream sources and the merge into one record.
//!
//! The profile page and the submissions API are independent: both run to
//! completion (or failure) before the merge, and neither cancels the other.

use crate::analytics::{FetchObserver, FetchReport};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{BreakdownResult, ProfileRecord};
use crate::services::{ProfilePageService, SubmissionsApiService};
use std::sync::Arc;
use std::time::Instant;

/// Folds the submissions API result into the page record.
///
/// A failed API result leaves the record untouched apart from
/// `api_fetch_success`. The API total only fills a zero page total; it never
/// overrides a nonzero one.
pub fn merge(mut profile: ProfileRecord, api: BreakdownResult) -> ProfileRecord {
    profile.api_fetch_success = api.success;
    if !api.success {
        return profile;
    }

    profile.problems_solved_breakdown = api.breakdown;
    if profile.total_problems_solved == 0 {
        if let Some(total) = api.total_count.filter(|t| *t > 0) {
            profile.total_problems_solved = total;
        }
    }
    profile
}

#[derive(Clone)]
pub struct ProfileFetcher {
    profile_service: ProfilePageService,
    submissions_service: SubmissionsApiService,
    observer: Option<Arc<dyn FetchObserver>>,
}

impl ProfileFetcher {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            profile_service: ProfilePageService::new(config)?,
            submissions_service: SubmissionsApiService::new(config)?,
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Runs both fetches concurrently and merges them. Always returns a fully
    /// populated record; upstream failures show up only in the success flags.
    pub async fn fetch(&self, username: &str) -> ProfileRecord {
        let started = Instant::now();

        let (profile, breakdown) = tokio::join!(
            self.profile_service.fetch_profile(username),
            self.submissions_service.fetch_breakdown(username),
        );

        let record = merge(profile, breakdown);

        if let Some(observer) = &self.observer {
            observer.on_fetch_complete(&FetchReport {
                username: username.to_string(),
                found: !record.is_not_found(),
                html_fetch_success: record.html_fetch_success,
                api_fetch_success: record.api_fetch_success,
                duration_ms: started.elapsed().as_millis() as u64,
            });
        }

        record
    }

    /// Like [`fetch`](Self::fetch) but reports a missing profile as
    /// `AppError::NotFound`: no name and nothing solved after the merge.
    pub async fn get_profile(&self, username: &str) -> Result<ProfileRecord, AppError> {
        let record = self.fetch(username).await;

        if record.is_not_found() {
            tracing::info!(
                "Profile not found for {} (html_ok={}, api_ok={})",
                username,
                record.html_fetch_success,
                record.api_fetch_success
            );
            return Err(AppError::NotFound(format!(
                "Profile not found for username: {}. Please check the username and try again.",
                username
            )));
        }

        Ok(record)
    }
}
