//! Read-side aggregation over session and page-visit documents.
//!
//! Everything here is a pure function over an already-fetched document set;
//! the services fetch by (app, optional user) and delegate. Zero matching
//! documents produce the documented empty shapes, not errors.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::page::PageVisit;
use crate::session::{Session, SessionEvent, SessionStatus};
use crate::timefmt::{round2, seconds_to_iso_duration};

/// How many dates the most-active view reports.
const TOP_ACTIVE_DAYS: usize = 5;

fn date_key(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

fn weekday_name(index: u32) -> &'static str {
    match index {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        5 => "Saturday",
        _ => "Sunday",
    }
}

// ---------------------------------------------------------------------------
// Heatmap

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapDateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapData {
    /// Creation date -> session count.
    pub daily_sessions: BTreeMap<String, u64>,
    /// Weekday (Monday = "0") -> hour-of-day -> session count, fixed 7x24.
    pub weekly_hourly: BTreeMap<String, BTreeMap<String, u64>>,
    pub total_sessions: usize,
    pub total_days_with_activity: usize,
    pub date_range: HeatmapDateRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapResponse {
    pub heatmap_data: HeatmapData,
}

/// Session counts per creation date plus the weekday x hour grid.
pub fn heatmap(sessions: &[Session]) -> HeatmapResponse {
    let mut daily_sessions: BTreeMap<String, u64> = BTreeMap::new();

    let mut weekly_hourly: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for day in 0..7u32 {
        let hours: BTreeMap<String, u64> = (0..24u32).map(|h| (h.to_string(), 0)).collect();
        weekly_hourly.insert(day.to_string(), hours);
    }

    for session in sessions {
        *daily_sessions.entry(date_key(&session.created_at)).or_insert(0) += 1;

        let day = session.created_at.weekday().num_days_from_monday().to_string();
        let hour = session.created_at.hour().to_string();
        if let Some(slot) = weekly_hourly.get_mut(&day).and_then(|hours| hours.get_mut(&hour)) {
            *slot += 1;
        }
    }

    let date_range = HeatmapDateRange {
        start_date: daily_sessions.keys().next().cloned(),
        end_date: daily_sessions.keys().next_back().cloned(),
    };

    HeatmapResponse {
        heatmap_data: HeatmapData {
            total_sessions: sessions.len(),
            total_days_with_activity: daily_sessions.len(),
            date_range,
            daily_sessions,
            weekly_hourly,
        },
    }
}

// ---------------------------------------------------------------------------
// Most active

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MostActiveDay {
    pub date: String,
    /// Weekday name for the date.
    pub day: String,
    pub count: u64,
    /// Hour histogram for the date, sorted descending by count.
    pub most_active_hours: Vec<HourCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MostActiveResponse {
    pub most_active_days: Vec<MostActiveDay>,
}

/// Top dates by session count, ties kept in first-seen order.
pub fn most_active(sessions: &[Session]) -> MostActiveResponse {
    // First-seen date order is the tie-break, so counts live in a Vec with a
    // positional index instead of a sorted map.
    let mut order: HashMap<String, usize> = HashMap::new();
    let mut days: Vec<(String, u32, u64, HashMap<u32, u64>)> = Vec::new();

    for session in sessions {
        let date = date_key(&session.created_at);
        let weekday = session.created_at.weekday().num_days_from_monday();
        let hour = session.created_at.hour();

        let idx = *order.entry(date.clone()).or_insert_with(|| {
            days.push((date, weekday, 0, HashMap::new()));
            days.len() - 1
        });
        days[idx].2 += 1;
        *days[idx].3.entry(hour).or_insert(0) += 1;
    }

    days.sort_by(|a, b| b.2.cmp(&a.2));
    days.truncate(TOP_ACTIVE_DAYS);

    let most_active_days = days
        .into_iter()
        .map(|(date, weekday, count, hours)| {
            let mut most_active_hours: Vec<HourCount> = hours
                .into_iter()
                .map(|(hour, count)| HourCount { hour, count })
                .collect();
            most_active_hours.sort_by(|a, b| b.count.cmp(&a.count).then(a.hour.cmp(&b.hour)));

            MostActiveDay {
                day: weekday_name(weekday).to_string(),
                date,
                count,
                most_active_hours,
            }
        })
        .collect();

    MostActiveResponse { most_active_days }
}

// ---------------------------------------------------------------------------
// Stats & summary

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_users: usize,
    /// Mean accrued active time in minutes, 2-decimal rounding.
    pub avg_session_time: f64,
}

/// Distinct user count and mean session time.
pub fn stats(sessions: &[Session]) -> StatsResponse {
    if sessions.is_empty() {
        return StatsResponse {
            total_users: 0,
            avg_session_time: 0.0,
        };
    }

    let mut users: std::collections::HashSet<&str> = std::collections::HashSet::new();
    let mut total_seconds = 0i64;
    for session in sessions {
        users.insert(session.username.as_str());
        total_seconds += session.total_active_time;
    }

    let avg_minutes = total_seconds as f64 / sessions.len() as f64 / 60.0;

    StatsResponse {
        total_users: users.len(),
        avg_session_time: round2(avg_minutes),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total_sessions: usize,
    pub total_sessions_time: String,
    pub total_sessions_time_seconds: i64,
    pub total_sessions_time_minutes: f64,
    pub avg_sessions_time: String,
    pub avg_sessions_time_seconds: f64,
    pub avg_sessions_time_minutes: f64,
}

/// Sum and mean of accrued time, each as duration / seconds / minutes.
pub fn summary(sessions: &[Session]) -> SummaryResponse {
    if sessions.is_empty() {
        return SummaryResponse {
            total_sessions: 0,
            total_sessions_time: "PT0S".into(),
            total_sessions_time_seconds: 0,
            total_sessions_time_minutes: 0.0,
            avg_sessions_time: "PT0S".into(),
            avg_sessions_time_seconds: 0.0,
            avg_sessions_time_minutes: 0.0,
        };
    }

    let total_sessions = sessions.len();
    let total_seconds: i64 = sessions.iter().map(|s| s.total_active_time).sum();
    let avg_seconds = total_seconds as f64 / total_sessions as f64;

    SummaryResponse {
        total_sessions,
        total_sessions_time: seconds_to_iso_duration(total_seconds),
        total_sessions_time_seconds: total_seconds,
        total_sessions_time_minutes: round2(total_seconds as f64 / 60.0),
        avg_sessions_time: seconds_to_iso_duration(avg_seconds as i64),
        avg_sessions_time_seconds: round2(avg_seconds),
        avg_sessions_time_minutes: round2(avg_seconds / 60.0),
    }
}

// ---------------------------------------------------------------------------
// Timelines

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineItem {
    pub session_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub total_active_time_seconds: i64,
    /// ISO duration; absent while nothing has accrued.
    pub total_active_time_formatted: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub sessions: Vec<TimelineItem>,
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineDetailItem {
    pub session_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub events: Vec<SessionEvent>,
    pub status: SessionStatus,
    pub total_active_time_seconds: i64,
    pub total_active_time_formatted: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineDetailResponse {
    pub sessions: Vec<TimelineDetailItem>,
    pub total_count: usize,
}

fn formatted_active_time(seconds: i64) -> Option<String> {
    (seconds != 0).then(|| seconds_to_iso_duration(seconds))
}

fn by_created_desc(sessions: &[Session]) -> Vec<&Session> {
    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ordered
}

/// Sessions sorted by creation time descending.
pub fn timeline(sessions: &[Session]) -> TimelineResponse {
    let items: Vec<TimelineItem> = by_created_desc(sessions)
        .into_iter()
        .map(|session| TimelineItem {
            session_id: session.session_id.clone(),
            username: session.username.clone(),
            created_at: session.created_at,
            ended_at: session.ended_at,
            status: session.status,
            total_active_time_seconds: session.total_active_time,
            total_active_time_formatted: formatted_active_time(session.total_active_time),
        })
        .collect();

    TimelineResponse {
        total_count: items.len(),
        sessions: items,
    }
}

/// Timeline variant carrying each session's full event log.
pub fn timeline_detail(sessions: &[Session]) -> TimelineDetailResponse {
    let items: Vec<TimelineDetailItem> = by_created_desc(sessions)
        .into_iter()
        .map(|session| TimelineDetailItem {
            session_id: session.session_id.clone(),
            username: session.username.clone(),
            created_at: session.created_at,
            ended_at: session.ended_at,
            events: session.events.clone(),
            status: session.status,
            total_active_time_seconds: session.total_active_time,
            total_active_time_formatted: formatted_active_time(session.total_active_time),
        })
        .collect();

    TimelineDetailResponse {
        total_count: items.len(),
        sessions: items,
    }
}

// ---------------------------------------------------------------------------
// Daily time & per-page time

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTimeSpentItem {
    pub date: String,
    pub total_time_seconds: i64,
    pub total_time_formatted: String,
    pub total_time_minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTimeSpentResponse {
    pub daily_time: Vec<DailyTimeSpentItem>,
    pub total_days: usize,
}

/// Accrued-time sums grouped by creation date, ascending by date.
pub fn daily_time_spent(sessions: &[Session]) -> DailyTimeSpentResponse {
    let mut daily: BTreeMap<String, i64> = BTreeMap::new();
    for session in sessions {
        *daily.entry(date_key(&session.created_at)).or_insert(0) += session.total_active_time;
    }

    let daily_time: Vec<DailyTimeSpentItem> = daily
        .into_iter()
        .map(|(date, total_seconds)| DailyTimeSpentItem {
            date,
            total_time_seconds: total_seconds,
            total_time_formatted: seconds_to_iso_duration(total_seconds),
            total_time_minutes: round2(total_seconds as f64 / 60.0),
        })
        .collect();

    DailyTimeSpentResponse {
        total_days: daily_time.len(),
        daily_time,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeByPageItem {
    pub page: String,
    pub total_time_seconds: i64,
    pub total_time_formatted: String,
    pub total_time_minutes: f64,
    pub visit_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeByPageResponse {
    pub page_time: Vec<TimeByPageItem>,
    pub total_pages: usize,
}

/// Duration sum and visit count per page, ascending by page id.
pub fn time_by_page(visits: &[PageVisit]) -> TimeByPageResponse {
    let mut pages: BTreeMap<&str, (i64, u64)> = BTreeMap::new();
    for visit in visits {
        let entry = pages.entry(visit.page.as_str()).or_insert((0, 0));
        entry.0 += visit.timespent;
        entry.1 += 1;
    }

    let page_time: Vec<TimeByPageItem> = pages
        .into_iter()
        .map(|(page, (total_seconds, visit_count))| TimeByPageItem {
            page: page.to_string(),
            total_time_seconds: total_seconds,
            total_time_formatted: seconds_to_iso_duration(total_seconds),
            total_time_minutes: round2(total_seconds as f64 / 60.0),
            visit_count,
        })
        .collect();

    TimeByPageResponse {
        total_pages: page_time.len(),
        page_time,
    }
}

// ---------------------------------------------------------------------------
// Page stats

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageStats {
    pub page_id: String,
    pub visit_count: u64,
    /// Mean seconds per visit, 2-decimal rounding.
    pub avg_time_spent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageStatsResponse {
    pub total_visits: usize,
    pub unique_pages: usize,
    pub page_stats: Vec<PageStats>,
}

/// Visit counts and mean duration per page.
pub fn page_stats(visits: &[PageVisit]) -> PageStatsResponse {
    if visits.is_empty() {
        return PageStatsResponse {
            total_visits: 0,
            unique_pages: 0,
            page_stats: vec![],
        };
    }

    let mut pages: BTreeMap<&str, (u64, i64)> = BTreeMap::new();
    for visit in visits {
        let entry = pages.entry(visit.page.as_str()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += visit.timespent;
    }

    let page_stats: Vec<PageStats> = pages
        .into_iter()
        .map(|(page, (count, total))| PageStats {
            page_id: page.to_string(),
            visit_count: count,
            avg_time_spent: round2(total as f64 / count as f64),
        })
        .collect();

    PageStatsResponse {
        total_visits: visits.len(),
        unique_pages: page_stats.len(),
        page_stats,
    }
}
