//! # 프로젝트 목록 필터링
//!
//! 메모리에 불러온 프로젝트 목록에 다음 순서로 필터를 적용하고 정렬합니다.
//!
//! 1. 상태 필터 (`전체`면 통과)
//! 2. 제목 검색 (대소문자 무시 부분 일치)
//! 3. 날짜 필터: 아래 세 가지 중 최대 하나만 활성화됩니다.
//!    - 기간 지정: `[from, to]` (양 끝 포함, `to`는 그날 끝까지)
//!    - 연도 + 월(복수 선택)
//!    - 최근 기간: 1주일 / 1개월 / 3개월
//! 4. 정렬: 시작일 내림차순 → 등록일 내림차순 → ID 내림차순
//!
//! 날짜 필터와 정렬의 기준 필드는 모두 `start_date`입니다.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Project, ProjectStatus};

/// 상태 필터의 "전체" 선택값
pub const ALL_STATUSES: &str = "전체";

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("알 수 없는 상태입니다: {0}")]
    UnknownStatus(String),
    #[error("시작일이 종료일보다 늦습니다")]
    InvertedRange,
    #[error("기간을 지정하려면 시작일과 종료일이 모두 필요합니다")]
    IncompleteRange,
    #[error("월은 1부터 12 사이여야 합니다: {0}")]
    InvalidMonth(String),
    #[error("알 수 없는 기간입니다: {0}")]
    UnknownPeriod(String),
    #[error("날짜 형식은 YYYY-MM-DD여야 합니다: {0}")]
    InvalidDate(String),
    #[error("연도는 숫자여야 합니다: {0}")]
    InvalidYear(String),
    #[error("페이지는 0 이상의 정수여야 합니다: {0}")]
    InvalidPage(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProjectStatus),
}

impl StatusFilter {
    pub fn parse(value: Option<&str>) -> Result<Self, FilterError> {
        match value.map(str::trim) {
            None | Some("") | Some(ALL_STATUSES) => Ok(StatusFilter::All),
            Some(other) => ProjectStatus::parse(other)
                .map(StatusFilter::Only)
                .ok_or_else(|| FilterError::UnknownStatus(other.to_string())),
        }
    }

    fn matches(&self, status: ProjectStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

/// 최근 기간 필터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Quarter,
}

impl Period {
    pub fn parse(value: &str) -> Result<Self, FilterError> {
        match value.trim() {
            "week" | "1주일" => Ok(Period::Week),
            "month" | "1개월" => Ok(Period::Month),
            "quarter" | "3개월" => Ok(Period::Quarter),
            other => Err(FilterError::UnknownPeriod(other.to_string())),
        }
    }

    fn days(&self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    Off,
    Range {
        start: NaiveDate,
        end: NaiveDate,
    },
    /// `year`가 없으면 모든 연도, `months`가 비어 있으면 모든 월
    Calendar {
        year: Option<i32>,
        months: BTreeSet<u32>,
    },
    Recent(Period),
}

impl DateFilter {
    fn matches(&self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        let Some(date) = date else {
            return *self == DateFilter::Off;
        };

        match self {
            DateFilter::Off => true,
            DateFilter::Range { start, end } => *start <= date && date <= *end,
            DateFilter::Calendar { year, months } => {
                year.map_or(true, |y| date.year() == y)
                    && (months.is_empty() || months.contains(&date.month()))
            }
            DateFilter::Recent(period) => date >= today - Duration::days(period.days()),
        }
    }
}

/// 목록 화면의 필터 상태
///
/// 날짜 필터는 `DateFilter` 하나로만 보관되므로 두 가지 모드가 동시에 켜질 수 없습니다.
/// 한 모드를 설정하면 다른 모드는 자동으로 해제됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    status: StatusFilter,
    search: Option<String>,
    date: DateFilter,
}

impl ProjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(&self) -> &DateFilter {
        &self.date
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
    }

    pub fn set_search(&mut self, query: Option<&str>) {
        self.search = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
    }

    /// 기간을 지정합니다. 연/월 선택과 최근 기간 선택은 해제됩니다.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), FilterError> {
        if start > end {
            return Err(FilterError::InvertedRange);
        }
        self.date = DateFilter::Range { start, end };
        Ok(())
    }

    /// 연도를 선택합니다. 기간 지정은 해제되고, 이미 고른 월은 유지됩니다.
    pub fn set_year(&mut self, year: Option<i32>) {
        let months = self.calendar_months();
        self.set_calendar(year, months);
    }

    /// 월 선택을 켜고 끕니다. 기간 지정은 해제됩니다.
    pub fn toggle_month(&mut self, month: u32) -> Result<(), FilterError> {
        if !(1..=12).contains(&month) {
            return Err(FilterError::InvalidMonth(month.to_string()));
        }
        let year = self.calendar_year();
        let mut months = self.calendar_months();
        if !months.remove(&month) {
            months.insert(month);
        }
        self.set_calendar(year, months);
        Ok(())
    }

    pub fn set_months(&mut self, months: BTreeSet<u32>) -> Result<(), FilterError> {
        if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(FilterError::InvalidMonth(bad.to_string()));
        }
        let year = self.calendar_year();
        self.set_calendar(year, months);
        Ok(())
    }

    /// 최근 기간을 선택합니다. 다른 날짜 필터는 해제됩니다.
    pub fn set_period(&mut self, period: Period) {
        self.date = DateFilter::Recent(period);
    }

    fn calendar_year(&self) -> Option<i32> {
        match &self.date {
            DateFilter::Calendar { year, .. } => *year,
            _ => None,
        }
    }

    fn calendar_months(&self) -> BTreeSet<u32> {
        match &self.date {
            DateFilter::Calendar { months, .. } => months.clone(),
            _ => BTreeSet::new(),
        }
    }

    fn set_calendar(&mut self, year: Option<i32>, months: BTreeSet<u32>) {
        self.date = if year.is_none() && months.is_empty() {
            DateFilter::Off
        } else {
            DateFilter::Calendar { year, months }
        };
    }

    /// 한 프로젝트가 활성화된 모든 필터를 통과하는지 확인합니다.
    pub fn matches(&self, project: &Project, today: NaiveDate) -> bool {
        self.status.matches(project.status)
            && self
                .search
                .as_deref()
                .map_or(true, |q| project.title.to_lowercase().contains(q))
            && self.date.matches(project.start_date, today)
    }

    /// 필터를 적용하고 최신순으로 정렬한 목록을 반환합니다.
    pub fn apply(&self, projects: Vec<Project>, today: NaiveDate) -> Vec<Project> {
        let mut filtered: Vec<Project> = projects
            .into_iter()
            .filter(|p| self.matches(p, today))
            .collect();
        sort_by_recency(&mut filtered);
        filtered
    }
}

/// 시작일 내림차순 정렬 (시작일 없는 항목은 뒤로), 동률이면 등록일·ID 내림차순
pub fn sort_by_recency(projects: &mut [Project]) {
    projects.sort_by(|a, b| {
        compare_dates_desc(a.start_date, b.start_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn compare_dates_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 목록 API의 쿼리 문자열
///
/// `GET /projects?status=진행&q=배너&year=2024&months=3,4&page=2`
///
/// 모든 값을 문자열로 받아 `to_filter`/`page`에서 해석하므로
/// 형식이 틀린 값도 `AppError` 응답 형태로 거부됩니다.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub status: Option<String>,
    pub q: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub year: Option<String>,
    pub months: Option<String>,
    pub period: Option<String>,
    pub page: Option<String>,
}

impl ProjectQuery {
    /// 쿼리를 필터 상태로 변환합니다.
    ///
    /// 적용 순서는 최근 기간 → 연/월 → 기간 지정이므로,
    /// 여러 모드가 함께 오면 기간 지정이 마지막에 적용되어 나머지를 해제합니다.
    pub fn to_filter(&self) -> Result<ProjectFilter, FilterError> {
        let mut filter = ProjectFilter::new();
        filter.set_status(StatusFilter::parse(self.status.as_deref())?);
        filter.set_search(self.q.as_deref());

        if let Some(period) = self.period.as_deref().filter(|p| !p.trim().is_empty()) {
            filter.set_period(Period::parse(period)?);
        }

        let year = parse_value::<i32>(self.year.as_deref(), FilterError::InvalidYear)?;
        let months = parse_months(self.months.as_deref())?;
        if year.is_some() || !months.is_empty() {
            filter.set_year(year);
            filter.set_months(months)?;
        }

        let from = parse_value::<NaiveDate>(self.from.as_deref(), FilterError::InvalidDate)?;
        let to = parse_value::<NaiveDate>(self.to.as_deref(), FilterError::InvalidDate)?;
        match (from, to) {
            (Some(start), Some(end)) => filter.set_date_range(start, end)?,
            (None, None) => {}
            _ => return Err(FilterError::IncompleteRange),
        }

        Ok(filter)
    }

    /// 1부터 시작하는 페이지 번호 (`0`이나 누락은 1페이지)
    pub fn page(&self) -> Result<usize, FilterError> {
        let page = parse_value::<usize>(self.page.as_deref(), FilterError::InvalidPage)?;
        Ok(page.unwrap_or(1).max(1))
    }
}

/// 비어 있으면 `None`, 아니면 `T`로 파싱합니다.
fn parse_value<T: FromStr>(
    raw: Option<&str>,
    invalid: fn(String) -> FilterError,
) -> Result<Option<T>, FilterError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| invalid(value.to_string())),
    }
}

fn parse_months(raw: Option<&str>) -> Result<BTreeSet<u32>, FilterError> {
    let mut months = BTreeSet::new();
    let Some(raw) = raw else {
        return Ok(months);
    };

    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let month: u32 = part
            .parse()
            .map_err(|_| FilterError::InvalidMonth(part.to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(FilterError::InvalidMonth(part.to_string()));
        }
        months.insert(month);
    }

    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Phases, ProjectLinks};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(id: &str, title: &str, status: ProjectStatus, start: Option<NaiveDate>) -> Project {
        Project {
            id: id.to_string(),
            owner_id: "owner".to_string(),
            title: title.to_string(),
            status,
            description: String::new(),
            request_date: None,
            start_date: start,
            end_date: None,
            completion_date: None,
            phases: Phases::default(),
            total_effort: None,
            classification: None,
            channel: None,
            service: None,
            category: None,
            deployment_type: None,
            progress: None,
            link: ProjectLinks::default(),
            created_at: format!("2024-01-01T00:00:00.000Z{id}"),
            updated_at: String::new(),
        }
    }

    fn sample() -> Vec<Project> {
        vec![
            project("a", "메인 배너 교체", ProjectStatus::InProgress, Some(date(2024, 3, 1))),
            project("b", "인사이트 리포트", ProjectStatus::Closed, Some(date(2024, 4, 15))),
            project("c", "Banner A/B test", ProjectStatus::Pending, Some(date(2023, 3, 20))),
            project("d", "상품 페이지", ProjectStatus::InProgress, None),
            project("e", "고객지원 FAQ", ProjectStatus::InProgress, Some(date(2024, 3, 31))),
        ]
    }

    fn ids(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.id.as_str()).collect()
    }

    fn today() -> NaiveDate {
        date(2024, 4, 20)
    }

    #[test]
    fn default_filter_only_sorts() {
        let result = ProjectFilter::new().apply(sample(), today());
        assert_eq!(ids(&result), vec!["b", "e", "a", "c", "d"]);
    }

    #[test]
    fn status_filter_is_idempotent() {
        let mut filter = ProjectFilter::new();
        filter.set_status(StatusFilter::Only(ProjectStatus::InProgress));

        let once = filter.apply(sample(), today());
        let twice = filter.apply(once.clone(), today());
        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec!["e", "a", "d"]);
    }

    #[test]
    fn all_sentinel_passes_everything() {
        assert_eq!(StatusFilter::parse(Some("전체")), Ok(StatusFilter::All));
        assert_eq!(StatusFilter::parse(None), Ok(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse(Some("진행")),
            Ok(StatusFilter::Only(ProjectStatus::InProgress))
        );
        assert!(StatusFilter::parse(Some("보류")).is_err());
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut filter = ProjectFilter::new();
        filter.set_search(Some("  BANNER "));
        assert_eq!(ids(&filter.apply(sample(), today())), vec!["c"]);

        filter.set_search(Some("배너"));
        assert_eq!(ids(&filter.apply(sample(), today())), vec!["a"]);
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let mut filter = ProjectFilter::new();
        filter.set_date_range(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert_eq!(ids(&filter.apply(sample(), today())), vec!["e", "a"]);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut filter = ProjectFilter::new();
        assert_eq!(
            filter.set_date_range(date(2024, 4, 1), date(2024, 3, 1)),
            Err(FilterError::InvertedRange)
        );
        assert_eq!(*filter.date(), DateFilter::Off);
    }

    #[test]
    fn year_and_months_combine() {
        let mut filter = ProjectFilter::new();
        filter.set_year(Some(2024));
        filter.toggle_month(3).unwrap();
        assert_eq!(ids(&filter.apply(sample(), today())), vec!["e", "a"]);

        filter.toggle_month(4).unwrap();
        assert_eq!(ids(&filter.apply(sample(), today())), vec!["b", "e", "a"]);

        filter.set_year(None);
        filter.toggle_month(4).unwrap();
        assert_eq!(ids(&filter.apply(sample(), today())), vec!["e", "a", "c"]);
    }

    #[test]
    fn range_and_calendar_are_exclusive() {
        let mut filter = ProjectFilter::new();
        filter.set_year(Some(2024));
        filter.toggle_month(3).unwrap();

        filter.set_date_range(date(2024, 4, 1), date(2024, 4, 30)).unwrap();
        assert!(matches!(filter.date(), DateFilter::Range { .. }));

        filter.toggle_month(5).unwrap();
        assert_eq!(
            *filter.date(),
            DateFilter::Calendar { year: None, months: BTreeSet::from([5]) }
        );

        filter.set_period(Period::Week);
        assert_eq!(*filter.date(), DateFilter::Recent(Period::Week));

        filter.set_date_range(date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        assert!(matches!(filter.date(), DateFilter::Range { .. }));
    }

    #[test]
    fn untoggling_last_month_turns_calendar_off() {
        let mut filter = ProjectFilter::new();
        filter.toggle_month(3).unwrap();
        filter.toggle_month(3).unwrap();
        assert_eq!(*filter.date(), DateFilter::Off);
        assert!(filter.toggle_month(13).is_err());
    }

    #[test]
    fn recent_period_counts_back_from_today() {
        let mut filter = ProjectFilter::new();
        filter.set_period(Period::Month);
        assert_eq!(ids(&filter.apply(sample(), today())), vec!["b", "e"]);

        filter.set_period(Period::Quarter);
        assert_eq!(ids(&filter.apply(sample(), today())), vec!["b", "e", "a"]);
    }

    #[test]
    fn undated_projects_fail_any_date_filter() {
        let mut filter = ProjectFilter::new();
        filter.set_year(Some(2024));
        assert!(!filter.matches(&sample()[3], today()));
    }

    #[test]
    fn ties_break_on_created_then_id() {
        let mut list = vec![
            project("x", "x", ProjectStatus::Pending, Some(date(2024, 1, 1))),
            project("y", "y", ProjectStatus::Pending, Some(date(2024, 1, 1))),
        ];
        list[0].created_at = "2024-01-02T00:00:00.000Z".into();
        list[1].created_at = "2024-01-02T00:00:00.000Z".into();
        sort_by_recency(&mut list);
        assert_eq!(ids(&list), vec!["y", "x"]);
    }

    #[test]
    fn query_range_overrides_calendar() {
        let query = ProjectQuery {
            from: Some("2024-01-01".into()),
            to: Some("2024-01-31".into()),
            year: Some("2024".into()),
            months: Some("3,4".into()),
            ..Default::default()
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(
            *filter.date(),
            DateFilter::Range { start: date(2024, 1, 1), end: date(2024, 1, 31) }
        );
    }

    #[test]
    fn query_rejects_half_range_and_bad_months() {
        let half = ProjectQuery { from: Some("2024-01-01".into()), ..Default::default() };
        assert_eq!(half.to_filter().unwrap_err(), FilterError::IncompleteRange);

        let bad = ProjectQuery { months: Some("3,13".into()), ..Default::default() };
        assert_eq!(bad.to_filter().unwrap_err(), FilterError::InvalidMonth("13".into()));
    }

    #[test]
    fn scenario_from_status_and_month() {
        let a = project("a", "A", ProjectStatus::InProgress, Some(date(2024, 3, 1)));

        let query = ProjectQuery {
            status: Some("진행".into()),
            year: Some("2024".into()),
            months: Some("3".into()),
            ..Default::default()
        };
        assert!(query.to_filter().unwrap().matches(&a, today()));

        let closed = ProjectQuery { status: Some("종료".into()), ..Default::default() };
        assert!(!closed.to_filter().unwrap().matches(&a, today()));
    }

    #[test]
    fn query_rejects_malformed_values() {
        let bad_date = ProjectQuery {
            from: Some("2024/01/01".into()),
            to: Some("2024-01-31".into()),
            ..Default::default()
        };
        assert_eq!(
            bad_date.to_filter().unwrap_err(),
            FilterError::InvalidDate("2024/01/01".into())
        );

        let bad_year = ProjectQuery { year: Some("올해".into()), ..Default::default() };
        assert_eq!(bad_year.to_filter().unwrap_err(), FilterError::InvalidYear("올해".into()));

        let bad_page = ProjectQuery { page: Some("-1".into()), ..Default::default() };
        assert_eq!(bad_page.page().unwrap_err(), FilterError::InvalidPage("-1".into()));
    }

    #[test]
    fn blank_query_values_are_ignored() {
        let query = ProjectQuery {
            year: Some("".into()),
            from: Some(" ".into()),
            to: Some("".into()),
            page: Some("0".into()),
            ..Default::default()
        };
        assert_eq!(*query.to_filter().unwrap().date(), DateFilter::Off);
        assert_eq!(query.page().unwrap(), 1);
    }
}
