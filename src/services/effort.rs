//! # 공수(effort) 계산
//!
//! - `coerce_effort`: 폼 입력(숫자/문자열/빈 값)을 `Option<f64>`로 변환
//! - `total_effort`: 기획 + 디자인 + 퍼블리싱 공수 합계 (개발 공수는 제외)
//! - `summarize`: 필터링된 프로젝트 목록의 월별 공수 집계

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;
use thiserror::Error;

use crate::models::{EffortInput, Phase, Phases, Project};

#[derive(Debug, Error, PartialEq)]
pub enum EffortError {
    #[error("공수는 숫자로 입력해야 합니다: {0}")]
    NotANumber(String),
    #[error("공수는 0 이상이어야 합니다")]
    Negative,
}

/// 공수 입력값을 숫자 또는 "미입력"(`None`)으로 변환합니다.
///
/// `""`, 공백, `null`, 누락은 미입력입니다. `"0"`은 0으로 입력된 값입니다.
pub fn coerce_effort(input: Option<&EffortInput>) -> Result<Option<f64>, EffortError> {
    let value = match input {
        None => return Ok(None),
        Some(EffortInput::Number(number)) => *number,
        Some(EffortInput::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| EffortError::NotANumber(text.clone()))?
        }
    };

    // "NaN", "inf"도 f64로 파싱되므로 따로 걸러냅니다.
    if !value.is_finite() {
        return Err(EffortError::NotANumber(value.to_string()));
    }
    if value < 0.0 {
        return Err(EffortError::Negative);
    }

    Ok(Some(value))
}

/// 총 공수에 포함되는 단계들
fn counted_phases(phases: &Phases) -> [&Phase; 3] {
    [&phases.planning, &phases.design, &phases.publishing]
}

/// 총 공수를 계산합니다.
///
/// 세 단계가 모두 미입력이면 `None`(화면에는 `-`), 아니면 입력된 값의 합을
/// 소수점 둘째 자리로 반올림한 값입니다.
pub fn total_effort(phases: &Phases) -> Option<f64> {
    counted_phases(phases)
        .iter()
        .filter_map(|phase| phase.effort)
        .fold(None, |acc, effort| Some(acc.unwrap_or(0.0) + effort))
        .map(round2)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn add_effort(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (None, None) => None,
        (acc, value) => Some(acc.unwrap_or(0.0) + value.unwrap_or(0.0)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyEffort {
    pub year: i32,
    pub month: u32,
    pub count: usize,
    pub total_effort: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffortSummary {
    pub total_projects: usize,
    pub total_effort: Option<f64>,
    /// 시작일 기준 (연, 월) 그룹, 최신 월이 먼저
    pub months: Vec<MonthlyEffort>,
}

/// 프로젝트 목록의 공수를 시작일의 연/월 단위로 묶어 합산합니다.
///
/// 시작일이 없는 프로젝트는 전체 합계에만 포함됩니다.
pub fn summarize(projects: &[Project]) -> EffortSummary {
    let mut total = None;
    let mut groups: BTreeMap<(i32, u32), (usize, Option<f64>)> = BTreeMap::new();

    for project in projects {
        total = add_effort(total, project.total_effort);

        if let Some(start) = project.start_date {
            let entry = groups.entry((start.year(), start.month())).or_insert((0, None));
            entry.0 += 1;
            entry.1 = add_effort(entry.1, project.total_effort);
        }
    }

    let months = groups
        .into_iter()
        .rev()
        .map(|((year, month), (count, effort))| MonthlyEffort {
            year,
            month,
            count,
            total_effort: effort.map(round2),
        })
        .collect();

    EffortSummary {
        total_projects: projects.len(),
        total_effort: total.map(round2),
        months,
    }
}
