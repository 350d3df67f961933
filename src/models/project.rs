//! # 프로젝트 모델 정의
//!
//! 프로젝트 레코드와 그 하위 구조(작업 단계 4종, 링크, 분류 값)를 정의합니다.
//!
//! ## 구조체 역할
//! - `Project`: API 응답용 프로젝트 (단계는 `planning`/`design`/... 최상위 필드로 직렬화)
//! - `ProjectRow`: DB `projects` 테이블 한 행 (단계 컬럼이 평평하게 펼쳐진 형태)
//! - `ProjectDraft`: 검증을 마친 "저장할 값". 생성/수정/복제가 모두 이 형태로 DB에 기록됨
//! - `CreateProjectRequest` / `UpdateProjectRequest`: 클라이언트 요청 본문

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// 제목이 비어 있는 레코드를 보여줄 때 쓰는 자리표시자
pub const UNTITLED: &str = "제목 없음";

/// 프로젝트 진행 상태
///
/// 상태 전이에는 제약이 없습니다. 어느 상태에서든 다른 상태로 바로 바꿀 수 있습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "대기")]
    #[sqlx(rename = "대기")]
    Pending,
    #[serde(rename = "진행")]
    #[sqlx(rename = "진행")]
    InProgress,
    #[serde(rename = "종료")]
    #[sqlx(rename = "종료")]
    Closed,
}

impl ProjectStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "대기" => Some(ProjectStatus::Pending),
            "진행" => Some(ProjectStatus::InProgress),
            "종료" => Some(ProjectStatus::Closed),
            _ => None,
        }
    }
}

// ── 작업구분 분류 값 ──
// 각 필드는 아래 고정 목록 중 하나이거나 "필드없음"(null)입니다.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Classification {
    #[serde(rename = "WEB+MW")]
    #[sqlx(rename = "WEB+MW")]
    WebMw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Channel {
    #[serde(rename = "TF팀")]
    #[sqlx(rename = "TF팀")]
    TfTeam,
    #[serde(rename = "TF팀 개발")]
    #[sqlx(rename = "TF팀 개발")]
    TfTeamDevelopment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Service {
    #[serde(rename = "고객지원")]
    #[sqlx(rename = "고객지원")]
    CustomerSupport,
    #[serde(rename = "메인페이지")]
    #[sqlx(rename = "메인페이지")]
    MainPage,
    #[serde(rename = "산업")]
    #[sqlx(rename = "산업")]
    Industry,
    #[serde(rename = "상품/서비스")]
    #[sqlx(rename = "상품/서비스")]
    ProductService,
    #[serde(rename = "인사이트")]
    #[sqlx(rename = "인사이트")]
    Insight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Category {
    #[serde(rename = "콘텐츠 등록")]
    #[sqlx(rename = "콘텐츠 등록")]
    ContentRegistration,
    #[serde(rename = "콘텐츠 수정")]
    #[sqlx(rename = "콘텐츠 수정")]
    ContentRevision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum DeploymentType {
    #[serde(rename = "CMS 등록")]
    #[sqlx(rename = "CMS 등록")]
    CmsRegistration,
    #[serde(rename = "정기배포")]
    #[sqlx(rename = "정기배포")]
    Scheduled,
}

/// 작업 단계 하나 (담당자 이름 + 공수)
///
/// `effort`가 `None`이면 "미입력"이고, `Some(0.0)`은 0으로 입력된 값입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub effort: Option<f64>,
}

/// 고정된 네 가지 작업 단계: 기획, 디자인, 퍼블리싱, 개발
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phases {
    pub planning: Phase,
    pub design: Phase,
    pub publishing: Phase,
    pub development: Phase,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLinks {
    pub plan_link: String,
    pub design_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub status: ProjectStatus,
    pub description: String,
    pub request_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub phases: Phases,
    pub total_effort: Option<f64>,
    pub classification: Option<Classification>,
    pub channel: Option<Channel>,
    pub service: Option<Service>,
    pub category: Option<Category>,
    pub deployment_type: Option<DeploymentType>,
    pub progress: Option<i64>,
    pub link: ProjectLinks,
    pub created_at: String,
    pub updated_at: String,
}

/// `projects` 테이블 한 행. 단계별 컬럼(`planning_name`, `planning_effort`, ...)이
/// 펼쳐져 있으므로 `Project`로 변환해서 사용합니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub status: ProjectStatus,
    pub description: String,
    pub request_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub planning_name: String,
    pub planning_effort: Option<f64>,
    pub design_name: String,
    pub design_effort: Option<f64>,
    pub publishing_name: String,
    pub publishing_effort: Option<f64>,
    pub development_name: String,
    pub development_effort: Option<f64>,
    pub total_effort: Option<f64>,
    pub classification: Option<Classification>,
    pub channel: Option<Channel>,
    pub service: Option<Service>,
    pub category: Option<Category>,
    pub deployment_type: Option<DeploymentType>,
    pub progress: Option<i64>,
    pub plan_link: String,
    pub design_link: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        let title = if row.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            row.title
        };

        Self {
            id: row.id,
            owner_id: row.owner_id,
            title,
            status: row.status,
            description: row.description,
            request_date: row.request_date,
            start_date: row.start_date,
            end_date: row.end_date,
            completion_date: row.completion_date,
            phases: Phases {
                planning: Phase { name: row.planning_name, effort: row.planning_effort },
                design: Phase { name: row.design_name, effort: row.design_effort },
                publishing: Phase { name: row.publishing_name, effort: row.publishing_effort },
                development: Phase { name: row.development_name, effort: row.development_effort },
            },
            total_effort: row.total_effort,
            classification: row.classification,
            channel: row.channel,
            service: row.service,
            category: row.category,
            deployment_type: row.deployment_type,
            progress: row.progress,
            link: ProjectLinks {
                plan_link: row.plan_link,
                design_link: row.design_link,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// 검증이 끝난, 저장할 프로젝트 값
///
/// `total_effort`는 항상 `phases`로부터 계산된 값이어야 합니다.
/// (`services::lifecycle`의 생성 함수들만 이 구조체를 만듭니다)
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub status: ProjectStatus,
    pub description: String,
    pub request_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub phases: Phases,
    pub total_effort: Option<f64>,
    pub classification: Option<Classification>,
    pub channel: Option<Channel>,
    pub service: Option<Service>,
    pub category: Option<Category>,
    pub deployment_type: Option<DeploymentType>,
    pub progress: Option<i64>,
    pub link: ProjectLinks,
}

impl From<&Project> for ProjectDraft {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            status: project.status,
            description: project.description.clone(),
            request_date: project.request_date,
            start_date: project.start_date,
            end_date: project.end_date,
            completion_date: project.completion_date,
            phases: project.phases.clone(),
            total_effort: project.total_effort,
            classification: project.classification,
            channel: project.channel,
            service: project.service,
            category: project.category,
            deployment_type: project.deployment_type,
            progress: project.progress,
            link: project.link.clone(),
        }
    }
}

/// 폼에서 들어오는 공수 값: 숫자 또는 문자열(`""`, `"1.5"` 등)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EffortInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhaseInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub effort: Option<EffortInput>,
}

/// 단계 부분 수정. `effort: null`은 "미입력으로 되돌리기"입니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhasePatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub effort: Option<Option<EffortInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinksPatch {
    pub plan_link: Option<String>,
    pub design_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub request_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub planning: PhaseInput,
    #[serde(default)]
    pub design: PhaseInput,
    #[serde(default)]
    pub publishing: PhaseInput,
    #[serde(default)]
    pub development: PhaseInput,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub classification: Option<Classification>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub channel: Option<Channel>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub service: Option<Service>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub deployment_type: Option<DeploymentType>,
    pub progress: Option<i64>,
    #[serde(default)]
    pub link: ProjectLinks,
}

/// 프로젝트 부분 수정 요청 (`PATCH`)
///
/// - 필드 누락: 변경하지 않음
/// - `null` 또는 `""`: 값을 비움 (`Some(None)`)
/// - 값: 해당 값으로 변경
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub status: Option<ProjectStatus>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "patch_blank_as_none")]
    pub request_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "patch_blank_as_none")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "patch_blank_as_none")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "patch_blank_as_none")]
    pub completion_date: Option<Option<NaiveDate>>,
    pub planning: Option<PhasePatch>,
    pub design: Option<PhasePatch>,
    pub publishing: Option<PhasePatch>,
    pub development: Option<PhasePatch>,
    #[serde(default, deserialize_with = "patch_blank_as_none")]
    pub classification: Option<Option<Classification>>,
    #[serde(default, deserialize_with = "patch_blank_as_none")]
    pub channel: Option<Option<Channel>>,
    #[serde(default, deserialize_with = "patch_blank_as_none")]
    pub service: Option<Option<Service>>,
    #[serde(default, deserialize_with = "patch_blank_as_none")]
    pub category: Option<Option<Category>>,
    #[serde(default, deserialize_with = "patch_blank_as_none")]
    pub deployment_type: Option<Option<DeploymentType>>,
    #[serde(default, deserialize_with = "present")]
    pub progress: Option<Option<i64>>,
    pub link: Option<LinksPatch>,
}

/// `null`, `""`, 공백 문자열을 모두 `None`으로 읽습니다 ("필드없음").
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    use serde::de::IntoDeserializer;

    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let inner: serde::de::value::StrDeserializer<'_, D::Error> = value.into_deserializer();
            T::deserialize(inner).map(Some)
        }
    }
}

fn patch_blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    blank_as_none(deserializer).map(Some)
}

/// 필드가 존재하면(`null` 포함) `Some`으로 감쌉니다.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
