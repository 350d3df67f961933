//! # 프로젝트 생성/수정/복제 값 만들기
//!
//! 요청 본문을 검증해서 `ProjectDraft`로 바꾸는 순수 함수들입니다.
//! `total_effort`는 여기서만 계산되므로, DB에 기록되는 값은 항상 단계 공수와 일치합니다.

use crate::error::AppError;
use crate::models::{
    CreateProjectRequest, Phase, PhaseInput, PhasePatch, Phases, Project, ProjectDraft,
    ProjectStatus, UpdateProjectRequest,
};
use crate::services::effort::{coerce_effort, total_effort};

/// 복제된 프로젝트 제목 뒤에 붙는 표시
pub const COPY_SUFFIX: &str = " (복사본)";

fn validate_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("프로젝트 제목을 입력해주세요".to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_progress(progress: Option<i64>) -> Result<Option<i64>, AppError> {
    match progress {
        Some(value) if !(0..=100).contains(&value) => Err(AppError::BadRequest(
            "진행률은 0에서 100 사이여야 합니다".to_string(),
        )),
        other => Ok(other),
    }
}

fn phase_from_input(input: &PhaseInput) -> Result<Phase, AppError> {
    Ok(Phase {
        name: input.name.trim().to_string(),
        effort: coerce_effort(input.effort.as_ref())?,
    })
}

fn apply_phase_patch(phase: &mut Phase, patch: &PhasePatch) -> Result<(), AppError> {
    if let Some(name) = &patch.name {
        phase.name = name.trim().to_string();
    }
    if let Some(effort) = &patch.effort {
        phase.effort = coerce_effort(effort.as_ref())?;
    }
    Ok(())
}

/// 등록 요청을 검증합니다. 제목과 실 완료일은 필수입니다.
pub fn draft_from_create(req: &CreateProjectRequest) -> Result<ProjectDraft, AppError> {
    let title = validate_title(req.title.as_deref().unwrap_or_default())?;
    if req.completion_date.is_none() {
        return Err(AppError::BadRequest("실 완료일을 입력해주세요".to_string()));
    }

    let phases = Phases {
        planning: phase_from_input(&req.planning)?,
        design: phase_from_input(&req.design)?,
        publishing: phase_from_input(&req.publishing)?,
        development: phase_from_input(&req.development)?,
    };
    let total_effort = total_effort(&phases);

    Ok(ProjectDraft {
        title,
        status: req.status.unwrap_or_default(),
        description: req.description.clone(),
        request_date: req.request_date,
        start_date: req.start_date,
        end_date: req.end_date,
        completion_date: req.completion_date,
        phases,
        total_effort,
        classification: req.classification,
        channel: req.channel,
        service: req.service,
        category: req.category,
        deployment_type: req.deployment_type,
        progress: validate_progress(req.progress)?,
        link: req.link.clone(),
    })
}

/// 저장된 값에 부분 수정 요청을 합치고 총 공수를 다시 계산합니다.
pub fn apply_patch(draft: &mut ProjectDraft, patch: &UpdateProjectRequest) -> Result<(), AppError> {
    if let Some(title) = &patch.title {
        draft.title = validate_title(title)?;
    }
    if let Some(status) = patch.status {
        draft.status = status;
    }
    if let Some(description) = &patch.description {
        draft.description = description.clone();
    }

    if let Some(date) = patch.request_date {
        draft.request_date = date;
    }
    if let Some(date) = patch.start_date {
        draft.start_date = date;
    }
    if let Some(date) = patch.end_date {
        draft.end_date = date;
    }
    if let Some(date) = patch.completion_date {
        if date.is_none() {
            return Err(AppError::BadRequest("실 완료일은 비울 수 없습니다".to_string()));
        }
        draft.completion_date = date;
    }

    for (phase, phase_patch) in [
        (&mut draft.phases.planning, &patch.planning),
        (&mut draft.phases.design, &patch.design),
        (&mut draft.phases.publishing, &patch.publishing),
        (&mut draft.phases.development, &patch.development),
    ] {
        if let Some(phase_patch) = phase_patch {
            apply_phase_patch(phase, phase_patch)?;
        }
    }
    draft.total_effort = total_effort(&draft.phases);

    if let Some(value) = patch.classification {
        draft.classification = value;
    }
    if let Some(value) = patch.channel {
        draft.channel = value;
    }
    if let Some(value) = patch.service {
        draft.service = value;
    }
    if let Some(value) = patch.category {
        draft.category = value;
    }
    if let Some(value) = patch.deployment_type {
        draft.deployment_type = value;
    }
    if let Some(progress) = patch.progress {
        draft.progress = validate_progress(progress)?;
    }
    if let Some(link) = &patch.link {
        if let Some(plan_link) = &link.plan_link {
            draft.link.plan_link = plan_link.clone();
        }
        if let Some(design_link) = &link.design_link {
            draft.link.design_link = design_link.clone();
        }
    }

    Ok(())
}

/// 복제본 값을 만듭니다: 제목에 `(복사본)`, 상태는 대기, 나머지는 그대로.
pub fn duplicate(source: &Project) -> ProjectDraft {
    let mut draft = ProjectDraft::from(source);
    draft.title = format!("{}{}", source.title, COPY_SUFFIX);
    draft.status = ProjectStatus::Pending;
    draft.total_effort = total_effort(&draft.phases);
    draft
}

/// 댓글 내용 검증. 앞뒤 공백을 제거한 내용이 비어 있으면 거부합니다.
pub fn validate_comment(content: &str) -> Result<String, AppError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("댓글 내용을 입력해주세요".to_string()));
    }
    Ok(trimmed.to_string())
}
