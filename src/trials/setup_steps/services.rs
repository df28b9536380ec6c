use super::models::{ActiveModel, Column, Entity, RetryReport, SetupAction, SetupStep};
use crate::common::errors::{BusinessError, BusinessResult, DbErrorExt};
use crate::common::identity::Actor;
use crate::trials::{attachments, tasks, team};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

/// Executes one secondary write against an existing trial
pub async fn run_action<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    action: &SetupAction,
    actor: Option<&Actor>,
) -> BusinessResult<()> {
    match action {
        SetupAction::TeamMember { user_id, role } => {
            team::services::add_team_member(db, trial_id, *user_id, *role).await?;
        }
        SetupAction::Task(task) => {
            tasks::services::create_task(db, trial_id, task.clone()).await?;
        }
        SetupAction::Attachment(attachment) => {
            attachments::services::record_attachment(db, trial_id, attachment.clone(), actor)
                .await?;
        }
    }
    Ok(())
}

pub async fn list_setup_steps<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
) -> BusinessResult<Vec<SetupStep>> {
    Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_setup_step"))
}

pub async fn record_failed_step<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    action: &SetupAction,
    error: &BusinessError,
) -> BusinessResult<SetupStep> {
    let payload = serde_json::to_value(action).map_err(|e| BusinessError::InternalError {
        message: format!("Could not serialize setup step: {e}"),
    })?;
    let now = chrono::Utc::now();

    let step = ActiveModel {
        id: Set(Uuid::new_v4()),
        trial_id: Set(trial_id),
        step_kind: Set(action.kind()),
        payload: Set(payload),
        last_error: Set(error.to_string()),
        attempts: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    };

    step.insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_setup_step"))
}

async fn mark_attempt_failed<C: ConnectionTrait>(
    db: &C,
    step: SetupStep,
    error: &BusinessError,
) -> BusinessResult<SetupStep> {
    let attempts = step.attempts.saturating_add(1);
    let mut active: ActiveModel = step.into();
    active.attempts = Set(attempts);
    active.last_error = Set(error.to_string());
    active.updated_at = Set(chrono::Utc::now());

    active
        .update(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_setup_step"))
}

/// Replays every recorded step of a trial in recording order. A step that
/// now succeeds is removed; one that fails again keeps its record with the
/// attempt counter bumped and the latest error.
pub async fn retry_setup_steps<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    actor: Option<&Actor>,
) -> BusinessResult<RetryReport> {
    let mut report = RetryReport::default();

    for step in list_setup_steps(db, trial_id).await? {
        let outcome = match step.action() {
            Ok(action) => run_action(db, trial_id, &action, actor).await,
            Err(e) => Err(BusinessError::InternalError {
                message: format!("Unreadable setup step payload: {e}"),
            }),
        };

        match outcome {
            Ok(()) => {
                Entity::delete_by_id(step.id)
                    .exec(db)
                    .await
                    .map_err(|e| e.to_business_error("field_trial_setup_step"))?;
                report.resolved += 1;
            }
            Err(err) => {
                tracing::warn!(
                    "Setup step {} of trial {trial_id} failed again: {err}",
                    step.id
                );
                report
                    .still_failing
                    .push(mark_attempt_failed(db, step, &err).await?);
            }
        }
    }

    tracing::info!(
        "Retried setup steps for trial {trial_id}: {} resolved, {} still failing",
        report.resolved,
        report.still_failing.len()
    );
    Ok(report)
}
