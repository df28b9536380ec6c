use super::codes::next_trial_code;
use super::models::{
    ActiveModel, Column, Entity, IdList, StringList, Trial, TrialCreate, TrialCreateWithDetails,
    TrialCreation, TrialScope, TrialUpdate,
};
use super::setup_steps::models::SetupAction;
use super::tasks::models::{TaskCreate, TaskPriority};
use super::{attachments, notes, setup_steps, tasks, team};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::identity::Actor;
use crate::{layouts, measurements, not_found, plots, treatments, validation_error, variables};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

pub use super::setup_steps::services::retry_setup_steps;

async fn latest_trial_code<C: ConnectionTrait>(db: &C) -> BusinessResult<Option<String>> {
    let latest = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial"))?;
    Ok(latest.map(|trial| trial.trial_code))
}

pub async fn create_trial<C: ConnectionTrait>(db: &C, data: TrialCreate) -> BusinessResult<Trial> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err(validation_error!("name", "Trial name is required."));
    }

    let trial_code = match data
        .trial_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
    {
        Some(code) => code.to_string(),
        None => next_trial_code(latest_trial_code(db).await?.as_deref()),
    };

    let now = chrono::Utc::now();
    let trial = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        trial_code: Set(trial_code),
        crop: Set(data.crop),
        variety_hybrid: Set(data.variety_hybrid),
        trial_type: Set(data.trial_type),
        season: Set(data.season),
        start_date: Set(data.start_date),
        end_date: Set(data.end_date),
        status: Set(data.status),
        objective: Set(data.objective),
        farm_name: Set(data.farm_name),
        field_location: Set(data.field_location),
        gps_coordinates: Set(data.gps_coordinates),
        trial_area: Set(data.trial_area),
        responsible_agronomist_id: Set(data.responsible_agronomist_id),
        responsible_agronomist_ids: Set(IdList(data.responsible_agronomist_ids)),
        tags: Set(StringList(data.tags)),
        trial_category: Set(data.trial_category),
        budget: Set(data.budget),
        spent: Set(data.spent.unwrap_or(Decimal::ZERO)),
        completion_percentage: Set(data.completion_percentage.unwrap_or(0)),
        notifications_enabled: Set(data.notifications_enabled.unwrap_or(false)),
        is_draft: Set(data.is_draft.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let trial = trial
        .insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial"))?;
    tracing::info!("Created trial {} ({})", trial.trial_code, trial.id);
    Ok(trial)
}

pub async fn get_trial<C: ConnectionTrait>(db: &C, id: Uuid) -> BusinessResult<Trial> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial"))?
        .ok_or_else(|| not_found!("Field trial", id))
}

/// Trials visible under `scope`, newest first
pub async fn list_trials<C: ConnectionTrait>(
    db: &C,
    scope: TrialScope,
) -> BusinessResult<Vec<Trial>> {
    let trials = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial"))?;

    let user_id = match scope {
        TrialScope::Public => return Ok(trials),
        TrialScope::AssignedTo(user_id) => user_id,
    };

    let member_of = match team::services::trial_ids_for_user(db, user_id).await {
        Ok(ids) => ids,
        Err(err) => {
            tracing::warn!(
                "Team lookup for user {user_id} failed, using agronomist matches only: {err}"
            );
            Vec::new()
        }
    };

    Ok(trials
        .into_iter()
        .filter(|trial| trial.is_led_by(user_id) || member_of.contains(&trial.id))
        .collect())
}

pub async fn update_trial<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    data: TrialUpdate,
) -> BusinessResult<Trial> {
    let existing = get_trial(db, id).await?;
    let mut trial: ActiveModel = existing.into();

    if let Some(name) = data.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(validation_error!("name", "Trial name is required."));
        }
        trial.name = Set(name);
    }
    if let Some(crop) = data.crop {
        trial.crop = Set(crop);
    }
    if let Some(variety_hybrid) = data.variety_hybrid {
        trial.variety_hybrid = Set(variety_hybrid);
    }
    if let Some(trial_type) = data.trial_type {
        trial.trial_type = Set(trial_type);
    }
    if let Some(season) = data.season {
        trial.season = Set(season);
    }
    if let Some(start_date) = data.start_date {
        trial.start_date = Set(start_date);
    }
    if let Some(end_date) = data.end_date {
        trial.end_date = Set(end_date);
    }
    if let Some(status) = data.status {
        trial.status = Set(status);
    }
    if let Some(objective) = data.objective {
        trial.objective = Set(objective);
    }
    if let Some(farm_name) = data.farm_name {
        trial.farm_name = Set(farm_name);
    }
    if let Some(field_location) = data.field_location {
        trial.field_location = Set(field_location);
    }
    if let Some(gps_coordinates) = data.gps_coordinates {
        trial.gps_coordinates = Set(gps_coordinates);
    }
    if let Some(trial_area) = data.trial_area {
        trial.trial_area = Set(trial_area);
    }
    if let Some(responsible_agronomist_id) = data.responsible_agronomist_id {
        trial.responsible_agronomist_id = Set(responsible_agronomist_id);
    }
    if let Some(ids) = data.responsible_agronomist_ids {
        trial.responsible_agronomist_ids = Set(IdList(ids));
    }
    if let Some(tags) = data.tags {
        trial.tags = Set(StringList(tags));
    }
    if let Some(trial_category) = data.trial_category {
        trial.trial_category = Set(trial_category);
    }
    if let Some(budget) = data.budget {
        trial.budget = Set(budget);
    }
    if let Some(spent) = data.spent {
        trial.spent = Set(spent);
    }
    if let Some(completion_percentage) = data.completion_percentage {
        trial.completion_percentage = Set(completion_percentage);
    }
    if let Some(notifications_enabled) = data.notifications_enabled {
        trial.notifications_enabled = Set(notifications_enabled);
    }
    if let Some(is_draft) = data.is_draft {
        trial.is_draft = Set(is_draft);
    }
    trial.updated_at = Set(chrono::Utc::now());

    trial
        .update(db)
        .await
        .map_err(|e| e.to_business_error("field_trial"))
}

/// Deletes a trial and everything recorded against it in one transaction
pub async fn delete_trial(db: &DatabaseConnection, id: Uuid) -> BusinessResult<()> {
    get_trial(db, id).await?;

    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error("field_trial"))?;

    measurements::models::Entity::delete_many()
        .filter(measurements::models::Column::TrialId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_data"))?;
    plots::models::Entity::delete_many()
        .filter(plots::models::Column::TrialId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_plot"))?;
    treatments::models::Entity::delete_many()
        .filter(treatments::models::Column::TrialId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))?;
    variables::models::Entity::delete_many()
        .filter(variables::models::Column::TrialId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_variable"))?;
    layouts::models::Entity::delete_many()
        .filter(layouts::models::Column::TrialId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_layout"))?;
    team::models::Entity::delete_many()
        .filter(team::models::Column::TrialId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_team"))?;
    tasks::models::Entity::delete_many()
        .filter(tasks::models::Column::TrialId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_task"))?;
    attachments::models::Entity::delete_many()
        .filter(attachments::models::Column::TrialId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_attachment"))?;
    notes::models::Entity::delete_many()
        .filter(notes::models::Column::TrialId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_note"))?;
    setup_steps::models::Entity::delete_many()
        .filter(setup_steps::models::Column::TrialId.eq(id))
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial_setup_step"))?;
    Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(|e| e.to_business_error("field_trial"))?;

    txn.commit()
        .await
        .map_err(|e| e.to_business_error("field_trial"))?;
    tracing::info!("Deleted trial {id} with all dependent records");
    Ok(())
}

/// Secondary writes derived from the wizard payload, in execution order
fn setup_actions(details: &TrialCreateWithDetails, trial: &Trial) -> Vec<SetupAction> {
    let mut actions = Vec::new();

    for user_id in &details.collaborators {
        actions.push(SetupAction::TeamMember {
            user_id: *user_id,
            role: details.roles.get(user_id).copied().unwrap_or_default(),
        });
    }

    for draft in &details.tasks {
        let title = draft
            .name
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty());
        let (Some(title), Some(due_date)) = (title, draft.date) else {
            continue;
        };
        actions.push(SetupAction::Task(TaskCreate {
            title: title.to_string(),
            description: draft.description.clone(),
            due_date,
            status: draft.status.unwrap_or_default(),
            responsible_person_id: draft.responsible.or(trial.responsible_agronomist_id),
            priority: TaskPriority::Medium,
        }));
    }

    for attachment in &details.attachments {
        actions.push(SetupAction::Attachment(attachment.clone()));
    }

    actions
}

/// Creates a trial, then its team, tasks and attachment records one by one.
///
/// Only the trial insert can fail the call. A failing secondary write is
/// logged and recorded as a setup step against the trial so it can be
/// replayed with [`retry_setup_steps`]; it never rolls the trial back.
pub async fn create_trial_with_details<C: ConnectionTrait>(
    db: &C,
    details: TrialCreateWithDetails,
    actor: Option<&Actor>,
) -> BusinessResult<TrialCreation> {
    let trial = create_trial(db, details.trial.clone()).await?;
    let mut failed_steps = Vec::new();

    for action in setup_actions(&details, &trial) {
        let Err(err) = setup_steps::services::run_action(db, trial.id, &action, actor).await else {
            continue;
        };
        tracing::warn!(
            "Setup step {:?} for trial {} failed: {err}",
            action.kind(),
            trial.id
        );
        match setup_steps::services::record_failed_step(db, trial.id, &action, &err).await {
            Ok(step) => failed_steps.push(step),
            Err(record_err) => {
                tracing::warn!(
                    "Could not record failed setup step for trial {}: {record_err}",
                    trial.id
                );
            }
        }
    }

    Ok(TrialCreation {
        trial,
        failed_steps,
    })
}
