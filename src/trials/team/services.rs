use super::models::{ActiveModel, Column, Entity, TeamMember, TeamRole};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::not_found;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

pub async fn list_team_members<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
) -> BusinessResult<Vec<TeamMember>> {
    Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .order_by_asc(Column::AddedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_team"))
}

pub async fn add_team_member<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    user_id: Uuid,
    role: TeamRole,
) -> BusinessResult<TeamMember> {
    let member = ActiveModel {
        id: Set(Uuid::new_v4()),
        trial_id: Set(trial_id),
        user_id: Set(user_id),
        role: Set(role),
        added_at: Set(chrono::Utc::now()),
    };

    member
        .insert(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_team"))
}

pub async fn update_team_member_role<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    user_id: Uuid,
    role: TeamRole,
) -> BusinessResult<TeamMember> {
    let existing = Entity::find()
        .filter(Column::TrialId.eq(trial_id))
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_team"))?
        .ok_or_else(|| not_found!("Team member", user_id))?;

    let mut member: ActiveModel = existing.into();
    member.role = Set(role);
    member
        .update(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_team"))
}

pub async fn remove_team_member<C: ConnectionTrait>(
    db: &C,
    trial_id: Uuid,
    user_id: Uuid,
) -> BusinessResult<()> {
    Entity::delete_many()
        .filter(Column::TrialId.eq(trial_id))
        .filter(Column::UserId.eq(user_id))
        .exec(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_team"))?;
    Ok(())
}

/// Trials the user is a member of, in any role
pub async fn trial_ids_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> BusinessResult<Vec<Uuid>> {
    Entity::find()
        .select_only()
        .column(Column::TrialId)
        .filter(Column::UserId.eq(user_id))
        .into_tuple::<Uuid>()
        .all(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_team"))
}
