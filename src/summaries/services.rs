//! Derived views over already-loaded collections. Apart from
//! [`list_trial_cards`] nothing here touches the store.

use super::models::{
    ENTRIES_PER_PAGE, EntryFilter, Page, TrialCard, TrialKpis, TrialListingFilter, TrialSummary,
};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::fetch::{bounded, fail_soft};
use crate::common::state::AppState;
use crate::measurements::models::MeasurementEntry;
use crate::plots::models::Plot;
use crate::treatments::models::Treatment;
use crate::trials::models::{Trial, TrialScope, TrialStatus};
use crate::trials::services::list_trials;
use crate::variables::models::Variable;
use crate::{layouts, measurements, treatments, variables};
use futures::future::join_all;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

/// Entries passing `filter`, most recent measurement date first. Entries on
/// the same date keep their incoming order.
pub fn filter_and_sort(
    entries: &[MeasurementEntry],
    filter: &EntryFilter,
) -> Vec<MeasurementEntry> {
    let mut selected: Vec<MeasurementEntry> = entries
        .iter()
        .filter(|entry| filter.matches(entry))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.measurement_date.cmp(&a.measurement_date));
    selected
}

/// Cuts page `requested` (1-based) out of `items`. Out-of-range requests are
/// clamped; an empty list still has page 1.
pub fn paginate<T: Clone>(items: &[T], requested: usize) -> Page<T> {
    let total = items.len();
    let page_count = total.div_ceil(ENTRIES_PER_PAGE);
    let page = requested.clamp(1, page_count.max(1));

    let start = ((page - 1) * ENTRIES_PER_PAGE).min(total);
    let end = (start + ENTRIES_PER_PAGE).min(total);

    Page {
        items: items[start..end].to_vec(),
        page,
        page_count,
        total,
    }
}

pub fn summarize_trial(
    trial_id: Uuid,
    treatments: &[Treatment],
    variables: &[Variable],
    plots: &[Plot],
    entries: &[MeasurementEntry],
) -> TrialSummary {
    let mut dates: Vec<_> = entries.iter().map(|entry| entry.measurement_date).collect();
    dates.sort_unstable();
    dates.dedup();

    TrialSummary {
        trial_id,
        treatments: treatments.len(),
        variables: variables.len(),
        plots: plots.len(),
        entries: entries.len(),
        collection_dates: dates.len(),
    }
}

fn push_distinct_label(values: &mut Vec<String>, value: Option<&str>) {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return;
    };
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

/// Rollup over the overview list
pub fn trial_kpis(cards: &[TrialCard]) -> TrialKpis {
    let mut kpis = TrialKpis {
        total: cards.len(),
        ..TrialKpis::default()
    };

    for card in cards {
        match card.trial.status {
            TrialStatus::Active => kpis.active += 1,
            TrialStatus::Completed => kpis.completed += 1,
            TrialStatus::Planned | TrialStatus::Cancelled => {}
        }
        if card.entries_count > 0 {
            kpis.with_entries += 1;
        }
        push_distinct_label(&mut kpis.trial_types, card.trial.trial_type.as_deref());
        push_distinct_label(&mut kpis.crops, Some(card.trial.crop.as_str()));
    }

    kpis
}

pub fn filter_trials<'a>(trials: &'a [Trial], filter: &TrialListingFilter) -> Vec<&'a Trial> {
    trials.iter().filter(|trial| filter.matches(trial)).collect()
}

async fn count_treatments<C: ConnectionTrait>(db: &C, trial_id: Uuid) -> BusinessResult<u64> {
    treatments::models::Entity::find()
        .filter(treatments::models::Column::TrialId.eq(trial_id))
        .count(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_treatment"))
}

async fn count_variables<C: ConnectionTrait>(db: &C, trial_id: Uuid) -> BusinessResult<u64> {
    variables::models::Entity::find()
        .filter(variables::models::Column::TrialId.eq(trial_id))
        .count(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_variable"))
}

async fn count_entries<C: ConnectionTrait>(db: &C, trial_id: Uuid) -> BusinessResult<u64> {
    measurements::models::Entity::find()
        .filter(measurements::models::Column::TrialId.eq(trial_id))
        .count(db)
        .await
        .map_err(|e| e.to_business_error("field_trial_data"))
}

async fn load_card(state: &AppState, trial: Trial) -> TrialCard {
    let db = &state.db;
    let limit = state.config.request_timeout;
    let id = trial.id;

    let (layout, treatments_count, variables_count, entries_count) = tokio::join!(
        fail_soft("get_layout", limit, layouts::services::get_layout(db, id)),
        fail_soft("count_treatments", limit, count_treatments(db, id)),
        fail_soft("count_variables", limit, count_variables(db, id)),
        fail_soft("count_entries", limit, count_entries(db, id)),
    );

    TrialCard {
        trial,
        layout,
        treatments_count,
        variables_count,
        entries_count,
    }
}

/// Every trial with its layout and catalog sizes. The trial list itself must
/// load; per-trial details that fail show up as absent or zero.
pub async fn list_trial_cards(state: &AppState) -> BusinessResult<Vec<TrialCard>> {
    let trials = bounded(
        "list_trials",
        state.config.request_timeout,
        list_trials(&state.db, TrialScope::Public),
    )
    .await?;

    Ok(join_all(trials.into_iter().map(|trial| load_card(state, trial))).await)
}
