use super::attachments::models::Attachment;
use super::models::Trial;
use super::notes::models::Note;
use super::services::get_trial;
use super::tasks::models::Task;
use super::team::models::TeamMember;
use super::{attachments, notes, tasks, team};
use crate::common::errors::BusinessResult;
use crate::common::fetch::{bounded, fail_soft};
use crate::common::state::AppState;
use crate::layouts::models::Layout;
use crate::measurements::models::MeasurementEntry;
use crate::plots::models::Plot;
use crate::treatments::models::Treatment;
use crate::variables::models::Variable;
use crate::{layouts, measurements, plots, treatments, variables};
use serde::Serialize;
use uuid::Uuid;

/// Everything the trial detail screen shows, loaded in one go
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrialDetail {
    pub trial: Trial,
    pub layout: Option<Layout>,
    pub treatments: Vec<Treatment>,
    pub variables: Vec<Variable>,
    pub plots: Vec<Plot>,
    pub entries: Vec<MeasurementEntry>,
    pub team: Vec<TeamMember>,
    pub tasks: Vec<Task>,
    pub attachments: Vec<Attachment>,
    pub notes: Vec<Note>,
}

/// Loads a trial and its catalogs.
///
/// The trial itself is required. The other collections are fetched
/// concurrently, each under the configured timeout, and an unavailable one
/// shows up empty instead of failing the whole view.
pub async fn get_trial_detail(state: &AppState, id: Uuid) -> BusinessResult<TrialDetail> {
    let db = &state.db;
    let limit = state.config.request_timeout;

    let trial = bounded("get_trial", limit, get_trial(db, id)).await?;

    let (layout, treatments, variables, plots, entries, team, tasks, attachments, notes) =
        tokio::join!(
            fail_soft("get_layout", limit, layouts::services::get_layout(db, id)),
            fail_soft(
                "list_treatments",
                limit,
                treatments::services::list_treatments(db, id)
            ),
            fail_soft(
                "list_variables",
                limit,
                variables::services::list_variables(db, id)
            ),
            fail_soft("list_plots", limit, plots::services::list_plots(db, id)),
            fail_soft(
                "list_measurements",
                limit,
                measurements::services::list_measurements(db, id)
            ),
            fail_soft(
                "list_team_members",
                limit,
                team::services::list_team_members(db, id)
            ),
            fail_soft("list_tasks", limit, tasks::services::list_tasks(db, id)),
            fail_soft(
                "list_attachments",
                limit,
                attachments::services::list_attachments(db, id)
            ),
            fail_soft("list_notes", limit, notes::services::list_notes(db, id)),
        );

    tracing::debug!(
        "Loaded trial {id}: {} treatments, {} variables, {} plots, {} entries",
        treatments.len(),
        variables.len(),
        plots.len(),
        entries.len()
    );

    Ok(TrialDetail {
        trial,
        layout,
        treatments,
        variables,
        plots,
        entries,
        team,
        tasks,
        attachments,
        notes,
    })
}
