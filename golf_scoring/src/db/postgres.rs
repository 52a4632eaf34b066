//! PostgreSQL scoring store.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    PgConnection, PgExecutor, PgPool, Postgres, QueryBuilder, Row, postgres::PgRow, types::Json,
};
use std::collections::BTreeMap;

use super::errors::{StoreError, StoreResult};
use super::repository::{
    CompetitionRepository, EnrollmentDirectory, FinalizeInputs, ParticipantRepository,
    ResultBuild, ResultRepository, ScorecardEdit,
};
use crate::competition::{
    Competition, CompetitionId, CompetitionResult, Participant, ParticipantId, PointsTemplate,
    ScoringType, StandingsScope,
};
use crate::scorecard::{HandicapSnapshot, HoleScore, ManualScore, PlayerHandicap, ScoreCard};

const COMPETITION_COLUMNS: &str = r#"
    c.id, c.name, c.series_id, c.tour_id, c.starts_at, c.start_mode, c.open_until,
    c.pars, c.points_multiplier, c.scoring_mode, c.results_finalized,
    t.name AS template_name, t.points AS template_points, t.default_points
"#;

/// Result rows per INSERT, well below the bind parameter limit
const INSERT_BATCH: usize = 1000;

const RESULT_COLUMNS: &str = r#"
    r.competition_id, r.participant_id, r.entity_id, r.entity_name, r.position,
    r.points, r.gross_score, r.net_score, r.relative_to_par, r.scoring_type
"#;

/// Scoring store backed by PostgreSQL
#[derive(Clone)]
pub struct PgScoringStore {
    pool: PgPool,
}

impl PgScoringStore {
    /// Create a store over an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_column<T>(value: &str, column: &str) -> StoreResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| StoreError::Corrupt(format!("{column}: {e}")))
}

fn to_db_int(value: u32, column: &str) -> StoreResult<i32> {
    i32::try_from(value).map_err(|_| StoreError::Corrupt(format!("{column} out of range: {value}")))
}

fn from_db_int(value: Option<i32>, column: &str) -> StoreResult<Option<u32>> {
    value
        .map(|v| u32::try_from(v).map_err(|_| StoreError::Corrupt(format!("{column}: {v}"))))
        .transpose()
}

fn competition_from_row(row: &PgRow) -> StoreResult<Competition> {
    let template_name: Option<String> = row.try_get("template_name")?;
    let points_template = match template_name {
        Some(name) => {
            let Json(points): Json<BTreeMap<String, i64>> = row.try_get("template_points")?;
            Some(PointsTemplate {
                name,
                points,
                default: row.try_get("default_points")?,
            })
        }
        None => None,
    };

    let Json(pars): Json<Vec<u8>> = row.try_get("pars")?;
    let start_mode: String = row.try_get("start_mode")?;
    let scoring_mode: String = row.try_get("scoring_mode")?;

    Ok(Competition {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        series_id: row.try_get("series_id")?,
        tour_id: row.try_get("tour_id")?,
        starts_at: row.try_get("starts_at")?,
        start_mode: parse_column(&start_mode, "start_mode")?,
        open_until: row.try_get("open_until")?,
        pars,
        points_multiplier: row.try_get("points_multiplier")?,
        points_template,
        scoring_mode: parse_column(&scoring_mode, "scoring_mode")?,
        results_finalized: row.try_get("results_finalized")?,
    })
}

fn participant_from_row(row: &PgRow) -> StoreResult<Participant> {
    let Json(holes): Json<Vec<HoleScore>> = row.try_get("hole_scores")?;
    let mut scorecard = ScoreCard::from_holes(holes);
    scorecard.locked = row.try_get("locked")?;
    scorecard.locked_at = row.try_get("locked_at")?;
    scorecard.disqualified = row.try_get("disqualified")?;
    scorecard.manual = ManualScore {
        out: from_db_int(row.try_get("manual_out")?, "manual_out")?,
        in_: from_db_int(row.try_get("manual_in")?, "manual_in")?,
        total: from_db_int(row.try_get("manual_total")?, "manual_total")?,
    };

    let snapshot: Option<f64> = row.try_get("handicap_snapshot")?;
    let captured_at: Option<DateTime<Utc>> = row.try_get("handicap_captured_at")?;
    scorecard.handicap_snapshot = match (snapshot, captured_at) {
        (Some(value), Some(captured_at)) => Some(HandicapSnapshot { value, captured_at }),
        (None, None) => None,
        _ => {
            return Err(StoreError::Corrupt(
                "handicap snapshot without capture time".to_string(),
            ));
        }
    };

    Ok(Participant {
        id: row.try_get("id")?,
        competition_id: row.try_get("competition_id")?,
        entity_id: row.try_get("entity_id")?,
        entity_name: row.try_get("entity_name")?,
        player_id: row.try_get("player_id")?,
        scorecard,
    })
}

fn result_from_row(row: &PgRow) -> StoreResult<CompetitionResult> {
    let position: i32 = row.try_get("position")?;
    let scoring_type: String = row.try_get("scoring_type")?;

    Ok(CompetitionResult {
        competition_id: row.try_get("competition_id")?,
        participant_id: row.try_get("participant_id")?,
        entity_id: row.try_get("entity_id")?,
        entity_name: row.try_get("entity_name")?,
        position: u32::try_from(position)
            .map_err(|_| StoreError::Corrupt(format!("position: {position}")))?,
        points: row.try_get("points")?,
        gross_score: row.try_get("gross_score")?,
        net_score: row.try_get("net_score")?,
        relative_to_par: row.try_get("relative_to_par")?,
        scoring_type: parse_column(&scoring_type, "scoring_type")?,
    })
}


const PARTICIPANT_COLUMNS: &str = r#"
    id, competition_id, entity_id, entity_name, player_id, hole_scores, locked, locked_at,
    disqualified, manual_out, manual_in, manual_total, handicap_snapshot, handicap_captured_at
"#;

/// Load a competition, optionally taking its row lock
///
/// The row lock is the per-competition critical section shared by every
/// scorecard edit and result rebuild, in this process or any other.
async fn load_competition<'e, E>(
    executor: E,
    id: CompetitionId,
    for_update: bool,
) -> StoreResult<Option<Competition>>
where
    E: PgExecutor<'e>,
{
    let lock = if for_update { "FOR UPDATE OF c" } else { "" };
    let sql = format!(
        "SELECT {COMPETITION_COLUMNS} FROM competitions c
         LEFT JOIN points_templates t ON t.id = c.points_template_id
         WHERE c.id = $1
         {lock}"
    );
    sqlx::query(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .as_ref()
        .map(competition_from_row)
        .transpose()
}

async fn load_participant<'e, E>(executor: E, id: ParticipantId) -> StoreResult<Option<Participant>>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = $1");
    sqlx::query(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .as_ref()
        .map(participant_from_row)
        .transpose()
}

async fn load_participants<'e, E>(
    executor: E,
    competition_id: CompetitionId,
) -> StoreResult<Vec<Participant>>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE competition_id = $1 ORDER BY id"
    );
    sqlx::query(&sql)
        .bind(competition_id)
        .fetch_all(executor)
        .await?
        .iter()
        .map(participant_from_row)
        .collect()
}

async fn write_scorecard<'e, E>(
    executor: E,
    participant_id: ParticipantId,
    card: &ScoreCard,
) -> StoreResult<()>
where
    E: PgExecutor<'e>,
{
    let manual = card.manual;
    let result = sqlx::query(
        r#"
        UPDATE participants
        SET hole_scores = $2, locked = $3, locked_at = $4, disqualified = $5,
            manual_out = $6, manual_in = $7, manual_total = $8,
            handicap_snapshot = $9, handicap_captured_at = $10
        WHERE id = $1
        "#,
    )
    .bind(participant_id)
    .bind(Json(card.holes().to_vec()))
    .bind(card.locked)
    .bind(card.locked_at)
    .bind(card.disqualified)
    .bind(manual.out.map(|v| to_db_int(v, "manual_out")).transpose()?)
    .bind(manual.in_.map(|v| to_db_int(v, "manual_in")).transpose()?)
    .bind(manual.total.map(|v| to_db_int(v, "manual_total")).transpose()?)
    .bind(card.handicap_snapshot.map(|s| s.value))
    .bind(card.handicap_snapshot.map(|s| s.captured_at))
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::Corrupt(format!(
            "participant {} does not exist",
            participant_id
        )));
    }
    Ok(())
}

async fn count_active_enrollments<'e, E>(
    executor: E,
    competition: &Competition,
) -> StoreResult<Option<usize>>
where
    E: PgExecutor<'e>,
{
    let Some(tour_id) = competition.tour_id else {
        return Ok(None);
    };

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM tour_enrollments WHERE tour_id = $1 AND status = 'active'",
    )
    .bind(tour_id)
    .fetch_one(executor)
    .await?;

    usize::try_from(count)
        .map(Some)
        .map_err(|_| StoreError::Corrupt(format!("enrollment count: {count}")))
}

/// Replace a locked competition's result rows and mark it finalized
async fn write_results(
    conn: &mut PgConnection,
    competition_id: CompetitionId,
    results: &[CompetitionResult],
) -> StoreResult<()> {
    let mut positions = Vec::with_capacity(results.len());
    for row in results {
        if row.competition_id != competition_id {
            return Err(StoreError::Corrupt(format!(
                "result row for competition {} in set for {}",
                row.competition_id, competition_id
            )));
        }
        positions.push(to_db_int(row.position, "position")?);
    }

    sqlx::query("DELETE FROM competition_results WHERE competition_id = $1")
        .bind(competition_id)
        .execute(&mut *conn)
        .await?;

    for (rows, positions) in results.chunks(INSERT_BATCH).zip(positions.chunks(INSERT_BATCH)) {
        let mut insert = QueryBuilder::<Postgres>::new(
            "INSERT INTO competition_results
                (competition_id, participant_id, entity_id, entity_name, position,
                 points, gross_score, net_score, relative_to_par, scoring_type) ",
        );
        insert.push_values(rows.iter().zip(positions), |mut values, (row, &position)| {
            values
                .push_bind(row.competition_id)
                .push_bind(row.participant_id)
                .push_bind(row.entity_id)
                .push_bind(row.entity_name.as_str())
                .push_bind(position)
                .push_bind(row.points)
                .push_bind(row.gross_score)
                .push_bind(row.net_score)
                .push_bind(row.relative_to_par)
                .push_bind(row.scoring_type.to_string());
        });
        insert.build().execute(&mut *conn).await?;
    }

    sqlx::query("UPDATE competitions SET results_finalized = TRUE WHERE id = $1")
        .bind(competition_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

#[async_trait]
impl CompetitionRepository for PgScoringStore {
    async fn get_competition(&self, id: CompetitionId) -> StoreResult<Option<Competition>> {
        load_competition(&self.pool, id, false).await
    }

    async fn competitions_in_scope(&self, scope: StandingsScope) -> StoreResult<Vec<Competition>> {
        let (column, id) = scope_filter(scope);
        let sql = format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions c
             LEFT JOIN points_templates t ON t.id = c.points_template_id
             WHERE c.{column} = $1
             ORDER BY c.starts_at, c.id"
        );
        sqlx::query(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(competition_from_row)
            .collect()
    }
}

#[async_trait]
impl ParticipantRepository for PgScoringStore {
    async fn get_participant(&self, id: ParticipantId) -> StoreResult<Option<Participant>> {
        load_participant(&self.pool, id).await
    }

    async fn list_participants(
        &self,
        competition_id: CompetitionId,
    ) -> StoreResult<Vec<Participant>> {
        load_participants(&self.pool, competition_id).await
    }

    async fn save_scorecard(
        &self,
        participant_id: ParticipantId,
        card: &ScoreCard,
    ) -> StoreResult<()> {
        write_scorecard(&self.pool, participant_id, card).await
    }

    async fn edit_scorecard(
        &self,
        participant_id: ParticipantId,
        edit: ScorecardEdit<'_>,
    ) -> StoreResult<Option<Participant>> {
        let mut tx = self.pool.begin().await?;

        let competition_id: Option<CompetitionId> =
            sqlx::query_scalar("SELECT competition_id FROM participants WHERE id = $1")
                .bind(participant_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(competition_id) = competition_id else {
            return Ok(None);
        };

        sqlx::query("SELECT id FROM competitions WHERE id = $1 FOR UPDATE")
            .bind(competition_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(mut participant) = load_participant(&mut *tx, participant_id).await? else {
            return Ok(None);
        };
        if edit(&mut participant) {
            write_scorecard(&mut *tx, participant_id, &participant.scorecard).await?;
            tx.commit().await?;
            return Ok(Some(participant));
        }

        tx.rollback().await?;
        load_participant(&self.pool, participant_id).await
    }
}

#[async_trait]
impl ResultRepository for PgScoringStore {
    async fn replace_results(
        &self,
        competition_id: CompetitionId,
        results: Vec<CompetitionResult>,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM competitions WHERE id = $1 FOR UPDATE")
            .bind(competition_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                StoreError::Corrupt(format!("competition {} does not exist", competition_id))
            })?;

        write_results(&mut tx, competition_id, &results).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn rebuild_results(
        &self,
        competition_id: CompetitionId,
        build: ResultBuild<'_>,
    ) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let Some(competition) = load_competition(&mut *tx, competition_id, true).await? else {
            return Ok(false);
        };
        let participants = load_participants(&mut *tx, competition_id).await?;
        let active_enrollments = count_active_enrollments(&mut *tx, &competition).await?;
        let inputs = FinalizeInputs {
            competition,
            participants,
            active_enrollments,
        };

        match build(&inputs) {
            Some(results) => {
                write_results(&mut tx, competition_id, &results).await?;
                tx.commit().await?;
            }
            None => tx.rollback().await?,
        }
        Ok(true)
    }

    async fn competition_results(
        &self,
        competition_id: CompetitionId,
    ) -> StoreResult<Vec<CompetitionResult>> {
        let sql = format!(
            "SELECT {RESULT_COLUMNS} FROM competition_results r
             WHERE r.competition_id = $1
             ORDER BY r.scoring_type, r.id"
        );
        sqlx::query(&sql)
            .bind(competition_id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(result_from_row)
            .collect()
    }

    async fn scope_results(
        &self,
        scope: StandingsScope,
        scoring_type: ScoringType,
    ) -> StoreResult<Vec<CompetitionResult>> {
        let (column, id) = scope_filter(scope);
        let sql = format!(
            "SELECT {RESULT_COLUMNS} FROM competition_results r
             JOIN competitions c ON c.id = r.competition_id
             WHERE c.{column} = $1 AND c.results_finalized AND r.scoring_type = $2
             ORDER BY c.starts_at, r.id"
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(scoring_type.to_string())
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(result_from_row)
            .collect()
    }
}

#[async_trait]
impl EnrollmentDirectory for PgScoringStore {
    async fn player_handicap(&self, participant: &Participant) -> StoreResult<PlayerHandicap> {
        let Some(player_id) = participant.player_id else {
            return Ok(PlayerHandicap::default());
        };

        let row = sqlx::query(
            r#"
            SELECT
                (SELECT handicap_index FROM player_handicaps WHERE player_id = $1) AS base,
                (SELECT e.playing_handicap
                 FROM tour_enrollments e
                 JOIN competitions c ON c.tour_id = e.tour_id
                 WHERE c.id = $2 AND e.player_id = $1 AND e.status = 'active') AS tour_playing
            "#,
        )
        .bind(player_id)
        .bind(participant.competition_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(PlayerHandicap {
            base: row.try_get("base")?,
            tour_playing: row.try_get("tour_playing")?,
        })
    }

    async fn active_enrollment_count(
        &self,
        competition: &Competition,
    ) -> StoreResult<Option<usize>> {
        count_active_enrollments(&self.pool, competition).await
    }
}

fn scope_filter(scope: StandingsScope) -> (&'static str, i64) {
    match scope {
        StandingsScope::Series(id) => ("series_id", id),
        StandingsScope::Tour(id) => ("tour_id", id),
    }
}
