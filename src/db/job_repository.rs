use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use crate::api::job::dto::JobFilter;
use crate::api::job::models::JobRecord;
use crate::db::models::JobRow;

const JOB_COLUMNS: &str = "id, title, company_name, location, job_type, salary, \
     description, requirements, responsibilities, application_deadline, created_at";

/// Repository for job posting database operations
pub struct JobRepository;

impl JobRepository {
    /// Fetch all job postings, newest first
    pub async fn find_all(pool: &Pool<Postgres>) -> Result<Vec<JobRow>, sqlx::Error> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC");
        sqlx::query_as::<_, JobRow>(&sql).fetch_all(pool).await
    }

    /// Fetch a single job posting by id
    pub async fn find_by_id(
        pool: &Pool<Postgres>,
        id: Uuid,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a validated job record and return the stored row.
    ///
    /// The id is generated here; `created_at` comes from the column default.
    pub async fn insert(
        pool: &Pool<Postgres>,
        record: &JobRecord,
    ) -> Result<JobRow, sqlx::Error> {
        let id = Uuid::new_v4();
        debug!("Inserting job id={} title={}", id, record.title);

        let sql = format!(
            "INSERT INTO jobs (id, title, company_name, location, job_type, salary, \
             description, requirements, responsibilities, application_deadline) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {JOB_COLUMNS}"
        );
        sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .bind(&record.title)
            .bind(&record.company_name)
            .bind(&record.location)
            .bind(&record.job_type)
            .bind(&record.salary)
            .bind(&record.description)
            .bind(&record.requirements)
            .bind(&record.responsibilities)
            .bind(record.application_deadline)
            .fetch_one(pool)
            .await
    }

    /// Replace every mutable column of an existing job posting.
    ///
    /// `created_at` is never touched. Returns `None` when the id is absent.
    pub async fn update(
        pool: &Pool<Postgres>,
        id: Uuid,
        record: &JobRecord,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Updating job id={}", id);

        let sql = format!(
            "UPDATE jobs SET title = $2, company_name = $3, location = $4, \
             job_type = $5, salary = $6, description = $7, requirements = $8, \
             responsibilities = $9, application_deadline = $10 \
             WHERE id = $1 RETURNING {JOB_COLUMNS}"
        );
        sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .bind(&record.title)
            .bind(&record.company_name)
            .bind(&record.location)
            .bind(&record.job_type)
            .bind(&record.salary)
            .bind(&record.description)
            .bind(&record.requirements)
            .bind(&record.responsibilities)
            .bind(record.application_deadline)
            .fetch_optional(pool)
            .await
    }

    /// Delete a job posting by id. Returns the number of rows removed (0 or 1).
    pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Fetch job postings matching the supplied filter criteria, newest first
    pub async fn filter(
        pool: &Pool<Postgres>,
        filter: &JobFilter,
    ) -> Result<Vec<JobRow>, sqlx::Error> {
        let (sql, binds) = build_filter_sql(filter);
        debug!("Filter query: {}", sql);

        let mut query = sqlx::query_as::<_, JobRow>(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        query.fetch_all(pool).await
    }
}

/// Build the filter SELECT with positional binds.
///
/// Title and location match as case-insensitive substrings; job type matches
/// exactly. Empty-string criteria impose no constraint, mirroring how absent
/// criteria behave. Salary bounds are accepted upstream but contribute no
/// predicate: salary is stored as free-form text, not a numeric range.
fn build_filter_sql(filter: &JobFilter) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut binds: Vec<String> = Vec::new();

    if let Some(title) = filter.job_title.as_deref().filter(|v| !v.is_empty()) {
        binds.push(format!("%{}%", escape_like(title)));
        clauses.push(format!("title ILIKE ${}", binds.len()));
    }
    if let Some(location) = filter.location.as_deref().filter(|v| !v.is_empty()) {
        binds.push(format!("%{}%", escape_like(location)));
        clauses.push(format!("location ILIKE ${}", binds.len()));
    }
    if let Some(job_type) = filter.job_type.as_deref().filter(|v| !v.is_empty()) {
        binds.push(job_type.to_owned());
        clauses.push(format!("job_type = ${}", binds.len()));
    }

    let mut sql = format!("SELECT {JOB_COLUMNS} FROM jobs");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC");

    (sql, binds)
}

/// Escape LIKE metacharacters so user input matches literally
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_builds_unfiltered_list_query() {
        let (sql, binds) = build_filter_sql(&JobFilter::default());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY created_at DESC"));
        assert!(binds.is_empty());
    }

    #[test]
    fn title_filter_builds_case_insensitive_substring_match() {
        let filter = JobFilter {
            job_title: Some("engineer".to_owned()),
            ..JobFilter::default()
        };
        let (sql, binds) = build_filter_sql(&filter);
        assert!(sql.contains("title ILIKE $1"));
        assert_eq!(binds, vec!["%engineer%".to_owned()]);
    }

    #[test]
    fn job_type_filter_matches_exactly() {
        let filter = JobFilter {
            job_type: Some("Full-time".to_owned()),
            ..JobFilter::default()
        };
        let (sql, binds) = build_filter_sql(&filter);
        assert!(sql.contains("job_type = $1"));
        assert!(!sql.contains("ILIKE $1"));
        assert_eq!(binds, vec!["Full-time".to_owned()]);
    }

    #[test]
    fn combined_criteria_are_and_joined_with_sequential_binds() {
        let filter = JobFilter {
            job_title: Some("dev".to_owned()),
            location: Some("berlin".to_owned()),
            job_type: Some("Contract".to_owned()),
            ..JobFilter::default()
        };
        let (sql, binds) = build_filter_sql(&filter);
        assert!(sql.contains("title ILIKE $1 AND location ILIKE $2 AND job_type = $3"));
        assert_eq!(binds.len(), 3);
    }

    #[test]
    fn salary_bounds_contribute_no_predicate() {
        let filter = JobFilter {
            min_salary: Some(serde_json::json!(50000)),
            max_salary: Some(serde_json::json!("80000")),
            ..JobFilter::default()
        };
        let (sql, binds) = build_filter_sql(&filter);
        let (unfiltered_sql, _) = build_filter_sql(&JobFilter::default());
        assert_eq!(sql, unfiltered_sql);
        assert!(binds.is_empty());
    }

    #[test]
    fn empty_string_criteria_impose_no_constraint() {
        let filter = JobFilter {
            job_title: Some(String::new()),
            location: Some(String::new()),
            ..JobFilter::default()
        };
        let (sql, binds) = build_filter_sql(&filter);
        assert!(!sql.contains("WHERE"));
        assert!(binds.is_empty());
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        let filter = JobFilter {
            job_title: Some("100%_rust\\dev".to_owned()),
            ..JobFilter::default()
        };
        let (_, binds) = build_filter_sql(&filter);
        assert_eq!(binds, vec!["%100\\%\\_rust\\\\dev%".to_owned()]);
    }
}
