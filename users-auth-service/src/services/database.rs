//! Credential store: durable identities, credentials and role profiles.
//!
//! PostgreSQL adapter built on sqlx runtime queries, plus an in-memory
//! implementation with the same transactional guarantees for tests.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{Postgres, Transaction};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::models::{normalize_skills, NewCandidate, NewRecruiter, NewUser, Role, StoredCredential};
use crate::services::ServiceError;
use crate::utils::PasswordHashString;

/// Unique constraint guarding `auth.login`.
const LOGIN_UNIQUE_CONSTRAINT: &str = "auth_login_key";

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `WrongCredential` when no credential has this login.
    async fn find_credential(&self, login: &str) -> Result<StoredCredential, ServiceError>;

    async fn login_taken(&self, login: &str) -> Result<bool, ServiceError>;

    /// Identity, candidate profile, skills and credential in one transaction.
    async fn register_candidate(&self, candidate: &NewCandidate) -> Result<(), ServiceError>;

    /// Identity, company (found or created), recruiter profile and credential in one transaction.
    async fn register_recruiter(&self, recruiter: &NewRecruiter) -> Result<(), ServiceError>;

    /// Whether the identity owns a profile of the given role.
    async fn profile_exists(&self, public_id: Uuid, role: Role) -> Result<bool, ServiceError>;

    async fn health_check(&self) -> Result<(), ServiceError>;
}

/// PostgreSQL credential store.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    timeout: Duration,
}

impl Database {
    /// Create a new database wrapper from a connection pool.
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn finish(
        tx: Transaction<'static, Postgres>,
        result: Result<(), sqlx::Error>,
        login: &str,
    ) -> Result<(), ServiceError> {
        match result {
            Ok(()) => {
                tx.commit().await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to commit registration");
                    map_registration_error(e, login)
                })?;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Registration step failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Failed to roll back registration");
                }
                Err(map_registration_error(e, login))
            }
        }
    }
}

/// A login collision lost at insert time is still a duplicate; anything else is internal.
fn map_registration_error(err: sqlx::Error, login: &str) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some(LOGIN_UNIQUE_CONSTRAINT) {
            tracing::warn!(login = %login, "Login claimed concurrently during registration");
            return ServiceError::UsernameExists;
        }
    }
    ServiceError::from(err)
}

/// Base `users` row; returns its internal id and public id.
async fn insert_user(
    tx: &mut Transaction<'static, Postgres>,
    user: &NewUser,
) -> Result<(i64, Uuid), sqlx::Error> {
    sqlx::query_as::<_, (i64, Uuid)>(
        r#"
        INSERT INTO users (first_name, last_name)
        VALUES ($1, $2)
        RETURNING id, public_id
        "#,
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .fetch_one(&mut **tx)
    .await
}

async fn insert_credential(
    tx: &mut Transaction<'static, Postgres>,
    user_id: i64,
    user: &NewUser,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO auth (user_id, login, password) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(&user.login)
        .bind(user.password_hash.as_str())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn insert_candidate(
    tx: &mut Transaction<'static, Postgres>,
    candidate: &NewCandidate,
) -> Result<(), sqlx::Error> {
    let (user_id, public_id) = insert_user(tx, &candidate.user).await?;

    let candidate_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO candidates (public_id, current_position, resume, bio, education)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(public_id)
    .bind(&candidate.current_position)
    .bind(&candidate.resume)
    .bind(&candidate.bio)
    .bind(&candidate.education)
    .fetch_one(&mut **tx)
    .await?;

    for skill in normalize_skills(&candidate.skills) {
        // Insert-or-get in one statement so concurrent sign-ups share the row.
        let skill_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO skills (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(&skill)
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO candidate_skills (candidate_id, skill_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(candidate_id)
        .bind(skill_id)
        .execute(&mut **tx)
        .await?;
    }

    insert_credential(tx, user_id, &candidate.user).await?;

    tracing::debug!(user_public_id = %public_id, "Candidate rows staged");
    Ok(())
}

async fn insert_recruiter(
    tx: &mut Transaction<'static, Postgres>,
    recruiter: &NewRecruiter,
) -> Result<(), sqlx::Error> {
    let (user_id, public_id) = insert_user(tx, &recruiter.user).await?;

    let company_public_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO companies (name) VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING public_id
        "#,
    )
    .bind(recruiter.company_name.trim())
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query("INSERT INTO recruiters (public_id, company_public_id) VALUES ($1, $2)")
        .bind(public_id)
        .bind(company_public_id)
        .execute(&mut **tx)
        .await?;

    insert_credential(tx, user_id, &recruiter.user).await?;

    tracing::debug!(
        user_public_id = %public_id,
        company_public_id = %company_public_id,
        "Recruiter rows staged"
    );
    Ok(())
}

#[async_trait]
impl CredentialStore for Database {
    async fn find_credential(&self, login: &str) -> Result<StoredCredential, ServiceError> {
        let row = tokio::time::timeout(
            self.timeout,
            sqlx::query_as::<_, (Uuid, String)>(
                r#"
                SELECT u.public_id, a.password
                FROM users AS u
                JOIN auth AS a ON u.id = a.user_id
                WHERE a.login = $1
                "#,
            )
            .bind(login)
            .fetch_optional(&self.pool),
        )
        .await?
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load credential");
            ServiceError::from(e)
        })?;

        match row {
            Some((public_id, password_hash)) => Ok(StoredCredential {
                public_id,
                password_hash: PasswordHashString::new(password_hash),
            }),
            None => Err(ServiceError::WrongCredential),
        }
    }

    async fn login_taken(&self, login: &str) -> Result<bool, ServiceError> {
        let exists: bool = tokio::time::timeout(
            self.timeout,
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM auth WHERE login = $1)")
                .bind(login)
                .fetch_one(&self.pool),
        )
        .await?
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to check login existence");
            ServiceError::from(e)
        })?;
        Ok(exists)
    }

    async fn register_candidate(&self, candidate: &NewCandidate) -> Result<(), ServiceError> {
        tokio::time::timeout(self.timeout, async {
            let mut tx = self.pool.begin().await?;
            let result = insert_candidate(&mut tx, candidate).await;
            Self::finish(tx, result, &candidate.user.login).await
        })
        .await?
    }

    async fn register_recruiter(&self, recruiter: &NewRecruiter) -> Result<(), ServiceError> {
        tokio::time::timeout(self.timeout, async {
            let mut tx = self.pool.begin().await?;
            let result = insert_recruiter(&mut tx, recruiter).await;
            Self::finish(tx, result, &recruiter.user.login).await
        })
        .await?
    }

    async fn profile_exists(&self, public_id: Uuid, role: Role) -> Result<bool, ServiceError> {
        let query = match role {
            Role::Candidate => "SELECT EXISTS(SELECT 1 FROM candidates WHERE public_id = $1)",
            Role::Recruiter => "SELECT EXISTS(SELECT 1 FROM recruiters WHERE public_id = $1)",
        };

        let exists: bool = tokio::time::timeout(
            self.timeout,
            sqlx::query_scalar(query).bind(public_id).fetch_one(&self.pool),
        )
        .await?
        .map_err(|e| {
            tracing::error!(role = %role, error = %e, "Failed to check profile existence");
            ServiceError::from(e)
        })?;
        Ok(exists)
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        tokio::time::timeout(self.timeout, sqlx::query("SELECT 1").execute(&self.pool))
            .await?
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                ServiceError::from(e)
            })?;
        Ok(())
    }
}

/// Row counts of the in-memory store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub users: usize,
    pub credentials: usize,
    pub candidates: usize,
    pub recruiters: usize,
    pub companies: usize,
    pub skills: usize,
    pub candidate_skills: usize,
}

#[derive(Clone, Default)]
struct Tables {
    users: Vec<Uuid>,
    credentials: HashMap<String, (Uuid, PasswordHashString)>,
    candidates: HashSet<Uuid>,
    recruiters: HashMap<Uuid, Uuid>,
    companies: HashMap<String, Uuid>,
    skills: HashMap<String, i64>,
    candidate_skills: HashSet<(Uuid, i64)>,
}

impl Tables {
    fn insert_user(&mut self, user: &NewUser) -> Result<Uuid, ServiceError> {
        if self.credentials.contains_key(&user.login) {
            return Err(ServiceError::UsernameExists);
        }
        let public_id = Uuid::new_v4();
        self.users.push(public_id);
        Ok(public_id)
    }

    fn insert_credential(&mut self, public_id: Uuid, user: &NewUser) {
        self.credentials
            .insert(user.login.clone(), (public_id, user.password_hash.clone()));
    }

    fn skill_id(&mut self, name: &str) -> i64 {
        let next = self.skills.len() as i64 + 1;
        *self.skills.entry(name.to_string()).or_insert(next)
    }
}

/// Credential store kept in process memory.
///
/// Each registration is staged on a copy of the tables and swapped in only
/// when every step succeeds, so a failed registration leaves no rows behind.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    tables: Mutex<Tables>,
    fail_registrations: AtomicBool,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following registration fail after its profile rows were staged.
    pub fn fail_registrations(&self, fail: bool) {
        self.fail_registrations.store(fail, Ordering::SeqCst);
    }

    /// Credential whose identity has no role profile at all.
    pub fn insert_orphan_credential(
        &self,
        login: &str,
        password_hash: PasswordHashString,
    ) -> Result<Uuid, ServiceError> {
        let mut tables = self.lock()?;
        let user = NewUser {
            login: login.to_string(),
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
        };
        let public_id = tables.insert_user(&user)?;
        tables.insert_credential(public_id, &user);
        Ok(public_id)
    }

    pub fn counts(&self) -> RowCounts {
        self.tables
            .lock()
            .map(|t| RowCounts {
                users: t.users.len(),
                credentials: t.credentials.len(),
                candidates: t.candidates.len(),
                recruiters: t.recruiters.len(),
                companies: t.companies.len(),
                skills: t.skills.len(),
                candidate_skills: t.candidate_skills.len(),
            })
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, ServiceError> {
        self.tables
            .lock()
            .map_err(|e| ServiceError::internal("Credential store mutex poisoned", e))
    }

    fn injected_failure(&self) -> Result<(), ServiceError> {
        if self.fail_registrations.load(Ordering::SeqCst) {
            return Err(ServiceError::internal(
                "Registration aborted",
                "injected storage failure",
            ));
        }
        Ok(())
    }

    fn transaction<F>(&self, steps: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut Tables) -> Result<(), ServiceError>,
    {
        let mut tables = self.lock()?;
        let mut staged = tables.clone();
        steps(&mut staged)?;
        *tables = staged;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_credential(&self, login: &str) -> Result<StoredCredential, ServiceError> {
        self.lock()?
            .credentials
            .get(login)
            .map(|(public_id, password_hash)| StoredCredential {
                public_id: *public_id,
                password_hash: password_hash.clone(),
            })
            .ok_or(ServiceError::WrongCredential)
    }

    async fn login_taken(&self, login: &str) -> Result<bool, ServiceError> {
        Ok(self.lock()?.credentials.contains_key(login))
    }

    async fn register_candidate(&self, candidate: &NewCandidate) -> Result<(), ServiceError> {
        self.transaction(|tables| {
            let public_id = tables.insert_user(&candidate.user)?;
            tables.candidates.insert(public_id);
            for skill in normalize_skills(&candidate.skills) {
                let skill_id = tables.skill_id(&skill);
                tables.candidate_skills.insert((public_id, skill_id));
            }
            self.injected_failure()?;
            tables.insert_credential(public_id, &candidate.user);
            Ok(())
        })
    }

    async fn register_recruiter(&self, recruiter: &NewRecruiter) -> Result<(), ServiceError> {
        self.transaction(|tables| {
            let public_id = tables.insert_user(&recruiter.user)?;
            let company_id = *tables
                .companies
                .entry(recruiter.company_name.trim().to_string())
                .or_insert_with(Uuid::new_v4);
            tables.recruiters.insert(public_id, company_id);
            self.injected_failure()?;
            tables.insert_credential(public_id, &recruiter.user);
            Ok(())
        })
    }

    async fn profile_exists(&self, public_id: Uuid, role: Role) -> Result<bool, ServiceError> {
        let tables = self.lock()?;
        Ok(match role {
            Role::Candidate => tables.candidates.contains(&public_id),
            Role::Recruiter => tables.recruiters.contains_key(&public_id),
        })
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(login: &str) -> NewUser {
        NewUser {
            login: login.to_string(),
            password_hash: PasswordHashString::new("$argon2id$stub".to_string()),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
        }
    }

    fn candidate(login: &str, skills: &[&str]) -> NewCandidate {
        NewCandidate {
            user: new_user(login),
            resume: "resume.pdf".to_string(),
            current_position: "Engineer".to_string(),
            bio: String::new(),
            education: "BSc".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_candidate_registration_writes_all_rows() {
        let store = InMemoryCredentialStore::new();
        store
            .register_candidate(&candidate("alice", &["go", "sql"]))
            .await
            .unwrap();

        let counts = store.counts();
        assert_eq!(counts.users, 1);
        assert_eq!(counts.credentials, 1);
        assert_eq!(counts.candidates, 1);
        assert_eq!(counts.skills, 2);
        assert_eq!(counts.candidate_skills, 2);

        let credential = store.find_credential("alice").await.unwrap();
        assert!(store
            .profile_exists(credential.public_id, Role::Candidate)
            .await
            .unwrap());
        assert!(!store
            .profile_exists(credential.public_id, Role::Recruiter)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_skills_and_companies_are_reused() {
        let store = InMemoryCredentialStore::new();
        store
            .register_candidate(&candidate("alice", &["go", "sql"]))
            .await
            .unwrap();
        store
            .register_candidate(&candidate("bob", &["go", "rust"]))
            .await
            .unwrap();
        assert_eq!(store.counts().skills, 3);

        for login in ["carol", "dave"] {
            store
                .register_recruiter(&NewRecruiter {
                    user: new_user(login),
                    company_name: "Acme".to_string(),
                })
                .await
                .unwrap();
        }
        assert_eq!(store.counts().companies, 1);
        assert_eq!(store.counts().recruiters, 2);
    }

    #[tokio::test]
    async fn test_failed_registration_leaves_no_rows() {
        let store = InMemoryCredentialStore::new();
        store.fail_registrations(true);

        let result = store.register_candidate(&candidate("alice", &["go"])).await;
        assert!(matches!(result, Err(ServiceError::Internal(_))));
        assert_eq!(store.counts(), RowCounts::default());
        assert!(!store.login_taken("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_login_rejected_atomically() {
        let store = InMemoryCredentialStore::new();
        store.register_candidate(&candidate("alice", &[])).await.unwrap();
        let before = store.counts();

        let result = store
            .register_recruiter(&NewRecruiter {
                user: new_user("alice"),
                company_name: "Acme".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ServiceError::UsernameExists)));
        assert_eq!(store.counts(), before);
    }

    #[tokio::test]
    async fn test_unknown_login_is_wrong_credential() {
        let store = InMemoryCredentialStore::new();
        assert!(matches!(
            store.find_credential("nobody").await,
            Err(ServiceError::WrongCredential)
        ));
    }

    async fn postgres() -> Database {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/users_auth_test".to_string());
        let pool = PgPool::connect(&url).await.expect("Failed to connect to PostgreSQL");
        crate::db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        Database::new(pool, Duration::from_secs(5))
    }

    /// Login, last name and skill prefix unique to one test run.
    fn marker() -> String {
        format!("pg-{}", Uuid::new_v4().simple())
    }

    fn marked_candidate(marker: &str, login: &str, skills: &[String]) -> NewCandidate {
        let mut candidate = candidate(login, &[]);
        candidate.user.last_name = marker.to_string();
        candidate.skills = skills.to_vec();
        candidate
    }

    fn marked_recruiter(marker: &str, login: &str, company: &str) -> NewRecruiter {
        let mut user = new_user(login);
        user.last_name = marker.to_string();
        NewRecruiter {
            user,
            company_name: company.to_string(),
        }
    }

    async fn count(db: &Database, sql: &str, value: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .bind(value)
            .fetch_one(&db.pool)
            .await
            .expect("Count query failed")
    }

    async fn users_with_last_name(db: &Database, marker: &str) -> i64 {
        count(db, "SELECT COUNT(*) FROM users WHERE last_name = $1", marker).await
    }

    async fn skills_with_prefix(db: &Database, marker: &str) -> i64 {
        count(
            db,
            "SELECT COUNT(*) FROM skills WHERE name LIKE $1 || '%'",
            marker,
        )
        .await
    }

    async fn candidate_skills_of(db: &Database, public_id: Uuid) -> i64 {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM candidate_skills AS cs
            JOIN candidates AS c ON c.id = cs.candidate_id
            WHERE c.public_id = $1
            "#,
        )
        .bind(public_id)
        .fetch_one(&db.pool)
        .await
        .expect("Count query failed")
    }

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL
    async fn test_postgres_candidate_registration() {
        let db = postgres().await;
        let marker = marker();
        let skills = vec![format!("{marker}-go"), format!("{marker}-sql")];

        db.register_candidate(&marked_candidate(&marker, &marker, &skills))
            .await
            .expect("Registration failed");

        assert!(db.login_taken(&marker).await.unwrap());
        assert_eq!(users_with_last_name(&db, &marker).await, 1);
        assert_eq!(skills_with_prefix(&db, &marker).await, 2);

        let credential = db.find_credential(&marker).await.unwrap();
        assert_eq!(credential.password_hash.as_str(), "$argon2id$stub");
        assert_eq!(candidate_skills_of(&db, credential.public_id).await, 2);
        assert!(db
            .profile_exists(credential.public_id, Role::Candidate)
            .await
            .unwrap());
        assert!(!db
            .profile_exists(credential.public_id, Role::Recruiter)
            .await
            .unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL
    async fn test_postgres_failed_step_rolls_back() {
        let db = postgres().await;
        let marker = marker();
        // PostgreSQL rejects NUL in text, so the skill insert fails after the
        // user and candidate rows were written.
        let skills = vec![format!("{marker}-go"), format!("{marker}-bad\0")];

        let result = db
            .register_candidate(&marked_candidate(&marker, &marker, &skills))
            .await;

        assert!(matches!(result, Err(ServiceError::Internal(_))));
        assert_eq!(users_with_last_name(&db, &marker).await, 0);
        assert_eq!(skills_with_prefix(&db, &marker).await, 0);
        assert!(!db.login_taken(&marker).await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL
    async fn test_postgres_skills_and_companies_shared() {
        let db = postgres().await;
        let marker = marker();
        let shared = format!("{marker}-rust");
        let company = format!("{marker} Corp");

        db.register_candidate(&marked_candidate(
            &marker,
            &format!("{marker}-a"),
            &[shared.clone(), format!("{marker}-go")],
        ))
        .await
        .unwrap();
        db.register_candidate(&marked_candidate(
            &marker,
            &format!("{marker}-b"),
            &[shared.clone()],
        ))
        .await
        .unwrap();
        assert_eq!(skills_with_prefix(&db, &marker).await, 2);

        db.register_recruiter(&marked_recruiter(&marker, &format!("{marker}-c"), &company))
            .await
            .unwrap();
        db.register_recruiter(&marked_recruiter(
            &marker,
            &format!("{marker}-d"),
            &format!("  {company} "),
        ))
        .await
        .unwrap();

        assert_eq!(
            count(&db, "SELECT COUNT(*) FROM companies WHERE name = $1", &company).await,
            1
        );
        assert_eq!(
            count(
                &db,
                r#"
                SELECT COUNT(*)
                FROM recruiters AS r
                JOIN companies AS c ON c.public_id = r.company_public_id
                WHERE c.name = $1
                "#,
                &company,
            )
            .await,
            2
        );

        let recruiter = db.find_credential(&format!("{marker}-c")).await.unwrap();
        assert!(db
            .profile_exists(recruiter.public_id, Role::Recruiter)
            .await
            .unwrap());
        assert!(!db
            .profile_exists(recruiter.public_id, Role::Candidate)
            .await
            .unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL
    async fn test_postgres_duplicate_login_is_username_exists() {
        let db = postgres().await;
        let marker = marker();
        let first = marked_candidate(&marker, &marker, &[format!("{marker}-go")]);
        let second = marked_recruiter(&marker, &marker, &format!("{marker} Corp"));

        // Both skip the pre-check, so the unique constraint decides.
        let (a, b) = tokio::join!(db.register_candidate(&first), db.register_recruiter(&second));

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(ServiceError::UsernameExists))));
        assert_eq!(users_with_last_name(&db, &marker).await, 1);

        let again = db
            .register_recruiter(&marked_recruiter(&marker, &marker, "Other"))
            .await;
        assert!(matches!(again, Err(ServiceError::UsernameExists)));
        assert_eq!(users_with_last_name(&db, &marker).await, 1);
    }

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL
    async fn test_postgres_unknown_login_is_wrong_credential() {
        let db = postgres().await;
        assert!(matches!(
            db.find_credential(&marker()).await,
            Err(ServiceError::WrongCredential)
        ));
        assert!(!db.profile_exists(Uuid::new_v4(), Role::Candidate).await.unwrap());
        db.health_check().await.unwrap();
    }
}
