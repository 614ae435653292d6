use crate::persistence::SnippetModel;
use crate::repository::snippet_repository::SnippetRepository;
use crate::service::draft::{CatalogRules, SnippetDraft};
use crate::service::error::{ServiceError, map_db_error};
use crate::service::filter::SnippetFilter;
use crate::service::seed::seed_drafts;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

fn snippet_not_found(id: &str) -> ServiceError {
    ServiceError::not_found(format!("snippet with id={id} was not found"))
}

/// Ids are store-assigned integers; anything else cannot name a snippet.
fn parse_id(raw: &str) -> Result<i32, ServiceError> {
    raw.trim().parse().map_err(|_| snippet_not_found(raw))
}

#[derive(Clone)]
pub(crate) struct SnippetService {
    db: Arc<DatabaseConnection>,
    rules: Arc<CatalogRules>,
}

impl SnippetService {
    pub(crate) fn new(db: Arc<DatabaseConnection>, rules: CatalogRules) -> Self {
        Self {
            db,
            rules: Arc::new(rules),
        }
    }

    pub(crate) async fn list(&self, filter: SnippetFilter) -> Result<Vec<SnippetModel>, ServiceError> {
        let filter = filter.normalized();
        let records = SnippetRepository::list_records(
            self.db.as_ref(),
            filter.language.as_deref(),
            filter.category.as_deref(),
        )
        .await
        .map_err(map_db_error)?;

        let matched: Vec<SnippetModel> = records
            .into_iter()
            .filter(|snippet| filter.matches(snippet))
            .collect();

        debug!(
            search = ?filter.search,
            language = ?filter.language,
            category = ?filter.category,
            matched = matched.len(),
            "Listed snippets"
        );
        Ok(matched)
    }

    pub(crate) async fn get(&self, id: &str) -> Result<SnippetModel, ServiceError> {
        let key = parse_id(id)?;
        SnippetRepository::find_by_id(self.db.as_ref(), key)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| snippet_not_found(id))
    }

    pub(crate) async fn create(&self, payload: Value) -> Result<SnippetModel, ServiceError> {
        let draft = SnippetDraft::from_payload(&payload, &self.rules)?;

        let created = SnippetRepository::insert(self.db.as_ref(), draft.into_new_active_model())
            .await
            .map_err(map_db_error)?;

        info!(snippet_id = created.id, language = %created.language, "Snippet created");
        Ok(created)
    }

    pub(crate) async fn update(&self, id: &str, payload: Value) -> Result<SnippetModel, ServiceError> {
        let key = parse_id(id)?;
        let draft = SnippetDraft::from_payload(&payload, &self.rules)?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let existing = SnippetRepository::find_by_id(&txn, key)
            .await
            .map_err(map_db_error)?;
        if existing.is_none() {
            return Err(snippet_not_found(id));
        }

        let updated = SnippetRepository::update(&txn, draft.into_replacement(key))
            .await
            .map_err(map_db_error)?;

        txn.commit().await.map_err(map_db_error)?;
        info!(snippet_id = updated.id, "Snippet replaced");
        Ok(updated)
    }

    pub(crate) async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let key = parse_id(id)?;
        let rows_affected = SnippetRepository::delete_by_id(self.db.as_ref(), key)
            .await
            .map_err(map_db_error)?;
        if rows_affected == 0 {
            return Err(snippet_not_found(id));
        }

        info!(snippet_id = key, "Snippet deleted");
        Ok(())
    }

    /// Replaces the whole catalog with the bundled demo snippets.
    pub(crate) async fn seed(&self) -> Result<usize, ServiceError> {
        let (drafts, skipped): (Vec<_>, Vec<_>) = seed_drafts()?
            .into_iter()
            .partition(|draft| self.rules.allows(draft));
        let count = drafts.len();
        if !skipped.is_empty() {
            debug!(
                skipped = skipped.len(),
                "Seed records outside the label allow-lists were left out"
            );
        }

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let removed = SnippetRepository::delete_all(&txn)
            .await
            .map_err(map_db_error)?;
        SnippetRepository::insert_many(
            &txn,
            drafts
                .into_iter()
                .map(SnippetDraft::into_new_active_model)
                .collect(),
        )
        .await
        .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        info!(removed, inserted = count, "Snippet catalog seeded");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::error::ServiceErrorKind;
    use crate::test_support::memory_db;
    use serde_json::json;

    async fn service() -> SnippetService {
        SnippetService::new(memory_db().await, CatalogRules::default())
    }

    fn payload(title: &str, code: &str, language: &str, category: &str) -> Value {
        json!({
            "title": title,
            "code": code,
            "language": language,
            "category": category
        })
    }

    fn search(term: &str) -> SnippetFilter {
        SnippetFilter {
            search: Some(term.to_string()),
            ..SnippetFilter::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let service = service().await;

        let first = service
            .create(payload("Sort", "v.sort()", "Python", "Backend"))
            .await
            .unwrap();
        let second = service
            .create(payload("Sort", "v.sort()", "Python", "Backend"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        let all = service.list(SnippetFilter::default()).await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn list_searches_title_description_and_code() {
        let service = service().await;
        let by_title = service
            .create(payload("Deep Clone", "clone(obj)", "JavaScript", "Frontend"))
            .await
            .unwrap();
        let by_description = service
            .create(json!({
                "title": "Copy",
                "description": "Makes a DEEP copy",
                "code": "copy.deepcopy(x)",
                "language": "Python",
                "category": "Backend"
            }))
            .await
            .unwrap();
        let by_code = service
            .create(payload("Walk", "deep_walk(tree)", "Rust", "Backend"))
            .await
            .unwrap();
        service
            .create(payload("Unrelated", "noop()", "Go", "Backend"))
            .await
            .unwrap();

        let found = service.list(search("deep")).await.unwrap();
        assert_eq!(found, vec![by_title, by_description, by_code]);
    }

    #[tokio::test]
    async fn list_applies_exact_filters_with_and() {
        let service = service().await;
        let python_backend = service
            .create(payload("Sort", "v.sort()", "Python", "Backend"))
            .await
            .unwrap();
        service
            .create(payload("Sort", "v.sort()", "Python", "Datenanalyse"))
            .await
            .unwrap();
        service
            .create(payload("Sort", "sort(v)", "Go", "Backend"))
            .await
            .unwrap();

        let found = service
            .list(SnippetFilter {
                search: Some("SORT".to_string()),
                language: Some("Python".to_string()),
                category: Some("Backend".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found, vec![python_backend]);

        let none = service
            .list(SnippetFilter {
                language: Some("python".to_string()),
                ..SnippetFilter::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn list_is_repeatable() {
        let service = service().await;
        service
            .create(payload("Sort", "v.sort()", "Python", "Backend"))
            .await
            .unwrap();

        let first = service.list(search("sort")).await.unwrap();
        let second = service.list(search("sort")).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let service = service().await;
        let created = service
            .create(json!({
                "title": "Sort",
                "description": "old description",
                "code": "v.sort()",
                "language": "Python",
                "category": "Backend"
            }))
            .await
            .unwrap();
        let id = created.id.to_string();

        let updated = service
            .update(&id, payload("Sort list", "sorted(v)", "Python", "Algorithmus"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Sort list");
        assert_eq!(updated.description, "");
        assert_eq!(updated.category, "Algorithmus");
        assert_eq!(service.get(&id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_and_creates_nothing() {
        let service = service().await;

        let error = service
            .update("42", payload("Sort", "v.sort()", "Python", "Backend"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ServiceErrorKind::NotFound);

        let error = service
            .update("not-an-id", payload("Sort", "v.sort()", "Python", "Backend"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ServiceErrorKind::NotFound);

        assert!(service.list(SnippetFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_with_invalid_body_keeps_the_record() {
        let service = service().await;
        let created = service
            .create(payload("Sort", "v.sort()", "Python", "Backend"))
            .await
            .unwrap();
        let id = created.id.to_string();

        let error = service
            .update(&id, json!({"title": "", "code": "x", "language": "Go", "category": "Backend"}))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ServiceErrorKind::Validation);
        assert_eq!(service.get(&id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn delete_removes_record_and_reports_unknown_ids() {
        let service = service().await;
        let created = service
            .create(payload("Sort", "v.sort()", "Python", "Backend"))
            .await
            .unwrap();
        let id = created.id.to_string();

        service.delete(&id).await.unwrap();

        assert_eq!(
            service.get(&id).await.unwrap_err().kind(),
            ServiceErrorKind::NotFound
        );
        assert!(service.list(search("sort")).await.unwrap().is_empty());
        assert_eq!(
            service.delete(&id).await.unwrap_err().kind(),
            ServiceErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn create_rejects_invalid_payload() {
        let service = service().await;

        let error = service
            .create(json!({"title": "Sort", "language": "Python", "category": "Backend"}))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ServiceErrorKind::Validation);
        assert!(service.list(SnippetFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn allow_list_is_enforced_on_writes_only() {
        let rules = CatalogRules {
            languages: None,
            categories: Some(vec!["Backend".to_string()]),
        };
        let service = SnippetService::new(memory_db().await, rules);

        let error = service
            .create(payload("Sort", "v.sort()", "Python", "Frontend"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ServiceErrorKind::Validation);

        let listed = service
            .list(SnippetFilter {
                category: Some("Frontend".to_string()),
                ..SnippetFilter::default()
            })
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn seed_replaces_existing_catalog() {
        let service = service().await;
        let stale = service
            .create(payload("Stale", "old()", "Go", "Backend"))
            .await
            .unwrap();

        let count = service.seed().await.unwrap();

        let all = service.list(SnippetFilter::default()).await.unwrap();
        assert_eq!(all.len(), count);
        assert!(all.iter().all(|snippet| snippet.title != stale.title));

        let python = service
            .list(SnippetFilter {
                language: Some("Python".to_string()),
                ..SnippetFilter::default()
            })
            .await
            .unwrap();
        assert!(!python.is_empty());
        assert!(python.iter().all(|snippet| snippet.language == "Python"));
    }

    #[tokio::test]
    async fn seed_keeps_only_allowed_labels() {
        let rules = CatalogRules {
            languages: Some(vec!["JavaScript".to_string(), "Python".to_string()]),
            categories: None,
        };
        let service = SnippetService::new(memory_db().await, rules);

        let count = service.seed().await.unwrap();
        let all = service.list(SnippetFilter::default()).await.unwrap();

        assert!(count > 0);
        assert_eq!(all.len(), count);
        assert!(
            all.iter()
                .all(|snippet| snippet.language == "JavaScript" || snippet.language == "Python")
        );

        let seeded = &all[0];
        let id = seeded.id.to_string();
        let updated = service
            .update(
                &id,
                json!({
                    "title": seeded.title,
                    "description": seeded.description,
                    "code": seeded.code,
                    "language": seeded.language,
                    "category": seeded.category,
                }),
            )
            .await
            .unwrap();
        assert_eq!(&updated, seeded);
    }
}
