//! In-memory fakes and fixtures shared by the orchestrator tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pubwatch_core::NormalizedPost;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::store::{Company, CompanyDirectory, ContentStore, StoreError, StoredRecord};
use pubwatch_scraper::FetchClient;

pub fn fetch_client() -> FetchClient {
    FetchClient::new(5, "pubwatch-test/1.0").unwrap()
}

pub fn mem_company(name: &str, medium_url: Option<String>) -> Company {
    Company {
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        medium_url,
        mirror_url: None,
        paragraph_url: None,
    }
}

pub async fn serve_profile(route: &str, html: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;
    server
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

pub struct MemDirectory {
    companies: Vec<Company>,
    fail_list: AtomicBool,
}

impl MemDirectory {
    pub fn new(companies: Vec<Company>) -> Self {
        Self {
            companies,
            fail_list: AtomicBool::new(false),
        }
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CompanyDirectory for MemDirectory {
    async fn list_active(&self) -> Result<Vec<Company>, StoreError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("directory offline".to_string()));
        }
        Ok(self.companies.clone())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Company>, StoreError> {
        Ok(self
            .companies
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned())
    }
}

#[derive(Default)]
struct MemStoreInner {
    // post_id -> record; url index kept alongside for the OR-match semantics.
    by_post_id: HashMap<String, StoredRecord>,
    urls: HashMap<String, String>,
    processed: Vec<i64>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<Mutex<MemStoreInner>>,
    fail_exists: Arc<AtomicBool>,
    duplicate_on_insert: Arc<AtomicBool>,
}

impl MemStore {
    pub fn fail_exists(&self, fail: bool) {
        self.fail_exists.store(fail, Ordering::SeqCst);
    }

    pub fn duplicate_on_insert(&self, on: bool) {
        self.duplicate_on_insert.store(on, Ordering::SeqCst);
    }

    /// Seed a (post_id, url) pair as already stored.
    pub fn prestore_url(&self, post_id: &str, url: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let record = StoredRecord {
            id: inner.next_id,
            company_name: "prestored".to_string(),
            platform: pubwatch_core::Platform::Medium,
            post_id: post_id.to_string(),
            url: url.to_string(),
            title: "prestored".to_string(),
        };
        inner.urls.insert(url.to_string(), post_id.to_string());
        inner.by_post_id.insert(post_id.to_string(), record);
    }

    pub fn record_count(&self) -> usize {
        self.inner.lock().unwrap().by_post_id.len()
    }

    pub fn records(&self) -> Vec<StoredRecord> {
        self.inner
            .lock()
            .unwrap()
            .by_post_id
            .values()
            .cloned()
            .collect()
    }

    pub fn processed_ids(&self) -> Vec<i64> {
        self.inner.lock().unwrap().processed.clone()
    }
}

#[async_trait]
impl ContentStore for MemStore {
    async fn exists(&self, post_id: &str, url: &str) -> Result<bool, StoreError> {
        if self.fail_exists.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("exists check offline".to_string()));
        }
        let inner = self.inner.lock().unwrap();
        Ok(inner.by_post_id.contains_key(post_id) || inner.urls.contains_key(url))
    }

    async fn insert(
        &self,
        company_name: &str,
        post: &NormalizedPost,
    ) -> Result<StoredRecord, StoreError> {
        if self.duplicate_on_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Duplicate {
                post_id: post.post_id.clone(),
            });
        }
        let mut inner = self.inner.lock().unwrap();
        if inner.by_post_id.contains_key(&post.post_id) || inner.urls.contains_key(&post.url) {
            return Err(StoreError::Duplicate {
                post_id: post.post_id.clone(),
            });
        }
        inner.next_id += 1;
        let record = StoredRecord {
            id: inner.next_id,
            company_name: company_name.to_string(),
            platform: post.platform,
            post_id: post.post_id.clone(),
            url: post.url.clone(),
            title: post.title.clone(),
        };
        inner.urls.insert(post.url.clone(), post.post_id.clone());
        inner
            .by_post_id
            .insert(post.post_id.clone(), record.clone());
        Ok(record)
    }

    async fn mark_processed(&self, id: i64) -> Result<(), StoreError> {
        self.inner.lock().unwrap().processed.push(id);
        Ok(())
    }

    async fn mark_processed_bulk(&self, ids: &[i64]) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.processed.extend_from_slice(ids);
        Ok(ids.len() as u64)
    }
}
