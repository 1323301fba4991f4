use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::game::LookupRequest;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Answer from the dictionary service for a single word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Validation {
    Valid,
    Invalid,
    Unreachable,
}

impl Validation {
    fn from_cached(valid: bool) -> Self {
        if valid {
            Validation::Valid
        } else {
            Validation::Invalid
        }
    }
}

/// Dictionary membership check for a lowercase word.
pub trait Dictionary: Send + Sync + 'static {
    fn lookup(&self, word: &str) -> Validation;
}

/// Looks words up with `GET {base_url}/{word}`; only the response status matters.
#[derive(Debug, Clone)]
pub struct HttpDictionary {
    client: Client,
    base_url: String,
}

impl HttpDictionary {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, word: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            word.to_lowercase()
        )
    }
}

impl Dictionary for HttpDictionary {
    fn lookup(&self, word: &str) -> Validation {
        let url = self.url_for(word);
        match self.client.get(&url).send() {
            Ok(resp) if resp.status().is_success() => Validation::Valid,
            Ok(resp) => {
                debug!(word, status = %resp.status(), "dictionary rejected word");
                Validation::Invalid
            }
            Err(e) => {
                warn!(word, error = %e, "dictionary unreachable");
                Validation::Unreachable
            }
        }
    }
}

/// Stand-in used when running with `--offline`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineDictionary;

impl Dictionary for OfflineDictionary {
    fn lookup(&self, _word: &str) -> Validation {
        Validation::Unreachable
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupResponse {
    pub generation: u64,
    pub word: String,
    pub validation: Validation,
}

/// Dictionary plus the persistent result cache in front of it.
pub struct Validator {
    dictionary: Arc<dyn Dictionary>,
    cache: ResultCache,
}

impl Validator {
    pub fn new(dictionary: Arc<dyn Dictionary>, cache: ResultCache) -> Self {
        Self { dictionary, cache }
    }

    pub fn cached(&self, word: &str) -> Option<Validation> {
        self.cache.get(word).map(Validation::from_cached)
    }

    /// Remember a definite answer. Unreachable results are never cached.
    pub fn record(&mut self, word: &str, validation: Validation) {
        match validation {
            Validation::Valid => self.cache.insert(word, true),
            Validation::Invalid => self.cache.insert(word, false),
            Validation::Unreachable => {}
        }
    }

    /// Blocking check through the cache.
    #[cfg(test)]
    pub fn validate(&mut self, word: &str) -> Validation {
        if let Some(hit) = self.cached(word) {
            return hit;
        }
        let validation = self.dictionary.lookup(&word.to_lowercase());
        self.record(word, validation);
        validation
    }

    /// Resolve `request` from the cache, or run the lookup on a worker thread
    /// and hand the response to `deliver`. Returns the cached answer when
    /// there is one.
    pub fn dispatch<F>(&self, request: LookupRequest, deliver: F) -> Option<LookupResponse>
    where
        F: FnOnce(LookupResponse) + Send + 'static,
    {
        if let Some(validation) = self.cached(&request.word) {
            debug!(word = %request.word, %validation, "dictionary cache hit");
            return Some(LookupResponse {
                generation: request.generation,
                word: request.word,
                validation,
            });
        }

        spawn_lookup(Arc::clone(&self.dictionary), request, deliver);
        None
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}

pub fn spawn_lookup<F>(dictionary: Arc<dyn Dictionary>, request: LookupRequest, deliver: F)
where
    F: FnOnce(LookupResponse) + Send + 'static,
{
    thread::spawn(move || {
        let validation = dictionary.lookup(&request.word.to_lowercase());
        info!(word = %request.word, %validation, "dictionary lookup finished");
        deliver(LookupResponse {
            generation: request.generation,
            word: request.word,
            validation,
        });
    });
}
