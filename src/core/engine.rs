use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    config::AppConfig,
    core::{catalog::Catalog, error::FinderError, order::order_results, types::ProbeResult},
    modules::recon::username::{HttpProber, Probe},
};

pub struct Engine<P = HttpProber> {
    prober: Arc<P>,
    catalog: Catalog,
    concurrency: usize,
}

impl Engine<HttpProber> {
    pub fn new(config: &AppConfig) -> Result<Self, FinderError> {
        config.validate()?;
        let prober = HttpProber::from_config(config)?;
        let catalog = Catalog::from_config(config)?;
        Self::with_prober(prober, catalog, config.max_concurrent_requests)
    }
}

impl<P: Probe + 'static> Engine<P> {
    pub fn with_prober(prober: P, catalog: Catalog, concurrency: usize) -> Result<Self, FinderError> {
        check_limit(concurrency)?;
        Ok(Self {
            prober: Arc::new(prober),
            catalog,
            concurrency,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Probe every platform and return the results sorted by platform name.
    pub async fn scan_username(&self, username: &str) -> Result<Vec<ProbeResult>, FinderError> {
        run(self.prober.clone(), &self.catalog, username, self.concurrency).await
    }
}

pub async fn run<P: Probe + 'static>(
    prober: Arc<P>,
    catalog: &Catalog,
    username: &str,
    limit: usize,
) -> Result<Vec<ProbeResult>, FinderError> {
    let results = dispatch(prober, catalog, username, limit).await?;
    Ok(order_results(results))
}

/// Run one probe per catalog entry with at most `limit` in flight.
///
/// Results come back in catalog order, not completion order. Input problems
/// are reported before any request is made; a failed worker aborts the run.
pub async fn dispatch<P: Probe + 'static>(
    prober: Arc<P>,
    catalog: &Catalog,
    username: &str,
    limit: usize,
) -> Result<Vec<ProbeResult>, FinderError> {
    check_username(username)?;
    check_limit(limit)?;

    tracing::info!(
        "probing {} platforms for '{}' (concurrency {})",
        catalog.len(),
        username,
        limit
    );

    let semaphore = Arc::new(Semaphore::new(limit));
    let username: Arc<str> = Arc::from(username);
    let mut tasks = JoinSet::new();

    for (index, entry) in catalog.iter().enumerate() {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| FinderError::Dispatch(e.to_string()))?;
        let prober = prober.clone();
        let entry = entry.clone();
        let username = username.clone();
        tasks.spawn(async move {
            let result = prober.probe(&entry, &username).await;
            drop(permit);
            (index, result)
        });
    }

    let mut slots: Vec<Option<ProbeResult>> = vec![None; catalog.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        tracing::debug!("{} found={}", result.platform, result.found);
        slots[index] = Some(result);
    }

    let results = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| FinderError::Dispatch(format!("no result for entry {}", index)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(
        "{}/{} platforms report '{}'",
        results.iter().filter(|r| r.found).count(),
        results.len(),
        username
    );
    Ok(results)
}

pub fn check_username(username: &str) -> Result<(), FinderError> {
    if username.trim().is_empty() {
        return Err(FinderError::Config("username must not be empty".into()));
    }
    Ok(())
}

fn check_limit(limit: usize) -> Result<(), FinderError> {
    if limit == 0 {
        return Err(FinderError::Config(
            "concurrency limit must be at least 1".into(),
        ));
    }
    Ok(())
}
