use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Expected capacity and false-positive rate.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static USERNAME_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

/// Until the warm-up has loaded every stored name, a filter miss proves nothing.
static WARMED: AtomicBool = AtomicBool::new(false);

#[inline]
fn normalize(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Check if a username might exist (false positives possible)
pub fn might_exist(username: &str) -> bool {
    if !WARMED.load(Ordering::Acquire) {
        return true;
    }
    let username = normalize(username);
    match USERNAME_FILTER.read() {
        Ok(filter) => filter.contains(&username),
        // poisoned: fall through to the slower checks
        Err(_) => true,
    }
}

/// Insert a single username into the filter
pub fn insert(username: &str) {
    let username = normalize(username);
    if let Ok(mut filter) = USERNAME_FILTER.write() {
        filter.add(&username);
    }
}

/// Warm up the username filter using streaming + batching
pub async fn warmup_username_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>("SELECT username FROM login").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (username,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&username));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch)?;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch)?;
    }

    WARMED.store(true, Ordering::Release);
    log::info!("Username filter warmup complete: {} users", total);
    Ok(())
}

/// Insert a batch of normalized usernames
fn insert_batch(usernames: &[String]) -> Result<()> {
    let mut filter = USERNAME_FILTER
        .write()
        .map_err(|_| anyhow!("username filter poisoned"))?;

    for username in usernames {
        filter.add(username);
    }
    Ok(())
}
