// src/common/cache.rs

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Fonte de tempo injetável, para os testes controlarem a expiração.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Relógio manual: só anda quando alguém chama `advance`.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { now: Arc::new(Mutex::new(Instant::now())) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Cache em memória com tempo de vida fixo por entrada.
///
/// Entradas vencidas são descartadas na leitura. Clonar o cache
/// compartilha o mesmo mapa.
pub struct TtlCache<K, V> {
    entries: Arc<Mutex<HashMap<K, Entry<V>>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            clock,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if now.duration_since(entry.stored_at) < self.ttl => {
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Grava a entrada e descarta as vencidas, para o mapa não crescer
    /// com chaves que nunca mais são lidas.
    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut entries = self.lock();
        entries.retain(|_, entry| now.duration_since(entry.stored_at) < ttl);
        entries.insert(key, Entry { value, stored_at: now });
    }

    pub fn purge_expired(&self) {
        let now = self.clock.now();
        let ttl = self.ttl;
        self.lock().retain(|_, entry| now.duration_since(entry.stored_at) < ttl);
    }

    pub fn remove(&self, key: &K) {
        self.lock().remove(key);
    }

    /// Remove todas as entradas cuja chave satisfaz o predicado.
    pub fn remove_where(&self, mut predicate: impl FnMut(&K) -> bool) {
        self.lock().retain(|key, _| !predicate(key));
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Um lock envenenado só significa que outra thread entrou em pânico
    // no meio de um insert; o mapa continua utilizável.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(clock: &ManualClock) -> TtlCache<&'static str, u32> {
        TtlCache::new(Duration::from_secs(300), Arc::new(clock.clone()))
    }

    #[test]
    fn returns_value_inside_window() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        cache.insert("team_stats", 7);
        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get(&"team_stats"), Some(7));
    }

    #[test]
    fn expires_after_ttl() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        cache.insert("team_stats", 7);
        clock.advance(Duration::from_secs(300));
        assert_eq!(cache.get(&"team_stats"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_where_only_drops_matching_keys() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        cache.insert("a1", 1);
        cache.insert("a2", 2);
        cache.insert("b1", 3);
        cache.remove_where(|k| k.starts_with('a'));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"b1"), Some(3));
    }

    #[test]
    fn clones_share_entries() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        let other = cache.clone();
        other.insert("x", 9);
        assert_eq!(cache.get(&"x"), Some(9));
        cache.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn insert_evicts_entries_that_expired_unread() {
        let clock = ManualClock::new();
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(300), Arc::new(clock.clone()));
        for key in 0..1000 {
            cache.insert(key, key);
        }
        assert_eq!(cache.len(), 1000);

        clock.advance(Duration::from_secs(3600));
        cache.insert(1000, 1000);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1000), Some(1000));
    }

    #[test]
    fn purge_keeps_fresh_entries() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        cache.insert("old", 1);
        clock.advance(Duration::from_secs(200));
        cache.insert("new", 2);
        clock.advance(Duration::from_secs(150));
        cache.purge_expired();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"new"), Some(2));
    }
}
