//! Servicios inyectables: reloj, generador de UUIDs y fuente aleatoria.
//!
//! Toda fuente de no determinismo del engine pasa por aquí, de modo que un
//! test puede reproducir una ejecución exacta fijando los tres.
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use uuid::{Builder, Uuid};

pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait UuidGenerator: Debug + Send + Sync {
    fn new_uuid(&self) -> Uuid;
}

pub trait RandomSource: Debug + Send + Sync {
    /// Índice uniforme en `0..len`. Con `len == 0` devuelve 0.
    fn index(&self, len: usize) -> usize;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Reloj de test: parte de un instante y avanza `step` en cada lectura.
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl FixedClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self { current: Mutex::new(start),
               step }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = lock(&self.current);
        let now = *current;
        *current = now + self.step;
        now
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct V4Generator;

impl UuidGenerator for V4Generator {
    fn new_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// UUIDs con forma v4 extraídos de un `StdRng` sembrado.
#[derive(Debug)]
pub struct SeededUuids {
    rng: Mutex<StdRng>,
}

impl SeededUuids {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl UuidGenerator for SeededUuids {
    fn new_uuid(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        lock(&self.rng).fill_bytes(&mut bytes);
        Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// Fuente aleatoria sobre `StdRng`, sembrada o desde entropía del sistema.
#[derive(Debug)]
pub struct StdRandom {
    rng: Mutex<StdRng>,
}

impl StdRandom {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }
}

impl RandomSource for StdRandom {
    fn index(&self, len: usize) -> usize {
        lock(&self.rng).gen_range(0..len.max(1))
    }
}

#[derive(Debug, Clone)]
pub struct Services {
    pub clock: Arc<dyn Clock>,
    pub uuids: Arc<dyn UuidGenerator>,
    pub random: Arc<dyn RandomSource>,
}

impl Default for Services {
    fn default() -> Self {
        Self { clock: Arc::new(SystemClock),
               uuids: Arc::new(V4Generator),
               random: Arc::new(StdRandom::from_entropy()) }
    }
}

impl Services {
    /// Servicios reproducibles: reloj que avanza 1s por lectura, UUIDs y
    /// azar derivados de `seed`.
    pub fn deterministic(start: DateTime<Utc>, seed: u64) -> Self {
        Self { clock: Arc::new(FixedClock::new(start, Duration::seconds(1))),
               uuids: Arc::new(SeededUuids::new(seed)),
               random: Arc::new(StdRandom::seeded(seed)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn seeded_uuids_repeat_per_seed() {
        let a = SeededUuids::new(42);
        let b = SeededUuids::new(42);
        let first = a.new_uuid();
        assert_eq!(first, b.new_uuid());
        assert_ne!(first, a.new_uuid());
        assert_eq!(first.get_version_num(), 4);
    }

    #[test]
    fn fixed_clock_advances_per_read() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::new(start, Duration::seconds(2));
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start + Duration::seconds(2));
    }

    #[test]
    fn random_index_stays_in_range() {
        let rng = StdRandom::seeded(7);
        assert!((0..100).all(|_| rng.index(3) < 3));
        assert_eq!(rng.index(0), 0);

        let (a, b) = (StdRandom::seeded(7), StdRandom::seeded(7));
        let picks_a: Vec<usize> = (0..20).map(|_| a.index(10)).collect();
        let picks_b: Vec<usize> = (0..20).map(|_| b.index(10)).collect();
        assert_eq!(picks_a, picks_b);
    }
}
