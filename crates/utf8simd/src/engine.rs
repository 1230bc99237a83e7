//! Selection among the validation engines.
//!
//! Every engine implements the same contract and returns the same verdict;
//! they only differ in how many bytes they classify per step. The best one
//! the host supports is detected once per process and cached.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::{dispatch, error::Utf8Error, scalar};

/// A validation strategy.
///
/// # Default
///
/// [`Engine::Auto`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Engine {
    /// The fastest engine supported by the running CPU.
    #[default]
    Auto,
    /// Byte-at-a-time state machine over the whole input.
    Scalar,
    /// Table-driven 16-byte blocks, no vector instructions.
    Portable,
    /// 16-byte blocks with SSE2 (x86_64).
    Sse2,
    /// 32-byte blocks with AVX2 (x86_64, runtime detected).
    Avx2,
    /// 16-byte blocks with NEON (aarch64).
    Neon,
}

impl Engine {
    /// Every concrete engine, slowest first.
    pub const ALL: [Engine; 5] = [
        Engine::Scalar,
        Engine::Portable,
        Engine::Sse2,
        Engine::Avx2,
        Engine::Neon,
    ];

    /// Whether this engine can run on the current host.
    ///
    /// [`Engine::Auto`] is always available.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            Engine::Auto | Engine::Scalar | Engine::Portable => true,
            Engine::Sse2 => cfg!(target_arch = "x86_64"),
            Engine::Avx2 => has_avx2(),
            Engine::Neon => cfg!(target_arch = "aarch64"),
        }
    }

    /// The fastest available engine.
    ///
    /// Detection runs once per process; later calls read a cached value.
    /// Hosts without vector support get [`Engine::Scalar`].
    #[must_use]
    pub fn detect() -> Engine {
        match Engine::from_id(DETECTED.load(Ordering::Relaxed)) {
            Some(engine) => engine,
            None => {
                let engine = [Engine::Avx2, Engine::Sse2, Engine::Neon]
                    .into_iter()
                    .find(|engine| engine.is_available())
                    .unwrap_or(Engine::Scalar);
                log::debug!("detected {engine:?} UTF-8 validation engine");
                DETECTED.store(engine as u8, Ordering::Relaxed);
                engine
            }
        }
    }

    /// Maps [`Engine::Auto`] and engines the host cannot run to the
    /// detected engine.
    #[must_use]
    pub fn resolve(self) -> Engine {
        match self {
            Engine::Auto => Engine::detect(),
            engine if engine.is_available() => engine,
            engine => {
                let fallback = Engine::detect();
                log::warn!("{engine:?} engine is not supported on this host, using {fallback:?}");
                fallback
            }
        }
    }

    /// Bytes classified per step, or `None` for the scalar engine.
    #[must_use]
    pub fn block_width(self) -> Option<usize> {
        match self.resolve() {
            Engine::Scalar => None,
            Engine::Avx2 => Some(32),
            Engine::Auto | Engine::Portable | Engine::Sse2 | Engine::Neon => Some(16),
        }
    }

    /// Validates `bytes` with this engine.
    ///
    /// Callers must pass an engine returned by [`Engine::resolve`]; anything
    /// else falls back to the scalar validator.
    pub(crate) fn run(self, bytes: &[u8]) -> Result<(), Utf8Error> {
        match self {
            Engine::Portable => dispatch::portable(bytes),
            #[cfg(target_arch = "x86_64")]
            Engine::Sse2 => dispatch::sse2(bytes),
            #[cfg(target_arch = "x86_64")]
            Engine::Avx2 if has_avx2() => {
                // SAFETY: AVX2 support was just checked (a cached lookup).
                unsafe { dispatch::avx2(bytes) }
            }
            #[cfg(target_arch = "aarch64")]
            Engine::Neon => dispatch::neon(bytes),
            _ => scalar::validate(bytes),
        }
    }

    fn from_id(id: u8) -> Option<Engine> {
        Engine::ALL.into_iter().find(|engine| *engine as u8 == id)
    }
}

/// `Engine as u8` of the detected engine; `Engine::Auto` until detection ran.
static DETECTED: AtomicU8 = AtomicU8::new(Engine::Auto as u8);

#[cfg(all(target_arch = "x86_64", feature = "std"))]
fn has_avx2() -> bool {
    std::is_x86_feature_detected!("avx2")
}

#[cfg(all(target_arch = "x86_64", not(feature = "std")))]
fn has_avx2() -> bool {
    cfg!(target_feature = "avx2")
}

#[cfg(not(target_arch = "x86_64"))]
fn has_avx2() -> bool {
    false
}
