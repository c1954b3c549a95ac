//! Fingerprinted artifact cache for cardstash.
//!
//! Rendered cards are expensive: the generator is an external process that
//! fetches showcase data and draws one image per character. This crate keeps
//! those images on disk and only asks for new ones when something that shows
//! up on the card actually changed.
//!
//! # Components
//!
//! - **Fingerprint**: a SHA-256 digest over an entity's progression,
//!   equipment and sub-attributes, canonicalized so attribute order never
//!   matters. Cosmetic fields are left out.
//! - **CacheStore**: the on-disk layout (`<root>/<owner>/manifest.json` plus
//!   one artifact per entity) and the regeneration check.
//! - **ArtifactGenerator**: the contract for the out-of-process renderer and
//!   a [`ProcessGenerator`] that speaks its `SUCCESS:`/`ERROR:` protocol.
//! - **Refresher**: the check → clear → generate → record pass.
//! - **ExpiringMap**: short-lived keyed state with explicit eviction.
//!
//! # Example
//!
//! ```no_run
//! use cardstash_cache::{CacheConfig, CacheStore};
//! use cardstash_types::{Entity, EntityId, OwnerId};
//!
//! # async fn run() {
//! let store = CacheStore::new(CacheConfig::default());
//! let owner = OwnerId::parse("800123456").unwrap();
//! let welt = Entity::new(EntityId::parse("1004").unwrap(), "Welt").with_progression(80, 6, 0);
//!
//! if store.needs_regeneration(&owner, &welt).await {
//!     // render, then record
//!     store.update_manifest(&owner, &[welt]).await;
//! }
//! # }
//! ```

mod error;
pub mod expiring;
pub mod fingerprint;
pub mod generator;
mod refresh;
mod store;

pub use error::{CacheError, CacheResult};
pub use expiring::ExpiringMap;
pub use fingerprint::{fingerprint, fingerprint_value, FINGERPRINT_LEN};
pub use generator::{
    parse_generator_output, ArtifactGenerator, GenerationReport, GenerationRequest,
    GenerationTarget, GeneratorConfig, ProcessGenerator,
};
pub use refresh::{RefreshOutcome, Refresher};
pub use store::{CacheConfig, CacheStore, MANIFEST_FILE};
