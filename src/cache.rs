//! Content-addressed texture cache.
//!
//! Every request is reduced to a stable key derived from its content. The key
//! names the stored file and seeds the random parts of rendering, so a given
//! request always maps to the same file with the same bytes. Rendered files
//! live for as long as the backing store keeps them; there is no eviction.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::TextureConfig;
use crate::error::Result;
use crate::request::{ObjectKind, RingRequest, SurfaceRequest};
use crate::ring::RingSynthesizer;
use crate::store::{FsStore, TextureStore};
use crate::surface::SurfaceSynthesizer;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hex digits kept from the content hash in file names
pub const KEY_LEN: usize = 12;

/// 64-bit FNV-1a
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}

/// Stable identity of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey(u64);

impl ContentKey {
    pub fn of(content: &str) -> Self {
        ContentKey(fnv1a(content.as_bytes()))
    }

    pub fn surface(request: &SurfaceRequest) -> Self {
        Self::of(&format!(
            "{}_{}_{}",
            request.display_name,
            request.kind,
            request.base_color.to_hex()
        ))
    }

    pub fn ring(request: &RingRequest) -> Self {
        Self::of(&format!("ring_{}_{:?}", request.base_color.to_hex(), request.opacity))
    }

    /// Truncated hex form used in file names
    pub fn prefix(&self) -> String {
        let mut hex = format!("{:016x}", self.0);
        hex.truncate(KEY_LEN);
        hex
    }

    /// Full hash, used to seed renders
    pub fn seed(&self) -> u64 {
        self.0
    }
}

/// Where a texture lives, plus what it depicts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureRef {
    pub key: String,
    pub path: PathBuf,
    pub url: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObjectKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// True when the file already existed and nothing was rendered
    pub cached: bool,
}

pub struct TextureCache<S: TextureStore = FsStore> {
    store: S,
    config: TextureConfig,
    surfaces: SurfaceSynthesizer,
    rings: RingSynthesizer,
    /// One lock per file currently being checked or rendered
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TextureCache<FsStore> {
    /// Open a filesystem-backed cache in `config.textures_dir`
    pub fn open(config: TextureConfig) -> Result<Self> {
        let store = FsStore::open(&config.textures_dir)?;
        Ok(Self::with_store(store, config))
    }
}

impl<S: TextureStore> TextureCache<S> {
    pub fn with_store(store: S, config: TextureConfig) -> Self {
        TextureCache {
            surfaces: SurfaceSynthesizer::new(config.width, config.height),
            rings: RingSynthesizer::new(config.width),
            store,
            config,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parse raw caller input and return the matching surface texture
    pub fn generate_texture(
        &self,
        kind_tag: &str,
        base_color: &str,
        display_name: &str,
        temperature_kelvin: Option<i32>,
    ) -> Result<TextureRef> {
        let request = SurfaceRequest::parse(kind_tag, base_color, display_name, temperature_kelvin)?;
        self.get_or_render_surface(&request)
    }

    /// Parse raw caller input and return the matching ring texture
    pub fn generate_ring_texture(&self, base_color: &str, opacity: f64) -> Result<TextureRef> {
        let request = RingRequest::parse(base_color, opacity)?;
        self.get_or_render_ring(&request)
    }

    /// Return the surface texture for `request`, rendering it on first use
    pub fn get_or_render_surface(&self, request: &SurfaceRequest) -> Result<TextureRef> {
        let key = ContentKey::surface(request);
        let file_name = format!("{}_diffuse.jpg", key.prefix());

        let cached = self.get_or_insert(&file_name, || {
            let started = Instant::now();
            let img = self.surfaces.render(request, key.seed())?;
            debug!(
                "Rendered {} surface for {:?} (temperature {:?} K) in {:?}",
                request.kind,
                request.display_name,
                request.temperature_kelvin,
                started.elapsed()
            );

            let mut bytes = Vec::new();
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, self.config.jpeg_quality))?;
            Ok(bytes)
        })?;

        Ok(TextureRef {
            key: key.prefix(),
            path: self.store.locate(&file_name),
            url: self.config.url_for(&file_name),
            kind: Some(request.kind),
            name: Some(request.display_name.clone()),
            cached,
        })
    }

    /// Return the ring texture for `request`, rendering it on first use
    pub fn get_or_render_ring(&self, request: &RingRequest) -> Result<TextureRef> {
        let key = ContentKey::ring(request);
        let file_name = format!("{}_ring.png", key.prefix());

        let cached = self.get_or_insert(&file_name, || {
            let img = self.rings.render(request, key.seed())?;
            let mut bytes = Vec::new();
            img.write_with_encoder(PngEncoder::new(&mut bytes))?;
            Ok(bytes)
        })?;

        Ok(TextureRef {
            key: key.prefix(),
            path: self.store.locate(&file_name),
            url: self.config.url_for(&file_name),
            kind: None,
            name: None,
            cached,
        })
    }

    /// Ensure `file_name` exists, producing its bytes with `render` if not
    ///
    /// Returns whether the file was already present. Concurrent callers for
    /// the same file wait for the first one; callers for different files do
    /// not block each other.
    fn get_or_insert<F>(&self, file_name: &str, render: F) -> Result<bool>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        let slot = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(in_flight.entry(file_name.to_string()).or_default())
        };

        let result = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            self.ensure_stored(file_name, render)
        };

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map and this caller hold the slot: nobody else is waiting
        if Arc::strong_count(&slot) == 2 {
            in_flight.remove(file_name);
        }

        result
    }

    fn ensure_stored<F>(&self, file_name: &str, render: F) -> Result<bool>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        if self.store.contains(file_name) {
            debug!("Cache HIT: {}", file_name);
            return Ok(true);
        }

        debug!("Cache MISS: {}", file_name);
        let bytes = render()?;
        if let Err(e) = self.store.put(file_name, &bytes) {
            warn!("Failed to store {}: {}", file_name, e);
            return Err(e.into());
        }
        info!("Stored texture {}", file_name);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::error::{StorageError, TextureError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory backend that counts writes
    #[derive(Default)]
    struct MemoryStore {
        objects: Mutex<HashMap<String, Vec<u8>>>,
        puts: AtomicUsize,
    }

    impl TextureStore for MemoryStore {
        fn contains(&self, name: &str) -> bool {
            self.objects.lock().unwrap().contains_key(name)
        }

        fn put(&self, name: &str, bytes: &[u8]) -> std::result::Result<(), StorageError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.objects.lock().unwrap().insert(name.to_string(), bytes.to_vec());
            Ok(())
        }

        fn locate(&self, name: &str) -> PathBuf {
            PathBuf::from("memory").join(name)
        }
    }

    struct FailingStore;

    impl TextureStore for FailingStore {
        fn contains(&self, _name: &str) -> bool {
            false
        }

        fn put(&self, name: &str, _bytes: &[u8]) -> std::result::Result<(), StorageError> {
            Err(StorageError::Write {
                name: name.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            })
        }

        fn locate(&self, name: &str) -> PathBuf {
            PathBuf::from(name)
        }
    }

    fn small_config() -> TextureConfig {
        TextureConfig {
            width: 64,
            height: 32,
            ..TextureConfig::default()
        }
    }

    fn memory_cache() -> TextureCache<MemoryStore> {
        TextureCache::with_store(MemoryStore::default(), small_config())
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_key_prefix_length() {
        let key = ContentKey::of("Sun_star_#FDB813");
        assert_eq!(key.prefix().len(), KEY_LEN);
        assert!(key.prefix().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, ContentKey::of("Sun_star_#FDB813"));
    }

    #[test]
    fn test_surface_key_uses_canonical_inputs() {
        let upper = SurfaceRequest::parse("star", "#FDB813", "Sun", None).unwrap();
        let lower = SurfaceRequest::parse("STAR", "fdb813", "Sun", Some(5778)).unwrap();
        assert_eq!(ContentKey::surface(&upper), ContentKey::surface(&lower));

        let renamed = SurfaceRequest::parse("star", "#FDB813", "Sol", None).unwrap();
        assert_ne!(ContentKey::surface(&upper), ContentKey::surface(&renamed));
    }

    #[test]
    fn test_ring_key_depends_on_opacity() {
        let a = RingRequest::parse("#DEB887", 0.8).unwrap();
        let b = RingRequest::parse("#DEB887", 0.7).unwrap();
        assert_ne!(ContentKey::ring(&a), ContentKey::ring(&b));
    }

    #[test]
    fn test_second_call_is_cache_hit() {
        let cache = memory_cache();
        let first = cache.generate_texture("rocky", "#8C7853", "Rocky Planet", Some(400)).unwrap();
        let second = cache.generate_texture("rocky", "#8C7853", "Rocky Planet", Some(400)).unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.key, second.key);
        assert_eq!(first.path, second.path);
        assert_eq!(cache.store().puts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reference_metadata() {
        let cache = memory_cache();
        let surface = cache.generate_texture("nebula", "#123456", "Oddity", None).unwrap();
        assert_eq!(surface.kind, Some(ObjectKind::Terrestrial));
        assert_eq!(surface.name.as_deref(), Some("Oddity"));
        assert_eq!(surface.url, format!("/textures/{}_diffuse.jpg", surface.key));

        let ring = cache.generate_ring_texture("#DEB887", 0.8).unwrap();
        assert_eq!(ring.kind, None);
        assert_eq!(ring.url, format!("/textures/{}_ring.png", ring.key));
    }

    #[test]
    fn test_reference_json_shape() {
        let cache = memory_cache();
        let surface = cache.generate_texture("gas", "#DAA520", "Gas Giant", None).unwrap();
        let json = serde_json::to_value(&surface).unwrap();
        assert_eq!(json["type"], "gas");
        assert_eq!(json["name"], "Gas Giant");
        assert_eq!(json["cached"], false);

        let ring = cache.generate_ring_texture("#DEB887", 0.8).unwrap();
        let json = serde_json::to_value(&ring).unwrap();
        assert!(json.get("type").is_none());
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_stored_bytes_are_reproducible() {
        let a = memory_cache();
        let b = memory_cache();
        for cache in [&a, &b] {
            cache.generate_texture("rocky", "#8C7853", "Rocky Planet", None).unwrap();
            cache.generate_ring_texture("#DEB887", 0.8).unwrap();
        }
        let a = a.store().objects.lock().unwrap().clone();
        let b = b.store().objects.lock().unwrap().clone();
        assert_eq!(a.len(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_color_renders_nothing() {
        let cache = memory_cache();
        let err = cache.generate_texture("star", "#FFF", "Sun", None).unwrap_err();
        assert!(matches!(err, TextureError::InvalidColor(_)));
        assert_eq!(cache.store().puts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_storage_failure_is_surfaced() {
        let cache = TextureCache::with_store(FailingStore, small_config());
        let err = cache.generate_texture("ice", "#4FD0E0", "Hoth", None).unwrap_err();
        assert!(matches!(err, TextureError::Storage(StorageError::Write { .. })));
        assert!(cache.in_flight.lock().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_requests_render_once() {
        let cache = memory_cache();
        let request = SurfaceRequest::new(ObjectKind::Gas, Rgb::new(218, 165, 32), "Jupiter");

        let results: Vec<TextureRef> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.get_or_render_surface(&request).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.store().puts.load(Ordering::SeqCst), 1);
        assert_eq!(results.iter().filter(|r| !r.cached).count(), 1);
        assert!(results.iter().all(|r| r.key == results[0].key));
        assert!(cache.in_flight.lock().unwrap().is_empty());
    }
}
