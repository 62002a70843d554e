//! Home page: the business directory and the banner carousel.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use mercado_barrio_client::{ApiGateway, Negocio};

/// Banner references rotated on the home page; resolved through the image
/// cache like any other reference.
pub const CAROUSEL_IMAGES: [&str; 3] = [
    "banners/ara-d1.jpg",
    "banners/principal-d1.jpg",
    "banners/tienda-olimpica.jpg",
];

/// How long each banner stays up.
pub const CAROUSEL_PERIOD: Duration = Duration::from_secs(5);

/// The loaded home page.
#[derive(Debug, Default)]
pub struct HomeView {
    /// Featured businesses, shown first.
    pub destacados: Vec<Negocio>,
    /// Everything else.
    pub regulares: Vec<Negocio>,
    /// Inline error, when the directory could not be loaded.
    pub error: Option<String>,
}

/// Load the business directory and split out the featured businesses.
pub async fn load(gateway: &ApiGateway) -> HomeView {
    let res = gateway.list_negocios().await;
    if !res.api_ok() {
        return HomeView {
            error: Some("No se pudieron cargar los negocios.".to_owned()),
            ..HomeView::default()
        };
    }

    let (destacados, regulares) = res
        .list::<Negocio>("negocios")
        .into_iter()
        .filter(|n| n.id.is_some_and(|id| id.is_valid()))
        .partition(|n| n.es_destacado);

    HomeView {
        destacados,
        regulares,
        error: None,
    }
}

// =============================================================================
// Carousel
// =============================================================================

/// Rotating banner state.
///
/// The index is shared with the rotation timer; reads take it modulo the
/// image count so the counter can grow monotonically.
#[derive(Debug, Clone)]
pub struct Carousel {
    images: Vec<String>,
    current: Arc<AtomicUsize>,
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new(CAROUSEL_IMAGES.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl Carousel {
    #[must_use]
    pub fn new(images: Vec<String>) -> Self {
        Self {
            images,
            current: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The banner currently showing.
    #[must_use]
    pub fn current_image(&self) -> Option<&str> {
        if self.images.is_empty() {
            return None;
        }
        let idx = self.current.load(Ordering::Relaxed) % self.images.len();
        self.images.get(idx).map(String::as_str)
    }

    /// Step to the next banner.
    pub fn advance(&self) {
        self.current.fetch_add(1, Ordering::Relaxed);
    }

    /// Start automatic rotation.
    ///
    /// The returned [`CarouselTimer`] owns the task; dropping it (the view's
    /// teardown) cancels the rotation so no timer acts on stale state.
    #[must_use]
    pub fn start_rotation(&self, period: Duration) -> CarouselTimer {
        let current = Arc::clone(&self.current);
        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            // The first tick of a tokio interval fires immediately.
            ticks.tick().await;
            loop {
                ticks.tick().await;
                current.fetch_add(1, Ordering::Relaxed);
            }
        });
        CarouselTimer { handle }
    }
}

/// Handle to a running carousel rotation; aborts the task on drop.
#[derive(Debug)]
pub struct CarouselTimer {
    handle: JoinHandle<()>,
}

impl Drop for CarouselTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
