//! Seam for the external table-detection capability.

use super::page::{PageContent, TableRegion};

/// Detects rectangular table regions on a page and extracts their cell
/// grids. Geometry detection itself lives behind this trait; the
/// extraction pipeline only consumes the regions it returns.
pub trait TableDetector: Send + Sync {
    fn find_tables(&self, page: &PageContent) -> Vec<TableRegion>;
}

/// Detector that reports no tables. Used when no detection backend is
/// wired in; prose extraction still works, table regions are simply
/// never recognized as such.
pub struct NullTableDetector;

impl TableDetector for NullTableDetector {
    fn find_tables(&self, _page: &PageContent) -> Vec<TableRegion> {
        Vec::new()
    }
}
