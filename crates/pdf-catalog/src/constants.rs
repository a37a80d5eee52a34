//! Shared constants for catalog rendering
//!
//! This module centralizes the page geometry and drawing dimensions used
//! throughout the catalog pipeline. Everything is expressed in PDF points
//! unless the name says otherwise.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub const fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert centimeters to points
#[inline]
pub const fn cm_to_pt(cm: f32) -> f32 {
    mm_to_pt(cm * 10.0)
}

// =============================================================================
// Page Geometry (A4 portrait, the only supported format)
// =============================================================================

pub const PAGE_WIDTH_PT: f32 = mm_to_pt(210.0);
pub const PAGE_HEIGHT_PT: f32 = mm_to_pt(297.0);

pub const LEFT_MARGIN_PT: f32 = cm_to_pt(1.2);
pub const RIGHT_MARGIN_PT: f32 = cm_to_pt(1.2);
/// Leaves room for the header banner
pub const TOP_MARGIN_PT: f32 = cm_to_pt(3.0);
pub const BOTTOM_MARGIN_PT: f32 = cm_to_pt(2.0);

/// Fixed vertical gap between stacked cards
pub const CARD_GAP_PT: f32 = cm_to_pt(0.5);

/// Card height used when no positive cards-per-page count is configured
pub const FALLBACK_CARD_HEIGHT_PT: f32 = cm_to_pt(6.5);

/// Lower bound for a solved card height
pub const MIN_CARD_HEIGHT_PT: f32 = 1.0;

/// Tolerance for the "below the bottom margin" check
pub const LAYOUT_EPSILON_PT: f32 = 0.01;

// =============================================================================
// Header Banner / Footer
// =============================================================================

pub const BANNER_HEIGHT_PT: f32 = mm_to_pt(24.0);
pub const BANNER_TEXT_LEFT_PT: f32 = mm_to_pt(10.0);
pub const BANNER_TITLE_FROM_TOP_PT: f32 = mm_to_pt(12.0);
pub const BANNER_SUBTITLE_FROM_TOP_PT: f32 = mm_to_pt(18.0);
pub const BANNER_TITLE_SIZE: f32 = 18.0;
pub const BANNER_SUBTITLE_SIZE: f32 = 11.0;

pub const PAGE_NUMBER_FONT_SIZE: f32 = 10.0;
pub const PAGE_NUMBER_Y_PT: f32 = cm_to_pt(1.0);

pub const DEFAULT_WATERMARK: &str = "Catalogue généré par SnapCatalog";
pub const WATERMARK_FONT_SIZE: f32 = 9.0;
pub const WATERMARK_Y_PT: f32 = cm_to_pt(0.7);
pub const WATERMARK_GRAY: f32 = 0.88;

// =============================================================================
// Cover
// =============================================================================

pub const LOGO_BOX_PT: f32 = cm_to_pt(3.5);
pub const LOGO_EDGE_OFFSET_PT: f32 = cm_to_pt(1.5);

/// Horizontal padding between a cover box edge and its text
pub const COVER_TEXT_PAD_X_PT: f32 = 30.0;
/// Vertical padding between a cover box edge and its text
pub const COVER_TEXT_PAD_Y_PT: f32 = 20.0;

pub const COVER_BOX_ALPHA: f32 = 0.9;
pub const TITLE_BOX_RADIUS_PT: f32 = 15.0;
pub const SUBTITLE_BOX_RADIUS_PT: f32 = 12.0;

pub const TITLE_MIN_FONT_SIZE: f32 = 16.0;
pub const TITLE_FONT_STEP: f32 = 3.0;
pub const TITLE_LEADING_EXTRA: f32 = 6.0;

pub const SUBTITLE_MIN_FONT_SIZE: f32 = 12.0;
pub const SUBTITLE_FONT_STEP: f32 = 2.0;
pub const SUBTITLE_LEADING_EXTRA: f32 = 8.0;

/// Words longer than this are force-split when they do not fit a line
pub const MAX_WORD_LENGTH: usize = 15;

// =============================================================================
// Card
// =============================================================================

/// Inset of the image zone from the card edges
pub const CARD_IMAGE_INSET_PT: f32 = cm_to_pt(0.3);
/// Space between the image zone and the text zone
pub const CARD_TEXT_GAP_PT: f32 = cm_to_pt(0.5);
pub const CARD_RIGHT_PAD_PT: f32 = cm_to_pt(0.5);
/// Baseline of the metadata line above the card bottom
pub const CARD_META_BASELINE_PT: f32 = cm_to_pt(0.3);
/// Minimum space kept between the description and the metadata line
pub const CARD_META_GAP_PT: f32 = cm_to_pt(0.2);
pub const CARD_BORDER_WIDTH: f32 = 0.5;
pub const PLACEHOLDER_LABEL: &str = "IMAGE";
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Bezier Curve Constants
// =============================================================================

/// Control point factor for approximating quarter circles with Bezier curves.
/// 4 * (sqrt(2) - 1) / 3 ≈ 0.552284749831
pub const BEZIER_CIRCLE_FACTOR: f32 = 0.552284749831;
