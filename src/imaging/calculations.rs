//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Sizes are `(width, height)` tuples; every computed side is at least 1px.

/// Round a scaled side, never below 1px.
fn scaled(side: u32, ratio: f64) -> u32 {
    ((side as f64 * ratio).round() as u32).max(1)
}

/// Calculate the largest size that fits inside `target` with the source aspect ratio.
///
/// Scales up or down. When the aspect ratios match, the result is the target.
///
/// ```text
/// (100, 100) in (50, 50)   → (50, 50)
/// (400, 200) in (100, 100) → (100, 50)
/// (200, 400) in (300, 300) → (150, 300)
/// ```
pub fn calculate_contain_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: width matches
        (tgt_w, scaled(src_h, tgt_w as f64 / src_w as f64))
    } else if src_aspect < tgt_aspect {
        // Source is taller: height matches
        (scaled(src_w, tgt_h as f64 / src_h as f64), tgt_h)
    } else {
        target
    }
}

/// Calculate thumbnail dimensions: like contain, but never larger than the source.
///
/// ```text
/// (800, 600) in (400, 400) → (400, 300)
/// (120, 80)  in (400, 400) → (120, 80)
/// ```
pub fn calculate_thumbnail_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    if src_w <= tgt_w && src_h <= tgt_h {
        return source;
    }
    calculate_contain_dimensions(source, target)
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let w = scaled(src_w, tgt_h as f64 / src_h as f64).max(tgt_w);
        (w, tgt_h)
    } else {
        // Source is taller: width will match, height will exceed
        let h = scaled(src_h, tgt_w as f64 / src_w as f64).max(tgt_h);
        (tgt_w, h)
    }
}

/// Where to cut the crop window out of a filled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropAnchor {
    TopLeft,
    Center,
}

/// Calculate the top-left corner of a `target`-sized crop inside `filled`.
///
/// `filled` must be at least as large as `target` on both axes
/// (what [`calculate_fill_dimensions`] returns).
pub fn calculate_crop_origin(
    filled: (u32, u32),
    target: (u32, u32),
    anchor: CropAnchor,
) -> (u32, u32) {
    match anchor {
        CropAnchor::TopLeft => (0, 0),
        CropAnchor::Center => (
            filled.0.saturating_sub(target.0) / 2,
            filled.1.saturating_sub(target.1) / 2,
        ),
    }
}

/// Calculate the offset that centers `inner` on a `canvas`-sized background.
pub fn calculate_pad_offset(inner: (u32, u32), canvas: (u32, u32)) -> (u32, u32) {
    (
        canvas.0.saturating_sub(inner.0) / 2,
        canvas.1.saturating_sub(inner.1) / 2,
    )
}

/// Scale `source` down so its longer edge is at most `cap`. Never upscales.
pub fn calculate_capped_dimensions(source: (u32, u32), cap: u32) -> (u32, u32) {
    let longer = source.0.max(source.1);
    if longer <= cap {
        return source;
    }
    let ratio = cap as f64 / longer as f64;
    (scaled(source.0, ratio), scaled(source.1, ratio))
}
