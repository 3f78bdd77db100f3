//! Aspect-preserving placement of a bitmap inside the viewport.

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("cannot fit {image:?} into {viewport:?}, both must have non-zero area")]
    ZeroArea {
        viewport: (u32, u32),
        image: (u32, u32),
    },
}

/// Where, and how large, to draw a bitmap in viewport pixels.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Placement {
    pub offset: (u32, u32),
    pub size: (u32, u32),
}

/// Scale `image` as large as possible inside `viewport` without distortion, centered.
///
/// When the viewport is relatively wider than the image the height fills the viewport,
/// otherwise the width does. Sizes and offsets truncate toward zero.
///
/// # Errors
/// [`GeometryError::ZeroArea`] if either size has a zero width or height.
pub fn fit(viewport: (u32, u32), image: (u32, u32)) -> Result<Placement, GeometryError> {
    let (w, h) = viewport;
    let (iw, ih) = image;
    if w == 0 || h == 0 || iw == 0 || ih == 0 {
        return Err(GeometryError::ZeroArea { viewport, image });
    }
    // Aspect comparison and scaling done by cross-multiplying, exact in u64.
    let (w64, h64, iw64, ih64) = (
        u64::from(w),
        u64::from(h),
        u64::from(iw),
        u64::from(ih),
    );
    let (new_w, new_h) = if w64 * ih64 > iw64 * h64 {
        // Height clamped. new_w < w here, so it fits in u32.
        (h64 * iw64 / ih64, h64)
    } else {
        // Width clamped. new_h <= h here.
        (w64, w64 * ih64 / iw64)
    };
    let new_w = u32::try_from(new_w).unwrap_or(w);
    let new_h = u32::try_from(new_h).unwrap_or(h);

    Ok(Placement {
        offset: ((w - new_w) / 2, (h - new_h) / 2),
        size: (new_w, new_h),
    })
}
