//! Contrast curve.

/// Linear contrast stretch about mid-gray. `contrast == 1.0` is the identity.
pub fn apply_contrast(gray: u8, contrast: f64) -> u8 {
    if contrast == 1.0 {
        return gray;
    }
    let normalized = f64::from(gray) / 255.0;
    let adjusted = ((normalized - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
    (adjusted * 255.0) as u8
}
