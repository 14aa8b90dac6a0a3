//! Pointer-driven drift of the decorative background shapes.

/// Pointer position mapped to `-1.0..=1.0` on each axis, centre is `(0, 0)`.
/// A degenerate viewport yields the centre.
pub fn pointer_offset(client_x: f64, client_y: f64, width: f64, height: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    ((client_x / width - 0.5) * 2.0, (client_y / height - 0.5) * 2.0)
}

/// CSS transform for the `index`-th shape. Later shapes travel further.
pub fn shape_transform(offset: (f64, f64), index: usize) -> String {
    let (x, y) = offset;
    let speed = (index as f64 + 1.0) * 0.8;
    format!(
        "translate({}px, {}px) rotate({}deg)",
        x * speed * 10.0,
        y * speed * 10.0,
        x * y * 30.0
    )
}
