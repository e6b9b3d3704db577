//! Preview size negotiation.

use crate::models::camera::PreviewSize;

/// The largest size by area. Ties keep the first maximal size in
/// enumeration order. `None` for an empty list.
pub fn largest_by_area(sizes: &[PreviewSize]) -> Option<PreviewSize> {
    sizes.iter().copied().reduce(|best, candidate| {
        if candidate.area() > best.area() {
            candidate
        } else {
            best
        }
    })
}

/// Select the smallest supported size whose aspect ratio exactly equals
/// `aspect`'s and whose width and height both meet or exceed the
/// requested viewport.
///
/// If nothing qualifies, falls back to the first choice unmodified with
/// a soft warning. `None` only for an empty `choices` list.
pub fn choose_optimal_size(
    choices: &[PreviewSize],
    width: u32,
    height: u32,
    aspect: PreviewSize,
) -> Option<PreviewSize> {
    let aspect_w = aspect.width as u64;
    let aspect_h = aspect.height as u64;

    let best = choices
        .iter()
        .copied()
        .filter(|option| {
            option.height as u64 * aspect_w == option.width as u64 * aspect_h
                && option.width >= width
                && option.height >= height
        })
        .min_by_key(|option| option.area());

    match best {
        Some(size) => Some(size),
        None => {
            log::warn!(
                "no suitable preview size among {} choices, falling back to first",
                choices.len()
            );
            choices.first().copied()
        }
    }
}
