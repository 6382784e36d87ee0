//! Compositing decoded bitmap rects onto the output planes.
//!
//! Each rect's palette indices are resolved through a working palette
//! (embedded palette, then overrides, then the optional grayscale
//! transform) and the resulting `0xAARRGGBB` values are split across the
//! four destination planes at the rect's offset. Rects composite in array
//! order; where they overlap, the later rect wins pixel for pixel.

use crate::decoder::{RectKind, SubtitleRect};
use crate::frame::RenderedFrame;
use crate::palette::{PaletteOverride, make_palette_gray};

/// Composite one rect onto the frame.
///
/// Degenerate (`width <= 0 || height <= 0`) and non-bitmap rects are
/// skipped. Rect regions outside the canvas are clipped.
pub(crate) fn composite_rect(
    rect: &SubtitleRect,
    overrides: &PaletteOverride,
    grayscale: bool,
    frame: &mut RenderedFrame,
) {
    if rect.width <= 0 || rect.height <= 0 || rect.kind != RectKind::Bitmap {
        return;
    }

    let mut palette = rect.palette;
    overrides.apply(&mut palette);
    if grayscale {
        make_palette_gray(&mut palette);
    }

    let canvas_width = frame.width() as i64;
    let canvas_height = frame.height() as i64;

    // Intersect the rect with the canvas. The source offsets skip the part
    // of the rect that falls off the top/left edge.
    let dst_x0 = rect.x.max(0) as i64;
    let dst_y0 = rect.y.max(0) as i64;
    let dst_x1 = (rect.x as i64 + rect.width as i64).min(canvas_width);
    let dst_y1 = (rect.y as i64 + rect.height as i64).min(canvas_height);

    if dst_x0 >= dst_x1 || dst_y0 >= dst_y1 {
        log::warn!(
            "subtitle rect {}x{} at ({}, {}) lies entirely outside the {}x{} canvas",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            canvas_width,
            canvas_height
        );
        return;
    }

    if dst_x1 - dst_x0 < rect.width as i64 || dst_y1 - dst_y0 < rect.height as i64 {
        log::warn!(
            "clipping subtitle rect {}x{} at ({}, {}) to the {}x{} canvas",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            canvas_width,
            canvas_height
        );
    }

    let src_x0 = (dst_x0 - rect.x as i64) as usize;
    let src_y0 = (dst_y0 - rect.y as i64) as usize;
    let copy_width = (dst_x1 - dst_x0) as usize;

    for row in 0..(dst_y1 - dst_y0) as usize {
        let src_row_start = (src_y0 + row) * rect.stride + src_x0;
        let indices = &rect.data[src_row_start..src_row_start + copy_width];

        let y = dst_y0 as usize + row;
        let x0 = dst_x0 as usize;
        let dst_r = &mut frame.red.row_mut(y)[x0..x0 + copy_width];
        for (dst, &index) in dst_r.iter_mut().zip(indices) {
            *dst = ((palette[index as usize] >> 16) & 0xff) as u8;
        }
        let dst_g = &mut frame.green.row_mut(y)[x0..x0 + copy_width];
        for (dst, &index) in dst_g.iter_mut().zip(indices) {
            *dst = ((palette[index as usize] >> 8) & 0xff) as u8;
        }
        let dst_b = &mut frame.blue.row_mut(y)[x0..x0 + copy_width];
        for (dst, &index) in dst_b.iter_mut().zip(indices) {
            *dst = (palette[index as usize] & 0xff) as u8;
        }
        let dst_a = &mut frame.alpha.row_mut(y)[x0..x0 + copy_width];
        for (dst, &index) in dst_a.iter_mut().zip(indices) {
            *dst = ((palette[index as usize] >> 24) & 0xff) as u8;
        }
    }
}

/// Composite every rect of an event, in array order.
pub(crate) fn composite_rects(
    rects: &[SubtitleRect],
    overrides: &PaletteOverride,
    grayscale: bool,
    frame: &mut RenderedFrame,
) {
    for rect in rects {
        composite_rect(rect, overrides, grayscale, frame);
    }
}
