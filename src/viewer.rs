use std::path::{Path, PathBuf};

use iced::widget::image::Handle;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::config::ZoomSettings;
use crate::error::{Error, Result};

/// The bitmap currently shown on the surface: the visible part of the
/// source, already scaled.
#[derive(Debug, Clone)]
pub struct Frame {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

/// Shows one image on a fixed-size surface with zoom and pan.
///
/// At zoom 1.0 the image is fitted inside the surface. Zooming keeps the
/// point under the centre of the surface fixed. The pan offset is in surface
/// pixels and is bounded so the image never slides further than its own
/// overhang past the surface edge.
pub struct Viewer {
    settings: ZoomSettings,
    source: Option<DynamicImage>,
    path: Option<PathBuf>,
    zoom_factor: f32,
    pan_offset: (f32, f32),
    pan_enabled: bool,
    surface: (f32, f32),
    frame: Option<Frame>,
}

impl Viewer {
    pub fn new(settings: ZoomSettings) -> Self {
        Self {
            settings,
            source: None,
            path: None,
            zoom_factor: 1.0,
            pan_offset: (0.0, 0.0),
            pan_enabled: false,
            surface: (0.0, 0.0),
            frame: None,
        }
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    pub fn pan_offset(&self) -> (f32, f32) {
        self.pan_offset
    }

    pub fn pan_enabled(&self) -> bool {
        self.pan_enabled
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    /// Decode `path` and show it at the default transform. On failure the
    /// viewer is left empty rather than showing the previous image.
    pub fn load_image(&mut self, path: &Path) -> Result<()> {
        match open_image_oriented(path) {
            Ok(img) => {
                let (w, h) = img.dimensions();
                log::debug!("Loaded {} ({}x{})", path.display(), w, h);
                self.source = Some(img);
                self.path = Some(path.to_path_buf());
                self.reset_transform();
                self.render();
                Ok(())
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Forget the current image.
    pub fn clear(&mut self) {
        self.source = None;
        self.path = None;
        self.frame = None;
        self.reset_transform();
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom_factor * self.settings.step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom_factor / self.settings.step);
    }

    pub fn reset_zoom(&mut self) {
        self.reset_transform();
        self.render();
    }

    pub fn set_pan_enabled(&mut self, enabled: bool) {
        self.pan_enabled = enabled;
    }

    /// Move the image by a pointer drag. Returns whether anything changed;
    /// drags are ignored while panning is disabled.
    pub fn drag(&mut self, dx: f32, dy: f32) -> bool {
        if !self.pan_enabled || self.source.is_none() {
            return false;
        }
        let before = self.pan_offset;
        self.pan_offset = self.clamp_pan((before.0 + dx, before.1 + dy));
        if self.pan_offset == before {
            return false;
        }
        self.render();
        true
    }

    /// The surface changed size. Zoom and pan are kept; only the frame is
    /// redrawn.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.surface = (width.max(0.0), height.max(0.0));
        self.render();
    }

    fn set_zoom(&mut self, target: f32) {
        let target = target.clamp(self.settings.min, self.settings.max);
        if target == self.zoom_factor {
            return;
        }
        let ratio = target / self.zoom_factor;
        self.zoom_factor = target;
        self.pan_offset = self.clamp_pan((self.pan_offset.0 * ratio, self.pan_offset.1 * ratio));
        self.render();
    }

    fn reset_transform(&mut self) {
        self.zoom_factor = 1.0;
        self.pan_offset = (0.0, 0.0);
    }

    /// Source-to-surface scale: fit-to-surface times zoom.
    fn scale(&self) -> Option<f32> {
        let source = self.source.as_ref()?;
        let (w, h) = source.dimensions();
        let (sw, sh) = self.surface;
        if w == 0 || h == 0 || sw < 1.0 || sh < 1.0 {
            return None;
        }
        let fit = (sw / w as f32).min(sh / h as f32);
        Some(fit * self.zoom_factor)
    }

    fn clamp_pan(&self, (x, y): (f32, f32)) -> (f32, f32) {
        let (Some(source), Some(scale)) = (self.source.as_ref(), self.scale()) else {
            return (0.0, 0.0);
        };
        let (w, h) = source.dimensions();
        let max_x = ((w as f32 * scale - self.surface.0) / 2.0).max(0.0);
        let max_y = ((h as f32 * scale - self.surface.1) / 2.0).max(0.0);
        (x.clamp(-max_x, max_x), y.clamp(-max_y, max_y))
    }

    fn render(&mut self) {
        self.frame = None;
        let (Some(source), Some(scale)) = (self.source.as_ref(), self.scale()) else {
            return;
        };
        let (w, h) = source.dimensions();
        let (w, h) = (w as f32, h as f32);
        let (sw, sh) = self.surface;

        // Visible region in source pixels.
        let view_w = (sw / scale).min(w);
        let view_h = (sh / scale).min(h);
        let center_x = w / 2.0 - self.pan_offset.0 / scale;
        let center_y = h / 2.0 - self.pan_offset.1 / scale;
        let x0 = (center_x - view_w / 2.0).clamp(0.0, w - view_w).floor() as u32;
        let y0 = (center_y - view_h / 2.0).clamp(0.0, h - view_h).floor() as u32;
        let crop_w = (view_w.ceil() as u32).clamp(1, w as u32 - x0);
        let crop_h = (view_h.ceil() as u32).clamp(1, h as u32 - y0);

        let out_w = ((crop_w as f32 * scale).round() as u32).clamp(1, sw.ceil() as u32);
        let out_h = ((crop_h as f32 * scale).round() as u32).clamp(1, sh.ceil() as u32);

        // Magnified pixels stay crisp; shrinking gets smoothed.
        let filter = if scale > 1.0 {
            FilterType::Nearest
        } else {
            FilterType::Triangle
        };
        let rgba = source
            .crop_imm(x0, y0, crop_w, crop_h)
            .resize_exact(out_w, out_h, filter)
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        self.frame = Some(Frame {
            handle: Handle::from_rgba(width, height, rgba.into_raw()),
            width,
            height,
        });
    }
}

fn open_image_oriented(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path).map_err(|e| Error::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let orientation = (|| -> Option<u32> {
        let file = std::fs::File::open(path).ok()?;
        let mut reader = std::io::BufReader::new(file);
        let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
        exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?
            .value
            .get_uint(0)
    })()
    .unwrap_or(1);

    Ok(match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    })
}
