use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use ringstep::{IconRef, Steps};
use std::path::PathBuf;

pub const ICON_SIZE: i32 = 256;

pub fn find_icon_path(icon: &IconRef) -> Option<PathBuf> {
    if icon.is_blank() {
        return None;
    }

    if let Some(path) = icon.as_path() {
        return path.exists().then(|| path.to_path_buf());
    }

    lookup(icon.as_str()).with_size(512).with_scale(1).find()
}

fn load_icon(icon: &IconRef) -> Option<Pixbuf> {
    let path = find_icon_path(icon)?;
    match Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true) {
        Ok(pixbuf) => Some(pixbuf),
        Err(e) => {
            log::warn!("Failed to load icon {}: {}", path.display(), e);
            None
        }
    }
}

/// One entry per step; `None` where the step has no loadable icon.
pub fn load_icons(steps: &Steps) -> Vec<Option<Pixbuf>> {
    steps
        .iter()
        .map(|step| step.icon.as_ref().and_then(load_icon))
        .collect()
}
