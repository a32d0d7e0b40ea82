use crate::icon::ICON_SIZE;
use crate::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use ringstep::{Frame, ItemFrame, Point, Step, Steps};
use std::f64::consts::PI;

pub const ITEM_RADIUS: f64 = 44.0;
pub const CENTER_CIRCLE_RADIUS: f64 = 36.0;

/// Index of the item under `cursor`, if any.
pub fn hit_test(frame: &Frame, center: Point, cursor: Point) -> Option<usize> {
    frame
        .items
        .iter()
        .filter(|item| {
            let pos = Point::new(center.x + item.position.x, center.y + item.position.y);
            pos.distance(cursor) <= ITEM_RADIUS * item.transform.scale
        })
        .min_by(|a, b| {
            let da = Point::new(center.x + a.position.x, center.y + a.position.y).distance(cursor);
            let db = Point::new(center.x + b.position.x, center.y + b.position.y).distance(cursor);
            da.total_cmp(&db)
        })
        .map(|item| item.index)
}

fn set_source(cr: &Context, color: Srgba<f64>, alpha: f64) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a * alpha);
}

struct ItemRenderer<'a> {
    item: &'a ItemFrame,
    step: Option<&'a Step>,
    pixbuf: Option<&'a Pixbuf>,
    center: Point,
}

impl ItemRenderer<'_> {
    fn position(&self) -> Point {
        Point::new(
            self.center.x + self.item.position.x,
            self.center.y + self.item.position.y,
        )
    }

    fn radius(&self) -> f64 {
        ITEM_RADIUS * self.item.transform.scale
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_circle(cr, colors)?;
        self.draw_content(cr, colors)
    }

    fn draw_circle(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let color = if self.item.active {
            colors.active
        } else {
            colors.idle
        };
        set_source(cr, color, 1.0);
        let pos = self.position();
        cr.arc(pos.x, pos.y, self.radius(), 0.0, 2.0 * PI);
        cr.fill()
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let pos = self.position();
        cr.save()?;
        cr.translate(pos.x, pos.y);
        cr.rotate(self.item.transform.rotation.to_radians());

        let result = if let Some(pixbuf) = self.pixbuf {
            self.draw_icon(cr, pixbuf)
        } else if let Some(step) = self.step {
            self.draw_label(cr, colors, &(step.index + 1).to_string())
        } else {
            Ok(())
        };

        cr.restore()?;
        result
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        // fit icon into the item circle, centred on the current origin
        let icon_scale = (self.radius() * 2.0 * 0.7) / ICON_SIZE as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );

        cr.translate(-iw / 2.0, -ih / 2.0);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint_with_alpha(self.item.transform.opacity)
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors, text: &str) -> Result<(), cairo::Error> {
        set_source(cr, colors.text, self.item.transform.opacity);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(18.0 * self.item.transform.scale);
        let ext = cr.text_extents(text)?;
        cr.move_to(-ext.width() / 2.0, ext.height() / 2.0);
        cr.show_text(text)
    }
}

pub fn draw(
    cr: &Context,
    frame: &Frame,
    steps: &Steps,
    icons: &[Option<Pixbuf>],
    center: Point,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    draw_track(cr, frame, center, colors)?;
    draw_center(cr, frame, steps, center, colors)?;

    // active item last so it paints over its neighbours
    let mut items: Vec<&ItemFrame> = frame.items.iter().collect();
    items.sort_by_key(|item| item.active);

    for item in items {
        ItemRenderer {
            item,
            step: steps.get(item.index),
            pixbuf: icons.get(item.index).and_then(Option::as_ref),
            center,
        }
        .draw(cr, colors)?;
    }
    Ok(())
}

fn draw_track(
    cr: &Context,
    frame: &Frame,
    center: Point,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    if frame.radius <= 0.0 {
        return Ok(());
    }
    set_source(cr, colors.track, 1.0);
    cr.set_line_width(2.0);
    cr.arc(center.x, center.y, frame.radius, 0.0, 2.0 * PI);
    cr.stroke()
}

fn draw_center(
    cr: &Context,
    frame: &Frame,
    steps: &Steps,
    center: Point,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_source(cr, colors.center_circle, 1.0);
    cr.arc(center.x, center.y, CENTER_CIRCLE_RADIUS, 0.0, 2.0 * PI);
    cr.fill()?;

    let Some(step) = steps.get(frame.active_index) else {
        return Ok(());
    };
    let text = format!("{}/{}", step.index + 1, steps.len());
    set_source(cr, colors.text, 1.0);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(14.0);
    let ext = cr.text_extents(&text)?;
    cr.move_to(center.x - ext.width() / 2.0, center.y + ext.height() / 2.0);
    cr.show_text(&text)
}
